//! Explicit user session.
//!
//! A [`Session`] exists from login (or registration) until [`Session::logout`]
//! consumes it. Hosts pass it to whatever needs the current user instead of
//! looking a user up from ambient storage.

use crate::catalog;
use crate::config::ValidationConfig;
use crate::error::{Policy360Error, Result};
use crate::validate::{validate_email, validate_password_with};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub sector: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub sector: String,
    pub organization: Option<String>,
    pub role: String,
    pub project_description: String,
}

/// Profile fields a signed-in user may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
}

/// Signed-in user plus the mock bearer token issued at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
    token: String,
    started_at: DateTime<Utc>,
}

/// Rules a registration must satisfy under the default limits.
pub fn validate_registration(form: &Registration) -> Vec<String> {
    validate_registration_with(form, &ValidationConfig::default())
}

/// Rules a registration must satisfy, in the order they are reported.
pub fn validate_registration_with(form: &Registration, limits: &ValidationConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if form.name.trim().chars().count() < 2 {
        errors.push("Full name is required (at least 2 characters)".to_string());
    }
    if !validate_email(&form.email) {
        errors.push("Invalid email format".to_string());
    }
    // Registration only asks for length, an uppercase letter and a digit.
    errors.extend(
        validate_password_with(&form.password, limits.password_min_length)
            .into_iter()
            .filter(|e| !e.contains("lowercase") && !e.contains("special")),
    );
    if form.password != form.confirm_password {
        errors.push("Passwords must match".to_string());
    }
    if form.sector.trim().is_empty() {
        errors.push("Please select a sector".to_string());
    } else if catalog::sector(&form.sector).is_none() {
        errors.push(format!("Unknown sector: {}", form.sector));
    }
    if form.role.trim().is_empty() {
        errors.push("Your role is required".to_string());
    }
    let description_min = limits.description_min_length;
    if form.project_description.trim().chars().count() < description_min {
        errors.push(format!(
            "Please provide at least {description_min} characters"
        ));
    }

    errors
}

fn new_token() -> String {
    format!("mock_token_{}", Uuid::new_v4().simple())
}

fn display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

impl Session {
    /// Starts a session for `email`.
    ///
    /// There is no credential store: any well-formed email with a non-empty
    /// password is accepted.
    ///
    /// # Errors
    ///
    /// Returns `Policy360Error::InvalidCredentials` for a malformed email or
    /// an empty password.
    #[tracing::instrument(skip(password))]
    pub fn login(email: &str, password: &str) -> Result<Self> {
        if !validate_email(email) {
            return Err(Policy360Error::InvalidCredentials(format!(
                "invalid email: {email}"
            )));
        }
        if password.is_empty() {
            return Err(Policy360Error::InvalidCredentials(
                "password is required".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: display_name(email),
            email: email.to_string(),
            sector: None,
            organization: None,
            role: None,
            created_at: now,
            last_login: Some(now),
        };

        tracing::info!(user = %user.id, "session started");
        Ok(Self {
            user,
            token: new_token(),
            started_at: now,
        })
    }

    /// Creates a user from a registration form and signs them in.
    ///
    /// # Errors
    ///
    /// Returns `Policy360Error::RegistrationRejected` listing every failed
    /// rule.
    pub fn register(form: Registration) -> Result<Self> {
        Self::register_with(form, &ValidationConfig::default())
    }

    /// Like [`Session::register`] but validating against configured limits.
    #[tracing::instrument(skip(form, limits), fields(email = %form.email))]
    pub fn register_with(form: Registration, limits: &ValidationConfig) -> Result<Self> {
        let errors = validate_registration_with(&form, limits);
        if !errors.is_empty() {
            return Err(Policy360Error::RegistrationRejected(errors.join("; ")));
        }

        let now = Utc::now();
        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: form.name.trim().to_string(),
            email: form.email,
            sector: Some(form.sector),
            organization: form.organization.filter(|o| !o.trim().is_empty()),
            role: Some(form.role),
            created_at: now,
            last_login: Some(now),
        };

        tracing::info!(user = %user.id, "account registered");
        Ok(Self {
            user,
            token: new_token(),
            started_at: now,
        })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// A live session is always authenticated; logging out consumes it.
    pub fn is_authenticated(&self) -> bool {
        true
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> &User {
        if let Some(name) = update.name {
            self.user.name = name;
        }
        if let Some(sector) = update.sector {
            self.user.sector = Some(sector);
        }
        if let Some(organization) = update.organization {
            self.user.organization = Some(organization);
        }
        if let Some(role) = update.role {
            self.user.role = Some(role);
        }
        tracing::debug!(user = %self.user.id, "profile updated");
        &self.user
    }

    /// Ends the session, handing back the user record.
    pub fn logout(self) -> User {
        tracing::info!(user = %self.user.id, "session ended");
        self.user
    }
}
