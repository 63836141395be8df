//! Form validation rules.
//!
//! Validators never fail; they return the list (or map) of messages a form
//! would show next to its fields. An empty result means the input is valid.

use crate::config::ValidationConfig;
use crate::policy::NewPolicy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("invalid email regex: {e}"))
});

/// Default minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Default minimum length of a policy or project description.
pub const DESCRIPTION_MIN_LENGTH: usize = 50;

/// Default upload size limit in megabytes.
pub const MAX_UPLOAD_MB: u64 = 50;

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks a password against the configured minimum length.
///
/// Returns every rule the password breaks, in a fixed order.
pub fn validate_password_with(password: &str, min_length: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < min_length {
        errors.push(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        errors.push("Password must contain at least one special character".to_string());
    }

    errors
}

pub fn validate_password(password: &str) -> Vec<String> {
    validate_password_with(password, PASSWORD_MIN_LENGTH)
}

/// Checks an upload against a size limit and an optional type allow-list.
///
/// An empty `allowed_types` accepts any type.
pub fn validate_file(
    size_bytes: u64,
    file_type: &str,
    max_size_mb: u64,
    allowed_types: &[String],
) -> Vec<String> {
    let mut errors = Vec::new();

    if size_bytes > max_size_mb.saturating_mul(1024 * 1024) {
        errors.push(format!("File size must be less than {max_size_mb}MB"));
    }

    if !allowed_types.is_empty()
        && !allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(file_type))
    {
        errors.push("File type not supported".to_string());
    }

    errors
}

/// Checks an upload against the configured size limit and file types.
pub fn validate_upload(size_bytes: u64, file_type: &str, limits: &ValidationConfig) -> Vec<String> {
    validate_file(
        size_bytes,
        file_type,
        limits.max_upload_mb,
        &limits.allowed_file_types,
    )
}

/// Field-keyed validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub errors: BTreeMap<&'static str, String>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub(crate) fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// All messages joined for a single-line error.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn validate_policy_form(policy: &NewPolicy) -> FormValidation {
    validate_policy_form_with(policy, DESCRIPTION_MIN_LENGTH)
}

pub fn validate_policy_form_with(policy: &NewPolicy, description_min: usize) -> FormValidation {
    let mut result = FormValidation::default();

    if policy.title.trim().is_empty() {
        result.add("title", "Policy title is required");
    }
    if policy.description.trim().is_empty()
        || policy.description.chars().count() < description_min
    {
        result.add(
            "description",
            format!("Description must be at least {description_min} characters"),
        );
    }
    if policy.sector.trim().is_empty() {
        result.add("sector", "Please select a sector");
    }
    if policy.objectives.iter().all(|o| o.trim().is_empty()) {
        result.add("objectives", "Please add at least one objective");
    }

    result
}
