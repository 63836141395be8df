//! In-memory policy store.
//!
//! Holds the policies a session works with, the current selection and the
//! record of data imports. Nothing here is persisted; a host that wants
//! durability snapshots the store itself.

use crate::catalog::DataSourceKind;
use crate::config::ValidationConfig;
use crate::error::{Policy360Error, Result};
use crate::observer::{StageObserver, StagePayload, StageUpdate};
use crate::stage::{STAGE_COUNT, Stage};
use crate::validate::{DESCRIPTION_MIN_LENGTH, validate_policy_form_with};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Lifecycle status of a policy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    Draft,
    Active,
    Completed,
}

/// One completed data import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRecord {
    pub source: DataSourceKind,
    pub imported_at: DateTime<Utc>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub title: String,
    pub description: String,
    pub sector: String,
    pub objectives: Vec<String>,
    pub status: PolicyStatus,
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub stage: Stage,
    pub stakeholders: u32,
    pub created_at: DateTime<Utc>,
    pub last_data_import: Option<DateTime<Utc>>,
    pub data_sources: Vec<DataSourceRecord>,
}

/// User-supplied fields for a new policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPolicy {
    pub title: String,
    pub description: String,
    pub sector: String,
    pub objectives: Vec<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sector: Option<String>,
    pub objectives: Option<Vec<String>>,
    pub status: Option<PolicyStatus>,
    pub progress: Option<u8>,
    pub stage: Option<Stage>,
    pub stakeholders: Option<u32>,
}

impl Policy {
    fn apply(&mut self, update: PolicyUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(sector) = update.sector {
            self.sector = sector;
        }
        if let Some(objectives) = update.objectives {
            self.objectives = objectives;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = progress.min(100);
        }
        if let Some(stage) = update.stage {
            self.stage = stage;
        }
        if let Some(stakeholders) = update.stakeholders {
            self.stakeholders = stakeholders;
        }
    }
}

/// Policies ordered newest first, plus the current selection.
#[derive(Debug)]
pub struct PolicyStore {
    policies: Vec<Policy>,
    selected: Option<String>,
    next_id: u64,
    description_min_length: usize,
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self {
            policies: Vec::new(),
            selected: None,
            next_id: 0,
            description_min_length: DESCRIPTION_MIN_LENGTH,
        }
    }
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store validating new policies against configured limits.
    pub fn with_limits(limits: &ValidationConfig) -> Self {
        Self {
            description_min_length: limits.description_min_length,
            ..Self::default()
        }
    }

    /// Creates a draft policy at `Ideation`, puts it first and selects it.
    ///
    /// # Errors
    ///
    /// Returns `Policy360Error::InvalidPolicy` if the form does not validate.
    pub fn create(&mut self, new: NewPolicy) -> Result<&Policy> {
        let validation = validate_policy_form_with(&new, self.description_min_length);
        if !validation.is_valid() {
            return Err(Policy360Error::InvalidPolicy(validation.summary()));
        }

        self.next_id += 1;
        let policy = Policy {
            id: format!("policy_{}", self.next_id),
            title: new.title,
            description: new.description,
            sector: new.sector,
            objectives: new.objectives,
            status: PolicyStatus::Draft,
            progress: 0,
            stage: Stage::Ideation,
            stakeholders: 0,
            created_at: Utc::now(),
            last_data_import: None,
            data_sources: Vec::new(),
        };

        tracing::info!(id = %policy.id, title = %policy.title, "policy created");
        self.selected = Some(policy.id.clone());
        self.policies.insert(0, policy);
        Ok(&self.policies[0])
    }

    pub fn get(&self, id: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Policy> {
        self.policies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Policy360Error::PolicyNotFound(id.to_string()))
    }

    pub fn list(&self) -> &[Policy] {
        &self.policies
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn update(&mut self, id: &str, update: PolicyUpdate) -> Result<&Policy> {
        let policy = self.get_mut(id)?;
        policy.apply(update);
        tracing::debug!(id, "policy updated");
        Ok(&*policy)
    }

    /// Removes a policy, clearing the selection if it pointed at it.
    pub fn delete(&mut self, id: &str) -> Result<Policy> {
        let index = self
            .policies
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Policy360Error::PolicyNotFound(id.to_string()))?;

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        tracing::info!(id, "policy deleted");
        Ok(self.policies.remove(index))
    }

    pub fn select(&mut self, id: &str) -> Result<&Policy> {
        if self.get(id).is_none() {
            return Err(Policy360Error::PolicyNotFound(id.to_string()));
        }
        self.selected = Some(id.to_string());
        self.get(id)
            .ok_or_else(|| Policy360Error::PolicyNotFound(id.to_string()))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Policy> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Records a finished import against a policy.
    #[tracing::instrument(skip(self))]
    pub fn import_data(&mut self, id: &str, source: DataSourceKind, count: usize) -> Result<&Policy> {
        let policy = self.get_mut(id)?;
        let now = Utc::now();
        policy.last_data_import = Some(now);
        policy.data_sources.push(DataSourceRecord {
            source,
            imported_at: now,
            count,
        });
        tracing::info!(source = source.as_str(), count, "data imported");
        Ok(&*policy)
    }

    /// Folds a tracker notification into the policy record.
    ///
    /// Saving progress moves the policy to that stage and out of draft.
    /// Completing a stage moves it to the following stage with progress
    /// proportional to the stages done; final success closes the policy.
    pub fn record_stage_update(&mut self, id: &str, update: &StageUpdate) -> Result<&Policy> {
        let policy = self.get_mut(id)?;

        match update.payload {
            StagePayload::InProgress { .. } => {
                policy.stage = update.stage;
                if policy.status == PolicyStatus::Draft {
                    policy.status = PolicyStatus::Active;
                }
            }
            StagePayload::Completed { .. } if update.stage.is_terminal() => {
                policy.stage = Stage::Success;
                policy.status = PolicyStatus::Completed;
                policy.progress = 100;
            }
            StagePayload::Completed { .. } => {
                let done = update.stage.index() + 1;
                policy.stage = update.stage.next().unwrap_or(Stage::Success);
                policy.status = PolicyStatus::Active;
                policy.progress = u8::try_from(done * 100 / STAGE_COUNT).unwrap_or(100);
            }
        }

        Ok(&*policy)
    }
}

/// Stage observer that writes tracker notifications into a shared store.
#[derive(Debug, Clone)]
pub struct PolicyStoreObserver {
    store: Arc<Mutex<PolicyStore>>,
    policy_id: String,
}

impl PolicyStoreObserver {
    pub fn new(store: Arc<Mutex<PolicyStore>>, policy_id: impl Into<String>) -> Self {
        Self {
            store,
            policy_id: policy_id.into(),
        }
    }
}

impl StageObserver for PolicyStoreObserver {
    fn on_stage_update(&self, update: &StageUpdate) -> Result<()> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| Policy360Error::Anyhow(anyhow::anyhow!("policy store poisoned")))?;
        store.record_stage_update(&self.policy_id, update)?;
        Ok(())
    }
}
