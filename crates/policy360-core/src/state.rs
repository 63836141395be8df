//! Workflow state and its persisted snapshot.
//!
//! [`WorkflowState`] is the tracker's live state. [`WorkflowSnapshot`] is the
//! serializable form a host may write to `state.toml` to resume later; the
//! tracker itself never touches the file system.

use crate::error::{Policy360Error, Result};
use crate::stage::{STAGE_COUNT, Stage};
use crate::tools::fs::FsAdapter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Live workflow position and completion history.
///
/// `active_index` always lies in `0..STAGE_COUNT`, and `completed` only ever
/// grows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowState {
    active_index: usize,
    completed: BTreeSet<Stage>,
}

impl WorkflowState {
    /// Fresh state at `Ideation` with nothing completed.
    pub fn new() -> Self {
        Self::default()
    }

    /// State resumed at a saved position. Out-of-range indices clamp to the
    /// terminal stage.
    pub fn resume(active_index: usize, completed: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            active_index: active_index.min(STAGE_COUNT - 1),
            completed: completed.into_iter().collect(),
        }
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_stage(&self) -> Stage {
        Stage::ALL[self.active_index]
    }

    pub fn completed(&self) -> &BTreeSet<Stage> {
        &self.completed
    }

    pub fn is_completed(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    /// Marks the active stage complete and moves forward.
    ///
    /// Returns `false` without touching anything at the terminal stage.
    pub(crate) fn advance(&mut self) -> bool {
        if self.active_index + 1 >= STAGE_COUNT {
            return false;
        }
        self.completed.insert(self.active_stage());
        self.active_index += 1;
        true
    }

    /// Moves back one stage, keeping completion history.
    pub(crate) fn retreat(&mut self) -> bool {
        if self.active_index == 0 {
            return false;
        }
        self.active_index -= 1;
        true
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            active_index: self.active_index,
            completed: self.completed.iter().copied().collect(),
            updated_at: Utc::now(),
        }
    }
}

/// Serializable copy of a [`WorkflowState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub active_index: usize,
    #[serde(default)]
    pub completed: Vec<Stage>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowSnapshot {
    pub fn active_stage(&self) -> Stage {
        Stage::from_index(self.active_index).unwrap_or(Stage::Success)
    }
}

impl From<&WorkflowSnapshot> for WorkflowState {
    fn from(snapshot: &WorkflowSnapshot) -> Self {
        WorkflowState::resume(snapshot.active_index, snapshot.completed.iter().copied())
    }
}

/// Writes a snapshot as TOML.
#[tracing::instrument(skip(fs, snapshot), fields(path = %path.display(), active_index = snapshot.active_index))]
pub fn save_snapshot(fs: &dyn FsAdapter, path: &Path, snapshot: &WorkflowSnapshot) -> Result<()> {
    let content =
        toml::to_string(snapshot).map_err(|e| Policy360Error::Serialization(e.to_string()))?;
    fs.write(path, &content)?;
    tracing::debug!("workflow snapshot saved");
    Ok(())
}

/// Reads a snapshot written by [`save_snapshot`].
///
/// # Returns
///
/// `Ok(None)` when no snapshot exists yet.
///
/// # Errors
///
/// Returns `Policy360Error::CorruptedState` if the file is not a valid
/// snapshot.
#[tracing::instrument(skip(fs), fields(path = %path.display()))]
pub fn load_snapshot(fs: &dyn FsAdapter, path: &Path) -> Result<Option<WorkflowSnapshot>> {
    if !fs.exists(path) {
        return Ok(None);
    }

    let content = fs.read_to_string(path)?;
    let snapshot: WorkflowSnapshot = toml::from_str(&content).map_err(|e| {
        tracing::warn!(error = %e, "failed to parse workflow snapshot");
        Policy360Error::CorruptedState(path.to_path_buf())
    })?;

    Ok(Some(snapshot))
}
