//! Stage update notifications.
//!
//! The workflow tracker reports "in progress" and "completed" events to a
//! [`StageObserver`]. Observers are the host's business: the tracker only
//! emits, it never depends on what an observer does with the update.

use crate::error::{Policy360Error, Result};
use crate::stage::Stage;
use crate::tools::fs::FsAdapter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;

/// Notification emitted by the tracker for a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageUpdate {
    pub stage: Stage,
    pub payload: StagePayload,
}

/// What happened to the stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagePayload {
    /// Progress was saved without completing the stage.
    InProgress { updated_at: DateTime<Utc> },

    /// The stage was completed. Final success carries no timestamp.
    Completed { completed_at: Option<DateTime<Utc>> },
}

impl StageUpdate {
    pub fn in_progress(stage: Stage) -> Self {
        Self {
            stage,
            payload: StagePayload::InProgress {
                updated_at: Utc::now(),
            },
        }
    }

    pub fn completed(stage: Stage) -> Self {
        Self {
            stage,
            payload: StagePayload::Completed {
                completed_at: Some(Utc::now()),
            },
        }
    }

    pub fn final_success() -> Self {
        Self {
            stage: Stage::Success,
            payload: StagePayload::Completed { completed_at: None },
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.payload, StagePayload::Completed { .. })
    }

    /// Status label as shown to users and written to the journal.
    pub fn status(&self) -> &'static str {
        match self.payload {
            StagePayload::InProgress { .. } => "in-progress",
            StagePayload::Completed { .. } => "completed",
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.payload {
            StagePayload::InProgress { updated_at } => Some(updated_at),
            StagePayload::Completed { completed_at } => completed_at,
        }
    }
}

/// Receiver of tracker notifications.
///
/// Errors returned here are logged by the tracker and otherwise ignored; they
/// never roll back tracker state.
pub trait StageObserver: Send + Sync {
    fn on_stage_update(&self, update: &StageUpdate) -> Result<()>;
}

/// Observer that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn on_stage_update(&self, _update: &StageUpdate) -> Result<()> {
        Ok(())
    }
}

/// Observer that keeps every update in a shared in-memory log.
///
/// Clones share the same log, so a host can hand one clone to the tracker and
/// keep another to inspect what was emitted.
///
/// # Examples
///
/// ```
/// use policy360_core::observer::{RecordingObserver, StageObserver, StageUpdate};
/// use policy360_core::Stage;
///
/// let recorder = RecordingObserver::new();
/// recorder.on_stage_update(&StageUpdate::final_success()).unwrap();
/// assert_eq!(recorder.updates()[0].stage, Stage::Success);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    updates: Arc<Mutex<Vec<StageUpdate>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all updates received so far.
    pub fn updates(&self) -> Vec<StageUpdate> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.updates.lock().map(|u| u.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StageObserver for RecordingObserver {
    fn on_stage_update(&self, update: &StageUpdate) -> Result<()> {
        self.updates
            .lock()
            .map_err(|_| Policy360Error::Anyhow(anyhow::anyhow!("recording observer poisoned")))?
            .push(update.clone());
        Ok(())
    }
}

/// Observer that forwards updates over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<StageUpdate>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<StageUpdate>) -> Self {
        Self { tx }
    }
}

impl StageObserver for ChannelObserver {
    fn on_stage_update(&self, update: &StageUpdate) -> Result<()> {
        self.tx
            .send(update.clone())
            .map_err(|_| Policy360Error::Anyhow(anyhow::anyhow!("stage update receiver dropped")))
    }
}

/// One persisted journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub stage: Stage,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

impl From<&StageUpdate> for JournalEntry {
    fn from(update: &StageUpdate) -> Self {
        Self {
            stage: update.stage,
            status: update.status().to_string(),
            at: update.timestamp(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Journal {
    #[serde(default, rename = "entry")]
    entries: Vec<JournalEntry>,
}

/// Host-side observer appending every update to a TOML journal file.
pub struct JournalObserver {
    path: PathBuf,
    fs: Arc<dyn FsAdapter>,
}

impl JournalObserver {
    pub fn new(path: PathBuf, fs: Arc<dyn FsAdapter>) -> Self {
        Self { path, fs }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all entries written so far. A missing journal is empty.
    pub fn entries(&self) -> Result<Vec<JournalEntry>> {
        Ok(read_journal(&*self.fs, &self.path)?.entries)
    }
}

impl std::fmt::Debug for JournalObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalObserver")
            .field("path", &self.path)
            .field("fs", &"Arc<dyn FsAdapter>")
            .finish()
    }
}

impl StageObserver for JournalObserver {
    #[tracing::instrument(skip(self), fields(stage = %update.stage, status = update.status()))]
    fn on_stage_update(&self, update: &StageUpdate) -> Result<()> {
        let mut journal = read_journal(&*self.fs, &self.path)?;
        journal.entries.push(JournalEntry::from(update));

        let content = toml::to_string(&journal)
            .map_err(|e| Policy360Error::Serialization(e.to_string()))?;
        self.fs.write(&self.path, &content)?;

        tracing::debug!(entries = journal.entries.len(), "journal updated");
        Ok(())
    }
}

fn read_journal(fs: &dyn FsAdapter, path: &Path) -> Result<Journal> {
    if !fs.exists(path) {
        return Ok(Journal::default());
    }
    let content = fs.read_to_string(path)?;
    toml::from_str(&content).map_err(|_| Policy360Error::CorruptedState(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fs_mock::MockFsAdapter;

    #[test]
    fn test_should_describe_updates() {
        let saved = StageUpdate::in_progress(Stage::Analysis);
        assert_eq!(saved.status(), "in-progress");
        assert!(!saved.is_completed());
        assert!(saved.timestamp().is_some());

        let done = StageUpdate::completed(Stage::Analysis);
        assert_eq!(done.status(), "completed");
        assert!(done.is_completed());

        let success = StageUpdate::final_success();
        assert_eq!(success.stage, Stage::Success);
        assert!(success.is_completed());
        assert_eq!(success.timestamp(), None);
    }

    #[test]
    fn test_should_share_recording_between_clones() {
        let recorder = RecordingObserver::new();
        let handle = recorder.clone();
        assert!(handle.is_empty());

        recorder
            .on_stage_update(&StageUpdate::in_progress(Stage::Ideation))
            .unwrap();

        assert_eq!(handle.len(), 1);
        assert_eq!(handle.updates()[0].stage, Stage::Ideation);
    }

    #[test]
    fn test_should_forward_over_channel() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let observer = ChannelObserver::new(tx);

        observer
            .on_stage_update(&StageUpdate::completed(Stage::Monitoring))
            .unwrap();

        let received = rx.try_recv().unwrap();
        assert_eq!(received.stage, Stage::Monitoring);
        assert!(received.is_completed());
    }

    #[test]
    fn test_should_fail_when_channel_closed() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let observer = ChannelObserver::new(tx);
        assert!(observer.on_stage_update(&StageUpdate::final_success()).is_err());
    }

    #[test]
    fn test_should_append_journal_entries() {
        let fs = Arc::new(MockFsAdapter::new());
        let journal = JournalObserver::new(PathBuf::from("/ws/.policy360/journal.toml"), fs.clone());

        assert!(journal.entries().unwrap().is_empty());

        journal
            .on_stage_update(&StageUpdate::in_progress(Stage::Ideation))
            .unwrap();
        journal
            .on_stage_update(&StageUpdate::final_success())
            .unwrap();

        let entries = journal.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].stage, Stage::Ideation);
        assert_eq!(entries[0].status, "in-progress");
        assert!(entries[0].at.is_some());
        assert_eq!(entries[1].stage, Stage::Success);
        assert_eq!(entries[1].status, "completed");
        assert_eq!(entries[1].at, None);
    }

    #[test]
    fn test_should_reject_corrupted_journal() {
        let fs = Arc::new(MockFsAdapter::new());
        let path = PathBuf::from("/ws/journal.toml");
        fs.write(&path, "not [valid toml").unwrap();

        let journal = JournalObserver::new(path.clone(), fs);
        assert!(matches!(
            journal.entries(),
            Err(Policy360Error::CorruptedState(p)) if p == path
        ));
    }
}
