//! Integration tests for the policy workflow tracker.
//!
//! Walks the tracker through complete lifecycles with the shipped observers
//! attached, the way a host application would.

use policy360_core::tools::StdFsAdapter;
use policy360_core::{
    ChannelObserver, JournalObserver, NewPolicy, PolicyStatus, PolicyStore, PolicyStoreObserver,
    RecordingObserver, STAGE_COUNT, Stage, StagePayload, WorkflowTracker,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[test]
fn test_full_lifecycle_notifies_each_stage_in_order() {
    let recorder = RecordingObserver::new();
    let mut tracker = WorkflowTracker::new(Box::new(recorder.clone()));

    while !tracker.is_last() {
        tracker.mark_current_in_progress();
        tracker.complete_current_and_advance();
    }
    assert!(tracker.mark_final_success());

    let updates = recorder.updates();
    assert_eq!(updates.len(), (STAGE_COUNT - 1) * 2 + 1);

    let completed: Vec<Stage> = updates
        .iter()
        .filter(|u| u.is_completed())
        .map(|u| u.stage)
        .collect();
    assert_eq!(completed, Stage::ALL.to_vec());

    assert_eq!(tracker.active_stage(), Stage::Success);
    assert_eq!(tracker.completed().len(), STAGE_COUNT - 1);
    assert!(!tracker.is_completed(Stage::Success));
}

#[test]
fn test_scenario_advance_then_retreat() {
    let mut tracker = WorkflowTracker::detached();

    tracker.advance();
    tracker.advance();
    tracker.advance();
    assert_eq!(tracker.active_index(), 3);
    assert_eq!(tracker.active_stage(), Stage::Monitoring);

    tracker.retreat();
    assert_eq!(tracker.active_index(), 2);
    assert_eq!(
        tracker.completed().iter().copied().collect::<Vec<_>>(),
        vec![Stage::Ideation, Stage::Analysis, Stage::Implementation]
    );
}

#[test]
fn test_final_success_payload_has_no_timestamp() {
    let recorder = RecordingObserver::new();
    let mut tracker = WorkflowTracker::resume(5, [], Box::new(recorder.clone()));

    tracker.mark_final_success();

    let updates = recorder.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].stage, Stage::Success);
    assert_eq!(
        updates[0].payload,
        StagePayload::Completed { completed_at: None }
    );
    assert_eq!(tracker.active_index(), 5);
}

#[test]
fn test_channel_observer_delivers_to_async_consumer() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut tracker = WorkflowTracker::new(Box::new(ChannelObserver::new(tx)));

    tracker.mark_current_in_progress();
    tracker.complete_current_and_advance();
    drop(tracker);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let received = runtime.block_on(async move {
        let mut received = Vec::new();
        while let Some(update) = rx.recv().await {
            received.push((update.stage, update.status()));
        }
        received
    });

    assert_eq!(
        received,
        vec![
            (Stage::Ideation, "in-progress"),
            (Stage::Ideation, "completed"),
        ]
    );
}

#[test]
fn test_journal_observer_persists_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join(".policy360/journal.toml");
    let fs = Arc::new(StdFsAdapter::new());

    let mut tracker = WorkflowTracker::new(Box::new(JournalObserver::new(
        journal_path.clone(),
        fs.clone(),
    )));
    tracker.mark_current_in_progress();
    tracker.complete_current_and_advance();

    let journal = JournalObserver::new(journal_path.clone(), fs);
    let entries = journal.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].stage, Stage::Ideation);
    assert_eq!(entries[1].status, "completed");

    let raw = std::fs::read_to_string(&journal_path).unwrap();
    assert!(raw.contains("[[entry]]"));
}

#[test]
fn test_policy_store_follows_tracker() {
    let store = Arc::new(Mutex::new(PolicyStore::new()));
    let id = store
        .lock()
        .unwrap()
        .create(NewPolicy {
            title: "Rural broadband".to_string(),
            description: "Connect every district headquarters to fibre within three years of launch."
                .to_string(),
            sector: "technology".to_string(),
            objectives: vec!["Fibre to districts".to_string()],
        })
        .unwrap()
        .id
        .clone();

    let mut tracker =
        WorkflowTracker::new(Box::new(PolicyStoreObserver::new(store.clone(), id.clone())));

    tracker.complete_current_and_advance();
    tracker.complete_current_and_advance();
    {
        let store = store.lock().unwrap();
        let policy = store.get(&id).unwrap();
        assert_eq!(policy.stage, Stage::Implementation);
        assert_eq!(policy.status, PolicyStatus::Active);
        assert_eq!(policy.progress, 33);
    }

    while tracker.advance() {}
    tracker.mark_final_success();

    let store = store.lock().unwrap();
    let policy = store.get(&id).unwrap();
    assert_eq!(policy.status, PolicyStatus::Completed);
    assert_eq!(policy.progress, 100);
}
