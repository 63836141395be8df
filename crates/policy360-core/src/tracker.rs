//! Policy workflow tracker.
//!
//! A linear state machine over the six [`Stage`]s. Navigation is total:
//! stepping past either end is a no-op rather than an error. Notifications
//! go to a [`StageObserver`]; a failing observer is logged and never changes
//! tracker state.

use crate::observer::{NoopObserver, StageObserver, StageUpdate};
use crate::stage::{STAGE_COUNT, Stage, StageDisplayData, StageInfo};
use crate::state::{WorkflowSnapshot, WorkflowState};
use std::collections::BTreeSet;

/// The active stage together with what the host should render for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentStage<'a> {
    pub info: &'static StageInfo,
    pub display: &'a StageDisplayData,
    /// 1-based position, for "Stage 3 of 6" style labels.
    pub position: usize,
    pub total: usize,
}

/// Workflow tracker for a single policy.
///
/// # Examples
///
/// ```
/// use policy360_core::{RecordingObserver, Stage, WorkflowTracker};
///
/// let recorder = RecordingObserver::new();
/// let mut tracker = WorkflowTracker::new(Box::new(recorder.clone()));
///
/// tracker.complete_current_and_advance();
/// assert_eq!(tracker.current_stage().info.stage, Stage::Analysis);
/// assert_eq!(recorder.updates()[0].stage, Stage::Ideation);
/// ```
pub struct WorkflowTracker {
    state: WorkflowState,
    display: [StageDisplayData; STAGE_COUNT],
    observer: Box<dyn StageObserver>,
}

impl WorkflowTracker {
    /// Creates a tracker at `Ideation` with nothing completed.
    pub fn new(observer: Box<dyn StageObserver>) -> Self {
        Self::with_state(WorkflowState::new(), observer)
    }

    /// Creates a tracker that drops every notification.
    pub fn detached() -> Self {
        Self::new(Box::new(NoopObserver))
    }

    /// Resumes at a saved position. The index is clamped to the terminal
    /// stage.
    pub fn resume(
        active_index: usize,
        completed: impl IntoIterator<Item = Stage>,
        observer: Box<dyn StageObserver>,
    ) -> Self {
        Self::with_state(WorkflowState::resume(active_index, completed), observer)
    }

    pub fn from_snapshot(snapshot: &WorkflowSnapshot, observer: Box<dyn StageObserver>) -> Self {
        Self::with_state(WorkflowState::from(snapshot), observer)
    }

    fn with_state(state: WorkflowState, observer: Box<dyn StageObserver>) -> Self {
        Self {
            state,
            display: Stage::ALL.map(StageDisplayData::defaults_for),
            observer,
        }
    }

    /// Replaces the display values for the given stages.
    ///
    /// Display values are caller-owned presentation data; they are not kept
    /// in sync with the completed set.
    pub fn with_display_overrides(
        mut self,
        overrides: impl IntoIterator<Item = (Stage, StageDisplayData)>,
    ) -> Self {
        for (stage, data) in overrides {
            self.display[stage.index()] = data;
        }
        self
    }

    pub fn active_index(&self) -> usize {
        self.state.active_index()
    }

    pub fn active_stage(&self) -> Stage {
        self.state.active_stage()
    }

    pub fn completed(&self) -> &BTreeSet<Stage> {
        self.state.completed()
    }

    pub fn is_completed(&self, stage: Stage) -> bool {
        self.state.is_completed(stage)
    }

    pub fn is_first(&self) -> bool {
        self.active_index() == 0
    }

    pub fn is_last(&self) -> bool {
        self.active_index() == STAGE_COUNT - 1
    }

    /// Whether the stepper should draw `stage` as done: explicitly completed
    /// or behind the active stage.
    pub fn is_visually_done(&self, stage: Stage) -> bool {
        self.is_completed(stage) || stage.index() < self.active_index()
    }

    pub fn display_data(&self, stage: Stage) -> &StageDisplayData {
        &self.display[stage.index()]
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.state.snapshot()
    }

    /// Stage metadata and display data at the active index.
    pub fn current_stage(&self) -> CurrentStage<'_> {
        let stage = self.active_stage();
        CurrentStage {
            info: stage.info(),
            display: self.display_data(stage),
            position: stage.index() + 1,
            total: STAGE_COUNT,
        }
    }

    /// Marks the active stage complete and moves to the next one.
    ///
    /// Does not notify the observer. Returns `false` (and changes nothing) at
    /// the terminal stage.
    pub fn advance(&mut self) -> bool {
        let from = self.active_stage();
        let moved = self.state.advance();
        if moved {
            tracing::debug!(from = %from, to = %self.active_stage(), "advanced stage");
        }
        moved
    }

    /// Moves back one stage without touching the completed set.
    ///
    /// Returns `false` (and changes nothing) at the first stage.
    pub fn retreat(&mut self) -> bool {
        let from = self.active_stage();
        let moved = self.state.retreat();
        if moved {
            tracing::debug!(from = %from, to = %self.active_stage(), "retreated stage");
        }
        moved
    }

    /// Reports the active stage as in progress. State is unchanged.
    pub fn mark_current_in_progress(&mut self) {
        self.notify(&StageUpdate::in_progress(self.active_stage()));
    }

    /// Reports the active stage as completed, then advances.
    ///
    /// The observer sees the update before the index moves. Returns whether
    /// the advance moved the tracker.
    pub fn complete_current_and_advance(&mut self) -> bool {
        self.notify(&StageUpdate::completed(self.active_stage()));
        self.advance()
    }

    /// Reports final success. Only acts at the terminal stage and never
    /// advances.
    ///
    /// Returns `false` without notifying when called elsewhere.
    pub fn mark_final_success(&mut self) -> bool {
        if !self.is_last() {
            tracing::debug!(stage = %self.active_stage(), "final success ignored before terminal stage");
            return false;
        }
        self.notify(&StageUpdate::final_success());
        true
    }

    fn notify(&self, update: &StageUpdate) {
        tracing::info!(stage = %update.stage, status = update.status(), "stage update");
        if let Err(e) = self.observer.on_stage_update(update) {
            tracing::warn!(stage = %update.stage, error = %e, "stage observer failed");
        }
    }
}

impl Default for WorkflowTracker {
    fn default() -> Self {
        Self::detached()
    }
}

impl std::fmt::Debug for WorkflowTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowTracker")
            .field("state", &self.state)
            .field("observer", &"Box<dyn StageObserver>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Policy360Error, Result};
    use crate::observer::{RecordingObserver, StagePayload};
    use std::sync::{Arc, Mutex};

    fn recorded() -> (WorkflowTracker, RecordingObserver) {
        let recorder = RecordingObserver::new();
        (WorkflowTracker::new(Box::new(recorder.clone())), recorder)
    }

    #[test]
    fn test_should_start_at_ideation() {
        let tracker = WorkflowTracker::detached();
        assert_eq!(tracker.active_index(), 0);
        assert_eq!(tracker.active_stage(), Stage::Ideation);
        assert!(tracker.completed().is_empty());
        assert!(tracker.is_first());
        assert!(!tracker.is_last());
    }

    #[test]
    fn test_should_advance_three_times_to_monitoring() {
        let mut tracker = WorkflowTracker::detached();
        for _ in 0..3 {
            assert!(tracker.advance());
        }

        assert_eq!(tracker.active_index(), 3);
        assert_eq!(tracker.active_stage(), Stage::Monitoring);
        assert_eq!(
            tracker.completed().iter().copied().collect::<Vec<_>>(),
            vec![Stage::Ideation, Stage::Analysis, Stage::Implementation]
        );
    }

    #[test]
    fn test_should_keep_completed_on_retreat() {
        let mut tracker = WorkflowTracker::resume(
            3,
            [Stage::Ideation, Stage::Analysis, Stage::Implementation],
            Box::new(NoopObserver),
        );
        let before = tracker.completed().clone();

        assert!(tracker.retreat());

        assert_eq!(tracker.active_index(), 2);
        assert_eq!(tracker.completed(), &before);
    }

    #[test]
    fn test_should_ignore_advance_at_terminal_stage() {
        let mut tracker = WorkflowTracker::resume(5, Stage::ALL.into_iter().take(5), Box::new(NoopObserver));
        let before = tracker.state().clone();

        assert!(!tracker.advance());
        assert!(!tracker.advance());

        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_should_ignore_retreat_at_first_stage() {
        let mut tracker = WorkflowTracker::detached();
        let before = tracker.state().clone();

        assert!(!tracker.retreat());

        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn test_advance_should_not_notify() {
        let (mut tracker, recorder) = recorded();
        tracker.advance();
        tracker.retreat();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_should_notify_in_progress_without_moving() {
        let (mut tracker, recorder) = recorded();
        tracker.advance();

        tracker.mark_current_in_progress();

        let updates = recorder.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].stage, Stage::Analysis);
        assert!(matches!(updates[0].payload, StagePayload::InProgress { .. }));
        assert_eq!(tracker.active_index(), 1);
        assert_eq!(tracker.completed().len(), 1);
    }

    #[test]
    fn test_should_notify_final_success_once_at_terminal_stage() {
        let (mut tracker, recorder) = recorded();
        for _ in 0..5 {
            tracker.advance();
        }

        assert!(tracker.mark_final_success());

        let updates = recorder.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0], StageUpdate::final_success());
        assert_eq!(tracker.active_index(), 5);
    }

    #[test]
    fn test_should_ignore_final_success_before_terminal_stage() {
        let (mut tracker, recorder) = recorded();
        tracker.advance();

        assert!(!tracker.mark_final_success());

        assert!(recorder.is_empty());
        assert_eq!(tracker.active_index(), 1);
    }

    /// Records the stage and completion flag of each update.
    struct IndexProbe {
        seen: Arc<Mutex<Vec<(Stage, bool)>>>,
    }

    impl StageObserver for IndexProbe {
        fn on_stage_update(&self, update: &StageUpdate) -> Result<()> {
            self.seen.lock().unwrap().push((update.stage, update.is_completed()));
            Ok(())
        }
    }

    #[test]
    fn test_should_notify_completion_before_advancing() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tracker = WorkflowTracker::resume(
            4,
            [Stage::Ideation, Stage::Analysis, Stage::Implementation, Stage::Monitoring],
            Box::new(IndexProbe { seen: seen.clone() }),
        );

        assert!(tracker.complete_current_and_advance());

        assert_eq!(seen.lock().unwrap().as_slice(), &[(Stage::Evaluation, true)]);
        assert_eq!(tracker.active_index(), 5);
        assert!(tracker.is_completed(Stage::Evaluation));
    }

    #[test]
    fn test_should_notify_completion_even_at_terminal_stage() {
        let (mut tracker, recorder) = recorded();
        for _ in 0..5 {
            tracker.advance();
        }

        assert!(!tracker.complete_current_and_advance());

        assert_eq!(recorder.len(), 1);
        assert_eq!(tracker.active_index(), 5);
    }

    struct FailingObserver;

    impl StageObserver for FailingObserver {
        fn on_stage_update(&self, _update: &StageUpdate) -> Result<()> {
            Err(Policy360Error::FileWriteError("disk full".to_string()))
        }
    }

    #[test]
    fn test_should_survive_failing_observer() {
        let mut tracker = WorkflowTracker::new(Box::new(FailingObserver));

        assert!(tracker.complete_current_and_advance());

        assert_eq!(tracker.active_index(), 1);
        assert!(tracker.is_completed(Stage::Ideation));
    }

    #[test]
    fn test_should_never_leave_bounds_or_shrink_completed() {
        let mut tracker = WorkflowTracker::detached();
        let ops: [fn(&mut WorkflowTracker); 4] = [
            |t| {
                t.advance();
            },
            |t| {
                t.retreat();
            },
            |t| {
                t.complete_current_and_advance();
            },
            |t| t.mark_current_in_progress(),
        ];

        let mut last_len = 0;
        // Deterministic walk covering long forward and backward runs.
        for step in 0..200usize {
            let op = ops[(step * 7 + step / 13) % ops.len()];
            op(&mut tracker);

            assert!(tracker.active_index() < STAGE_COUNT);
            assert!(tracker.completed().len() >= last_len);
            last_len = tracker.completed().len();
        }
    }

    #[test]
    fn test_should_describe_current_stage() {
        let mut tracker = WorkflowTracker::detached();
        tracker.advance();

        let current = tracker.current_stage();
        assert_eq!(current.info.stage, Stage::Analysis);
        assert_eq!(current.info.label, "Analysis");
        assert_eq!(current.display.title, "Data Analysis & Research");
        assert_eq!(current.display.completion, 60);
        assert_eq!(current.display.stakeholders, 12);
        assert_eq!((current.position, current.total), (2, 6));
    }

    #[test]
    fn test_should_use_display_overrides_without_deriving() {
        let base = StageDisplayData::defaults_for(Stage::Ideation);
        let mut tracker = WorkflowTracker::detached().with_display_overrides([(
            Stage::Ideation,
            StageDisplayData {
                completion: 5,
                stakeholders: 2,
                ..base
            },
        )]);

        assert_eq!(tracker.current_stage().display.completion, 5);
        tracker.advance();
        assert_eq!(tracker.display_data(Stage::Ideation).completion, 5);
        assert_eq!(tracker.display_data(Stage::Ideation).stakeholders, 2);
    }

    #[test]
    fn test_should_treat_passed_stages_as_visually_done() {
        let mut tracker = WorkflowTracker::resume(2, [], Box::new(NoopObserver));
        assert!(tracker.is_visually_done(Stage::Ideation));
        assert!(!tracker.is_completed(Stage::Ideation));
        assert!(!tracker.is_visually_done(Stage::Implementation));

        tracker.advance();
        assert!(tracker.is_visually_done(Stage::Implementation));
    }

    #[test]
    fn test_should_resume_from_snapshot() {
        let mut original = WorkflowTracker::detached();
        original.advance();
        original.advance();
        original.retreat();

        let resumed = WorkflowTracker::from_snapshot(&original.snapshot(), Box::new(NoopObserver));

        assert_eq!(resumed.state(), original.state());
    }
}
