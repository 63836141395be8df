//! Context structures for report rendering.

use policy360_core::{STAGE_COUNT, Stage, StageDisplayData, WorkflowSnapshot, WorkflowTracker};
use serde::Serialize;

/// How a stage appears in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Active,
    Pending,
}

/// One row of the stage table, flattened for templates.
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// 1-based position in the lifecycle.
    pub position: usize,
    pub status: StageStatus,
    pub title: &'static str,
    pub tasks: Vec<&'static str>,
    pub completion: u8,
    pub stakeholders: u32,
    pub highlighted_tasks: usize,
}

impl StageView {
    fn new(stage: Stage, status: StageStatus, display: &StageDisplayData) -> Self {
        let info = stage.info();
        Self {
            key: stage.as_str(),
            label: info.label,
            icon: info.icon,
            description: info.description,
            position: stage.index() + 1,
            status,
            title: display.title,
            tasks: display.tasks.to_vec(),
            completion: display.completion,
            stakeholders: display.stakeholders,
            highlighted_tasks: display.highlighted_tasks(),
        }
    }
}

/// Data available to report templates.
///
/// # Examples
///
/// ```
/// use policy360_core::WorkflowTracker;
/// use policy360_report::ReportContext;
///
/// let mut tracker = WorkflowTracker::detached();
/// tracker.advance();
///
/// let ctx = ReportContext::from_tracker(&tracker).with_policy_title("Clean water");
/// assert_eq!(ctx.completed_count, 1);
/// assert_eq!(ctx.active.label, "Analysis");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub policy_title: Option<String>,
    /// RFC 3339 time of the underlying snapshot.
    pub updated_at: String,
    pub total: usize,
    pub completed_count: usize,
    /// At the terminal stage with every earlier stage completed.
    pub lifecycle_complete: bool,
    pub active: StageView,
    pub stages: Vec<StageView>,
}

impl ReportContext {
    /// Builds a context from a saved snapshot using the built-in display data.
    pub fn from_snapshot(snapshot: &WorkflowSnapshot) -> Self {
        Self::build(snapshot, StageDisplayData::defaults_for)
    }

    /// Builds a context from a live tracker, honoring its display overrides.
    pub fn from_tracker(tracker: &WorkflowTracker) -> Self {
        Self::build(&tracker.snapshot(), |stage| *tracker.display_data(stage))
    }

    #[must_use]
    pub fn with_policy_title(mut self, title: impl Into<String>) -> Self {
        self.policy_title = Some(title.into());
        self
    }

    fn build(
        snapshot: &WorkflowSnapshot,
        display: impl Fn(Stage) -> StageDisplayData,
    ) -> Self {
        let active_stage = snapshot.active_stage();

        let stages: Vec<StageView> = Stage::ALL
            .into_iter()
            .map(|stage| {
                let status = if stage == active_stage {
                    StageStatus::Active
                } else if snapshot.completed.contains(&stage) || stage < active_stage {
                    StageStatus::Completed
                } else {
                    StageStatus::Pending
                };
                StageView::new(stage, status, &display(stage))
            })
            .collect();

        let completed_count = Stage::ALL
            .into_iter()
            .filter(|stage| !stage.is_terminal() && snapshot.completed.contains(stage))
            .count();

        Self {
            policy_title: None,
            updated_at: snapshot.updated_at.to_rfc3339(),
            total: STAGE_COUNT,
            completed_count,
            lifecycle_complete: active_stage.is_terminal()
                && completed_count == STAGE_COUNT - 1,
            active: stages[active_stage.index()].clone(),
            stages,
        }
    }
}
