//! Policy lifecycle stages and their display data.
//!
//! The six stages form a closed, totally ordered set. Stage metadata lives in
//! the static [`STAGES`] table and the per-stage mock display values in
//! [`StageDisplayData::defaults_for`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Policy360Error;

/// Number of stages in the policy lifecycle.
pub const STAGE_COUNT: usize = 6;

/// Policy lifecycle stage.
///
/// Stages are traversed strictly in declaration order. `Success` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Define policy objectives and scope.
    Ideation,

    /// Analyze data and stakeholders.
    Analysis,

    /// Execute policy plan.
    Implementation,

    /// Track progress and metrics.
    Monitoring,

    /// Assess impact and outcomes.
    Evaluation,

    /// Policy achieved objectives.
    Success,
}

impl Stage {
    /// All stages in lifecycle order.
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::Ideation,
        Stage::Analysis,
        Stage::Implementation,
        Stage::Monitoring,
        Stage::Evaluation,
        Stage::Success,
    ];

    /// Returns the stable key used in persisted files and notifications.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Ideation => "ideation",
            Stage::Analysis => "analysis",
            Stage::Implementation => "implementation",
            Stage::Monitoring => "monitoring",
            Stage::Evaluation => "evaluation",
            Stage::Success => "success",
        }
    }

    /// Zero-based position of the stage in the lifecycle.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Stage at the given position, if any.
    pub fn from_index(index: usize) -> Option<Stage> {
        Self::ALL.get(index).copied()
    }

    /// The following stage, or `None` for `Success`.
    pub fn next(&self) -> Option<Stage> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding stage, or `None` for `Ideation`.
    pub fn previous(&self) -> Option<Stage> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Whether this is the terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Success)
    }

    /// Static metadata for this stage.
    pub fn info(&self) -> &'static StageInfo {
        &STAGES[self.index()]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Policy360Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| Policy360Error::UnknownStage(s.to_string()))
    }
}

/// Static metadata describing a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInfo {
    pub stage: Stage,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

/// Stage metadata in lifecycle order.
pub static STAGES: [StageInfo; STAGE_COUNT] = [
    StageInfo {
        stage: Stage::Ideation,
        label: "Ideation",
        icon: "💡",
        color: "#FF9800",
        description: "Define policy objectives and scope",
    },
    StageInfo {
        stage: Stage::Analysis,
        label: "Analysis",
        icon: "📊",
        color: "#2196F3",
        description: "Analyze data and stakeholders",
    },
    StageInfo {
        stage: Stage::Implementation,
        label: "Implementation",
        icon: "🚀",
        color: "#4CAF50",
        description: "Execute policy plan",
    },
    StageInfo {
        stage: Stage::Monitoring,
        label: "Monitoring",
        icon: "📈",
        color: "#9C27B0",
        description: "Track progress and metrics",
    },
    StageInfo {
        stage: Stage::Evaluation,
        label: "Evaluation",
        icon: "📝",
        color: "#F44336",
        description: "Assess impact and outcomes",
    },
    StageInfo {
        stage: Stage::Success,
        label: "Success",
        icon: "🏆",
        color: "#FFC107",
        description: "Policy achieved objectives",
    },
];

/// Display-only data attached to a stage.
///
/// `completion` is a static display value supplied by the caller (or the
/// built-in defaults). It is never derived from which stages are completed
/// and it says nothing about which of `tasks` are actually done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDisplayData {
    pub title: &'static str,
    pub tasks: &'static [&'static str],
    /// Percentage in `0..=100`.
    pub completion: u8,
    pub stakeholders: u32,
}

/// Visual tone for a completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTone {
    /// 75% and above.
    Success,
    /// 50% up to 75%.
    Warning,
    Neutral,
}

impl StageDisplayData {
    /// Built-in mock display values for a stage.
    pub fn defaults_for(stage: Stage) -> StageDisplayData {
        match stage {
            Stage::Ideation => StageDisplayData {
                title: "Policy Ideation & Planning",
                tasks: &[
                    "Define policy objectives",
                    "Identify stakeholders",
                    "Set timeline and milestones",
                    "Allocate resources",
                    "Risk assessment",
                ],
                completion: 75,
                stakeholders: 8,
            },
            Stage::Analysis => StageDisplayData {
                title: "Data Analysis & Research",
                tasks: &[
                    "Collect relevant data",
                    "Statistical analysis",
                    "SWOT analysis",
                    "Cost-benefit analysis",
                    "Impact assessment",
                ],
                completion: 60,
                stakeholders: 12,
            },
            Stage::Implementation => StageDisplayData {
                title: "Implementation Planning",
                tasks: &[
                    "Action plan development",
                    "Team assignment",
                    "Budget allocation",
                    "Communication strategy",
                    "Training programs",
                ],
                completion: 40,
                stakeholders: 15,
            },
            Stage::Monitoring => StageDisplayData {
                title: "Monitoring & Reporting",
                tasks: &[
                    "KPI tracking",
                    "Progress reports",
                    "Issue identification",
                    "Stakeholder updates",
                    "Adjustment planning",
                ],
                completion: 30,
                stakeholders: 10,
            },
            Stage::Evaluation => StageDisplayData {
                title: "Evaluation & Learning",
                tasks: &[
                    "Outcome measurement",
                    "Impact analysis",
                    "Lessons learned",
                    "Recommendations",
                    "Future planning",
                ],
                completion: 20,
                stakeholders: 8,
            },
            Stage::Success => StageDisplayData {
                title: "Policy Success Achieved",
                tasks: &[
                    "Objectives met",
                    "Stakeholder satisfaction",
                    "Sustainable impact",
                    "Knowledge transfer",
                    "Scaling opportunities",
                ],
                completion: 10,
                stakeholders: 5,
            },
        }
    }

    /// Number of leading tasks drawn as ticked for the display percentage.
    ///
    /// Rounds up, so any non-zero percentage highlights at least one task.
    pub fn highlighted_tasks(&self) -> usize {
        let len = self.tasks.len();
        let pct = usize::from(self.completion.min(100));
        (len * pct).div_ceil(100).min(len)
    }

    pub fn tone(&self) -> CompletionTone {
        match self.completion {
            75.. => CompletionTone::Success,
            50..=74 => CompletionTone::Warning,
            _ => CompletionTone::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_keep_table_in_enum_order() {
        for (index, info) in STAGES.iter().enumerate() {
            assert_eq!(info.stage.index(), index);
            assert_eq!(Stage::from_index(index), Some(info.stage));
        }
        assert_eq!(Stage::from_index(STAGE_COUNT), None);
    }

    #[test]
    fn test_should_walk_neighbours() {
        assert_eq!(Stage::Ideation.previous(), None);
        assert_eq!(Stage::Ideation.next(), Some(Stage::Analysis));
        assert_eq!(Stage::Evaluation.next(), Some(Stage::Success));
        assert_eq!(Stage::Success.next(), None);
        assert!(Stage::Success.is_terminal());
        assert!(!Stage::Evaluation.is_terminal());
    }

    #[test]
    fn test_should_parse_stage_keys() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
        assert!(matches!(
            "launch".parse::<Stage>(),
            Err(Policy360Error::UnknownStage(key)) if key == "launch"
        ));
    }

    #[test]
    fn test_should_display_stage_key() {
        assert_eq!(format!("{}", Stage::Monitoring), "monitoring");
        assert_eq!(Stage::Monitoring.info().label, "Monitoring");
    }

    #[test]
    fn test_should_highlight_tasks_from_completion() {
        let ideation = StageDisplayData::defaults_for(Stage::Ideation);
        assert_eq!(ideation.highlighted_tasks(), 4);

        let analysis = StageDisplayData::defaults_for(Stage::Analysis);
        assert_eq!(analysis.highlighted_tasks(), 3);

        let success = StageDisplayData::defaults_for(Stage::Success);
        assert_eq!(success.highlighted_tasks(), 1);

        let empty = StageDisplayData {
            completion: 0,
            ..success
        };
        assert_eq!(empty.highlighted_tasks(), 0);
    }

    #[test]
    fn test_should_pick_completion_tone() {
        assert_eq!(
            StageDisplayData::defaults_for(Stage::Ideation).tone(),
            CompletionTone::Success
        );
        assert_eq!(
            StageDisplayData::defaults_for(Stage::Analysis).tone(),
            CompletionTone::Warning
        );
        assert_eq!(
            StageDisplayData::defaults_for(Stage::Monitoring).tone(),
            CompletionTone::Neutral
        );
    }
}
