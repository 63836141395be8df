//! Report rendering for Policy360.
//!
//! Renders workflow progress through minijinja templates. Two templates ship
//! with the crate (`stage` and `final_report`); a directory of `*.j2` files
//! can replace them.
//!
//! # Examples
//!
//! ```
//! use policy360_core::WorkflowTracker;
//! use policy360_report::{ReportContext, ReportEngine, ReportManager};
//!
//! let mut tracker = WorkflowTracker::detached();
//! tracker.advance();
//!
//! let manager = ReportManager::builtin();
//! let report = manager.render("final_report", &ReportContext::from_tracker(&tracker))?;
//! assert!(report.contains("Analysis [active]"));
//! # Ok::<(), policy360_report::ReportError>(())
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod manager;

pub use context::{ReportContext, StageStatus, StageView};
pub use engine::ReportEngine;
pub use error::{ReportError, Result};
pub use manager::ReportManager;
