//! Report engine trait.

use crate::error::Result;
use serde::Serialize;

/// Renders named report templates against a serializable context.
///
/// # Examples
///
/// ```
/// use policy360_report::{ReportContext, ReportEngine, ReportManager};
/// use policy360_core::WorkflowTracker;
///
/// let manager = ReportManager::builtin();
/// let ctx = ReportContext::from_tracker(&WorkflowTracker::detached());
/// let text = manager.render("stage", &ctx)?;
/// assert!(text.contains("Ideation"));
/// # Ok::<(), policy360_report::ReportError>(())
/// ```
pub trait ReportEngine {
    /// Renders `template` (name without extension) with `ctx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist or fails to render.
    fn render<T: Serialize>(&self, template: &str, ctx: &T) -> Result<String>;

    /// Names of all renderable templates, sorted.
    fn list_templates(&self) -> Result<Vec<String>>;
}
