//! Error types for the report crate.

use std::path::PathBuf;

/// Errors that can occur while rendering reports.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// No template with this name is registered or present on disk.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The template failed to render.
    #[error("template render error: {0}")]
    TemplateRenderError(String),

    /// Template directory does not exist or is not a directory.
    #[error("template directory not found: {0}")]
    TemplateDirectoryNotFound(PathBuf),

    /// Template directory listing failed.
    #[error("failed to list templates in {path}")]
    TemplateListError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
