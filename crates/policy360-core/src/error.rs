//! Error types for Policy360 operations.
//!
//! This module defines the error variants that can occur outside the workflow
//! tracker itself: configuration loading, snapshot persistence, policy store
//! lookups, session handling and file system access. Tracker navigation never
//! fails, so none of these variants describe a stage transition.

use std::path::PathBuf;
use thiserror::Error;

/// Comprehensive error types for Policy360 operations.
///
/// Each variant represents a specific failure mode with relevant context,
/// enabling precise error handling and user-friendly error messages.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Policy360Error {
    // Workspace errors
    /// Workspace already initialized.
    #[error("workspace already initialized: {0}")]
    AlreadyInitialized(PathBuf),

    /// Workspace not initialized - user needs to run `policy360 init` first.
    #[error("workspace not initialized - run `policy360 init` first")]
    NotInitialized,

    /// Permission denied for the specified operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    // State errors
    /// Snapshot file is corrupted and cannot be parsed.
    #[error("corrupted state file: {0}")]
    CorruptedState(PathBuf),

    /// Unknown stage key supplied at a string boundary.
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    // Policy store errors
    /// Policy with the given id was not found.
    #[error("policy not found: {0}")]
    PolicyNotFound(String),

    /// Policy form failed validation.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    // Session errors
    /// Login rejected because the credentials are malformed.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Registration form failed validation.
    #[error("registration rejected: {0}")]
    RegistrationRejected(String),

    // File system errors
    /// Path not found in the file system.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// Error reading file.
    #[error("file read error: {0}")]
    FileReadError(String),

    /// Error writing file.
    #[error("file write error: {0}")]
    FileWriteError(String),

    // Config errors
    /// Invalid configuration detected.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Error parsing configuration file.
    #[error("config parse error: {0}")]
    ConfigParseError(String),

    // Serialization errors
    /// Value could not be encoded as TOML.
    #[error("serialization error: {0}")]
    Serialization(String),

    // IO and system errors
    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // Anyhow passthrough for rich context
    /// Generic error with context from anyhow.
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for Policy360 operations.
///
/// All fallible Policy360 operations return this type, using [`Policy360Error`]
/// for error variants.
pub type Result<T> = std::result::Result<T, Policy360Error>;
