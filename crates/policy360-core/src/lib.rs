//! Policy360 Core - policy lifecycle tracking.
//!
//! This crate provides the six-stage policy workflow tracker together with
//! the pieces a host application needs around it: stage notifications,
//! resumable snapshots, an explicit user session, an in-memory policy store,
//! form validation and workspace configuration.
//!
//! # Architecture
//!
//! - [`stage`]: the closed set of lifecycle stages and their display data
//! - [`tracker`]: the workflow state machine
//! - [`observer`]: stage update notifications and shipped observers
//! - [`state`]: live workflow state and TOML snapshots
//! - [`session`]: login, registration and logout
//! - [`policy`]: policy records, selection and data imports
//! - [`validate`]: form and upload validation rules
//! - [`catalog`]: sector and data source reference tables
//! - [`config`]: workspace configuration
//! - [`tools`]: file system adapters
//!
//! # Example
//!
//! ```rust
//! use policy360_core::{RecordingObserver, Stage, WorkflowTracker};
//!
//! let recorder = RecordingObserver::new();
//! let mut tracker = WorkflowTracker::new(Box::new(recorder.clone()));
//!
//! tracker.advance();
//! tracker.advance();
//! tracker.retreat();
//! assert_eq!(tracker.active_stage(), Stage::Analysis);
//! assert_eq!(tracker.completed().len(), 2);
//!
//! tracker.mark_current_in_progress();
//! assert_eq!(recorder.len(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod observer;
pub mod policy;
pub mod session;
pub mod stage;
pub mod state;
pub mod tools;
pub mod tracker;
pub mod validate;

// Re-export core types for convenience
pub use config::{Policy360Config, ReportConfig, ValidationConfig, WorkflowConfig};
pub use error::{Policy360Error, Result};
pub use observer::{
    ChannelObserver, JournalEntry, JournalObserver, NoopObserver, RecordingObserver,
    StageObserver, StagePayload, StageUpdate,
};
pub use policy::{NewPolicy, Policy, PolicyStatus, PolicyStore, PolicyStoreObserver, PolicyUpdate};
pub use session::{ProfileUpdate, Registration, Session, User};
pub use stage::{STAGE_COUNT, STAGES, Stage, StageDisplayData, StageInfo};
pub use state::{WorkflowSnapshot, WorkflowState, load_snapshot, save_snapshot};
pub use tracker::{CurrentStage, WorkflowTracker};
