//! File system adapters.
//!
//! Everything Policy360 persists (configuration, workflow snapshots, the stage
//! journal) goes through [`fs::FsAdapter`], so hosts and tests can swap the
//! real file system for the in-memory [`fs_mock::MockFsAdapter`].

pub mod fs;
pub mod fs_impl;
pub mod fs_mock;

pub use fs::FsAdapter;
pub use fs_impl::StdFsAdapter;
pub use fs_mock::MockFsAdapter;
