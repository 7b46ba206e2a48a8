//! Filesystem collaborators for setconf
//!
//! Whole-file reads, atomic whole-file writes and loading of syntax
//! definitions. No locking is done: two processes editing the same file
//! at once may lose an update, but never leave a partially written file.

pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
