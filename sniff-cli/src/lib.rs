//! stacksniff CLI library.
//!
//! The `stacksniff` binary is a thin wrapper over this library; it is exposed
//! as a library to enable integration testing.
//!
//! # Modules
//!
//! - [`commands`]: `init` and `sniff`
//! - [`settings`]: flag and environment resolution
//! - [`stack_file`]: reading and merging the stack file
//! - [`report`]: JSON report
//! - [`output`], [`progress`], [`logging`]: console output and diagnostics

pub mod commands;
pub mod errors;
pub mod logging;
pub mod output;
pub mod progress;
pub mod report;
pub mod settings;
pub mod stack_file;

pub use errors::SniffError;
pub use report::SniffReport;
pub use settings::SniffSettings;
pub use stack_file::{StackFileError, WriteSummary};
