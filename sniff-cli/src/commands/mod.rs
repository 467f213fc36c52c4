//! CLI commands for stacksniff.
//!
//! - `stacksniff init` - Write an example stack file
//! - `stacksniff sniff` - Detect the project's stack and merge it into the stack file

pub mod init;
pub mod sniff;

pub use init::{InitError, InitOptions, run_init};
pub use sniff::{SniffOptions, run_sniff};
