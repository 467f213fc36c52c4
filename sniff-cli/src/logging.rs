//! Diagnostic logging setup.
//!
//! Detection code reports through `tracing`. This module installs a
//! formatting subscriber on stderr so that stdout stays clean for console
//! and JSON output.
//!
//! `RUST_LOG` always wins. Without it the level follows the CLI flags:
//!
//! | Flags   | Level   |
//! |---------|---------|
//! | `-q`    | `error` |
//! | (none)  | `warn`  |
//! | `-v`    | `info`  |
//! | `-vv`   | `debug` |

use tracing_subscriber::EnvFilter;

/// The default filter directive for the given flags.
pub fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
