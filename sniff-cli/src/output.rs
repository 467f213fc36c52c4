//! Console output helpers.
//!
//! Everything the user reads on a normal run goes through here so that
//! `--quiet` and `--verbose` apply uniformly. Diagnostics for developers go
//! through `tracing` instead.

use console::{Emoji, style};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Global quiet mode flag - when true, suppresses all output except errors.
static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Global verbosity level (0 = normal, 1+ = verbose).
static VERBOSITY: AtomicU8 = AtomicU8::new(0);

pub static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "OK ");
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "!! ");
pub static ERROR: Emoji<'_, '_> = Emoji("❌ ", "ERR ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static NOSE: Emoji<'_, '_> = Emoji("👃 ", "");
pub static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "- ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Set quiet mode globally.
///
/// When quiet mode is enabled, all output functions except `error()` will be suppressed.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::SeqCst);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::SeqCst)
}

/// Set verbosity level globally.
pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::SeqCst);
}

pub fn get_verbosity() -> u8 {
    VERBOSITY.load(Ordering::SeqCst)
}

/// Check if verbose mode is enabled (verbosity level >= 1).
pub fn is_verbose() -> bool {
    get_verbosity() >= 1
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{}{}", SUCCESS, style(msg).green());
    }
}

/// Print a warning message (suppressed in quiet mode).
pub fn warning(msg: &str) {
    if !is_quiet() {
        eprintln!("{}{}", WARNING, style(msg).yellow());
    }
}

/// Print an error message (NEVER suppressed, even in quiet mode).
pub fn error(msg: &str) {
    eprintln!("{}{}", ERROR, style(msg).red().bold());
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{}{}", INFO, style(msg).cyan());
    }
}

/// Print a verbose message (only shown when verbosity >= 1 and not in quiet mode).
pub fn verbose(msg: &str) {
    if is_verbose() && !is_quiet() {
        println!("{}", style(msg).dim());
    }
}

/// Print a plain line behind an emoji marker (suppressed in quiet mode).
pub fn line(marker: &Emoji<'_, '_>, msg: &str) {
    if !is_quiet() {
        println!("{}{}", marker, msg);
    }
}

/// Print one detected `label -> value` pair (suppressed in quiet mode).
pub fn item(label: &str, value: &str) {
    if !is_quiet() {
        println!("  {}{} → {}", LINK, style(label).bold(), value);
    }
}
