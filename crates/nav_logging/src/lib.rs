#![deny(missing_docs)]
//! Shared logging utilities for the chapter navigator workspace.
//!
//! This crate provides the `nav_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every record is
//! prefixed with the synchronization pass it was emitted from, which makes
//! debounced bursts easy to follow in a browser console.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current synchronization pass number.
    static SYNC_PASS: Cell<u64> = const { Cell::new(0) };
}

/// Sets the synchronization pass number for the current thread.
/// The synchronizer calls this at the start of every pass.
pub fn set_sync_pass(pass: u64) {
    SYNC_PASS.with(|v| v.set(pass));
}

/// Retrieves the synchronization pass number for the current thread.
/// Returns 0 before the first pass has run.
pub fn current_sync_pass() -> u64 {
    SYNC_PASS.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current pass.
#[macro_export]
macro_rules! nav_trace {
    ($($arg:tt)*) => {{
        log::trace!("[pass {}] {}", $crate::current_sync_pass(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current pass.
#[macro_export]
macro_rules! nav_debug {
    ($($arg:tt)*) => {{
        log::debug!("[pass {}] {}", $crate::current_sync_pass(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current pass.
#[macro_export]
macro_rules! nav_info {
    ($($arg:tt)*) => {{
        log::info!("[pass {}] {}", $crate::current_sync_pass(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current pass.
#[macro_export]
macro_rules! nav_warn {
    ($($arg:tt)*) => {{
        log::warn!("[pass {}] {}", $crate::current_sync_pass(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current pass.
#[macro_export]
macro_rules! nav_error {
    ($($arg:tt)*) => {{
        log::error!("[pass {}] {}", $crate::current_sync_pass(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
#[cfg(not(target_family = "wasm"))]
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{current_sync_pass, set_sync_pass};

    #[test]
    fn pass_number_is_per_thread() {
        set_sync_pass(7);
        assert_eq!(current_sync_pass(), 7);

        let other = std::thread::spawn(current_sync_pass).join().unwrap();
        assert_eq!(other, 0);
    }
}
