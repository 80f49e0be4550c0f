//! External process abstraction layer
//!
//! Generators that need data from outside the process (git history) never
//! spawn commands themselves. They go through the [ProcessOutput] trait so
//! the OS-backed binding can be swapped for a scripted one in tests.
//!
//! - [runner::SystemProcessRunner]: runs real commands with a hard timeout
//! - [mock::MockProcessRunner]: returns canned output per command string

pub mod mock;
pub mod runner;

pub use mock::MockProcessRunner;
pub use runner::SystemProcessRunner;

use std::sync::Arc;

/// Maps a command line to its captured standard output.
///
/// Implementations never fail: anything that prevents output from being
/// obtained (spawn error, I/O error, timeout) yields an empty string, which
/// callers treat as "not applicable".
pub trait ProcessOutput: Send + Sync {
    /// Run `command` (split on whitespace) and return its trimmed stdout.
    fn run_command_for_output(&self, command: &str) -> String;
}

impl<P: ProcessOutput + ?Sized> ProcessOutput for Arc<P> {
    fn run_command_for_output(&self, command: &str) -> String {
        (**self).run_command_for_output(command)
    }
}

impl<P: ProcessOutput + ?Sized> ProcessOutput for &P {
    fn run_command_for_output(&self, command: &str) -> String {
        (**self).run_command_for_output(command)
    }
}
