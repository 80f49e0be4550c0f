use std::collections::HashMap;
use std::sync::Mutex;

use crate::process::ProcessOutput;

/// Mock runner for testing without spawning processes
///
/// Commands are matched by exact string. Unknown commands produce an empty
/// string, the same as a process that could not be launched.
#[derive(Debug, Default)]
pub struct MockProcessRunner {
    outputs: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockProcessRunner {
    /// Create a new mock with no scripted commands
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output of a command
    pub fn with_output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }

    /// Set or replace the output of a command
    pub fn set_output(&mut self, command: impl Into<String>, output: impl Into<String>) {
        self.outputs.insert(command.into(), output.into());
    }

    /// Every command run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl ProcessOutput for MockProcessRunner {
    fn run_command_for_output(&self, command: &str) -> String {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }
        self.outputs.get(command).cloned().unwrap_or_default()
    }
}
