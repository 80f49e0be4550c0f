use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::process::ProcessOutput;

/// Hard ceiling on how long a single command may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs commands as child processes of the current one.
#[derive(Debug, Clone)]
pub struct SystemProcessRunner {
    working_dir: Option<PathBuf>,
    timeout: Duration,
}

impl SystemProcessRunner {
    /// Runner using the current working directory and the default timeout
    pub fn new() -> Self {
        SystemProcessRunner {
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Runner whose commands execute inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        SystemProcessRunner {
            working_dir: Some(dir.into()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Spawn `command` and collect its stdout, propagating every failure.
    ///
    /// Stdout and stderr are drained on separate threads so a chatty child
    /// cannot block on a full pipe while we wait for it to exit. On timeout
    /// the child is killed and reaped.
    fn run(&self, command: &str) -> io::Result<String> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        let mut cmd = Command::new(program);
        cmd.args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn()?;
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match wait_with_deadline(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill_and_reap(&mut child);
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("timed out after {:?}", self.timeout),
                ));
            }
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(e);
            }
        };

        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;

        if !status.success() {
            debug!(
                "'{}' exited with {}: {}",
                command,
                status,
                String::from_utf8_lossy(&stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

impl Default for SystemProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessOutput for SystemProcessRunner {
    fn run_command_for_output(&self, command: &str) -> String {
        match self.run(command) {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to run '{}': {}", command, e);
                String::new()
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output reader panicked"))?,
        None => Ok(Vec::new()),
    }
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Failed to kill child {}: {}", child.id(), e);
    }
    let _ = child.wait();
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
