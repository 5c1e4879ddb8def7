//! services/api/src/adapters/process.rs
//!
//! Runs an external script with a hard timeout and a cap on how much stdout
//! it may produce. Shared by the classifier and ranker adapters.

use moodify_core::ports::{PortError, PortResult};
use std::ffi::{OsStr, OsString};
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

use crate::config::MAX_PROCESS_OUTPUT_BYTES;

/// Everything a finished child process left behind.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// A subprocess invocation with a deadline and an output budget.
#[derive(Debug, Clone)]
pub struct BoundedCommand {
    program: String,
    args: Vec<OsString>,
    timeout: Duration,
    max_output: usize,
}

impl BoundedCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(10),
            max_output: MAX_PROCESS_OUTPUT_BYTES,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output(mut self, max_output: usize) -> Self {
        self.max_output = max_output;
        self
    }

    /// Spawns the process and waits for it.
    ///
    /// The child is killed when the deadline passes or stdout exceeds the
    /// budget. A non-zero exit status is not an error here; callers decide.
    pub async fn run(&self) -> PortResult<ProcessOutput> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PortError::Unavailable(format!("Failed to start '{}': {}", self.program, e))
            })?;

        match tokio::time::timeout(self.timeout, self.collect(&mut child)).await {
            Ok(result) => result,
            Err(_) => {
                let _ = child.start_kill();
                Err(PortError::Timeout(format!(
                    "'{}' did not finish within {:?}",
                    self.program, self.timeout
                )))
            }
        }
    }

    async fn collect(&self, child: &mut Child) -> PortResult<ProcessOutput> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PortError::Unexpected("Child stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| PortError::Unexpected("Child stderr was not captured".to_string()))?;

        // Stderr is drained on its own task so a chatty child never blocks on it.
        let stderr_task = tokio::spawn(drain(stderr, self.max_output));

        let stdout = match read_at_most(stdout, self.max_output).await.map_err(io_error)? {
            Some(bytes) => bytes,
            None => {
                let _ = child.start_kill();
                stderr_task.abort();
                return Err(PortError::Unexpected(format!(
                    "'{}' produced more than {} bytes of output",
                    self.program, self.max_output
                )));
            }
        };

        let status = child.wait().await.map_err(io_error)?;
        let stderr = stderr_task
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .map_err(io_error)?;

        Ok(ProcessOutput {
            status,
            stdout,
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

/// Returns `None` if the reader yields more than `cap` bytes.
async fn read_at_most<R: AsyncRead + Unpin>(reader: R, cap: usize) -> io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    let mut limited = reader.take(cap as u64 + 1);
    limited.read_to_end(&mut buf).await?;
    Ok((buf.len() <= cap).then_some(buf))
}

/// Reads to EOF, keeping only the first `cap` bytes.
async fn drain<R: AsyncRead + Unpin>(mut reader: R, cap: usize) -> io::Result<Vec<u8>> {
    let mut kept = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = cap.saturating_sub(kept.len());
        kept.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok(kept)
}

fn io_error(e: io::Error) -> PortError {
    PortError::Unexpected(format!("Subprocess I/O failed: {}", e))
}
