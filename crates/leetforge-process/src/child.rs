//! Managed child process wrapper

use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Child;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::{ProcessConfig, ProcessOutput},
    error::{ProcessError, Result},
};

/// SIGKILL escalation timeout
const SIGKILL_TIMEOUT_MS: u64 = 200;

/// Wrapper around tokio::process::Child with lifecycle management
pub struct ManagedChild {
    /// Underlying tokio child process
    child: Child,
    /// Process configuration
    config: ProcessConfig,
    /// Process ID
    pid: u32,
}

impl ManagedChild {
    /// Create new managed child
    pub(crate) fn new(child: Child, config: ProcessConfig) -> Self {
        let pid = child.id().unwrap_or(0);
        Self { child, config, pid }
    }

    /// Get process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get process configuration
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Check if process is still running
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Feed the configured stdin, drain stdout/stderr and wait for exit.
    ///
    /// On timeout the whole process group is killed and
    /// [`ProcessError::Timeout`] is returned.
    pub async fn wait_with_output(mut self) -> Result<ProcessOutput> {
        let input = self.config.stdin.take();
        let collected = match self.config.timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, collect(&mut self.child, input)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(pid = %self.pid, command = %self.config, "process timed out");
                        self.kill_tree().await?;
                        return Err(ProcessError::Timeout { limit: timeout });
                    }
                }
            }
            None => collect(&mut self.child, input).await,
        };

        let output = collected?;
        debug!(pid = %self.pid, exit_code = ?output.exit_code, "process finished");
        Ok(output)
    }

    /// Kill process tree (process and all descendants)
    ///
    /// Unix: kills the process group via SIGTERM, then SIGKILL.
    pub async fn kill_tree(&mut self) -> Result<()> {
        debug!(pid = %self.pid, "Killing process tree");

        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            let pgid = Pid::from_raw(self.pid as i32);

            if let Err(e) = killpg(pgid, Signal::SIGTERM) {
                warn!(pid = %self.pid, error = %e, "Failed to send SIGTERM, killing process only");
                let _ = self.child.kill().await;
            }

            sleep(Duration::from_millis(SIGKILL_TIMEOUT_MS)).await;

            if self.is_running() {
                if let Err(e) = killpg(pgid, Signal::SIGKILL) {
                    warn!(pid = %self.pid, error = %e, "Failed to send SIGKILL, killing process only");
                    self.child
                        .kill()
                        .await
                        .map_err(|e| ProcessError::KillFailed(e.to_string()))?;
                }
            }
        }

        #[cfg(not(unix))]
        {
            self.child
                .kill()
                .await
                .map_err(|e| ProcessError::KillFailed(e.to_string()))?;
        }

        let _ = self.child.wait().await;
        Ok(())
    }
}

async fn collect(child: &mut Child, input: Option<String>) -> Result<ProcessOutput> {
    let stdin = child.stdin.take();
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    let write = async move {
        if let (Some(mut pipe), Some(input)) = (stdin, input) {
            // The child may exit without reading everything.
            match pipe.write_all(input.as_bytes()).await {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
        }
        Ok::<(), io::Error>(())
    };
    let read_stdout = async {
        let mut buf = Vec::new();
        if let Some(pipe) = stdout.as_mut() {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok::<Vec<u8>, io::Error>(buf)
    };
    let read_stderr = async {
        let mut buf = Vec::new();
        if let Some(pipe) = stderr.as_mut() {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok::<Vec<u8>, io::Error>(buf)
    };

    let ((), out, err) = tokio::try_join!(write, read_stdout, read_stderr)?;
    let status = child.wait().await?;

    Ok(ProcessOutput {
        exit_code: status.code(),
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
    })
}
