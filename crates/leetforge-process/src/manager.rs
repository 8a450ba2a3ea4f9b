//! Process manager - lifecycle orchestration

use std::io::{Read, Write};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::{
    child::ManagedChild,
    config::{ProcessConfig, ProcessOutput},
    error::{ProcessError, Result},
};

/// Manages process lifecycle
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessManager;

impl ProcessManager {
    /// Create new process manager
    pub fn new() -> Self {
        Self
    }

    /// Spawn a managed process with piped stdio.
    ///
    /// On unix the child leads its own process group so a timeout can kill
    /// everything it started (compilers, `go run` children, ...).
    pub async fn spawn(&self, config: ProcessConfig) -> Result<ManagedChild> {
        debug!(
            command = %config.command,
            args = ?config.args,
            cwd = ?config.working_dir,
            "Spawning process"
        );

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);

        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: config.command.clone(),
            source,
        })?;

        info!(pid = ?child.id(), command = %config, "Process spawned");

        Ok(ManagedChild::new(child, config))
    }

    /// Spawn, feed stdin, and wait for the process to finish
    ///
    /// # Examples
    /// ```no_run
    /// use leetforge_process::{ProcessManager, ProcessConfig};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = ProcessManager::new();
    /// let config = ProcessConfig::new("go").args(["run", "./0001.two-sum"]).timeout_secs(10);
    /// let output = manager.run(config).await?;
    /// println!("{}", output.combined());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self, config: ProcessConfig) -> Result<ProcessOutput> {
        let child = self.spawn(config).await?;
        child.wait_with_output().await
    }

    /// Blocking variant of [`ProcessManager::run`] for synchronous callers.
    ///
    /// The timeout is not enforced here.
    pub fn run_blocking(&self, config: &ProcessConfig) -> Result<ProcessOutput> {
        debug!(command = %config, "Running process (blocking)");

        let mut cmd = std::process::Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: config.command.clone(),
            source,
        })?;

        let writer = match (child.stdin.take(), config.stdin.clone()) {
            (Some(mut pipe), Some(input)) => Some(std::thread::spawn(move || {
                let _ = pipe.write_all(input.as_bytes());
            })),
            _ => None,
        };

        let mut stderr = String::new();
        let stderr_pipe = child.stderr.take();
        let stderr_reader = stderr_pipe.map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                buf
            })
        });

        let mut stdout = Vec::new();
        if let Some(mut pipe) = child.stdout.take() {
            pipe.read_to_end(&mut stdout)?;
        }
        if let Some(reader) = stderr_reader {
            if let Ok(buf) = reader.join() {
                stderr = String::from_utf8_lossy(&buf).into_owned();
            }
        }
        if let Some(writer) = writer {
            let _ = writer.join();
        }
        let status = child.wait()?;

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr,
        })
    }
}
