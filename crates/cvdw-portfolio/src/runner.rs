//! Process capability used to reach external tools
//!
//! Everything that talks to a solver or checker goes through [`ToolRunner`],
//! so the orchestration logic can be exercised with scripted fakes instead
//! of real binaries. [`SystemRunner`] is the production implementation.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Errors raised while running an external tool
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (None if the process was killed by a signal)
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout followed by stderr
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Capability to locate and run external programs
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Resolve a tool name to an executable, `None` when it is not installed
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    /// Run `program` with `args`, feeding `input` on stdin, and wait at most
    /// `limit` for it to exit
    async fn invoke(
        &self,
        program: &Path,
        args: &[String],
        input: Option<&str>,
        limit: Duration,
    ) -> Result<ProcessOutput, InvokeError>;
}

/// Runs real child processes found on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ToolRunner for SystemRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        crate::find_executable(tool)
    }

    async fn invoke(
        &self,
        program: &Path,
        args: &[String],
        input: Option<&str>,
        limit: Duration,
    ) -> Result<ProcessOutput, InvokeError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // An expired timeout drops the child; make sure it dies with it.
            .kill_on_drop(true);

        debug!("Running {:?}", cmd);
        let start = Instant::now();

        let mut child = cmd.spawn().map_err(|source| InvokeError::Spawn {
            program: program.display().to_string(),
            source,
        })?;

        let stdin = child.stdin.take();
        let feed = async move {
            let (Some(text), Some(mut stdin)) = (input, stdin) else {
                return Ok(());
            };
            // A child may exit without reading all of its input. Dropping
            // stdin at the end of this block closes the pipe.
            match stdin.write_all(text.as_bytes()).await {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            }
        };
        let run = async {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            output
        };

        match timeout(limit, run).await {
            Ok(Ok(output)) => Ok(ProcessOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                duration: start.elapsed(),
            }),
            Ok(Err(e)) => Err(InvokeError::Io(e)),
            Err(_) => {
                warn!("{} timed out after {:?}", program.display(), limit);
                Err(InvokeError::Timeout(limit))
            }
        }
    }
}
