//! External analyzer executable driven over stdin/stdout/stderr
//!
//! The child's pipe buffers are finite. If the parent writes all of stdin
//! before reading anything, a child that fills stderr first blocks forever,
//! and so does the parent. Each stream therefore gets its own task: one
//! writes stdin and closes it, two drain stdout and stderr to end-of-stream.

use super::{Analyzer, ProcessOutcome};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinError;
use tracing::{debug, warn};

/// Runs an analyzer executable once per request.
#[derive(Debug, Clone)]
pub struct ProcessAnalyzer {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessAnalyzer {
    /// Analyzer at `executable`, used as given, with no timeout.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        ProcessAnalyzer {
            executable: executable.into(),
            timeout: None,
        }
    }

    /// Kill the analyzer and fail with [`AnalysisError::Timeout`] once
    /// `timeout` has elapsed. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Analyzer described by configuration, relative paths resolved against
    /// the directory of the running binary.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        let base = install_dir()?;
        Ok(Self::new(resolve_executable(&config.executable, &base)).with_timeout(config.timeout()))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Analyzer for ProcessAnalyzer {
    async fn run(&self, input: &str) -> Result<ProcessOutcome, AnalysisError> {
        let is_file = tokio::fs::metadata(&self.executable)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(AnalysisError::ExecutableNotFound(self.executable.clone()));
        }

        let mut child = Command::new(&self.executable)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(AnalysisError::ProcessSpawn)?;
        debug!(
            pid = child.id(),
            executable = %self.executable.display(),
            input_bytes = input.len(),
            "analyzer started"
        );

        let exchange = exchange(&mut child, input.as_bytes().to_vec());
        let exchanged = match self.timeout {
            Some(limit) => {
                let finished = tokio::time::timeout(limit, exchange).await;
                match finished {
                    Ok(result) => result?,
                    Err(_) => {
                        warn!(timeout = ?limit, "analyzer did not finish, killing it");
                        if let Err(err) = child.kill().await {
                            warn!(%err, "failed to kill analyzer");
                        }
                        return Err(AnalysisError::Timeout(limit));
                    }
                }
            }
            None => exchange.await?,
        };

        debug!(
            exit_code = ?exchanged.status.code(),
            stdout_bytes = exchanged.stdout.len(),
            stderr_bytes = exchanged.stderr.len(),
            "analyzer finished"
        );
        Ok(ProcessOutcome::from_exit(
            exchanged.status.code(),
            exchanged.stdout,
            exchanged.stderr,
        ))
    }
}

/// Everything a finished analyzer left behind
struct Exchanged {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Bytes read from one stream, and the error that stopped the read early
struct Drained {
    bytes: Vec<u8>,
    error: Option<io::Error>,
}

impl Drained {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

async fn drain<R: AsyncRead + Unpin>(mut reader: R) -> Drained {
    let mut bytes = Vec::new();
    let error = loop {
        match reader.read_buf(&mut bytes).await {
            Ok(0) => break None,
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => break Some(err),
        }
    };
    Drained { bytes, error }
}

async fn exchange(child: &mut Child, input: Vec<u8>) -> Result<Exchanged, AnalysisError> {
    let (Some(mut stdin), Some(stdout), Some(stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        return Err(stream_error("analyzer streams were not captured", String::new()));
    };

    let stdout_task = tokio::spawn(drain(stdout));
    let stderr_task = tokio::spawn(drain(stderr));
    let stdin_task = tokio::spawn(async move {
        stdin.write_all(&input).await?;
        // End-of-input is the only request terminator the analyzer knows
        stdin.shutdown().await
    });

    let written = stdin_task.await;
    let stdout = stdout_task.await;
    let stderr = stderr_task.await;
    let (stdout, stderr) = settle(written, stdout, stderr)?;

    let status = child
        .wait()
        .await
        .map_err(|err| stream_error(format!("waiting for analyzer: {}", err), stderr.clone()))?;

    Ok(Exchanged {
        status,
        stdout,
        stderr,
    })
}

/// Check the three stream tasks and return stdout and stderr text.
///
/// Every stream error carries whatever stderr text was read.
fn settle(
    written: Result<io::Result<()>, JoinError>,
    stdout: Result<Drained, JoinError>,
    stderr: Result<Drained, JoinError>,
) -> Result<(String, String), AnalysisError> {
    let stderr = stderr.map_err(|err| joined_error("stderr", err))?;
    let error_text = stderr.text();
    if let Some(err) = stderr.error {
        return Err(stream_error(format!("reading stderr: {}", err), error_text));
    }

    let stdout = stdout.map_err(|err| joined_error("stdout", err))?;
    if let Some(err) = stdout.error {
        return Err(stream_error(format!("reading stdout: {}", err), error_text));
    }

    match written {
        Ok(Ok(())) => {}
        // The analyzer stopped reading; its exit status and stderr tell why
        Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!("analyzer closed stdin before reading all input");
        }
        Ok(Err(err)) => {
            return Err(stream_error(format!("writing stdin: {}", err), error_text));
        }
        Err(err) => return Err(joined_error("stdin", err)),
    }

    Ok((stdout.text(), error_text))
}

fn stream_error(message: impl Into<String>, partial_error_text: String) -> AnalysisError {
    AnalysisError::StreamIo {
        message: message.into(),
        partial_error_text,
    }
}

fn joined_error(stream: &str, err: JoinError) -> AnalysisError {
    stream_error(format!("{} task failed: {}", stream, err), String::new())
}

/// Directory of the running binary, where the analyzer is deployed.
pub fn install_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no parent directory for {}", exe.display()),
        )
    })
}

/// Resolve a configured analyzer path against `base`.
///
/// Absolute paths are kept. On platforms with an executable extension it is
/// added when the configured name has none.
pub fn resolve_executable(configured: &Path, base: &Path) -> PathBuf {
    let mut path = if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base.join(configured)
    };
    if path.extension().is_none() && !std::env::consts::EXE_EXTENSION.is_empty() {
        path.set_extension(std::env::consts::EXE_EXTENSION);
    }
    path
}
