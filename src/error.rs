//! Failure taxonomy for one analysis run
//!
//! Every failure reaches the caller of `run_analysis` classified and with a
//! readable message. Nothing is retried: the analyzer is assumed to fail the
//! same way for the same input.

use crate::codec::MalformedRow;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub enum AnalysisError {
    /// The analyzer executable is not where it was expected (deployment problem)
    ExecutableNotFound(PathBuf),
    /// The OS refused to start the analyzer
    ProcessSpawn(io::Error),
    /// Exchanging bytes with the running analyzer failed
    StreamIo {
        message: String,
        /// Whatever the analyzer managed to write to stderr before the failure
        partial_error_text: String,
    },
    /// The analyzer exited non-zero and explained why on stderr
    AnalyzerError {
        exit_code: Option<i32>,
        /// stderr, verbatim
        message: String,
    },
    /// The analyzer's output has a row with a non-numeric line or column
    MalformedRow(MalformedRow),
    /// The analyzer did not finish in time and was killed
    Timeout(Duration),
    /// Reading or writing a source or export file
    Io(io::Error),
}

impl AnalysisError {
    /// Short category name, suitable for a one-line notification.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::ExecutableNotFound(_) => "executable-not-found",
            AnalysisError::ProcessSpawn(_) => "process-spawn",
            AnalysisError::StreamIo { .. } => "stream-io",
            AnalysisError::AnalyzerError { .. } => "analyzer-error",
            AnalysisError::MalformedRow(_) => "malformed-row",
            AnalysisError::Timeout(_) => "timeout",
            AnalysisError::Io(_) => "io",
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::ExecutableNotFound(path) => {
                write!(f, "Analyzer executable not found: {}", path.display())
            }
            AnalysisError::ProcessSpawn(err) => write!(f, "Failed to start analyzer: {}", err),
            AnalysisError::StreamIo {
                message,
                partial_error_text,
            } => {
                write!(f, "Analyzer stream error: {}", message)?;
                if !partial_error_text.trim().is_empty() {
                    write!(f, " (stderr so far: {})", partial_error_text.trim_end())?;
                }
                Ok(())
            }
            AnalysisError::AnalyzerError { message, .. } => {
                write!(f, "Analyzer error: {}", message.trim_end())
            }
            AnalysisError::MalformedRow(row) => write!(f, "{}", row),
            AnalysisError::Timeout(after) => {
                write!(f, "Analyzer timed out after {:.1}s", after.as_secs_f64())
            }
            AnalysisError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::ProcessSpawn(err) | AnalysisError::Io(err) => Some(err),
            AnalysisError::MalformedRow(row) => Some(row),
            _ => None,
        }
    }
}

impl From<MalformedRow> for AnalysisError {
    fn from(row: MalformedRow) -> Self {
        AnalysisError::MalformedRow(row)
    }
}

impl From<io::Error> for AnalysisError {
    fn from(err: io::Error) -> Self {
        AnalysisError::Io(err)
    }
}
