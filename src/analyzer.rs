//! The analyzer boundary
//!
//! An analyzer is anything that takes UTF-8 source text and reports either a
//! delimited-text token table or a diagnostic. The real one is an external
//! executable ([`ProcessAnalyzer`]); [`CannedAnalyzer`] stands in for it where
//! a fixed answer is enough. Hosts that drive a different tool only need to
//! implement [`Analyzer`].

pub mod canned;
pub mod process;

pub use canned::CannedAnalyzer;
pub use process::{install_dir, resolve_executable, ProcessAnalyzer};

use crate::error::AnalysisError;
use std::future::Future;
use tracing::warn;

/// Result of one analyzer invocation. Never both a payload and a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Raw stdout of the analyzer
    Success(String),
    /// Exit code (absent when the analyzer was killed by a signal) and stderr
    Failure {
        exit_code: Option<i32>,
        error_text: String,
    },
}

impl ProcessOutcome {
    /// Classify a finished analyzer run.
    ///
    /// Exit status 0 is success. A non-zero exit with nothing but whitespace on
    /// stderr is success too and stdout is kept; only a non-zero exit that
    /// comes with a diagnostic is a failure.
    pub fn from_exit(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        if exit_code == Some(0) {
            return ProcessOutcome::Success(stdout);
        }
        if stderr.trim().is_empty() {
            warn!(?exit_code, "analyzer exited non-zero with empty stderr, keeping its output");
            return ProcessOutcome::Success(stdout);
        }
        ProcessOutcome::Failure {
            exit_code,
            error_text: stderr,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Success(_))
    }
}

/// A lexical analyzer reachable through a single request/response exchange.
pub trait Analyzer: Send + Sync {
    /// Run the analyzer once over `input`.
    ///
    /// `input` has already been normalized. Failures the analyzer reports
    /// itself come back as [`ProcessOutcome::Failure`]; `Err` is reserved for
    /// not being able to run or talk to it at all.
    fn run(&self, input: &str)
        -> impl Future<Output = Result<ProcessOutcome, AnalysisError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_exit_is_success_even_with_stderr() {
        let outcome = ProcessOutcome::from_exit(Some(0), "out".into(), "warning: x".into());
        assert_eq!(outcome, ProcessOutcome::Success("out".into()));
    }

    #[test]
    fn test_non_zero_with_diagnostic_is_failure() {
        let outcome =
            ProcessOutcome::from_exit(Some(2), "partial".into(), "unexpected char at 1:4".into());
        assert_eq!(
            outcome,
            ProcessOutcome::Failure {
                exit_code: Some(2),
                error_text: "unexpected char at 1:4".into(),
            }
        );
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_non_zero_with_blank_stderr_is_success() {
        let outcome = ProcessOutcome::from_exit(Some(1), "table".into(), " \r\n\t".into());
        assert_eq!(outcome, ProcessOutcome::Success("table".into()));
    }

    #[test]
    fn test_signal_death_follows_the_same_rule() {
        assert!(ProcessOutcome::from_exit(None, String::new(), String::new()).is_success());
        assert!(!ProcessOutcome::from_exit(None, String::new(), "killed".into()).is_success());
    }
}
