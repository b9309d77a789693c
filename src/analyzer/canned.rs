//! Analyzer that answers every request with the same outcome

use super::{Analyzer, ProcessOutcome};
use crate::error::AnalysisError;
use std::sync::{Arc, Mutex, PoisonError};

/// Returns a fixed [`ProcessOutcome`] and remembers the inputs it was given.
///
/// Clones share the recorded inputs, so a clone kept by a test sees what the
/// session sent.
#[derive(Debug, Clone)]
pub struct CannedAnalyzer {
    outcome: ProcessOutcome,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl CannedAnalyzer {
    pub fn new(outcome: ProcessOutcome) -> Self {
        CannedAnalyzer {
            outcome,
            inputs: Arc::default(),
        }
    }

    /// Analyzer that exits 0 printing `stdout`.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(ProcessOutcome::Success(stdout.into()))
    }

    /// Analyzer that exits with `exit_code` printing `stderr`.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::new(ProcessOutcome::Failure {
            exit_code: Some(exit_code),
            error_text: stderr.into(),
        })
    }

    /// Inputs received so far, oldest first.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Analyzer for CannedAnalyzer {
    async fn run(&self, input: &str) -> Result<ProcessOutcome, AnalysisError> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.to_string());
        Ok(self.outcome.clone())
    }
}
