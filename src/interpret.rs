//! Turning an analyzer outcome into a token table

use crate::analyzer::ProcessOutcome;
use crate::codec;
use crate::error::AnalysisError;
use crate::token::TokenTable;

/// Interpret one analyzer outcome.
///
/// A success is parsed by the codec and a [`codec::MalformedRow`] comes back as
/// [`AnalysisError::MalformedRow`]. A failure becomes
/// [`AnalysisError::AnalyzerError`] with stderr verbatim; whatever the analyzer
/// printed on stdout before failing is not looked at.
pub fn interpret(outcome: ProcessOutcome) -> Result<TokenTable, AnalysisError> {
    match outcome {
        ProcessOutcome::Success(output) => Ok(codec::parse(&output)?),
        ProcessOutcome::Failure {
            exit_code,
            error_text,
        } => Err(AnalysisError::AnalyzerError {
            exit_code,
            message: error_text,
        }),
    }
}
