//! The orchestrating session
//!
//! A session owns the current token table and is what a host calls into: it
//! hands source text in with [`Session::run_analysis`] and gets CSV bytes out
//! with [`Session::export_table`].
//!
//! The table lives in a single slot holding an `Arc<TokenTable>`. A run clears
//! the slot, builds a complete new table off to the side and swaps it in, so a
//! reader holding a snapshot never sees a half-built table. Runs are
//! serialized: a second `run_analysis` on the same session waits for the first
//! to finish.

use crate::analyzer::{Analyzer, ProcessAnalyzer};
use crate::codec::{self, LineEnding};
use crate::config::LexbridgeConfig;
use crate::error::AnalysisError;
use crate::interpret::interpret;
use crate::normalize::normalize;
use crate::token::TokenTable;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

pub struct Session<A = ProcessAnalyzer> {
    analyzer: A,
    line_ending: LineEnding,
    table: RwLock<Arc<TokenTable>>,
    run_gate: Mutex<()>,
}

impl Session<ProcessAnalyzer> {
    /// Session driving the analyzer executable named by `config`.
    pub fn from_config(config: &LexbridgeConfig) -> Result<Self, AnalysisError> {
        let analyzer = ProcessAnalyzer::from_config(&config.analyzer)?;
        Ok(Self::new(analyzer).with_line_ending(config.export.line_ending))
    }
}

impl<A: Analyzer> Session<A> {
    pub fn new(analyzer: A) -> Self {
        Session {
            analyzer,
            line_ending: LineEnding::default(),
            table: RwLock::new(Arc::new(TokenTable::new())),
            run_gate: Mutex::new(()),
        }
    }

    /// Line terminator used by [`Session::export_table`].
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Analyze `source` and make the result the session's table.
    ///
    /// The previous table is cleared before the analyzer starts; on failure
    /// the slot stays empty.
    pub async fn run_analysis(&self, source: &str) -> Result<Arc<TokenTable>, AnalysisError> {
        let _running = self.run_gate.lock().await;
        *self.table.write().await = Arc::new(TokenTable::new());

        let started = Instant::now();
        let input = normalize(source);
        debug!(
            source_bytes = source.len(),
            stripped = source.len() - input.len(),
            "normalized analysis input"
        );

        let outcome = self.analyzer.run(input).await?;
        let table = Arc::new(interpret(outcome)?);
        *self.table.write().await = Arc::clone(&table);

        info!(
            tokens = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis finished"
        );
        Ok(table)
    }

    /// Snapshot of the current table.
    pub async fn table(&self) -> Arc<TokenTable> {
        Arc::clone(&*self.table.read().await)
    }

    /// CSV bytes for `table`, ready to be written to a `.csv` file.
    pub fn export_table(&self, table: &TokenTable) -> Vec<u8> {
        codec::serialize_with(table, self.line_ending).into_bytes()
    }

    /// Write the current table to `path` as CSV.
    pub async fn export_to(&self, path: impl AsRef<Path>) -> Result<(), AnalysisError> {
        let table = self.table().await;
        tokio::fs::write(path.as_ref(), self.export_table(&table)).await?;
        debug!(path = %path.as_ref().display(), tokens = table.len(), "exported table");
        Ok(())
    }
}

/// Read a source file verbatim as UTF-8.
pub async fn load_source(path: impl AsRef<Path>) -> Result<String, AnalysisError> {
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Write source text verbatim as UTF-8.
pub async fn save_source(path: impl AsRef<Path>, text: &str) -> Result<(), AnalysisError> {
    Ok(tokio::fs::write(path, text).await?)
}
