//! # lexbridge
//!
//! Hands source text to an external lexical analyzer and recovers the token
//! table it prints.
//!
//! The analyzer is an opaque executable: it reads UTF-8 source on stdin until
//! end-of-stream, prints a `Tipo,Lexema,Linea,Columna` table on stdout and a
//! diagnostic on stderr when it fails. The pieces, leaves first:
//!
//! - [`normalize`] strips invisible leading characters before transmission
//! - [`codec`] parses the analyzer's table and serializes it back for export
//! - [`analyzer`] runs the child process and drains its streams concurrently
//! - [`interpret`] turns a [`ProcessOutcome`] into a [`TokenTable`] or an error
//! - [`session`] owns the current table and is the entry point for hosts
//!
//! ```rust,ignore
//! use lexbridge::{config, Session};
//!
//! let config = config::load_defaults()?;
//! let session = Session::from_config(&config)?;
//! let table = session.run_analysis("int x = 10;\n").await?;
//! let csv = session.export_table(&table);
//! ```

pub mod analyzer;
pub mod codec;
pub mod config;
pub mod error;
pub mod formats;
pub mod interpret;
pub mod normalize;
pub mod session;
pub mod token;

pub use analyzer::{Analyzer, CannedAnalyzer, ProcessAnalyzer, ProcessOutcome};
pub use error::AnalysisError;
pub use session::Session;
pub use token::{Token, TokenTable};
