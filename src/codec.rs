//! Delimited-text codec for the analyzer's token table
//!
//! The analyzer prints one header line followed by one row per token:
//!
//! ```text
//! Tipo,Lexema,Linea,Columna
//! KEYWORD,"int",1,1
//! STR,"say ""hi"", then go",2,9
//! ```
//!
//! The header names are a wire contract with the analyzer and with every CSV
//! this crate has ever exported; they are never localized or reordered.
//!
//! Parsing is deliberately asymmetric: a row with fewer than four fields is
//! dropped silently, but a row whose line or column is not a positive integer
//! fails the whole parse with [`MalformedRow`].

pub mod parse;
pub mod serialize;
pub mod split;

pub use parse::{parse, MalformedRow, PositionField};
pub use serialize::{serialize, serialize_with};
pub use split::{records, split_fields, Record};

use serde::Deserialize;

/// Header line written on export and expected (but not validated) on import.
pub const HEADER: &str = "Tipo,Lexema,Linea,Columna";

/// Line terminator used when serializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    /// What the Windows host has always written
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}
