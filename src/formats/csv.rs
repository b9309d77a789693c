//! CSV export format

use super::registry::{FormatError, Formatter};
use crate::codec::{self, LineEnding};
use crate::token::TokenTable;

/// The codec serializer behind the `Formatter` interface
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter {
    pub line_ending: LineEnding,
}

impl CsvFormatter {
    pub fn new(line_ending: LineEnding) -> Self {
        CsvFormatter { line_ending }
    }
}

impl Formatter for CsvFormatter {
    fn name(&self) -> &str {
        "csv"
    }

    fn render(&self, table: &TokenTable) -> Result<String, FormatError> {
        Ok(codec::serialize_with(table, self.line_ending))
    }

    fn description(&self) -> &str {
        "Tipo,Lexema,Linea,Columna rows, as exported"
    }
}
