//! JSON format

use super::registry::{FormatError, Formatter};
use crate::token::TokenTable;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&self, table: &TokenTable) -> Result<String, FormatError> {
        let mut json = serde_json::to_string_pretty(table)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    fn description(&self) -> &str {
        "Array of {kind, lexeme, line, column} objects"
    }
}
