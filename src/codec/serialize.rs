//! Token table -> delimited text

use super::{LineEnding, HEADER};
use crate::token::TokenTable;

/// Serialize a table with `\n` line endings.
pub fn serialize(table: &TokenTable) -> String {
    serialize_with(table, LineEnding::Lf)
}

/// Serialize a table as `kind,"lexeme",line,column` rows under the fixed
/// header.
///
/// The lexeme is always quoted with embedded quotes doubled. The kind is
/// written as-is, so a kind containing a comma, quote or newline will not
/// read back the same; the analyzer never emits such kinds.
pub fn serialize_with(table: &TokenTable, ending: LineEnding) -> String {
    let eol = ending.as_str();
    let mut result = String::with_capacity(HEADER.len() + eol.len() + table.len() * 24);

    result.push_str(HEADER);
    result.push_str(eol);
    for token in table {
        result.push_str(&format!(
            "{},\"{}\",{},{}{}",
            token.kind,
            token.lexeme.replace('"', "\"\""),
            token.line,
            token.column,
            eol
        ));
    }

    result
}
