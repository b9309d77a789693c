//! Aligned text grid for terminals
//!
//! One row per token under the export header names, lexemes shown with
//! control characters escaped and cut at 30 characters, then a
//! `<n> tokens` summary line.

use super::registry::{FormatError, Formatter};
use crate::token::TokenTable;

const MAX_LEXEME_CHARS: usize = 30;
const HEADERS: [&str; 4] = ["Tipo", "Lexema", "Linea", "Columna"];
const GAP: &str = "  ";

pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn name(&self) -> &str {
        "table"
    }

    fn render(&self, table: &TokenTable) -> Result<String, FormatError> {
        let rows: Vec<[String; 4]> = table
            .iter()
            .map(|t| {
                [
                    t.kind.clone(),
                    truncate(&escape(&t.lexeme), MAX_LEXEME_CHARS),
                    t.line.to_string(),
                    t.column.to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut result = String::new();
        push_row(&mut result, &HEADERS.map(str::to_string), &widths);
        for row in &rows {
            push_row(&mut result, row, &widths);
        }
        let noun = if rows.len() == 1 { "token" } else { "tokens" };
        result.push_str(&format!("{} {}\n", rows.len(), noun));

        Ok(result)
    }

    fn description(&self) -> &str {
        "Aligned columns with a token count"
    }
}

/// Text columns are left-aligned, position columns right-aligned
fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    out.push_str(&format!(
        "{:<w0$}{GAP}{:<w1$}{GAP}{:>w2$}{GAP}{:>w3$}\n",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    ));
}

fn escape(lexeme: &str) -> String {
    let mut escaped = String::with_capacity(lexeme.len());
    for c in lexeme.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.extend(c.escape_unicode()),
            c => escaped.push(c),
        }
    }
    escaped
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}
