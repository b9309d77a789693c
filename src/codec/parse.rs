//! Delimited text -> token table

use super::split::{records, split_fields};
use crate::token::{Token, TokenTable};
use std::fmt;
use tracing::trace;

/// Which numeric column of a row failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionField {
    Line,
    Column,
}

impl fmt::Display for PositionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionField::Line => write!(f, "line"),
            PositionField::Column => write!(f, "column"),
        }
    }
}

/// A row whose line or column is not a positive base-10 integer.
///
/// Fails the whole parse: it means the analyzer's output is corrupt, not that
/// one token is odd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based line in the parsed text where the row starts
    pub record: usize,
    pub field: PositionField,
    pub value: String,
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Malformed row at line {}: {} {:?} is not a positive integer",
            self.record, self.field, self.value
        )
    }
}

impl std::error::Error for MalformedRow {}

/// Parse analyzer output into a token table.
///
/// Blank lines are skipped, the first non-blank line is the header and is
/// discarded without looking at it, rows with fewer than four fields are
/// dropped and fields past the fourth are ignored.
pub fn parse(text: &str) -> Result<TokenTable, MalformedRow> {
    let mut tokens = Vec::new();
    let mut header_seen = false;

    for record in records(text) {
        if record.is_blank() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        // Short rows are tolerated, extra fields are ignored
        let mut fields = split_fields(record.text).into_iter();
        let (Some(kind), Some(lexeme), Some(line), Some(column)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            trace!(line = record.line, "skipping short row");
            continue;
        };

        let line = parse_position(&line, PositionField::Line, record.line)?;
        let column = parse_position(&column, PositionField::Column, record.line)?;

        tokens.push(Token {
            kind,
            lexeme,
            line,
            column,
        });
    }

    Ok(TokenTable::from(tokens))
}

fn parse_position(value: &str, field: PositionField, record: usize) -> Result<u32, MalformedRow> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MalformedRow {
            record,
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_header_is_skipped() {
        let table = parse("Tipo,Lexema,Linea,Columna\nNUM,\"10\",1,5\n").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table[0], Token::new("NUM", "10", 1, 5));
    }

    #[test]
    fn test_header_content_is_not_validated() {
        let table = parse("whatever goes here\nID,\"x\",1,1\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_first_non_blank_line_is_the_header() {
        let table = parse("\n  \nTipo,Lexema,Linea,Columna\nID,\"x\",1,1\n").unwrap();
        assert_eq!(table.tokens(), &[Token::new("ID", "x", 1, 1)]);
    }

    #[test]
    fn test_quoted_comma_and_escaped_quote() {
        let table = parse("Tipo,Lexema,Linea,Columna\nID,\"a\"\"b,c\",3,7\n").unwrap();
        assert_eq!(table[0], Token::new("ID", "a\"b,c", 3, 7));
    }

    #[test]
    fn test_empty_and_header_only_inputs() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("Tipo,Lexema,Linea,Columna\n").unwrap().is_empty());
        assert!(parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_short_rows_are_dropped() {
        let text = "Tipo,Lexema,Linea,Columna\nID,\"x\",1\nNUM,\"1\",1,3\nbroken\n";
        let table = parse(text).unwrap();

        assert_eq!(table.tokens(), &[Token::new("NUM", "1", 1, 3)]);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let table = parse("H\nID,\"x\",2,4,extra,more\n").unwrap();
        assert_eq!(table[0], Token::new("ID", "x", 2, 4));
    }

    #[test]
    fn test_numbers_tolerate_surrounding_whitespace() {
        let table = parse("H\nID,\"x\", 2 ,\t4\n").unwrap();
        assert_eq!(table[0], Token::new("ID", "x", 2, 4));
    }

    #[test]
    fn test_crlf_input() {
        let table = parse("Tipo,Lexema,Linea,Columna\r\nID,\"x\",1,5\r\nOP,\"=\",1,7\r\n").unwrap();
        assert_eq!(
            table.tokens(),
            &[Token::new("ID", "x", 1, 5), Token::new("OP", "=", 1, 7)]
        );
    }

    #[test]
    fn test_multiline_lexeme() {
        let table = parse("H\nCOMMENT,\"/* a\nb */\",1,1\nID,\"x\",2,6\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].lexeme, "/* a\nb */");
    }

    #[test]
    fn test_unclosed_quote_only_drops_its_own_row() {
        let text = "Tipo,Lexema,Linea,Columna\nSTR,\"abc,1,1\nID,\"x\",1,5\nOP,\"=\",1,7\nNUM,\"10\",1,9\n";
        let table = parse(text).unwrap();

        assert_eq!(
            table.tokens(),
            &[
                Token::new("ID", "x", 1, 5),
                Token::new("OP", "=", 1, 7),
                Token::new("NUM", "10", 1, 9),
            ]
        );
    }

    #[test]
    fn test_bad_number_after_unclosed_quote_reports_its_line() {
        let err = parse("H\nSTR,\"abc,1,1\nID,\"x\",1,y\n").unwrap_err();
        assert_eq!(err.record, 3);
        assert_eq!(err.value, "y");
    }

    #[test]
    fn test_carriage_return_only_input() {
        let table = parse("Tipo,Lexema,Linea,Columna\rID,\"x\",1,5\rOP,\"=\",1,7\r").unwrap();
        assert_eq!(
            table.tokens(),
            &[Token::new("ID", "x", 1, 5), Token::new("OP", "=", 1, 7)]
        );
    }

    #[rstest]
    #[case::letters("H\nID,\"x\",one,1\n", PositionField::Line, "one")]
    #[case::zero_line("H\nID,\"x\",0,1\n", PositionField::Line, "0")]
    #[case::negative_column("H\nID,\"x\",1,-3\n", PositionField::Column, "-3")]
    #[case::empty_column("H\nID,\"x\",1,\n", PositionField::Column, "")]
    #[case::decimal("H\nID,\"x\",1.5,2\n", PositionField::Line, "1.5")]
    fn test_bad_numbers_fail_the_parse(
        #[case] text: &str,
        #[case] field: PositionField,
        #[case] value: &str,
    ) {
        let err = parse(text).unwrap_err();
        assert_eq!(err.record, 2);
        assert_eq!(err.field, field);
        assert_eq!(err.value, value);
    }

    #[test]
    fn test_bad_number_aborts_even_after_valid_rows() {
        let text = "H\nID,\"a\",1,1\nID,\"b\",1,x\nID,\"c\",1,3\n";
        let err = parse(text).unwrap_err();
        assert_eq!(err.record, 3);
        assert_eq!(err.field, PositionField::Column);
    }

    #[test]
    fn test_malformed_row_message() {
        let err = parse("H\n\nID,\"x\",abc,1\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed row at line 3: line \"abc\" is not a positive integer"
        );
    }
}
