//! Record and field splitting with double-quote escaping
//!
//! Lines end at `\n`, `\r\n` or a lone `\r`.

/// One logical row of delimited text.
///
/// A record normally spans one physical line. A line break inside an open
/// quoted field does not end the record, so a lexeme that contains a line
/// break survives export and re-import. The continuation only holds when it
/// closes cleanly: if the quote is never closed, or the joined text has fewer
/// than four fields, the record is just its first physical line and the
/// following lines are read on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// 1-based line number where the record starts
    pub line: usize,
    /// Record text without its terminator
    pub text: &'a str,
}

impl Record<'_> {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Iterate over the records of `text`.
pub fn records(text: &str) -> Records<'_> {
    Records {
        rest: text,
        line: 0,
    }
}

/// Iterator returned by [`records`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    rest: &'a str,
    /// Line breaks consumed so far
    line: usize,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        if self.rest.is_empty() {
            return None;
        }

        let rest = self.rest;
        let span = scan(rest, true)
            .filter(|span| !span.joined || split_fields(&rest[..span.end]).len() >= 4)
            .or_else(|| scan(rest, false))?;

        let record = Record {
            line: self.line + 1,
            text: &rest[..span.end],
        };
        self.rest = &rest[span.next..];
        self.line += span.breaks;
        Some(record)
    }
}

/// Extent of one record within the remaining input
struct Span {
    /// End of the record text, terminator excluded
    end: usize,
    /// Start of the following record
    next: usize,
    /// Line breaks consumed, terminator included
    breaks: usize,
    /// Whether the record runs past a line break inside quotes
    joined: bool,
}

/// Find the end of the record at the start of `text`.
///
/// With `quoted`, line breaks inside quotes are part of the record and `None`
/// means a quote is still open at end of input. Toggling on every quote has
/// the same parity as [`split_fields`], which reads `""` inside quotes as an
/// escaped quote. `"`, `\r` and `\n` are ASCII, so every offset is a char
/// boundary.
fn scan(text: &str, quoted: bool) -> Option<Span> {
    let bytes = text.as_bytes();
    let mut in_quotes = false;
    let mut breaks = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        let crlf = byte == b'\r' && bytes.get(i + 1) == Some(&b'\n');
        match byte {
            b'"' if quoted => in_quotes = !in_quotes,
            // The `\n` of a `\r\n` pair is counted on its own
            b'\n' | b'\r' if in_quotes => breaks += usize::from(!crlf),
            b'\n' | b'\r' => {
                return Some(Span {
                    end: i,
                    next: if crlf { i + 2 } else { i + 1 },
                    breaks: breaks + 1,
                    joined: breaks > 0,
                });
            }
            _ => {}
        }
    }

    (!in_quotes).then_some(Span {
        end: bytes.len(),
        next: bytes.len(),
        breaks,
        joined: breaks > 0,
    })
}

/// Split one record into fields.
///
/// A double quote toggles quoted mode; inside quotes a comma is literal and
/// `""` stands for one `"`. A comma outside quotes separates fields.
pub fn split_fields(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        records(input).map(|r| r.text).collect()
    }

    #[test]
    fn test_split_plain_fields() {
        assert_eq!(split_fields("a,b,c,d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_quoted_comma_and_escaped_quote() {
        assert_eq!(
            split_fields(r#"ID,"a""b,c",3,7"#),
            vec!["ID", "a\"b,c", "3", "7"]
        );
    }

    #[test]
    fn test_split_empty_quoted_field() {
        assert_eq!(split_fields(r#"EMPTY,"",1,1"#), vec!["EMPTY", "", "1", "1"]);
    }

    #[test]
    fn test_split_lone_quote_lexeme() {
        // A lexeme consisting of a single double quote is exported as """"
        assert_eq!(
            split_fields(r#"PUNCT,"""",4,2"#),
            vec!["PUNCT", "\"", "4", "2"]
        );
    }

    #[test]
    fn test_split_trailing_comma_yields_empty_field() {
        assert_eq!(split_fields("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_split_empty_record_is_one_empty_field() {
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_records_split_on_newlines() {
        assert_eq!(texts("a\nb\n\nc"), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_records_drop_carriage_return() {
        assert_eq!(texts("a\r\nb\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_record_continues_inside_quotes() {
        let input = "H\nSTR,\"one\ntwo\",1,5\nID,\"x\",3,1\n";
        let all: Vec<_> = records(input).collect();

        assert_eq!(all.len(), 3);
        assert_eq!(all[1].text, "STR,\"one\ntwo\",1,5");
        assert_eq!(all[1].line, 2);
        assert_eq!(all[2].line, 4);
    }

    #[test]
    fn test_records_split_on_lone_carriage_return() {
        assert_eq!(texts("a\rb\r\rc\r"), vec!["a", "b", "", "c"]);
        let lines: Vec<_> = records("a\rb\r\nc").map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_unclosed_quote_ends_at_its_own_line() {
        let all: Vec<_> = records("STR,\"abc,1,1\nID,\"x\",1,5\n").collect();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].text, "STR,\"abc,1,1");
        assert_eq!(all[1].text, "ID,\"x\",1,5");
        assert_eq!(all[1].line, 2);
    }

    #[test]
    fn test_joined_record_needs_four_fields() {
        // The quotes balance across the two lines but the join is not a row
        let all: Vec<_> = records("A,\"b\nc\"\nID,\"x\",1,5").collect();

        assert_eq!(all.len(), 3);
        assert_eq!(all[0].text, "A,\"b");
        assert_eq!(all[1].text, "c\"");
        assert_eq!(all[2].line, 3);
    }

    #[test]
    fn test_record_line_numbers() {
        let lines: Vec<_> = records("a\n\nb\n").map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_blank_record_detection() {
        let all: Vec<_> = records("x\n \t\n").collect();
        assert!(!all[0].is_blank());
        assert!(all[1].is_blank());
    }
}
