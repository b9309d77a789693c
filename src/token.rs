//! Token model shared by the codec, the interpreter and the output formats

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::slice;

/// One lexical unit as reported by the analyzer.
///
/// `line` and `column` are 1-based; the codec refuses rows where either is
/// zero or not a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Category label, e.g. `KEYWORD`, `ID`, `NUM`
    pub kind: String,
    /// The exact matched text
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: impl Into<String>, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Token {
            kind: kind.into(),
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} at {}:{}",
            self.kind, self.lexeme, self.line, self.column
        )
    }
}

/// Tokens in the order the analyzer emitted them.
///
/// Order reflects source order and is preserved by parse and serialize. A
/// table is built once and never mutated afterwards; a new run produces a new
/// table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenTable {
    tokens: Vec<Token>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for TokenTable {
    fn from(tokens: Vec<Token>) -> Self {
        TokenTable { tokens }
    }
}

impl FromIterator<Token> for TokenTable {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenTable {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for TokenTable {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenTable {
    type Item = &'a Token;
    type IntoIter = slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl IntoIterator for TokenTable {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
