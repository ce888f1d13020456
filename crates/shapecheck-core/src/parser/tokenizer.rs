//! Terminal matching for contract text
//!
//! There is no separate lexing pass. The chart parser asks a single
//! terminal whether it matches at a given offset, and only for terminals
//! some pending rule expects there.
//!
//! Guarantees:
//! - Deterministic: each terminal's match depends only on the input suffix
//! - Left-anchored: a match always starts exactly at the requested offset

use serde::Serialize;

/// Terminal categories of the contract grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    TypeName, // [A-Za-z]+
    Arrow,    // ->
    LParen,   // (
    RParen,   // )
    Comma,    // ,
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }
    Colon,    // :
    Question, // ?
}

impl Terminal {
    /// Fixed spelling of a punctuation terminal, `None` for `TypeName`
    pub fn literal(self) -> Option<&'static str> {
        match self {
            Terminal::TypeName => None,
            Terminal::Arrow => Some("->"),
            Terminal::LParen => Some("("),
            Terminal::RParen => Some(")"),
            Terminal::Comma => Some(","),
            Terminal::LBracket => Some("["),
            Terminal::RBracket => Some("]"),
            Terminal::LBrace => Some("{"),
            Terminal::RBrace => Some("}"),
            Terminal::Colon => Some(":"),
            Terminal::Question => Some("?"),
        }
    }

    /// Length in bytes of this terminal's match at `pos`, if any
    pub fn match_at(self, input: &str, pos: usize) -> Option<usize> {
        let rest = input.get(pos..)?;
        match self.literal() {
            Some(lit) => rest.starts_with(lit).then_some(lit.len()),
            None => {
                let len = rest
                    .bytes()
                    .take_while(|b| b.is_ascii_alphabetic())
                    .count();
                (len > 0).then_some(len)
            }
        }
    }
}

impl std::fmt::Display for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.literal() {
            Some(lit) => write!(f, "'{}'", lit),
            None => write!(f, "TYPE_NAME"),
        }
    }
}

/// A scanned terminal and the text it matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub terminal: Terminal,
    pub text: &'a str,
}

/// Try to scan `terminal` at `pos`
pub fn scan(input: &str, pos: usize, terminal: Terminal) -> Option<Token<'_>> {
    let len = terminal.match_at(input, pos)?;
    Some(Token {
        terminal,
        text: &input[pos..pos + len],
    })
}

/// Remove spaces, tabs and newlines; grammar symbols never contain them
pub fn strip_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
        .collect()
}
