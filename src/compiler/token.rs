//! Token types produced by the scanner.
//!
//! Token values use a small-string optimization: text shorter than
//! [`INLINE_CAPACITY`] bytes lives inside the token itself, longer
//! text gets its own heap buffer. Callers cannot tell the branches
//! apart; retrieval and equality behave identically for both.

use std::fmt;
use std::str;

use super::diag::Position;

/// Values strictly shorter than this many bytes are stored inline.
pub const INLINE_CAPACITY: usize = 24;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Return,
    IntLiteral,
    StringLiteral,
    Identifier,
    Semicolon,
    Quote,
    EndOfFile,
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Return => "KEYWORD",
            TokenKind::IntLiteral => "INTEGER",
            TokenKind::StringLiteral => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Quote => "QUOTE",
            TokenKind::EndOfFile => "EOF",
            TokenKind::Invalid => "INVALID",
        };
        write!(f, "{}", name)
    }
}

/// Storage for a token's text. Deliberately not `Clone`: a token is
/// the sole owner of its value, and ownership moves with the token.
#[derive(Debug)]
pub enum TokenValue {
    Inline { buf: [u8; INLINE_CAPACITY], len: u8 },
    Owned(String),
}

impl TokenValue {
    /// Values at or above [`INLINE_CAPACITY`] bytes take the owned
    /// branch; the inline region never fills completely.
    pub fn new(text: &str) -> Self {
        if text.len() < INLINE_CAPACITY {
            let mut buf = [0u8; INLINE_CAPACITY];
            buf[..text.len()].copy_from_slice(text.as_bytes());
            TokenValue::Inline {
                buf,
                len: text.len() as u8,
            }
        } else {
            TokenValue::Owned(text.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            // The inline bytes are always a whole str copied in `new`.
            TokenValue::Inline { buf, len } => {
                str::from_utf8(&buf[..*len as usize]).expect("inline bytes copied from a str")
            }
            TokenValue::Owned(s) => s.as_str(),
        }
    }

    #[cfg(test)]
    fn is_inline(&self) -> bool {
        matches!(self, TokenValue::Inline { .. })
    }
}

impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TokenValue {}

/// A classified, positioned fragment of source text. Move-only, like
/// its value storage.
#[derive(PartialEq, Eq, Debug)]
pub struct Token {
    kind: TokenKind,
    value: TokenValue,
    pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: &str, pos: Position) -> Self {
        Token {
            kind,
            value: TokenValue::new(value),
            pos,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn position(&self) -> Position {
        self.pos
    }
}
