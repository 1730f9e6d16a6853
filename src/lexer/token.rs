//! Token types for type-signature lexical analysis.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token in a type signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An unquoted identifier; source case preserved exactly.
    Identifier(SmolStr),
    /// A double-quoted identifier: the enclosed text verbatim, including
    /// internal spaces and case. Never matched against the phrase table.
    QuotedIdentifier(SmolStr),
    /// A run of digits.
    Number(u32),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns the text of an unquoted identifier.
    pub fn identifier(&self) -> Option<&SmolStr> {
        match self {
            TokenKind::Identifier(text) => Some(text),
            _ => None,
        }
    }

    /// Returns true for either identifier form.
    pub fn is_identifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(text) => write!(f, "{text}"),
            TokenKind::QuotedIdentifier(text) => write!(f, "\"{text}\""),
            TokenKind::Number(value) => write!(f, "{value}"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Eof => write!(f, "<EOF>"),
        }
    }
}

/// A lexical token with its kind and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the signature string.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
