//! Lexical analysis for type signatures.
//!
//! Converts a signature string into a flat token stream. Whitespace outside
//! quotes is a separator and carries no semantic weight beyond marking word
//! boundaries; a quoted segment is emitted as exactly one token regardless of
//! internal whitespace.

pub mod token;

use crate::diag::Diag;
use token::{Token, TokenKind};

/// Result of lexical analysis.
///
/// Contains both the tokens produced and any diagnostics encountered during
/// scanning. Any diagnostic makes the overall signature malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, including an EOF token at the end.
    pub tokens: Vec<Token>,
    /// Diagnostics encountered during scanning.
    pub diagnostics: Vec<Diag>,
}

/// A lexical analyzer for type-signature strings.
pub struct Lexer<'a> {
    /// The signature text being lexed.
    source: &'a str,
    /// Current byte position in the signature.
    pos: usize,
    /// Accumulated tokens.
    tokens: Vec<Token>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given signature.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the signature and returns the result.
    ///
    /// This consumes the lexer and returns both tokens and diagnostics.
    pub fn tokenize(mut self) -> LexerResult {
        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        // Always add EOF token
        let eof_pos = self.source.len();
        self.tokens.push(Token::new(TokenKind::Eof, eof_pos..eof_pos));

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Scans a single token.
    fn scan_token(&mut self) {
        let start = self.pos;
        let ch = self.advance();

        match ch {
            '(' => self.add_token(TokenKind::LParen, start),
            ')' => self.add_token(TokenKind::RParen, start),
            ',' => self.add_token(TokenKind::Comma, start),

            '"' => self.scan_quoted_identifier(start),

            '0'..='9' => self.scan_number(start),

            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(start),

            _ => {
                self.error(start, format!("unexpected character '{ch}'"));
            }
        }
    }

    /// Scans an unquoted identifier. Case is preserved as written; keyword
    /// and phrase recognition happen in the parser.
    fn scan_identifier(&mut self, start: usize) {
        while self.is_identifier_continue(self.peek()) {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        self.add_token(TokenKind::Identifier(text.into()), start);
    }

    /// Scans a run of digits as a numeric literal.
    fn scan_number(&mut self, start: usize) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        match text.parse::<u32>() {
            Ok(value) => self.add_token(TokenKind::Number(value), start),
            Err(_) => self.error(start, format!("numeric literal '{text}' out of range")),
        }
    }

    /// Scans a quoted identifier. An embedded quote character is written as
    /// a doubled quote; the enclosed text is emitted verbatim as one token.
    fn scan_quoted_identifier(&mut self, start: usize) {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                self.error(start, "unterminated quoted identifier");
                return;
            }
            let ch = self.advance();
            if ch == '"' {
                if self.peek() == '"' {
                    self.advance();
                    value.push('"');
                } else {
                    break;
                }
            } else {
                value.push(ch);
            }
        }

        self.add_token(TokenKind::QuotedIdentifier(value.into()), start);
    }

    /// Skips whitespace between tokens.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\r' | '\n') {
            self.advance();
        }
    }

    /// Returns true if the character can continue an identifier.
    fn is_identifier_continue(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    /// Adds a token spanning from `start` to the current position.
    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, start..self.pos));
    }

    /// Adds an error diagnostic at `start`.
    fn error(&mut self, start: usize, message: impl Into<String>) {
        let span = start..self.pos.max(start);
        self.diagnostics.push(
            Diag::error(message.into())
                .with_label(span, "here")
                .with_code("L001"),
        );
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    /// Advances and returns the current character.
    fn advance(&mut self) -> char {
        let ch = self.peek();
        if ch != '\0' {
            self.pos += ch.len_utf8();
        }
        ch
    }

    /// Returns true if at end of input.
    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Convenience function to tokenize a signature string.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let result = tokenize("");
        assert_eq!(result.tokens.len(), 1); // Just EOF
        assert_eq!(result.tokens[0].kind, TokenKind::Eof);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn whitespace_only() {
        let result = tokenize("   \t\n  ");
        assert_eq!(result.tokens.len(), 1); // Just EOF
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn simple_signature() {
        let result = tokenize("array(bigint)");
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier("array".into()),
                TokenKind::LParen,
                TokenKind::Identifier("bigint".into()),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn identifier_case_preserved() {
        let result = tokenize("HyperLogLog");
        assert_eq!(
            result.tokens[0].kind,
            TokenKind::Identifier("HyperLogLog".into())
        );
    }

    #[test]
    fn whitespace_separates_words() {
        let result = tokenize("double precision");
        assert_eq!(result.tokens.len(), 3);
        assert_eq!(
            result.tokens[0].kind,
            TokenKind::Identifier("double".into())
        );
        assert_eq!(
            result.tokens[1].kind,
            TokenKind::Identifier("precision".into())
        );
    }

    #[test]
    fn numbers() {
        let result = tokenize("decimal(10, 5)");
        assert_eq!(result.tokens[2].kind, TokenKind::Number(10));
        assert_eq!(result.tokens[4].kind, TokenKind::Number(5));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn number_out_of_range() {
        let result = tokenize("varchar(99999999999999999999)");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("out of range"));
    }

    #[test]
    fn quoted_identifier_preserves_spaces() {
        let result = tokenize("\"12 tb\" bigint");
        assert_eq!(
            result.tokens[0].kind,
            TokenKind::QuotedIdentifier("12 tb".into())
        );
        assert_eq!(
            result.tokens[1].kind,
            TokenKind::Identifier("bigint".into())
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn quoted_identifier_with_escaped_quote() {
        let result = tokenize("\"a\"\"b\"");
        assert_eq!(
            result.tokens[0].kind,
            TokenKind::QuotedIdentifier("a\"b".into())
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unterminated_quote() {
        let result = tokenize("\"unclosed");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("unterminated"));
    }

    #[test]
    fn unexpected_character() {
        let result = tokenize("bigint %");
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].message.contains("unexpected character"));
    }

    #[test]
    fn token_spans() {
        let result = tokenize("map(a, b)");
        assert_eq!(result.tokens[0].span, 0..3);
        assert_eq!(result.tokens[1].span, 3..4);
        assert_eq!(result.tokens[2].span, 4..5);
        assert_eq!(result.tokens[3].span, 5..6);
        assert_eq!(result.tokens[4].span, 7..8);
        assert_eq!(result.tokens[5].span, 8..9);
    }
}
