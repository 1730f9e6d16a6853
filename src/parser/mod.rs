//! Recursive-descent parser for type-signature strings.
//!
//! The parser consumes the token stream produced by the lexer and builds a
//! [`TypeNode`] tree. A parse is successful only if exactly one type
//! expression covers the entire stream.
//!
//! # Grammar
//!
//! ```text
//! type        := composite | row | primitive
//! composite   := "array" "(" type ")"
//!              | "map" "(" type "," type ")"
//!              | "function" "(" type ("," type)+ ")"
//!              | "decimal" "(" number "," number ")"
//! row         := "row" "(" field ("," field)* ")"
//! field       := [name] type
//! primitive   := phrase | identifier [ "(" number ("," number)* ")" ]
//! ```
//!
//! Structural keywords and phrase words are matched case-insensitively. A
//! quoted identifier is only ever a row-field name, never a type.

use crate::ast::{RowFieldNode, Span, Spanned, TypeNode};
use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};
use crate::phrase;

/// Common error type for parsing operations.
pub type ParseError = Box<Diag>;

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Keywords that head a parenthesized composite form. These are recognized
/// only when followed by `(`; elsewhere the same word can still name a row
/// field.
const STRUCTURAL_KEYWORDS: &[&str] = &["array", "map", "row", "function", "decimal"];

fn is_structural_keyword(word: &str) -> bool {
    STRUCTURAL_KEYWORDS
        .iter()
        .any(|keyword| word.eq_ignore_ascii_case(keyword))
}

/// Parser for type-signature token streams.
pub struct TypeSignatureParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TypeSignatureParser<'a> {
    /// Creates a new parser. The token slice must end with an EOF token.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses one complete type expression covering the whole stream.
    pub fn parse(mut self) -> ParseResult<TypeNode> {
        let node = self.parse_type()?;
        if !self.check(&TokenKind::Eof) {
            return Err(self.error_here(format!(
                "unexpected {} after type expression",
                self.current().kind
            )));
        }
        Ok(node)
    }

    /// Parses a type expression.
    fn parse_type(&mut self) -> ParseResult<TypeNode> {
        let TokenKind::Identifier(word) = &self.current().kind else {
            return Err(self.error_here(format!("expected a type, found {}", self.current().kind)));
        };
        let word = word.clone();

        if is_structural_keyword(&word) {
            if !matches!(self.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
                return Err(self.error_here(format!(
                    "'{word}' requires a parenthesized argument list"
                )));
            }
            self.advance();
            return match word.to_ascii_lowercase().as_str() {
                "array" => self.parse_array(),
                "map" => self.parse_map(),
                "function" => self.parse_function(),
                "decimal" => self.parse_decimal(),
                "row" => self.parse_row(),
                _ => unreachable!("structural keyword set is closed"),
            };
        }

        self.parse_primitive()
    }

    /// Parses `array(T)`. The keyword is already consumed.
    fn parse_array(&mut self) -> ParseResult<TypeNode> {
        self.expect(TokenKind::LParen)?;
        let element = self.parse_type()?;
        self.expect(TokenKind::RParen)?;
        Ok(TypeNode::Array(Box::new(element)))
    }

    /// Parses `map(K, V)`. The keyword is already consumed.
    fn parse_map(&mut self) -> ParseResult<TypeNode> {
        self.expect(TokenKind::LParen)?;
        let key = self.parse_type()?;
        self.expect(TokenKind::Comma)?;
        let value = self.parse_type()?;
        self.expect(TokenKind::RParen)?;
        Ok(TypeNode::Map(Box::new(key), Box::new(value)))
    }

    /// Parses `function(T1, .., Tn, R)` with at least one parameter and a
    /// return type. The keyword is already consumed.
    fn parse_function(&mut self) -> ParseResult<TypeNode> {
        self.expect(TokenKind::LParen)?;
        let mut children = vec![self.parse_type()?];
        while self.consume(&TokenKind::Comma) {
            children.push(self.parse_type()?);
        }
        self.expect(TokenKind::RParen)?;
        if children.len() < 2 {
            return Err(self.error_here(
                "function requires at least one parameter type and a return type",
            ));
        }
        Ok(TypeNode::Function(children))
    }

    /// Parses `decimal(p, s)`; both operands are mandatory numeric literals.
    /// The keyword is already consumed.
    fn parse_decimal(&mut self) -> ParseResult<TypeNode> {
        self.expect(TokenKind::LParen)?;
        let precision = self.expect_number("decimal precision")?;
        self.expect(TokenKind::Comma)?;
        let scale = self.expect_number("decimal scale")?;
        self.expect(TokenKind::RParen)?;
        Ok(TypeNode::Decimal { precision, scale })
    }

    /// Parses `row(field, ..)` with at least one field. The keyword is
    /// already consumed.
    fn parse_row(&mut self) -> ParseResult<TypeNode> {
        self.expect(TokenKind::LParen)?;
        if self.check(&TokenKind::RParen) {
            return Err(self.error_here("row requires at least one field"));
        }
        let mut fields = vec![self.parse_row_field()?];
        while self.consume(&TokenKind::Comma) {
            fields.push(self.parse_row_field()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(TypeNode::Row(fields))
    }

    /// Parses one row field, deciding whether its first token is a field
    /// name or the head of the field's type.
    ///
    /// A quoted identifier is always a name. For an unquoted identifier the
    /// decision is a pure lookahead: if a self-contained type expression
    /// starting at the first token would consume every token up to the next
    /// `,`/`)`, the field is unnamed and the whole remainder is the type;
    /// otherwise the first token is the name and the rest must be the type.
    fn parse_row_field(&mut self) -> ParseResult<RowFieldNode> {
        match &self.current().kind {
            TokenKind::QuotedIdentifier(text) => {
                let name = Spanned::new(text.clone(), self.current().span.clone());
                self.advance();
                let node = self.parse_type()?;
                Ok(RowFieldNode {
                    name: Some(name),
                    node,
                })
            }
            TokenKind::Identifier(text) => {
                if self.type_token_len(self.pos) == Some(self.field_token_len()) {
                    let node = self.parse_type()?;
                    return Ok(RowFieldNode { name: None, node });
                }
                let name = Spanned::new(text.clone(), self.current().span.clone());
                self.advance();
                let node = self.parse_type()?;
                Ok(RowFieldNode {
                    name: Some(name),
                    node,
                })
            }
            _ => Err(self.error_here(format!(
                "expected a row field, found {}",
                self.current().kind
            ))),
        }
    }

    /// Parses a leaf type: a phrase from the fixed table if one matches,
    /// otherwise a single bare identifier. A parenthesized numeric argument
    /// list after a bare identifier (e.g. `varchar(4)`) is parsed and
    /// discarded; it does not affect the resulting type.
    fn parse_primitive(&mut self) -> ParseResult<TypeNode> {
        if let Some((canonical, len)) = phrase::longest_match(self.tokens, self.pos) {
            let start = self.current().span.start;
            let end = self.tokens[self.pos + len - 1].span.end;
            for _ in 0..len {
                self.advance();
            }
            return Ok(TypeNode::Primitive {
                name: canonical.into(),
                span: start..end,
            });
        }

        let TokenKind::Identifier(name) = &self.current().kind else {
            return Err(self.error_here(format!("expected a type, found {}", self.current().kind)));
        };
        let name = name.clone();
        let span = self.current().span.clone();
        self.advance();

        if self.check(&TokenKind::LParen) {
            self.skip_numeric_arguments()?;
        }

        Ok(TypeNode::Primitive { name, span })
    }

    /// Consumes an ignored `( number (, number)* )` list after a bare
    /// primitive name.
    fn skip_numeric_arguments(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::LParen)?;
        self.expect_number("type argument")?;
        while self.consume(&TokenKind::Comma) {
            self.expect_number("type argument")?;
        }
        self.expect(TokenKind::RParen)?;
        Ok(())
    }

    /// Length in tokens of a self-contained type expression starting at
    /// `pos`, or `None` if no complete type can start there. This is the
    /// lookahead predicate behind row-field disambiguation; it inspects token
    /// shapes only and never commits a sub-parse.
    fn type_token_len(&self, pos: usize) -> Option<usize> {
        let token = self.tokens.get(pos)?;
        let TokenKind::Identifier(word) = &token.kind else {
            return None;
        };

        if is_structural_keyword(word) {
            return match self.tokens.get(pos + 1).map(|t| &t.kind) {
                Some(TokenKind::LParen) => self.balanced_group_len(pos + 1).map(|len| 1 + len),
                _ => None,
            };
        }

        if let Some((_, len)) = phrase::longest_match(self.tokens, pos) {
            return Some(len);
        }

        match self.tokens.get(pos + 1).map(|t| &t.kind) {
            Some(TokenKind::LParen) => self.balanced_group_len(pos + 1).map(|len| 1 + len),
            _ => Some(1),
        }
    }

    /// Number of tokens from the current position up to (excluding) the next
    /// `,` or `)` at the current nesting depth.
    fn field_token_len(&self) -> usize {
        let mut depth = 0usize;
        let mut len = 0;
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::RParen | TokenKind::Comma if depth == 0 => break,
                TokenKind::Eof => break,
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            len += 1;
        }
        len
    }

    /// Token count of a balanced parenthesized group starting at `pos`
    /// (which must be `(`), including both parentheses. `None` when the
    /// group is unbalanced.
    fn balanced_group_len(&self, pos: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (offset, token) in self.tokens[pos..].iter().enumerate() {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(offset + 1);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    /// Returns the current token.
    ///
    /// If the position is past the end, returns the last token (which should
    /// be EOF).
    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream must be non-empty"))
    }

    /// Returns the next token without consuming the current one.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    /// Advances to the next token. Does nothing if already at EOF.
    fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    /// Consumes the current token if it matches the given kind.
    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a specific token kind and returns its span.
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(&kind) {
            let span = self.current().span.clone();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(format!("expected {kind}, found {}", self.current().kind)))
        }
    }

    /// Expects a numeric literal and returns its value.
    fn expect_number(&mut self, context: &str) -> ParseResult<u32> {
        if let TokenKind::Number(value) = self.current().kind {
            self.advance();
            Ok(value)
        } else {
            Err(self.error_here(format!(
                "expected a number for {context}, found {}",
                self.current().kind
            )))
        }
    }

    /// Creates an error at the current token position.
    fn error_here(&self, message: impl Into<String>) -> ParseError {
        Box::new(
            Diag::error(message.into())
                .with_label(self.current().span.clone(), "here")
                .with_code("P001"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use smol_str::SmolStr;

    fn parse(signature: &str) -> ParseResult<TypeNode> {
        let lexed = tokenize(signature);
        assert!(
            lexed.diagnostics.is_empty(),
            "unexpected lexer diagnostics for '{signature}'"
        );
        TypeSignatureParser::new(&lexed.tokens).parse()
    }

    fn primitive(name: &str) -> TypeNode {
        match parse(name).expect("parse failed") {
            node @ TypeNode::Primitive { .. } => node,
            other => panic!("expected primitive, got {other:?}"),
        }
    }

    fn primitive_name(node: &TypeNode) -> &SmolStr {
        match node {
            TypeNode::Primitive { name, .. } => name,
            other => panic!("expected primitive, got {other:?}"),
        }
    }

    fn field_names(node: &TypeNode) -> Vec<Option<String>> {
        match node {
            TypeNode::Row(fields) => fields
                .iter()
                .map(|field| field.name.as_ref().map(|name| name.node.to_string()))
                .collect(),
            other => panic!("expected row, got {other:?}"),
        }
    }

    #[test]
    fn bare_primitive() {
        let node = primitive("bigint");
        assert_eq!(primitive_name(&node), "bigint");
    }

    #[test]
    fn primitive_case_preserved() {
        let node = primitive("HyperLogLog");
        assert_eq!(primitive_name(&node), "HyperLogLog");
    }

    #[test]
    fn primitive_with_ignored_length() {
        let node = parse("varchar(4)").unwrap();
        assert_eq!(primitive_name(&node), "varchar");
    }

    #[test]
    fn primitive_with_ignored_argument_list() {
        let node = parse("char(10, 2)").unwrap();
        assert_eq!(primitive_name(&node), "char");
    }

    #[test]
    fn phrase_canonicalization() {
        assert_eq!(primitive_name(&parse("double precision").unwrap()), "double");
        assert_eq!(
            primitive_name(&parse("TIMESTAMP WITH TIME ZONE").unwrap()),
            "timestamp with time zone"
        );
    }

    #[test]
    fn array_of_array() {
        let node = parse("array(array(bigint))").unwrap();
        let TypeNode::Array(inner) = node else {
            panic!("expected array");
        };
        let TypeNode::Array(leaf) = *inner else {
            panic!("expected nested array");
        };
        assert_eq!(primitive_name(&leaf), "bigint");
    }

    #[test]
    fn map_structure() {
        let node = parse("map(bigint,array(varchar))").unwrap();
        let TypeNode::Map(key, value) = node else {
            panic!("expected map");
        };
        assert_eq!(primitive_name(&key), "bigint");
        assert!(matches!(*value, TypeNode::Array(_)));
    }

    #[test]
    fn function_children_in_order() {
        let node = parse("function(bigint,varchar,boolean)").unwrap();
        let TypeNode::Function(children) = node else {
            panic!("expected function");
        };
        let names: Vec<_> = children.iter().map(|c| primitive_name(c).as_str()).collect();
        assert_eq!(names, vec!["bigint", "varchar", "boolean"]);
    }

    #[test]
    fn function_requires_return_type() {
        assert!(parse("function(bigint)").is_err());
    }

    #[test]
    fn decimal_operands() {
        let node = parse("decimal(10, 5)").unwrap();
        assert_eq!(
            node,
            TypeNode::Decimal {
                precision: 10,
                scale: 5
            }
        );
    }

    #[test]
    fn decimal_structural_failures() {
        assert!(parse("decimal").is_err());
        assert!(parse("decimal()").is_err());
        assert!(parse("decimal(20)").is_err());
        assert!(parse("decimal(, 20)").is_err());
        assert!(parse("decimal(a, b)").is_err());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert!(matches!(parse("RoW(a bigint)").unwrap(), TypeNode::Row(_)));
        assert!(matches!(parse("ARRAY(bigint)").unwrap(), TypeNode::Array(_)));
    }

    #[test]
    fn named_and_unnamed_fields() {
        let node = parse("row(a bigint,varchar)").unwrap();
        assert_eq!(field_names(&node), vec![Some("a".to_string()), None]);
    }

    #[test]
    fn unnamed_field_with_length_argument() {
        let node = parse("row(varchar(10),b row(bigint))").unwrap();
        assert_eq!(field_names(&node), vec![None, Some("b".to_string())]);
    }

    #[test]
    fn quoted_field_name_is_verbatim() {
        let node = parse("row(\"12 tb\" bigint)").unwrap();
        assert_eq!(field_names(&node), vec![Some("12 tb".to_string())]);
    }

    #[test]
    fn quoted_name_shadowing_a_phrase_is_still_a_name() {
        let node = parse("row(\"timestamp with time zone\" timestamp with time zone)").unwrap();
        assert_eq!(
            field_names(&node),
            vec![Some("timestamp with time zone".to_string())]
        );
    }

    #[test]
    fn phrase_field_is_unnamed() {
        let node = parse("row(double precision)").unwrap();
        assert_eq!(field_names(&node), vec![None]);
        let TypeNode::Row(fields) = &node else {
            unreachable!();
        };
        assert_eq!(primitive_name(&fields[0].node), "double");
    }

    #[test]
    fn phrase_word_can_name_a_field() {
        // First "double" is the field name, "double precision" is the type.
        let node = parse("row(double double precision)").unwrap();
        assert_eq!(field_names(&node), vec![Some("double".to_string())]);

        let node = parse("row(interval interval year to month)").unwrap();
        assert_eq!(field_names(&node), vec![Some("interval".to_string())]);

        let node = parse("row(time time with time zone)").unwrap();
        assert_eq!(field_names(&node), vec![Some("time".to_string())]);
        let TypeNode::Row(fields) = &node else {
            unreachable!();
        };
        assert_eq!(primitive_name(&fields[0].node), "time with time zone");
    }

    #[test]
    fn structural_keyword_can_name_a_field() {
        // "array" without parentheses is not a type head here.
        let node = parse("row(array bigint)").unwrap();
        assert_eq!(field_names(&node), vec![Some("array".to_string())]);
    }

    #[test]
    fn unsupported_phrase_is_structural() {
        // "timestamp" is taken as the field name and "without" as its type,
        // leaving tokens that cannot belong to the field.
        assert!(parse("row(col0 timestamp without time zone)").is_err());
    }

    #[test]
    fn row_requires_fields() {
        assert!(parse("row()").is_err());
    }

    #[test]
    fn empty_argument_lists_fail() {
        assert!(parse("blah()").is_err());
        assert!(parse("array()").is_err());
        assert!(parse("map()").is_err());
    }

    #[test]
    fn keyword_suffix_is_not_a_keyword() {
        // "rowxxx" must not be treated as a row type; its argument is not a
        // number, so the ignored-argument form fails too.
        assert!(parse("rowxxx(a)").is_err());
    }

    #[test]
    fn leftover_tokens_fail() {
        assert!(parse("bigint varchar").is_err());
        assert!(parse("array(bigint))").is_err());
    }

    #[test]
    fn missing_close_paren_fails() {
        assert!(parse("array(bigint").is_err());
        assert!(parse("row(a bigint").is_err());
    }

    #[test]
    fn empty_input_fails() {
        assert!(parse("").is_err());
    }

    #[test]
    fn structural_keyword_without_arguments_fails() {
        assert!(parse("array").is_err());
        assert!(parse("row").is_err());
    }
}
