//! Type-signature parsing for a columnar query engine's type system.
//!
//! Parses textual type signatures such as `"row(a bigint,b array(varchar))"`
//! into [`DataType`] descriptors. The grammar understands the composite
//! forms `array`, `map`, `row`, `function` and `decimal`, a closed table of
//! multi-word type phrases (`double precision`, `timestamp with time zone`,
//! ...), and an open-ended set of custom type names resolved through a
//! caller-supplied [`TypeRegistry`].
//!
//! Failures come in two structurally distinct shapes: a signature the
//! grammar cannot reduce is [`ParseTypeError::Malformed`] and reports the
//! entire input, while a well-formed signature with an unknown leaf type is
//! [`ParseTypeError::UnresolvedType`] and reports just that name.
//!
//! # Example
//!
//! ```
//! use typesig::{DataType, InMemoryRegistry, parse_type};
//!
//! let registry = InMemoryRegistry::new();
//! let parsed = parse_type("map(bigint,array(varchar))", &registry).unwrap();
//! assert_eq!(
//!     parsed,
//!     DataType::map(DataType::Bigint, DataType::array(DataType::Varchar)),
//! );
//! ```

pub mod ast;
pub mod diag;
pub mod error;
pub mod lexer;
pub mod parser;
mod phrase;
pub mod registry;
mod resolve;
pub mod types;

pub use ast::{RowFieldNode, Span, Spanned, TypeNode};
pub use diag::{Diag, DiagLabel, SourceFile};
pub use error::ParseTypeError;
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use registry::{InMemoryRegistry, TypeFactory, TypeRegistry};
pub use types::{DataType, RowField};

/// Parses a type signature into a concrete [`DataType`].
///
/// Parsing is pure and synchronous: the call allocates its own token stream
/// and syntax tree, consults `registry` only for leaf names the grammar has
/// already isolated, and returns without retaining any state. Concurrent
/// calls on independent inputs may share one registry.
pub fn parse_type(
    signature: &str,
    registry: &dyn TypeRegistry,
) -> Result<DataType, ParseTypeError> {
    let lexed = lexer::Lexer::new(signature).tokenize();
    if let Some(diag) = lexed.diagnostics.into_iter().next() {
        return Err(ParseTypeError::malformed(signature, diag));
    }

    let node = parser::TypeSignatureParser::new(&lexed.tokens)
        .parse()
        .map_err(|diag| ParseTypeError::malformed(signature, *diag))?;

    match resolve::resolve(&node, registry) {
        Ok(data_type) => Ok(data_type),
        // A signature that is nothing but one bare word must name a known
        // type; nested leaves are the resolver's to report.
        Err(unresolved) if is_single_bare_word(&lexed.tokens) => Err(ParseTypeError::malformed(
            signature,
            Diag::error(format!("unknown type name '{}'", unresolved.name))
                .with_label(unresolved.span, "not a known type")
                .with_code("P001"),
        )),
        Err(unresolved) => Err(ParseTypeError::UnresolvedType {
            name: unresolved.name,
            signature: signature.to_string(),
            span: unresolved.span,
        }),
    }
}

fn is_single_bare_word(tokens: &[Token]) -> bool {
    tokens.len() == 2 && matches!(tokens[0].kind, TokenKind::Identifier(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_round_trip() {
        let registry = InMemoryRegistry::new();
        let parsed = parse_type("array(row(a bigint,varchar))", &registry).unwrap();
        let reparsed = parse_type(&parsed.to_string(), &registry).unwrap();
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn lone_unknown_word_is_malformed() {
        let registry = InMemoryRegistry::new();
        let err = parse_type("x", &registry).unwrap_err();
        assert!(matches!(err, ParseTypeError::Malformed { .. }));
        assert_eq!(err.to_string(), "Failed to parse type [x]");
    }

    #[test]
    fn lone_registered_word_parses() {
        let registry = InMemoryRegistry::new();
        registry.register("json", std::sync::Arc::new(|| DataType::Custom("json".into())));
        assert_eq!(
            parse_type("json", &registry),
            Ok(DataType::Custom("json".into()))
        );
    }

    #[test]
    fn nested_unknown_word_is_unresolved() {
        let registry = InMemoryRegistry::new();
        let err = parse_type("array(x)", &registry).unwrap_err();
        assert!(matches!(err, ParseTypeError::UnresolvedType { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to parse type [x]. Type not registered."
        );
    }

    #[test]
    fn lexical_failure_is_malformed() {
        let registry = InMemoryRegistry::new();
        let err = parse_type("row(\"unclosed bigint)", &registry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse type [row(\"unclosed bigint)]"
        );
    }
}
