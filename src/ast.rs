//! AST foundation: source spans and the build-only type-expression tree.

use smol_str::SmolStr;
use std::ops::Range;

/// A span representing a range in the signature string.
/// This is the canonical span type used throughout the parser.
pub type Span = Range<usize>;

/// A value with an associated source span.
///
/// `Spanned<T>` pairs a syntax node or token payload with its location in the
/// signature string, for diagnostics and error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub node: T,
    /// The span in the signature where this value appears.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned value.
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Extracts the inner value, discarding the span.
    pub fn into_inner(self) -> T {
        self.node
    }

    /// Returns a reference to the span.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// One field of a `row(...)` signature.
///
/// Field order is preserved from source order; it is part of the row type's
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFieldNode {
    /// Field name exactly as captured, or `None` for an unnamed field.
    /// An unnamed field resolves to the empty field name.
    pub name: Option<Spanned<SmolStr>>,
    /// The field's type expression.
    pub node: TypeNode,
}

/// A parsed type expression.
///
/// `TypeNode` is build-only: the parser constructs it, the resolver consumes
/// it once, and it has no life outside a single parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// A leaf type name: phrase-matched and canonicalized where applicable,
    /// otherwise the identifier text with its source case preserved.
    Primitive {
        /// The captured or canonical name.
        name: SmolStr,
        /// Where the name (or whole phrase) appears in the signature.
        span: Span,
    },
    /// `decimal(p, s)`; both operands are mandatory numeric literals.
    Decimal {
        /// Total number of digits.
        precision: u32,
        /// Digits to the right of the decimal point.
        scale: u32,
    },
    /// `array(T)`.
    Array(Box<TypeNode>),
    /// `map(K, V)`.
    Map(Box<TypeNode>, Box<TypeNode>),
    /// `function(T1, .., Tn, R)`; at least two children, the last one is the
    /// return type (designated by the resolver, not by the AST shape).
    Function(Vec<TypeNode>),
    /// `row(field, ..)` with at least one field, in source order.
    Row(Vec<RowFieldNode>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanned_new_and_accessors() {
        let spanned = Spanned::new(SmolStr::new("a"), 4..5);
        assert_eq!(spanned.node, "a");
        assert_eq!(spanned.span(), &(4..5));
        assert_eq!(spanned.into_inner(), "a");
    }

    #[test]
    fn row_field_node_preserves_missing_name() {
        let field = RowFieldNode {
            name: None,
            node: TypeNode::Primitive {
                name: SmolStr::new("bigint"),
                span: 4..10,
            },
        };
        assert!(field.name.is_none());
    }

    #[test]
    fn type_node_equality_is_structural() {
        let a = TypeNode::Array(Box::new(TypeNode::Primitive {
            name: SmolStr::new("varchar"),
            span: 6..13,
        }));
        let b = TypeNode::Array(Box::new(TypeNode::Primitive {
            name: SmolStr::new("varchar"),
            span: 6..13,
        }));
        assert_eq!(a, b);
    }
}
