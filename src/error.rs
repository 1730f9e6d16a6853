//! Public error type for signature parsing.
//!
//! Two structurally distinct failures, produced by two distinct phases: a
//! signature the grammar could not reduce (reported with the entire input),
//! and a well-formed signature whose leaf type name is unknown (reported
//! with just that name, however deeply nested). Callers must treat these as
//! different outcomes, not variants of the same failure.

use crate::ast::Span;
use crate::diag::{Diag, SourceFile, convert_diag_to_report};
use miette::Report;
use smol_str::SmolStr;
use std::fmt;

/// Error returned by [`parse_type`](crate::parse_type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTypeError {
    /// The token stream could not be reduced to one complete type
    /// expression, or tokens remained after a successful reduction.
    Malformed {
        /// The entire original signature string.
        signature: String,
        /// The underlying structural diagnostic, with spans into
        /// `signature`.
        diag: Diag,
    },
    /// The signature parsed, but a leaf type name matched neither the
    /// built-in table nor the registry.
    UnresolvedType {
        /// The leaf name exactly as captured, independent of nesting depth.
        name: SmolStr,
        /// The original signature, kept for diagnostic rendering.
        signature: String,
        /// Where the name appears in `signature`.
        span: Span,
    },
}

impl ParseTypeError {
    pub(crate) fn malformed(signature: &str, diag: Diag) -> Self {
        ParseTypeError::Malformed {
            signature: signature.to_string(),
            diag,
        }
    }

    /// Renders a rich report with the signature attached as source context.
    pub fn to_report(&self) -> Report {
        match self {
            ParseTypeError::Malformed { signature, diag } => {
                convert_diag_to_report(diag, &SourceFile::new(signature.clone()))
            }
            ParseTypeError::UnresolvedType {
                name,
                signature,
                span,
            } => {
                let diag = Diag::error(format!("unknown type '{name}'"))
                    .with_label(span.clone(), "not registered")
                    .with_help("register the type before parsing signatures that use it")
                    .with_code("R001");
                convert_diag_to_report(&diag, &SourceFile::new(signature.clone()))
            }
        }
    }
}

impl fmt::Display for ParseTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTypeError::Malformed { signature, .. } => {
                write!(f, "Failed to parse type [{signature}]")
            }
            ParseTypeError::UnresolvedType { name, .. } => {
                write!(f, "Failed to parse type [{name}]. Type not registered.")
            }
        }
    }
}

impl std::error::Error for ParseTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_carries_full_signature() {
        let err = ParseTypeError::malformed("array()", Diag::error("expected a type, found )"));
        assert_eq!(err.to_string(), "Failed to parse type [array()]");
    }

    #[test]
    fn unresolved_display_carries_leaf_name_only() {
        let err = ParseTypeError::UnresolvedType {
            name: "HyperLogLog".into(),
            signature: "row(col0 row(array(HyperLogLog)))".to_string(),
            span: 19..30,
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse type [HyperLogLog]. Type not registered."
        );
    }

    #[test]
    fn reports_render_without_panicking() {
        let malformed = ParseTypeError::malformed(
            "map()",
            Diag::error("expected a type, found )").with_label(4..5, "here"),
        );
        assert_eq!(malformed.to_report().to_string(), "expected a type, found )");

        let unresolved = ParseTypeError::UnresolvedType {
            name: "geometry".into(),
            signature: "array(geometry)".to_string(),
            span: 6..14,
        };
        assert_eq!(
            unresolved.to_report().to_string(),
            "unknown type 'geometry'"
        );
    }
}
