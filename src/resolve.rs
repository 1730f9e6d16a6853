//! Post-order resolution of parsed type expressions into concrete types.
//!
//! Leaf names are checked against the built-in canonicalization table first
//! and against the custom-type registry second. Children resolve before their
//! enclosing composite, and the first unresolved leaf aborts the walk with
//! its captured name intact.

use crate::ast::{Span, TypeNode};
use crate::registry::TypeRegistry;
use crate::types::{DataType, RowField};
use smol_str::SmolStr;

/// A leaf name that matched neither the built-in table nor the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unresolved {
    /// The leaf text exactly as captured.
    pub name: SmolStr,
    /// Where the leaf appears in the signature.
    pub span: Span,
}

/// Looks up a built-in type by name, case-insensitively.
fn builtin_type(name: &str) -> Option<DataType> {
    match name.to_ascii_lowercase().as_str() {
        "boolean" => Some(DataType::Boolean),
        "tinyint" => Some(DataType::Tinyint),
        "smallint" => Some(DataType::Smallint),
        "int" | "integer" => Some(DataType::Integer),
        "bigint" => Some(DataType::Bigint),
        "real" => Some(DataType::Real),
        "double" => Some(DataType::Double),
        "varchar" => Some(DataType::Varchar),
        "varbinary" => Some(DataType::Varbinary),
        "timestamp" => Some(DataType::Timestamp),
        "date" => Some(DataType::Date),
        "interval year to month" => Some(DataType::IntervalYearMonth),
        "interval day to second" => Some(DataType::IntervalDayTime),
        _ => None,
    }
}

/// Resolves a type expression against the registry.
pub(crate) fn resolve(
    node: &TypeNode,
    registry: &dyn TypeRegistry,
) -> Result<DataType, Unresolved> {
    match node {
        TypeNode::Primitive { name, span } => {
            if let Some(builtin) = builtin_type(name) {
                return Ok(builtin);
            }
            if let Some(factory) = registry.lookup(name) {
                return Ok(factory.create());
            }
            Err(Unresolved {
                name: name.clone(),
                span: span.clone(),
            })
        }
        TypeNode::Decimal { precision, scale } => Ok(DataType::Decimal {
            precision: *precision,
            scale: *scale,
        }),
        TypeNode::Array(element) => Ok(DataType::Array(Box::new(resolve(element, registry)?))),
        TypeNode::Map(key, value) => Ok(DataType::Map(
            Box::new(resolve(key, registry)?),
            Box::new(resolve(value, registry)?),
        )),
        TypeNode::Function(children) => {
            let mut resolved = Vec::with_capacity(children.len());
            for child in children {
                resolved.push(resolve(child, registry)?);
            }
            let result = resolved.pop().expect("function node has a return type");
            Ok(DataType::Function {
                parameters: resolved,
                result: Box::new(result),
            })
        }
        TypeNode::Row(fields) => {
            let mut resolved = Vec::with_capacity(fields.len());
            for field in fields {
                let data_type = resolve(&field.node, registry)?;
                let name = field
                    .name
                    .as_ref()
                    .map(|name| name.node.clone())
                    .unwrap_or_default();
                resolved.push(RowField { name, data_type });
            }
            Ok(DataType::Row(resolved))
        }
    }
}
