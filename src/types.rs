//! Concrete type descriptors produced by signature resolution.
//!
//! [`DataType`] is the value a successful parse returns: an owned,
//! structurally comparable description of the type. Its `Display`
//! implementation renders the canonical signature text, so a rendered type
//! re-parses to an equal descriptor.

use smol_str::SmolStr;
use std::fmt;

/// A resolved data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Tinyint,
    Smallint,
    Integer,
    Bigint,
    Real,
    Double,
    Varchar,
    Varbinary,
    Timestamp,
    Date,
    IntervalYearMonth,
    IntervalDayTime,
    /// Fixed-precision decimal.
    Decimal {
        /// Total number of digits.
        precision: u32,
        /// Digits to the right of the decimal point.
        scale: u32,
    },
    /// Array with an element type.
    Array(Box<DataType>),
    /// Map from a key type to a value type.
    Map(Box<DataType>, Box<DataType>),
    /// Row with named (possibly empty-named) fields in order.
    Row(Vec<RowField>),
    /// Lambda signature: parameter types in order plus a return type.
    Function {
        /// Parameter types, in order.
        parameters: Vec<DataType>,
        /// The return type.
        result: Box<DataType>,
    },
    /// A custom type resolved through the registry, identified by its
    /// registered name.
    Custom(SmolStr),
}

/// A field of a row type. An empty name represents an unnamed field. Field
/// order is part of the row type's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowField {
    /// The field name; empty for an unnamed field.
    pub name: SmolStr,
    /// The field's type.
    pub data_type: DataType,
}

impl RowField {
    /// Creates a named field.
    pub fn new(name: impl Into<SmolStr>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Creates an unnamed field.
    pub fn unnamed(data_type: DataType) -> Self {
        Self {
            name: SmolStr::default(),
            data_type,
        }
    }
}

impl DataType {
    /// Creates an array type.
    pub fn array(element: DataType) -> Self {
        DataType::Array(Box::new(element))
    }

    /// Creates a map type.
    pub fn map(key: DataType, value: DataType) -> Self {
        DataType::Map(Box::new(key), Box::new(value))
    }

    /// Creates a row type.
    pub fn row(fields: Vec<RowField>) -> Self {
        DataType::Row(fields)
    }

    /// Creates a function type.
    pub fn function(parameters: Vec<DataType>, result: DataType) -> Self {
        DataType::Function {
            parameters,
            result: Box::new(result),
        }
    }
}

/// True when `name` can be written without quotes and still lex as a single
/// identifier token.
fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "boolean"),
            DataType::Tinyint => write!(f, "tinyint"),
            DataType::Smallint => write!(f, "smallint"),
            DataType::Integer => write!(f, "integer"),
            DataType::Bigint => write!(f, "bigint"),
            DataType::Real => write!(f, "real"),
            DataType::Double => write!(f, "double"),
            DataType::Varchar => write!(f, "varchar"),
            DataType::Varbinary => write!(f, "varbinary"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Date => write!(f, "date"),
            DataType::IntervalYearMonth => write!(f, "interval year to month"),
            DataType::IntervalDayTime => write!(f, "interval day to second"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({precision}, {scale})"),
            DataType::Array(element) => write!(f, "array({element})"),
            DataType::Map(key, value) => write!(f, "map({key}, {value})"),
            DataType::Row(fields) => {
                write!(f, "row(")?;
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    if !field.name.is_empty() {
                        if is_bare_identifier(&field.name) {
                            write!(f, "{} ", field.name)?;
                        } else {
                            write!(f, "\"{}\" ", field.name.replace('"', "\"\""))?;
                        }
                    }
                    write!(f, "{}", field.data_type)?;
                }
                write!(f, ")")
            }
            DataType::Function { parameters, result } => {
                write!(f, "function(")?;
                for parameter in parameters {
                    write!(f, "{parameter}, ")?;
                }
                write!(f, "{result})")
            }
            DataType::Custom(name) => write!(f, "{name}"),
        }
    }
}
