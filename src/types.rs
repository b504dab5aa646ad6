//! Semantic type classification of property values.
//!
//! [`classify`] maps every [`Value`] to exactly one [`TypeTag`]. The order of
//! the checks is fixed: containers and callables are tested before the
//! absent/invalid family, and the invalid family before plain scalars, so a
//! numeric NaN is tagged `NaN` rather than `Number`.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ChainError;
use crate::value::Value;

/// The semantic type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Number,
    String,
    Array,
    Object,
    Date,
    Function,
    Boolean,
    Null,
    Undefined,
    NaN,
}

impl TypeTag {
    /// Returns the canonical name of the tag (e.g. `"Number"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Number => "Number",
            TypeTag::String => "String",
            TypeTag::Array => "Array",
            TypeTag::Object => "Object",
            TypeTag::Date => "Date",
            TypeTag::Function => "Function",
            TypeTag::Boolean => "Boolean",
            TypeTag::Null => "Null",
            TypeTag::Undefined => "Undefined",
            TypeTag::NaN => "NaN",
        }
    }

    /// Returns true for tags that support length/value ordering checks.
    pub fn is_ordered(&self) -> bool {
        matches!(self, TypeTag::String | TypeTag::Array | TypeTag::Number)
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s {
            "Number" => TypeTag::Number,
            "String" => TypeTag::String,
            "Array" => TypeTag::Array,
            "Object" => TypeTag::Object,
            "Date" => TypeTag::Date,
            "Function" => TypeTag::Function,
            "Boolean" => TypeTag::Boolean,
            "Null" => TypeTag::Null,
            "Undefined" => TypeTag::Undefined,
            "NaN" => TypeTag::NaN,
            other => return Err(ChainError::UnknownType(other.to_string())),
        };
        Ok(tag)
    }
}

/// Classifies a value into its semantic type.
///
/// # Example
///
/// ```rust
/// use attest::{classify, TypeTag, Value};
///
/// assert_eq!(classify(&Value::from(5)), TypeTag::Number);
/// assert_eq!(classify(&Value::from(f64::NAN)), TypeTag::NaN);
/// assert_eq!(classify(&Value::Undefined), TypeTag::Undefined);
/// ```
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Array(_) => TypeTag::Array,
        Value::Date(_) => TypeTag::Date,
        Value::Function(_) => TypeTag::Function,
        Value::Object(_) => TypeTag::Object,
        Value::Null => TypeTag::Null,
        Value::Number(n) if n.is_nan() => TypeTag::NaN,
        Value::Undefined => TypeTag::Undefined,
        Value::Number(_) => TypeTag::Number,
        Value::Bool(_) => TypeTag::Boolean,
        Value::String(_) => TypeTag::String,
    }
}

/// Returns true for the tags that count as absent or invalid.
pub fn is_invalid_type(tag: TypeTag) -> bool {
    matches!(tag, TypeTag::Null | TypeTag::NaN | TypeTag::Undefined)
}
