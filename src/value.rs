//! Dynamic property values and the bags they arrive in.
//!
//! This module provides [`Value`], the loosely-typed value a chain inspects,
//! and [`PropertyBag`], a flat `name → value` mapping. Several bags are
//! shallow-merged into one namespace when a chain is created.

use std::fmt::{self, Display};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::error::ChainError;

/// A callable stored as a property value.
///
/// Functions compare by identity: two `Function`s are equal only when they
/// wrap the same allocation.
#[derive(Clone)]
pub struct Function(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Function {
    /// Wraps a closure as a property value.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the wrapped closure.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// Returns true if both handles point at the same closure.
    pub fn same_as(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

/// A dynamically-typed property value.
///
/// `Undefined` stands for a property that is absent from every bag, and
/// `Number(f64::NAN)` is the not-a-number sentinel.
///
/// # Example
///
/// ```rust
/// use attest::Value;
/// use serde_json::json;
///
/// let value = Value::from(json!({"a": [1, 2]}));
/// assert!(value.is_truthy());
/// assert!(!Value::from(0).is_truthy());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// A missing property.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Date(DateTime<Utc>),
    Function(Function),
}

impl Value {
    /// Returns true if this is the not-a-number sentinel.
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    /// Returns the truthiness of the value.
    ///
    /// Falsy values are exactly: undefined, null, `false`, `0`, NaN and the
    /// empty string. Every array, object, date and function is truthy, even
    /// when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Date(_) | Value::Function(_) => true,
        }
    }

    /// Returns the length of a string (in characters) or an array.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Strict equality: same variant and same scalar value.
    ///
    /// NaN is never strictly equal to anything, containers compare by
    /// contents and functions by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.same_as(b),
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                self.deep_eq(other)
            }
            _ => false,
        }
    }

    /// Deep structural equality.
    ///
    /// Objects compare regardless of key order, and NaN equals NaN.
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.deep_eq(y)))
            }
            _ => self.strict_eq(other),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::Function(_) => write!(f, "function"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// A flat set of named values.
///
/// # Example
///
/// ```rust
/// use attest::PropertyBag;
///
/// let bag = PropertyBag::new()
///     .with("name", "Alice")
///     .with("age", 30);
///
/// assert_eq!(bag.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyBag(IndexMap<String, Value>);

impl PropertyBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property and returns self for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Inserts a property, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builds a bag from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::InvalidBag` if the document is not an object.
    pub fn from_json(document: serde_json::Value) -> Result<Self, ChainError> {
        match document {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ChainError::InvalidBag(json_kind(&other).to_string())),
        }
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the bag has no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shallow-merges bags in order; later bags win on key collision.
    pub fn merge_all<I>(bags: I) -> Self
    where
        I: IntoIterator<Item = PropertyBag>,
    {
        let mut merged = IndexMap::new();
        for bag in bags {
            merged.extend(bag.0);
        }
        Self(merged)
    }

    /// Returns an iterator over the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyBag
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness_family() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());

        assert!(Value::from(-1).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::Object(IndexMap::new()).is_truthy());
    }

    #[test]
    fn test_len_counts_characters() {
        assert_eq!(Value::from("héllo").length(), Some(5));
        assert_eq!(Value::from(vec![1, 2, 3]).length(), Some(3));
        assert_eq!(Value::from(3).length(), None);
    }

    #[test]
    fn test_strict_eq_nan_is_never_equal() {
        let nan = Value::from(f64::NAN);
        assert!(!nan.strict_eq(&nan));
        assert!(nan.deep_eq(&nan));
    }

    #[test]
    fn test_deep_eq_ignores_key_order() {
        let a = Value::from(json!({"x": 1, "y": {"z": [1, 2]}}));
        let b = Value::from(json!({"y": {"z": [1, 2]}, "x": 1}));
        let c = Value::from(json!({"y": {"z": [2, 1]}, "x": 1}));

        assert!(a.deep_eq(&b));
        assert!(!a.deep_eq(&c));
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = Function::new(|_| Value::Null);
        let g = Function::new(|_| Value::Null);

        assert!(Value::from(f.clone()).strict_eq(&Value::from(f)));
        assert!(!Value::from(g.clone()).strict_eq(&Value::from(Function::new(|_| Value::Null))));
        assert!(matches!(g.call(&[]), Value::Null));
    }

    #[test]
    fn test_merge_all_later_bags_win() {
        let first = PropertyBag::new().with("a", 1).with("b", 2);
        let second = PropertyBag::new().with("b", 3).with("c", 4);

        let merged = PropertyBag::merge_all([first, second]);

        assert_eq!(merged.len(), 3);
        assert!(merged.get("b").is_some_and(|v| v.strict_eq(&Value::from(3))));
        let keys: Vec<_> = merged.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(PropertyBag::from_json(json!({"a": 1})).is_ok());

        let err = PropertyBag::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ChainError::InvalidBag(kind) if kind == "array"));
    }

    #[test]
    fn test_display_matches_loose_rendering() {
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a,b");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
    }
}
