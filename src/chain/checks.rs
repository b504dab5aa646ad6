//! The fluent checks a chain runs against its current property.
//!
//! Each check reads the cursor and, on failure, records a violation. A check
//! only returns an error for misuse: no selected property, or a catalog that
//! lacks the error the check records.

use super::{Chain, Cursor};
use crate::catalog::names;
use crate::error::ChainError;
use crate::types::TypeTag;
use crate::value::Value;

/// The comparison an ordering check enforces.
#[derive(Debug, Clone, Copy)]
enum Bound {
    AtMost(f64),
    AtLeast(f64),
    Between(f64, f64),
}

impl Bound {
    fn is_violated_by(self, measured: f64) -> bool {
        match self {
            Bound::AtMost(max) => measured > max,
            Bound::AtLeast(min) => measured < min,
            Bound::Between(lo, hi) => measured < lo || measured > hi,
        }
    }

    fn describe(self) -> String {
        match self {
            Bound::AtMost(max) => format!("instead of <= {}", max),
            Bound::AtLeast(min) => format!("instead of >= {}", min),
            Bound::Between(lo, hi) => format!("which is not in range of {} ..= {}", lo, hi),
        }
    }
}

/// A numeric bound accepted by the ordering checks.
///
/// Implemented for the primitive integer and float widths so that both
/// literals and lengths (`usize`) can be passed directly.
pub trait Limit: Copy {
    fn to_f64(self) -> f64;
}

macro_rules! impl_limit {
    ($($ty:ty),*) => {
        $(
            impl Limit for $ty {
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_limit!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Length for strings and arrays, the value itself for numbers.
fn measure(cursor: &Cursor) -> Option<(f64, &'static str)> {
    if !cursor.type_tag.is_ordered() {
        return None;
    }
    match &cursor.value {
        Value::Number(n) => Some((*n, "value")),
        value => value.length().map(|len| (len as f64, "length")),
    }
}

impl Chain {
    /// Fails with `NOT_EXISTS` if the value is falsy: undefined, null,
    /// `false`, `0`, NaN or the empty string.
    pub fn exists(&mut self) -> Result<&mut Self, ChainError> {
        let cursor = self.selected("exists")?;
        if cursor.value.is_truthy() {
            return Ok(self);
        }

        let message = format!("Property {} was not supplied!", cursor.name);
        self.record(names::NOT_EXISTS, Some(&message))
    }

    /// Fails with `INCORRECT_TYPE` unless the value is exactly of type
    /// `expected`.
    pub fn has_type(&mut self, expected: TypeTag) -> Result<&mut Self, ChainError> {
        let cursor = self.selected("has_type")?;
        if cursor.type_tag == expected {
            return Ok(self);
        }

        let message = format!(
            "Property {} with value {} has type {}, not {}",
            cursor.name, cursor.value, cursor.type_tag, expected
        );
        self.record(names::INCORRECT_TYPE, Some(&message))
    }

    /// Fails with `OUT_OF_RANGE` if a string or array is longer than `max`,
    /// or a number is greater than `max`.
    ///
    /// Any other type records `INVALID_TYPE` and skips the comparison.
    pub fn less_than(&mut self, max: impl Limit) -> Result<&mut Self, ChainError> {
        self.compare("less_than", Bound::AtMost(max.to_f64()))
    }

    /// Fails with `OUT_OF_RANGE` if a string or array is shorter than `min`,
    /// or a number is less than `min`.
    ///
    /// Any other type records `INVALID_TYPE` and skips the comparison.
    pub fn greater_than(&mut self, min: impl Limit) -> Result<&mut Self, ChainError> {
        self.compare("greater_than", Bound::AtLeast(min.to_f64()))
    }

    /// Fails with `OUT_OF_RANGE` if the length (strings, arrays) or value
    /// (numbers) falls outside `lo..=hi`.
    ///
    /// Any other type records `INVALID_TYPE` and skips the comparison.
    pub fn in_range(
        &mut self,
        lo: impl Limit,
        hi: impl Limit,
    ) -> Result<&mut Self, ChainError> {
        self.compare("in_range", Bound::Between(lo.to_f64(), hi.to_f64()))
    }

    /// Fails with `CUSTOM_ERROR`, carrying `message`, if `predicate` rejects
    /// the value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use attest::{Generator, Options, PropertyBag};
    /// use serde_json::json;
    ///
    /// # fn main() -> Result<(), attest::ChainError> {
    /// let generator = Generator::configure(Options::new().with_environment("prod"))?;
    /// let mut chain = generator.init([PropertyBag::new().with("code", "abc")]);
    ///
    /// chain.add("code")?.custom("code must be upper case", |v| {
    ///     v.to_string().chars().all(|c| c.is_ascii_uppercase())
    /// })?;
    ///
    /// let outcome = chain.finalize().unwrap();
    /// assert_eq!(outcome.first()["message"], json!("code must be upper case"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn custom<F>(&mut self, message: &str, predicate: F) -> Result<&mut Self, ChainError>
    where
        F: FnOnce(&Value) -> bool,
    {
        let cursor = self.selected("custom")?;
        if predicate(&cursor.value) {
            return Ok(self);
        }
        self.record(names::CUSTOM_ERROR, Some(message))
    }

    /// Fails with `IS_NOT_EQUAL` unless the value equals `expected`.
    ///
    /// Arrays and objects compare structurally; everything else compares
    /// strictly, so NaN never equals NaN here.
    pub fn equals(&mut self, expected: impl Into<Value>) -> Result<&mut Self, ChainError> {
        let expected = expected.into();
        let cursor = self.selected("equals")?;
        let equal = match cursor.type_tag {
            TypeTag::Array | TypeTag::Object => cursor.value.deep_eq(&expected),
            _ => cursor.value.strict_eq(&expected),
        };
        if equal {
            return Ok(self);
        }

        let message = format!(
            "Property {} with value {} is not equal to {}",
            cursor.name, cursor.value, expected
        );
        self.record(names::IS_NOT_EQUAL, Some(&message))
    }

    fn compare(&mut self, operation: &'static str, bound: Bound) -> Result<&mut Self, ChainError> {
        let cursor = self.selected(operation)?;
        let Some((measured, what)) = measure(cursor) else {
            let message = format!(
                "The value {} with type {} is not supposed to be less or greater",
                cursor.name, cursor.type_tag
            );
            return self.record(names::INVALID_TYPE, Some(&message));
        };
        if !bound.is_violated_by(measured) {
            return Ok(self);
        }

        let message = format!(
            "Property of type {} {} has {} {} {}",
            cursor.type_tag,
            cursor.name,
            what,
            measured,
            bound.describe()
        );
        self.record(names::OUT_OF_RANGE, Some(&message))
    }
}
