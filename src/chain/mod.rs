//! The validation chain.
//!
//! A [`Chain`] holds the merged property namespace, a cursor on the property
//! most recently selected with [`Chain::add`], and the violations recorded so
//! far. Checks consume the cursor and record violations; nothing is reported
//! until [`Chain::finalize`] (or [`Chain::conclude`]) resolves the accumulated
//! violations and resets the chain for another pass.
//!
//! # Example
//!
//! ```rust
//! use attest::{Generator, Options, PropertyBag, TypeTag};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), attest::ChainError> {
//! let generator = Generator::configure(Options::new().with_environment("prod"))?;
//! let mut chain = generator.init([PropertyBag::new().with("n", 5).with("s", "ab")]);
//!
//! chain.add("n")?.less_than(3)?;
//! chain.add("s")?.exists()?.has_type(TypeTag::String)?;
//!
//! let outcome = chain.finalize().expect("n is out of range");
//! assert_eq!(outcome.first()["innerCode"], json!(5));
//! # Ok(())
//! # }
//! ```

mod checks;
mod projector;

pub use checks::Limit;
pub use projector::{Outcome, ProjectedError};

use std::sync::Arc;

use indexmap::IndexMap;
use stillwater::Validation;

use crate::catalog::names;
use crate::config::ChainConfig;
use crate::error::{ChainError, Violation, Violations};
use crate::types::{classify, TypeTag};
use crate::value::{PropertyBag, Value};
use crate::ValidationResult;

/// The property currently under inspection.
#[derive(Debug, Clone)]
pub struct Cursor {
    pub name: String,
    pub value: Value,
    pub type_tag: TypeTag,
}

/// A stateful validator walking one property at a time through checks.
///
/// A chain is not meant to be shared between threads while in use; create
/// one chain per validation pass (they are cheap) from a shared
/// [`Generator`](crate::Generator).
#[derive(Debug)]
pub struct Chain {
    config: Arc<ChainConfig>,
    namespace: PropertyBag,
    cursor: Option<Cursor>,
    errors: IndexMap<String, Vec<Violation>>,
}

impl Chain {
    /// Creates a chain over the shallow merge of `bags`.
    ///
    /// Later bags win on key collision.
    pub fn new<I>(config: Arc<ChainConfig>, bags: I) -> Self
    where
        I: IntoIterator<Item = PropertyBag>,
    {
        Self {
            config,
            namespace: PropertyBag::merge_all(bags),
            cursor: None,
            errors: IndexMap::new(),
        }
    }

    /// Selects `name` as the property under inspection.
    ///
    /// A property missing from every bag is selected with an undefined
    /// value. If the value is NaN, `INVALID_TYPE` is recorded right away,
    /// before any explicit check runs.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::EmptyPropertyName` if `name` is empty.
    pub fn add(&mut self, name: &str) -> Result<&mut Self, ChainError> {
        if name.is_empty() {
            return Err(ChainError::EmptyPropertyName);
        }

        let value = self.namespace.get(name).cloned().unwrap_or_default();
        let is_nan = value.is_nan();
        self.cursor = Some(Cursor {
            name: name.to_string(),
            type_tag: classify(&value),
            value,
        });

        if is_nan {
            let message = format!("Property {} is NaN", name);
            self.record(names::INVALID_TYPE, Some(&message))?;
        }
        Ok(self)
    }

    /// Records the catalog error `error_name` against the current property.
    ///
    /// The definition is copied out of the catalog before `message` is
    /// applied, so the shared catalog never changes. Built-in checks call
    /// this; callers may use it directly to record any catalog entry,
    /// including names introduced through overrides.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::NoPropertySelected` before the first `add`, and
    /// `ChainError::NoSuchErrorType` if the name is not in the catalog.
    pub fn record(
        &mut self,
        error_name: &str,
        message: Option<&str>,
    ) -> Result<&mut Self, ChainError> {
        let property = self.selected("record")?.name.clone();
        let mut definition = self.config.catalog().lookup(error_name)?;
        if let Some(message) = message {
            definition.message = Some(message.to_string());
        }

        let violation = Violation::new(property, definition);
        self.config.log_violation(&violation);
        self.errors
            .entry(violation.property.clone())
            .or_default()
            .push(violation);
        Ok(self)
    }

    /// Resolves the accumulated violations into the configured result shape
    /// and resets the chain.
    ///
    /// Returns `None` when no check failed. Otherwise returns the single
    /// most specific error, or every error when `returnAllErrors` is set,
    /// each projected to the configured fields.
    pub fn finalize(&mut self) -> Option<Outcome> {
        let merged = self.drain();
        self.config.notice(&format!(
            "validation finished with {} error(s)",
            merged.len()
        ));
        projector::select(merged, &self.config)
    }

    /// Resolves the accumulated violations without projecting them and
    /// resets the chain.
    ///
    /// Every merged violation is returned regardless of `returnAllErrors`,
    /// in the same order `finalize` would report them.
    pub fn conclude(&mut self) -> ValidationResult<()> {
        match Violations::from_vec(self.drain()) {
            None => Validation::Success(()),
            Some(violations) => Validation::Failure(violations),
        }
    }

    /// Returns the property under inspection, if any.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Returns the merged property namespace.
    pub fn namespace(&self) -> &PropertyBag {
        &self.namespace
    }

    /// Returns the number of violations recorded since the last reset.
    pub fn pending(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn selected(&self, operation: &'static str) -> Result<&Cursor, ChainError> {
        self.cursor
            .as_ref()
            .ok_or(ChainError::NoPropertySelected(operation))
    }

    /// Prioritizes and merges the accumulator, then clears all chain state.
    fn drain(&mut self) -> Vec<Violation> {
        let mut errors = std::mem::take(&mut self.errors);
        self.cursor = None;
        projector::prioritize(&mut errors);
        projector::merge(errors)
    }
}
