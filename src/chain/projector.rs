//! Turning accumulated violations into a result.
//!
//! Violations are sorted by priority within each property, flattened in
//! property order with duplicates removed, then either the most specific one
//! or all of them are projected to the configured fields.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::config::ChainConfig;
use crate::error::Violation;

/// A surfaced error reduced to the configured fields.
pub type ProjectedError = Map<String, JsonValue>;

/// The result of a finalized chain that recorded at least one violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// The single most specific error (`returnAllErrors = false`).
    First(ProjectedError),
    /// Every error, first-failing property first (`returnAllErrors = true`).
    All(Vec<ProjectedError>),
}

impl Outcome {
    /// Returns the first reported error.
    pub fn first(&self) -> &ProjectedError {
        match self {
            Outcome::First(error) => error,
            // `All` is only built from a non-empty merge
            Outcome::All(errors) => &errors[0],
        }
    }

    /// Returns every reported error.
    pub fn errors(&self) -> &[ProjectedError] {
        match self {
            Outcome::First(error) => std::slice::from_ref(error),
            Outcome::All(errors) => errors,
        }
    }

    pub fn len(&self) -> usize {
        self.errors().len()
    }

    /// Always false; an outcome carries at least one error.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Converts the outcome into a JSON object or array of objects.
    pub fn into_json(self) -> JsonValue {
        match self {
            Outcome::First(error) => JsonValue::Object(error),
            Outcome::All(errors) => {
                JsonValue::Array(errors.into_iter().map(JsonValue::Object).collect())
            }
        }
    }
}

/// Stable-sorts each property's violations by ascending priority.
pub(crate) fn prioritize(errors: &mut IndexMap<String, Vec<Violation>>) {
    for violations in errors.values_mut() {
        violations.sort_by_key(Violation::priority);
    }
}

/// Flattens per-property violations in property order, keeping only the
/// first violation for each `(property, error name)` pair.
pub(crate) fn merge(errors: IndexMap<String, Vec<Violation>>) -> Vec<Violation> {
    let mut seen = HashSet::new();
    errors
        .into_values()
        .flatten()
        .filter(|v| seen.insert((v.property.clone(), v.name().to_string())))
        .collect()
}

/// Picks and projects the violations to report.
pub(crate) fn select(merged: Vec<Violation>, config: &ChainConfig) -> Option<Outcome> {
    let fields = config.error_fields();
    if config.return_all_errors() {
        if merged.is_empty() {
            return None;
        }
        let projected = merged
            .iter()
            .map(|v| v.definition.project(fields))
            .collect();
        return Some(Outcome::All(projected));
    }

    // lowest priority wins; ties go to the earliest in merge order
    merged
        .into_iter()
        .reduce(|best, v| if v.priority() < best.priority() { v } else { best })
        .map(|v| Outcome::First(v.definition.project(fields)))
}
