//! Recorded validation violations.
//!
//! This module provides [`Violation`] for a single failed check and
//! [`Violations`] for a non-empty, combinable collection of them.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::catalog::ErrorDefinition;

/// A failed check: the property it was recorded against and the resolved
/// error definition (with its per-violation message).
///
/// # Example
///
/// ```rust
/// use attest::{ErrorCatalog, Violation};
///
/// let definition = ErrorCatalog::base().lookup("NOT_EXISTS").unwrap();
/// let violation = Violation::new("email", definition);
///
/// assert_eq!(violation.name(), "NOT_EXISTS");
/// assert_eq!(violation.to_string(), "email: NOT_EXISTS (The property doesn't exist)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The property the check was run against.
    pub property: String,
    /// The catalog definition, message already patched.
    pub definition: ErrorDefinition,
}

impl Violation {
    pub fn new(property: impl Into<String>, definition: ErrorDefinition) -> Self {
        Self {
            property: property.into(),
            definition,
        }
    }

    /// Returns the catalog name of the error.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Returns the priority of the error.
    pub fn priority(&self) -> u32 {
        self.definition.priority
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.definition.name)?;
        if let Some(ref message) = self.definition.message {
            write!(f, " ({})", message)?;
        }
        Ok(())
    }
}

/// A non-empty collection of violations.
///
/// `Violations` wraps a `NonEmptyVec<Violation>` so that a failed
/// `Validation<T, Violations>` always carries at least one violation.
/// It implements `Semigroup`, so results from several chains can be combined:
///
/// ```rust
/// use attest::{ErrorCatalog, Violation, Violations};
/// use stillwater::prelude::*;
///
/// let catalog = ErrorCatalog::base();
/// let a = Violations::single(Violation::new("a", catalog.lookup("NOT_EXISTS").unwrap()));
/// let b = Violations::single(Violation::new("b", catalog.lookup("OUT_OF_RANGE").unwrap()));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<Violation>);

impl Violations {
    /// Creates a collection containing a single violation.
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Creates a collection from a `Vec`, or `None` if it is empty.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        NonEmptyVec::from_vec(violations).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Returns the first violation.
    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// Returns all violations recorded against `property`.
    pub fn for_property(&self, property: &str) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.property == property).collect()
    }

    /// Returns all violations with the given error name.
    pub fn with_name(&self, name: &str) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.name() == name).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, violation) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violations>();
    assert_sync::<Violations>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{names, ErrorCatalog};

    fn violation(property: &str, name: &str) -> Violation {
        Violation::new(property, ErrorCatalog::base().lookup(name).unwrap())
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(Violations::from_vec(Vec::new()).is_none());

        let violations = Violations::from_vec(vec![violation("a", names::NOT_EXISTS)]).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(!violations.is_empty());
    }

    #[test]
    fn test_filters() {
        let violations = Violations::single(violation("a", names::NOT_EXISTS))
            .combine(Violations::single(violation("a", names::INCORRECT_TYPE)))
            .combine(Violations::single(violation("b", names::NOT_EXISTS)));

        assert_eq!(violations.for_property("a").len(), 2);
        assert_eq!(violations.for_property("b").len(), 1);
        assert_eq!(violations.with_name(names::NOT_EXISTS).len(), 2);
        assert_eq!(violations.first().property, "a");
    }

    #[test]
    fn test_display_lists_each_violation() {
        let violations = Violations::single(violation("name", names::NOT_EXISTS))
            .combine(Violations::single(violation("age", names::CUSTOM_ERROR)));
        let display = violations.to_string();

        assert!(display.contains("2 error(s)"));
        assert!(display.contains("1. name: NOT_EXISTS"));
        assert!(display.contains("2. age: CUSTOM_ERROR"));
    }

    #[test]
    fn test_into_iter_preserves_order() {
        let violations = Violations::single(violation("x", names::IS_NOT_EQUAL))
            .combine(Violations::single(violation("y", names::OUT_OF_RANGE)));

        let properties: Vec<String> = violations.into_iter().map(|v| v.property).collect();
        assert_eq!(properties, vec!["x", "y"]);
    }
}
