//! The error catalog: named error definitions and their overlay merge.
//!
//! An [`ErrorCatalog`] maps an error name (e.g. `OUT_OF_RANGE`) to an
//! [`ErrorDefinition`]. The library ships a base catalog; callers extend or
//! adjust it by merging [`ErrorOverride`]s on top, field by field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::error::ChainError;

/// Names of the errors in the base catalog.
pub mod names {
    pub const NO_PROPERTY_SUPPLIED: &str = "NO_PROPERTY_SUPPLIED";
    pub const NOT_EXISTS: &str = "NOT_EXISTS";
    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const INCORRECT_TYPE: &str = "INCORRECT_TYPE";
    pub const TOO_SHORT: &str = "TOO_SHORT";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const IS_NOT_EQUAL: &str = "IS_NOT_EQUAL";
    pub const CUSTOM_ERROR: &str = "CUSTOM_ERROR";
}

/// Status code shared by every base definition.
const BASE_STATUS: i64 = 401;

/// The default projection used when no field list is configured.
pub const DEFAULT_FIELDS: [&str; 4] = ["priority", "status", "innerCode", "message"];

/// A named error with its ordering priority, codes and message.
///
/// Lower `priority` values are more specific and surface first. `status`
/// and `inner_code` are opaque to the library. Any extra fields supplied
/// through overrides are carried in `extra` and may be projected by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDefinition {
    pub name: String,
    pub priority: u32,
    pub status: i64,
    pub inner_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ErrorDefinition {
    /// Creates a definition without a message or extra fields.
    pub fn new(name: impl Into<String>, priority: u32, status: i64, inner_code: i64) -> Self {
        Self {
            name: name.into(),
            priority,
            status,
            inner_code,
            message: None,
            extra: Map::new(),
        }
    }

    /// Sets the message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// A definition introduced by an override that names no base entry.
    ///
    /// Fields the override leaves out default to the lowest priority and
    /// zero codes.
    fn blank(name: &str) -> Self {
        Self::new(name, u32::MAX, 0, 0)
    }

    /// Overlays the fields present in `patch`; absent fields are kept.
    pub fn apply(&mut self, patch: &ErrorOverride) {
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(inner_code) = patch.inner_code {
            self.inner_code = inner_code;
        }
        if let Some(message) = &patch.message {
            self.message = Some(message.clone());
        }
        for (key, value) in &patch.extra {
            // the catalog key is the definition's identity
            if key != "name" {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }

    /// Returns every field of the definition as a JSON map.
    ///
    /// `message` is omitted when unset. Extra fields never shadow the
    /// built-in ones.
    pub fn fields(&self) -> Map<String, JsonValue> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!(self.name));
        fields.insert("priority".to_string(), json!(self.priority));
        fields.insert("status".to_string(), json!(self.status));
        fields.insert("innerCode".to_string(), json!(self.inner_code));
        if let Some(message) = &self.message {
            fields.insert("message".to_string(), json!(message));
        }
        for (key, value) in &self.extra {
            fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        fields
    }

    /// Reduces the definition to the requested fields, in request order.
    ///
    /// With no field list the default projection
    /// `priority, status, innerCode, message` is used. Requested fields the
    /// definition does not carry are skipped.
    pub fn project(&self, field_list: Option<&[String]>) -> Map<String, JsonValue> {
        let mut all = self.fields();
        let mut projected = Map::new();
        let mut pick = |key: &str| {
            if let Some(value) = all.remove(key) {
                projected.insert(key.to_string(), value);
            }
        };

        match field_list {
            Some(list) => {
                for key in list {
                    pick(key.as_str());
                }
            }
            None => {
                for key in DEFAULT_FIELDS {
                    pick(key);
                }
            }
        }
        projected
    }
}

/// A partial error definition merged onto a catalog entry.
///
/// Every known field is optional; unknown keys are collected into `extra`.
///
/// # Example
///
/// ```rust
/// use attest::ErrorOverride;
/// use serde_json::json;
///
/// let patch: ErrorOverride = serde_json::from_value(json!({
///     "message": "too big",
///     "someNewProperty": "newProperty"
/// })).unwrap();
///
/// assert_eq!(patch.message.as_deref(), Some("too big"));
/// assert_eq!(patch.extra["someNewProperty"], json!("newProperty"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOverride {
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub inner_code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ErrorOverride {
    /// Creates an empty override that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: i64) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_inner_code(mut self, inner_code: i64) -> Self {
        self.inner_code = Some(inner_code);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds an arbitrary extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Caller-supplied overrides keyed by error name.
pub type CatalogOverrides = IndexMap<String, ErrorOverride>;

/// An immutable table of error definitions keyed by name.
///
/// # Example
///
/// ```rust
/// use attest::{CatalogOverrides, ErrorCatalog, ErrorOverride};
///
/// let mut overrides = CatalogOverrides::new();
/// overrides.insert("NOT_EXISTS".into(), ErrorOverride::new().with_message("missing"));
///
/// let catalog = ErrorCatalog::base().merge(&overrides);
/// let not_exists = catalog.get("NOT_EXISTS").unwrap();
///
/// assert_eq!(not_exists.message.as_deref(), Some("missing"));
/// assert_eq!(not_exists.inner_code, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorCatalog {
    definitions: IndexMap<String, ErrorDefinition>,
}

impl ErrorCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the library's base catalog.
    pub fn base() -> Self {
        use names::*;

        [
            ErrorDefinition::new(NO_PROPERTY_SUPPLIED, 0, BASE_STATUS, 1)
                .with_message("No property name was supplied for validation"),
            ErrorDefinition::new(NOT_EXISTS, 1, BASE_STATUS, 1)
                .with_message("The property doesn't exist"),
            ErrorDefinition::new(INVALID_TYPE, 2, BASE_STATUS, 3)
                .with_message("The supplied property type is NaN"),
            ErrorDefinition::new(INCORRECT_TYPE, 2, BASE_STATUS, 4)
                .with_message("The supplied property has incorrect type"),
            ErrorDefinition::new(TOO_SHORT, 3, BASE_STATUS, 5)
                .with_message("The supplied property has a too small length"),
            ErrorDefinition::new(OUT_OF_RANGE, 3, BASE_STATUS, 5)
                .with_message("The supplied property has a too small length"),
            ErrorDefinition::new(IS_NOT_EQUAL, 3, BASE_STATUS, 6)
                .with_message("The two properties are not equal"),
            ErrorDefinition::new(CUSTOM_ERROR, 4, BASE_STATUS, 7),
        ]
        .into_iter()
        .collect()
    }

    /// Adds or replaces a definition under its own name.
    pub fn insert(&mut self, definition: ErrorDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Returns a new catalog with `overrides` overlaid on this one.
    ///
    /// For each overridden name, present fields replace the existing ones and
    /// absent fields are kept. Unknown names become new definitions. `self`
    /// is left untouched.
    pub fn merge(&self, overrides: &CatalogOverrides) -> Self {
        let mut merged = self.clone();
        for (name, patch) in overrides {
            merged
                .definitions
                .entry(name.clone())
                .or_insert_with(|| ErrorDefinition::blank(name))
                .apply(patch);
        }
        merged
    }

    /// Returns the definition registered under `name`.
    pub fn get(&self, name: &str) -> Option<&ErrorDefinition> {
        self.definitions.get(name)
    }

    /// Returns an owned copy of the definition registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::NoSuchErrorType` if the name is not in the catalog.
    pub fn lookup(&self, name: &str) -> Result<ErrorDefinition, ChainError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ChainError::NoSuchErrorType(name.to_string()))
    }

    /// Returns true if a definition exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns an iterator over the definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorDefinition> {
        self.definitions.values()
    }
}

impl FromIterator<ErrorDefinition> for ErrorCatalog {
    fn from_iter<I: IntoIterator<Item = ErrorDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}
