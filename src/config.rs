//! Chain configuration.
//!
//! [`Options`] is the caller-facing, deserializable description of how
//! chains should behave. [`ChainConfig`] is the resolved form: the merged
//! catalog plus loggers and output options, built once and shared read-only
//! by every chain a [`Generator`](crate::Generator) creates.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogOverrides, ErrorCatalog, ErrorOverride};
use crate::error::{ChainError, Violation};

/// Callback invoked with every recorded violation in verbose environments.
pub type ErrorLogger = Arc<dyn Fn(&Violation) + Send + Sync>;

/// Callback invoked with informational notices in verbose environments.
pub type NoticeLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// The deployment environment name.
///
/// Only `"dev"` (the default) is verbose: violations are passed to the error
/// logger as they are recorded. Any other name silences the loggers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    pub const DEV: &'static str = "dev";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn dev() -> Self {
        Self::new(Self::DEV)
    }

    pub fn prod() -> Self {
        Self::new("prod")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if violations should be logged as they are recorded.
    pub fn is_verbose(&self) -> bool {
        self.0 == Self::DEV
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::dev()
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Options recognized when configuring a generator.
///
/// Every key is optional. Loggers cannot be deserialized and are set with
/// the builder methods; when absent, the default sinks emit `tracing`
/// events.
///
/// # Example
///
/// ```rust
/// use attest::Options;
///
/// let options = Options::from_json_str(r#"{
///     "errorCatalog": { "OUT_OF_RANGE": { "someNewProperty": "newProperty" } },
///     "environment": "prod",
///     "returnAllErrors": true,
///     "errorFieldsToGet": ["name", "innerCode", "someNewProperty"]
/// }"#).unwrap();
///
/// assert!(options.return_all_errors);
/// assert!(!options.environment.is_verbose());
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Overrides merged onto the base catalog.
    #[serde(alias = "errorsList")]
    pub error_catalog: CatalogOverrides,
    /// Fields to project from each surfaced error, in order.
    pub error_fields_to_get: Option<Vec<String>>,
    /// Return every accumulated error instead of only the most specific one.
    pub return_all_errors: bool,
    #[serde(alias = "env")]
    pub environment: Environment,
    #[serde(skip)]
    pub error_logger: Option<ErrorLogger>,
    #[serde(skip)]
    pub notice_logger: Option<NoticeLogger>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::InvalidConfig` if the document is malformed or a
    /// key has the wrong shape.
    pub fn from_json_str(document: &str) -> Result<Self, ChainError> {
        serde_json::from_str(document).map_err(|e| ChainError::InvalidConfig(e.to_string()))
    }

    /// Builds options from an already-parsed JSON value.
    pub fn from_json(document: serde_json::Value) -> Result<Self, ChainError> {
        serde_json::from_value(document).map_err(|e| ChainError::InvalidConfig(e.to_string()))
    }

    /// Adds (or replaces) the override for one error name.
    pub fn with_override(mut self, name: impl Into<String>, patch: ErrorOverride) -> Self {
        self.error_catalog.insert(name.into(), patch);
        self
    }

    pub fn with_error_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_fields_to_get = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_return_all_errors(mut self, return_all: bool) -> Self {
        self.return_all_errors = return_all;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<Environment>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_error_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&Violation) + Send + Sync + 'static,
    {
        self.error_logger = Some(Arc::new(logger));
        self
    }

    pub fn with_notice_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.notice_logger = Some(Arc::new(logger));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("error_catalog", &self.error_catalog)
            .field("error_fields_to_get", &self.error_fields_to_get)
            .field("return_all_errors", &self.return_all_errors)
            .field("environment", &self.environment)
            .field("error_logger", &self.error_logger.is_some())
            .field("notice_logger", &self.notice_logger.is_some())
            .finish()
    }
}

/// Resolved configuration shared by every chain from one generator.
#[derive(Clone)]
pub struct ChainConfig {
    catalog: ErrorCatalog,
    error_fields: Option<Vec<String>>,
    return_all_errors: bool,
    environment: Environment,
    error_logger: ErrorLogger,
    notice_logger: NoticeLogger,
}

impl ChainConfig {
    /// Creates a configuration over `catalog` with default output options
    /// and the default `tracing` loggers.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::MissingCatalog` if the catalog is empty.
    pub fn new(catalog: ErrorCatalog) -> Result<Self, ChainError> {
        if catalog.is_empty() {
            return Err(ChainError::MissingCatalog);
        }

        Ok(Self {
            catalog,
            error_fields: None,
            return_all_errors: false,
            environment: Environment::default(),
            error_logger: default_error_logger(),
            notice_logger: default_notice_logger(),
        })
    }

    /// Resolves caller options: merges the overrides onto the base catalog
    /// and fills in default loggers.
    pub fn from_options(options: Options) -> Result<Self, ChainError> {
        let catalog = ErrorCatalog::base().merge(&options.error_catalog);
        let mut config = Self::new(catalog)?
            .with_return_all_errors(options.return_all_errors)
            .with_environment(options.environment);

        config.error_fields = options.error_fields_to_get;
        if let Some(logger) = options.error_logger {
            config.error_logger = logger;
        }
        if let Some(logger) = options.notice_logger {
            config.notice_logger = logger;
        }
        Ok(config)
    }

    pub fn with_error_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_return_all_errors(mut self, return_all: bool) -> Self {
        self.return_all_errors = return_all;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<Environment>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_error_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&Violation) + Send + Sync + 'static,
    {
        self.error_logger = Arc::new(logger);
        self
    }

    pub fn with_notice_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.notice_logger = Arc::new(logger);
        self
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    pub fn error_fields(&self) -> Option<&[String]> {
        self.error_fields.as_deref()
    }

    pub fn return_all_errors(&self) -> bool {
        self.return_all_errors
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Hands a freshly recorded violation to the error logger.
    pub(crate) fn log_violation(&self, violation: &Violation) {
        if self.environment.is_verbose() {
            (self.error_logger)(violation);
        }
    }

    pub(crate) fn notice(&self, message: &str) {
        if self.environment.is_verbose() {
            (self.notice_logger)(message);
        }
    }
}

impl fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConfig")
            .field("catalog", &self.catalog)
            .field("error_fields", &self.error_fields)
            .field("return_all_errors", &self.return_all_errors)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

fn default_error_logger() -> ErrorLogger {
    Arc::new(|violation: &Violation| {
        tracing::error!(
            property = %violation.property,
            error = %violation.name(),
            status = violation.definition.status,
            inner_code = violation.definition.inner_code,
            detail = violation.definition.message.as_deref().unwrap_or_default(),
            "validation violation recorded"
        );
    })
}

fn default_notice_logger() -> NoticeLogger {
    Arc::new(|message: &str| {
        tracing::info!("{}", message);
    })
}
