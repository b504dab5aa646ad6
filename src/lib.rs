//! # Attest
//!
//! A fluent, chainable property-validation library with a configurable,
//! extensible error catalog.
//!
//! ## Overview
//!
//! One or more flat data bags are merged into a single property namespace.
//! A [`Chain`] then walks the namespace one property at a time: [`Chain::add`]
//! selects a property, and checks such as [`Chain::exists`],
//! [`Chain::has_type`] or [`Chain::in_range`] record violations against it.
//! Violations are data, not errors: they accumulate silently and surface
//! when [`Chain::finalize`] resolves them into either the most specific error
//! or all of them, each rendered from the [`ErrorCatalog`].
//!
//! Misuse (an empty property name, an unknown error name, a check before any
//! property is selected) is reported immediately as a [`ChainError`].
//!
//! ## Core Types
//!
//! - [`Generator`]: a chain constructor bound to one configuration
//! - [`Chain`]: the stateful validator and its fluent checks
//! - [`ErrorCatalog`] / [`ErrorOverride`]: the error vocabulary and its overlays
//! - [`Value`] / [`PropertyBag`]: dynamic values and the bags they arrive in
//! - [`TypeTag`] / [`classify`]: semantic type classification
//!
//! ## Example
//!
//! ```rust
//! use attest::{Generator, Options, PropertyBag, TypeTag};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), attest::ChainError> {
//! let generator = Generator::configure(
//!     Options::new().with_return_all_errors(true).with_environment("prod"),
//! )?;
//!
//! let mut chain = generator.init([
//!     PropertyBag::new().with("name", "").with("age", 17),
//!     PropertyBag::new().with("age", 200),
//! ]);
//!
//! chain.add("name")?.exists()?.has_type(TypeTag::String)?;
//! chain.add("age")?.has_type(TypeTag::Number)?.in_range(18, 130)?;
//!
//! let outcome = chain.finalize().expect("two properties failed");
//! assert_eq!(outcome.len(), 2);
//! assert_eq!(outcome.errors()[0]["innerCode"], json!(1));
//! assert_eq!(outcome.errors()[1]["innerCode"], json!(5));
//!
//! // the chain is reset and can be reused
//! chain.add("age")?.greater_than(18)?;
//! assert!(chain.finalize().is_none());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod chain;
pub mod config;
pub mod error;
pub mod generator;
pub mod types;
pub mod value;

pub use catalog::{names, CatalogOverrides, ErrorCatalog, ErrorDefinition, ErrorOverride};
pub use chain::{Chain, Cursor, Limit, Outcome, ProjectedError};
pub use config::{ChainConfig, Environment, ErrorLogger, NoticeLogger, Options};
pub use error::{ChainError, Violation, Violations};
pub use generator::Generator;
pub use types::{classify, is_invalid_type, TypeTag};
pub use value::{Function, PropertyBag, Value};

/// Type alias for the unprojected result of a chain.
pub type ValidationResult<T> = stillwater::Validation<T, Violations>;
