//! Chain constructors bound to one configuration.
//!
//! A [`Generator`] is configured once and then stamps out [`Chain`]s that
//! share its catalog, loggers and output options. It is cheap to clone and
//! safe to share across threads.

use std::sync::Arc;

use crate::chain::Chain;
use crate::config::{ChainConfig, Options};
use crate::error::ChainError;
use crate::value::PropertyBag;

/// A configured chain constructor.
///
/// # Example
///
/// ```rust
/// use attest::{ErrorOverride, Generator, Options, PropertyBag};
/// use serde_json::json;
///
/// # fn main() -> Result<(), attest::ChainError> {
/// let generator = Generator::configure(
///     Options::new()
///         .with_override("OUT_OF_RANGE", ErrorOverride::new().with_field("hint", "shorten it"))
///         .with_error_fields(["name", "innerCode", "hint"])
///         .with_environment("prod"),
/// )?;
///
/// let mut chain = generator.init([PropertyBag::new().with("title", "far too long")]);
/// chain.add("title")?.less_than(5)?;
///
/// assert_eq!(
///     chain.finalize().unwrap().into_json(),
///     json!({"name": "OUT_OF_RANGE", "innerCode": 5, "hint": "shorten it"})
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    config: Arc<ChainConfig>,
}

impl Generator {
    /// Resolves `options` against the base catalog and binds the result.
    pub fn configure(options: Options) -> Result<Self, ChainError> {
        Ok(Self::from_config(ChainConfig::from_options(options)?))
    }

    /// Binds an already-resolved configuration.
    pub fn from_config(config: ChainConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a chain over the shallow merge of `bags`.
    pub fn init<I>(&self, bags: I) -> Chain
    where
        I: IntoIterator<Item = PropertyBag>,
    {
        Chain::new(Arc::clone(&self.config), bags)
    }

    /// Creates a chain over JSON documents, each of which must be an object.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::InvalidBag` for the first non-object document.
    pub fn init_json<I>(&self, documents: I) -> Result<Chain, ChainError>
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        let bags = documents
            .into_iter()
            .map(PropertyBag::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.init(bags))
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Generator>();
    assert_sync::<Generator>();
    assert_send::<Chain>();
};
