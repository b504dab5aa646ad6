//! Fatal chain errors.

/// A programmer or configuration mistake that aborts the call chain.
///
/// These are never recorded as validation results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainError {
    /// `add` was called with an empty property name.
    #[error("no property name was supplied to validate")]
    EmptyPropertyName,

    /// A check was issued before any property was selected with `add`.
    #[error("no property selected: call `add` before `{0}`")]
    NoPropertySelected(&'static str),

    /// An error name that is not present in the bound catalog.
    #[error("no such error type '{0}'")]
    NoSuchErrorType(String),

    /// A chain configuration was built over an empty catalog.
    #[error("chain configuration has no error catalog")]
    MissingCatalog,

    /// A type name that does not match any type tag.
    #[error("unknown type tag '{0}'")]
    UnknownType(String),

    /// A data bag built from a JSON document that is not an object.
    #[error("data bag must be a JSON object, got {0}")]
    InvalidBag(String),

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

// ChainError only holds owned strings, so it can cross threads.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ChainError>();
    assert_sync::<ChainError>();
};
