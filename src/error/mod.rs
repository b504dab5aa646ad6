//! Error types for chain misuse and recorded violations.
//!
//! This module separates the two failure classes of a validation chain:
//! [`ChainError`] for fatal programmer/configuration mistakes, returned
//! immediately, and [`Violation`]/[`Violations`] for data problems, which
//! are accumulated and only surface when the chain is finalized.

mod chain_error;
mod violation;

pub use chain_error::ChainError;
pub use violation::{Violation, Violations};
