//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `HdError` as one variant.
//! Lookups never produce errors: a missing entity is `None`.

use thiserror::Error;

use crate::ids::EntityKind;

/// The top-level error type for `hd-core` and a common base for sub-crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HdError {
    #[error("{kind} id space exhausted")]
    IdsExhausted { kind: EntityKind },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `hd-*` crates.
pub type HdResult<T> = Result<T, HdError>;
