//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input to the pure tree/localization model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown message key: {0}")]
    UnknownMessageKey(String),

    #[error("invalid node id: {0:?}")]
    InvalidNodeId(String),
}
