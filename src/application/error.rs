//! Application-level errors (wraps transport errors)

use thiserror::Error;

use crate::infrastructure::TransportError;

/// Application errors wrap transport errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("unexpected response from {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// HTTP status behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApplicationError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Message the server sent along with a failed request.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApplicationError::Transport(e) => e.server_message(),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
