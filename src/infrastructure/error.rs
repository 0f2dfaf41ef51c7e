//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Failures of the HTTP boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("failed to build http client: {0}")]
    Client(String),

    /// Connection, timeout or body read failure; no status was received.
    #[error("Network request to {url} failed: {message}")]
    Network {
        url: String,
        message: String,
        is_timeout: bool,
    },

    /// The API answered with a non-success status code.
    #[error("Request failed with status code {status}")]
    Status {
        url: String,
        status: u16,
        /// `message` field of a JSON error body
        message: Option<String>,
        /// Truncated body for diagnostics
        body: Option<String>,
    },
}

impl TransportError {
    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message the server put in its error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
