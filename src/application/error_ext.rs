//! Error conversion helpers for JSON payloads
//!
//! Provides extension traits for cleaner error handling with request context.

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `serde_json::Result` to `ApplicationResult` with context.
pub trait JsonResultExt<T> {
    /// Add request context to a (de)serialization error.
    ///
    /// # Example
    /// ```ignore
    /// serde_json::from_value::<Vec<Locale>>(value)
    ///     .with_request_context("/locales")?;
    /// ```
    fn with_request_context(self, context: &str) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn with_request_context(self, context: &str) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Decode {
            context: context.to_string(),
            source,
        })
    }
}
