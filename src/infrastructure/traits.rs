//! I/O boundary traits for testability
//!
//! The store talks to the remote API only through [`Transport`], allowing
//! it to be tested with scripted implementations.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ApiSettings;
use crate::infrastructure::TransportError;

/// Request/response access to the tree API.
///
/// Paths are relative to the configured base URL (e.g. `/nodes`).
/// Bodies that are not JSON come back as `Value::String`, empty bodies as
/// `Value::Null`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` with query parameters.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError>;

    /// POST a JSON body to `path`.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError>;

    /// DELETE `path`.
    async fn delete(&self, path: &str) -> Result<Value, TransportError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Bodies longer than this are cut in error diagnostics.
const BODY_SNIPPET_LEN: usize = 512;

/// reqwest-backed transport with a fixed base URL and request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpTransport {
    /// Build a transport from API settings.
    pub fn new(settings: &ApiSettings) -> Result<Self, TransportError> {
        let base_url =
            url::Url::parse(&settings.base_url).map_err(|e| TransportError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                message: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                message: "not a base url".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send a request and decode the body.
    ///
    /// Every failure is logged here, so callers only decide how to surface it.
    async fn send(&self, request: RequestBuilder, url: String) -> Result<Value, TransportError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| network_error(&url, e))?;
        let body = parse_body(&bytes);

        if !status.is_success() {
            let err = TransportError::Status {
                url,
                status: status.as_u16(),
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                body: (!bytes.is_empty()).then(|| snippet_lossy(&bytes, BODY_SNIPPET_LEN)),
            };
            error!(error = %err, status = status.as_u16(), "API error");
            return Err(err);
        }

        debug!(%url, status = status.as_u16(), "response received");
        Ok(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let url = self.url_for(path);
        let request = self.client.get(&url).query(query);
        self.send(request, url).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let url = self.url_for(path);
        let request = self.client.post(&url).json(body);
        self.send(request, url).await
    }

    async fn delete(&self, path: &str) -> Result<Value, TransportError> {
        let url = self.url_for(path);
        let request = self.client.delete(&url);
        self.send(request, url).await
    }
}

fn network_error(url: &str, e: reqwest::Error) -> TransportError {
    let err = TransportError::Network {
        url: url.to_string(),
        message: e.to_string(),
        is_timeout: e.is_timeout(),
    };
    error!(error = %err, "API error");
    err
}

/// JSON if possible, raw text otherwise, `Null` when empty.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn snippet_lossy(bytes: &[u8], max: usize) -> String {
    let end = bytes.len().min(max);
    String::from_utf8_lossy(&bytes[..end]).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(base_url: &str) -> ApiSettings {
        ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        }
    }

    #[test]
    fn given_base_url_with_path_when_joining_then_keeps_path() {
        let transport = HttpTransport::new(&settings("https://example.com/api/")).unwrap();
        assert_eq!(transport.url_for("/nodes"), "https://example.com/api/nodes");
        assert_eq!(transport.url_for("node/3"), "https://example.com/api/node/3");
    }

    #[test]
    fn given_garbage_base_url_when_building_then_rejects_it() {
        let err = HttpTransport::new(&settings("not a url")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn given_non_base_url_when_building_then_rejects_it() {
        let err = HttpTransport::new(&settings("mailto:someone@example.com")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn given_bodies_when_parsing_then_falls_back_to_text() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(br#"[1,2]"#), json!([1, 2]));
        assert_eq!(parse_body(b"oops"), json!("oops"));
    }
}
