//! Plumbing shared by the HTTP clients: cached GET requests and
//! error-message extraction for non-2xx responses.

use crate::cache::{ResponseCache, cache_key};
use http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum HttpError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Extract a displayable message from a failed response.
///
/// Three-tier fallback: JSON `error` field, JSON `message` field, raw body
/// text, then the bare status line.
pub async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let fallback = format!("HTTP {status}");

    let Ok(text) = response.text().await else {
        return fallback;
    };
    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    if text.trim().is_empty() { fallback } else { text }
}

/// Issue a GET request through the response cache.
///
/// Only successful JSON responses are stored; the caller picks the TTL class
/// for the endpoint. Mutation requests must not go through here.
pub async fn cached_get_json(
    cache: &Arc<ResponseCache>,
    request: reqwest::RequestBuilder,
    url: &str,
    ttl: Duration,
) -> Result<Arc<Value>, HttpError> {
    let key = cache_key("GET", url, "");
    if let Some(data) = cache.get(&key) {
        return Ok(data);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status {
            status,
            message: error_message(response).await,
        });
    }

    let data: Value = response.json().await?;
    Ok(cache.set(&key, data, ttl))
}
