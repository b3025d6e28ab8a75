//! Request plumbing shared by every endpoint.
//!
//! This module provides:
//! - [`RequestContext`], the per-connection settings every endpoint needs
//! - Retry of HTTP 429 responses with exponential backoff
//! - Conversion of non-success replies into [`ClientError::Api`]
//! - Reading the raw response in the shape the client generation produces
//!
//! # Invariants
//! - Every request carries the generation's `Accept` and `Content-Type` headers.
//! - Legacy generation responses are returned inside the transport envelope;
//!   callers normalize before use.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, WARNING};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ClientError, ConnectionError, Result};
use crate::generation::ApiGeneration;
use crate::normalize::envelope;

/// Basic-auth credentials attached to every request.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

/// Everything an endpoint needs to reach one cluster.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub http: &'a Client,
    pub base_url: &'a str,
    pub auth: Option<&'a BasicAuth>,
    pub generation: ApiGeneration,
    pub max_retries: usize,
}

impl RequestContext<'_> {
    /// Start a request to `path`, which must begin with `/`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let media_type = self.generation.media_type();
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(ACCEPT, media_type.clone())
            .header(CONTENT_TYPE, media_type);
        if let Some(auth) = self.auth {
            builder = builder.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }
        builder
    }

    /// Full URL of `path`, for error reporting.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Classify a transport failure.
pub(crate) fn transport_error(url: &str, err: &reqwest::Error) -> ClientError {
    let url = url.to_string();
    if err.is_timeout() {
        ConnectionError::Timeout { url }.into()
    } else {
        ConnectionError::Transport {
            url,
            message: err.to_string(),
        }
        .into()
    }
}

/// Sends an HTTP request, retrying HTTP 429 responses.
///
/// Backoff is exponential (1s, 2s, 4s = 2^attempt). `max_retries` of zero
/// sends the request exactly once.
///
/// # Errors
///
/// Returns `ClientError::MaxRetriesExceeded` when every attempt was rate limited,
/// `ClientError::Api` for any other non-success status, and a `ConnectionError`
/// for transport failures and timeouts.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    url: &str,
    max_retries: usize,
) -> Result<Response> {
    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None => {
                debug!("Request builder cannot be cloned, single attempt only");
                let response = builder
                    .send()
                    .await
                    .map_err(|e| transport_error(url, &e))?;
                return check_status(response).await;
            }
        };

        let response = attempt_builder
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        if response.status().as_u16() != 429 {
            if attempt > 0 {
                debug!(attempt = attempt + 1, "Request succeeded after retry");
            }
            return check_status(response).await;
        }

        if attempt < max_retries {
            let backoff_secs = 2u64.pow(attempt as u32);
            debug!(
                attempt = attempt + 1,
                max_retries = max_retries + 1,
                backoff_secs = backoff_secs,
                "Rate limited (HTTP 429), retrying with exponential backoff"
            );
            tokio::time::sleep(tokio::time::Duration::from_secs(backoff_secs)).await;
        }
    }

    debug!(
        attempts = max_retries + 1,
        "Max retries exhausted for rate-limited request"
    );
    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    Err(ClientError::Api {
        status,
        url,
        message: error_message(&body),
    })
}

/// Prefer the cluster's `error.reason`, then a bare `error` string, then the body.
fn error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    match parsed.get("error") {
        Some(Value::Object(error)) => error
            .get("reason")
            .and_then(Value::as_str)
            .or_else(|| error.get("type").and_then(Value::as_str))
            .map_or_else(|| body.to_string(), str::to_string),
        Some(Value::String(reason)) => reason.clone(),
        _ => body.to_string(),
    }
}

/// Read a successful response as the generation reports it.
pub async fn read_raw(response: Response, generation: ApiGeneration) -> Result<Value> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body: Value = response
        .json()
        .await
        .map_err(|e| ClientError::invalid_response("response body is not JSON", e))?;

    if !generation.wraps_responses() {
        return Ok(body);
    }

    Ok(envelope(body, status, header_map(&headers), warnings(&headers)))
}

fn header_map(headers: &HeaderMap) -> Map<String, Value> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), Value::from(v)))
        })
        .collect()
}

fn warnings(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(WARNING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}
