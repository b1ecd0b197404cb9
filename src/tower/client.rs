//! HTTP session wrapper
//!
//! One configured blocking client per [`TowerClient`], bound to one credential
//! set. Every request carries the bearer token and a JSON content type;
//! transient 5xx responses are retried with exponential backoff inside the
//! call. The underlying connection pool is released when the client is
//! dropped, on every exit path.

use crate::error::{Error, Result};
use crate::tower::creds::{ApiCredentials, VerifyPolicy};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Certificate, Method, StatusCode};
use serde_json::Value;
use std::thread;
use std::time::Duration;

/// Total attempts per request, counting the first one.
const MAX_ATTEMPTS: u32 = 10;

/// Backoff factor for the retry sleep sequence.
const BACKOFF_FACTOR: f64 = 0.4;

/// Statuses considered transient and worth a transport-level retry.
const RETRY_STATUSES: [u16; 5] = [500, 501, 502, 503, 504];

/// Sleep before retry `retry` (1-based). The first retry fires immediately;
/// later ones follow `factor * 2^(retry - 1)`: 0, 0.8s, 1.6s, 3.2s, ...
fn backoff_delay(retry: u32) -> Duration {
    if retry <= 1 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(BACKOFF_FACTOR * f64::powi(2.0, (retry - 1) as i32))
    }
}

/// Response handed back to the resource layer: the final status code plus the
/// parsed JSON body, if the server sent one.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    body: Option<Value>,
}

impl ApiResponse {
    pub fn json(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn into_json(self) -> Option<Value> {
        self.body
    }
}

/// HTTP client wrapper for Tower API calls.
pub struct TowerClient {
    client: Client,
    endpoint: String,
}

impl TowerClient {
    /// Build a client bound to one credential set.
    pub fn new(creds: &ApiCredentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", creds.access_token);
        let mut auth = HeaderValue::from_str(&bearer)
            .map_err(|e| Error::NonRecoverable(format!("invalid access_token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);

        // Verification config only applies to TLS endpoints.
        if !creds.is_insecure() {
            builder = match &creds.endpoint_verify {
                VerifyPolicy::Flag(true) => builder,
                VerifyPolicy::Flag(false) => builder.danger_accept_invalid_certs(true),
                VerifyPolicy::CaBundle(path) => {
                    let pem = std::fs::read(path).map_err(|e| {
                        Error::NonRecoverable(format!(
                            "cannot read CA bundle {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    let cert = Certificate::from_pem(&pem)?;
                    builder.add_root_certificate(cert)
                }
            };
        }

        let client = builder.build()?;
        let endpoint = creds.endpoint.as_str().trim_end_matches('/').to_string();
        Ok(Self { client, endpoint })
    }

    /// Issue one request against the API.
    ///
    /// A path beginning with `/` is prefixed with the configured endpoint;
    /// anything else (the role `related` URLs are the notable case) passes
    /// through unchanged. Transient 5xx responses are retried up to the
    /// attempt cap; transport failures propagate unmodified.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = if path.starts_with('/') {
            format!("{}{}", self.endpoint, path)
        } else {
            path.to_string()
        };
        tracing::info!(%method, %url, payload = ?body, "request");

        let mut attempt = 1;
        loop {
            let mut req = self.client.request(method.clone(), &url);
            if let Some(body) = body {
                req = req.json(body);
            }
            let res = req.send()?;
            let status = res.status();
            let text = res.text()?;

            // Decide on a retry before touching the body: a transient 5xx
            // often carries a non-JSON error page from a proxy.
            if RETRY_STATUSES.contains(&status.as_u16()) && attempt < MAX_ATTEMPTS {
                tracing::debug!(status = status.as_u16(), body = %text, "response");
                let delay = backoff_delay(attempt);
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying");
                thread::sleep(delay);
                attempt += 1;
                continue;
            }

            let data = if text.is_empty() {
                None
            } else {
                Some(serde_json::from_str::<Value>(&text)?)
            };
            tracing::debug!(
                status = status.as_u16(),
                body = %data
                    .as_ref()
                    .and_then(|d| serde_json::to_string_pretty(d).ok())
                    .unwrap_or_default(),
                "response"
            );

            return Ok(ApiResponse { status, body: data });
        }
    }

    /// GET convenience wrapper.
    pub fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, None)
    }

    /// POST convenience wrapper.
    pub fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.request(Method::POST, path, body)
    }

    /// DELETE convenience wrapper.
    pub fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, path, None)
    }
}
