//! API Credentials
//!
//! Endpoint, TLS verification policy and bearer token, supplied by the host
//! runtime's per-node `client_config` map. Constructed once per operation
//! invocation and never persisted.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use url::Url;

/// TLS verification policy for the endpoint.
///
/// Either a plain on/off flag or a path to a CA bundle to trust.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum VerifyPolicy {
    Flag(bool),
    CaBundle(PathBuf),
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        VerifyPolicy::Flag(true)
    }
}

/// Tower API access credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredentials {
    pub endpoint: Url,
    #[serde(default)]
    pub endpoint_verify: VerifyPolicy,
    pub access_token: String,
}

impl ApiCredentials {
    /// Build credentials from the host-supplied `client_config` map.
    ///
    /// A malformed map is a configuration defect, not something a retry
    /// can fix.
    pub fn from_client_config(config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone())
            .map_err(|e| Error::NonRecoverable(format!("invalid client_config: {}", e)))
    }

    /// Whether the endpoint uses the plain-text scheme. TLS verification
    /// settings are only applied when this is false.
    pub fn is_insecure(&self) -> bool {
        self.endpoint.scheme() == "http"
    }
}
