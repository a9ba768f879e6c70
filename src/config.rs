use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::LLMClient;
use crate::error::LLMError;
use crate::http::DynHttpTransport;
use crate::provider::anthropic_messages::DEFAULT_VERSION;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resolved gateway settings shared by every request of a client.
///
/// Loading (files, environment, secrets managers) is left to the caller; the struct
/// only derives serde so it can be embedded in any configuration format.
///
/// # Examples
///
/// ```
/// use llm_bridge::config::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(
///     r#"{"base_url": "https://gw.example.com", "api_key": "sk-test"}"#,
/// )
/// .unwrap();
/// assert_eq!(config.anthropic_version, "2023-06-01");
/// assert_eq!(config.request_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Gateway root, e.g. `https://api.example.com/antigravity`. Provider paths are appended.
    pub base_url: String,
    /// Sent as `Authorization: Bearer <api_key>`.
    pub api_key: String,
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
    /// Whole-call timeout of non-streaming requests; `0` disables it.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_anthropic_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            anthropic_version: default_anthropic_version(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), LLMError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid("base_url", "must start with http:// or https://"));
        }
        if self.api_key.trim().is_empty() {
            return Err(invalid("api_key", "must not be empty"));
        }
        if self.anthropic_version.trim().is_empty() {
            return Err(invalid("anthropic_version", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> LLMError {
    LLMError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Builds an [`LLMClient`] from configuration and a shared transport.
///
/// # Errors
///
/// Returns [`LLMError::InvalidConfig`] when validation fails.
pub fn build_client(
    config: &ClientConfig,
    transport: DynHttpTransport,
) -> Result<LLMClient, LLMError> {
    LLMClient::from_config(config, transport)
}
