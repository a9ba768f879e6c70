use std::collections::HashMap;

use crate::error::LLMError;
use crate::provider::{PreparedRequest, ProviderAdapter, join_versioned};
use crate::types::{CompletionRequest, RawEvent};

use super::error::parse_error_message;
use super::request::build_anthropic_body;
use super::response::extract_text;
use super::stream::decode_event;

pub(crate) const DEFAULT_VERSION: &str = "2023-06-01";

/// Anthropic Messages adapter (`POST {base}/v1/messages`).
#[derive(Debug, Clone)]
pub struct AnthropicMessagesAdapter {
    version: String,
}

impl AnthropicMessagesAdapter {
    /// Creates an adapter that sends `anthropic-version: 2023-06-01`.
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
        }
    }

    /// Overrides the `anthropic-version` header.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn endpoint(&self, base_url: &str) -> String {
        join_versioned(base_url, "v1", "messages")
    }
}

impl Default for AnthropicMessagesAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for AnthropicMessagesAdapter {
    fn name(&self) -> &'static str {
        "anthropic_messages"
    }

    fn build_request(
        &self,
        base_url: &str,
        request: &CompletionRequest,
    ) -> Result<PreparedRequest, LLMError> {
        Ok(PreparedRequest {
            url: self.endpoint(base_url),
            headers: HashMap::from([("anthropic-version".to_string(), self.version.clone())]),
            body: build_anthropic_body(request)?,
        })
    }

    fn decode_response(&self, body: &[u8]) -> Result<String, LLMError> {
        extract_text(body, self.name())
    }

    fn decode_stream_event(&self, payload: &str) -> Result<RawEvent, LLMError> {
        decode_event(payload, self.name())
    }

    fn error_message(&self, body: &str) -> Option<String> {
        parse_error_message(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;

    #[test]
    fn build_request_targets_messages_endpoint_with_version_header() {
        let adapter = AnthropicMessagesAdapter::new();
        let request =
            CompletionRequest::new(Provider::Anthropic, "claude-sonnet-4-5", "Hi", true).unwrap();
        let prepared = adapter
            .build_request("https://gw.example.com/antigravity", &request)
            .expect("prepared");

        assert_eq!(prepared.url, "https://gw.example.com/antigravity/v1/messages");
        assert_eq!(
            prepared.headers.get("anthropic-version").map(String::as_str),
            Some("2023-06-01")
        );
        assert_eq!(prepared.body["stream"], serde_json::json!(true));
    }

    #[test]
    fn custom_version_is_sent() {
        let adapter = AnthropicMessagesAdapter::new().with_version("2024-10-22");
        let request =
            CompletionRequest::new(Provider::Anthropic, "claude-opus-4-5", "Hi", false).unwrap();
        let prepared = adapter.build_request("https://api.anthropic.com/", &request).unwrap();
        assert_eq!(prepared.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(
            prepared.headers.get("anthropic-version").map(String::as_str),
            Some("2024-10-22")
        );
    }
}
