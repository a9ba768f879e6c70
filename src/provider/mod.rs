use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::LLMError;
use crate::types::{CompletionRequest, RawEvent};

pub mod anthropic_messages;
pub mod google_gemini;

/// Provider-specific request prepared for dispatch. Building one performs no I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    /// Headers required by the wire protocol, on top of auth and content type.
    pub headers: HashMap<String, String>,
    pub body: Value,
}

/// Translation layer between the uniform request model and one vendor's wire format.
///
/// Implementations are pure: they never touch the network and hold only immutable
/// settings, so a single instance serves any number of concurrent calls.
pub trait ProviderAdapter: Send + Sync {
    /// Stable adapter name, such as `anthropic_messages`.
    fn name(&self) -> &'static str;

    /// Builds the endpoint URL, protocol headers and JSON payload for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Validation`] when the request cannot be expressed in this
    /// provider's format.
    fn build_request(
        &self,
        base_url: &str,
        request: &CompletionRequest,
    ) -> Result<PreparedRequest, LLMError>;

    /// Extracts the answer text from a complete non-streaming response body.
    ///
    /// # Errors
    ///
    /// [`LLMError::EmptyResponse`] when the body holds no content item and
    /// [`LLMError::Decode`] when it does not match the expected JSON shape.
    fn decode_response(&self, body: &[u8]) -> Result<String, LLMError>;

    /// Decodes one SSE `data:` payload, already stripped of its prefix.
    ///
    /// # Errors
    ///
    /// [`LLMError::Decode`] for malformed payloads, which the stream normalizer skips.
    /// Any other variant is fatal to the stream.
    fn decode_stream_event(&self, payload: &str) -> Result<RawEvent, LLMError>;

    /// Pulls the provider's human-readable message out of an error body.
    fn error_message(&self, _body: &str) -> Option<String> {
        None
    }
}

/// Thread-safe adapter handle.
pub type DynProviderAdapter = Arc<dyn ProviderAdapter>;

/// Joins a base URL and a path without doubling the version segment.
pub(crate) fn join_versioned(base_url: &str, version: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with(&format!("/{version}")) {
        format!("{base}/{path}")
    } else {
        format!("{base}/{version}/{path}")
    }
}
