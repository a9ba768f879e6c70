use std::collections::HashMap;

use crate::error::LLMError;
use crate::provider::{PreparedRequest, ProviderAdapter, join_versioned};
use crate::types::{CompletionRequest, RawEvent};

use super::error::parse_error_message;
use super::request::build_gemini_body;
use super::response::extract_text;
use super::stream::decode_event;

/// Google Gemini GenerateContent adapter.
#[derive(Debug, Clone, Default)]
pub struct GoogleGeminiAdapter;

impl GoogleGeminiAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Builds `.../v1beta/models/{model}:generateContent` or its SSE streaming twin.
    pub fn endpoint(&self, base_url: &str, model: &str, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        join_versioned(
            base_url,
            "v1beta",
            &format!("{}:{method}", normalize_model(model)),
        )
    }
}

fn normalize_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

impl ProviderAdapter for GoogleGeminiAdapter {
    fn name(&self) -> &'static str {
        "google_gemini"
    }

    fn build_request(
        &self,
        base_url: &str,
        request: &CompletionRequest,
    ) -> Result<PreparedRequest, LLMError> {
        Ok(PreparedRequest {
            url: self.endpoint(base_url, request.model(), request.stream()),
            headers: HashMap::new(),
            body: build_gemini_body(request)?,
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
