use serde_json::Value;

use crate::error::LLMError;
use crate::types::CompletionRequest;

use super::types::{AnthropicMessage, AnthropicMessagesRequest};

/// Upper bound on generated tokens sent with every request.
pub(crate) const MAX_TOKENS: u32 = 1024;

/// Builds the Anthropic Messages request body for a single user turn.
pub(crate) fn build_anthropic_body(request: &CompletionRequest) -> Result<Value, LLMError> {
    let body = AnthropicMessagesRequest {
        model: request.model(),
        messages: vec![AnthropicMessage {
            role: "user",
            content: request.prompt(),
        }],
        max_tokens: MAX_TOKENS,
        stream: request.stream(),
    };
    serde_json::to_value(&body).map_err(|err| LLMError::Validation {
        message: format!("failed to serialize Anthropic request: {err}"),
    })
}
