use serde_json::Value;

use crate::error::LLMError;
use crate::types::CompletionRequest;

use super::types::{GeminiGenerateContentRequest, GeminiRequestContent, GeminiRequestPart};

/// Builds the GenerateContent body. Streaming is selected by the URL, not the body.
pub(crate) fn build_gemini_body(request: &CompletionRequest) -> Result<Value, LLMError> {
    let body = GeminiGenerateContentRequest {
        contents: vec![GeminiRequestContent {
            role: "user",
            parts: vec![GeminiRequestPart {
                text: request.prompt(),
            }],
        }],
    };
    serde_json::to_value(&body).map_err(|err| LLMError::Validation {
        message: format!("failed to serialize Gemini request: {err}"),
    })
}
