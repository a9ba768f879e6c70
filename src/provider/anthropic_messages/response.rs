use crate::error::LLMError;

use super::types::AnthropicMessageResponse;

/// Returns the text of the first content block.
///
/// A first block without text (`thinking`, `tool_use`) yields an empty string; only a
/// response with no content block at all is an [`LLMError::EmptyResponse`].
pub(crate) fn extract_text(body: &[u8], provider: &'static str) -> Result<String, LLMError> {
    let parsed: AnthropicMessageResponse = serde_json::from_slice(body)
        .map_err(|err| LLMError::decode(provider, format!("failed to parse response: {err}")))?;

    parsed
        .content
        .into_iter()
        .next()
        .map(|block| block.text.unwrap_or_default())
        .ok_or(LLMError::EmptyResponse { provider })
}
