use crate::error::LLMError;
use crate::types::RawEvent;

use super::types::GeminiGenerateContentResponse;

const DONE_SENTINEL: &str = "[DONE]";

/// Decodes one `streamGenerateContent?alt=sse` payload.
pub(crate) fn decode_event(payload: &str, provider: &'static str) -> Result<RawEvent, LLMError> {
    if payload.trim() == DONE_SENTINEL {
        return Ok(RawEvent::terminal());
    }

    let chunk: GeminiGenerateContentResponse = serde_json::from_str(payload)
        .map_err(|err| LLMError::decode(provider, format!("failed to parse stream chunk: {err}")))?;
    Ok(chunk
        .into_first_part()
        .and_then(|part| part.text)
        .map(RawEvent::text)
        .unwrap_or_default())
}
