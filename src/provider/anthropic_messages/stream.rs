use crate::error::LLMError;
use crate::types::RawEvent;

use super::types::AnthropicStreamEvent;

/// Decodes one Messages SSE payload.
///
/// Only `content_block_delta` carries text. Every other event type, `message_stop`
/// included, is non-terminal: the stream ends when the server closes the connection.
/// An in-band `error` event is fatal.
pub(crate) fn decode_event(payload: &str, provider: &'static str) -> Result<RawEvent, LLMError> {
    let event: AnthropicStreamEvent = serde_json::from_str(payload)
        .map_err(|err| LLMError::decode(provider, format!("failed to parse stream event: {err}")))?;

    match event.kind.as_str() {
        "content_block_delta" => Ok(event
            .delta
            .and_then(|delta| delta.text)
            .map(RawEvent::text)
            .unwrap_or_default()),
        "error" => {
            let detail = event.error;
            let kind = detail
                .as_ref()
                .and_then(|d| d.kind.clone())
                .unwrap_or_else(|| "error".to_string());
            let message = detail
                .and_then(|d| d.message)
                .unwrap_or_else(|| "unknown error".to_string());
            Err(LLMError::stream(format!("{provider} {kind}: {message}")))
        }
        _ => Ok(RawEvent::ignored()),
    }
}
