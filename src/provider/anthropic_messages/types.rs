use serde::{Deserialize, Serialize};

/// Request payload for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicMessagesRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: Vec<AnthropicMessage<'a>>,
    pub(crate) max_tokens: u32,
    pub(crate) stream: bool,
}

/// Single conversation turn with plain string content.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicMessage<'a> {
    pub(crate) role: &'a str,
    pub(crate) content: &'a str,
}

/// Non-streaming response payload returned by Anthropic Messages.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnthropicMessageResponse {
    /// Ordered list of content blocks.
    #[serde(default)]
    pub(crate) content: Vec<AnthropicContentBlock>,
}

/// Content block; only `text` blocks carry a `text` field.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnthropicContentBlock {
    #[serde(default)]
    pub(crate) text: Option<String>,
}

/// One SSE event of the Messages stream (`message_start`, `content_block_delta`, ...).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnthropicStreamEvent {
    #[serde(default, rename = "type")]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) delta: Option<AnthropicDelta>,
    #[serde(default)]
    pub(crate) error: Option<AnthropicErrorDetail>,
}

/// Delta of a `content_block_delta` event. Tool-input deltas carry no `text`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnthropicDelta {
    #[serde(default)]
    pub(crate) text: Option<String>,
}

/// Error object shared by error responses and in-band `error` events.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnthropicErrorDetail {
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}
