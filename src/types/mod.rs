//! Provider-agnostic request and stream data types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LLMError;

/// Wire protocol a request is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Anthropic Messages (`/v1/messages`).
    Anthropic,
    /// Google Gemini GenerateContent (`/v1beta/models/{model}:generateContent`).
    Google,
}

impl Provider {
    /// Adapter name used in logs and error variants.
    pub fn name(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic_messages",
            Provider::Google => "google_gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single completion call. Immutable once built.
///
/// # Examples
///
/// ```
/// use llm_bridge::types::{CompletionRequest, Provider};
///
/// let request = CompletionRequest::new(Provider::Google, "gemini-2.5-flash", "Hello", true).unwrap();
/// assert!(request.stream());
/// assert!(CompletionRequest::new(Provider::Google, "  ", "Hello", false).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    provider: Provider,
    model: String,
    prompt: String,
    stream: bool,
}

impl CompletionRequest {
    /// Builds a request, rejecting a blank model name.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Validation`] when `model` is empty or whitespace.
    pub fn new(
        provider: Provider,
        model: impl Into<String>,
        prompt: impl Into<String>,
        stream: bool,
    ) -> Result<Self, LLMError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(LLMError::Validation {
                message: format!("model is required for {provider}"),
            });
        }
        Ok(Self {
            provider,
            model,
            prompt: prompt.into(),
            stream,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn stream(&self) -> bool {
        self.stream
    }
}

/// One incremental piece of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextFragment {
    pub text: String,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<TextFragment> for String {
    fn from(fragment: TextFragment) -> Self {
        fragment.text
    }
}

/// Outcome of decoding one SSE `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEvent {
    /// Text carried by the event, if any.
    pub fragment: Option<TextFragment>,
    /// No further events will follow.
    pub is_terminal: bool,
}

impl RawEvent {
    /// Event that carries text and keeps the stream open.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            fragment: Some(TextFragment::new(text)),
            is_terminal: false,
        }
    }

    /// Event with nothing to report, such as pings or block boundaries.
    pub fn ignored() -> Self {
        Self::default()
    }

    /// Explicit end-of-stream marker.
    pub fn terminal() -> Self {
        Self {
            fragment: None,
            is_terminal: true,
        }
    }
}
