use thiserror::Error;

/// Aggregates every failure mode exposed by the unified client.
///
/// Variants are fatal to the call that produced them. The only recoverable failure,
/// a single undecodable stream event, never escapes [`crate::stream::FragmentStream`].
#[derive(Debug, Error)]
pub enum LLMError {
    /// Connection, DNS or TLS failure raised by the transport.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The provider answered with a non-200 status.
    #[error("http status {status}: {}", .message.as_deref().unwrap_or(.body.as_str()))]
    Http {
        status: u16,
        /// Response body kept verbatim for diagnostics.
        body: String,
        /// Provider-reported `error.message`, when the body carried one.
        message: Option<String>,
    },
    /// The provider returned 200 without a single usable content item.
    #[error("provider {provider} returned an empty response")]
    EmptyResponse { provider: &'static str },
    /// A body or stream line did not match the expected shape.
    #[error("provider {provider} decode error: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
    /// The byte stream failed mid-iteration, or the provider reported an in-band error.
    #[error("stream error: {message}")]
    Stream { message: String },
    /// Signals validation failures in the request before anything is sent.
    #[error("invalid request: {message}")]
    Validation { message: String },
    /// Raised when building or validating configuration fails.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the configuration field that failed validation.
        field: String,
        /// Additional context explaining why the field is invalid.
        reason: String,
    },
}

impl LLMError {
    /// Creates an [`LLMError::Transport`] from a textual description.
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_bridge::error::LLMError;
    ///
    /// let err = LLMError::transport("dns lookup failed");
    /// assert!(matches!(err, LLMError::Transport { .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an [`LLMError::Decode`] tagged with the provider name.
    pub fn decode<T: Into<String>>(provider: &'static str, message: T) -> Self {
        Self::Decode {
            provider,
            message: message.into(),
        }
    }

    /// Creates an [`LLMError::Stream`].
    pub fn stream<T: Into<String>>(message: T) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Returns the HTTP status for [`LLMError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the error terminated an in-flight stream.
    pub fn is_stream_error(&self) -> bool {
        matches!(self, Self::Stream { .. })
    }
}
