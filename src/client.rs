use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_core::Stream;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::LLMError;
use crate::http::{
    DynHttpTransport, collect_body_text, post_json_stream_with_headers, post_json_with_headers,
};
use crate::provider::anthropic_messages::AnthropicMessagesAdapter;
use crate::provider::google_gemini::GoogleGeminiAdapter;
use crate::provider::{DynProviderAdapter, PreparedRequest};
use crate::stream::FragmentStream;
use crate::types::{CompletionRequest, Provider, TextFragment};

/// Lazily pulled sequence of text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<TextFragment, LLMError>> + Send>>;

/// Result of [`LLMClient::send`], shaped by the request's `stream` flag.
pub enum Completion {
    Text(String),
    Stream(TextStream),
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Completion::Stream(_) => f.debug_tuple("Stream").finish_non_exhaustive(),
        }
    }
}

impl Completion {
    /// Resolves to the full answer, draining the stream when there is one.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal stream error.
    pub async fn into_text(self) -> Result<String, LLMError> {
        match self {
            Completion::Text(text) => Ok(text),
            Completion::Stream(stream) => collect_text(stream).await,
        }
    }
}

/// Concatenates every fragment of a stream in arrival order.
///
/// # Errors
///
/// Returns the first error yielded by the stream; fragments received before it are
/// discarded.
pub async fn collect_text<S>(mut stream: S) -> Result<String, LLMError>
where
    S: Stream<Item = Result<TextFragment, LLMError>> + Unpin,
{
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        text.push_str(&fragment?.text);
    }
    Ok(text)
}

/// Entry point issuing completions against either provider.
///
/// The client only holds immutable configuration and a shared transport, so it can be
/// wrapped in an `Arc` and used from any number of tasks.
pub struct LLMClient {
    base_url: String,
    api_key: String,
    request_timeout: Option<Duration>,
    transport: DynHttpTransport,
    anthropic: DynProviderAdapter,
    google: DynProviderAdapter,
}

impl LLMClient {
    /// Creates a builder for the given gateway and credential.
    pub fn builder(base_url: impl Into<String>, api_key: impl Into<String>) -> LLMClientBuilder {
        LLMClientBuilder {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: None,
            anthropic: AnthropicMessagesAdapter::new(),
        }
    }

    /// Builds a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] when the configuration is incomplete.
    pub fn from_config(config: &ClientConfig, transport: DynHttpTransport) -> Result<Self, LLMError> {
        config.validate()?;
        Ok(Self::builder(config.base_url.clone(), config.api_key.clone())
            .anthropic_version(config.anthropic_version.clone())
            .request_timeout(config.request_timeout())
            .build(transport))
    }

    /// Adapter used for `provider`.
    pub fn adapter(&self, provider: Provider) -> &DynProviderAdapter {
        match provider {
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
        }
    }

    /// Sends a non-streaming request and returns the first content item's text.
    ///
    /// # Errors
    ///
    /// [`LLMError::Validation`] for a blank model, [`LLMError::Transport`] when the
    /// request cannot be delivered, [`LLMError::Http`] for any status other than 200,
    /// and [`LLMError::EmptyResponse`] / [`LLMError::Decode`] for unusable bodies.
    pub async fn complete(
        &self,
        provider: Provider,
        model: &str,
        prompt: &str,
    ) -> Result<String, LLMError> {
        let request = CompletionRequest::new(provider, model, prompt, false)?;
        self.complete_request(&request).await
    }

    /// Sends a streaming request and returns the fragment stream once the provider
    /// answered 200. The caller drives iteration; dropping the stream cancels it.
    ///
    /// # Errors
    ///
    /// Same as [`LLMClient::complete`] up to the status check. Failures after that
    /// point are yielded by the stream itself.
    pub async fn stream(
        &self,
        provider: Provider,
        model: &str,
        prompt: &str,
    ) -> Result<TextStream, LLMError> {
        let request = CompletionRequest::new(provider, model, prompt, true)?;
        self.stream_request(&request).await
    }

    /// Dispatches a prebuilt request according to its `stream` flag.
    ///
    /// # Errors
    ///
    /// See [`LLMClient::complete`] and [`LLMClient::stream`].
    pub async fn send(&self, request: CompletionRequest) -> Result<Completion, LLMError> {
        if request.stream() {
            self.stream_request(&request).await.map(Completion::Stream)
        } else {
            self.complete_request(&request).await.map(Completion::Text)
        }
    }

    async fn complete_request(&self, request: &CompletionRequest) -> Result<String, LLMError> {
        let adapter = self.adapter(request.provider());
        let prepared = self.prepare(adapter, request)?;
        let response = post_json_with_headers(
            self.transport.as_ref(),
            prepared.url,
            prepared.headers,
            &prepared.body,
            self.request_timeout,
        )
        .await?;

        if response.status != 200 {
            return Err(self.http_error(adapter, response.status, response.body_text()));
        }
        adapter.decode_response(&response.body)
    }

    async fn stream_request(&self, request: &CompletionRequest) -> Result<TextStream, LLMError> {
        let adapter = self.adapter(request.provider());
        let prepared = self.prepare(adapter, request)?;
        let response = post_json_stream_with_headers(
            self.transport.as_ref(),
            prepared.url,
            prepared.headers,
            &prepared.body,
        )
        .await?;

        if response.status != 200 {
            let body = collect_body_text(response.body).await;
            return Err(self.http_error(adapter, response.status, body));
        }
        Ok(Box::pin(FragmentStream::new(response.body, adapter.clone())))
    }

    fn prepare(
        &self,
        adapter: &DynProviderAdapter,
        request: &CompletionRequest,
    ) -> Result<PreparedRequest, LLMError> {
        let mut prepared = adapter.build_request(&self.base_url, request)?;
        prepared.headers.extend(self.auth_headers());
        debug!(
            provider = adapter.name(),
            model = request.model(),
            stream = request.stream(),
            url = %prepared.url,
            "dispatching completion request"
        );
        Ok(prepared)
    }

    fn auth_headers(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ])
    }

    fn http_error(&self, adapter: &DynProviderAdapter, status: u16, body: String) -> LLMError {
        let message = adapter.error_message(&body);
        warn!(
            provider = adapter.name(),
            status,
            message = message.as_deref().unwrap_or_default(),
            "provider returned error status"
        );
        LLMError::Http {
            status,
            body,
            message,
        }
    }
}

/// Builder for [`LLMClient`].
pub struct LLMClientBuilder {
    base_url: String,
    api_key: String,
    request_timeout: Option<Duration>,
    anthropic: AnthropicMessagesAdapter,
}

impl LLMClientBuilder {
    /// Overrides the `anthropic-version` header.
    pub fn anthropic_version(mut self, version: impl Into<String>) -> Self {
        self.anthropic = self.anthropic.with_version(version);
        self
    }

    /// Whole-call timeout applied to non-streaming requests.
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the client on top of a shared transport.
    pub fn build(self, transport: DynHttpTransport) -> LLMClient {
        LLMClient {
            base_url: self.base_url,
            api_key: self.api_key,
            request_timeout: self.request_timeout,
            transport,
            anthropic: Arc::new(self.anthropic),
            google: Arc::new(GoogleGeminiAdapter::new()),
        }
    }
}
