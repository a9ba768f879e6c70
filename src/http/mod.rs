use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;
use serde::Serialize;
use tracing::debug;

use crate::error::LLMError;

/// Minimal POST request representation shared across providers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Whole-call timeout enforced by the transport.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Builds a POST request with a JSON request body.
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_bridge::http::HttpRequest;
    ///
    /// let request = HttpRequest::post_json("https://example.com", br"{}".to_vec());
    /// assert_eq!(request.headers.get("Content-Type"), Some(&"application/json".to_string()));
    /// ```
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body,
            timeout: None,
        }
    }

    /// Merges additional headers into the request, replacing existing names.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Converts the body into a string, replacing invalid UTF-8 sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP response that carries a streaming body.
pub struct HttpStreamResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: HttpBodyStream,
}

/// Body stream returned by [`HttpTransport::send_stream`].
///
/// `Some(Ok(_))` is a chunk, `Some(Err(_))` a hard read failure and `None` the natural
/// close. Dropping the stream releases the underlying connection.
pub type HttpBodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, LLMError>> + Send>>;

/// Transport abstraction used to decouple providers from the concrete HTTP client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and resolves when the full response is available.
    ///
    /// # Errors
    ///
    /// Implementations should map connection failures to [`LLMError::Transport`].
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError>;

    /// Sends a request and returns as soon as the status and headers are known.
    ///
    /// # Examples
    ///
    /// ```
    /// # use async_trait::async_trait;
    /// # use llm_bridge::http::{HttpTransport, HttpRequest, HttpResponse, HttpStreamResponse};
    /// # use llm_bridge::error::LLMError;
    /// # use futures_util::{stream, StreamExt};
    /// struct EchoTransport;
    ///
    /// #[async_trait]
    /// impl HttpTransport for EchoTransport {
    ///     async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
    ///         Ok(HttpResponse { status: 200, headers: request.headers, body: request.body })
    ///     }
    ///     async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LLMError> {
    ///         let body = request.body;
    ///         let stream = stream::once(async move { Ok(body) });
    ///         Ok(HttpStreamResponse { status: 200, headers: request.headers, body: Box::pin(stream) })
    ///     }
    /// }
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let response = EchoTransport
    ///     .send_stream(HttpRequest::post_json("https://example.com", br"{}".to_vec()))
    ///     .await
    ///     .unwrap();
    /// let chunks: Vec<_> = response.body.collect::<Vec<_>>().await;
    /// assert_eq!(chunks.len(), 1);
    /// # });
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Transport`] when the request cannot be dispatched. Failures
    /// while reading the body surface later as items of [`HttpBodyStream`].
    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LLMError>;
}

/// Thread-safe handle to a transport implementation.
pub type DynHttpTransport = Arc<dyn HttpTransport>;

fn encode_body<T: Serialize>(body: &T) -> Result<Vec<u8>, LLMError> {
    serde_json::to_vec(body).map_err(|err| LLMError::Validation {
        message: format!("failed to serialize request: {err}"),
    })
}

/// Serializes a body to JSON, attaches headers, and issues a POST request.
///
/// # Errors
///
/// Returns [`LLMError::Validation`] if serialization fails or forwards the error raised by
/// [`HttpTransport::send`].
pub async fn post_json_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
    timeout: Option<Duration>,
) -> Result<HttpResponse, LLMError> {
    let request = HttpRequest::post_json(url, encode_body(body)?)
        .with_headers(headers)
        .with_timeout(timeout);
    transport.send(request).await
}

/// Issues a JSON POST request and returns the streaming response.
///
/// # Errors
///
/// Returns [`LLMError::Validation`] when serialization fails or propagates any error from
/// [`HttpTransport::send_stream`].
pub async fn post_json_stream_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
) -> Result<HttpStreamResponse, LLMError> {
    let request = HttpRequest::post_json(url, encode_body(body)?).with_headers(headers);
    transport.send_stream(request).await
}

/// Drains a body stream into a string, used to report non-200 streaming responses.
///
/// Reading stops at the first failure; the bytes received up to that point are kept
/// and decoded lossily.
pub async fn collect_body_text(mut body: HttpBodyStream) -> String {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(err) => {
                debug!(received = bytes.len(), error = %err, "error body cut short");
                break;
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

pub mod reqwest;

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use serde::ser;

    /// Transport for paths that must fail before any I/O.
    struct UnreachableTransport;

    #[async_trait]
    impl HttpTransport for UnreachableTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LLMError> {
            unreachable!("request must not be dispatched")
        }

        async fn send_stream(&self, _request: HttpRequest) -> Result<HttpStreamResponse, LLMError> {
            unreachable!("request must not be dispatched")
        }
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(ser::Error::custom("refused"))
        }
    }

    #[tokio::test]
    async fn serialization_failure_is_validation_on_both_paths() {
        let buffered = post_json_with_headers(
            &UnreachableTransport,
            "http://example.com",
            HashMap::new(),
            &Unserializable,
            None,
        )
        .await
        .err();
        let streamed = post_json_stream_with_headers(
            &UnreachableTransport,
            "http://example.com",
            HashMap::new(),
            &Unserializable,
        )
        .await
        .err();

        for err in [buffered, streamed] {
            match err {
                Some(LLMError::Validation { message }) => assert!(message.contains("refused")),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn with_headers_keeps_content_type() {
        let request = HttpRequest::post_json("http://example.com", Vec::new()).with_headers(
            HashMap::from([("Authorization".to_string(), "Bearer k".to_string())]),
        );
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer k")
        );
    }

    #[tokio::test]
    async fn collect_body_text_joins_chunks_and_keeps_partial_bytes() {
        let body: HttpBodyStream = Box::pin(stream::iter(vec![
            Ok(b"{\"error\":".to_vec()),
            Ok(b"\"nope\"}".to_vec()),
        ]));
        assert_eq!(collect_body_text(body).await, "{\"error\":\"nope\"}");

        let failing: HttpBodyStream = Box::pin(stream::iter(vec![
            Ok(b"upstream ".to_vec()),
            Ok(b"overl\xE2".to_vec()),
            Err(LLMError::transport("reset")),
            Ok(b"never read".to_vec()),
        ]));
        assert_eq!(collect_body_text(failing).await, "upstream overl\u{FFFD}");
    }
}
