use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use crate::error::LLMError;

use super::{
    DynHttpTransport, HttpBodyStream, HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport,
};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default [`HttpTransport`] backed by a shared `reqwest::Client`.
///
/// The client pools connections internally and is safe to use from many tasks at once.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps a caller-configured `reqwest::Client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a transport with a bounded connect phase and no overall deadline, so
    /// long-lived streams are never cut by the client itself.
    pub fn default_client() -> Result<Self, LLMError> {
        Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map(Self::new)
            .map_err(|err| LLMError::transport(format!("failed to create reqwest client: {err}")))
    }

    fn post(&self, request: HttpRequest) -> Result<RequestBuilder, LLMError> {
        let mut builder = self
            .client
            .post(&request.url)
            .headers(to_header_map(&request.headers)?)
            .body(request.body);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<Response, LLMError> {
        let url = request.url.clone();
        let response = self.post(request)?.send().await.map_err(|err| {
            debug!(%url, error = %err, "request failed before a response arrived");
            transport_error(&err)
        })?;
        debug!(%url, status = response.status().as_u16(), "response headers received");
        Ok(response)
    }
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, LLMError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| LLMError::transport(format!("invalid header name {name:?}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| LLMError::transport(format!("invalid header value for {name}: {err}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn from_header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

fn transport_error(err: &reqwest::Error) -> LLMError {
    if err.is_timeout() {
        LLMError::transport(format!("request timed out: {err}"))
    } else if err.is_connect() {
        LLMError::transport(format!("connection failed: {err}"))
    } else {
        LLMError::transport(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
        let response = self.dispatch(request).await?;
        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(&err))?
            .to_vec();
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LLMError> {
        let response = self.dispatch(request).await?;
        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body: HttpBodyStream = Box::pin(response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|err| transport_error(&err))
        }));
        Ok(HttpStreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Convenience constructor for a shareable default transport.
pub fn default_dyn_transport() -> Result<DynHttpTransport, LLMError> {
    Ok(Arc::new(ReqwestTransport::default_client()?))
}
