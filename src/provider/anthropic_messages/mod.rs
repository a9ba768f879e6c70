//! Anthropic Messages wire format.

mod error;
mod provider;
mod request;
mod response;
mod stream;
mod types;

pub use provider::AnthropicMessagesAdapter;
pub(crate) use provider::DEFAULT_VERSION;
