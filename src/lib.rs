//! Unified chat completions over Anthropic Messages and Google Gemini.
//!
//! The crate issues one-shot completions and normalizes provider SSE streams into an
//! ordered sequence of [`TextFragment`]s.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod stream;
pub mod types;

pub use client::{Completion, LLMClient, TextStream, collect_text};
pub use config::ClientConfig;
pub use error::LLMError;
pub use provider::ProviderAdapter;
pub use stream::FragmentStream;
pub use types::*;
