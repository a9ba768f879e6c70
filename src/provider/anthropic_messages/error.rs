use serde::Deserialize;

use super::types::AnthropicErrorDetail;

/// Extracts `error.message` (with its `error.type`) from an Anthropic error body.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<AnthropicErrorDetail>,
    }

    let error = serde_json::from_str::<ErrorBody>(body).ok()?.error?;
    let message = error.message.filter(|m| !m.trim().is_empty())?;
    Some(match error.kind {
        Some(kind) if !kind.is_empty() => format!("{message} ({kind})"),
        _ => message,
    })
}
