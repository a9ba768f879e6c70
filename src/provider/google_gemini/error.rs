use serde::Deserialize;

/// Extracts `error.message` (with the RPC `error.status`) from a Gemini error body.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<InnerError>,
    }

    #[derive(Deserialize)]
    struct InnerError {
        message: Option<String>,
        status: Option<String>,
    }

    // Some gateways wrap the error object in a single-element array. Pick the shape
    // up front: serde would otherwise read the array as a struct by position.
    let parsed = if body.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<ErrorBody>>(body)
            .ok()?
            .into_iter()
            .next()?
    } else {
        serde_json::from_str::<ErrorBody>(body).ok()?
    };
    let error = parsed.error?;
    let message = error.message.filter(|m| !m.trim().is_empty())?;
    Some(match error.status {
        Some(status) if !status.is_empty() => format!("{message} ({status})"),
        _ => message,
    })
}
