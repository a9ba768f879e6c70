use crate::error::LLMError;

use super::types::GeminiGenerateContentResponse;

/// Returns `candidates[0].content.parts[0].text`.
///
/// A first part without text (`functionCall`, `inlineData`) yields an empty string;
/// missing candidates or parts are an [`LLMError::EmptyResponse`].
pub(crate) fn extract_text(body: &[u8], provider: &'static str) -> Result<String, LLMError> {
    let parsed: GeminiGenerateContentResponse = serde_json::from_slice(body)
        .map_err(|err| LLMError::decode(provider, format!("failed to parse response: {err}")))?;
    parsed
        .into_first_part()
        .map(|part| part.text.unwrap_or_default())
        .ok_or(LLMError::EmptyResponse { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER: &str = "google_gemini";

    #[test]
    fn returns_first_candidate_first_part() {
        let body = br#"{
  "candidates": [
    {
      "content": {"role": "model", "parts": [{"text": "Paris"}, {"text": "!"}]},
      "finishReason": "STOP"
    },
    {"content": {"parts": [{"text": "Lyon"}]}}
  ],
  "usageMetadata": {"promptTokenCount": 7}
}"#;
        assert_eq!(extract_text(body, PROVIDER).expect("text"), "Paris");
    }

    #[test]
    fn no_candidates_or_parts_is_empty_response() {
        for body in [
            br#"{"candidates":[]}"#.as_slice(),
            br#"{"promptFeedback":{"blockReason":"SAFETY"}}"#.as_slice(),
            br#"{"candidates":[{"content":{"parts":[]}}]}"#.as_slice(),
            br#"{"candidates":[{"finishReason":"SAFETY"}]}"#.as_slice(),
        ] {
            let err = extract_text(body, PROVIDER).unwrap_err();
            assert!(
                matches!(err, LLMError::EmptyResponse { provider: PROVIDER }),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn function_call_first_part_yields_empty_text() {
        let body = br#"{
  "candidates": [
    {
      "content": {
        "role": "model",
        "parts": [
          {"functionCall": {"name": "lookup", "args": {"q": "weather"}}},
          {"text": "later"}
        ]
      }
    }
  ]
}"#;
        assert_eq!(extract_text(body, PROVIDER).expect("first part"), "");
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let err = extract_text(br#"{"candidates":{}}"#, PROVIDER).unwrap_err();
        assert!(matches!(err, LLMError::Decode { .. }));
    }
}
