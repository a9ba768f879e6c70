use serde::{Deserialize, Serialize};

/// GenerateContent request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeminiGenerateContentRequest<'a> {
    pub(crate) contents: Vec<GeminiRequestContent<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeminiRequestContent<'a> {
    pub(crate) role: &'a str,
    pub(crate) parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeminiRequestPart<'a> {
    pub(crate) text: &'a str,
}

/// GenerateContentResponse, shared by the full response and every SSE chunk.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeminiGenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeminiCandidate {
    #[serde(default)]
    pub(crate) content: Option<GeminiContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeminiContent {
    #[serde(default)]
    pub(crate) parts: Vec<GeminiPart>,
}

/// Content part; function calls and inline data carry no `text`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeminiPart {
    #[serde(default)]
    pub(crate) text: Option<String>,
}

impl GeminiGenerateContentResponse {
    /// `candidates[0].content.parts[0]`, if present.
    pub(crate) fn into_first_part(self) -> Option<GeminiPart> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()
    }
}
