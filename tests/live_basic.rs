use std::env;

use dotenvy::dotenv;
use futures_util::StreamExt;
use llm_bridge::config::{ClientConfig, build_client};
use llm_bridge::http::reqwest::default_dyn_transport;
use llm_bridge::{LLMClient, Provider};

/// Connectivity test for one-shot Gemini completions.
#[tokio::test]
#[ignore = "requires AI_BASE_URL and AI_API_KEY"]
async fn gemini_models_complete_live() {
    dotenv().ok();
    let Some(client) = build_client_from_env() else {
        return;
    };

    for model in ["gemini-3-flash", "gemini-3-pro-high", "gemini-2.5-flash"] {
        let text = client
            .complete(Provider::Google, model, "Say 'Gemini is online'")
            .await
            .unwrap_or_else(|err| panic!("{model} completion should succeed: {err}"));
        assert!(!text.trim().is_empty(), "{model} returned empty text");
    }
}

/// Connectivity test for one-shot Claude completions.
#[tokio::test]
#[ignore = "requires AI_BASE_URL and AI_API_KEY"]
async fn claude_models_complete_live() {
    dotenv().ok();
    let Some(client) = build_client_from_env() else {
        return;
    };

    for model in ["claude-3-5-sonnet-20240620", "claude-sonnet-4-5", "claude-opus-4-5"] {
        let text = client
            .complete(Provider::Anthropic, model, "Say 'Claude is online'")
            .await
            .unwrap_or_else(|err| panic!("{model} completion should succeed: {err}"));
        assert!(!text.trim().is_empty(), "{model} returned empty text");
    }
}

/// Streams a short answer from each provider and checks fragments arrive.
#[tokio::test]
#[ignore = "requires AI_BASE_URL and AI_API_KEY"]
async fn streaming_live() {
    dotenv().ok();
    let Some(client) = build_client_from_env() else {
        return;
    };

    for (provider, model) in [
        (Provider::Google, "gemini-3-flash"),
        (Provider::Anthropic, "claude-sonnet-4-5"),
    ] {
        let mut stream = client
            .stream(provider, model, "Tell me a very short joke.")
            .await
            .unwrap_or_else(|err| panic!("{model} stream should open: {err}"));

        let mut fragments = 0;
        let mut text = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment.unwrap_or_else(|err| panic!("{model} stream failed: {err}"));
            assert!(!fragment.text.is_empty(), "empty fragments must be suppressed");
            fragments += 1;
            text.push_str(&fragment.text);
        }
        assert!(fragments > 0, "{model} yielded no fragments");
        eprintln!("[{model}] {text}");
    }
}

fn build_client_from_env() -> Option<LLMClient> {
    let Some(base_url) = load_env_var("AI_BASE_URL") else {
        eprintln!("skip live tests: AI_BASE_URL missing");
        return None;
    };
    let Some(api_key) = load_env_var("AI_API_KEY") else {
        eprintln!("skip live tests: AI_API_KEY missing");
        return None;
    };

    let transport = default_dyn_transport().expect("transport");
    let config = ClientConfig::new(base_url, api_key);
    Some(build_client(&config, transport).expect("client"))
}

fn load_env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
