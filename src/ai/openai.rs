use serde_json::{json, Value};
use std::collections::HashMap;

use super::{chat_messages, post_json, AiError, AiRequest, AiResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TIMEOUT_SECS: u64 = 120;

/// OpenAI and any OpenAI-compatible endpoint (set `ai_openai_base_url`).
pub fn call(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let api_key = settings
        .get("ai_openai_api_key")
        .map(|k| k.trim().to_string())
        .unwrap_or_default();
    if api_key.is_empty() {
        return Err(AiError("OpenAI API key not configured".into()));
    }

    let model = settings
        .get("ai_openai_model")
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MODEL)
        .to_string();
    let base_url = settings
        .get("ai_openai_base_url")
        .map(|u| u.trim().trim_end_matches('/'))
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);
    let url = format!("{}/chat/completions", base_url);

    let body = json!({
        "model": model,
        "messages": chat_messages(req),
        "max_tokens": req.max_tokens.unwrap_or(1024),
        "temperature": req.temperature.unwrap_or(0.7),
    });
    let headers = [("Authorization", format!("Bearer {}", api_key))];

    let reply = post_json("OpenAI", &url, &headers, &body, TIMEOUT_SECS)?;
    Ok(AiResponse {
        text: extract_text(&reply),
        provider: "openai".into(),
        model,
    })
}

fn extract_text(reply: &Value) -> String {
    reply["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string()
}
