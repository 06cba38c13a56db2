use serde_json::{json, Value};
use std::collections::HashMap;

use super::{post_json, AiError, AiRequest, AiResponse};

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const TIMEOUT_SECS: u64 = 120;

pub fn call(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let api_key = settings
        .get("ai_gemini_api_key")
        .map(|k| k.trim().to_string())
        .unwrap_or_default();
    if api_key.is_empty() {
        return Err(AiError("Gemini API key not configured".into()));
    }

    let model = settings
        .get("ai_gemini_model")
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MODEL)
        .to_string();
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
        model
    );

    let mut body = json!({
        "contents": [{"role": "user", "parts": [{"text": req.prompt}]}],
        "generationConfig": {
            "maxOutputTokens": req.max_tokens.unwrap_or(1024),
            "temperature": req.temperature.unwrap_or(0.7),
        },
    });
    if !req.system.is_empty() {
        body["systemInstruction"] = json!({"parts": [{"text": req.system}]});
    }
    let headers = [("x-goog-api-key", api_key)];

    let reply = post_json("Gemini", &url, &headers, &body, TIMEOUT_SECS)?;
    Ok(AiResponse {
        text: extract_text(&reply),
        provider: "gemini".into(),
        model,
    })
}

/// All text parts of the first candidate, concatenated.
fn extract_text(reply: &Value) -> String {
    reply["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}
