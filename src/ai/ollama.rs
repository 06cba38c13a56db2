use serde_json::{json, Value};
use std::collections::HashMap;

use super::{chat_messages, post_json, AiError, AiRequest, AiResponse};

const DEFAULT_URL: &str = "http://localhost:11434";

/// Local models can take minutes to load on the first request.
const TIMEOUT_SECS: u64 = 300;

pub fn call(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let model = settings
        .get("ai_ollama_model")
        .map(|m| m.trim().to_string())
        .unwrap_or_default();
    if model.is_empty() {
        return Err(AiError("Ollama model not configured".into()));
    }

    let base_url = settings
        .get("ai_ollama_url")
        .map(|u| u.trim().trim_end_matches('/'))
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_URL);
    let url = format!("{}/api/chat", base_url);

    let reply = post_json("Ollama", &url, &[], &chat_body(&model, req), TIMEOUT_SECS)?;
    Ok(AiResponse {
        text: extract_text(&reply),
        provider: "ollama".into(),
        model,
    })
}

/// Non-streaming `/api/chat` request. Ollama calls the token cap `num_predict`.
fn chat_body(model: &str, req: &AiRequest) -> Value {
    json!({
        "model": model,
        "messages": chat_messages(req),
        "stream": false,
        "options": {
            "temperature": req.temperature.unwrap_or(0.7),
            "num_predict": req.max_tokens.unwrap_or(1024),
        },
    })
}

fn extract_text(reply: &Value) -> String {
    reply["message"]["content"].as_str().unwrap_or("").to_string()
}
