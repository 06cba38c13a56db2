pub mod gemini;
pub mod ollama;
pub mod openai;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::store::Store;

// ── Types ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug)]
pub struct AiError(pub String);

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub system: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            system: String::new(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// Anything that can turn a prompt into text. The copywriter and brand voice
/// flows only ever talk to this trait.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, AiError>;
}

// ── Provider Enum ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Provider {
    Ollama,
    OpenAi,
    Gemini,
}

impl Provider {
    const ALL: [Provider; 3] = [Provider::Ollama, Provider::OpenAi, Provider::Gemini];

    fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "ollama" => Some(Self::Ollama),
            "openai" => Some(Self::OpenAi),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }
}

// ── Failover Chain ────────────────────────────────────

/// Production `TextGenerator`: walks `ai_failover_chain` and returns the
/// first enabled provider that answers with non-empty text.
pub struct ProviderChain {
    store: Arc<dyn Store>,
}

impl ProviderChain {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn complete(&self, req: &AiRequest) -> Result<AiResponse, AiError> {
        complete_with(&self.store.option_all(), req)
    }
}

impl TextGenerator for ProviderChain {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, AiError> {
        let req = AiRequest {
            system: options.system.clone(),
            prompt: prompt.to_string(),
            max_tokens: Some(options.max_tokens),
            temperature: Some(options.temperature),
        };
        self.complete(&req).map(|resp| resp.text)
    }
}

fn parse_chain(settings: &HashMap<String, String>) -> Vec<Provider> {
    settings
        .get("ai_failover_chain")
        .cloned()
        .unwrap_or_else(|| "ollama,openai,gemini".to_string())
        .split(',')
        .filter_map(Provider::from_str)
        .collect()
}

fn enable_key(provider: &Provider) -> String {
    format!("ai_{}_enabled", provider.name())
}

fn provider_enabled(settings: &HashMap<String, String>, provider: &Provider) -> bool {
    matches!(
        settings.get(&enable_key(provider)).map(|v| v.trim()),
        Some("true") | Some("1")
    )
}

/// Send a request through the failover chain. Returns the first successful response.
fn complete_with(settings: &HashMap<String, String>, req: &AiRequest) -> Result<AiResponse, AiError> {
    let chain = parse_chain(settings);
    if chain.is_empty() {
        return Err(AiError(
            "No AI providers configured in failover chain".into(),
        ));
    }

    let mut last_error = String::from("no provider is enabled");

    for provider in chain.iter().filter(|p| provider_enabled(settings, p)) {
        match call_provider(provider, settings, req) {
            Ok(resp) if resp.text.trim().is_empty() => {
                log::warn!("AI provider {} returned an empty response", provider.name());
                last_error = format!("{} returned an empty response", provider.name());
            }
            Ok(resp) => {
                log::info!("AI request served by {} ({})", resp.provider, resp.model);
                return Ok(resp);
            }
            Err(e) => {
                log::warn!("AI provider {} failed: {}", provider.name(), e.0);
                last_error = e.0;
            }
        }
    }

    Err(AiError(format!(
        "All AI providers failed. Last error: {}",
        last_error
    )))
}

/// Check if any AI provider is enabled
pub fn is_enabled(store: &dyn Store) -> bool {
    Provider::ALL
        .iter()
        .any(|p| store.option_get_bool(&enable_key(p)))
}

/// Per-provider enabled flags, in failover order
pub fn provider_flags(store: &dyn Store) -> Vec<(String, bool)> {
    let settings = store.option_all();
    parse_chain(&settings)
        .iter()
        .map(|p| (p.name().to_string(), provider_enabled(&settings, p)))
        .collect()
}

// ── Provider Dispatch ─────────────────────────────────

/// POST a JSON body and return the decoded JSON reply. Non-2xx statuses
/// become errors carrying the vendor name and response body.
fn post_json(
    vendor: &str,
    url: &str,
    headers: &[(&str, String)],
    body: &Value,
    timeout_secs: u64,
) -> Result<Value, AiError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AiError(format!("HTTP client error: {}", e)))?;

    let mut request = client.post(url).json(body);
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }
    let resp = request
        .send()
        .map_err(|e| AiError(format!("{} request failed: {}", vendor, e)))?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().unwrap_or_default();
        return Err(AiError(format!("{} returned {}: {}", vendor, status, text)));
    }
    resp.json()
        .map_err(|e| AiError(format!("{} JSON parse error: {}", vendor, e)))
}

/// Chat-style message list shared by Ollama and OpenAI. An empty system
/// prompt is left out.
fn chat_messages(req: &AiRequest) -> Vec<Value> {
    let mut messages = Vec::with_capacity(2);
    if !req.system.is_empty() {
        messages.push(json!({"role": "system", "content": req.system}));
    }
    messages.push(json!({"role": "user", "content": req.prompt}));
    messages
}

fn call_provider(
    provider: &Provider,
    settings: &HashMap<String, String>,
    req: &AiRequest,
) -> Result<AiResponse, AiError> {
    match provider {
        Provider::Ollama => ollama::call(settings, req),
        Provider::OpenAi => openai::call(settings, req),
        Provider::Gemini => gemini::call(settings, req),
    }
}
