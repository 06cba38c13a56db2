use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use std::sync::Arc;

use crate::ai::TextGenerator;
use crate::copywriter::{
    self, prompts, ContentType, CopyRequest, DEFAULT_TARGET_LENGTH, OPTIMAL_SEO_LENGTH, PHI,
};
use crate::models::brand_voice::BrandVoice;
use crate::rate_limit::RateLimiter;
use crate::security::auth::{VerifiedNonce, WriterUser};
use crate::store::Store;

use super::{
    ai_rate_allowed, generate_blocking, generation_options, sanitize_text_field,
    sanitize_textarea, GENERIC_AI_ERROR,
};

const MIN_TARGET_LENGTH: u32 = 50;
const MAX_TARGET_LENGTH: u32 = 3000;

/// Voice slug that resolves to the stored brand voice analysis.
pub const LEARNED_VOICE: &str = "learned";

// ── Request Types ─────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CopyForm {
    pub content_type: Option<String>,
    pub topic: Option<String>,
    pub key_points: Option<String>,
    pub audience: Option<String>,
    pub voice: Option<String>,
    pub target_length: Option<u32>,
    pub keyword: Option<String>,
}

impl CopyForm {
    /// Sanitize the form into a `CopyRequest`. The topic is the only required field.
    pub fn to_copy_request(&self, store: &dyn Store) -> Result<CopyRequest, String> {
        let topic = sanitize_text_field(self.topic.as_deref().unwrap_or(""));
        if topic.is_empty() {
            return Err("Topic is required".into());
        }

        let voice = match self.voice.as_deref().map(sanitize_text_field) {
            Some(v) if !v.is_empty() => v,
            _ => store.option_get_or("brain_default_voice", "professional"),
        };
        let voice = if voice == LEARNED_VOICE {
            BrandVoice::load(store)
                .map(|bv| bv.analysis)
                .filter(|a| !a.is_empty())
                .unwrap_or(voice)
        } else {
            voice
        };

        Ok(CopyRequest {
            content_type: ContentType::from_slug(self.content_type.as_deref().unwrap_or("")),
            topic,
            key_points: sanitize_textarea(self.key_points.as_deref().unwrap_or("")),
            audience: sanitize_text_field(self.audience.as_deref().unwrap_or("")),
            voice,
            target_length: self
                .target_length
                .unwrap_or(DEFAULT_TARGET_LENGTH)
                .clamp(MIN_TARGET_LENGTH, MAX_TARGET_LENGTH),
        })
    }

    /// Scoring keyword: explicit keyword, else the topic.
    pub fn keyword(&self, request: &CopyRequest) -> String {
        self.keyword
            .as_deref()
            .map(sanitize_text_field)
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| request.topic.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct ScoreForm {
    pub text: String,
    pub keyword: Option<String>,
}

/// Rough token budget for a word count: HTML markup and non-English text
/// both run well above one token per word.
fn max_tokens_for(words: u32) -> u32 {
    (words * 2).clamp(256, 4096)
}

// ── Options ───────────────────────────────────────────

#[get("/copywriter/options")]
pub fn options(_user: WriterUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    let content_types: Vec<Value> = ContentType::ALL
        .iter()
        .map(|ct| json!({"slug": ct.slug(), "label": ct.label()}))
        .collect();
    let mut voices: Vec<Value> = prompts::VOICE_DESCRIPTORS
        .iter()
        .map(|(slug, desc)| json!({"slug": slug, "description": desc}))
        .collect();
    if let Some(bv) = BrandVoice::load(&**store.inner()) {
        voices.push(json!({"slug": LEARNED_VOICE, "description": bv.analysis}));
    }

    Json(json!({
        "ok": true,
        "content_types": content_types,
        "voices": voices,
        "default_voice": store.option_get_or("brain_default_voice", "professional"),
        "default_target_length": DEFAULT_TARGET_LENGTH,
        "optimal_seo_length": OPTIMAL_SEO_LENGTH,
        "phi": PHI,
    }))
}

// ── Generate ──────────────────────────────────────────

#[post("/copywriter/generate", format = "json", data = "<body>")]
pub async fn generate(
    user: WriterUser,
    _nonce: VerifiedNonce,
    store: &State<Arc<dyn Store>>,
    generator: &State<Arc<dyn TextGenerator>>,
    limiter: &State<RateLimiter>,
    body: Json<CopyForm>,
) -> Result<Json<Value>, Status> {
    let request = match body.to_copy_request(&**store.inner()) {
        Ok(r) => r,
        Err(e) => return Ok(Json(json!({"ok": false, "error": e}))),
    };
    if !ai_rate_allowed(&**store.inner(), limiter, "generate", user.user.id) {
        return Err(Status::TooManyRequests);
    }

    let keyword = body.keyword(&request);
    let options = generation_options(
        &**store.inner(),
        prompts::copywriter_system(),
        max_tokens_for(request.target_length),
    );

    let result = generate_blocking(Arc::clone(generator.inner()), move |gen| {
        copywriter::generate_copy(gen, &request, &keyword, &options)
    })
    .await;

    match result {
        Ok(copy) => Ok(Json(json!({
            "ok": true,
            "text": copy.text,
            "score": copy.score,
            "tips": copy.tips,
        }))),
        Err(e) => {
            log::error!("[copywriter] generation failed for user {}: {}", user.user.id, e);
            Ok(Json(json!({"ok": false, "error": GENERIC_AI_ERROR})))
        }
    }
}

// ── Prompt Preview ────────────────────────────────────

#[post("/copywriter/prompt", format = "json", data = "<body>")]
pub fn preview_prompt(
    _user: WriterUser,
    _nonce: VerifiedNonce,
    store: &State<Arc<dyn Store>>,
    body: Json<CopyForm>,
) -> Json<Value> {
    match body.to_copy_request(&**store.inner()) {
        Ok(request) => Json(json!({
            "ok": true,
            "prompt": copywriter::build_prompt(&request),
            "content_type": request.content_type.slug(),
        })),
        Err(e) => Json(json!({"ok": false, "error": e})),
    }
}

// ── Score ─────────────────────────────────────────────

#[post("/copywriter/score", format = "json", data = "<body>")]
pub fn score(_user: WriterUser, _nonce: VerifiedNonce, body: Json<ScoreForm>) -> Json<Value> {
    let keyword = body.keyword.as_deref().map(sanitize_text_field).unwrap_or_default();
    let report = copywriter::score_content(&body.text, &keyword);
    Json(json!({
        "ok": true,
        "score": report.score,
        "tips": report.tips,
    }))
}
