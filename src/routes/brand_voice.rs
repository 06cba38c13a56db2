use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use std::sync::Arc;

use crate::ai::TextGenerator;
use crate::copywriter::prompts;
use crate::models::brand_voice::BrandVoice;
use crate::rate_limit::RateLimiter;
use crate::security::auth::{VerifiedNonce, WriterUser};
use crate::store::Store;

use super::{ai_rate_allowed, generate_blocking, generation_options, sanitize_textarea, GENERIC_AI_ERROR};

const ANALYSIS_MAX_TOKENS: u32 = 512;

#[derive(Debug, Deserialize)]
pub struct LearnForm {
    pub sample: Option<String>,
}

#[get("/brand-voice")]
pub fn current(_user: WriterUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    match BrandVoice::load(&**store.inner()) {
        Some(bv) => Json(json!({"ok": true, "brand_voice": bv})),
        None => Json(json!({"ok": true, "brand_voice": null})),
    }
}

#[post("/brand-voice/learn", format = "json", data = "<body>")]
pub async fn learn(
    user: WriterUser,
    _nonce: VerifiedNonce,
    store: &State<Arc<dyn Store>>,
    generator: &State<Arc<dyn TextGenerator>>,
    limiter: &State<RateLimiter>,
    body: Json<LearnForm>,
) -> Result<Json<Value>, Status> {
    let sample = sanitize_textarea(body.sample.as_deref().unwrap_or(""));
    if sample.is_empty() {
        return Ok(Json(json!({"ok": false, "error": "Brand voice sample is required"})));
    }
    if !ai_rate_allowed(&**store.inner(), limiter, "brand_voice", user.user.id) {
        return Err(Status::TooManyRequests);
    }

    let options = generation_options(
        &**store.inner(),
        prompts::brand_voice_system(),
        ANALYSIS_MAX_TOKENS,
    );
    let prompt = prompts::analyze_brand_voice(&sample);
    let analysis = generate_blocking(Arc::clone(generator.inner()), move |gen| {
        gen.generate(&prompt, &options)
    })
    .await;

    let analysis = match analysis {
        Ok(a) if !a.trim().is_empty() => a,
        Ok(_) => {
            log::error!("[brand-voice] AI returned an empty analysis");
            return Ok(Json(json!({"ok": false, "error": GENERIC_AI_ERROR})));
        }
        Err(e) => {
            log::error!("[brand-voice] analysis failed for user {}: {}", user.user.id, e);
            return Ok(Json(json!({"ok": false, "error": GENERIC_AI_ERROR})));
        }
    };

    let voice = BrandVoice::new(&analysis, &sample, user.user.id);
    if let Err(e) = voice.save(&**store.inner()) {
        log::error!("[brand-voice] {}", e);
        return Err(Status::InternalServerError);
    }
    log::info!("[brand-voice] learned by user {}", user.user.id);

    Ok(Json(json!({"ok": true, "brand_voice": voice})))
}
