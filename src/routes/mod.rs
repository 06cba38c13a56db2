pub mod admin;
pub mod brand_voice;
pub mod copywriter;
pub mod greeting;

use std::sync::Arc;
use std::time::Duration;

use crate::ai::{AiError, GenerationOptions, TextGenerator};
use crate::rate_limit::RateLimiter;
use crate::store::Store;

/// Shown to users whenever the AI collaborator fails; details go to the log.
pub const GENERIC_AI_ERROR: &str = "Content generation failed. Please try again.";

const AI_RATE_WINDOW: Duration = Duration::from_secs(3600);

// ── Helpers ───────────────────────────────────────────

/// Temperature from `ai_temperature`, clamped to a sane range.
pub fn generation_options(store: &dyn Store, system: String, max_tokens: u32) -> GenerationOptions {
    let temperature = store.option_get_f64("ai_temperature", 0.7).clamp(0.0, 2.0) as f32;
    GenerationOptions {
        system,
        max_tokens,
        temperature,
    }
}

fn ai_rate_max(store: &dyn Store) -> u64 {
    store.option_get_i64("brain_generate_rate_limit", 20).max(1) as u64
}

/// Per-user hourly limit for AI-backed endpoints (`brain_generate_rate_limit`).
pub fn ai_rate_allowed(store: &dyn Store, limiter: &RateLimiter, bucket: &str, user_id: i64) -> bool {
    let max = ai_rate_max(store);
    let allowed = limiter.check_and_record(&format!("{}:{}", bucket, user_id), max, AI_RATE_WINDOW);
    if !allowed {
        log::warn!("[rate-limit] {} limit reached for user {}", bucket, user_id);
    }
    allowed
}

/// Calls left in the current window for `bucket`.
pub fn ai_rate_remaining(store: &dyn Store, limiter: &RateLimiter, bucket: &str, user_id: i64) -> u64 {
    limiter.remaining(&format!("{}:{}", bucket, user_id), ai_rate_max(store), AI_RATE_WINDOW)
}

/// Run a blocking generation off the async workers.
pub async fn generate_blocking<T, F>(generator: Arc<dyn TextGenerator>, job: F) -> Result<T, AiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn TextGenerator) -> Result<T, AiError> + Send + 'static,
{
    rocket::tokio::task::spawn_blocking(move || job(generator.as_ref()))
        .await
        .map_err(|e| AiError(format!("generation task failed: {}", e)))?
}

/// Single-line text input: tags stripped, control chars dropped, trimmed.
pub fn sanitize_text_field(input: &str) -> String {
    strip_tags(input)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Multi-line text input: like `sanitize_text_field` but keeps line breaks.
pub fn sanitize_textarea(input: &str) -> String {
    strip_tags(input)
        .replace("\r\n", "\n")
        .lines()
        .map(|line| {
            line.chars()
                .filter(|c| !c.is_control())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}

// ── Route Registration ────────────────────────────────

pub fn routes() -> Vec<rocket::Route> {
    routes![
        admin::issue_nonce,
        admin::ai_status,
        admin::settings_get,
        admin::settings_save,
        admin::users_list,
        admin::users_create,
        copywriter::options,
        copywriter::generate,
        copywriter::preview_prompt,
        copywriter::score,
        brand_voice::current,
        brand_voice::learn,
        greeting::greeting,
        greeting::notes_list,
        greeting::notes_add,
        greeting::notes_delete,
    ]
}
