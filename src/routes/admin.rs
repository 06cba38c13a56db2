use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use std::collections::HashMap;
use std::sync::Arc;

use crate::ai;
use crate::models::user::Role;
use crate::rate_limit::RateLimiter;
use crate::security::auth::{hash_api_key, AdminUser, AuthenticatedUser, VerifiedNonce, WriterUser};
use crate::security::nonce::{self, BRAIN_ACTION, NONCE_HEADER};
use crate::security::generate_api_key;
use crate::store::Store;

use super::{ai_rate_remaining, sanitize_text_field};

/// Prefixes an administrator may write through the settings endpoint.
const SETTINGS_PREFIXES: [&str; 2] = ["ai_", "brain_"];

/// Options with their own endpoints; never written through settings.
const MANAGED_KEYS: [&str; 2] = ["brain_notes", "brain_brand_voice"];

fn is_writable_setting(key: &str) -> bool {
    SETTINGS_PREFIXES.iter().any(|p| key.starts_with(p)) && !MANAGED_KEYS.contains(&key)
}

fn is_secret(key: &str) -> bool {
    key.ends_with("_api_key")
}

/// Show only the last four characters of a secret.
fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let tail: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}

// ── Nonce ─────────────────────────────────────────────

#[get("/nonce")]
pub fn issue_nonce(user: AuthenticatedUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "nonce": nonce::create(&**store.inner(), BRAIN_ACTION, user.user.id),
        "header": NONCE_HEADER,
    }))
}

// ── AI Status ─────────────────────────────────────────

#[get("/ai/status")]
pub fn ai_status(
    user: WriterUser,
    store: &State<Arc<dyn Store>>,
    limiter: &State<RateLimiter>,
) -> Json<Value> {
    let providers: Vec<Value> = ai::provider_flags(&**store.inner())
        .into_iter()
        .map(|(name, enabled)| json!({"name": name, "enabled": enabled}))
        .collect();
    Json(json!({
        "ok": true,
        "enabled": ai::is_enabled(&**store.inner()),
        "providers": providers,
        "remaining": {
            "generate": ai_rate_remaining(&**store.inner(), limiter, "generate", user.user.id),
            "brand_voice": ai_rate_remaining(&**store.inner(), limiter, "brand_voice", user.user.id),
        },
    }))
}

// ── Settings ──────────────────────────────────────────

#[get("/settings")]
pub fn settings_get(_admin: AdminUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    let mut settings: HashMap<String, String> = HashMap::new();
    for prefix in SETTINGS_PREFIXES {
        for (key, value) in store.option_get_group(prefix) {
            if !is_writable_setting(&key) {
                continue;
            }
            let value = if is_secret(&key) { mask_secret(&value) } else { value };
            settings.insert(key, value);
        }
    }
    Json(json!({"ok": true, "settings": settings}))
}

#[post("/settings", format = "json", data = "<body>")]
pub fn settings_save(
    admin: AdminUser,
    _nonce: VerifiedNonce,
    store: &State<Arc<dyn Store>>,
    body: Json<HashMap<String, String>>,
) -> Result<Json<Value>, Status> {
    let data = body.into_inner();

    // (enable_key, human_name, required fields)
    let rules: [(&str, &str, &[&str]); 3] = [
        ("ai_ollama_enabled", "Ollama", &["ai_ollama_url", "ai_ollama_model"]),
        ("ai_openai_enabled", "OpenAI", &["ai_openai_api_key"]),
        ("ai_gemini_enabled", "Gemini", &["ai_gemini_api_key"]),
    ];

    // A field satisfies a rule when it is submitted non-empty or already stored
    let present = |key: &str| match data.get(key) {
        Some(v) => !v.trim().is_empty(),
        None => !store.option_get_or(key, "").trim().is_empty(),
    };

    let mut errors: Vec<String> = Vec::new();
    for key in data.keys() {
        if !is_writable_setting(key) {
            errors.push(format!("Unknown setting: {}", key));
        }
    }
    for (enable_key, name, required) in &rules {
        if data.get(*enable_key).map(|v| v.as_str()) == Some("true")
            && !required.iter().all(|f| present(f))
        {
            errors.push(format!("{}: please fill in all required fields before enabling", name));
        }
    }
    if let Some(limit) = data.get("brain_generate_rate_limit") {
        if limit.trim().parse::<u64>().map(|n| n == 0).unwrap_or(true) {
            errors.push("Generation rate limit must be a positive number".to_string());
        }
    }
    if let Some(tz) = data.get("brain_site_timezone") {
        if tz.trim().parse::<chrono_tz::Tz>().is_err() {
            errors.push(format!("Unknown timezone: {}", tz.trim()));
        }
    }
    if !errors.is_empty() {
        return Ok(Json(json!({"ok": false, "errors": errors})));
    }

    let mut changes: HashMap<String, String> = HashMap::new();
    for (key, value) in data {
        // Masked secrets echoed back by the client are left unchanged
        if is_secret(&key) && value.starts_with("****") {
            continue;
        }
        let value = if is_secret(&key) {
            value.trim().to_string()
        } else {
            sanitize_text_field(&value)
        };
        changes.insert(key, value);
    }

    store.option_set_many(&changes).map_err(|e| {
        log::error!("[settings] save failed: {}", e);
        Status::InternalServerError
    })?;
    log::info!("[settings] {} keys updated by user {}", changes.len(), admin.user.id);

    Ok(Json(json!({"ok": true, "updated": changes.len()})))
}

// ── Users ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub login: String,
    pub display_name: Option<String>,
    pub role: Option<String>,
}

#[get("/users")]
pub fn users_list(_admin: AdminUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    Json(json!({"ok": true, "users": store.user_list_all()}))
}

/// Create an API user. The plain key is returned once and only its hash is stored.
#[post("/users", format = "json", data = "<body>")]
pub fn users_create(
    admin: AdminUser,
    _nonce: VerifiedNonce,
    store: &State<Arc<dyn Store>>,
    body: Json<UserForm>,
) -> Json<Value> {
    let login = sanitize_text_field(&body.login).to_lowercase();
    if login.is_empty() || login.contains(' ') {
        return Json(json!({"ok": false, "error": "Login is required and may not contain spaces"}));
    }
    let role = match body.role.as_deref() {
        None => Role::Contributor,
        Some(r) => match Role::from_str(r) {
            Some(role) => role,
            None => return Json(json!({"ok": false, "error": format!("Unknown role: {}", r)})),
        },
    };
    let display_name = sanitize_text_field(body.display_name.as_deref().unwrap_or(""));

    let api_key = generate_api_key();
    match store.user_create(&login, &display_name, role, &hash_api_key(&api_key)) {
        Ok(id) => {
            log::info!("[users] {} created '{}' as {}", admin.user.id, login, role.as_str());
            Json(json!({
                "ok": true,
                "id": id,
                "login": login,
                "role": role,
                "api_key": api_key,
            }))
        }
        Err(e) => {
            log::warn!("[users] could not create '{}': {}", login, e);
            Json(json!({"ok": false, "error": "Login already exists"}))
        }
    }
}
