use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use std::sync::Arc;

use crate::greeting::greet;
use crate::models::note::{Note, NOT_NOTE_AUTHOR};
use crate::security::auth::{AuthenticatedUser, VerifiedNonce};
use crate::store::Store;

use super::sanitize_textarea;

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub text: Option<String>,
}

#[get("/greeting")]
pub fn greeting(user: AuthenticatedUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    let tz = store.option_get_or("brain_site_timezone", "UTC");
    let g = greet(user.user.greeting_name(), Utc::now(), &tz);
    Json(json!({
        "ok": true,
        "message": g.message,
        "bucket": g.bucket,
        "hour": g.hour,
        "timezone": g.timezone,
    }))
}

// ── Notes ─────────────────────────────────────────────

#[get("/notes")]
pub fn notes_list(_user: AuthenticatedUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    let notes = Note::list(&**store.inner());
    Json(json!({"ok": true, "notes": notes}))
}

#[post("/notes", format = "json", data = "<body>")]
pub fn notes_add(
    user: AuthenticatedUser,
    _nonce: VerifiedNonce,
    store: &State<Arc<dyn Store>>,
    body: Json<NoteForm>,
) -> Json<Value> {
    let text = sanitize_textarea(body.text.as_deref().unwrap_or(""));
    match Note::append(&**store.inner(), &user.user, &text) {
        Ok(note) => Json(json!({"ok": true, "note": note})),
        Err(e) => {
            log::warn!("[notes] append by user {} failed: {}", user.user.id, e);
            Json(json!({"ok": false, "error": e}))
        }
    }
}

#[delete("/notes/<id>")]
pub fn notes_delete(
    user: AuthenticatedUser,
    _nonce: VerifiedNonce,
    store: &State<Arc<dyn Store>>,
    id: &str,
) -> Result<Json<Value>, Status> {
    match Note::delete(&**store.inner(), &user.user, id) {
        Ok(true) => Ok(Json(json!({"ok": true}))),
        Ok(false) => Err(Status::NotFound),
        Err(e) if e == NOT_NOTE_AUTHOR => {
            log::warn!("[notes] user {} may not delete {}", user.user.id, id);
            Err(Status::Forbidden)
        }
        Err(e) => {
            log::error!("[notes] {}", e);
            Err(Status::InternalServerError)
        }
    }
}
