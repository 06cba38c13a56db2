use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::store::Store;

pub const NOTES_OPTION: &str = "brain_notes";
pub const MAX_NOTE_CHARS: usize = 2000;
pub const NOT_NOTE_AUTHOR: &str = "You can only delete your own notes";

/// A free-text note left on the dashboard. Notes are a growing log stored
/// as one JSON array option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub author_id: i64,
    pub author_name: String,
    pub text: String,
    pub created_at: String,
}

impl Note {
    /// All notes, oldest first. A corrupt log reads as empty here; writers
    /// refuse to touch it instead.
    pub fn list(store: &dyn Store) -> Vec<Note> {
        Self::parse(store.option_get(NOTES_OPTION).as_deref()).unwrap_or_else(|e| {
            log::error!("[notes] {}", e);
            Vec::new()
        })
    }

    fn parse(raw: Option<&str>) -> Result<Vec<Note>, String> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Vec::new()),
            Some(json) => serde_json::from_str(json)
                .map_err(|e| format!("stored notes are not valid JSON: {}", e)),
        }
    }

    fn encode(notes: &[Note]) -> Result<String, String> {
        serde_json::to_string(notes).map_err(|e| e.to_string())
    }

    /// Append a note. Text is trimmed, must be non-empty and is capped at
    /// `MAX_NOTE_CHARS` characters.
    pub fn append(store: &dyn Store, author: &User, text: &str) -> Result<Note, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("Note text is required".into());
        }

        let note = Note {
            id: uuid::Uuid::new_v4().to_string(),
            author_id: author.id,
            author_name: author.greeting_name().to_string(),
            text: text.chars().take(MAX_NOTE_CHARS).collect(),
            created_at: Utc::now().to_rfc3339(),
        };

        store.option_modify(NOTES_OPTION, &mut |raw| {
            let mut notes = Self::parse(raw)?;
            notes.push(note.clone());
            Self::encode(&notes).map(Some)
        })?;
        Ok(note)
    }

    /// Remove a note. Only its author or an administrator may do so.
    /// Returns `Ok(false)` when no note has that id.
    pub fn delete(store: &dyn Store, actor: &User, id: &str) -> Result<bool, String> {
        let mut removed = false;
        store.option_modify(NOTES_OPTION, &mut |raw| {
            let mut notes = Self::parse(raw)?;
            let Some(pos) = notes.iter().position(|n| n.id == id) else {
                return Ok(None);
            };
            if notes[pos].author_id != actor.id && !actor.is_admin() {
                return Err(NOT_NOTE_AUTHOR.into());
            }
            notes.remove(pos);
            removed = true;
            Self::encode(&notes).map(Some)
        })?;
        Ok(removed)
    }
}
