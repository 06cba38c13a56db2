use std::collections::HashMap;

use crate::models::user::{Role, User};

pub mod sqlite;

/// Unified data-access trait. Every option and user read/write goes through here.
/// Implementation: `SqliteStore` (wraps rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;
    fn seed_defaults(&self) -> Result<(), String>;

    // ── Options ─────────────────────────────────────────────────────
    fn option_get(&self, key: &str) -> Option<String>;
    fn option_get_or(&self, key: &str, default: &str) -> String {
        self.option_get(key).unwrap_or_else(|| default.to_string())
    }
    fn option_get_bool(&self, key: &str) -> bool {
        self.option_get(key)
            .map(|v| matches!(v.trim(), "true" | "1"))
            .unwrap_or(false)
    }
    /// Integer option; missing or unparsable values give `default`.
    fn option_get_i64(&self, key: &str, default: i64) -> i64 {
        self.option_get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
    /// Float option; missing or unparsable values give `default`.
    fn option_get_f64(&self, key: &str, default: f64) -> f64 {
        self.option_get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
    fn option_set(&self, key: &str, value: &str) -> Result<(), String>;
    /// Write an option, reporting success as a bool. Failures are logged.
    fn option_update(&self, key: &str, value: &str) -> bool {
        match self.option_set(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to update option {}: {}", key, e);
                false
            }
        }
    }
    fn option_set_many(&self, options: &HashMap<String, String>) -> Result<(), String>;
    fn option_get_group(&self, prefix: &str) -> HashMap<String, String>;
    fn option_all(&self) -> HashMap<String, String>;
    /// Atomic read-modify-write of one option. `f` receives the current
    /// value and returns the new one, or `None` to write nothing. Concurrent
    /// callers are serialized, so no update is lost.
    fn option_modify(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<Option<String>, String>,
    ) -> Result<(), String>;

    // ── Users ───────────────────────────────────────────────────────
    fn user_get_by_id(&self, id: i64) -> Option<User>;
    fn user_get_by_api_key(&self, api_key_hash: &str) -> Option<User>;
    fn user_list_all(&self) -> Vec<User>;
    fn user_count(&self) -> i64;
    fn user_create(
        &self,
        login: &str,
        display_name: &str,
        role: Role,
        api_key_hash: &str,
    ) -> Result<i64, String>;
}
