use std::collections::HashMap;
use std::sync::Mutex;

use crate::db::DbPool;
use crate::models::option::SiteOption;
use crate::models::user::{Role, User};

use super::Store;

/// SQLite-backed implementation of the Store trait.
/// Wraps the r2d2 connection pool and delegates to model methods.
pub struct SqliteStore {
    pub pool: DbPool,
    /// Serializes read-modify-write updates within this process.
    write_lock: Mutex<()>,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    pub fn new_at(path: &str) -> Result<Self, String> {
        let pool = crate::db::init_pool(path).map_err(|e| e.to_string())?;
        Ok(Self::new(pool))
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool).map_err(|e| e.to_string())
    }

    fn seed_defaults(&self) -> Result<(), String> {
        crate::db::seed_defaults(&self.pool).map_err(|e| e.to_string())
    }

    // ── Options ─────────────────────────────────────────────────────

    fn option_get(&self, key: &str) -> Option<String> {
        SiteOption::get(&self.pool, key)
    }

    fn option_set(&self, key: &str, value: &str) -> Result<(), String> {
        SiteOption::set(&self.pool, key, value)
    }

    fn option_set_many(&self, options: &HashMap<String, String>) -> Result<(), String> {
        SiteOption::set_many(&self.pool, options)
    }

    fn option_get_group(&self, prefix: &str) -> HashMap<String, String> {
        SiteOption::get_group(&self.pool, prefix)
    }

    fn option_all(&self) -> HashMap<String, String> {
        SiteOption::all(&self.pool)
    }

    fn option_modify(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<Option<String>, String>,
    ) -> Result<(), String> {
        // One writer per process; BEGIN IMMEDIATE orders writers across processes
        let _guard = match self.write_lock.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        SiteOption::modify(&self.pool, key, f)
    }

    // ── Users ───────────────────────────────────────────────────────

    fn user_get_by_id(&self, id: i64) -> Option<User> {
        User::get_by_id(&self.pool, id)
    }

    fn user_get_by_api_key(&self, api_key_hash: &str) -> Option<User> {
        User::get_by_api_key_hash(&self.pool, api_key_hash)
    }

    fn user_list_all(&self) -> Vec<User> {
        User::list_all(&self.pool)
    }

    fn user_count(&self) -> i64 {
        User::count(&self.pool)
    }

    fn user_create(
        &self,
        login: &str,
        display_name: &str,
        role: Role,
        api_key_hash: &str,
    ) -> Result<i64, String> {
        User::create(&self.pool, login, display_name, role, api_key_hash)
    }
}
