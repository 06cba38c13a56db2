use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

use crate::db;
use crate::models::user::Role;
use crate::security::auth::hash_api_key;
use crate::security::generate_api_key;
use crate::store::sqlite::SqliteStore;
use crate::store::Store;

/// Login of the administrator created on first boot.
const BOOTSTRAP_LOGIN: &str = "admin";

/// Open the store, apply migrations and defaults, and make sure an
/// administrator exists. Any failure here is fatal.
pub fn run() -> Arc<dyn Store> {
    info!("Brain boot check starting...");

    let path = db::db_path();
    if let Err(e) = ensure_parent_dir(&path) {
        error!("  FAILED to create database directory for {}: {}", path, e);
        process::exit(1);
    }

    let store = match SqliteStore::new_at(&path) {
        Ok(s) => s,
        Err(e) => {
            error!("  FAILED to open database {}: {}", path, e);
            process::exit(1);
        }
    };
    if let Err(e) = store.run_migrations() {
        error!("  Database migrations failed: {}", e);
        process::exit(1);
    }
    if let Err(e) = store.seed_defaults() {
        error!("  Seeding default options failed: {}", e);
        process::exit(1);
    }

    if let Err(e) = bootstrap_admin(&store, std::env::var("KAFANEK_ADMIN_KEY").ok()) {
        error!("  Could not create the administrator: {}", e);
        process::exit(1);
    }

    info!("Boot check passed. Database: {}", path);
    Arc::new(store)
}

fn ensure_parent_dir(path: &str) -> std::io::Result<()> {
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            fs::create_dir_all(dir)?;
            info!("  Created directory: {}", dir.display());
            Ok(())
        }
        _ => Ok(()),
    }
}

/// With no users yet, create an administrator keyed by `preset_key`, or by a
/// fresh key that is logged once. Returns the key used, if one was created.
pub fn bootstrap_admin(store: &dyn Store, preset_key: Option<String>) -> Result<Option<String>, String> {
    if store.user_count() > 0 {
        return Ok(None);
    }

    let (key, generated) = match preset_key.map(|k| k.trim().to_string()) {
        Some(k) if !k.is_empty() => (k, false),
        _ => (generate_api_key(), true),
    };
    store.user_create(
        BOOTSTRAP_LOGIN,
        "Administrator",
        Role::Administrator,
        &hash_api_key(&key),
    )?;

    if generated {
        warn!("  Created administrator '{}' with API key: {}", BOOTSTRAP_LOGIN, key);
        warn!("  Store this key now; it is not shown again.");
    } else {
        info!("  Created administrator '{}' from KAFANEK_ADMIN_KEY", BOOTSTRAP_LOGIN);
    }
    Ok(Some(key))
}
