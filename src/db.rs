use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const DEFAULT_DB_PATH: &str = "data/kafanek-brain.db";

/// Database path from `KAFANEK_DB_PATH`, falling back to `data/kafanek-brain.db`.
pub fn db_path() -> String {
    std::env::var("KAFANEK_DB_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
}

pub fn init_pool(path: &str) -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Options (key-value)
        CREATE TABLE IF NOT EXISTS options (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- API users
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            login TEXT UNIQUE NOT NULL,
            display_name TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL DEFAULT 'subscriber',
            api_key_hash TEXT UNIQUE NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_users_api_key ON users(api_key_hash);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    let defaults = vec![
        // AI providers
        ("ai_failover_chain", "ollama,openai,gemini"),
        ("ai_ollama_enabled", "false"),
        ("ai_ollama_url", "http://localhost:11434"),
        ("ai_ollama_model", ""),
        ("ai_openai_enabled", "false"),
        ("ai_openai_api_key", ""),
        ("ai_openai_model", "gpt-4o-mini"),
        ("ai_openai_base_url", ""),
        ("ai_gemini_enabled", "false"),
        ("ai_gemini_api_key", ""),
        ("ai_gemini_model", "gemini-1.5-flash"),
        ("ai_temperature", "0.7"),
        // Brain
        ("brain_site_timezone", "Europe/Prague"),
        ("brain_generate_rate_limit", "20"),
        ("brain_default_voice", "professional"),
        ("brain_notes", "[]"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO options (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    // Per-install salt for request nonces
    conn.execute(
        "INSERT OR IGNORE INTO options (key, value) VALUES ('nonce_salt', ?1)",
        params![crate::security::random_hex(32)],
    )?;

    Ok(())
}
