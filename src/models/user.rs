use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

/// Roles in ascending privilege order. Capabilities are derived from the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Subscriber,
    Contributor,
    Author,
    Editor,
    Administrator,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "administrator" | "admin" => Some(Self::Administrator),
            "editor" => Some(Self::Editor),
            "author" => Some(Self::Author),
            "contributor" => Some(Self::Contributor),
            "subscriber" => Some(Self::Subscriber),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Editor => "editor",
            Self::Author => "author",
            Self::Contributor => "contributor",
            Self::Subscriber => "subscriber",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Write and generate content (contributor and above)
    EditPosts,
    /// Change plugin settings (administrator only)
    ManageOptions,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub display_name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    pub created_at: String,
}

impl User {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let role: String = row.get(3)?;
        Ok(User {
            id: row.get(0)?,
            login: row.get(1)?,
            display_name: row.get(2)?,
            // Unknown roles in the table get the least privilege
            role: Role::from_str(&role).unwrap_or(Role::Subscriber),
            api_key_hash: row.get(4)?,
            created_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        })
    }

    const SELECT_COLS: &'static str = "id, login, display_name, role, api_key_hash, created_at";

    // ── Capabilities ──

    pub fn can(&self, cap: Capability) -> bool {
        match cap {
            Capability::EditPosts => self.role >= Role::Contributor,
            Capability::ManageOptions => self.role == Role::Administrator,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.can(Capability::ManageOptions)
    }

    /// Name used in greetings: display name, falling back to login.
    pub fn greeting_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            self.login.as_str()
        } else {
            self.display_name.trim()
        }
    }

    // ── Lookups ──

    pub fn get_by_id(pool: &DbPool, id: i64) -> Option<User> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", Self::SELECT_COLS),
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn get_by_api_key_hash(pool: &DbPool, hash: &str) -> Option<User> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!("SELECT {} FROM users WHERE api_key_hash = ?1", Self::SELECT_COLS),
            params![hash],
            Self::from_row,
        )
        .ok()
    }

    pub fn list_all(pool: &DbPool) -> Vec<User> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY id ASC",
            Self::SELECT_COLS
        )) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn count(pool: &DbPool) -> i64 {
        pool.get()
            .ok()
            .and_then(|conn| {
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                    .ok()
            })
            .unwrap_or(0)
    }

    // ── Mutations ──

    pub fn create(
        pool: &DbPool,
        login: &str,
        display_name: &str,
        role: Role,
        api_key_hash: &str,
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO users (login, display_name, role, api_key_hash) VALUES (?1, ?2, ?3, ?4)",
            params![login, display_name, role.as_str(), api_key_hash],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }
}
