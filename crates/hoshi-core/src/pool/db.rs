//! SQLite-backed store implementation.
//!
//! Handles connection, table provisioning, and timestamp helpers. Domain
//! CRUD lives in `notes` and `members`.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool as SqlxPool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::PoolError;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the bot database.
///
/// The database file lives under the XDG state directory,
/// `~/.local/state/hoshi/bot.db`, unless a path is given.
#[derive(Clone)]
pub struct Pool {
    pub(crate) pool: SqlxPool<Sqlite>,
}

impl Pool {
    /// Open (or create) the default bot database and provision tables.
    pub async fn open_default() -> Result<Self, PoolError> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("hoshi")?;
        let state_dir = xdg_dirs.get_state_home();
        tokio::fs::create_dir_all(&state_dir).await?;

        Self::open_at(state_dir.join("bot.db")).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self, PoolError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await?;
        let db = Pool { pool };
        db.build_tables().await?;
        Ok(db)
    }

    /// Provision the schema. Idempotent; also exposed through the CLI.
    pub async fn build_tables(&self) -> Result<(), PoolError> {
        // Notes are unique per (author, name) so a user can't shadow their
        // own note; members key on the Discord user id.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                name TEXT NOT NULL,
                content TEXT NOT NULL,
                author_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                UNIQUE(name, author_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS members (
                user_id INTEGER PRIMARY KEY,
                membership_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                code INTEGER NOT NULL,
                platform TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Current time as Unix seconds (for row timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<Pool, PoolError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = Pool { pool };
    db.build_tables().await?;
    Ok(db)
}
