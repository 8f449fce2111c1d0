// src/memory/storage/sqlite/migration.rs
//! Schema setup for the SQLite backend: ensures memory tables exist.
//! Run at startup, before any other store operation (idempotent).

use anyhow::Result;
use sqlx::{Executor, SqlitePool};

const CREATE_SHORT_TERM_MEMORIES: &str = r#"
CREATE TABLE IF NOT EXISTS short_term_memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    user_message TEXT NOT NULL,
    bot_response TEXT NOT NULL,
    created_at DATETIME NOT NULL,
    expires_at DATETIME NOT NULL
);
"#;

const CREATE_LONG_TERM_MEMORIES: &str = r#"
CREATE TABLE IF NOT EXISTS long_term_memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    server_id INTEGER,
    memory_type TEXT NOT NULL,
    content TEXT NOT NULL,
    importance INTEGER NOT NULL DEFAULT 1,
    created_at DATETIME NOT NULL
);
"#;

const CREATE_MEMORY_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_short_term_user ON short_term_memories(user_id);
CREATE INDEX IF NOT EXISTS idx_short_term_expiration ON short_term_memories(expires_at);
CREATE INDEX IF NOT EXISTS idx_long_term_user_server ON long_term_memories(user_id, server_id);
"#;

/// Runs all required migrations for the SQLite backend.
/// Safe to call at every startup (idempotent).
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_SHORT_TERM_MEMORIES).await?;
    pool.execute(CREATE_LONG_TERM_MEMORIES).await?;
    pool.execute(CREATE_MEMORY_INDICES).await?;
    Ok(())
}
