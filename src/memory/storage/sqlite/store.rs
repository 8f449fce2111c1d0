// src/memory/storage/sqlite/store.rs

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::memory::core::error::StorageError;
use crate::memory::core::traits::MemoryStore;
use crate::memory::core::types::{
    ExchangePair, LongTermRecord, MemoryKind, IMPORTANCE_MAX, IMPORTANCE_MIN,
};

/// Hours an exchange stays eligible for conversational context.
const DEFAULT_TTL_HOURS: i64 = 24;

/// SQLite-backed memory store. The pool may be shared across concurrent
/// requests; each operation runs in its own statement/transaction scope.
pub struct SqliteMemoryStore {
    pub pool: SqlitePool,
    ttl: Duration,
}

impl SqliteMemoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_ttl_hours(pool, DEFAULT_TTL_HOURS)
    }

    pub fn with_ttl_hours(pool: SqlitePool, hours: i64) -> Self {
        Self {
            pool,
            ttl: Duration::hours(hours),
        }
    }

    /// Ensure the schema exists. Call before any other operation.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        super::migration::run_migrations(&self.pool).await
    }
}

#[async_trait]
impl MemoryStore for SqliteMemoryStore {
    async fn append_short_term(
        &self,
        user_id: i64,
        user_message: &str,
        bot_response: &str,
    ) -> Result<(), StorageError> {
        let created_at = Utc::now();
        let expires_at = created_at + self.ttl;

        sqlx::query(
            r#"
            INSERT INTO short_term_memories (
                user_id, user_message, bot_response, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(user_message)
        .bind(bot_response)
        .bind(created_at.naive_utc())
        .bind(expires_at.naive_utc())
        .execute(&self.pool)
        .await?;

        debug!("Saved short-term exchange for user {}", user_id);
        Ok(())
    }

    async fn fetch_active_short_term(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<ExchangePair>, StorageError> {
        let now = Utc::now();

        // Newest first internally; id breaks created_at ties so appends
        // stay ordered even within one timestamp tick.
        let rows = sqlx::query(
            r#"
            SELECT user_message, bot_response
            FROM short_term_memories
            WHERE user_id = ? AND expires_at > ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(now.naive_utc())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut pairs: Vec<ExchangePair> = rows
            .into_iter()
            .map(|row| ExchangePair {
                user: row.get("user_message"),
                assistant: row.get("bot_response"),
            })
            .collect();

        // Oldest first for conversational context.
        pairs.reverse();

        debug!(
            "Loaded {} active short-term exchanges for user {}",
            pairs.len(),
            user_id
        );
        Ok(pairs)
    }

    async fn purge_expired_short_term(&self) -> Result<u64, StorageError> {
        let now = Utc::now();

        // One DELETE statement: atomic, so concurrent reads never observe
        // a partially-swept state. Running twice back-to-back removes
        // nothing the second time.
        let removed = sqlx::query(
            r#"
            DELETE FROM short_term_memories WHERE expires_at < ?
            "#,
        )
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?
        .rows_affected();

        debug!("Purged {} expired short-term exchanges", removed);
        Ok(removed)
    }

    async fn append_long_term(
        &self,
        user_id: i64,
        server_id: Option<i64>,
        kind: MemoryKind,
        content: &str,
        importance: i64,
    ) -> Result<(), StorageError> {
        let importance = importance.clamp(IMPORTANCE_MIN, IMPORTANCE_MAX);

        sqlx::query(
            r#"
            INSERT INTO long_term_memories (
                user_id, server_id, memory_type, content, importance, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(server_id)
        .bind(kind.as_str())
        .bind(content)
        .bind(importance)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        debug!(
            "Saved long-term {} (importance {}) for user {}",
            kind, importance, user_id
        );
        Ok(())
    }

    async fn fetch_long_term(
        &self,
        user_id: i64,
        server_id: Option<i64>,
    ) -> Result<Vec<LongTermRecord>, StorageError> {
        // Global memories (NULL server) are visible in every server
        // context for the user.
        let rows = match server_id {
            Some(sid) => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, server_id, memory_type, content, importance, created_at
                    FROM long_term_memories
                    WHERE user_id = ? AND (server_id = ? OR server_id IS NULL)
                    ORDER BY created_at ASC
                    "#,
                )
                .bind(user_id)
                .bind(sid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, server_id, memory_type, content, importance, created_at
                    FROM long_term_memories
                    WHERE user_id = ?
                    ORDER BY created_at ASC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let records = rows
            .into_iter()
            .map(|row| {
                let kind: String = row.get("memory_type");
                let created_at: NaiveDateTime = row.get("created_at");
                LongTermRecord {
                    id: Some(row.get("id")),
                    user_id: row.get("user_id"),
                    server_id: row.get("server_id"),
                    kind: MemoryKind::parse_or_fact(&kind),
                    content: row.get("content"),
                    importance: row.get("importance"),
                    created_at: Utc.from_utc_datetime(&created_at),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Loaded {} long-term memories for user {} (server: {:?})",
            records.len(),
            user_id,
            server_id
        );
        Ok(records)
    }

    async fn delete_long_term(
        &self,
        user_id: i64,
        kind: Option<MemoryKind>,
    ) -> Result<u64, StorageError> {
        let removed = match kind {
            Some(kind) => {
                sqlx::query(
                    r#"
                    DELETE FROM long_term_memories WHERE user_id = ? AND memory_type = ?
                    "#,
                )
                .bind(user_id)
                .bind(kind.as_str())
                .execute(&self.pool)
                .await?
                .rows_affected()
            }
            None => {
                sqlx::query(
                    r#"
                    DELETE FROM long_term_memories WHERE user_id = ?
                    "#,
                )
                .bind(user_id)
                .execute(&self.pool)
                .await?
                .rows_affected()
            }
        };

        debug!(
            "Deleted {} long-term memories for user {} (kind: {:?})",
            removed, user_id, kind
        );
        Ok(removed)
    }
}
