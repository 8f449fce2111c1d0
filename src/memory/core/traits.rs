// src/memory/core/traits.rs

//! Core traits for the memory engine's seams: storage backends and the
//! external text-judgment service. All persistence and classification
//! goes through these — no direct DB or HTTP calls in business logic.

use async_trait::async_trait;

use super::error::StorageError;
use super::types::{Classification, ExchangePair, LongTermRecord, MemoryKind};

/// Trait for any durable memory backend. SQLite is the shipped
/// implementation; anything satisfying these operations is substitutable.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Persist one exchange; it expires a fixed TTL after creation.
    async fn append_short_term(
        &self,
        user_id: i64,
        user_message: &str,
        bot_response: &str,
    ) -> Result<(), StorageError>;

    /// The most recent `limit` unexpired exchanges for a user, returned
    /// oldest-first for conversational context.
    async fn fetch_active_short_term(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<ExchangePair>, StorageError>;

    /// Delete every expired exchange. Idempotent; safe to run
    /// concurrently with reads.
    async fn purge_expired_short_term(&self) -> Result<u64, StorageError>;

    /// Persist a long-term memory. Importance is clamped to [1, 5].
    async fn append_long_term(
        &self,
        user_id: i64,
        server_id: Option<i64>,
        kind: MemoryKind,
        content: &str,
        importance: i64,
    ) -> Result<(), StorageError>;

    /// All long-term memories for a user visible in `server_id` context:
    /// rows matching that server plus global (NULL server) rows. With no
    /// server context, everything the user has stored.
    async fn fetch_long_term(
        &self,
        user_id: i64,
        server_id: Option<i64>,
    ) -> Result<Vec<LongTermRecord>, StorageError>;

    /// Delete a user's long-term memories, optionally one kind only.
    async fn delete_long_term(
        &self,
        user_id: i64,
        kind: Option<MemoryKind>,
    ) -> Result<u64, StorageError>;
}

/// Trait for the external text-judgment service. Every method is
/// infallible at this surface: transport and parse failures are absorbed
/// into conservative defaults inside the implementation, because recall
/// and classification are best-effort enhancements.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Does this query need long-term memory recall? Default: no.
    async fn needs_recall(&self, query: &str) -> bool;

    /// Second-stage double check: is this memory relevant to the query
    /// in context? Default: no.
    async fn confirm_relevance(&self, memory: &str, query: &str) -> bool;

    /// Should this user statement be remembered long-term? Default: no.
    async fn should_remember(&self, content: &str) -> bool;

    /// Does this query need a web search instead of memory? Default: no.
    async fn should_search(&self, query: &str) -> bool;

    /// Classify a statement into {kind, importance}. Retries transient
    /// failures, then falls back to the lowest-importance fact.
    async fn classify(&self, content: &str) -> Classification;

    /// Relevance of `memory` to `query` in [0, 1]. Default: 0.0.
    async fn score(&self, query: &str, memory: &str) -> f32;

    /// Compress recalled memories into one natural-language context
    /// string. Default: empty string (callers fall back to raw contents).
    async fn summarize(&self, memories: &[String], query: &str) -> String;
}
