// src/memory/core/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Importance bounds for long-term memories.
pub const IMPORTANCE_MIN: i64 = 1;
pub const IMPORTANCE_MAX: i64 = 5;

/// What kind of long-term memory a statement is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Preference,
    Fact,
}

impl MemoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::Preference => "preference",
            MemoryKind::Fact => "fact",
        }
    }

    /// Lenient parse for values coming back from storage or the
    /// classifier; anything unrecognized collapses to `Fact`.
    pub fn parse_or_fact(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "preference" => MemoryKind::Preference,
            _ => MemoryKind::Fact,
        }
    }
}

impl std::fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stored conversation exchange, eligible for context until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermRecord {
    pub id: Option<i64>,
    pub user_id: i64,
    pub user_message: String,
    pub bot_response: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A durable fact or preference extracted from user input. Never
/// auto-expires; removed only by explicit user-scoped deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTermRecord {
    pub id: Option<i64>,
    pub user_id: i64,
    /// `None` means global: visible in every server context for the user.
    pub server_id: Option<i64>,
    pub kind: MemoryKind,
    pub content: String,
    pub importance: i64,
    pub created_at: DateTime<Utc>,
}

/// One {user, assistant} turn pair handed to the generator as history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangePair {
    pub user: String,
    pub assistant: String,
}

/// Combined memory context for one inbound query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMemory {
    /// Recent exchanges, oldest first.
    pub short_term: Vec<ExchangePair>,
    /// Recalled long-term context strings, most relevant first.
    pub long_term: Vec<String>,
}

/// Candidate surviving the score stage of recall. The ranking key is the
/// raw [0,1] relevance score multiplied by importance (1-5) and is left
/// unnormalized; selection only depends on relative order.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub ranking_key: f32,
    pub content: String,
}

/// Strict classification payload, validated and clamped at the adapter
/// boundary. Invalid classifier replies never escape as parse errors;
/// they collapse to `Classification::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub importance: i64,
}

impl Classification {
    pub fn new(kind: MemoryKind, importance: i64) -> Self {
        Self {
            kind,
            importance: importance.clamp(IMPORTANCE_MIN, IMPORTANCE_MAX),
        }
    }

    /// Clamp importance into [1, 5].
    pub fn clamped(mut self) -> Self {
        self.importance = self.importance.clamp(IMPORTANCE_MIN, IMPORTANCE_MAX);
        self
    }
}

impl Default for Classification {
    /// Conservative fallback: lowest-importance fact.
    fn default() -> Self {
        Self {
            kind: MemoryKind::Fact,
            importance: IMPORTANCE_MIN,
        }
    }
}
