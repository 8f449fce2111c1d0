// src/memory/recall/pipeline.rs

//! Long-term memory recall: candidate retrieval, filtering, scoring,
//! ranking, and formatting for a single query.
//!
//! The pipeline is a two-stage filter (score threshold, then pairwise
//! confirmation): hallucinated recall is worse than no recall, so extra
//! classifier calls buy precision.

use std::sync::Arc;

use tracing::{debug, info};

use crate::memory::core::error::StorageError;
use crate::memory::core::traits::{Classifier, MemoryStore};
use crate::memory::core::types::ScoredCandidate;

/// Configuration for recall operations.
#[derive(Debug, Clone)]
pub struct RecallConfig {
    /// Raw relevance scores below this are discarded outright.
    pub score_floor: f32,
    /// Memories surfaced per query, after ranking.
    pub top_k: usize,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            score_floor: 0.5,
            top_k: 2,
        }
    }
}

/// Orchestrates recall for one query against a user's long-term store.
pub struct RecallPipeline {
    store: Arc<dyn MemoryStore>,
    classifier: Arc<dyn Classifier>,
    config: RecallConfig,
}

impl RecallPipeline {
    pub fn new(store: Arc<dyn MemoryStore>, classifier: Arc<dyn Classifier>) -> Self {
        Self::with_config(store, classifier, RecallConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn MemoryStore>,
        classifier: Arc<dyn Classifier>,
        config: RecallConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            config,
        }
    }

    /// Returns at most `top_k` context strings for the query, most
    /// relevant first. Empty when the query needs no recall or nothing
    /// survives filtering.
    pub async fn recall(
        &self,
        user_id: i64,
        server_id: Option<i64>,
        query: &str,
    ) -> Result<Vec<String>, StorageError> {
        if !self.classifier.needs_recall(query).await {
            debug!("Query needs no memory recall");
            return Ok(Vec::new());
        }

        let candidates = self.store.fetch_long_term(user_id, server_id).await?;
        debug!(
            "Recall considering {} long-term candidates for user {}",
            candidates.len(),
            user_id
        );

        // Score each eligible candidate; the ranking key is the raw
        // [0,1] score multiplied by importance (1-5), left unnormalized.
        let mut scored: Vec<ScoredCandidate> = Vec::new();
        for record in candidates {
            // Only direct user statements are eligible; skip contents
            // voiced as the bot's own interpretation.
            if is_bot_interpretation(&record.content) {
                continue;
            }

            let raw = self.classifier.score(query, &record.content).await;
            if raw < self.config.score_floor {
                continue;
            }

            scored.push(ScoredCandidate {
                ranking_key: raw * record.importance as f32,
                content: record.content,
            });
        }

        let top = rank_top_k(scored, self.config.top_k);

        // Pairwise double check on the survivors.
        let mut confirmed: Vec<String> = Vec::new();
        for candidate in top {
            if self
                .classifier
                .confirm_relevance(&candidate.content, query)
                .await
            {
                confirmed.push(candidate.content);
            }
        }

        if confirmed.is_empty() {
            return Ok(Vec::new());
        }

        info!("Recalled {} memories for user {}", confirmed.len(), user_id);

        // Compress into one natural-language context string when the
        // summarizer cooperates; otherwise hand back the raw contents.
        let summary = self.classifier.summarize(&confirmed, query).await;
        if summary.trim().is_empty() {
            Ok(confirmed)
        } else {
            Ok(vec![summary])
        }
    }
}

/// Heuristic: contents that quote the user back ("you said ...") are
/// bot-generated interpretations, not direct statements.
fn is_bot_interpretation(content: &str) -> bool {
    let lowered = content.to_lowercase();
    lowered.contains("you said") || lowered.contains("you mentioned")
}

/// Sort descending by ranking key and keep the best `k`.
fn rank_top_k(mut scored: Vec<ScoredCandidate>, k: usize) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| b.ranking_key.total_cmp(&a.ranking_key));
    scored.truncate(k);
    scored
}
