// src/memory/service.rs

//! Public façade for the memory engine. Inbound-event adapters extract
//! (user, server context, text) from their platform and call the two
//! entry points here; nothing below this layer knows platform vocabulary.

use std::sync::Arc;

use tracing::{debug, info};

use crate::llm::context::{self, ChatMessage};
use crate::memory::core::error::StorageError;
use crate::memory::core::traits::{Classifier, MemoryStore};
use crate::memory::core::types::{MemoryKind, UserMemory};
use crate::memory::recall::{RecallConfig, RecallPipeline};
use crate::persona::PersonaOverlay;

/// Exchanges pulled into the immediate conversation context.
const DEFAULT_CONTEXT_PAIRS: usize = 3;

/// Long-term writes store the user's words as a direct statement, which
/// keeps them eligible for recall (bot-voiced interpretations are not).
const USER_STATEMENT_PREFIX: &str = "User stated:";

pub struct ConversationManager {
    store: Arc<dyn MemoryStore>,
    classifier: Arc<dyn Classifier>,
    recall: RecallPipeline,
    persona: PersonaOverlay,
    context_pairs: usize,
}

impl ConversationManager {
    pub fn new(store: Arc<dyn MemoryStore>, classifier: Arc<dyn Classifier>) -> Self {
        Self::with_config(
            store,
            classifier,
            RecallConfig::default(),
            DEFAULT_CONTEXT_PAIRS,
        )
    }

    /// Wire a manager with tunables from the global config.
    pub fn from_config(store: Arc<dyn MemoryStore>, classifier: Arc<dyn Classifier>) -> Self {
        let config = &crate::config::CONFIG;
        Self::with_config(
            store,
            classifier,
            RecallConfig {
                score_floor: config.recall_score_floor,
                top_k: config.recall_top_k,
            },
            config.short_term_context_pairs,
        )
    }

    pub fn with_config(
        store: Arc<dyn MemoryStore>,
        classifier: Arc<dyn Classifier>,
        recall_config: RecallConfig,
        context_pairs: usize,
    ) -> Self {
        let recall = RecallPipeline::with_config(store.clone(), classifier.clone(), recall_config);
        Self {
            store,
            classifier,
            recall,
            persona: PersonaOverlay::Default,
            context_pairs,
        }
    }

    /// Retrieve both short-term history and, when a query is given,
    /// recalled long-term context for a user. Only storage failures
    /// propagate; classifier trouble degrades to less context.
    pub async fn get_user_memory(
        &self,
        user_id: i64,
        server_id: Option<i64>,
        query: Option<&str>,
    ) -> Result<UserMemory, StorageError> {
        let short_term = self
            .store
            .fetch_active_short_term(user_id, self.context_pairs)
            .await?;

        let long_term = match query {
            Some(query) => self.recall.recall(user_id, server_id, query).await?,
            None => Vec::new(),
        };

        debug!(
            "Assembled memory for user {}: {} recent exchanges, {} recalled",
            user_id,
            short_term.len(),
            long_term.len()
        );

        Ok(UserMemory {
            short_term,
            long_term,
        })
    }

    /// Persist a finished exchange. Short-term always; long-term only
    /// when the judgment call says the statement is worth remembering.
    /// A classifier failure downgrades, never aborts: the short-term
    /// write has already committed by the time classification runs.
    pub async fn record_exchange(
        &self,
        user_id: i64,
        server_id: Option<i64>,
        user_message: &str,
        bot_response: &str,
    ) -> Result<(), StorageError> {
        self.store
            .append_short_term(user_id, user_message, bot_response)
            .await?;

        if !self.classifier.should_remember(user_message).await {
            return Ok(());
        }

        let content = format!("{USER_STATEMENT_PREFIX} {user_message}");
        let classification = self.classifier.classify(&content).await;

        // Keyword override: statements about favorites are always
        // preferences, and important ones.
        let (kind, importance) = if content.to_lowercase().contains("favorite") {
            (MemoryKind::Preference, classification.importance.max(4))
        } else {
            (classification.kind, classification.importance)
        };

        self.store
            .append_long_term(user_id, server_id, kind, &content, importance)
            .await?;

        info!(
            "Stored long-term {} (importance {}) for user {}",
            kind, importance, user_id
        );
        Ok(())
    }

    /// Delete a user's long-term memories, optionally one kind only.
    pub async fn forget_long_term(
        &self,
        user_id: i64,
        kind: Option<MemoryKind>,
    ) -> Result<u64, StorageError> {
        let removed = self.store.delete_long_term(user_id, kind).await?;
        info!(
            "Forgot {} long-term memories for user {} (kind: {:?})",
            removed, user_id, kind
        );
        Ok(removed)
    }

    /// Assemble the generator payload for a query: persona and recalled
    /// memories as the system prompt, recent exchanges as history.
    pub fn build_generation_context(
        &self,
        memory: &UserMemory,
        query: &str,
    ) -> (String, Vec<ChatMessage>) {
        context::build_generation_context(self.persona.prompt(), memory, query)
    }

    /// In-character reply for an exchange that failed outright.
    pub fn apology(&self) -> &'static str {
        self.persona.apology()
    }
}
