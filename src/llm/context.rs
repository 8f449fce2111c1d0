// src/llm/context.rs

//! Assembles the generator payload for one query: persona plus recalled
//! memories as the system prompt, recent exchanges as alternating turns,
//! then the query itself.

use serde::{Deserialize, Serialize};

use crate::memory::core::types::UserMemory;

/// Exchanges expanded into the message history. Anything older is
/// already covered by recall or irrelevant.
const HISTORY_PAIRS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Returns (system prompt, message history ending in the query).
pub fn build_generation_context(
    persona: &str,
    memory: &UserMemory,
    query: &str,
) -> (String, Vec<ChatMessage>) {
    let system = if memory.long_term.is_empty() {
        persona.to_string()
    } else {
        let listed = memory
            .long_term
            .iter()
            .map(|m| format!("- {m}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{persona}\nRelevant memories:\n{listed}")
    };

    let skip = memory.short_term.len().saturating_sub(HISTORY_PAIRS);
    let mut messages = Vec::with_capacity(HISTORY_PAIRS * 2 + 1);
    for pair in memory.short_term.iter().skip(skip) {
        messages.push(ChatMessage::user(pair.user.clone()));
        messages.push(ChatMessage::assistant(pair.assistant.clone()));
    }
    messages.push(ChatMessage::user(query));

    (system, messages)
}
