// src/memory/mod.rs
//! Memory lifecycle engine:
//! - Core: types, traits, and the storage error boundary
//! - Storage: SQLite backend
//! - Recall: relevance pipeline over long-term memories
//! - Cleanup: background expiry sweep for short-term memories
//! - Service: the conversation-manager façade

pub mod cleanup_scheduler;
pub mod core;
pub mod recall;
pub mod service;
pub mod storage;

pub use self::core::error::StorageError;
pub use self::core::traits::{Classifier, MemoryStore};
pub use self::core::types::*;
pub use self::recall::{RecallConfig, RecallPipeline};
pub use self::service::ConversationManager;
pub use self::storage::sqlite::SqliteMemoryStore;
