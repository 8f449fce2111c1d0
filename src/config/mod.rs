// src/config/mod.rs
// All values load from the environment (.env supported), with defaults.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct VigilConfig {
    // ── Database Configuration
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Short-Term Memory
    /// Hours an exchange stays eligible for conversational context.
    pub short_term_ttl_hours: i64,
    /// Exchanges pulled into the immediate conversation context.
    pub short_term_context_pairs: usize,
    /// Hours between cleanup sweeps of expired exchanges.
    pub cleanup_interval_hours: u64,

    // ── Recall
    pub recall_score_floor: f32,
    pub recall_top_k: usize,

    // ── Classifier Service
    pub anthropic_base_url: String,
    pub classifier_model: String,
    pub classifier_max_tokens: u32,
    pub classifier_timeout_secs: u64,
    pub classify_max_attempts: u32,
    pub classify_backoff_base_ms: u64,

    // ── Web Search Service
    pub search_base_url: String,
    pub search_model: String,
    pub search_timeout_secs: u64,

    // ── Logging
    pub log_level: String,
}

/// Parse an env var, falling back to `default` when missing or malformed.
/// Values may carry trailing comments from .env files; those are stripped.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl VigilConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            database_url: env_var_or("DATABASE_URL", "sqlite:./vigil.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 5),
            short_term_ttl_hours: env_var_or("VIGIL_SHORT_TERM_TTL_HOURS", 24),
            short_term_context_pairs: env_var_or("VIGIL_SHORT_TERM_CONTEXT_PAIRS", 3),
            cleanup_interval_hours: env_var_or("VIGIL_CLEANUP_INTERVAL_HOURS", 24),
            recall_score_floor: env_var_or("VIGIL_RECALL_SCORE_FLOOR", 0.5),
            recall_top_k: env_var_or("VIGIL_RECALL_TOP_K", 2),
            anthropic_base_url: env_var_or(
                "ANTHROPIC_BASE_URL",
                "https://api.anthropic.com".to_string(),
            ),
            classifier_model: env_var_or(
                "VIGIL_CLASSIFIER_MODEL",
                "claude-3-5-haiku-latest".to_string(),
            ),
            classifier_max_tokens: env_var_or("VIGIL_CLASSIFIER_MAX_TOKENS", 1024),
            classifier_timeout_secs: env_var_or("VIGIL_CLASSIFIER_TIMEOUT", 30),
            classify_max_attempts: env_var_or("VIGIL_CLASSIFY_MAX_ATTEMPTS", 3),
            classify_backoff_base_ms: env_var_or("VIGIL_CLASSIFY_BACKOFF_BASE_MS", 1000),
            search_base_url: env_var_or(
                "SEARCH_BASE_URL",
                "https://api.perplexity.ai".to_string(),
            ),
            search_model: env_var_or("VIGIL_SEARCH_MODEL", "sonar".to_string()),
            search_timeout_secs: env_var_or("VIGIL_SEARCH_TIMEOUT", 30),
            log_level: env_var_or("VIGIL_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<VigilConfig> = Lazy::new(VigilConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_or_uses_default_for_missing_key() {
        let value: u64 = env_var_or("VIGIL_TEST_DOES_NOT_EXIST", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn env_var_or_strips_inline_comments() {
        unsafe { std::env::set_var("VIGIL_TEST_COMMENTED", "7 # sweep hours") };
        let value: u64 = env_var_or("VIGIL_TEST_COMMENTED", 0);
        assert_eq!(value, 7);
        unsafe { std::env::remove_var("VIGIL_TEST_COMMENTED") };
    }
}
