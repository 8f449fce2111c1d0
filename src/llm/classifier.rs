// src/llm/classifier.rs

//! Adapter between the memory engine and the external text-judgment
//! service. Every public method absorbs transport and parse failures
//! into a conservative default — recall and classification are
//! best-effort enhancements, never blocking failures.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::memory::core::traits::Classifier;
use crate::memory::core::types::{Classification, MemoryKind};

use super::client::AnthropicClient;
use super::prompts;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);
const BACKOFF_FACTOR: f64 = 1.5;

pub struct ClassifierAdapter {
    client: AnthropicClient,
    max_attempts: u32,
    backoff_base: Duration,
}

impl ClassifierAdapter {
    pub fn new(client: AnthropicClient) -> Self {
        Self::with_retry(client, DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE)
    }

    pub fn with_retry(client: AnthropicClient, max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            client,
            max_attempts,
            backoff_base,
        }
    }

    /// Adapter over the env-configured client, retry policy from the
    /// global config.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = &crate::config::CONFIG;
        Ok(Self::with_retry(
            AnthropicClient::from_env()?,
            config.classify_max_attempts,
            Duration::from_millis(config.classify_backoff_base_ms),
        ))
    }

    /// Shared yes/no judgment. Anything that is not a clear "yes" —
    /// including a failed call — counts as no.
    async fn judge(&self, prompt: &str) -> bool {
        match self.client.complete_prompt(prompt).await {
            Ok(text) => text.trim().to_lowercase().starts_with("yes"),
            Err(err) => {
                warn!("Judgment call failed, defaulting to no: {err:#}");
                false
            }
        }
    }
}

#[async_trait]
impl Classifier for ClassifierAdapter {
    async fn needs_recall(&self, query: &str) -> bool {
        self.judge(&prompts::needs_recall_prompt(query)).await
    }

    async fn confirm_relevance(&self, memory: &str, query: &str) -> bool {
        self.judge(&prompts::confirm_relevance_prompt(memory, query))
            .await
    }

    async fn should_remember(&self, content: &str) -> bool {
        self.judge(&prompts::should_remember_prompt(content)).await
    }

    async fn should_search(&self, query: &str) -> bool {
        self.judge(&prompts::should_search_prompt(query)).await
    }

    async fn classify(&self, content: &str) -> Classification {
        let prompt = prompts::classify_prompt(content);
        let reply = retry_with_backoff(self.max_attempts, self.backoff_base, || {
            self.client.complete_prompt(&prompt)
        })
        .await;

        match reply {
            Ok(text) => match parse_classification(&text) {
                Some(classification) => {
                    debug!(
                        "Classified as {} (importance {})",
                        classification.kind, classification.importance
                    );
                    classification
                }
                None => {
                    warn!("Unparseable classification reply, using default: {text:?}");
                    Classification::default()
                }
            },
            Err(err) => {
                warn!("Classification failed after retries, using default: {err:#}");
                Classification::default()
            }
        }
    }

    async fn score(&self, query: &str, memory: &str) -> f32 {
        match self
            .client
            .complete_prompt(&prompts::score_prompt(query, memory))
            .await
        {
            Ok(text) => parse_score(&text).unwrap_or_else(|| {
                warn!("Unparseable relevance score, defaulting to 0: {text:?}");
                0.0
            }),
            Err(err) => {
                warn!("Scoring call failed, defaulting to 0: {err:#}");
                0.0
            }
        }
    }

    async fn summarize(&self, memories: &[String], query: &str) -> String {
        match self
            .client
            .complete_prompt(&prompts::summarize_prompt(memories, query))
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!("Summarization failed, returning raw memories: {err:#}");
                String::new()
            }
        }
    }
}

/// Retry an operation with exponential backoff: delays of
/// base × 1.5^0, 1.5^1, … between attempts. Returns the last error
/// once `max_attempts` have failed.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    base: Duration,
    mut op: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                let delay = base.mul_f64(BACKOFF_FACTOR.powi(attempt as i32 - 1));
                warn!(
                    "Attempt {}/{} failed: {err:#}; retrying in {:?}",
                    attempt, max_attempts, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Raw classifier payload: duck-typed on the wire, strict here. The
/// kind falls back to "fact" and importance is clamped to [1, 5].
#[derive(Deserialize)]
struct RawClassification {
    #[serde(rename = "type")]
    kind: String,
    importance: Option<i64>,
}

/// Extract the first JSON object from the reply and validate it.
fn parse_classification(text: &str) -> Option<Classification> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    let raw: RawClassification = serde_json::from_str(&text[start..=end]).ok()?;
    Some(Classification::new(
        MemoryKind::parse_or_fact(&raw.kind),
        raw.importance.unwrap_or(1),
    ))
}

/// Parse the first bare number in the reply, clamped into [0, 1].
fn parse_score(text: &str) -> Option<f32> {
    text.split_whitespace()
        .filter_map(|token| {
            token
                .trim_matches(|c: char| !c.is_ascii_digit() && c != '.')
                .parse::<f32>()
                .ok()
        })
        .next()
        .map(|value| value.clamp(0.0, 1.0))
}
