// src/tools/web_search/mod.rs

//! Web search collaborator: a chat-completions style provider that
//! answers a free-text query with a plain-text factual summary. Callers
//! treat `None` as the failure signal and fall back to memory or a
//! plain reply; search is an alternative content source, never a
//! correctness requirement.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::warn;

pub struct SearchService {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl SearchService {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build search HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model,
        })
    }

    /// Build a client from `PERPLEXITY_API_KEY` and the global config.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("PERPLEXITY_API_KEY").context("PERPLEXITY_API_KEY not set")?;
        let config = &crate::config::CONFIG;
        Self::new(
            api_key,
            config.search_base_url.clone(),
            config.search_model.clone(),
            Duration::from_secs(config.search_timeout_secs),
        )
    }

    /// Search the web for a factual summary. `None` on any failure.
    pub async fn search_web(&self, query: &str) -> Option<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "Provide accurate, concise information."
                },
                {
                    "role": "user",
                    "content": format!("{query}. Provide recent, accurate information.")
                }
            ],
            "temperature": 0.1,
            "max_tokens": 4096,
        });

        let response = match self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("Search request failed: {err:#}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("Search API error: {}", response.status());
            return None;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!("Search response unreadable: {err:#}");
                return None;
            }
        };

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
    }
}
