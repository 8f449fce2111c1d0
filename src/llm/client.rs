// src/llm/client.rs

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use super::context::ChatMessage;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Thin HTTP client for an Anthropic-style messages API. One instance is
/// shared by the classifier adapter and the reply generator; timeout and
/// retry policy live in the callers, not here.
#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model,
            max_tokens,
        })
    }

    /// Build a client from `ANTHROPIC_API_KEY` and the global config.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("ANTHROPIC_API_KEY").context("ANTHROPIC_API_KEY not set")?;
        let config = &crate::config::CONFIG;
        Self::new(
            api_key,
            config.anthropic_base_url.clone(),
            config.classifier_model.clone(),
            config.classifier_max_tokens,
            Duration::from_secs(config.classifier_timeout_secs),
        )
    }

    /// Send a message list and return the generated text.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
        temperature: f32,
    ) -> Result<String> {
        let mut payload = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(system) = system {
            payload["system"] = json!(system);
        }

        let response = self
            .client
            .post(format!(
                "{}/v1/messages",
                self.base_url.trim_end_matches('/')
            ))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send messages request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!("Messages API error {}: {}", status, error_text));
        }

        let body: Value = response.json().await.context("Failed to parse response")?;
        let text = body["content"][0]["text"]
            .as_str()
            .context("Response carried no text content")?;
        Ok(text.to_string())
    }

    /// Single-prompt convenience used by the yes/no and scoring calls.
    /// Deterministic sampling: judgments should not wobble.
    pub async fn complete_prompt(&self, prompt: &str) -> Result<String> {
        self.complete(&[ChatMessage::user(prompt)], None, 0.0).await
    }

    /// Full reply generation with the persona as system text.
    pub async fn generate(&self, messages: &[ChatMessage], system: &str) -> Result<String> {
        self.complete(messages, Some(system), 0.9).await
    }
}
