use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::agent::config::AgentConfig;
use crate::provider::{ChatTransport, CompletionRequest};

const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct OpenAiTransport {
    client: Client,
    api_key: String,
    url: String,
}

pub fn chat_completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    }
}

impl OpenAiTransport {
    pub fn from_config(cfg: &AgentConfig) -> Result<Self> {
        let api_key = cfg.require_api_key()?.to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            api_key,
            url: chat_completions_url(&cfg.base_url),
        })
    }
}

impl ChatTransport for OpenAiTransport {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .with_context(|| format!("request to {} failed", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            anyhow::bail!("chat completion failed with status {status}: {}", snippet.trim());
        }

        let json: Value = response
            .json()
            .context("chat completion response is not valid JSON")?;
        Ok(json)
    }
}
