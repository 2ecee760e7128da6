//! OpenAI-compatible chat completions client
//!
//! OpenAI, OpenRouter and Gemini all accept the same request shape, so one
//! client serves every preset; only endpoint, key and model differ.

use super::super::bridge::{ChatCompletion, ChatProvider};
use super::{ProviderOptions, ProviderPreset};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub struct OpenAIProvider {
    client: reqwest::Client,
    name: String,
    endpoint: String,
    api_key: String,
    api_key_env: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    extra_headers: Vec<(&'static str, &'static str)>,
}

impl OpenAIProvider {
    pub fn new(preset: &ProviderPreset, options: ProviderOptions) -> Result<Self> {
        let api_key_env = options
            .api_key_env
            .unwrap_or_else(|| preset.api_key_env.to_string());
        let api_key = options
            .api_key
            .or_else(|| std::env::var(&api_key_env).ok())
            .unwrap_or_default();

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            name: preset.name.to_string(),
            endpoint: options
                .endpoint
                .unwrap_or_else(|| preset.endpoint.to_string()),
            api_key,
            api_key_env,
            model: options
                .model
                .unwrap_or_else(|| preset.default_model.to_string()),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            extra_headers: preset.extra_headers.to_vec(),
        })
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    total_tokens: u32,
}

#[async_trait::async_trait]
impl ChatProvider for OpenAIProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<ChatCompletion> {
        if self.api_key.is_empty() {
            anyhow::bail!("missing API key, set {}", self.api_key_env);
        }

        let openai_request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        for (name, value) in &self.extra_headers {
            request = request.header(*name, *value);
        }

        tracing::debug!("Sending {} prompt chars to {} ({})", prompt.len(), self.name, self.model);
        let response = request
            .json(&openai_request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.name))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} API error ({}): {}", self.name, status, error_text);
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", self.name))?;

        let text = openai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("response contained no choices")?;
        if text.trim().is_empty() {
            anyhow::bail!("empty response from model");
        }

        Ok(ChatCompletion {
            text,
            tokens_used: openai_response.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
