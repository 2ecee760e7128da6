//! AI provider implementations

pub mod openai;

use super::bridge::ChatProvider;
use anyhow::Result;
use std::time::Duration;

/// Endpoint, credentials and default model of a known chat service.
#[derive(Debug, Clone, Copy)]
pub struct ProviderPreset {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub api_key_env: &'static str,
    pub default_model: &'static str,
    pub extra_headers: &'static [(&'static str, &'static str)],
}

pub const OPENAI: ProviderPreset = ProviderPreset {
    name: "openai",
    endpoint: "https://api.openai.com/v1/chat/completions",
    api_key_env: "OPENAI_API_KEY",
    default_model: "gpt-4o-mini",
    extra_headers: &[],
};

pub const OPENROUTER: ProviderPreset = ProviderPreset {
    name: "openrouter",
    endpoint: "https://openrouter.ai/api/v1/chat/completions",
    api_key_env: "OPENROUTER_API_KEY",
    default_model: "anthropic/claude-3-haiku-20240307",
    extra_headers: &[("X-Title", "pyuml")],
};

pub const GEMINI: ProviderPreset = ProviderPreset {
    name: "gemini",
    endpoint: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
    api_key_env: "GEMINI_API_KEY",
    default_model: "gemini-2.0-flash",
    extra_headers: &[],
};

pub const PRESETS: &[ProviderPreset] = &[OPENAI, OPENROUTER, GEMINI];

pub fn preset(name: &str) -> Option<&'static ProviderPreset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Per-run overrides layered on top of a preset.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: None,
            model: None,
            endpoint: None,
            timeout: Duration::from_secs(60),
            temperature: 0.1,
            max_tokens: 4000,
        }
    }
}

/// Factory function to create AI providers
pub fn create_provider(provider_name: &str, options: ProviderOptions) -> Result<Box<dyn ChatProvider>> {
    match preset(provider_name) {
        Some(preset) => Ok(Box::new(openai::OpenAIProvider::new(preset, options)?)),
        None => anyhow::bail!("Unknown AI provider: {}", provider_name),
    }
}
