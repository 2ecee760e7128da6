//! `pyuml.toml` configuration

use pyuml_ai::ProviderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::render::Renderer;

pub const DEFAULT_CONFIG_FILE: &str = "pyuml.toml";

/// Files processed at once by `generate`. Bounds parallel requests when the
/// remote source is selected.
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Which diagram source handles a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Deterministic tree-sitter extraction
    #[default]
    Local,
    /// Ask a chat-completion service for the diagram
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceKind,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub remote: RemoteSettings,
    pub render: RenderSettings,

    #[serde(skip)]
    config_file_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            output_dir: PathBuf::from("."),
            concurrency: DEFAULT_CONCURRENCY,
            remote: RemoteSettings::default(),
            render: RenderSettings::default(),
            config_file_path: None,
        }
    }
}

/// `[remote]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub provider: String,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        let options = ProviderOptions::default();
        Self {
            provider: "openai".to_string(),
            model: None,
            api_key_env: None,
            endpoint: None,
            timeout_secs: options.timeout.as_secs(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }
}

impl RemoteSettings {
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            api_key: None,
            api_key_env: self.api_key_env.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// `[render]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub enabled: bool,
    pub command: String,
    pub args: Vec<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "plantuml".to_string(),
            args: Vec::new(),
        }
    }
}

impl RenderSettings {
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.command.clone(), self.args.clone())
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_file_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// An explicit path must exist. Without one, `./pyuml.toml` is used when
    /// present and defaults apply otherwise.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }
}
