//! Source units and the pluggable diagram source capability

use crate::error::{DiagramError, Result};
use crate::model::DiagramDocument;
use std::path::{Path, PathBuf};

/// Python source text together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a source file. Missing or unreadable files are
    /// `SourceUnavailable`, non UTF-8 content is `UnparseableSource`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DiagramError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes)
            .map_err(|e| DiagramError::unparseable(path, format!("invalid UTF-8: {}", e)))?;

        tracing::debug!("Loaded {} ({} bytes)", path.display(), text.len());
        Ok(Self::new(path, text))
    }
}

/// Something that turns a source unit into a diagram document.
///
/// The deterministic tree walker and the remote text-generation path are
/// both implementations; callers pick one from configuration.
#[async_trait::async_trait]
pub trait DiagramSource: Send + Sync {
    async fn generate(&self, unit: &SourceUnit) -> Result<DiagramDocument>;

    /// Human readable source name for logs.
    fn name(&self) -> &str;
}
