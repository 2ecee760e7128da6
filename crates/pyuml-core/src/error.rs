//! Error taxonomy shared by every diagram source

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagramError {
    /// The source file could not be located or read.
    #[error("source not found: {path}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The syntax provider could not produce a clean tree.
    #[error("source {path} is not parseable: {reason}")]
    UnparseableSource { path: PathBuf, reason: String },

    /// The parser pool is shut down or a worker died.
    #[error("parser unavailable: {0}")]
    ParserUnavailable(String),

    /// Transport, status or response-shape failure of a remote source.
    #[error("{provider} request failed: {message}")]
    Remote { provider: String, message: String },

    /// A remote response carried no `@startuml` ... `@enduml` block.
    #[error("{provider} response contained no @startuml ... @enduml block")]
    NoDiagramInResponse { provider: String },
}

impl DiagramError {
    pub fn unparseable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DiagramError::UnparseableSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn remote(provider: impl Into<String>, message: impl std::fmt::Display) -> Self {
        DiagramError::Remote {
            provider: provider.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiagramError>;
