//! Persisting diagrams and handing them to an external renderer

use pyuml_core::DiagramDocument;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start renderer '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Write `<dir>/<name>.puml`, creating directories as needed. `name` may
/// contain subdirectories, e.g. `pkg/models`.
///
/// Callers skip `NoClasses` documents; there is nothing to draw.
pub fn save_diagram(doc: &DiagramDocument, dir: &Path, name: &Path) -> Result<PathBuf, RenderError> {
    let mut file_name = name.as_os_str().to_owned();
    file_name.push(".puml");
    let path = dir.join(file_name);

    let parent = path.parent().unwrap_or(dir);
    std::fs::create_dir_all(parent).map_err(|source| RenderError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut text = doc.as_text().to_string();
    text.push('\n');
    std::fs::write(&path, text).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}

#[derive(Debug)]
pub struct RenderOutcome {
    pub status: ExitStatus,
    pub stderr: String,
}

/// External PlantUML renderer, invoked as `<command> <args...> <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    pub command: String,
    pub args: Vec<String>,
}

impl Renderer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub async fn render(&self, path: &Path) -> Result<RenderOutcome, RenderError> {
        tracing::debug!("Rendering {} with {}", path.display(), self.command);

        let output = tokio::process::Command::new(&self.command)
            .args(&self.args)
            .arg(path)
            .output()
            .await
            .map_err(|source| RenderError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status,
                stderr,
            });
        }

        Ok(RenderOutcome {
            status: output.status,
            stderr,
        })
    }
}
