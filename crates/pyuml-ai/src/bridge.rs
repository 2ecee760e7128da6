//! Remote text-generation diagram source

use anyhow::Result;
use pyuml_core::{DiagramDocument, DiagramError, DiagramSource, SourceUnit};

use crate::extract::extract_plantuml_block;
use crate::prompt::{class_diagram_prompt, DIAGRAM_SYSTEM_PROMPT};

/// Text returned by a chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub text: String,
    /// Tokens billed for this request, 0 when the service does not report it
    pub tokens_used: u32,
}

/// Chat-completion backend trait for different LLM services
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<ChatCompletion>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// [`DiagramSource`] that asks a language model for the diagram and keeps
/// the first `@startuml` ... `@enduml` block of its answer.
///
/// Output depends on the remote model, so it is not deterministic and may
/// disagree with the local builder.
pub struct RemoteSource {
    provider: Box<dyn ChatProvider>,
}

impl RemoteSource {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait::async_trait]
impl DiagramSource for RemoteSource {
    async fn generate(&self, unit: &SourceUnit) -> pyuml_core::error::Result<DiagramDocument> {
        let prompt = class_diagram_prompt(unit);
        let completion = self
            .provider
            .complete(DIAGRAM_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| DiagramError::remote(self.provider.name(), format!("{:#}", e)))?;

        tracing::info!(
            "{}: {} answered with {} chars ({} tokens)",
            unit.path.display(),
            self.provider.name(),
            completion.text.len(),
            completion.tokens_used
        );

        match extract_plantuml_block(&completion.text) {
            Some(block) => Ok(DiagramDocument::PlantUml(block.to_string())),
            None => Err(DiagramError::NoDiagramInResponse {
                provider: self.provider.name().to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
