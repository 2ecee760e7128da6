//! Deterministic diagram source: parse, build, resolve, emit

use pyuml_core::error::Result;
use pyuml_core::{
    emit, resolve_inheritance, ClassModel, DiagramDocument, DiagramSource, InheritanceEdge,
    InheritanceGraph, SourceUnit,
};
use serde::Serialize;
use tree_sitter::Tree;

use crate::builder::ClassModelBuilder;
use crate::parser_pool::{ParseRequest, ParserPool};
use crate::syntax::parse_python;

/// Class models and inheritance edges recovered from one source unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub models: Vec<ClassModel>,
    pub edges: Vec<InheritanceEdge>,
}

impl Analysis {
    pub fn document(&self) -> DiagramDocument {
        emit(&self.models, &self.edges)
    }
}

/// Run the builder and resolver over an already parsed tree.
pub fn analyze_tree(tree: &Tree, source: &str) -> Analysis {
    let models = ClassModelBuilder::new(source).build(tree).into_vec();
    let edges = resolve_inheritance(&models);

    for cycle in InheritanceGraph::from_edges(&edges).cycles() {
        tracing::warn!("Inheritance cycle between {}", cycle.join(", "));
    }

    Analysis { models, edges }
}

/// Parse on the calling thread and analyse.
pub fn analyze_source(unit: &SourceUnit) -> Result<Analysis> {
    let tree = parse_python(&unit.path, &unit.text)?;
    Ok(analyze_tree(&tree, &unit.text))
}

/// [`DiagramSource`] backed by the tree-sitter class model builder.
#[derive(Clone)]
pub struct LocalSource {
    parser_pool: ParserPool,
}

impl LocalSource {
    pub fn new(parser_pool: ParserPool) -> Self {
        Self { parser_pool }
    }

    pub async fn analyze(&self, unit: &SourceUnit) -> Result<Analysis> {
        let request = ParseRequest {
            content: unit.text.clone(),
            path: unit.path.clone(),
        };
        let parsed = self.parser_pool.parse(request).await?;
        Ok(analyze_tree(&parsed.tree, &parsed.content))
    }
}

#[async_trait::async_trait]
impl DiagramSource for LocalSource {
    async fn generate(&self, unit: &SourceUnit) -> Result<DiagramDocument> {
        let analysis = self.analyze(unit).await?;
        tracing::info!(
            "{}: {} classes, {} inheritance edges",
            unit.path.display(),
            analysis.models.len(),
            analysis.edges.len()
        );
        Ok(analysis.document())
    }

    fn name(&self) -> &str {
        "local"
    }
}
