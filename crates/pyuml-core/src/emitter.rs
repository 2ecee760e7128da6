//! PlantUML emission
//!
//! Lines are joined with a single `\n`, with no blank lines between blocks
//! and no trailing newline:
//!
//! ```text
//! @startuml
//! class Foo {
//! +x
//! --
//! #_check()
//! }
//! Bar <|-- Foo
//! @enduml
//! ```

use crate::model::{ClassModel, DiagramDocument, InheritanceEdge};

pub const START_MARKER: &str = "@startuml";
pub const END_MARKER: &str = "@enduml";
pub const SEPARATOR: &str = "--";

/// Render models and edges. Returns [`DiagramDocument::NoClasses`] when
/// there are no models, in which case the edges are ignored.
pub fn emit(models: &[ClassModel], edges: &[InheritanceEdge]) -> DiagramDocument {
    if models.is_empty() {
        return DiagramDocument::NoClasses;
    }

    let mut lines = vec![START_MARKER.to_string()];
    for model in models {
        lines.extend(class_block(model));
    }
    lines.extend(edges.iter().map(relationship_line));
    lines.push(END_MARKER.to_string());

    DiagramDocument::PlantUml(lines.join("\n"))
}

fn class_block(model: &ClassModel) -> Vec<String> {
    let mut attributes: Vec<String> = model.attributes().map(|a| a.decorated()).collect();
    attributes.sort();

    let mut methods: Vec<String> = model
        .methods()
        .map(|m| format!("{}()", m.decorated()))
        .collect();
    methods.sort();

    let mut block = Vec::with_capacity(attributes.len() + methods.len() + 3);
    block.push(format!("class {} {{", model.name));
    if !attributes.is_empty() {
        block.extend(attributes);
        block.push(SEPARATOR.to_string());
    }
    block.extend(methods);
    block.push("}".to_string());
    block
}

fn relationship_line(edge: &InheritanceEdge) -> String {
    format!("{} <|-- {}", edge.parent, edge.child)
}
