//! pyuml core: class model, visibility heuristic, inheritance resolution
//! and PlantUML emission

pub mod emitter;
pub mod error;
pub mod graph;
pub mod model;
pub mod resolver;
pub mod source;
pub mod visibility;


pub use emitter::emit;
pub use error::DiagramError;
pub use graph::InheritanceGraph;
pub use model::{
    ClassModel, DiagramDocument, InheritanceEdge, Member, MemberVisibility, ModelSet,
    NO_CLASSES_FOUND,
};
pub use resolver::resolve_inheritance;
pub use source::{DiagramSource, SourceUnit};
pub use visibility::classify;
