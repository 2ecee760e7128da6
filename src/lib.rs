//! pyuml: PlantUML class diagrams from Python source

pub mod commands;
pub mod config;
pub mod render;

pub use config::{AppConfig, SourceKind};
pub use render::{save_diagram, RenderError, Renderer};
