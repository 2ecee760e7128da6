//! PlantUML block extraction from free-form model output

use regex::Regex;
use std::sync::LazyLock;

static PLANTUML_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)@startuml.*?@enduml").expect("static regex is valid")
});

/// The first `@startuml`, up to the first `@enduml` after it, markers
/// included. Text around the block (prose, code fences) is dropped.
pub fn extract_plantuml_block(response: &str) -> Option<&str> {
    PLANTUML_BLOCK.find(response).map(|m| m.as_str())
}
