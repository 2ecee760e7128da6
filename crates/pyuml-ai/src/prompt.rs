//! Prompt templates for diagram generation

use pyuml_core::SourceUnit;

/// Generate a prompt asking for a PlantUML class diagram of one source file
pub fn class_diagram_prompt(unit: &SourceUnit) -> String {
    format!(
        r#"Generate a complete and accurate PlantUML class diagram for the following Python code.
Include every class, attribute, method and relationship (inheritance, composition, aggregation).
Use standard PlantUML syntax and do not add any explanatory text.

File: {}

Code:
```python
{}
```

Expected format:
@startuml
...PlantUML code...
@enduml"#,
        unit.path.display(),
        unit.text
    )
}

/// System prompt for diagram generation
pub const DIAGRAM_SYSTEM_PROMPT: &str = r#"You are an expert software architect who turns source code into UML.

1. Answer with a single PlantUML block delimited by @startuml and @enduml
2. Mark visibility with + (public), # (protected) and - (private)
3. Treat names starting with a single underscore as protected and names starting with two underscores (but not dunder names) as private
4. Only describe what the code actually contains"#;
