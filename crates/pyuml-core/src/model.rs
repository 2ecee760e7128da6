//! Core data structures for the class model

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::visibility::classify;

/// Naming-convention visibility of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberVisibility {
    Public,
    Protected,
    Private,
}

impl MemberVisibility {
    /// PlantUML marker prefixed to a rendered member.
    pub fn marker(self) -> char {
        match self {
            MemberVisibility::Public => '+',
            MemberVisibility::Protected => '#',
            MemberVisibility::Private => '-',
        }
    }
}

/// An attribute or method name paired with its visibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub visibility: MemberVisibility,
}

impl Member {
    /// `+name`
    pub fn decorated(&self) -> String {
        format!("{}{}", self.visibility.marker(), self.name)
    }
}

/// One discovered class declaration.
///
/// Attributes and methods are keyed by bare name, so a name that is assigned
/// from several sites (class body, `__init__`, other methods) is stored once.
/// Visibility is a function of the name alone, so the key decides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassModel {
    pub name: String,
    /// Base references in declaration order.
    pub bases: Vec<String>,
    attributes: BTreeMap<String, MemberVisibility>,
    methods: BTreeMap<String, MemberVisibility>,
    /// 1-based line of the `class` keyword, when known.
    pub line: Option<u32>,
}

impl ClassModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            attributes: BTreeMap::new(),
            methods: BTreeMap::new(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn add_base(&mut self, base: impl Into<String>) {
        self.bases.push(base.into());
    }

    /// Record an attribute. Returns `false` if the name was already present.
    pub fn add_attribute(&mut self, name: &str) -> bool {
        if self.attributes.contains_key(name) {
            return false;
        }
        self.attributes.insert(name.to_string(), classify(name));
        true
    }

    /// Record a method. Returns `false` if the name was already present
    /// (property getter/setter pairs, overloads).
    pub fn add_method(&mut self, name: &str) -> bool {
        if self.methods.contains_key(name) {
            return false;
        }
        self.methods.insert(name.to_string(), classify(name));
        true
    }

    pub fn attributes(&self) -> impl Iterator<Item = Member> + '_ {
        self.attributes.iter().map(|(name, visibility)| Member {
            name: name.clone(),
            visibility: *visibility,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = Member> + '_ {
        self.methods.iter().map(|(name, visibility)| Member {
            name: name.clone(),
            visibility: *visibility,
        })
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Ordered collection of models for one analysis run.
///
/// Redeclaring a class name replaces the earlier model in place: the last
/// declaration's content wins while the first declaration's slot is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSet {
    models: Vec<ClassModel>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: ClassModel) {
        match self.models.iter_mut().find(|m| m.name == model.name) {
            Some(existing) => {
                tracing::debug!("Class {} redeclared, keeping the later declaration", model.name);
                *existing = model;
            }
            None => self.models.push(model),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassModel> {
        self.models.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ClassModel> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn into_vec(self) -> Vec<ClassModel> {
        self.models
    }
}

/// `parent <|-- child`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InheritanceEdge {
    pub child: String,
    /// May name a class outside the analysed source.
    pub parent: String,
}

/// Sentinel text for a source without class declarations.
pub const NO_CLASSES_FOUND: &str = "No classes found in the provided source.";

/// Final output of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagramDocument {
    /// The source declared no classes. Not an error.
    NoClasses,
    /// Complete `@startuml` ... `@enduml` text.
    PlantUml(String),
}

impl DiagramDocument {
    pub fn is_empty(&self) -> bool {
        matches!(self, DiagramDocument::NoClasses)
    }

    pub fn as_text(&self) -> &str {
        match self {
            DiagramDocument::NoClasses => NO_CLASSES_FOUND,
            DiagramDocument::PlantUml(text) => text,
        }
    }
}

impl fmt::Display for DiagramDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}
