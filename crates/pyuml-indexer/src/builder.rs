//! Class model builder
//!
//! Walks a Python syntax tree and produces one [`ClassModel`] per
//! `class_definition`, wherever it is nested. Members come from the class
//! body:
//!
//! - direct (possibly decorated) function definitions are methods
//! - bare-name assignments in class scope are class attributes
//! - `<receiver>.name` assignments inside methods are instance attributes,
//!   where the receiver is the method's first parameter
//!
//! Shapes that match none of these (subscript targets, computed bases) are
//! skipped one at a time; they never abort the walk.

use pyuml_core::{ClassModel, ModelSet};
use tree_sitter::{Node, Tree};

use crate::syntax::{depth_first, SyntaxKind, Visit};

/// Where an assignment appears relative to the class being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope<'s> {
    ClassBody,
    Method { receiver: Option<&'s str> },
}

pub struct ClassModelBuilder<'s> {
    source: &'s [u8],
}

impl<'s> ClassModelBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source: source.as_bytes(),
        }
    }

    /// Build every class model in the tree, in depth-first discovery order.
    pub fn build(&self, tree: &Tree) -> ModelSet {
        let mut models = ModelSet::new();
        depth_first(tree.root_node(), (), |node, _| {
            if SyntaxKind::of(&node) == SyntaxKind::ClassDef {
                if let Some(model) = self.build_class(node) {
                    models.insert(model);
                }
            }
            Visit::Descend(())
        });
        models
    }

    fn text(&self, node: Node<'_>) -> Option<&'s str> {
        node.utf8_text(self.source).ok()
    }

    fn build_class(&self, node: Node<'_>) -> Option<ClassModel> {
        let Some(name) = node.child_by_field_name("name").and_then(|n| self.text(n)) else {
            tracing::trace!("Skipping class without a readable name at row {}", node.start_position().row);
            return None;
        };
        let mut model = ClassModel::new(name).with_line(node.start_position().row as u32 + 1);

        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            self.collect_bases(superclasses, &mut model);
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.collect_methods(body, &mut model);
            self.collect_attributes(body, &mut model);
        }

        tracing::debug!(
            "Class {}: {} bases, {} attributes, {} methods",
            model.name,
            model.bases.len(),
            model.attribute_count(),
            model.method_count()
        );
        Some(model)
    }

    fn collect_bases(&self, superclasses: Node<'_>, model: &mut ClassModel) {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            match SyntaxKind::of(&base) {
                SyntaxKind::KeywordArgument | SyntaxKind::Comment => {}
                _ => match self.base_reference(base) {
                    Some(reference) => model.add_base(reference),
                    None => tracing::trace!(
                        "Class {}: skipping base of kind {}",
                        model.name,
                        base.kind()
                    ),
                },
            }
        }
    }

    /// `Base` or a dotted `pkg.mod.Base`. Anything computed is `None`.
    fn base_reference(&self, node: Node<'_>) -> Option<String> {
        match SyntaxKind::of(&node) {
            SyntaxKind::Identifier => self.text(node).map(str::to_string),
            SyntaxKind::Attribute => {
                let object = node.child_by_field_name("object")?;
                let attribute = self.text(node.child_by_field_name("attribute")?)?;
                let owner = self.base_reference(object)?;
                Some(format!("{}.{}", owner, attribute))
            }
            _ => None,
        }
    }

    fn collect_methods(&self, body: Node<'_>, model: &mut ClassModel) {
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            let function = match SyntaxKind::of(&statement) {
                SyntaxKind::FunctionDef => statement,
                SyntaxKind::DecoratedDef => match statement.child_by_field_name("definition") {
                    Some(def) if SyntaxKind::of(&def) == SyntaxKind::FunctionDef => def,
                    _ => continue,
                },
                _ => continue,
            };
            if let Some(name) = function.child_by_field_name("name").and_then(|n| self.text(n)) {
                model.add_method(name);
            }
        }
    }

    fn collect_attributes(&self, body: Node<'_>, model: &mut ClassModel) {
        depth_first(body, Scope::ClassBody, |node, scope| match SyntaxKind::of(&node) {
            // Nested classes get their own model.
            SyntaxKind::ClassDef => Visit::Skip,
            SyntaxKind::FunctionDef => match scope {
                Scope::ClassBody => Visit::Descend(Scope::Method {
                    receiver: self.receiver(node),
                }),
                // Closures inside a method keep the method's receiver.
                Scope::Method { .. } => Visit::Descend(*scope),
            },
            SyntaxKind::Assignment => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.collect_target(left, *scope, model);
                }
                // Chained `a = b = v` nests the next assignment on the right.
                Visit::Descend(*scope)
            }
            _ => Visit::Descend(*scope),
        });
    }

    fn collect_target(&self, target: Node<'_>, scope: Scope<'s>, model: &mut ClassModel) {
        match (SyntaxKind::of(&target), scope) {
            (SyntaxKind::Identifier, Scope::ClassBody) => {
                if let Some(name) = self.text(target) {
                    model.add_attribute(name);
                }
            }
            // Locals.
            (SyntaxKind::Identifier, Scope::Method { .. }) => {}
            (SyntaxKind::Attribute, Scope::Method { receiver: Some(receiver) }) => {
                let object = target.child_by_field_name("object");
                let on_receiver = object
                    .filter(|o| SyntaxKind::of(o) == SyntaxKind::Identifier)
                    .and_then(|o| self.text(o))
                    == Some(receiver);
                let name = target
                    .child_by_field_name("attribute")
                    .and_then(|a| self.text(a));

                match name {
                    Some(name) if on_receiver => {
                        model.add_attribute(name);
                    }
                    _ => tracing::trace!(
                        "Class {}: skipping attribute target not on {}",
                        model.name,
                        receiver
                    ),
                }
            }
            (SyntaxKind::TargetList, _) => {
                let mut cursor = target.walk();
                let elements: Vec<Node<'_>> = target.named_children(&mut cursor).collect();
                for element in elements {
                    self.collect_target(element, scope, model);
                }
            }
            _ => tracing::trace!(
                "Class {}: skipping assignment target of kind {}",
                model.name,
                target.kind()
            ),
        }
    }

    /// The first parameter of a method, unless it is a `@staticmethod`.
    fn receiver(&self, function: Node<'_>) -> Option<&'s str> {
        if self.is_staticmethod(function) {
            return None;
        }
        let parameters = function.child_by_field_name("parameters")?;
        let mut cursor = parameters.walk();
        let first = parameters.named_children(&mut cursor).next()?;

        match first.kind() {
            "identifier" => self.text(first),
            "typed_parameter" => {
                let mut cursor = first.walk();
                let name = first
                    .named_children(&mut cursor)
                    .find(|n| SyntaxKind::of(n) == SyntaxKind::Identifier)?;
                self.text(name)
            }
            "default_parameter" | "typed_default_parameter" => {
                self.text(first.child_by_field_name("name")?)
            }
            _ => None,
        }
    }

    fn is_staticmethod(&self, function: Node<'_>) -> bool {
        let Some(parent) = function.parent() else {
            return false;
        };
        if SyntaxKind::of(&parent) != SyntaxKind::DecoratedDef {
            return false;
        }
        let mut cursor = parent.walk();
        let decorated = parent
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| self.text(decorator))
            .any(|text| {
                let text = text.trim_start_matches('@').trim();
                text == "staticmethod" || text.ends_with(".staticmethod")
            });
        decorated
    }
}
