//! Syntax provider: tree-sitter Python grammar plus a depth-first visitor
//! over a tagged view of node kinds

use pyuml_core::error::{DiagramError, Result};
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

/// The node kinds the class model builder cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    ClassDef,
    FunctionDef,
    DecoratedDef,
    Assignment,
    Identifier,
    /// `object.attribute`
    Attribute,
    /// `a, b` / `(a, b)` / `[a, b]` on the left of an assignment
    TargetList,
    KeywordArgument,
    Comment,
    Other,
}

impl SyntaxKind {
    pub fn of(node: &Node) -> Self {
        match node.kind() {
            "class_definition" => SyntaxKind::ClassDef,
            "function_definition" => SyntaxKind::FunctionDef,
            "decorated_definition" => SyntaxKind::DecoratedDef,
            "assignment" => SyntaxKind::Assignment,
            "identifier" => SyntaxKind::Identifier,
            "attribute" => SyntaxKind::Attribute,
            "pattern_list" | "tuple_pattern" | "list_pattern" | "tuple" | "list" => {
                SyntaxKind::TargetList
            }
            "keyword_argument" => SyntaxKind::KeywordArgument,
            "comment" => SyntaxKind::Comment,
            _ => SyntaxKind::Other,
        }
    }
}

/// What the visitor should do after seeing a node.
pub enum Visit<C> {
    /// Visit the node's children with this context.
    Descend(C),
    Skip,
}

/// Pre-order depth-first walk over named nodes.
///
/// Each node is visited with the context its parent handed down, so scoped
/// walks (class body vs. method body) need no recursion.
pub fn depth_first<'tree, C, F>(root: Node<'tree>, context: C, mut visit: F)
where
    C: Clone,
    F: FnMut(Node<'tree>, &C) -> Visit<C>,
{
    let mut stack = vec![(root, context)];
    while let Some((node, context)) = stack.pop() {
        if let Visit::Descend(child_context) = visit(node, &context) {
            let mut cursor = node.walk();
            let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, child_context.clone()));
            }
        }
    }
}

/// The first `ERROR` or `MISSING` node in document order.
pub fn first_syntax_error(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node
            .children(&mut cursor)
            .filter(|child| child.has_error())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

pub fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse with an already configured parser and reject trees containing
/// syntax errors.
pub fn parse_with(parser: &mut Parser, path: &Path, text: &str) -> Result<Tree> {
    let tree = parser
        .parse(text, None)
        .ok_or_else(|| DiagramError::unparseable(path, "parser produced no tree"))?;

    if let Some(error) = first_syntax_error(tree.root_node()) {
        let position = error.start_position();
        let reason = if error.is_missing() {
            format!(
                "missing {} at line {}, column {}",
                error.kind(),
                position.row + 1,
                position.column + 1
            )
        } else {
            format!(
                "syntax error at line {}, column {}",
                position.row + 1,
                position.column + 1
            )
        };
        return Err(DiagramError::unparseable(path, reason));
    }

    Ok(tree)
}

/// One-shot parse on the calling thread.
pub fn parse_python(path: &Path, text: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&python_language())
        .map_err(|e| DiagramError::ParserUnavailable(format!("Failed to set language: {}", e)))?;
    parse_with(&mut parser, path, text)
}
