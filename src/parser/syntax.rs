use std::fmt;

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// Text the grammar could not place (an `ERROR` node).
    Unexpected(String),
    /// A token the parser had to invent to finish the tree (a `MISSING` node).
    Missing(String),
}

/// A syntax error located by 1-based line and 0-based column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub kind: SyntaxErrorKind,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SyntaxErrorKind::Unexpected(text) => {
                write!(f, "{}:{}: unexpected `{}`", self.line, self.column, text)
            }
            SyntaxErrorKind::Missing(kind) => {
                write!(f, "{}:{}: missing `{}`", self.line, self.column, kind)
            }
        }
    }
}

/// Receives syntax errors as they are found in a tree.
pub trait SyntaxErrorListener {
    fn on_syntax_error(&mut self, error: &SyntaxError);
}

impl<F: FnMut(&SyntaxError)> SyntaxErrorListener for F {
    fn on_syntax_error(&mut self, error: &SyntaxError) {
        self(error)
    }
}

/// Logs each error at warn level, tagged with the file it came from.
pub struct LogListener<'a> {
    pub file: &'a str,
}

impl SyntaxErrorListener for LogListener<'_> {
    fn on_syntax_error(&mut self, error: &SyntaxError) {
        tracing::warn!(file = self.file, "syntax error at {}", error);
    }
}

#[derive(Debug, Default)]
pub struct CollectingListener {
    pub errors: Vec<SyntaxError>,
}

impl SyntaxErrorListener for CollectingListener {
    fn on_syntax_error(&mut self, error: &SyntaxError) {
        self.errors.push(error.clone());
    }
}

/// Longest excerpt of unexpected text kept in an error.
const EXCERPT_LIMIT: usize = 40;

/// Find every `ERROR` and `MISSING` node under `root`.
///
/// Only subtrees flagged by `has_error` are descended into.
pub fn collect_syntax_errors(root: Node<'_>, source: &str) -> Vec<SyntaxError> {
    let mut errors = Vec::new();
    if !root.has_error() {
        return errors;
    }
    visit(root, source, &mut errors);
    if errors.is_empty() {
        // has_error without a located node; report at the root.
        errors.push(error_at(root, SyntaxErrorKind::Unexpected(String::new())));
    }
    errors
}

fn visit(node: Node<'_>, source: &str, errors: &mut Vec<SyntaxError>) {
    if node.is_missing() {
        errors.push(error_at(node, SyntaxErrorKind::Missing(node.kind().to_string())));
        return;
    }
    if node.is_error() {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        errors.push(error_at(node, SyntaxErrorKind::Unexpected(excerpt(text))));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, errors);
    }
}

fn error_at(node: Node<'_>, kind: SyntaxErrorKind) -> SyntaxError {
    let pos = node.start_position();
    SyntaxError {
        line: pos.row + 1,
        column: pos.column,
        kind,
    }
}

fn excerpt(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > EXCERPT_LIMIT {
        let cut: String = first_line.chars().take(EXCERPT_LIMIT).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}
