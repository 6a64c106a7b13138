//! Text helpers shared by the extractors

use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

/// Remove every whitespace character
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Text of a call without its trailing lambda or closure
///
/// `implementation("a:b:1") { exclude(group = "c") }` reads as
/// `implementation("a:b:1") `.
pub fn call_text(tree: &SyntaxTree, node: NodeId) -> &str {
    let text = tree.text(node);
    match tree.children(node).last() {
        Some(&last) if tree.kind(last) == NodeKind::Block => {
            text.strip_suffix(tree.text(last)).unwrap_or(text)
        }
        _ => text,
    }
}

/// Drop Kotlin backtick quoting, `` `java-library` `` becomes `java-library`
pub fn strip_backticks(text: &str) -> String {
    text.replace('`', "")
}
