//! `include(...)` statements of settings and build scripts

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::analyzer::FactAnalyzer;
use crate::core::scope::ScopeStack;
use crate::gradle::text::strip_whitespace;
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

static INCLUDE_ARGS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?i)include[(]?(.*)[)]?").ok());
static QUOTED_NAME: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r#"['"]:?([^'",\n]*)['"]"#).ok());

/// Module names listed by one include statement, leading `:` removed
///
/// Surrounding noise is tolerated: the statement pattern is searched for, not
/// matched against the whole text.
pub fn extract_included_names(text: &str) -> Vec<String> {
    let text = strip_whitespace(text);
    let (Some(statement), Some(quoted)) = (INCLUDE_ARGS.as_ref(), QUOTED_NAME.as_ref()) else {
        return Vec::new();
    };
    let Some(args) = statement.captures(&text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    quoted
        .captures_iter(args.as_str())
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Yields the module names of every `include` call
pub struct IncludeAnalyzer {
    kinds: &'static [NodeKind],
}

impl IncludeAnalyzer {
    pub fn kts() -> Self {
        Self {
            kinds: &[NodeKind::Call],
        }
    }

    pub fn groovy() -> Self {
        Self {
            kinds: &[NodeKind::Command, NodeKind::MethodCall],
        }
    }
}

impl FactAnalyzer<Vec<String>> for IncludeAnalyzer {
    fn node_kinds(&self) -> &[NodeKind] {
        self.kinds
    }

    fn analyze(&self, tree: &SyntaxTree, node: NodeId, _scope: &ScopeStack) -> Option<Vec<String>> {
        if tree.name(node) != Some("include") {
            return None;
        }
        let names = extract_included_names(tree.text(node));
        if names.is_empty() {
            None
        } else {
            Some(names)
        }
    }
}
