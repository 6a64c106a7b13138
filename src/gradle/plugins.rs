//! Plugin declarations and applications
//!
//! Forms are tried most specific first, the first match wins:
//!
//! 1. `id("x") version "1" apply false`
//! 2. `kotlin("jvm")`, short for `org.jetbrains.kotlin.jvm`
//! 3. a bare name such as `java`, only inside `plugins { }`; the whole
//!    statement must be one identifier, so `alias(libs.plugins.x)` is not one
//! 4. `apply(plugin = "x")`, `apply plugin: 'x'` and `plugin("x")` in an
//!    `apply { }` block, only outside `plugins { }`

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::analyzer::FactAnalyzer;
use crate::core::scope::{ScopeStack, ScopeTag};
use crate::gradle::text::{strip_backticks, strip_whitespace};
use crate::gradle::vocabulary::KOTLIN_GROUP;
use crate::models::records::PluginRecord;
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

const TAIL: &str = r#"(?:version['"]?([^:{}'"]*?)['"]?)?(?:apply(true|false))?"#;

static DEFAULT_EXTRACTOR: Lazy<PluginExtractor> = Lazy::new(PluginExtractor::new);

/// Where the candidate text sits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PluginContext {
    /// Inside a `plugins { }` block
    pub in_plugins: bool,
    /// Inside an `apply { }` block
    pub in_apply: bool,
}

/// Turns the text of one statement into a [`PluginRecord`]
#[derive(Debug)]
pub struct PluginExtractor {
    declarative: Option<Regex>,
    shorthand: Option<Regex>,
    bare: Option<Regex>,
    apply: Option<Regex>,
    plugin_call: Option<Regex>,
}

impl PluginExtractor {
    pub fn new() -> Self {
        Self {
            declarative: compile(&format!(r#"(?i)^id[(]?['"]([^:{{}}'"]*)['"][)]?{TAIL}$"#)),
            shorthand: compile(&format!(r#"(?i)^kotlin[(]['"]?([^:{{}}'"()]+)['"]?[)]{TAIL}$"#)),
            bare: compile(r#"^['"]?([A-Za-z_][\w.-]*)['"]?$"#),
            apply: compile(r#"(?i)^apply(?:[(]?plugin[=:]|[(]plugin[(])['"]([^:{}'"]*)['"][)]*$"#),
            plugin_call: compile(r#"(?i)^plugin[(]['"]([^:{}'"]*)['"][)]$"#),
        }
    }

    /// Shared extractor
    pub fn shared() -> &'static PluginExtractor {
        &DEFAULT_EXTRACTOR
    }

    /// Extract a plugin from raw statement text; `None` when no form matches
    pub fn extract(&self, raw: &str, context: PluginContext) -> Option<PluginRecord> {
        let text = strip_backticks(&strip_whitespace(raw));
        if text.is_empty() {
            return None;
        }

        if let Some(caps) = self.declarative.as_ref().and_then(|re| re.captures(&text)) {
            let id = non_empty(caps.get(1)?.as_str())?;
            return Some(
                PluginRecord::new(id)
                    .with_version(caps.get(2).map(|m| m.as_str().to_string()))
                    .with_applied(applied(caps.get(3).map(|m| m.as_str()))),
            );
        }

        if let Some(caps) = self.shorthand.as_ref().and_then(|re| re.captures(&text)) {
            let arg = non_empty(caps.get(1)?.as_str())?;
            return Some(
                PluginRecord::new(format!("{}.{}", KOTLIN_GROUP, arg))
                    .with_arg(arg)
                    .with_version(caps.get(2).map(|m| m.as_str().to_string()))
                    .with_applied(applied(caps.get(3).map(|m| m.as_str()))),
            );
        }

        if context.in_plugins {
            let bare = strip_backticks(raw.trim());
            let caps = self.bare.as_ref().and_then(|re| re.captures(&bare))?;
            return non_empty(caps.get(1)?.as_str()).map(PluginRecord::new);
        }

        if let Some(caps) = self.apply.as_ref().and_then(|re| re.captures(&text)) {
            return non_empty(caps.get(1)?.as_str()).map(PluginRecord::new);
        }

        if context.in_apply {
            let caps = self.plugin_call.as_ref().and_then(|re| re.captures(&text))?;
            return non_empty(caps.get(1)?.as_str()).map(PluginRecord::new);
        }

        None
    }
}

impl Default for PluginExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            debug!(%err, "plugin pattern failed to compile");
            None
        }
    }
}

fn non_empty(text: &str) -> Option<&str> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn applied(flag: Option<&str>) -> bool {
    !matches!(flag, Some(value) if value.eq_ignore_ascii_case("false"))
}

/// Reports plugins declared in `plugins { }` or applied imperatively
///
/// Only statement nodes are considered, so `id("x")` inside
/// `id("x") version "1"` is not reported a second time.
pub struct PluginAnalyzer {
    kinds: &'static [NodeKind],
}

impl PluginAnalyzer {
    /// Kotlin script binding
    pub fn kts() -> Self {
        Self {
            kinds: &[NodeKind::Call, NodeKind::Binary, NodeKind::Reference],
        }
    }

    /// Groovy script binding
    pub fn groovy() -> Self {
        Self {
            kinds: &[NodeKind::Command, NodeKind::MethodCall, NodeKind::Reference],
        }
    }
}

impl FactAnalyzer<PluginRecord> for PluginAnalyzer {
    fn node_kinds(&self) -> &[NodeKind] {
        self.kinds
    }

    fn analyze(&self, tree: &SyntaxTree, node: NodeId, scope: &ScopeStack) -> Option<PluginRecord> {
        if !tree.is_statement(node) {
            return None;
        }
        let context = PluginContext {
            in_plugins: scope.contains(ScopeTag::Plugins),
            in_apply: tree
                .ancestors(node)
                .any(|ancestor| tree.name(ancestor) == Some("apply")),
        };
        PluginExtractor::shared()
            .extract(tree.text(node), context)
            .map(|record| record.declared_globally(scope.contains(ScopeTag::AllProjects)))
    }
}
