//! Dependency declarations inside `dependencies { }` blocks
//!
//! The extractor works on the whitespace-free text of one call and tries
//! three shapes in order:
//!
//! | form       | example                                              |
//! |------------|------------------------------------------------------|
//! | positional | `implementation("com.google.code.gson:gson:2.8.7")`  |
//! | named      | `testCompile group: 'junit', name: 'junit'`          |
//! | kotlin     | `classpath(kotlin("gradle-plugin", "1.5.20"))`       |

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::sync::Arc;
use tracing::debug;

use crate::core::analyzer::FactAnalyzer;
use crate::core::scope::{ScopeStack, ScopeTag};
use crate::gradle::text::{call_text, strip_whitespace};
use crate::gradle::vocabulary::{
    ConfigurationKind, CONFIGURATIONS, KOTLIN_ARTIFACT_PREFIX, KOTLIN_GROUP,
};
use crate::models::records::DependencyRecord;
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

const NAME: &str = r#"([^:{}'"]*)"#;
const QUOTE: &str = r#"['"]"#;
const SEP: &str = r#"['":,]+"#;

static DEFAULT_EXTRACTOR: Lazy<Arc<DependencyExtractor>> =
    Lazy::new(|| Arc::new(DependencyExtractor::new(CONFIGURATIONS)));

/// Turns the text of a single call into a [`DependencyRecord`]
#[derive(Debug)]
pub struct DependencyExtractor {
    positional: Option<Regex>,
    named: Option<Regex>,
    kotlin: Option<Regex>,
}

impl DependencyExtractor {
    /// Build the patterns for the given configuration keywords
    pub fn new(vocabulary: &[ConfigurationKind]) -> Self {
        let keys = vocabulary
            .iter()
            .map(|kind| regex::escape(kind.key()))
            .collect::<Vec<_>>()
            .join("|");

        let positional = format!(
            r"(?i)^({keys})[(]?{QUOTE}{NAME}{SEP}{NAME}(?:{SEP}{NAME})?{QUOTE}[)]?$"
        );
        let named = format!(
            r"(?i)^({keys})[(]?group[=:]{QUOTE}{NAME}{QUOTE},name[=:]{QUOTE}{NAME}{QUOTE}(?:,version[=:]{QUOTE}{NAME}{QUOTE})?[)]?$"
        );
        let kotlin = format!(
            r"(?i)^({keys})[(]?kotlin[(]{QUOTE}{NAME}{QUOTE}(?:,(?:version=)?{QUOTE}{NAME}{QUOTE})?.*[)]?[)]?$"
        );

        Self {
            positional: compile(&positional),
            named: compile(&named),
            kotlin: compile(&kotlin),
        }
    }

    /// Shared extractor over the default vocabulary
    pub fn shared() -> Arc<DependencyExtractor> {
        Arc::clone(&DEFAULT_EXTRACTOR)
    }

    /// Extract a record from raw call text; `None` when no form matches
    pub fn extract(&self, text: &str) -> Option<DependencyRecord> {
        let text = strip_whitespace(text);

        if let Some(caps) = self.positional.as_ref().and_then(|re| re.captures(&text)) {
            return coordinates(&caps);
        }
        if let Some(caps) = self.named.as_ref().and_then(|re| re.captures(&text)) {
            return coordinates(&caps);
        }
        if let Some(caps) = self.kotlin.as_ref().and_then(|re| re.captures(&text)) {
            let configuration = ConfigurationKind::from_key(caps.get(1)?.as_str())?;
            let artifact = caps.get(2)?.as_str();
            if artifact.is_empty() {
                return None;
            }
            return Some(
                DependencyRecord::new(KOTLIN_GROUP, format!("{}{}", KOTLIN_ARTIFACT_PREFIX, artifact))
                    .with_version(caps.get(3).map(|m| m.as_str().to_string()))
                    .with_configuration(configuration),
            );
        }
        None
    }
}

impl Default for DependencyExtractor {
    fn default() -> Self {
        Self::new(CONFIGURATIONS)
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            debug!(%err, "dependency pattern failed to compile");
            None
        }
    }
}

/// Record from `(keyword, group, artifact, version?)` captures
fn coordinates(caps: &Captures<'_>) -> Option<DependencyRecord> {
    let configuration = ConfigurationKind::from_key(caps.get(1)?.as_str())?;
    let group = caps.get(2)?.as_str();
    let artifact = caps.get(3)?.as_str();
    if group.is_empty() || artifact.is_empty() {
        return None;
    }
    Some(
        DependencyRecord::new(group, artifact)
            .with_version(caps.get(4).map(|m| m.as_str().to_string()))
            .with_configuration(configuration),
    )
}

/// Reports dependencies declared in a `dependencies` block
pub struct DependencyAnalyzer {
    kinds: &'static [NodeKind],
    extractor: Arc<DependencyExtractor>,
}

impl DependencyAnalyzer {
    /// Kotlin script binding
    pub fn kts() -> Self {
        Self::with_kinds(&[NodeKind::Call])
    }

    /// Groovy script binding
    pub fn groovy() -> Self {
        Self::with_kinds(&[NodeKind::Command, NodeKind::MethodCall])
    }

    pub fn with_kinds(kinds: &'static [NodeKind]) -> Self {
        Self {
            kinds,
            extractor: DependencyExtractor::shared(),
        }
    }
}

impl FactAnalyzer<DependencyRecord> for DependencyAnalyzer {
    fn node_kinds(&self) -> &[NodeKind] {
        self.kinds
    }

    fn analyze(&self, tree: &SyntaxTree, node: NodeId, scope: &ScopeStack) -> Option<DependencyRecord> {
        if !scope.contains(ScopeTag::Dependencies) {
            return None;
        }
        self.extractor
            .extract(call_text(tree, node))
            .map(|record| record.declared_globally(scope.contains(ScopeTag::AllProjects)))
    }
}
