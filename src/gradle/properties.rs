//! `gradle.properties` entries

use crate::core::analyzer::FactAnalyzer;
use crate::core::scope::ScopeStack;
use crate::models::records::GradleProperty;
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

/// Yields one [`GradleProperty`] per `Property` node
#[derive(Debug, Default)]
pub struct PropertyAnalyzer;

impl FactAnalyzer<GradleProperty> for PropertyAnalyzer {
    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Property]
    }

    fn analyze(&self, tree: &SyntaxTree, node: NodeId, _scope: &ScopeStack) -> Option<GradleProperty> {
        let key = tree.name(node)?;
        let value = tree
            .children(node)
            .iter()
            .find(|child| tree.kind(**child) == NodeKind::Literal)
            .map(|child| tree.text(*child).to_string())
            .unwrap_or_default();
        Some(GradleProperty {
            key: key.to_string(),
            value,
        })
    }
}
