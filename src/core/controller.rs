//! Scope controllers open and close scopes as the walk enters and leaves nodes

use crate::core::scope::ScopeTag;
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

/// Classifies block-like nodes into a [`ScopeTag`]
///
/// Called once when the engine enters a node of a listed kind and again when
/// it leaves it. Both calls must agree for the scope stack to stay balanced.
pub trait ScopeController {
    fn node_kinds(&self) -> &[NodeKind];

    fn classify(&self, tree: &SyntaxTree, node: NodeId) -> Option<ScopeTag>;
}
