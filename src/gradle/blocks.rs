//! Controllers recognising `dependencies`, `plugins`, `allprojects` and
//! `repositories` blocks by the callee name

use crate::core::controller::ScopeController;
use crate::core::scope::ScopeTag;
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

pub struct BlockController {
    kinds: &'static [NodeKind],
}

impl BlockController {
    /// Kotlin: `dependencies { }` is a call with a trailing lambda
    pub fn kts() -> Self {
        Self {
            kinds: &[NodeKind::Call],
        }
    }

    /// Groovy: `dependencies { }` is a method call with a closure
    pub fn groovy() -> Self {
        Self {
            kinds: &[NodeKind::MethodCall],
        }
    }
}

impl ScopeController for BlockController {
    fn node_kinds(&self) -> &[NodeKind] {
        self.kinds
    }

    fn classify(&self, tree: &SyntaxTree, node: NodeId) -> Option<ScopeTag> {
        // only calls carrying a block open a scope
        let has_block = tree
            .children(node)
            .iter()
            .any(|child| tree.kind(*child) == NodeKind::Block);
        if !has_block {
            return None;
        }
        tree.name(node).and_then(ScopeTag::from_simple_name)
    }
}
