//! Lexical scope tracking for configuration blocks
//!
//! The [`ScopeStack`] mirrors the chain of recognised blocks from the tree
//! root to the node being visited. It is only mutated by the traversal
//! engine when entering or leaving a node a controller classified.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FactsError, Result};

/// Kinds of configuration block the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeTag {
    Dependencies,
    Plugins,
    AllProjects,
    Repositories,
}

impl ScopeTag {
    /// Map a block's simple name (`dependencies { }`) to its tag
    pub fn from_simple_name(name: &str) -> Option<ScopeTag> {
        match name.to_ascii_lowercase().as_str() {
            "dependencies" => Some(ScopeTag::Dependencies),
            "plugins" => Some(ScopeTag::Plugins),
            "allprojects" => Some(ScopeTag::AllProjects),
            "repositories" => Some(ScopeTag::Repositories),
            _ => None,
        }
    }

    pub fn simple_name(&self) -> &'static str {
        match self {
            ScopeTag::Dependencies => "dependencies",
            ScopeTag::Plugins => "plugins",
            ScopeTag::AllProjects => "allprojects",
            ScopeTag::Repositories => "repositories",
        }
    }
}

impl fmt::Display for ScopeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Open scopes, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeStack {
    tags: Vec<ScopeTag>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: ScopeTag) {
        self.tags.push(tag);
    }

    /// Close `tag`, which must be the innermost open scope
    pub fn pop(&mut self, tag: ScopeTag) -> Result<()> {
        match self.tags.last() {
            Some(top) if *top == tag => {
                self.tags.pop();
                Ok(())
            }
            found => Err(FactsError::ScopeIntegrity {
                expected: tag,
                found: found.copied(),
            }),
        }
    }

    /// Whether any open scope, not only the innermost, has this tag
    pub fn contains(&self, tag: ScopeTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn top(&self) -> Option<ScopeTag> {
        self.tags.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeTag> {
        self.tags.iter()
    }
}
