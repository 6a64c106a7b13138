//! Arena-backed syntax trees for Gradle build files
//!
//! Trees are immutable once built. Nodes are addressed by [`NodeId`], which is
//! an index into the arena; ids are handed out in pre-order, so comparing two
//! ids compares their document position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a node inside one [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of node kinds produced by the front-ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of a script or properties file
    Script,
    /// Kotlin call expression, `name(args) { lambda }`
    Call,
    /// Groovy method call with parentheses or a trailing closure
    MethodCall,
    /// Groovy paren-less command statement, `name arg, arg`
    Command,
    /// Braced block (lambda body or closure)
    Block,
    /// Parenthesised argument list
    Arguments,
    /// Infix expression, e.g. `id("x") version "1"`
    Binary,
    /// `lhs = rhs`, `lhs += rhs`
    Assignment,
    /// Bare identifier or dotted reference
    Reference,
    /// Quoted string
    StringLiteral,
    /// Numbers, booleans, null, property values
    Literal,
    /// `key=value` entry of a properties file
    Property,
    /// Anything the parser does not classify further
    Other,
}

/// Dialect of a Gradle script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptDialect {
    Groovy,
    Kotlin,
}

impl ScriptDialect {
    /// Pick the dialect from a file name (`.kts` means Kotlin)
    pub fn from_file_name(name: &str) -> Self {
        if name.ends_with(".kts") {
            ScriptDialect::Kotlin
        } else {
            ScriptDialect::Groovy
        }
    }
}

/// A single node of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Raw source text covered by the node
    pub text: String,
    /// Callee or key name, when the node has one
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Immutable tree of [`SyntaxNode`]s
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    dialect: Option<ScriptDialect>,
}

impl SyntaxTree {
    /// Root node (always the first allocated)
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].name.as_deref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// A statement is a node sitting directly in a block or the script root
    pub fn is_statement(&self, id: NodeId) -> bool {
        match self.parent(id) {
            Some(parent) => matches!(self.kind(parent), NodeKind::Block | NodeKind::Script),
            None => false,
        }
    }

    /// Ancestors of `id`, innermost first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn dialect(&self) -> Option<ScriptDialect> {
        self.dialect
    }
}

/// Incremental builder producing pre-order ids
///
/// ```
/// use gradle_facts::models::syntax::{NodeKind, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder.start_node(NodeKind::Script, None, "");
/// builder.leaf(NodeKind::Reference, Some("java"), "java");
/// builder.finish_node();
/// let tree = builder.build();
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
    open: Vec<NodeId>,
    dialect: Option<ScriptDialect>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: ScriptDialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    fn push(&mut self, kind: NodeKind, name: Option<&str>, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(SyntaxNode {
            kind,
            text: text.to_string(),
            name: name.map(str::to_string),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Open a node; subsequent nodes become its children until [`finish_node`](Self::finish_node)
    pub fn start_node(&mut self, kind: NodeKind, name: Option<&str>, text: &str) -> NodeId {
        let id = self.push(kind, name, text);
        self.open.push(id);
        id
    }

    /// Close the innermost open node
    pub fn finish_node(&mut self) {
        self.open.pop();
    }

    /// Add a childless node under the innermost open node
    pub fn leaf(&mut self, kind: NodeKind, name: Option<&str>, text: &str) -> NodeId {
        self.push(kind, name, text)
    }

    /// Finish building. An empty builder yields a tree with a lone Script root.
    pub fn build(mut self) -> SyntaxTree {
        if self.nodes.is_empty() {
            self.push(NodeKind::Script, None, "");
        }
        SyntaxTree {
            nodes: self.nodes,
            dialect: self.dialect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxTree {
        let mut b = TreeBuilder::new().with_dialect(ScriptDialect::Kotlin);
        b.start_node(NodeKind::Script, None, "dependencies { api(\"a:b:1\") }");
        b.start_node(NodeKind::Call, Some("dependencies"), "dependencies { api(\"a:b:1\") }");
        b.start_node(NodeKind::Block, None, "{ api(\"a:b:1\") }");
        b.start_node(NodeKind::Call, Some("api"), "api(\"a:b:1\")");
        b.start_node(NodeKind::Arguments, None, "(\"a:b:1\")");
        b.leaf(NodeKind::StringLiteral, None, "\"a:b:1\"");
        b.finish_node();
        b.finish_node();
        b.finish_node();
        b.finish_node();
        b.finish_node();
        b.build()
    }

    #[test]
    fn test_preorder_ids_and_links() {
        let tree = sample();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.root(), NodeId(0));
        assert_eq!(tree.children(NodeId(0)), &[NodeId(1)]);
        assert_eq!(tree.parent(NodeId(3)), Some(NodeId(2)));
        assert_eq!(tree.name(NodeId(3)), Some("api"));
        assert_eq!(tree.kind(NodeId(5)), NodeKind::StringLiteral);
        assert_eq!(tree.dialect(), Some(ScriptDialect::Kotlin));
    }

    #[test]
    fn test_is_statement() {
        let tree = sample();
        assert!(!tree.is_statement(NodeId(0)));
        assert!(tree.is_statement(NodeId(1)));
        assert!(!tree.is_statement(NodeId(2)));
        assert!(tree.is_statement(NodeId(3)));
        assert!(!tree.is_statement(NodeId(5)));
    }

    #[test]
    fn test_ancestors_innermost_first() {
        let tree = sample();
        let chain: Vec<NodeId> = tree.ancestors(NodeId(4)).collect();
        assert_eq!(chain, vec![NodeId(3), NodeId(2), NodeId(1), NodeId(0)]);
    }

    #[test]
    fn test_empty_builder_has_root() {
        let tree = TreeBuilder::new().build();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.kind(tree.root()), NodeKind::Script);
    }

    #[test]
    fn test_dialect_from_file_name() {
        assert_eq!(ScriptDialect::from_file_name("build.gradle.kts"), ScriptDialect::Kotlin);
        assert_eq!(ScriptDialect::from_file_name("settings.gradle"), ScriptDialect::Groovy);
    }
}
