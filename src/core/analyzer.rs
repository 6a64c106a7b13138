//! Fact analyzers and their per-traversal result storage

use std::collections::BTreeMap;

use crate::core::scope::ScopeStack;
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

/// Produces at most one fact of type `R` per node
///
/// The engine only calls [`analyze`](FactAnalyzer::analyze) for nodes whose
/// kind is listed in [`node_kinds`](FactAnalyzer::node_kinds). Implementations
/// read the scope snapshot but never change it.
pub trait FactAnalyzer<R> {
    /// Node kinds this analyzer reacts to
    fn node_kinds(&self) -> &[NodeKind];

    fn analyze(&self, tree: &SyntaxTree, node: NodeId, scope: &ScopeStack) -> Option<R>;
}

/// Facts recorded during one traversal, per analyzer and per node
///
/// Analyzers are addressed by their registration index. Nodes inside one
/// analyzer's map iterate in document order.
#[derive(Debug)]
pub struct AnalyzerResultMap<R> {
    per_analyzer: Vec<BTreeMap<NodeId, R>>,
}

impl<R> AnalyzerResultMap<R> {
    pub fn new(analyzers: usize) -> Self {
        Self {
            per_analyzer: (0..analyzers).map(|_| BTreeMap::new()).collect(),
        }
    }

    pub fn record(&mut self, analyzer: usize, node: NodeId, fact: R) {
        if let Some(map) = self.per_analyzer.get_mut(analyzer) {
            map.insert(node, fact);
        }
    }

    pub fn for_analyzer(&self, analyzer: usize) -> Option<&BTreeMap<NodeId, R>> {
        self.per_analyzer.get(analyzer)
    }

    pub fn analyzer_count(&self) -> usize {
        self.per_analyzer.len()
    }

    /// Total number of recorded facts
    pub fn len(&self) -> usize {
        self.per_analyzer.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(analyzer, node, fact)` in registration order, then document order
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId, &R)> {
        self.per_analyzer
            .iter()
            .enumerate()
            .flat_map(|(index, map)| map.iter().map(move |(node, fact)| (index, *node, fact)))
    }

    /// Drain every fact, in the same order as [`iter`](Self::iter)
    pub fn into_results(self) -> impl Iterator<Item = R> {
        self.per_analyzer.into_iter().flat_map(BTreeMap::into_values)
    }
}
