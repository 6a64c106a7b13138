//! Single-pass depth-first traversal
//!
//! For every node the engine:
//! 1. lets controllers (in registration order) open scopes,
//! 2. runs the analyzers whose kind filter matches, passing the scope stack,
//! 3. visits the children in document order,
//! 4. lets controllers (in reverse order) close their scopes.
//!
//! The collected facts are handed to an [`Aggregator`] once the root has been
//! left. Nothing survives between two calls.

use tracing::trace;

use crate::core::aggregators::Aggregator;
use crate::core::analyzer::{AnalyzerResultMap, FactAnalyzer};
use crate::core::controller::ScopeController;
use crate::core::scope::ScopeStack;
use crate::error::{FactsError, Result};
use crate::models::syntax::{NodeId, SyntaxTree};

/// Walk `tree` once and aggregate what the analyzers found
pub fn analyze<R, A>(
    tree: &SyntaxTree,
    analyzers: &[&dyn FactAnalyzer<R>],
    controllers: &[&dyn ScopeController],
    aggregator: &A,
) -> Result<A::Output>
where
    A: Aggregator<R> + ?Sized,
{
    let mut walk = Walk {
        tree,
        analyzers,
        controllers,
        scope: ScopeStack::new(),
        results: AnalyzerResultMap::new(analyzers.len()),
    };

    walk.run(tree.root())?;

    if let Some(open) = walk.scope.top() {
        return Err(FactsError::UnbalancedScope { open });
    }

    trace!(nodes = tree.len(), facts = walk.results.len(), "traversal finished");
    Ok(aggregator.aggregate(walk.results))
}

struct Walk<'t, 'a, R> {
    tree: &'t SyntaxTree,
    analyzers: &'a [&'a dyn FactAnalyzer<R>],
    controllers: &'a [&'a dyn ScopeController],
    scope: ScopeStack,
    results: AnalyzerResultMap<R>,
}

enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

impl<R> Walk<'_, '_, R> {
    /// Depth-first walk on an explicit stack so tree depth never touches the call stack
    fn run(&mut self, root: NodeId) -> Result<()> {
        let mut steps = vec![Step::Enter(root)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(node) => {
                    self.enter(node);
                    steps.push(Step::Leave(node));
                    steps.extend(self.tree.children(node).iter().rev().map(|&c| Step::Enter(c)));
                }
                Step::Leave(node) => self.leave(node)?,
            }
        }
        Ok(())
    }

    fn enter(&mut self, node: NodeId) {
        let kind = self.tree.kind(node);

        for controller in self.controllers {
            if controller.node_kinds().contains(&kind) {
                if let Some(tag) = controller.classify(self.tree, node) {
                    self.scope.push(tag);
                }
            }
        }

        for (index, analyzer) in self.analyzers.iter().enumerate() {
            if analyzer.node_kinds().contains(&kind) {
                if let Some(fact) = analyzer.analyze(self.tree, node, &self.scope) {
                    self.results.record(index, node, fact);
                }
            }
        }
    }

    fn leave(&mut self, node: NodeId) -> Result<()> {
        let kind = self.tree.kind(node);

        for controller in self.controllers.iter().rev() {
            if controller.node_kinds().contains(&kind) {
                if let Some(tag) = controller.classify(self.tree, node) {
                    self.scope.pop(tag)?;
                }
            }
        }

        Ok(())
    }
}

/// Owned bundle of analyzers, controllers and an aggregator
///
/// Lets a fixed extraction setup be built once and run over many trees.
pub struct MainAnalyzer<R, A> {
    analyzers: Vec<Box<dyn FactAnalyzer<R> + Send + Sync>>,
    controllers: Vec<Box<dyn ScopeController + Send + Sync>>,
    aggregator: A,
}

impl<R, A: Aggregator<R>> MainAnalyzer<R, A> {
    pub fn new(aggregator: A) -> Self {
        Self {
            analyzers: Vec::new(),
            controllers: Vec::new(),
            aggregator,
        }
    }

    pub fn with_analyzer(mut self, analyzer: impl FactAnalyzer<R> + Send + Sync + 'static) -> Self {
        self.analyzers.push(Box::new(analyzer));
        self
    }

    pub fn with_controller(mut self, controller: impl ScopeController + Send + Sync + 'static) -> Self {
        self.controllers.push(Box::new(controller));
        self
    }

    pub fn run(&self, tree: &SyntaxTree) -> Result<A::Output> {
        let analyzers: Vec<&dyn FactAnalyzer<R>> = self
            .analyzers
            .iter()
            .map(|a| a.as_ref() as &dyn FactAnalyzer<R>)
            .collect();
        let controllers: Vec<&dyn ScopeController> = self
            .controllers
            .iter()
            .map(|c| c.as_ref() as &dyn ScopeController)
            .collect();

        analyze(tree, &analyzers, &controllers, &self.aggregator)
    }
}
