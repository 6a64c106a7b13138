//! Analysis engine and run orchestration
//!
//! The engine walks one syntax tree once, keeping a [`scope::ScopeStack`] in
//! step with the blocks controllers recognise and feeding every node to the
//! analyzers registered for its kind. The walkers run the engine over whole
//! projects, one after another or in parallel.

pub mod aggregators;
pub mod analyzer;
pub mod controller;
pub mod parallel;
pub mod parallel_walker;
pub mod project;
pub mod scope;
pub mod traversal;
pub mod walker;

pub use aggregators::{Aggregator, FlatListAggregator, ListAggregator, MultisetAggregator, SetAggregator};
pub use analyzer::{AnalyzerResultMap, FactAnalyzer};
pub use controller::ScopeController;
pub use parallel_walker::ParallelWalker;
pub use project::{ProjectAnalyzer, ProjectOutcome};
pub use scope::{ScopeStack, ScopeTag};
pub use traversal::{analyze, MainAnalyzer};
pub use walker::Walker;
