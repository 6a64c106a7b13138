//! Data models and structures for gradle-facts

pub mod analysis;
pub mod config;
pub mod records;
pub mod syntax;

pub use analysis::{AnalysisError, AnalysisResults, AnalysisSummary, ProjectAnalysis};
pub use config::{AnalysisKind, OutputFormat, Settings};
pub use records::{DependencyRecord, GradleProperty, PluginRecord, ProjectTag};
pub use syntax::{NodeId, NodeKind, ScriptDialect, SyntaxNode, SyntaxTree, TreeBuilder};
