//! Gradle-specific bindings of the analysis engine
//!
//! Controllers and analyzers for build and settings scripts, the pattern
//! extractors behind them, project discovery and module graph propagation.

pub mod blocks;
pub mod dependencies;
pub mod discovery;
pub mod includes;
pub mod modules;
pub mod pipelines;
pub mod plugins;
pub mod properties;
pub mod tagging;
pub mod text;
pub mod vocabulary;

pub use discovery::{discover_project, discover_projects, GradleProject, ProjectModule};
pub use modules::{
    build_module_graph, propagate_dependencies, DependencySource, GradleDependenciesCollector, ModuleDependencyIndex,
    ModulesGraph, ScriptDependencies,
};
pub use pipelines::{
    configuration_usage, extract_dependencies, extract_included_modules, extract_plugins, extract_properties,
};
pub use vocabulary::{ConfigurationKind, CONFIGURATIONS};
