//! Ready-made extraction setups over one syntax tree
//!
//! Each setup registers the Kotlin and the Groovy bindings side by side. A
//! tree of one dialect never contains the node kinds of the other, so the
//! foreign binding stays idle.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::core::aggregators::{FlatListAggregator, ListAggregator, MultisetAggregator, SetAggregator};
use crate::core::analyzer::FactAnalyzer;
use crate::core::scope::ScopeStack;
use crate::core::traversal::MainAnalyzer;
use crate::error::Result;
use crate::gradle::blocks::BlockController;
use crate::gradle::dependencies::DependencyAnalyzer;
use crate::gradle::includes::IncludeAnalyzer;
use crate::gradle::plugins::PluginAnalyzer;
use crate::gradle::properties::PropertyAnalyzer;
use crate::gradle::vocabulary::ConfigurationKind;
use crate::models::records::{DependencyRecord, GradleProperty, PluginRecord};
use crate::models::syntax::{NodeId, NodeKind, SyntaxTree};

static DEPENDENCIES: Lazy<MainAnalyzer<DependencyRecord, SetAggregator>> = Lazy::new(|| {
    MainAnalyzer::new(SetAggregator)
        .with_analyzer(DependencyAnalyzer::kts())
        .with_analyzer(DependencyAnalyzer::groovy())
        .with_controller(BlockController::kts())
        .with_controller(BlockController::groovy())
});

static PLUGINS: Lazy<MainAnalyzer<PluginRecord, SetAggregator>> = Lazy::new(|| {
    MainAnalyzer::new(SetAggregator)
        .with_analyzer(PluginAnalyzer::kts())
        .with_analyzer(PluginAnalyzer::groovy())
        .with_controller(BlockController::kts())
        .with_controller(BlockController::groovy())
});

static INCLUDES: Lazy<MainAnalyzer<Vec<String>, FlatListAggregator<String>>> = Lazy::new(|| {
    MainAnalyzer::new(FlatListAggregator::new())
        .with_analyzer(IncludeAnalyzer::kts())
        .with_analyzer(IncludeAnalyzer::groovy())
});

static PROPERTIES: Lazy<MainAnalyzer<GradleProperty, ListAggregator>> =
    Lazy::new(|| MainAnalyzer::new(ListAggregator).with_analyzer(PropertyAnalyzer));

static CONFIGURATIONS: Lazy<MainAnalyzer<ConfigurationKind, MultisetAggregator>> = Lazy::new(|| {
    MainAnalyzer::new(MultisetAggregator)
        .with_analyzer(ConfigurationUsage(DependencyAnalyzer::kts()))
        .with_analyzer(ConfigurationUsage(DependencyAnalyzer::groovy()))
        .with_controller(BlockController::kts())
        .with_controller(BlockController::groovy())
});

/// Dependencies declared in a build script
pub fn extract_dependencies(tree: &SyntaxTree) -> Result<HashSet<DependencyRecord>> {
    DEPENDENCIES.run(tree)
}

/// Plugins declared or applied in a build script
///
/// A plugin declared in `plugins { }` whose id is also applied inside
/// `allprojects { }` counts as declared globally.
pub fn extract_plugins(tree: &SyntaxTree) -> Result<HashSet<PluginRecord>> {
    let plugins = PLUGINS.run(tree)?;
    let global: HashSet<String> = plugins
        .iter()
        .filter(|p| p.declared_globally)
        .map(|p| p.plugin_id.clone())
        .collect();
    Ok(plugins
        .into_iter()
        .map(|p| {
            let shared = global.contains(&p.plugin_id);
            p.declared_globally(shared)
        })
        .collect())
}

/// Module names from `include` statements, in order of appearance
pub fn extract_included_modules(tree: &SyntaxTree) -> Result<Vec<String>> {
    INCLUDES.run(tree)
}

/// Entries of a properties file, in file order
pub fn extract_properties(tree: &SyntaxTree) -> Result<Vec<GradleProperty>> {
    PROPERTIES.run(tree)
}

/// How many declarations use each configuration keyword
pub fn configuration_usage(tree: &SyntaxTree) -> Result<HashMap<ConfigurationKind, usize>> {
    CONFIGURATIONS.run(tree)
}

/// Reduces a dependency declaration to its configuration keyword
struct ConfigurationUsage(DependencyAnalyzer);

impl FactAnalyzer<ConfigurationKind> for ConfigurationUsage {
    fn node_kinds(&self) -> &[NodeKind] {
        self.0.node_kinds()
    }

    fn analyze(&self, tree: &SyntaxTree, node: NodeId, scope: &ScopeStack) -> Option<ConfigurationKind> {
        self.0.analyze(tree, node, scope)?.configuration
    }
}
