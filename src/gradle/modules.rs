//! Module include graph and inheritance of globally declared dependencies
//!
//! Modules are identified by their Gradle path, so two directories with the
//! same name in different parts of the tree stay apart. Edges run from the
//! module whose settings script includes a name to the module that name
//! resolves to. A module inherits every dependency its parents declared
//! inside `allprojects { }`, and nothing else from them.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{FactsError, OptionExt, Result};
use crate::gradle::discovery::ProjectModule;
use crate::gradle::pipelines;
use crate::models::records::DependencyRecord;
use crate::parsers::{SourceUnit, TreeProvider};

/// Effective dependencies per module, keyed by Gradle path
pub type ModuleDependencyIndex = BTreeMap<String, HashSet<DependencyRecord>>;

/// Modules of one project and their include edges
#[derive(Debug, Default)]
pub struct ModulesGraph {
    graph: DiGraph<ProjectModule, ()>,
    by_path: HashMap<String, NodeIndex>,
}

impl ModulesGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module; `false` if one with the same Gradle path is already present
    pub fn add_module(&mut self, module: ProjectModule) -> bool {
        if self.by_path.contains_key(&module.path) {
            return false;
        }
        let path = module.path.clone();
        let index = self.graph.add_node(module);
        self.by_path.insert(path, index);
        true
    }

    /// Add `parent -> child` if both resolve; returns whether an edge exists now
    ///
    /// `parent` is a Gradle path. `child` is an include name as written in
    /// the parent's settings script.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> bool {
        let Some(from) = self.by_path.get(parent).copied() else {
            return false;
        };
        let Some(to) = self.resolve(parent, child) else {
            return false;
        };
        if from == to {
            return false;
        }
        self.graph.update_edge(from, to, ());
        true
    }

    /// Resolve an include name: absolute Gradle path first, then the path
    /// below the including module, then a module name nobody else carries
    fn resolve(&self, parent: &str, reference: &str) -> Option<NodeIndex> {
        let relative = reference.trim_start_matches(':');
        if let Some(index) = self.by_path.get(&format!(":{relative}")) {
            return Some(*index);
        }
        if parent != ":" {
            if let Some(index) = self.by_path.get(&format!("{parent}:{relative}")) {
                return Some(*index);
            }
        }
        let mut named = self.graph.node_indices().filter(|i| self.graph[*i].name == relative);
        match (named.next(), named.next()) {
            (Some(index), None) => Some(index),
            (Some(_), Some(_)) => {
                debug!(include = %reference, "include name matches several modules");
                None
            }
            _ => None,
        }
    }

    /// Module at a Gradle path
    pub fn module(&self, path: &str) -> Option<&ProjectModule> {
        self.by_path.get(path).map(|i| &self.graph[*i])
    }

    /// Gradle paths in sorted order
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.by_path.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Paths of the modules that include `path`, sorted
    pub fn parents(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Incoming)
    }

    /// Paths of the modules included by `path`, sorted
    pub fn children(&self, path: &str) -> Vec<&str> {
        self.neighbors(path, Direction::Outgoing)
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<&str> {
        let Some(index) = self.by_path.get(path) else {
            return Vec::new();
        };
        let mut paths: Vec<&str> = self
            .graph
            .neighbors_directed(*index, direction)
            .map(|i| self.graph[i].path.as_str())
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Build the include graph of a project's modules
///
/// Settings scripts that cannot be parsed are skipped and returned with the
/// graph. Include names that match no module are not edges.
pub fn build_module_graph(
    modules: &[ProjectModule],
    provider: &dyn TreeProvider,
) -> Result<(ModulesGraph, Vec<(PathBuf, FactsError)>)> {
    let mut graph = ModulesGraph::new();
    let mut skipped = Vec::new();

    for module in modules {
        if !graph.add_module(module.clone()) {
            warn!(module = %module.path, root = %module.root.display(), "duplicate module path, keeping the first");
        }
    }

    for module in modules {
        let Some(settings_script) = &module.settings_script else {
            continue;
        };
        let Some(unit) = SourceUnit::from_path(settings_script) else {
            continue;
        };
        let included = match provider
            .parse(&unit)
            .and_then(|tree| pipelines::extract_included_modules(&tree))
        {
            Ok(names) => names,
            Err(err) if !err.is_critical() => {
                debug!(path = %settings_script.display(), %err, "settings script skipped");
                skipped.push((settings_script.clone(), err));
                continue;
            }
            Err(err) => return Err(err),
        };

        for name in included {
            if !graph.add_edge(&module.path, &name) {
                debug!(module = %module.path, include = %name, "include does not resolve to a module");
            }
        }
    }

    Ok((graph, skipped))
}

/// Where a module's own dependencies come from
pub trait DependencySource {
    fn dependencies(&self, module: &ProjectModule) -> Result<HashSet<DependencyRecord>>;
}

/// Dependencies extracted once per build script
#[derive(Debug, Default)]
pub struct ScriptDependencies {
    by_script: HashMap<PathBuf, HashSet<DependencyRecord>>,
}

impl ScriptDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every module's build script once
    ///
    /// Scripts that cannot be parsed are returned as issues and count as
    /// declaring nothing.
    pub fn collect(
        modules: &[ProjectModule],
        provider: &dyn TreeProvider,
    ) -> Result<(Self, Vec<(PathBuf, FactsError)>)> {
        let mut declared = Self::new();
        let mut issues = Vec::new();
        for script in modules.iter().filter_map(|m| m.build_script.as_ref()) {
            match SourceUnit::from_path(script)
                .ok_or_error(|| FactsError::parse_unavailable(script, "not a Gradle build script"))
                .and_then(|unit| provider.parse(&unit))
                .and_then(|tree| pipelines::extract_dependencies(&tree))
            {
                Ok(dependencies) => declared.insert(script.clone(), dependencies),
                Err(err) if !err.is_critical() => {
                    debug!(path = %script.display(), %err, "build script skipped");
                    issues.push((script.clone(), err));
                }
                Err(err) => return Err(err),
            }
        }
        Ok((declared, issues))
    }

    pub fn insert(&mut self, script: PathBuf, dependencies: HashSet<DependencyRecord>) {
        self.by_script.insert(script, dependencies);
    }

    pub fn get(&self, script: &Path) -> Option<&HashSet<DependencyRecord>> {
        self.by_script.get(script)
    }

    /// Every record of every script, duplicates included
    pub fn all(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.by_script.values().flatten()
    }
}

impl DependencySource for ScriptDependencies {
    // scripts that failed to parse were reported when parsing
    fn dependencies(&self, module: &ProjectModule) -> Result<HashSet<DependencyRecord>> {
        Ok(module
            .build_script
            .as_deref()
            .and_then(|script| self.get(script))
            .cloned()
            .unwrap_or_default())
    }
}

/// Memoised depth-first visitor filling a [`ModuleDependencyIndex`]
pub struct GradleDependenciesCollector<'a> {
    source: &'a dyn DependencySource,
    index: ModuleDependencyIndex,
    in_progress: Vec<String>,
    issues: Vec<(PathBuf, FactsError)>,
}

impl<'a> GradleDependenciesCollector<'a> {
    pub fn new(source: &'a dyn DependencySource) -> Self {
        Self {
            source,
            index: ModuleDependencyIndex::new(),
            in_progress: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Resolve the effective dependencies of the module at `path` and of all its ancestors
    ///
    /// A module reached again while its own visit is still running closes a
    /// cycle: the cycle is reported and the partial set resolved so far is
    /// what the caller inherits.
    pub fn visit_module(&mut self, graph: &ModulesGraph, path: &str) -> Result<()> {
        if let Some(start) = self.in_progress.iter().position(|p| p == path) {
            let mut cycle = self.in_progress[start..].to_vec();
            cycle.push(path.to_string());
            warn!(cycle = %cycle.join(" -> "), "module include cycle");
            let root = graph.module(path).map(|m| m.root.clone()).unwrap_or_default();
            self.issues.push((root, FactsError::ModuleCycle { cycle }));
            return Ok(());
        }
        if self.index.contains_key(path) {
            return Ok(());
        }
        let Some(module) = graph.module(path) else {
            return Ok(());
        };

        self.index.insert(path.to_string(), HashSet::new());
        self.in_progress.push(path.to_string());

        let own = match self.source.dependencies(module) {
            Ok(own) => own,
            Err(err) if !err.is_critical() => {
                debug!(module = %path, %err, "module dependencies unavailable");
                let location = module.build_script.clone().unwrap_or_else(|| module.root.clone());
                self.issues.push((location, err));
                HashSet::new()
            }
            Err(err) => {
                self.in_progress.pop();
                return Err(err);
            }
        };
        self.index.insert(path.to_string(), own);

        for parent in graph.parents(path) {
            if let Err(err) = self.visit_module(graph, parent) {
                self.in_progress.pop();
                return Err(err);
            }
            let inherited: Vec<DependencyRecord> = self
                .index
                .get(parent)
                .map(|deps| deps.iter().filter(|d| d.declared_globally).cloned().collect())
                .unwrap_or_default();
            if let Some(deps) = self.index.get_mut(path) {
                // records the module declares itself take precedence
                for record in inherited {
                    if !deps.contains(&record) {
                        deps.insert(record);
                    }
                }
            }
        }

        self.in_progress.pop();
        Ok(())
    }

    pub fn index(&self) -> &ModuleDependencyIndex {
        &self.index
    }

    pub fn into_parts(self) -> (ModuleDependencyIndex, Vec<(PathBuf, FactsError)>) {
        (self.index, self.issues)
    }
}

/// Effective dependencies of every module in the graph, keyed by Gradle path
pub fn propagate_dependencies(
    graph: &ModulesGraph,
    source: &dyn DependencySource,
) -> Result<(ModuleDependencyIndex, Vec<(PathBuf, FactsError)>)> {
    let mut collector = GradleDependenciesCollector::new(source);
    for path in graph.paths() {
        collector.visit_module(graph, path)?;
    }
    Ok(collector.into_parts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSeverity;
    use crate::gradle::vocabulary::ConfigurationKind;
    use std::cell::RefCell;

    /// In-memory source counting how often each module is asked for
    #[derive(Default)]
    struct StaticSource {
        declared: HashMap<String, Vec<DependencyRecord>>,
        visits: RefCell<HashMap<String, usize>>,
    }

    impl StaticSource {
        fn declare(mut self, module: &str, records: Vec<DependencyRecord>) -> Self {
            self.declared.insert(module.to_string(), records);
            self
        }

        fn visits(&self, module: &str) -> usize {
            self.visits.borrow().get(module).copied().unwrap_or(0)
        }
    }

    impl DependencySource for StaticSource {
        fn dependencies(&self, module: &ProjectModule) -> Result<HashSet<DependencyRecord>> {
            *self.visits.borrow_mut().entry(module.name.clone()).or_insert(0) += 1;
            Ok(self
                .declared
                .get(&module.name)
                .map(|records| records.iter().cloned().collect())
                .unwrap_or_default())
        }
    }

    fn graph(names: &[&str], edges: &[(&str, &str)]) -> ModulesGraph {
        let mut graph = ModulesGraph::new();
        for name in names {
            graph.add_module(ProjectModule::new(*name, format!(":{}", name), PathBuf::from(name)));
        }
        for (parent, child) in edges {
            assert!(graph.add_edge(&format!(":{parent}"), child));
        }
        graph
    }

    fn coordinates(index: &ModuleDependencyIndex, module: &str) -> Vec<String> {
        let mut coords: Vec<String> = index[&format!(":{module}")].iter().map(|d| d.coordinate()).collect();
        coords.sort();
        coords
    }

    #[test]
    fn test_only_global_dependencies_propagate() {
        let source = StaticSource::default().declare(
            "a",
            vec![
                DependencyRecord::new("g", "x").with_configuration(ConfigurationKind::Implementation),
                DependencyRecord::new("g", "y")
                    .with_configuration(ConfigurationKind::Classpath)
                    .declared_globally(true),
            ],
        );
        let graph = graph(&["a", "b"], &[("a", "b")]);

        let (index, issues) = propagate_dependencies(&graph, &source).unwrap();
        assert!(issues.is_empty());
        assert_eq!(coordinates(&index, "a"), vec!["g:x", "g:y"]);
        assert_eq!(coordinates(&index, "b"), vec!["g:y"]);
    }

    #[test]
    fn test_inheritance_is_transitive_through_global_records() {
        let source = StaticSource::default().declare("root", vec![DependencyRecord::new("g", "all").declared_globally(true)]);
        let graph = graph(&["root", "mid", "leaf"], &[("root", "mid"), ("mid", "leaf")]);

        let (index, _) = propagate_dependencies(&graph, &source).unwrap();
        assert_eq!(coordinates(&index, "leaf"), vec!["g:all"]);
    }

    #[test]
    fn test_diamond_visits_each_module_once() {
        let source = StaticSource::default()
            .declare("r", vec![DependencyRecord::new("g", "shared").declared_globally(true)])
            .declare("a", vec![DependencyRecord::new("g", "from-a").declared_globally(true)])
            .declare("b", vec![DependencyRecord::new("g", "local-b")]);
        let graph = graph(&["r", "a", "b", "c"], &[("r", "a"), ("r", "b"), ("a", "c"), ("b", "c")]);

        let mut collector = GradleDependenciesCollector::new(&source);
        collector.visit_module(&graph, ":c").unwrap();
        collector.visit_module(&graph, ":a").unwrap();
        collector.visit_module(&graph, ":r").unwrap();
        for module in ["r", "a", "b", "c"] {
            assert_eq!(source.visits(module), 1, "{module} visited more than once");
        }

        let (from_leaf, _) = collector.into_parts();
        assert_eq!(coordinates(&from_leaf, "c"), vec!["g:from-a", "g:shared"]);

        let (from_root, _) = propagate_dependencies(&graph, &StaticSource {
            declared: source.declared.clone(),
            visits: RefCell::default(),
        })
        .unwrap();
        assert_eq!(from_leaf, from_root);
    }

    #[test]
    fn test_own_declaration_wins_over_inherited() {
        let source = StaticSource::default()
            .declare("p", vec![DependencyRecord::new("g", "x").with_version(Some("2".to_string())).declared_globally(true)])
            .declare("c", vec![DependencyRecord::new("g", "x").with_version(Some("1".to_string()))]);
        let graph = graph(&["p", "c"], &[("p", "c")]);

        let (index, _) = propagate_dependencies(&graph, &source).unwrap();
        let records: Vec<_> = index[":c"].iter().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].version.as_deref(), Some("1"));
        assert!(!records[0].declared_globally);
    }

    #[test]
    fn test_cycle_is_reported_and_terminates() {
        let source = StaticSource::default()
            .declare("a", vec![DependencyRecord::new("g", "a").declared_globally(true)])
            .declare("b", vec![DependencyRecord::new("g", "b").declared_globally(true)]);
        let graph = graph(&["a", "b"], &[("a", "b"), ("b", "a")]);

        let (index, issues) = propagate_dependencies(&graph, &source).unwrap();
        assert_eq!(issues.len(), 1);
        match &issues[0].1 {
            FactsError::ModuleCycle { cycle } => assert_eq!(cycle, &vec![":a", ":b", ":a"]),
            other => panic!("unexpected issue: {other:?}"),
        }
        assert_eq!(issues[0].1.severity(), ErrorSeverity::Warning);
        assert_eq!(coordinates(&index, "a"), vec!["g:a", "g:b"]);
        assert_eq!(coordinates(&index, "b"), vec!["g:a", "g:b"]);
        assert_eq!(source.visits("a"), 1);
        assert_eq!(source.visits("b"), 1);
    }

    #[test]
    fn test_edges_resolve_by_path_then_unique_name() {
        let mut graph = ModulesGraph::new();
        graph.add_module(ProjectModule::new("demo", ":", "demo"));
        graph.add_module(ProjectModule::new("data", ":core:data", "demo/core/data"));
        graph.add_module(ProjectModule::new("ui", ":core:ui", "demo/core/ui"));
        graph.add_module(ProjectModule::new("api", ":core:api", "demo/core/api"));
        graph.add_module(ProjectModule::new("api", ":feature:api", "demo/feature/api"));
        assert!(!graph.add_module(ProjectModule::new("data", ":core:data", "elsewhere")));

        assert!(graph.add_edge(":", "core:data"));
        assert!(graph.add_edge(":", ":core:data"));
        assert!(graph.add_edge(":core:data", "ui"));
        assert!(!graph.add_edge(":", "api"));
        assert!(graph.add_edge(":", "feature:api"));
        assert!(!graph.add_edge(":", "missing"));
        assert!(!graph.add_edge(":", "demo"));
        assert!(!graph.add_edge(":nowhere", "core:data"));

        assert_eq!(graph.children(":"), vec![":core:data", ":feature:api"]);
        assert_eq!(graph.parents(":core:ui"), vec![":core:data"]);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.len(), 5);
    }

    #[test]
    fn test_modules_sharing_a_name_stay_apart() {
        let mut graph = ModulesGraph::new();
        graph.add_module(ProjectModule::new("demo", ":", "demo"));
        graph.add_module(ProjectModule::new("api", ":core:api", "demo/core/api"));
        graph.add_module(ProjectModule::new("api", ":feature:api", "demo/feature/api"));
        assert!(graph.add_edge(":", "core:api"));
        assert!(graph.add_edge(":", "feature:api"));

        let mut source = StaticSource::default();
        source.declared.insert("demo".to_string(), vec![DependencyRecord::new("g", "root").declared_globally(true)]);
        let by_path: HashMap<&str, DependencyRecord> = HashMap::from([
            (":core:api", DependencyRecord::new("c", "core-only")),
            (":feature:api", DependencyRecord::new("f", "feature-only")),
        ]);

        struct ByPath<'a> {
            inner: StaticSource,
            by_path: HashMap<&'a str, DependencyRecord>,
        }
        impl DependencySource for ByPath<'_> {
            fn dependencies(&self, module: &ProjectModule) -> Result<HashSet<DependencyRecord>> {
                let mut own = self.inner.dependencies(module)?;
                own.extend(self.by_path.get(module.path.as_str()).cloned());
                Ok(own)
            }
        }

        let source = ByPath { inner: source, by_path };
        let (index, issues) = propagate_dependencies(&graph, &source).unwrap();
        assert!(issues.is_empty());
        assert_eq!(index.len(), 3);
        assert_eq!(coordinates(&index, "core:api"), vec!["c:core-only", "g:root"]);
        assert_eq!(coordinates(&index, "feature:api"), vec!["f:feature-only", "g:root"]);
    }
}
