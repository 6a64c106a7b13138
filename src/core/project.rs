//! Per-project analysis
//!
//! Runs the enabled analyses over one Gradle project. Every build script is
//! parsed once; the trees feed the dependency, plugin, usage and tag
//! analyses, and the per-script dependency sets feed module propagation.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{handle_error, FactsError, Result};
use crate::gradle::discovery::{discover_project, GradleProject};
use crate::gradle::modules::{build_module_graph, propagate_dependencies, ScriptDependencies};
use crate::gradle::pipelines;
use crate::gradle::tagging::tag_project;
use crate::models::analysis::{AnalysisResults, ProjectAnalysis};
use crate::models::config::{AnalysisKind, Settings};
use crate::models::records::DependencyRecord;
use crate::models::syntax::SyntaxTree;
use crate::parsers::{SourceUnit, TreeProvider};

/// Result of analyzing one project
#[derive(Debug)]
pub struct ProjectOutcome {
    pub analysis: ProjectAnalysis,
    /// Declarations per configuration keyword
    pub configuration_usage: HashMap<String, usize>,
    /// Units skipped and diagnostics raised on the way
    pub issues: Vec<(PathBuf, FactsError)>,
}

impl ProjectOutcome {
    /// Fold this outcome into the run results
    pub fn merge_into(self, results: &mut AnalysisResults) {
        for (path, err) in &self.issues {
            results.add_error(path.clone(), err);
        }
        results.summary.add_configuration_usage(self.configuration_usage);
        results.add_project(self.analysis);
    }
}

/// Record a failed project; a critical error is handed back to abort the run
pub fn record_failure(results: &mut AnalysisResults, root: &Path, err: FactsError) -> Result<()> {
    results.add_error(root.to_path_buf(), &err);
    match handle_error(err) {
        Some(critical) => Err(critical),
        None => Ok(()),
    }
}

/// Analyzes single projects with the given settings
pub struct ProjectAnalyzer<'a> {
    settings: &'a Settings,
    provider: &'a dyn TreeProvider,
}

impl<'a> ProjectAnalyzer<'a> {
    pub fn new(settings: &'a Settings, provider: &'a dyn TreeProvider) -> Self {
        Self { settings, provider }
    }

    /// Discover and analyze the project rooted at `root`
    pub fn analyze(&self, root: &Path) -> Result<ProjectOutcome> {
        let (project, issues) = discover_project(root, self.settings)?;
        self.analyze_project(&project, issues)
    }

    /// Analyze an already discovered project
    pub fn analyze_project(
        &self,
        project: &GradleProject,
        mut issues: Vec<(PathBuf, FactsError)>,
    ) -> Result<ProjectOutcome> {
        let mut analysis = ProjectAnalysis::new(&project.name, project.root.clone());
        analysis.module_count = project.modules.len();

        let scripts = self.parse_all(project.build_scripts(), &mut issues);
        let mut declared = ScriptDependencies::new();
        for (path, tree) in &scripts {
            declared.insert(path.clone(), pipelines::extract_dependencies(tree)?);
        }

        if self.settings.is_enabled(AnalysisKind::Dependencies) {
            let all: HashSet<DependencyRecord> = declared.all().cloned().collect();
            analysis.set_dependencies(all);
        }

        if self.settings.is_enabled(AnalysisKind::Modules) {
            let (graph, skipped) = build_module_graph(&project.modules, self.provider)?;
            issues.extend(skipped);
            let (index, propagation_issues) = propagate_dependencies(&graph, &declared)?;
            issues.extend(propagation_issues);
            for (path, dependencies) in index {
                let name = graph.module(&path).map(|m| m.name.clone()).unwrap_or_else(|| path.clone());
                analysis.set_module_dependencies(path, name, dependencies);
            }
        }

        if self.settings.is_enabled(AnalysisKind::Plugins) {
            let mut plugins = HashSet::new();
            for (_, tree) in &scripts {
                plugins.extend(pipelines::extract_plugins(tree)?);
            }
            analysis.set_plugins(plugins);
        }

        if self.settings.is_enabled(AnalysisKind::Properties) {
            let files = self.parse_all(project.property_files.iter().map(PathBuf::as_path), &mut issues);
            for (_, tree) in &files {
                analysis.properties.extend(pipelines::extract_properties(tree)?);
            }
        }

        if self.settings.is_enabled(AnalysisKind::Tags) {
            let root_dependencies = project
                .root_module()
                .and_then(|m| m.build_script.as_ref())
                .and_then(|script| declared.get(script));
            analysis.tags = vec![tag_project(root_dependencies.into_iter().flatten())];
        }

        let mut configuration_usage = HashMap::new();
        for (_, tree) in &scripts {
            for (kind, count) in pipelines::configuration_usage(tree)? {
                *configuration_usage.entry(kind.key().to_string()).or_insert(0) += count;
            }
        }

        info!(
            project = %analysis.name,
            modules = analysis.module_count,
            dependencies = analysis.dependencies.len(),
            plugins = analysis.plugins.len(),
            issues = issues.len(),
            "project analyzed"
        );

        Ok(ProjectOutcome {
            analysis,
            configuration_usage,
            issues,
        })
    }

    /// Parse every file, setting aside the ones that cannot be parsed
    fn parse_all<'p>(
        &self,
        paths: impl Iterator<Item = &'p Path>,
        issues: &mut Vec<(PathBuf, FactsError)>,
    ) -> Vec<(PathBuf, SyntaxTree)> {
        let mut trees = Vec::new();
        for path in paths {
            let Some(unit) = SourceUnit::from_path(path) else {
                continue;
            };
            match self.provider.parse(&unit) {
                Ok(tree) => trees.push((unit.path, tree)),
                Err(err) => {
                    debug!(path = %path.display(), %err, "source unit skipped");
                    issues.push((unit.path, err));
                }
            }
        }
        trees
    }
}
