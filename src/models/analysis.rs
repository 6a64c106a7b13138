//! Analysis result structures

use crate::error::{ErrorSeverity, FactsError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use super::records::{DependencyRecord, GradleProperty, PluginRecord, ProjectTag};

/// Facts collected for a single Gradle project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub name: String,
    pub path: PathBuf,
    /// Number of modules discovered in the project
    pub module_count: usize,
    /// Dependencies declared anywhere in the project, deduplicated
    pub dependencies: Vec<DependencyRecord>,
    /// Effective dependencies per module, keyed by Gradle path
    pub module_dependencies: BTreeMap<String, ModuleDependencies>,
    pub plugins: Vec<PluginRecord>,
    pub properties: Vec<GradleProperty>,
    pub tags: Vec<ProjectTag>,
    pub analysis_date: chrono::DateTime<chrono::Utc>,
}

impl ProjectAnalysis {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            module_count: 0,
            dependencies: Vec::new(),
            module_dependencies: BTreeMap::new(),
            plugins: Vec::new(),
            properties: Vec::new(),
            tags: Vec::new(),
            analysis_date: chrono::Utc::now(),
        }
    }

    /// Store project-wide dependencies in a stable order
    pub fn set_dependencies(&mut self, dependencies: impl IntoIterator<Item = DependencyRecord>) {
        let mut dependencies: Vec<_> = dependencies.into_iter().collect();
        dependencies.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.dependencies = dependencies;
    }

    /// Store one module's effective dependencies in a stable order
    pub fn set_module_dependencies(
        &mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        dependencies: impl IntoIterator<Item = DependencyRecord>,
    ) {
        let mut dependencies: Vec<_> = dependencies.into_iter().collect();
        dependencies.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.module_dependencies.insert(
            path.into(),
            ModuleDependencies {
                name: name.into(),
                dependencies,
            },
        );
    }

    /// Store plugins in a stable order
    pub fn set_plugins(&mut self, plugins: impl IntoIterator<Item = PluginRecord>) {
        let mut plugins: Vec<_> = plugins.into_iter().collect();
        plugins.sort_by(|a, b| {
            (&a.plugin_id, &a.version, a.declared_globally).cmp(&(&b.plugin_id, &b.version, b.declared_globally))
        });
        self.plugins = plugins;
    }

    pub fn is_android(&self) -> bool {
        self.tags.contains(&ProjectTag::Android)
    }
}

/// Effective dependencies of one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDependencies {
    /// Directory name, as shown in reports
    pub name: String,
    pub dependencies: Vec<DependencyRecord>,
}

/// Collection of all analysis results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub projects: Vec<ProjectAnalysis>,
    pub summary: AnalysisSummary,
    pub errors: Vec<AnalysisError>,
}

impl AnalysisResults {
    /// Create a new empty AnalysisResults instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project analysis to the results
    pub fn add_project(&mut self, project: ProjectAnalysis) {
        self.summary.update_with_project(&project);
        self.projects.push(project);
    }

    /// Add an error to the results
    pub fn add_error(&mut self, path: PathBuf, error: &FactsError) {
        let analysis_error = AnalysisError {
            path,
            error: error.user_message(),
            severity: error.severity(),
        };

        self.summary.update_with_error(&analysis_error);
        self.errors.push(analysis_error);
    }

    /// Set the scan duration in the summary
    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.summary.scan_duration = duration;
    }

    /// Order projects by name so output does not depend on scheduling
    pub fn sort(&mut self) {
        self.projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        self.errors.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.error.cmp(&b.error)));
    }

    /// Get critical errors that occurred during analysis
    pub fn critical_errors(&self) -> Vec<&AnalysisError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ErrorSeverity::Critical)
            .collect()
    }

    /// Check if there were any critical errors
    pub fn has_critical_errors(&self) -> bool {
        self.errors.iter().any(|e| e.severity == ErrorSeverity::Critical)
    }

    /// Highest severity recorded, if any error was recorded
    pub fn worst_severity(&self) -> Option<ErrorSeverity> {
        let rank = |s: ErrorSeverity| match s {
            ErrorSeverity::Warning => 0,
            ErrorSeverity::Error => 1,
            ErrorSeverity::Critical => 2,
        };
        self.errors.iter().map(|e| e.severity).max_by_key(|s| rank(*s))
    }
}

/// Summary statistics from analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_projects: usize,
    pub total_modules: usize,
    pub total_dependencies: usize,
    pub total_plugins: usize,
    pub total_properties: usize,
    pub android_projects: usize,
    /// How often each dependency configuration was used across all projects
    pub configuration_usage: BTreeMap<String, usize>,
    pub scan_duration: Duration,
    pub errors_encountered: usize,
    pub warnings_count: usize,
    pub critical_errors_count: usize,
}

impl AnalysisSummary {
    /// Update the summary with a project analysis
    pub fn update_with_project(&mut self, project: &ProjectAnalysis) {
        self.total_projects += 1;
        self.total_modules += project.module_count;
        self.total_dependencies += project.dependencies.len();
        self.total_plugins += project.plugins.len();
        self.total_properties += project.properties.len();
        if project.is_android() {
            self.android_projects += 1;
        }
    }

    /// Fold configuration usage counts into the summary
    pub fn add_configuration_usage(&mut self, counts: HashMap<String, usize>) {
        for (key, count) in counts {
            *self.configuration_usage.entry(key).or_insert(0) += count;
        }
    }

    /// Update error statistics based on an error
    pub fn update_with_error(&mut self, error: &AnalysisError) {
        self.errors_encountered += 1;
        match error.severity {
            ErrorSeverity::Warning => self.warnings_count += 1,
            ErrorSeverity::Critical => self.critical_errors_count += 1,
            ErrorSeverity::Error => {}
        }
    }

    /// Format the scan duration as a human-readable string
    pub fn format_duration(&self) -> String {
        let secs = self.scan_duration.as_secs();
        let millis = self.scan_duration.subsec_millis();

        if secs == 0 {
            format!("{}ms", millis)
        } else if secs < 60 {
            format!("{}.{:03}s", secs, millis)
        } else {
            let mins = secs / 60;
            let secs = secs % 60;
            format!("{}m {}s", mins, secs)
        }
    }
}

/// Error that occurred during analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisError {
    pub path: PathBuf,
    pub error: String,
    pub severity: ErrorSeverity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradle::vocabulary::ConfigurationKind;

    #[test]
    fn test_add_project_updates_summary() {
        let mut project = ProjectAnalysis::new("demo", PathBuf::from("/tmp/demo"));
        project.module_count = 3;
        project.set_dependencies(vec![
            DependencyRecord::new("b", "b"),
            DependencyRecord::new("a", "a").with_configuration(ConfigurationKind::Api),
        ]);
        project.tags = vec![ProjectTag::Android];

        let mut results = AnalysisResults::new();
        results.add_project(project);

        assert_eq!(results.summary.total_projects, 1);
        assert_eq!(results.summary.total_modules, 3);
        assert_eq!(results.summary.total_dependencies, 2);
        assert_eq!(results.summary.android_projects, 1);
        assert_eq!(results.projects[0].dependencies[0].group_id, "a");
    }

    #[test]
    fn test_add_error_counts_by_severity() {
        let mut results = AnalysisResults::new();
        results.add_error(
            PathBuf::from("a/build.gradle"),
            &FactsError::parse_unavailable("a/build.gradle", "unbalanced"),
        );
        results.add_error(PathBuf::from("cfg"), &FactsError::config_error("bad"));

        assert_eq!(results.summary.errors_encountered, 2);
        assert_eq!(results.summary.warnings_count, 1);
        assert_eq!(results.summary.critical_errors_count, 1);
        assert!(results.has_critical_errors());
        assert_eq!(results.critical_errors()[0].path, PathBuf::from("cfg"));
        assert_eq!(results.worst_severity(), Some(ErrorSeverity::Critical));
    }

    #[test]
    fn test_configuration_usage_accumulates() {
        let mut summary = AnalysisSummary::default();
        summary.add_configuration_usage(HashMap::from([("api".to_string(), 2)]));
        summary.add_configuration_usage(HashMap::from([("api".to_string(), 1), ("kapt".to_string(), 4)]));
        assert_eq!(summary.configuration_usage.get("api"), Some(&3));
        assert_eq!(summary.configuration_usage.get("kapt"), Some(&4));
    }

    #[test]
    fn test_format_duration() {
        let mut summary = AnalysisSummary::default();
        summary.scan_duration = Duration::from_millis(250);
        assert_eq!(summary.format_duration(), "250ms");
        summary.scan_duration = Duration::from_millis(2_500);
        assert_eq!(summary.format_duration(), "2.500s");
        summary.scan_duration = Duration::from_secs(125);
        assert_eq!(summary.format_duration(), "2m 5s");
    }
}
