//! Output formatting functionality
//!
//! Text rendering for terminals, pretty JSON, and the CSV fact tables.

use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;

use crate::error::{ErrorSeverity, FactsError, Result};
use crate::models::analysis::{AnalysisResults, ProjectAnalysis};
use crate::models::config::AnalysisKind;
use crate::models::records::DependencyRecord;

/// Placeholder written for a missing CSV value
pub const MISSING: &str = "-";

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(MISSING)
}

fn paint(use_colors: bool, style: Style, text: impl AsRef<str>) -> String {
    if use_colors {
        style.paint(text.as_ref()).to_string()
    } else {
        text.as_ref().to_string()
    }
}

fn dependency_line(dep: &DependencyRecord) -> String {
    let configuration = dep.configuration.map(|c| c.key()).unwrap_or(MISSING);
    let mut line = format!("{} ({})", dep.coordinate(), configuration);
    if let Some(version) = &dep.version {
        line.push_str(&format!(" {}", version));
    }
    if dep.declared_globally {
        line.push_str(" [allprojects]");
    }
    line
}

/// Format one project as text
pub fn format_project_text(
    project: &ProjectAnalysis,
    analyses: &[AnalysisKind],
    use_colors: bool,
    verbose: bool,
) -> String {
    let mut output = String::new();
    let dimmed = Style::new().dimmed();

    output.push_str(&format!(
        "{} {}\n",
        paint(use_colors, Blue.bold(), &project.name),
        paint(use_colors, dimmed, project.path.display().to_string())
    ));
    output.push_str(&format!("  Modules: {}\n", project.module_count));

    for kind in analyses {
        match kind {
            AnalysisKind::Tags => {
                let tags: Vec<String> = project.tags.iter().map(|t| t.to_string()).collect();
                output.push_str(&format!("  Tags: {}\n", paint(use_colors, Cyan.normal(), tags.join(", "))));
            }
            AnalysisKind::Dependencies => {
                output.push_str(&format!("  Dependencies: {}\n", project.dependencies.len()));
                if verbose {
                    for dep in &project.dependencies {
                        output.push_str(&format!("    {}\n", dependency_line(dep)));
                    }
                }
            }
            AnalysisKind::Modules => {
                output.push_str("  Modules dependencies:\n");
                for (path, module) in &project.module_dependencies {
                    output.push_str(&format!(
                        "    {} ({}): {}\n",
                        paint(use_colors, Style::new().bold(), &module.name),
                        path,
                        module.dependencies.len()
                    ));
                    if verbose {
                        for dep in &module.dependencies {
                            output.push_str(&format!("      {}\n", dependency_line(dep)));
                        }
                    }
                }
            }
            AnalysisKind::Plugins => {
                output.push_str(&format!("  Plugins: {}\n", project.plugins.len()));
                if verbose {
                    for plugin in &project.plugins {
                        output.push_str(&format!("    {}\n", plugin));
                    }
                }
            }
            AnalysisKind::Properties => {
                output.push_str(&format!("  Properties: {}\n", project.properties.len()));
                if verbose {
                    for property in &project.properties {
                        output.push_str(&format!("    {}={}\n", property.key, property.value));
                    }
                }
            }
        }
    }

    output.push('\n');
    output
}

/// Format analysis results as text
pub fn format_results_text(results: &AnalysisResults, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let summary = &results.summary;

    output.push_str(&format!("{}\n\n", paint(use_colors, Blue.bold(), "Gradle Facts Summary")));
    output.push_str(&format!("Total projects: {}\n", summary.total_projects));
    output.push_str(&format!(
        "Android projects: {}\n",
        paint(use_colors, Green.normal(), summary.android_projects.to_string())
    ));
    output.push_str(&format!("Total modules: {}\n", summary.total_modules));
    output.push_str(&format!("Total dependencies: {}\n", summary.total_dependencies));
    output.push_str(&format!("Total plugins: {}\n", summary.total_plugins));
    output.push_str(&format!("Total properties: {}\n", summary.total_properties));
    output.push_str(&format!("Scan duration: {}\n", summary.format_duration()));

    if !summary.configuration_usage.is_empty() {
        output.push_str("\nConfiguration usage:\n");
        for (configuration, count) in &summary.configuration_usage {
            output.push_str(&format!("  {}: {}\n", configuration, count));
        }
    }

    if summary.errors_encountered > 0 {
        output.push_str(&format!(
            "\n{}\n",
            paint(use_colors, Yellow.bold(), format!("Errors encountered: {}", summary.errors_encountered))
        ));
        output.push_str(&format!("  Warnings: {}\n", summary.warnings_count));
        output.push_str(&format!("  Critical errors: {}\n", summary.critical_errors_count));

        // critical errors are always listed
        let listed: Vec<_> = if verbose {
            results.errors.iter().collect()
        } else {
            results.critical_errors()
        };
        for error in listed {
            let severity = match error.severity {
                ErrorSeverity::Warning => paint(use_colors, Yellow.normal(), "WARNING"),
                ErrorSeverity::Error => paint(use_colors, Red.normal(), "ERROR"),
                ErrorSeverity::Critical => paint(use_colors, Red.bold(), "CRITICAL"),
            };
            output.push_str(&format!("  [{}] {}: {}\n", severity, error.path.display(), error.error));
        }
    }

    output
}

/// Format analysis results as JSON
pub fn format_results_json(results: &AnalysisResults, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(results)
    } else {
        serde_json::to_string(results)
    };
    json.map_err(|e| FactsError::JsonSerialize { source: e })
}

/// Column names of the CSV table for one analysis
pub fn table_header(kind: AnalysisKind) -> &'static [&'static str] {
    match kind {
        AnalysisKind::Dependencies => &["project_name", "group_id", "artifact_id", "config", "version"],
        AnalysisKind::Modules => &["project_name", "module_name", "group_id", "artifact_id", "config"],
        AnalysisKind::Plugins => &[
            "project_name",
            "plugin_id",
            "plugin_version",
            "plugin_args",
            "applied",
            "allProjects",
        ],
        AnalysisKind::Properties => &["project_name", "property_key", "property_value"],
        AnalysisKind::Tags => &["project_name", "tag"],
    }
}

fn table_rows(kind: AnalysisKind, project: &ProjectAnalysis) -> Vec<Vec<String>> {
    let name = project.name.as_str();
    let config = |dep: &DependencyRecord| dep.configuration.map(|c| c.key()).unwrap_or(MISSING).to_string();

    match kind {
        AnalysisKind::Dependencies => project
            .dependencies
            .iter()
            .map(|dep| {
                vec![
                    name.to_string(),
                    dep.group_id.clone(),
                    dep.artifact_id.clone(),
                    config(dep),
                    or_missing(dep.version.as_deref()).to_string(),
                ]
            })
            .collect(),
        AnalysisKind::Modules => project
            .module_dependencies
            .values()
            .flat_map(|module| {
                module.dependencies.iter().map(move |dep| {
                    vec![
                        name.to_string(),
                        module.name.clone(),
                        dep.group_id.clone(),
                        dep.artifact_id.clone(),
                        config(dep),
                    ]
                })
            })
            .collect(),
        AnalysisKind::Plugins => project
            .plugins
            .iter()
            .map(|plugin| {
                let args = plugin.args.iter().map(String::as_str).collect::<Vec<_>>().join("#");
                vec![
                    name.to_string(),
                    plugin.plugin_id.clone(),
                    or_missing(plugin.version.as_deref()).to_string(),
                    or_missing(Some(args.as_str())).to_string(),
                    plugin.applied.to_string(),
                    plugin.declared_globally.to_string(),
                ]
            })
            .collect(),
        AnalysisKind::Properties => project
            .properties
            .iter()
            .map(|p| vec![name.to_string(), p.key.clone(), or_missing(Some(p.value.as_str())).to_string()])
            .collect(),
        AnalysisKind::Tags => project
            .tags
            .iter()
            .map(|tag| vec![name.to_string(), tag.to_string()])
            .collect(),
    }
}

/// Render the CSV table of one analysis
pub fn format_table_csv(results: &AnalysisResults, kind: AnalysisKind) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(table_header(kind))?;

    for project in &results.projects {
        for row in table_rows(kind, project) {
            writer.write_record(&row)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FactsError::io_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| FactsError::CsvSerialize { source: e })
}
