//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for gradle-facts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the projects to analyze
    pub scan_path: PathBuf,

    /// Treat the scan path as one project instead of a directory of projects
    pub single_project: bool,

    /// Patterns to exclude from scanning
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to traverse inside a project
    pub max_depth: Option<usize>,

    /// Which fact tables to produce
    pub analyses: Vec<AnalysisKind>,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Directory receiving one CSV file per analysis
    pub output_dir: Option<PathBuf>,

    /// Whether to analyze projects in parallel
    pub parallel: bool,

    /// Worker threads for parallel analysis (defaults to the CPU count)
    pub threads: Option<usize>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to follow symbolic links during directory traversal
    pub follow_links: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan_path: PathBuf::from("."),
            single_project: false,
            exclude_patterns: vec![
                ".git".to_string(),
                ".gradle".to_string(),
                "build".to_string(),
                ".idea".to_string(),
                "node_modules".to_string(),
            ],
            max_depth: None,
            analyses: AnalysisKind::all().to_vec(),
            output_format: OutputFormat::Text,
            output_file: None,
            output_dir: None,
            parallel: true,
            threads: None,
            quiet: false,
            verbose: false,
            follow_links: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

impl Settings {
    pub fn is_enabled(&self, kind: AnalysisKind) -> bool {
        self.analyses.contains(&kind)
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV tables for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// The fact tables a run can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Every dependency declared in any build script of the project
    Dependencies,
    /// Effective dependencies per module, including inherited global ones
    Modules,
    Plugins,
    /// `gradle.properties` entries
    Properties,
    /// Android / other classification
    Tags,
}

impl AnalysisKind {
    pub fn all() -> &'static [AnalysisKind] {
        &[
            AnalysisKind::Dependencies,
            AnalysisKind::Modules,
            AnalysisKind::Plugins,
            AnalysisKind::Properties,
            AnalysisKind::Tags,
        ]
    }

    /// File name of the CSV table written for this analysis
    pub fn table_file_name(&self) -> &'static str {
        match self {
            AnalysisKind::Dependencies => "gradle_dependencies_data.csv",
            AnalysisKind::Modules => "gradle_dependencies_by_modules_data.csv",
            AnalysisKind::Plugins => "gradle_plugins_data.csv",
            AnalysisKind::Properties => "gradle_properties_data.csv",
            AnalysisKind::Tags => "project_tags_data.csv",
        }
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dependencies" => Ok(AnalysisKind::Dependencies),
            "modules" => Ok(AnalysisKind::Modules),
            "plugins" => Ok(AnalysisKind::Plugins),
            "properties" => Ok(AnalysisKind::Properties),
            "tags" => Ok(AnalysisKind::Tags),
            _ => Err(format!("Invalid analysis: {}", s)),
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnalysisKind::Dependencies => "dependencies",
            AnalysisKind::Modules => "modules",
            AnalysisKind::Plugins => "plugins",
            AnalysisKind::Properties => "properties",
            AnalysisKind::Tags => "tags",
        };
        write!(f, "{}", name)
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub scan_path: Option<PathBuf>,
    pub single_project: Option<bool>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub analyses: Option<Vec<AnalysisKind>>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub parallel: Option<bool>,
    pub threads: Option<usize>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub follow_links: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        take!(
            scan_path,
            single_project,
            exclude_patterns,
            max_depth,
            analyses,
            output_format,
            output_file,
            output_dir,
            parallel,
            threads,
            quiet,
            verbose,
            follow_links,
            use_colors,
            show_progress,
        );
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(scan_path) = &self.scan_path {
            settings.scan_path = scan_path.clone();
        }
        if let Some(single_project) = self.single_project {
            settings.single_project = single_project;
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if let Some(analyses) = &self.analyses {
            settings.analyses = analyses.clone();
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = Some(output_dir.clone());
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(threads) = self.threads {
            settings.threads = Some(threads);
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(follow_links) = self.follow_links {
            settings.follow_links = follow_links;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
