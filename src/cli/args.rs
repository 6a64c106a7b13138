//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::models::config::{AnalysisKind, OutputFormat as SettingsOutputFormat};

/// gradle-facts - dependency and plugin facts extracted from Gradle build scripts
#[derive(Parser, Debug)]
#[command(name = "gradle-facts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract dependency, plugin and property facts from Gradle projects")]
#[command(long_about = "gradle-facts scans a directory of Gradle projects without running Gradle. \
It reads build.gradle(.kts), settings.gradle(.kts) and gradle.properties files, and reports the declared \
dependencies, the effective dependencies of each module, applied plugins, properties and an Android tag.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Scan every project below the current directory
    gradle-facts

    # Scan a directory holding many checked-out projects
    gradle-facts --path ./repos

    # Analyze a single project rather than a directory of projects
    gradle-facts --path ./my-app --single-project

    # Skip directories (can specify multiple patterns)
    gradle-facts --exclude build --exclude .gradle

Selecting Facts:
    # Only dependencies and plugins
    gradle-facts --analysis dependencies --analysis plugins

    # Per-module effective dependencies
    gradle-facts --analysis modules

Output Options:
    # JSON for programmatic consumption
    gradle-facts --output json --output-file facts.json

    # One CSV table per analysis in a directory
    gradle-facts --output csv --output-dir ./reports

Configuration:
    # Use a specific configuration file
    gradle-facts --config ./gradle-facts.toml

    # Create a default configuration file
    gradle-facts --init
")]
pub struct Args {
    /// Target directory to scan
    #[arg(short, long, value_name = "PATH", help = "Directory holding the Gradle projects to scan (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// Treat the path as one project
    #[arg(long, help = "Treat the scan path itself as a single Gradle project")]
    pub single_project: bool,

    /// Exclude directories matching these glob patterns
    #[arg(short, long, value_name = "PATTERN", help = "Glob patterns for directories to exclude (can be specified multiple times)")]
    pub exclude: Vec<String>,

    /// Maximum depth for directory traversal
    #[arg(long, value_name = "DEPTH", help = "Maximum directory depth searched for modules inside each project")]
    pub max_depth: Option<usize>,

    /// Analyses to run
    #[arg(short, long, value_enum, value_name = "ANALYSIS", help = "Fact tables to produce (can be specified multiple times, defaults to all)")]
    pub analysis: Vec<Analysis>,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, help = "Output format: 'text' for humans, 'json' for machine processing, 'csv' for spreadsheet tables")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write output to (uses stdout if not specified)")]
    pub output_file: Option<PathBuf>,

    /// Directory receiving one CSV file per analysis
    #[arg(long, value_name = "DIR", help = "Write one CSV table per analysis into this existing directory")]
    pub output_dir: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, help = "Suppress non-essential output (only show results)")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "Show detailed progress and debug logging")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .gradle-facts.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Disable parallel processing
    #[arg(long, help = "Analyze projects one after another")]
    pub no_parallel: bool,

    /// Worker thread count
    #[arg(long, value_name = "N", help = "Worker threads for parallel analysis (defaults to the CPU count)")]
    pub threads: Option<usize>,

    /// Follow symbolic links during directory traversal
    #[arg(long, help = "Follow symbolic links during directory traversal")]
    pub follow_links: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars (useful for CI environments)")]
    pub no_progress: bool,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.gradle-facts.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV tables
    Csv,
}

impl From<OutputFormat> for SettingsOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => SettingsOutputFormat::Text,
            OutputFormat::Json => SettingsOutputFormat::Json,
            OutputFormat::Csv => SettingsOutputFormat::Csv,
        }
    }
}

/// Selectable fact tables
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Analysis {
    Dependencies,
    Modules,
    Plugins,
    Properties,
    Tags,
}

impl From<Analysis> for AnalysisKind {
    fn from(analysis: Analysis) -> Self {
        match analysis {
            Analysis::Dependencies => AnalysisKind::Dependencies,
            Analysis::Modules => AnalysisKind::Modules,
            Analysis::Plugins => AnalysisKind::Plugins,
            Analysis::Properties => AnalysisKind::Properties,
            Analysis::Tags => AnalysisKind::Tags,
        }
    }
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
