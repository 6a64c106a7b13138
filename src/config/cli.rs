//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::Args;
use crate::error::Result;
use crate::models::config::{AnalysisKind, OutputFormat, PartialSettings};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line arguments relevant to settings
///
/// Flags are only turned into settings when given, so an absent flag never
/// overrides a value from the config file.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub single_project: bool,
    pub exclude: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub analyses: Option<Vec<AnalysisKind>>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub no_parallel: bool,
    pub threads: Option<usize>,
    pub quiet: bool,
    pub verbose: bool,
    pub follow_links: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

impl CliArgs {
    pub fn from_args(args: &Args) -> Self {
        Self {
            path: args.path.clone(),
            single_project: args.single_project,
            exclude: (!args.exclude.is_empty()).then(|| args.exclude.clone()),
            max_depth: args.max_depth,
            analyses: (!args.analysis.is_empty())
                .then(|| args.analysis.iter().map(|a| AnalysisKind::from(*a)).collect()),
            output_format: args.output.map(OutputFormat::from),
            output_file: args.output_file.clone(),
            output_dir: args.output_dir.clone(),
            no_parallel: args.no_parallel,
            threads: args.threads,
            quiet: args.quiet,
            verbose: args.verbose,
            follow_links: args.follow_links,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        }
    }
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed clap arguments
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from_args(args))
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;
        let flag = |set: bool, value: bool| set.then_some(value);

        Ok(PartialSettings {
            scan_path: args.path.clone(),
            single_project: flag(args.single_project, true),
            exclude_patterns: args.exclude.clone(),
            max_depth: args.max_depth,
            analyses: args.analyses.clone(),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            output_dir: args.output_dir.clone(),
            parallel: flag(args.no_parallel, false),
            threads: args.threads,
            quiet: flag(args.quiet, true),
            verbose: flag(args.verbose, true),
            follow_links: flag(args.follow_links, true),
            use_colors: flag(args.no_colors, false),
            show_progress: flag(args.no_progress, false),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_config_source() {
        let args = CliArgs {
            path: Some(PathBuf::from("/cli/path")),
            exclude: Some(vec!["build".to_string()]),
            max_depth: Some(10),
            output_format: Some(OutputFormat::Json),
            no_parallel: true,
            verbose: true,
            ..Default::default()
        };

        let cli_config = CliConfig::new(args);
        assert!(cli_config.is_available());
        assert_eq!(cli_config.priority(), 30);

        let settings = cli_config.load().unwrap();

        assert_eq!(settings.scan_path, Some(PathBuf::from("/cli/path")));
        assert_eq!(settings.exclude_patterns, Some(vec!["build".to_string()]));
        assert_eq!(settings.max_depth, Some(10));
        assert_eq!(settings.output_format, Some(OutputFormat::Json));
        assert_eq!(settings.parallel, Some(false));
        assert_eq!(settings.verbose, Some(true));
        assert_eq!(settings.quiet, None);
        assert_eq!(settings.use_colors, None);
    }

    #[test]
    fn test_from_args() {
        let args = Args::parse_from([
            "gradle-facts",
            "--path",
            "/test/path",
            "--single-project",
            "--analysis",
            "tags",
            "--output",
            "csv",
            "--output-dir",
            "reports",
            "--threads",
            "4",
            "--no-colors",
            "--no-progress",
            "--config",
            "facts.toml",
        ]);

        let cli_config = CliConfig::from_args(&args);
        assert_eq!(cli_config.config_path(), Some(&PathBuf::from("facts.toml")));

        let settings = cli_config.load().unwrap();
        assert_eq!(settings.scan_path, Some(PathBuf::from("/test/path")));
        assert_eq!(settings.single_project, Some(true));
        assert_eq!(settings.analyses, Some(vec![AnalysisKind::Tags]));
        assert_eq!(settings.output_format, Some(OutputFormat::Csv));
        assert_eq!(settings.output_dir, Some(PathBuf::from("reports")));
        assert_eq!(settings.threads, Some(4));
        assert_eq!(settings.use_colors, Some(false));
        assert_eq!(settings.show_progress, Some(false));
        assert_eq!(settings.parallel, None);
    }
}
