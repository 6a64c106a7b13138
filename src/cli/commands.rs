//! Command implementations

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::Args;
use crate::config::{create_default_config, load_config, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::{ParallelWalker, Walker};
use crate::error::{ErrorSeverity, Result};
use crate::models::analysis::AnalysisResults;
use crate::models::config::{OutputFormat, Settings};
use crate::output::{create_formatter, create_progress_callback, create_writer, write_csv_tables, ProgressReporter};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Analyze the projects below the configured path
    Analyze(Args),
    /// Initialize a default configuration file
    Init,
}

/// Exit code for a run given the worst recorded severity
pub fn exit_code(severity: Option<ErrorSeverity>) -> i32 {
    match severity {
        None | Some(ErrorSeverity::Warning) => 0,
        Some(ErrorSeverity::Error) => 1,
        Some(ErrorSeverity::Critical) => 2,
    }
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Analyze(args)
    }

    /// Execute the command, returning the process exit code on success
    pub fn execute(&self) -> Result<i32> {
        match self {
            Command::Analyze(args) => {
                let settings = load_config(CliArgs::from_args(args))?;
                debug!(?settings, "configuration loaded");

                let results = analyze(&settings)?;
                emit(&results, &settings)?;

                if !settings.quiet {
                    eprintln!(
                        "Analyzed {} projects in {}",
                        results.summary.total_projects,
                        results.summary.format_duration()
                    );
                }
                Ok(exit_code(results.worst_severity()))
            }
            Command::Init => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    println!("Configuration file already exists at: {}", config_path.display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    return Ok(0);
                }

                create_default_config(&config_path)?;
                println!("Created default configuration file at: {}", config_path.display());
                Ok(0)
            }
        }
    }

    /// Run the command and map errors to an exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(code) => code,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                exit_code(Some(err.severity()))
            }
        }
    }
}

/// Run the sequential or parallel walker, with a progress bar when wanted
pub fn analyze(settings: &Settings) -> Result<AnalysisResults> {
    let show_progress = !settings.quiet && settings.show_progress;
    let reporter = Arc::new(if show_progress {
        ProgressReporter::new(false, settings.verbose)
    } else {
        ProgressReporter::hidden()
    });
    reporter.start(0, &format!("Scanning {}", settings.scan_path.display()));

    let callback = create_progress_callback(Arc::clone(&reporter));
    let results = if settings.parallel {
        ParallelWalker::new(settings.clone()).analyze_with_progress(callback)?
    } else {
        Walker::new(settings.clone()).analyze_with_progress(callback)?
    };

    reporter.finish(&format!("Found {} projects", results.projects.len()));
    info!(
        projects = results.summary.total_projects,
        errors = results.summary.errors_encountered,
        "scan finished"
    );
    Ok(results)
}

/// Write results where the settings ask for them
pub fn emit(results: &AnalysisResults, settings: &Settings) -> Result<()> {
    if let Some(dir) = &settings.output_dir {
        let written = write_csv_tables(results, &settings.analyses, dir)?;
        for path in &written {
            debug!(path = %path.display(), "table written");
        }
        if settings.output_file.is_none() && settings.output_format == OutputFormat::Csv {
            return Ok(());
        }
    }

    let formatted = create_formatter(settings.output_format, settings).format(results)?;
    create_writer(settings.output_file.as_ref()).write(&formatted)
}
