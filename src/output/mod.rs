//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::formatters::{format_table_csv, table_header, MISSING};
pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::writers::{create_writer, write_csv_tables, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::analysis::AnalysisResults;
use crate::models::config::{AnalysisKind, OutputFormat, Settings};

/// Trait for different output formatters
pub trait Formatter {
    /// Format analysis results into a string
    fn format(&self, results: &AnalysisResults) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub analyses: Vec<AnalysisKind>,
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(analyses: Vec<AnalysisKind>, use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            analyses,
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, results: &AnalysisResults) -> Result<String> {
        if self.quiet {
            let summary = &results.summary;
            let mut output = format!(
                "Projects: {}, Android: {}, Dependencies: {}, Plugins: {}\n",
                summary.total_projects, summary.android_projects, summary.total_dependencies, summary.total_plugins
            );
            if summary.critical_errors_count > 0 {
                output.push_str(&format!("Critical errors: {}\n", summary.critical_errors_count));
            }
            return Ok(output);
        }

        let mut output = formatters::format_results_text(results, self.use_colors, self.verbose);
        if !results.projects.is_empty() {
            output.push_str("\nProjects:\n\n");
            for project in &results.projects {
                output.push_str(&formatters::format_project_text(
                    project,
                    &self.analyses,
                    self.use_colors,
                    self.verbose,
                ));
            }
        }
        Ok(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, results: &AnalysisResults) -> Result<String> {
        formatters::format_results_json(results, self.pretty)
    }
}

/// CSV formatter
///
/// Emits the table of each selected analysis, separated by a blank line.
pub struct CsvFormatter {
    pub analyses: Vec<AnalysisKind>,
}

impl CsvFormatter {
    /// Create a new CSV formatter
    pub fn new(analyses: Vec<AnalysisKind>) -> Self {
        Self { analyses }
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, results: &AnalysisResults) -> Result<String> {
        let tables = self
            .analyses
            .iter()
            .map(|kind| format_table_csv(results, *kind))
            .collect::<Result<Vec<_>>>()?;
        Ok(tables.join("\n"))
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(format: OutputFormat, settings: &Settings) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(
            settings.analyses.clone(),
            settings.use_colors,
            settings.verbose,
            settings.quiet,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new(settings.analyses.clone())),
    }
}
