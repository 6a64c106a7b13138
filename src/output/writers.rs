//! Output writing functionality
//!
//! This module provides writers for different output destinations.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::formatters::format_table_csv;
use crate::error::{FactsError, Result};
use crate::models::analysis::AnalysisResults;
use crate::models::config::AnalysisKind;

/// Trait for output writers
pub trait OutputWriter {
    /// Write content to the output destination
    fn write(&self, content: &str) -> Result<()>;
}

/// Writer for stdout output
#[derive(Debug)]
pub struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| FactsError::StdoutWrite { source: e })
    }
}

/// Writer for file output
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    /// Create a new file writer
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> Result<()> {
        let to_error = |e| FactsError::OutputWrite {
            path: self.path.clone(),
            source: e,
        };
        let mut file = File::create(&self.path).map_err(to_error)?;
        file.write_all(content.as_bytes()).map_err(to_error)
    }
}

/// Create an output writer based on the output file option
pub fn create_writer(output_file: Option<impl AsRef<Path>>) -> Box<dyn OutputWriter> {
    match output_file {
        Some(path) => Box::new(FileWriter::new(path)),
        None => Box::new(StdoutWriter),
    }
}

/// Write one CSV file per analysis into `dir`
///
/// Returns the written paths in the order of `analyses`.
pub fn write_csv_tables(
    results: &AnalysisResults,
    analyses: &[AnalysisKind],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FactsError::OutputDirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut written = Vec::with_capacity(analyses.len());
    for kind in analyses {
        let path = dir.join(kind.table_file_name());
        FileWriter::new(&path).write(&format_table_csv(results, *kind)?)?;
        debug!(table = %kind, path = %path.display(), "csv table written");
        written.push(path);
    }
    Ok(written)
}
