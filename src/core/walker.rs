//! Sequential analysis of every project under the scan path

use std::time::Instant;
use tracing::info;

use crate::core::parallel::ProgressUpdate;
use crate::core::project::{record_failure, ProjectAnalyzer};
use crate::error::Result;
use crate::gradle::discovery::discover_projects;
use crate::models::{analysis::AnalysisResults, config::Settings};
use crate::parsers::FileTreeProvider;

/// Analyzes projects one after another
pub struct Walker {
    settings: Settings,
    provider: FileTreeProvider,
}

impl Walker {
    /// Create a new walker with the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            provider: FileTreeProvider::new(),
        }
    }

    /// Analyze every project in the configured directory
    pub fn analyze(&self) -> Result<AnalysisResults> {
        self.analyze_with_progress(|_| {})
    }

    /// Analyze with a callback invoked after each project
    pub fn analyze_with_progress<F>(&self, progress_callback: F) -> Result<AnalysisResults>
    where
        F: Fn(ProgressUpdate),
    {
        let start_time = Instant::now();
        let mut results = AnalysisResults::new();

        let roots = discover_projects(&self.settings)?;
        let total = roots.len();
        info!(projects = total, path = %self.settings.scan_path.display(), "scan started");

        let analyzer = ProjectAnalyzer::new(&self.settings, &self.provider);
        for (i, root) in roots.iter().enumerate() {
            match analyzer.analyze(root) {
                Ok(outcome) => outcome.merge_into(&mut results),
                Err(err) => record_failure(&mut results, root, err)?,
            }
            progress_callback(ProgressUpdate::new(
                i + 1,
                total,
                format!("Analyzed {}", root.display()),
            ));
        }

        results.sort();
        results.set_scan_duration(start_time.elapsed());
        Ok(results)
    }
}
