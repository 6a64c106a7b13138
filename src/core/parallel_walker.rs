//! Parallel analysis of independent projects
//!
//! Projects share nothing, so each one runs on its own rayon worker with its
//! own engine state. Only the collection of skipped units is shared.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::core::parallel::{build_pool, parallel_process_with_progress, ProgressUpdate};
use crate::core::project::{record_failure, ProjectAnalyzer};
use crate::error::{FactsError, Result};
use crate::gradle::discovery::discover_projects;
use crate::models::analysis::{AnalysisResults, ProjectAnalysis};
use crate::models::config::Settings;
use crate::parsers::FileTreeProvider;

type Finished = std::result::Result<(ProjectAnalysis, HashMap<String, usize>), FactsError>;

/// Parallel walker for concurrent project analysis
pub struct ParallelWalker {
    settings: Settings,
    provider: FileTreeProvider,
    issues: Mutex<Vec<(PathBuf, FactsError)>>,
}

impl ParallelWalker {
    /// Create a new parallel walker with the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            provider: FileTreeProvider::new(),
            issues: Mutex::new(Vec::new()),
        }
    }

    /// Analyze every project in the configured directory
    pub fn analyze(&self) -> Result<AnalysisResults> {
        self.analyze_with_progress(|_| {})
    }

    /// Analyze with a callback invoked as projects finish
    pub fn analyze_with_progress<F>(&self, progress_callback: F) -> Result<AnalysisResults>
    where
        F: Fn(ProgressUpdate) + Send + Sync,
    {
        let start_time = Instant::now();
        let mut results = AnalysisResults::new();

        let roots = discover_projects(&self.settings)?;
        let pool = build_pool(self.settings.threads)?;
        info!(
            projects = roots.len(),
            threads = pool.current_num_threads(),
            path = %self.settings.scan_path.display(),
            "parallel scan started"
        );

        let analyzer = ProjectAnalyzer::new(&self.settings, &self.provider);
        let finished: Vec<Finished> = pool.install(|| {
            parallel_process_with_progress(
                &roots,
                |root| {
                    analyzer.analyze(root).map(|outcome| {
                        self.issues.lock().extend(outcome.issues);
                        (outcome.analysis, outcome.configuration_usage)
                    })
                },
                &progress_callback,
            )
        });

        for (path, err) in self.issues.lock().drain(..) {
            results.add_error(path, &err);
        }
        for (root, outcome) in roots.iter().zip(finished) {
            match outcome {
                Ok((analysis, usage)) => {
                    results.summary.add_configuration_usage(usage);
                    results.add_project(analysis);
                }
                Err(err) => record_failure(&mut results, root, err)?,
            }
        }

        results.sort();
        results.set_scan_duration(start_time.elapsed());
        Ok(results)
    }
}
