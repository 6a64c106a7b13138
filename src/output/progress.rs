//! Progress reporting functionality
//!
//! Per-project progress for long scans, silent in quiet mode.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::core::parallel::ProgressUpdate;

/// Progress reporter for long-running operations
pub struct ProgressReporter {
    quiet: bool,
    verbose: bool,
    main_progress_bar: Option<ProgressBar>,
    message_bar: Option<ProgressBar>,
    current_operation: Mutex<String>,
}

fn styled(bar: ProgressBar, template: &str) -> ProgressBar {
    match ProgressStyle::default_bar().template(template) {
        Ok(style) => bar.with_style(style.progress_chars("#>-")),
        Err(_) => bar,
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let (main_progress_bar, message_bar) = if quiet {
            (None, None)
        } else {
            let multi_progress = MultiProgress::new();
            let main_bar = multi_progress.add(styled(
                ProgressBar::new(0),
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} projects ({eta})",
            ));
            let msg_bar = multi_progress.add(styled(ProgressBar::new(1), "{wide_msg}"));
            (Some(main_bar), Some(msg_bar))
        };

        Self {
            quiet,
            verbose,
            main_progress_bar,
            message_bar,
            current_operation: Mutex::new(String::new()),
        }
    }

    /// A reporter that never draws anything
    pub fn hidden() -> Self {
        Self::new(true, false)
    }

    /// Start a new progress operation
    pub fn start(&self, total: usize, operation: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.reset();
            bar.set_length(total as u64);
            bar.set_position(0);
        }
        if let Some(msg_bar) = &self.message_bar {
            msg_bar.set_message(operation.to_string());
        }
        *self.current_operation.lock() = operation.to_string();

        if self.verbose {
            eprintln!("Starting: {}", operation);
        }
    }

    /// Update progress
    pub fn update(&self, current: usize, total: usize, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
        }
        if *self.current_operation.lock() != message {
            if let Some(msg_bar) = &self.message_bar {
                msg_bar.set_message(message.to_string());
            }
        }

        if self.verbose {
            eprintln!("[{}/{}] {}", current, total, message);
        }
    }

    /// Update progress from a ProgressUpdate
    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    /// Finish the progress operation
    pub fn finish(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(bar) = &self.main_progress_bar {
            bar.finish();
        }
        if let Some(msg_bar) = &self.message_bar {
            msg_bar.finish_with_message(message.to_string());
        }

        if self.verbose {
            eprintln!("Finished: {}", message);
        }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Create a progress callback function that updates a ProgressReporter
pub fn create_progress_callback(reporter: Arc<ProgressReporter>) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_reporter_ignores_updates() {
        let reporter = ProgressReporter::hidden();
        assert!(reporter.is_quiet());
        assert!(!reporter.is_verbose());

        reporter.start(3, "Scanning");
        reporter.update_from(ProgressUpdate::new(1, 3, "Analyzed demo"));
        reporter.finish("done");
        assert!(reporter.current_operation.lock().is_empty());
    }

    #[test]
    fn test_callback_forwards_updates() {
        let reporter = Arc::new(ProgressReporter::new(false, false));
        reporter.start(2, "Scanning");
        let callback = create_progress_callback(Arc::clone(&reporter));
        callback(ProgressUpdate::new(2, 2, "Analyzed demo"));

        assert!(!reporter.is_quiet());
        assert_eq!(*reporter.current_operation.lock(), "Scanning");
    }
}
