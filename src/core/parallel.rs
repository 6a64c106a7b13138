//! Parallel processing utilities

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::error::{FactsError, Result};

/// Progress update information for parallel operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Build a dedicated rayon pool; `None` threads means one per CPU
pub fn build_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    let threads = threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| FactsError::ParallelExecution {
            message: format!("failed to build thread pool: {}", e),
        })
}

/// Map items in parallel, reporting each completion in finishing order
///
/// Results keep the order of `items`.
pub fn parallel_process_with_progress<T, F, R, P>(items: &[T], f: F, progress_callback: P) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let total = items.len();
    let counter = Mutex::new(0usize);

    items
        .par_iter()
        .map(|item| {
            let result = f(item);
            let current = {
                let mut count = counter.lock();
                *count += 1;
                *count
            };
            progress_callback(ProgressUpdate::new(
                current,
                total,
                format!("Processed project {}/{}", current, total),
            ));
            result
        })
        .collect()
}
