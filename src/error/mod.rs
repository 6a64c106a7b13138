//! Error handling for gradle-facts
//!
//! This module provides the error enum, result alias, and context helpers
//! used by the traversal engine, the Gradle front-end and the CLI.

pub mod context;
pub mod types;

pub use context::{OptionExt, ResultExt, handle_error};
pub use types::{ErrorSeverity, FactsError, Result};
