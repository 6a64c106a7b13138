//! gradle-facts - static fact extraction from Gradle builds
//!
//! Build scripts, settings scripts and `gradle.properties` files are parsed
//! into syntax trees and walked once by a set of context-scoped analyzers.
//! The resulting dependency, plugin, property and tag facts are then
//! propagated along the module graph of each project.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod gradle;
pub mod models;
pub mod output;
pub mod parsers;

pub use error::{handle_error, ErrorSeverity, FactsError, OptionExt, Result, ResultExt};
pub use models::{
    analysis::{AnalysisResults, AnalysisSummary, ProjectAnalysis},
    config::{AnalysisKind, Settings},
    records::{DependencyRecord, GradleProperty, PluginRecord, ProjectTag},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
