//! Front-end turning Gradle source files into syntax trees
//!
//! Build and settings scripts go through the script parser for their dialect,
//! `gradle.properties` files through the properties parser. Callers only see
//! the [`TreeProvider`] trait; a unit that cannot be read or parsed is reported
//! as [`FactsError::ParseUnavailable`] so the run can skip it.

pub mod properties;
pub mod script;

pub use properties::PropertiesParser;
pub use script::{ScriptParser, ScriptSyntaxError};

use crate::error::{FactsError, Result};
use crate::models::syntax::{ScriptDialect, SyntaxTree};
use std::path::{Path, PathBuf};

/// What a source file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `build.gradle` or `build.gradle.kts`
    BuildScript(ScriptDialect),
    /// `settings.gradle` or `settings.gradle.kts`
    SettingsScript(ScriptDialect),
    /// `gradle.properties`
    Properties,
}

impl SourceKind {
    /// Classify a file by name; `None` for files the front-end does not read
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        match name {
            "build.gradle" => Some(SourceKind::BuildScript(ScriptDialect::Groovy)),
            "build.gradle.kts" => Some(SourceKind::BuildScript(ScriptDialect::Kotlin)),
            "settings.gradle" => Some(SourceKind::SettingsScript(ScriptDialect::Groovy)),
            "settings.gradle.kts" => Some(SourceKind::SettingsScript(ScriptDialect::Kotlin)),
            "gradle.properties" => Some(SourceKind::Properties),
            _ => None,
        }
    }
}

/// One file handed to a [`TreeProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Build a unit from a path whose file name identifies its kind
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = SourceKind::from_path(&path)?;
        Some(Self { path, kind })
    }
}

/// Produces the syntax tree of a source unit
pub trait TreeProvider: Send + Sync {
    fn parse(&self, unit: &SourceUnit) -> Result<SyntaxTree>;
}

/// Parse source text of the given kind
pub fn parse_source(kind: SourceKind, src: &str) -> std::result::Result<SyntaxTree, ScriptSyntaxError> {
    match kind {
        SourceKind::BuildScript(dialect) | SourceKind::SettingsScript(dialect) => {
            ScriptParser::new(dialect).parse(src)
        }
        SourceKind::Properties => Ok(PropertiesParser::parse(src)),
    }
}

/// Reads units from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTreeProvider;

impl FileTreeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TreeProvider for FileTreeProvider {
    fn parse(&self, unit: &SourceUnit) -> Result<SyntaxTree> {
        let src = std::fs::read_to_string(&unit.path)
            .map_err(|e| FactsError::parse_unavailable(&unit.path, e.to_string()))?;
        parse_source(unit.kind, &src).map_err(|e| FactsError::parse_unavailable(&unit.path, e.to_string()))
    }
}
