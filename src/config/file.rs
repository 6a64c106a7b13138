//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{FactsError, Result};
use crate::models::config::{AnalysisKind, PartialSettings};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".gradle-facts.toml";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 10,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 10,
        }
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(FactsError::ConfigNotFound {
                path: self.path.clone(),
            });
        }
        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
///
/// Reads `<PREFIX>_SCAN_PATH`, `_EXCLUDE` (comma separated), `_MAX_DEPTH`,
/// `_ANALYSES` (comma separated), `_OUTPUT_FORMAT`, `_OUTPUT_DIR`,
/// `_THREADS` and `_PARALLEL`. Values that do not parse are ignored.
pub struct EnvConfig {
    prefix: String,
    name: String,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }
}

const ENV_KEYS: [&str; 8] = [
    "SCAN_PATH",
    "EXCLUDE",
    "MAX_DEPTH",
    "ANALYSES",
    "OUTPUT_FORMAT",
    "OUTPUT_DIR",
    "THREADS",
    "PARALLEL",
];

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(path) = self.var("SCAN_PATH") {
            settings.scan_path = Some(PathBuf::from(path));
        }
        if let Some(exclude) = self.var("EXCLUDE") {
            settings.exclude_patterns = Some(split_list(&exclude));
        }
        settings.max_depth = self.var("MAX_DEPTH").and_then(|v| v.parse().ok());
        if let Some(analyses) = self.var("ANALYSES") {
            let kinds: Vec<AnalysisKind> = split_list(&analyses)
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            if !kinds.is_empty() {
                settings.analyses = Some(kinds);
            }
        }
        settings.output_format = self.var("OUTPUT_FORMAT").and_then(|v| v.parse().ok());
        settings.output_dir = self.var("OUTPUT_DIR").map(PathBuf::from);
        settings.threads = self.var("THREADS").and_then(|v| v.parse().ok());
        settings.parallel = self.var("PARALLEL").and_then(|v| v.parse().ok());

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        20
    }
}
