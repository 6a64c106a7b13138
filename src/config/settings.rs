//! Validation of fully merged settings

use std::path::Path;

use crate::error::{FactsError, Result};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.scan_path.exists() {
            return Err(FactsError::InvalidPath {
                path: settings.scan_path.clone(),
            });
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern)
                .map_err(|e| FactsError::config_error(format!("Invalid exclude pattern '{}': {}", pattern, e)))?;
        }

        if settings.max_depth == Some(0) {
            return Err(FactsError::config_error("Max depth must be at least 1"));
        }

        if settings.threads == Some(0) {
            return Err(FactsError::config_error("Thread count must be at least 1"));
        }

        if settings.analyses.is_empty() {
            return Err(FactsError::config_error("At least one analysis must be enabled"));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        if let Some(dir) = &settings.output_dir {
            if !dir.is_dir() {
                return Err(FactsError::OutputDirectoryNotFound { path: dir.clone() });
            }
        }

        Ok(())
    }

    /// Validate that an output path is writable
    fn validate_output_path(path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        if !parent.exists() {
            return Err(FactsError::InvalidPath {
                path: parent.to_path_buf(),
            });
        }

        let metadata = std::fs::metadata(parent).map_err(FactsError::io_error)?;
        if metadata.permissions().readonly() {
            return Err(FactsError::permission_denied(parent));
        }

        Ok(())
    }
}
