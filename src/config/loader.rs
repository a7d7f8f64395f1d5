//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading grace-window
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::GraceConfig;

/// Loads and provides access to grace-window configuration.
///
/// # File format
///
/// ```text
/// early_check_in: 29
/// late_check_in: 5
/// late_check_out: 15
/// very_late_check_out: 60
/// overtime_early_check_in: 10
/// overtime_check_out_grace: 15
/// transition_window: 15
/// recent_overtime_threshold: 15
/// ```
///
/// Omitted keys keep their defaults; unknown keys are rejected.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/grace_periods.yaml").unwrap();
/// println!("Early check-in opens {} minutes before start", loader.config().early_check_in);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: GraceConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML or unknown keys
    /// - The very-late check-out threshold is shorter than the late check-out grace
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from an in-memory YAML document.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> EngineResult<Self> {
        // An empty document deserializes to unit, not to an empty mapping.
        let config = if content.trim().is_empty() {
            GraceConfig::default()
        } else {
            serde_yaml::from_str::<GraceConfig>(content).map_err(|e| {
                EngineError::ConfigParseError {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            })?
        };

        if config.very_late_check_out < config.late_check_out {
            return Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: format!(
                    "very_late_check_out ({}) must not be shorter than late_check_out ({})",
                    config.very_late_check_out, config.late_check_out
                ),
            });
        }

        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &GraceConfig {
        &self.config
    }
}
