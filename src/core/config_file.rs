//! User configuration file handling
//!
//! Manages settings from ~/.config/bezy/settings.json

use crate::core::errors::{BezyContext, BezyResult};
use crate::core::settings::{EditorSettings, NudgeSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// User configuration from ~/.config/bezy/settings.json
///
/// Every field is optional: these settings override built-in defaults but
/// are overridden by CLI arguments
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    pub grid: Option<f64>,
    pub snap_distance: Option<f64>,
    pub smooth_tolerance: Option<f64>,
    pub boolean_accuracy: Option<f64>,
    pub fit_tolerance: Option<f64>,
    pub max_fit_iterations: Option<usize>,
    pub nudge: Option<NudgeSettings>,
}

impl ConfigFile {
    /// Get the path to the bezy config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("bezy")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; missing or unreadable files give `None`
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> BezyResult<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> BezyResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_file_context("create directory for", parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).with_file_context("write", path)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Overlay the values present in this file onto `settings`
    pub fn apply_to(&self, settings: &mut EditorSettings) {
        if let Some(grid) = self.grid {
            settings.grid = grid;
        }
        if let Some(distance) = self.snap_distance {
            settings.snap_distance = distance;
        }
        if let Some(tolerance) = self.smooth_tolerance {
            settings.smooth_tolerance = tolerance;
        }
        if let Some(accuracy) = self.boolean_accuracy {
            settings.boolean_accuracy = accuracy;
        }
        if let Some(tolerance) = self.fit_tolerance {
            settings.fit_tolerance = tolerance;
        }
        if let Some(iterations) = self.max_fit_iterations {
            settings.max_fit_iterations = iterations;
        }
        if let Some(nudge) = self.nudge {
            settings.nudge = nudge;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bezy").join("settings.json");
        let config = ConfigFile {
            grid: Some(5.0),
            nudge: Some(NudgeSettings {
                default: 2.0,
                shift: 20.0,
                cmd: 200.0,
            }),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(ConfigFile::load_from(&path), Some(config));
    }

    #[test]
    fn test_missing_or_broken_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(ConfigFile::load_from(&path), None);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(ConfigFile::load_from(&path), None);
    }

    #[test]
    fn test_apply_overrides_only_present_values() {
        let config = ConfigFile {
            grid: Some(0.0),
            snap_distance: Some(4.0),
            ..Default::default()
        };
        let mut settings = EditorSettings::default();
        config.apply_to(&mut settings);
        assert_eq!(settings.grid, 0.0);
        assert_eq!(settings.snap_distance, 4.0);
        assert_eq!(settings.nudge, NudgeSettings::default());
    }
}
