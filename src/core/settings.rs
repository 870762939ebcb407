//! Editor settings
//!
//! Tunables for the editing engine. Built-in defaults are overridden by
//! ~/.config/bezy/settings.json, which is overridden by CLI flags.

use crate::editing::boolean::{DEFAULT_BOOLEAN_ACCURACY, SMOOTH_TOLERANCE};
use crate::editing::path_ops::DEFAULT_FIT_TOLERANCE;
use crate::geometry::curve_fit::MAX_FIT_ITERATIONS;
use serde::{Deserialize, Serialize};

/// Distance in font units within which a dragged point snaps
pub const DEFAULT_SNAP_DISTANCE: f64 = 8.0;

/// Arrow-key nudge amounts in font units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NudgeSettings {
    pub default: f64,
    /// With Shift held
    pub shift: f64,
    /// With Cmd/Ctrl held
    pub cmd: f64,
}

impl Default for NudgeSettings {
    fn default() -> Self {
        Self {
            default: 1.0,
            shift: 10.0,
            cmd: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Coordinates are rounded to multiples of this; 0 disables rounding
    pub grid: f64,
    pub snap_distance: f64,
    /// Radians of tangent break still read as a smooth join
    pub smooth_tolerance: f64,
    pub boolean_accuracy: f64,
    pub fit_tolerance: f64,
    pub max_fit_iterations: usize,
    pub nudge: NudgeSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid: 1.0,
            snap_distance: DEFAULT_SNAP_DISTANCE,
            smooth_tolerance: SMOOTH_TOLERANCE,
            boolean_accuracy: DEFAULT_BOOLEAN_ACCURACY,
            fit_tolerance: DEFAULT_FIT_TOLERANCE,
            max_fit_iterations: MAX_FIT_ITERATIONS,
            nudge: NudgeSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Nudge distance for the held modifiers
    pub fn nudge_amount(&self, shift: bool, cmd: bool) -> f64 {
        if cmd {
            self.nudge.cmd
        } else if shift {
            self.nudge.shift
        } else {
            self.nudge.default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let settings: EditorSettings = serde_json::from_str(r#"{"grid": 2.0, "nudge": {"shift": 20.0}}"#).unwrap();
        assert_eq!(settings.grid, 2.0);
        assert_eq!(settings.nudge.shift, 20.0);
        assert_eq!(settings.nudge.default, 1.0);
        assert_eq!(settings.fit_tolerance, 0.01);
        assert_eq!(settings.max_fit_iterations, 20);
    }

    #[test]
    fn test_nudge_amount_picks_modifier() {
        let settings = EditorSettings::default();
        assert_eq!(settings.nudge_amount(false, false), 1.0);
        assert_eq!(settings.nudge_amount(true, false), 10.0);
        assert_eq!(settings.nudge_amount(true, true), 100.0);
    }
}
