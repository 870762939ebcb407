//! Command line interface for the Bezy core tools
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs. Every subcommand works on one glyph of a
//! UFO and, when it edits, writes the UFO back in place.

use crate::core::config_file::ConfigFile;
use crate::core::errors::{parse_coordinate_pair, BezyResult};
use crate::core::settings::EditorSettings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Bezy core CLI arguments
///
/// Examples:
///   bezy-core my-font.ufo -g a dump                       # Print glyph 'a' as JSON
///   bezy-core my-font.ufo -g o remove-overlaps            # Merge overlapping contours
///   bezy-core my-font.ufo -g a round --grid 2             # Round to a 2-unit grid
///   bezy-core my-font.ufo -g H slice --from 0,300 --to 600,300
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "bezy-core",
    version,
    about = "Outline editing operations on UFO glyphs",
    long_about = "Runs the Bezy editing engine on a glyph of a UFO (Unified Font Object) source: dump the glyph model, merge overlaps, round coordinates, slice along a line or decompose components."
)]
pub struct CliArgs {
    /// Path to the UFO to edit
    #[clap(help = "UFO directory to read and write")]
    pub font_source: PathBuf,

    /// Name of the glyph to operate on
    #[clap(long = "glyph", short = 'g', help = "Glyph name")]
    pub glyph: String,

    /// Grid for rounding; overrides settings.json
    #[clap(long = "grid", help = "Grid size in font units (0 disables rounding)")]
    pub grid: Option<f64>,

    /// Log level or filter directives; overrides BEZY_LOG
    #[clap(
        long = "log-level",
        help = "Log level (error, warn, info, debug, trace)",
        long_help = "Log level or tracing filter directives. Takes precedence over the BEZY_LOG environment variable; the default is warn."
    )]
    pub log_level: Option<String>,

    /// Also append logs to ~/.config/bezy/logs/bezy-<date>.log
    #[clap(long = "log-file", help = "Append logs to the daily log file")]
    pub log_file: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the glyph model as JSON
    Dump,
    /// Merge overlapping closed contours in every layer
    RemoveOverlaps,
    /// Round every coordinate to the grid
    Round,
    /// Cut every layer along the line through two points
    Slice {
        #[clap(long = "from", help = "First point of the cut line, as x,y")]
        from: String,
        #[clap(long = "to", help = "Second point of the cut line, as x,y")]
        to: String,
    },
    /// Replace components with outlines
    Decompose,
}

impl Command {
    /// True for subcommands that write the UFO back
    pub fn edits(&self) -> bool {
        !matches!(self, Command::Dump)
    }

    /// The cut line of a slice, parsed
    pub fn slice_line(&self) -> BezyResult<Option<((f64, f64), (f64, f64))>> {
        match self {
            Command::Slice { from, to } => Ok(Some((parse_coordinate_pair(from)?, parse_coordinate_pair(to)?))),
            _ => Ok(None),
        }
    }
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that the source exists and is a UFO before anything is
    /// loaded, providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        let path = &self.font_source;
        if !path.exists() {
            return Err(format!(
                "Font source does not exist: {}\nMake sure the path is correct and the file exists.",
                path.display()
            ));
        }
        if !path.is_dir() || !path.join("metainfo.plist").exists() {
            return Err(format!(
                "Not a valid UFO directory: missing metainfo.plist in {}\nMake sure this is a valid UFO directory.",
                path.display()
            ));
        }

        if let Some(grid) = self.grid {
            if !grid.is_finite() || grid < 0.0 {
                return Err(format!("Invalid grid size: {grid}\nThe grid must be zero or positive."));
            }
        }

        if let Err(e) = self.command.slice_line() {
            return Err(format!("{e:#}"));
        }
        Ok(())
    }

    /// Settings with the usual precedence
    ///
    /// Priority order:
    /// 1. CLI arguments (--grid)
    /// 2. Config file settings (~/.config/bezy/settings.json)
    /// 3. Built-in defaults
    pub fn settings(&self) -> EditorSettings {
        self.settings_with(ConfigFile::load())
    }

    fn settings_with(&self, config: Option<ConfigFile>) -> EditorSettings {
        let mut settings = EditorSettings::default();
        if let Some(config) = config {
            debug!("Applying settings from config file");
            config.apply_to(&mut settings);
        }
        if let Some(grid) = self.grid {
            debug!("Using grid from CLI: {}", grid);
            settings.grid = grid;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("bezy-core").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_slice() {
        let args = parse(&["font.ufo", "-g", "a", "slice", "--from", "0,10", "--to", "100,10"]);
        assert_eq!(args.glyph, "a");
        assert_eq!(
            args.command.slice_line().unwrap(),
            Some(((0.0, 10.0), (100.0, 10.0)))
        );
        assert!(args.command.edits());
        assert!(!args.log_file);
        assert!(parse(&["font.ufo", "-g", "a", "--log-file", "dump"]).log_file);
        assert!(!parse(&["font.ufo", "-g", "a", "dump"]).command.edits());
    }

    #[test]
    fn test_validate_rejects_missing_and_non_ufo() {
        let args = parse(&["/definitely/not/here.ufo", "-g", "a", "dump"]);
        assert!(args.validate().unwrap_err().contains("does not exist"));

        let dir = tempfile::tempdir().unwrap();
        let args = parse(&[dir.path().to_str().unwrap(), "-g", "a", "dump"]);
        assert!(args.validate().unwrap_err().contains("metainfo.plist"));
    }

    #[test]
    fn test_validate_rejects_bad_slice_and_grid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metainfo.plist"), "").unwrap();
        let path = dir.path().to_str().unwrap();
        assert!(parse(&[path, "-g", "a", "round"]).validate().is_ok());
        assert!(parse(&[path, "-g", "a", "--grid=-1", "round"]).validate().is_err());
        let bad = parse(&[path, "-g", "a", "slice", "--from", "0", "--to", "1,1"]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = parse(&["font.ufo", "-g", "a", "--grid", "4", "round"]);
        let config = ConfigFile {
            grid: Some(2.0),
            snap_distance: Some(3.0),
            ..Default::default()
        };
        let settings = args.settings_with(Some(config));
        assert_eq!(settings.grid, 4.0);
        assert_eq!(settings.snap_distance, 3.0);
    }
}
