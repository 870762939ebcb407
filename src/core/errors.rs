//! Error handling
//!
//! This module provides error handling using anyhow. Misuse of the editing
//! API (undo with nothing to undo, component cycles, singular transforms)
//! surfaces as an `Err` that callers propagate with `?`.

pub use anyhow::{anyhow, bail, ensure, Error};
use anyhow::{Context, Result};

/// Result type alias for convenience throughout the crate
pub type BezyResult<T> = Result<T>;

/// Helper functions for creating common error contexts
pub trait BezyContext<T> {
    /// Add file operation context to an error
    fn with_file_context<P: AsRef<std::path::Path>>(self, operation: &str, path: P) -> BezyResult<T>;

    /// Add glyph operation context to an error
    fn with_glyph_context(self, operation: &str, glyph_name: &str) -> BezyResult<T>;

    /// Add point operation context to an error
    fn with_point_context(
        self,
        operation: &str,
        glyph_name: &str,
        path_idx: usize,
        point_idx: usize,
    ) -> BezyResult<T>;
}

impl<T, E> BezyContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context<P: AsRef<std::path::Path>>(self, operation: &str, path: P) -> BezyResult<T> {
        self.with_context(|| format!("Failed to {} file: {}", operation, path.as_ref().display()))
    }

    fn with_glyph_context(self, operation: &str, glyph_name: &str) -> BezyResult<T> {
        self.with_context(|| format!("Failed to {operation} glyph '{glyph_name}'"))
    }

    fn with_point_context(
        self,
        operation: &str,
        glyph_name: &str,
        path_idx: usize,
        point_idx: usize,
    ) -> BezyResult<T> {
        self.with_context(|| {
            format!("Failed to {operation} point {path_idx}.{point_idx} in glyph '{glyph_name}'")
        })
    }
}

/// Error for a glyph name that doesn't resolve in the font
pub fn glyph_not_found(name: &str) -> Error {
    anyhow!("Glyph '{}' not found in font", name)
}

/// Reject NaN and infinite coordinates before they enter the model
pub fn validate_finite_coords(x: f64, y: f64) -> BezyResult<()> {
    ensure!(
        x.is_finite() && y.is_finite(),
        "Invalid coordinates: ({}, {}) - coordinates must be finite numbers",
        x,
        y
    );
    Ok(())
}

/// Parse a `x,y` pair as typed on the command line
pub fn parse_coordinate_pair(text: &str) -> BezyResult<(f64, f64)> {
    let Some((x, y)) = text.split_once(',') else {
        bail!("Expected a coordinate pair like '100,200', got '{}'", text);
    };
    let x: f64 = x
        .trim()
        .parse()
        .with_context(|| format!("Invalid x coordinate in '{text}'"))?;
    let y: f64 = y
        .trim()
        .parse()
        .with_context(|| format!("Invalid y coordinate in '{text}'"))?;
    validate_finite_coords(x, y)?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_finite_coords() {
        assert!(validate_finite_coords(1.0, -2.0).is_ok());
        assert!(validate_finite_coords(f64::NAN, 0.0).is_err());
        assert!(validate_finite_coords(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_coordinate_pair() {
        assert_eq!(parse_coordinate_pair("100, -20.5").unwrap(), (100.0, -20.5));
        assert!(parse_coordinate_pair("100").is_err());
        assert!(parse_coordinate_pair("a,b").is_err());
    }

    #[test]
    fn test_file_context_message() {
        let err: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let message = format!("{}", err.with_file_context("load", "/tmp/font.ufo").unwrap_err());
        assert!(message.contains("Failed to load file: /tmp/font.ufo"));
    }
}
