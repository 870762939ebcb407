//! Component references

use crate::core::errors::{ensure, BezyResult};
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

/// A placed, transformed reference to another glyph's outline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub(crate) glyph_name: String,
    pub(crate) transform: Affine,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl Component {
    pub fn new(glyph_name: impl Into<String>, transform: Affine) -> Self {
        Self {
            glyph_name: glyph_name.into(),
            transform,
            selected: false,
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn glyph_name(&self) -> &str {
        &self.glyph_name
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Where the base glyph's origin lands
    pub fn origin(&self) -> Point {
        let [.., e, f] = self.transform.as_coeffs();
        Point::new(e, f)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Inverse of the component transform
    pub fn inverse_transform(&self) -> BezyResult<Affine> {
        invert_transform(self.transform)
    }
}

/// Invert an affine transform, failing on a singular matrix
pub fn invert_transform(transform: Affine) -> BezyResult<Affine> {
    let det = transform.determinant();
    ensure!(
        det.is_finite() && det.abs() > 1e-12,
        "cannot invert singular transform {:?}",
        transform.as_coeffs()
    );
    Ok(transform.inverse())
}
