//! Guidelines
//!
//! The same type lives under a layer (local guides) and under a master
//! (guides shared by every layer of that master).

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub(crate) x: f64,
    pub(crate) y: f64,
    /// Degrees counter-clockwise from the x axis
    pub(crate) angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl Guideline {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            angle,
            name: None,
            selected: false,
        }
    }

    /// Horizontal guide at height `y`
    pub fn horizontal(y: f64) -> Self {
        Self::new(0.0, y, 0.0)
    }

    /// Vertical guide at `x`
    pub fn vertical(x: f64) -> Self {
        Self::new(x, 0.0, 90.0)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Unit direction of the guide
    pub fn direction(&self) -> Vec2 {
        let radians = self.angle.to_radians();
        Vec2::new(radians.cos(), radians.sin())
    }

    /// Perpendicular distance from `point` to the guide line
    pub fn distance_to(&self, point: Point) -> f64 {
        self.direction().cross(point - self.position()).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_vertical_guide() {
        let guide = Guideline::vertical(100.0);
        assert!((guide.distance_to(Point::new(90.0, 500.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_angled_guide() {
        let guide = Guideline::new(0.0, 0.0, 45.0);
        let d = guide.distance_to(Point::new(10.0, 0.0));
        assert!((d - 10.0 / 2f64.sqrt()).abs() < 1e-9);
    }
}
