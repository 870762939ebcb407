//! Outline points
//!
//! Point types follow the UFO convention: an on-curve point's type names the
//! segment that arrives at it, and off-curve points are Bezier handles.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Point/segment type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointType {
    /// Control point, not on the outline
    #[default]
    #[serde(rename = "offcurve")]
    OffCurve,
    /// First point of an open path
    #[serde(rename = "move")]
    Move,
    /// End of a straight segment
    #[serde(rename = "line")]
    Line,
    /// End of a cubic segment
    #[serde(rename = "curve")]
    Curve,
}

impl PointType {
    /// Check if this point type is on-curve (not a control point)
    pub fn is_on_curve(&self) -> bool {
        !matches!(self, PointType::OffCurve)
    }
}

/// A point of a path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditPoint {
    pub(crate) x: f64,
    pub(crate) y: f64,
    #[serde(rename = "type")]
    pub(crate) point_type: PointType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) smooth: bool,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl EditPoint {
    /// Create a new point with coordinates and type
    pub fn new(x: f64, y: f64, point_type: PointType) -> Self {
        Self {
            x,
            y,
            point_type,
            smooth: false,
            selected: false,
        }
    }

    /// Create a move point (first point of an open path)
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Move)
    }

    /// Create a line point
    pub fn line_to(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Line)
    }

    /// Create an off-curve control point
    pub fn off_curve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::OffCurve)
    }

    /// Create a cubic curve point
    pub fn curve_to(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Curve)
    }

    /// Set the smooth flag (ignored for off-curve points)
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth && self.point_type.is_on_curve();
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_type(mut self, point_type: PointType) -> Self {
        self.point_type = point_type;
        if !point_type.is_on_curve() {
            self.smooth = false;
        }
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.x = position.x;
        self.y = position.y;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn point_type(&self) -> PointType {
        self.point_type
    }

    pub fn is_on_curve(&self) -> bool {
        self.point_type.is_on_curve()
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

impl From<&EditPoint> for Point {
    fn from(point: &EditPoint) -> Self {
        point.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(EditPoint::move_to(1.0, 2.0).point_type(), PointType::Move);
        assert!(EditPoint::curve_to(0.0, 0.0).is_on_curve());
        assert!(!EditPoint::off_curve(0.0, 0.0).is_on_curve());
    }

    #[test]
    fn test_off_curve_cannot_be_smooth() {
        assert!(!EditPoint::off_curve(0.0, 0.0).with_smooth(true).is_smooth());
        assert!(EditPoint::curve_to(0.0, 0.0).with_smooth(true).is_smooth());
    }

    #[test]
    fn test_serde_skips_selection() {
        let point = EditPoint::line_to(10.0, 20.0).with_selected(true);
        let json = serde_json::to_string(&point).unwrap();
        assert!(!json.contains("selected"));
        assert!(json.contains("\"type\":\"line\""));
        let back: EditPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position(), point.position());
        assert!(!back.is_selected());
    }
}
