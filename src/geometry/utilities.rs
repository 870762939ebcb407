//! Geometry utility functions
//!
//! Grid rounding and axis constraints shared by the editing operations.

use kurbo::Point;

/// Round a single coordinate to the nearest multiple of `grid`.
///
/// Ties go to the even multiple (banker's rounding), so `0.5` rounds to `0`
/// and `1.5` rounds to `2` on a unit grid. A non-positive or non-finite grid
/// leaves the value untouched.
pub fn round_to_grid(value: f64, grid: f64) -> f64 {
    if !value.is_finite() || !grid.is_finite() || grid <= 0.0 {
        return value;
    }
    (value / grid).round_ties_even() * grid
}

/// Round both coordinates of a point to the grid
pub fn round_point_to_grid(point: Point, grid: f64) -> Point {
    Point::new(round_to_grid(point.x, grid), round_to_grid(point.y, grid))
}

/// Lock a position to horizontal or vertical axis relative to another point
/// (used when shift is held to constrain movement)
pub fn axis_lock_position(pos: Point, relative_to: Point) -> Point {
    let dxy = pos - relative_to;
    if dxy.x.abs() > dxy.y.abs() {
        Point::new(pos.x, relative_to.y)
    } else {
        Point::new(relative_to.x, pos.y)
    }
}
