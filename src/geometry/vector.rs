//! Vector helpers for tangent constraints
//!
//! Projection and rotation are the two ways a handle gets pulled back into
//! line with a smooth point. Both refuse to divide by a zero-length vector and
//! fall back to returning the input point unchanged.

use kurbo::{Point, Vec2};
use std::f64::consts::PI;

/// Lengths below this are treated as zero
pub const EPSILON: f64 = 1e-9;

/// Project `point` onto the infinite line through `a` and `b`.
///
/// If `a` and `b` coincide the line is undefined and `a` is returned.
pub fn project_onto_line(point: Point, a: Point, b: Point) -> Point {
    let dir = b - a;
    let len_sq = dir.hypot2();
    if len_sq < EPSILON * EPSILON {
        return a;
    }
    let t = (point - a).dot(dir) / len_sq;
    a + dir * t
}

/// Reposition `fixed` so it lies on the ray from `toward` through `pivot`
/// (extended past `pivot`), keeping its distance from `pivot`.
///
/// This is the distance-preserving alignment used for the unmoved handle of a
/// smooth point. Returns `fixed` unchanged when `toward` sits on `pivot`.
pub fn rotate_to_ray(fixed: Point, pivot: Point, toward: Point) -> Point {
    let dir = pivot - toward;
    let len = dir.hypot();
    if len < EPSILON {
        return fixed;
    }
    let distance = (fixed - pivot).hypot();
    pivot + dir * (distance / len)
}

/// Signed angle from `a` to `b` in radians, in `(-π, π]`
pub fn signed_angle(a: Vec2, b: Vec2) -> f64 {
    a.cross(b).atan2(a.dot(b))
}

/// Unsigned angle between two vectors in `[0, π]`
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    signed_angle(a, b).abs()
}

/// Wrap an angle into `(-π, π]`
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Rotate a vector counter-clockwise by `angle` radians
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unit vector in the direction of `v`, or `None` for a zero vector
pub fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    (len >= EPSILON).then(|| v / len)
}

/// True when `a`, `pivot` and `b` form a straight angle at `pivot`, within
/// `tolerance` radians. Degenerate arms count as colinear.
pub fn is_colinear(a: Point, pivot: Point, b: Point, tolerance: f64) -> bool {
    let va = a - pivot;
    let vb = b - pivot;
    if va.hypot() < EPSILON || vb.hypot() < EPSILON {
        return true;
    }
    (PI - angle_between(va, vb)).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_onto_line() {
        let p = project_onto_line(Point::new(3.0, 4.0), Point::ZERO, Point::new(10.0, 0.0));
        assert_eq!(p, Point::new(3.0, 0.0));
    }

    #[test]
    fn test_project_onto_degenerate_line() {
        let a = Point::new(2.0, 2.0);
        assert_eq!(project_onto_line(Point::new(5.0, 5.0), a, a), a);
    }

    #[test]
    fn test_rotate_to_ray_preserves_distance() {
        let pivot = Point::new(0.0, 0.0);
        let toward = Point::new(-10.0, 10.0);
        let fixed = Point::new(30.0, 0.0);
        let result = rotate_to_ray(fixed, pivot, toward);
        assert!(((result - pivot).hypot() - 30.0).abs() < 1e-9);
        let angle = angle_between(toward - pivot, result - pivot);
        assert!((angle - PI).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(2.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn test_signed_angle_direction() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert!((signed_angle(a, b) - PI / 2.0).abs() < 1e-12);
        assert!((signed_angle(b, a) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_colinear() {
        let pivot = Point::new(10.0, 10.0);
        assert!(is_colinear(
            Point::new(0.0, 10.0),
            pivot,
            Point::new(25.0, 10.0),
            1e-6
        ));
        assert!(!is_colinear(
            Point::new(0.0, 10.0),
            pivot,
            Point::new(20.0, 20.0),
            0.05
        ));
    }
}
