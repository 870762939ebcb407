//! Line and segment intersections
//!
//! Cut lines are infinite: the parameter along the line is reported but never
//! used to reject a hit. Segment parameters are clamped to `[0, 1]`.

use super::vector::EPSILON;
use kurbo::common::solve_cubic;
use kurbo::{CubicBez, Line, ParamCurve, Point, Vec2};

/// Tolerance for accepting a root slightly outside `[0, 1]`
const PARAM_TOLERANCE: f64 = 1e-9;

/// A segment crossing an infinite line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    /// Parameter on the segment, in `[0, 1]`
    pub segment_t: f64,
    /// Position along the cut line: 0 at its first point, 1 at its second
    pub line_t: f64,
    /// Where the crossing happens
    pub point: Point,
}

/// Intersection of two infinite lines: returns `(t, u)` with
/// `a0 + t (a1 - a0) == b0 + u (b1 - b0)`, or `None` when parallel.
pub fn line_line_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<(f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let denom = da.cross(db);
    if denom.abs() < EPSILON {
        return None;
    }
    let offset = b0 - a0;
    Some((offset.cross(db) / denom, offset.cross(da) / denom))
}

fn line_param(point: Point, from: Point, dir: Vec2) -> f64 {
    (point - from).dot(dir) / dir.hypot2()
}

/// Crossings of a straight segment with the infinite line through `from` and `to`
pub fn line_segment_hits(segment: Line, from: Point, to: Point) -> Vec<LineHit> {
    let dir = to - from;
    if dir.hypot2() < EPSILON * EPSILON {
        return Vec::new();
    }
    let d0 = dir.cross(segment.p0 - from);
    let d1 = dir.cross(segment.p1 - from);
    if (d0 - d1).abs() < EPSILON {
        // Parallel or collinear: no isolated crossing
        return Vec::new();
    }
    let t = d0 / (d0 - d1);
    if !(-PARAM_TOLERANCE..=1.0 + PARAM_TOLERANCE).contains(&t) {
        return Vec::new();
    }
    let t = t.clamp(0.0, 1.0);
    let point = segment.eval(t);
    vec![LineHit {
        segment_t: t,
        line_t: line_param(point, from, dir),
        point,
    }]
}

/// Crossings of a cubic with the infinite line through `from` and `to`,
/// sorted by segment parameter.
///
/// The signed distance of the curve from the line is a cubic polynomial in
/// `t`; its real roots in `[0, 1]` are the crossings.
pub fn cubic_line_hits(curve: &CubicBez, from: Point, to: Point) -> Vec<LineHit> {
    let dir = to - from;
    if dir.hypot2() < EPSILON * EPSILON {
        return Vec::new();
    }
    let dist = |p: Point| dir.cross(p - from);
    let (d0, d1, d2, d3) = (
        dist(curve.p0),
        dist(curve.p1),
        dist(curve.p2),
        dist(curve.p3),
    );
    // Power basis coefficients of the Bernstein form
    let c0 = d0;
    let c1 = 3.0 * (d1 - d0);
    let c2 = 3.0 * (d2 - 2.0 * d1 + d0);
    let c3 = d3 - 3.0 * d2 + 3.0 * d1 - d0;

    let mut ts: Vec<f64> = solve_cubic(c0, c1, c2, c3)
        .into_iter()
        .filter(|t| t.is_finite() && (-PARAM_TOLERANCE..=1.0 + PARAM_TOLERANCE).contains(t))
        .map(|t| t.clamp(0.0, 1.0))
        .collect();
    ts.sort_by(|a, b| a.total_cmp(b));
    ts.dedup_by(|a, b| (*a - *b).abs() < 1e-7);

    ts.into_iter()
        .map(|t| {
            let point = curve.eval(t);
            LineHit {
                segment_t: t,
                line_t: line_param(point, from, dir),
                point,
            }
        })
        .collect()
}
