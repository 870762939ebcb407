//! Cubic Bezier math
//!
//! Thin helpers over kurbo's curve types: exact subdivision, derivatives with
//! sensible fallbacks at degenerate endpoints, projection and degree
//! elevation.

use super::vector::EPSILON;
use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, ParamCurveExtrema, ParamCurveNearest, Point, Rect, Vec2};

/// Accuracy passed to kurbo's nearest-point search
pub const NEAREST_ACCURACY: f64 = 1e-9;

/// Starting parameters for the Newton refinement in `nearest`
const NEAREST_SAMPLES: usize = 16;

/// Split a cubic at `t` with de Casteljau's construction.
///
/// The two halves share the split point exactly; no approximation is involved.
pub fn split_cubic(curve: &CubicBez, t: f64) -> (CubicBez, CubicBez) {
    let p01 = curve.p0.lerp(curve.p1, t);
    let p12 = curve.p1.lerp(curve.p2, t);
    let p23 = curve.p2.lerp(curve.p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);
    (
        CubicBez::new(curve.p0, p01, p012, mid),
        CubicBez::new(mid, p123, p23, curve.p3),
    )
}

/// Split a cubic at several ascending parameters, returning `ts.len() + 1` pieces
pub fn split_cubic_many(curve: &CubicBez, ts: &[f64]) -> Vec<CubicBez> {
    let mut pieces = Vec::with_capacity(ts.len() + 1);
    let mut rest = *curve;
    let mut consumed: f64 = 0.0;
    for &t in ts {
        // Re-map t into the parameter space of the remaining tail
        let local = if (1.0 - consumed).abs() < EPSILON {
            0.0
        } else {
            ((t - consumed) / (1.0 - consumed)).clamp(0.0, 1.0)
        };
        let (head, tail) = split_cubic(&rest, local);
        pieces.push(head);
        rest = tail;
        consumed = t;
    }
    pieces.push(rest);
    pieces
}

/// First derivative at `t`
pub fn derivative(curve: &CubicBez, t: f64) -> Vec2 {
    curve.deriv().eval(t).to_vec2()
}

/// Second derivative at `t`
pub fn second_derivative(curve: &CubicBez, t: f64) -> Vec2 {
    curve.deriv().deriv().eval(t).to_vec2()
}

/// Tangent direction at `t`, falling back to the chord between control
/// points when the derivative vanishes (a handle sitting on its anchor).
pub fn tangent(curve: &CubicBez, t: f64) -> Vec2 {
    let d = derivative(curve, t);
    if d.hypot() > EPSILON {
        return d;
    }
    let fallback = if t < 0.5 {
        curve.p2 - curve.p0
    } else {
        curve.p3 - curve.p1
    };
    if fallback.hypot() > EPSILON {
        fallback
    } else {
        curve.p3 - curve.p0
    }
}

/// Closest point on the curve to `point`: `(t, distance)`
///
/// kurbo's answer is checked against Newton refinement from evenly spaced
/// starts, which stays reliable for nearly straight curves.
pub fn nearest(curve: &CubicBez, point: Point) -> (f64, f64) {
    let hit = curve.nearest(point, NEAREST_ACCURACY);
    let mut best = (hit.t, hit.distance_sq);
    for i in 0..=NEAREST_SAMPLES {
        let t = refine_nearest(curve, point, i as f64 / NEAREST_SAMPLES as f64);
        let distance_sq = (curve.eval(t) - point).hypot2();
        if distance_sq < best.1 {
            best = (t, distance_sq);
        }
    }
    (best.0, best.1.sqrt())
}

fn refine_nearest(curve: &CubicBez, point: Point, mut t: f64) -> f64 {
    for _ in 0..8 {
        let offset = curve.eval(t) - point;
        let d1 = derivative(curve, t);
        let denom = d1.dot(d1) + offset.dot(second_derivative(curve, t));
        if denom.abs() < EPSILON {
            break;
        }
        t = (t - offset.dot(d1) / denom).clamp(0.0, 1.0);
    }
    t
}

/// Tight bounding box of the curve
pub fn bounds(curve: &CubicBez) -> Rect {
    curve.bounding_box()
}

/// Control points of a straight cubic from `p0` to `p1` (handles at 1/3 and 2/3)
pub fn line_handles(p0: Point, p1: Point) -> (Point, Point) {
    (p0.lerp(p1, 1.0 / 3.0), p0.lerp(p1, 2.0 / 3.0))
}

/// Elevate a quadratic (`p0`, `control`, `p2`) to cubic handles with the 2/3 rule
pub fn quad_to_cubic(p0: Point, control: Point, p2: Point) -> (Point, Point) {
    (
        p0 + (control - p0) * (2.0 / 3.0),
        p2 + (control - p2) * (2.0 / 3.0),
    )
}

/// True when both handles lie on the chord within `tolerance`
pub fn is_line_like(curve: &CubicBez, tolerance: f64) -> bool {
    let chord = curve.p3 - curve.p0;
    let len = chord.hypot();
    if len < EPSILON {
        return (curve.p1 - curve.p0).hypot() <= tolerance
            && (curve.p2 - curve.p0).hypot() <= tolerance;
    }
    let distance = |p: Point| (p - curve.p0).cross(chord).abs() / len;
    let along = |p: Point| (p - curve.p0).dot(chord) / (len * len);
    let within = |p: Point| {
        let a = along(p);
        distance(p) <= tolerance && (-EPSILON..=1.0 + EPSILON).contains(&a)
    };
    within(curve.p1) && within(curve.p2)
}
