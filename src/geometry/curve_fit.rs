//! Least-squares cubic fitting
//!
//! Fits one cubic Bezier to a run of sample points with fixed endpoint
//! tangent directions. Parameters start from chord length and are refined
//! with Newton steps until the worst deviation stops improving or the
//! iteration cap is hit.

use super::bezier::{derivative, second_derivative};
use super::vector::{unit, EPSILON};
use kurbo::{CubicBez, ParamCurve, Point, Vec2};

/// Default cap on reparametrization passes
pub const MAX_FIT_ITERATIONS: usize = 20;

/// Result of a fit: the curve plus its worst squared sample deviation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicFit {
    pub curve: CubicBez,
    /// Largest squared distance between a sample and its curve point
    pub max_error_sq: f64,
    pub iterations: usize,
}

impl CubicFit {
    pub fn max_error(&self) -> f64 {
        self.max_error_sq.sqrt()
    }
}

/// Chord-length parameters in `[0, 1]` for the samples
pub fn chord_length_parameters(points: &[Point]) -> Vec<f64> {
    let mut params = Vec::with_capacity(points.len());
    let mut total = 0.0;
    params.push(0.0);
    for pair in points.windows(2) {
        total += (pair[1] - pair[0]).hypot();
        params.push(total);
    }
    if total < EPSILON {
        let n = points.len().saturating_sub(1).max(1) as f64;
        return (0..points.len()).map(|i| i as f64 / n).collect();
    }
    params.iter().map(|d| d / total).collect()
}

/// Worst squared deviation and the index of the sample that has it
pub fn max_deviation(curve: &CubicBez, points: &[Point], params: &[f64]) -> (f64, usize) {
    points
        .iter()
        .zip(params)
        .enumerate()
        .map(|(i, (p, &u))| ((curve.eval(u) - *p).hypot2(), i))
        .fold((0.0, 0), |best, cur| if cur.0 > best.0 { cur } else { best })
}

/// Fit a single cubic to `points`.
///
/// `start_tangent` points from the first sample into the curve; `end_tangent`
/// points from the last sample back into the curve. When a tangent is
/// missing it is estimated from the neighboring sample. Returns `None` for
/// fewer than two samples.
pub fn fit_cubic(
    points: &[Point],
    start_tangent: Option<Vec2>,
    end_tangent: Option<Vec2>,
    tolerance: f64,
    max_iterations: usize,
) -> Option<CubicFit> {
    if points.len() < 2 {
        return None;
    }
    let first = points[0];
    let last = points[points.len() - 1];

    let t1 = start_tangent
        .and_then(unit)
        .or_else(|| unit(points[1] - first))
        .unwrap_or(Vec2::ZERO);
    let t2 = end_tangent
        .and_then(unit)
        .or_else(|| unit(points[points.len() - 2] - last))
        .unwrap_or(Vec2::ZERO);

    let mut params = chord_length_parameters(points);
    let mut best_curve = generate_bezier(points, &params, t1, t2);
    let (mut best_error, _) = max_deviation(&best_curve, points, &params);
    let tolerance_sq = tolerance * tolerance;
    let mut iterations = 0;

    while iterations < max_iterations && best_error > tolerance_sq {
        iterations += 1;
        let refined = reparameterize(&best_curve, points, &params);
        let candidate = generate_bezier(points, &refined, t1, t2);
        let (error, _) = max_deviation(&candidate, points, &refined);
        if error >= best_error {
            break;
        }
        best_error = error;
        best_curve = candidate;
        params = refined;
    }

    Some(CubicFit {
        curve: best_curve,
        max_error_sq: best_error,
        iterations,
    })
}

/// Solve the 2x2 least-squares system for the handle lengths.
fn generate_bezier(points: &[Point], params: &[f64], t1: Vec2, t2: Vec2) -> CubicBez {
    let first = points[0];
    let last = points[points.len() - 1];
    let chord = (last - first).hypot();

    let mut c = [[0.0; 2]; 2];
    let mut x = [0.0; 2];
    for (p, &u) in points.iter().zip(params) {
        let mt = 1.0 - u;
        let b0 = mt * mt * mt;
        let b1 = 3.0 * u * mt * mt;
        let b2 = 3.0 * u * u * mt;
        let b3 = u * u * u;
        let a0 = t1 * b1;
        let a1 = t2 * b2;
        c[0][0] += a0.dot(a0);
        c[0][1] += a0.dot(a1);
        c[1][1] += a1.dot(a1);
        let base = first.to_vec2() * (b0 + b1) + last.to_vec2() * (b2 + b3);
        let tmp = p.to_vec2() - base;
        x[0] += a0.dot(tmp);
        x[1] += a1.dot(tmp);
    }
    c[1][0] = c[0][1];

    let det = c[0][0] * c[1][1] - c[0][1] * c[1][0];
    let (mut alpha1, mut alpha2) = if det.abs() > EPSILON {
        (
            (x[0] * c[1][1] - c[0][1] * x[1]) / det,
            (c[0][0] * x[1] - c[1][0] * x[0]) / det,
        )
    } else {
        (0.0, 0.0)
    };

    // Degenerate or backwards handles: fall back to a third of the chord
    let min_alpha = chord * 1e-6;
    if alpha1 < min_alpha || alpha2 < min_alpha {
        alpha1 = chord / 3.0;
        alpha2 = chord / 3.0;
    }

    CubicBez::new(first, first + t1 * alpha1, last + t2 * alpha2, last)
}

/// One Newton-Raphson step per sample toward its closest curve parameter
fn reparameterize(curve: &CubicBez, points: &[Point], params: &[f64]) -> Vec<f64> {
    points
        .iter()
        .zip(params)
        .map(|(p, &u)| {
            let diff = curve.eval(u) - *p;
            let d1 = derivative(curve, u);
            let d2 = second_derivative(curve, u);
            let numerator = diff.dot(d1);
            let denominator = d1.dot(d1) + diff.dot(d2);
            if denominator.abs() < EPSILON {
                u
            } else {
                (u - numerator / denominator).clamp(0.0, 1.0)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(curve: &CubicBez, count: usize) -> Vec<Point> {
        (0..=count)
            .map(|i| curve.eval(i as f64 / count as f64))
            .collect()
    }

    #[test]
    fn test_chord_length_parameters() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(3.0, 0.0)];
        let params = chord_length_parameters(&pts);
        assert_eq!(params.len(), 3);
        assert!((params[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(params[2], 1.0);
    }

    #[test]
    fn test_fit_recovers_known_curve() {
        let curve = CubicBez::new((0.0, 0.0), (20.0, 80.0), (80.0, 80.0), (100.0, 0.0));
        let points = sample(&curve, 24);
        let fit = fit_cubic(
            &points,
            Some(curve.p1 - curve.p0),
            Some(curve.p2 - curve.p3),
            0.01,
            MAX_FIT_ITERATIONS,
        )
        .expect("fit");
        assert!(fit.max_error() < 1.0, "error {}", fit.max_error());
        assert!((fit.curve.p1 - curve.p1).hypot() < 5.0);
        assert!((fit.curve.p2 - curve.p2).hypot() < 5.0);
    }

    #[test]
    fn test_fit_respects_iteration_cap() {
        // A zig-zag can't be fit by one cubic; the loop must still terminate
        let points: Vec<Point> = (0..30)
            .map(|i| Point::new(i as f64 * 10.0, if i % 2 == 0 { 0.0 } else { 40.0 }))
            .collect();
        let fit = fit_cubic(&points, None, None, 0.01, 5).expect("fit");
        assert!(fit.iterations <= 5);
        assert!(fit.max_error_sq.is_finite());
    }

    #[test]
    fn test_fit_two_points_is_straight() {
        let points = [Point::new(0.0, 0.0), Point::new(90.0, 0.0)];
        let fit = fit_cubic(&points, None, None, 0.01, MAX_FIT_ITERATIONS).expect("fit");
        assert!((fit.curve.p1 - Point::new(30.0, 0.0)).hypot() < 1e-9);
        assert!((fit.curve.p2 - Point::new(60.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_single_point() {
        assert!(fit_cubic(&[Point::ZERO], None, None, 0.01, MAX_FIT_ITERATIONS).is_none());
    }
}
