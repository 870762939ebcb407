//! Hobby-style smooth interpolation
//!
//! Computes cubic control points through a run of on-curve points so that
//! the mock curvature is continuous at every interior joint (John Hobby's
//! spline, as used by METAFONT, with unit tension). The ends are either
//! "curl 1" (free) or fixed to a given direction.

use super::vector::{normalize_angle, rotate, EPSILON};
use kurbo::{Point, Vec2};
use std::f64::consts::SQRT_2;

/// Control points `(c1, c2)` for each of the `points.len() - 1` segments.
///
/// `start_direction` / `end_direction` fix the tangent at the first and last
/// point. Consecutive coincident points make the system degenerate; in that
/// case every segment gets straight handles at 1/3 and 2/3.
pub fn hobby_controls(
    points: &[Point],
    start_direction: Option<Vec2>,
    end_direction: Option<Vec2>,
) -> Vec<(Point, Point)> {
    if points.len() < 2 {
        return Vec::new();
    }
    let n = points.len() - 1;
    let chords: Vec<Vec2> = points.windows(2).map(|w| w[1] - w[0]).collect();
    let lengths: Vec<f64> = chords.iter().map(|c| c.hypot()).collect();
    if lengths.iter().any(|&d| d < EPSILON) {
        return straight_controls(points);
    }

    // Turning angle at each joint; zero at both ends
    let mut psi = vec![0.0; n + 1];
    for k in 1..n {
        psi[k] = normalize_angle(chords[k].atan2() - chords[k - 1].atan2());
    }

    let start_theta = start_direction
        .filter(|d| d.hypot() > EPSILON)
        .map(|d| normalize_angle(d.atan2() - chords[0].atan2()));
    // theta_n stands in for -phi_n
    let end_theta = end_direction
        .filter(|d| d.hypot() > EPSILON)
        .map(|d| normalize_angle(d.atan2() - chords[n - 1].atan2()));

    let theta = if n == 1 {
        match (start_theta, end_theta) {
            (None, None) => vec![0.0, 0.0],
            (Some(t0), None) => vec![t0, -t0],
            (None, Some(tn)) => vec![-tn, tn],
            (Some(t0), Some(tn)) => vec![t0, tn],
        }
    } else {
        let mut a = vec![0.0; n + 1];
        let mut b = vec![0.0; n + 1];
        let mut c = vec![0.0; n + 1];
        let mut d = vec![0.0; n + 1];

        match start_theta {
            Some(t0) => {
                b[0] = 1.0;
                d[0] = t0;
            }
            None => {
                // curl 1: theta_0 equals phi_1
                b[0] = 3.0;
                c[0] = 3.0;
                d[0] = -3.0 * psi[1];
            }
        }
        for k in 1..n {
            a[k] = 1.0 / lengths[k - 1];
            b[k] = 2.0 / lengths[k - 1] + 2.0 / lengths[k];
            c[k] = 1.0 / lengths[k];
            d[k] = -2.0 * psi[k] / lengths[k - 1] - psi[k + 1] / lengths[k];
        }
        match end_theta {
            Some(tn) => {
                b[n] = 1.0;
                d[n] = tn;
            }
            None => {
                // curl 1: phi_n equals theta_{n-1}
                a[n] = 1.0;
                b[n] = 1.0;
                d[n] = 0.0;
            }
        }
        solve_tridiagonal(&a, &b, &c, &d)
    };

    (0..n)
        .map(|k| {
            let th = theta[k];
            let ph = -psi[k + 1] - theta[k + 1];
            let rho = velocity(th, ph);
            let sigma = velocity(ph, th);
            let c1 = points[k] + rotate(chords[k], th) * (rho / 3.0);
            let c2 = points[k + 1] - rotate(chords[k], -ph) * (sigma / 3.0);
            (c1, c2)
        })
        .collect()
}

/// Hobby's velocity function for unit tension
fn velocity(theta: f64, phi: f64) -> f64 {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    let sqrt5 = 5f64.sqrt();
    let numerator = 2.0 + SQRT_2 * (st - sp / 16.0) * (sp - st / 16.0) * (ct - cp);
    let denominator = 1.0 + 0.5 * (sqrt5 - 1.0) * ct + 0.5 * (3.0 - sqrt5) * cp;
    if denominator < EPSILON {
        // METAFONT caps runaway velocities at 4
        return 4.0;
    }
    (numerator / denominator).min(4.0)
}

fn straight_controls(points: &[Point]) -> Vec<(Point, Point)> {
    points
        .windows(2)
        .map(|w| (w[0].lerp(w[1], 1.0 / 3.0), w[0].lerp(w[1], 2.0 / 3.0)))
        .collect()
}

/// Thomas algorithm; `a` is the sub-diagonal, `c` the super-diagonal
fn solve_tridiagonal(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];
    c_prime[0] = c[0] / b[0];
    d_prime[0] = d[0] / b[0];
    for i in 1..n {
        let pivot = b[i] - a[i] * c_prime[i - 1];
        c_prime[i] = if i + 1 < n { c[i] / pivot } else { 0.0 };
        d_prime[i] = (d[i] - a[i] * d_prime[i - 1]) / pivot;
    }
    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicircle_tangents() {
        let points = [
            Point::new(-100.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 0.0),
        ];
        let controls = hobby_controls(&points, None, None);
        assert_eq!(controls.len(), 2);
        // Leaves the first point straight up
        assert!((controls[0].0.x - -100.0).abs() < 1e-9);
        assert!(controls[0].0.y > 0.0);
        // Horizontal tangent through the top joint
        assert!((controls[0].1.y - 100.0).abs() < 1e-9);
        assert!((controls[1].0.y - 100.0).abs() < 1e-9);
        // Arrives at the last point straight down
        assert!((controls[1].1.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_points_stay_straight() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(120.0, 0.0),
        ];
        for (c1, c2) in hobby_controls(&points, None, None) {
            assert!(c1.y.abs() < 1e-9);
            assert!(c2.y.abs() < 1e-9);
        }
    }

    #[test]
    fn test_two_points_without_directions_is_a_line() {
        let controls = hobby_controls(&[Point::new(0.0, 0.0), Point::new(90.0, 0.0)], None, None);
        assert_eq!(controls.len(), 1);
        assert!((controls[0].0 - Point::new(30.0, 0.0)).hypot() < 1e-9);
        assert!((controls[0].1 - Point::new(60.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_fixed_start_direction() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(200.0, 0.0),
        ];
        let controls = hobby_controls(&points, Some(Vec2::new(0.0, 1.0)), None);
        let first_handle = controls[0].0 - points[0];
        assert!(first_handle.x.abs() < 1e-9);
        assert!(first_handle.y > 0.0);
    }

    #[test]
    fn test_fixed_end_direction() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(200.0, 0.0),
        ];
        let controls = hobby_controls(&points, None, Some(Vec2::new(0.0, -1.0)));
        let last_handle = controls[1].1 - points[2];
        assert!(last_handle.x.abs() < 1e-9);
        assert!(last_handle.y > 0.0);
    }

    #[test]
    fn test_coincident_points_fall_back() {
        let points = [Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(30.0, 0.0)];
        let controls = hobby_controls(&points, None, None);
        assert_eq!(controls.len(), 2);
        assert!((controls[1].0 - Point::new(10.0, 0.0)).hypot() < 1e-9);
    }
}
