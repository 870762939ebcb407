//! Knife: cutting a layer's paths along a straight line
//!
//! Every crossing of the cut line with a segment becomes an on-curve point,
//! inserted by exact subdivision. Open paths simply fall apart at those
//! points. Closed paths are rebuilt: crossings are ordered along the cut
//! line and paired up, and each new contour follows outline arcs from one
//! crossing to the next, jumping across the cut to the paired crossing.

use crate::data::handles::LayerMut;
use crate::data::path::{Path, Segment};
use crate::data::point::{EditPoint, PointType};
use crate::editing::path_ops::{indices_between, reversed_points, split_open_at};
use crate::editing::undo::UndoScope;
use crate::geometry::bezier::{split_cubic_many, tangent};
use crate::geometry::intersect::{cubic_line_hits, line_segment_hits, LineHit};
use crate::geometry::utilities::axis_lock_position;
use kurbo::{PathSeg, Point, Vec2};
use std::collections::HashMap;
use tracing::debug;

/// Crossings this close to a segment end belong to the end point
const END_TOLERANCE: f64 = 1e-7;

/// Directions closer to the cut than this (relative) run along it
const SIDE_TOLERANCE: f64 = 1e-9;

/// A path with its cut points inserted
#[derive(Debug, Clone)]
struct SplitPath {
    points: Vec<EditPoint>,
    closed: bool,
    /// `(point index, position along the cut line)`
    splits: Vec<(usize, f64)>,
    inserted: bool,
}

impl SplitPath {
    fn path(&self) -> Path {
        Path::from_points(self.points.clone())
    }

    /// Reverse a closed split path, keeping its first point and the split
    /// annotations in step
    fn reverse(&mut self) {
        let n = self.points.len();
        self.points = reversed_points(&self.path());
        for (index, _) in self.splits.iter_mut() {
            if *index != 0 {
                *index = n - *index;
            }
        }
    }

    /// Current index of the split at `line_t` along the cut
    fn index_of(&self, line_t: f64) -> Option<usize> {
        self.splits.iter().find(|(_, t)| *t == line_t).map(|(i, _)| *i)
    }

    /// Which side of the cut the outline heads to after the split at `line_t`
    fn side(&self, line_t: f64, cut: Vec2) -> f64 {
        let path = self.path();
        match self.index_of(line_t).and_then(|i| path.segment_starting_at(i)) {
            Some(segment) => tangent(&segment.to_cubic(&path), 0.0).cross(cut).signum(),
            None => 0.0,
        }
    }
}

/// Which side of the cut `direction` points to: 1, -1, or 0 along the cut
fn side_of(direction: Vec2, cut: Vec2) -> f64 {
    let cross = cut.cross(direction);
    if cross.abs() <= SIDE_TOLERANCE * direction.hypot() * cut.hypot() {
        0.0
    } else {
        cross.signum()
    }
}

/// Whether the outline passes through the cut at the start of segment `si`,
/// rather than touching it. A run of segments lying along the cut counts
/// once, at its far end.
fn crosses_at_vertex(path: &Path, segments: &[Segment], si: usize, cut: Vec2) -> bool {
    let after = side_of(tangent(&segments[si].to_cubic(path), 0.0), cut);
    if after == 0.0 {
        return false;
    }
    let count = segments.len();
    let mut k = si;
    for _ in 0..count {
        k = match k {
            0 if path.is_closed() => count - 1,
            0 => return false,
            _ => k - 1,
        };
        let before = side_of(-tangent(&segments[k].to_cubic(path), 1.0), cut);
        if before != 0.0 {
            return before != after;
        }
    }
    false
}

fn segment_hits(segment: PathSeg, from: Point, to: Point) -> Vec<LineHit> {
    match segment {
        PathSeg::Line(line) => line_segment_hits(line, from, to),
        PathSeg::Cubic(curve) => cubic_line_hits(&curve, from, to),
        PathSeg::Quad(quad) => cubic_line_hits(&quad.raise(), from, to),
    }
}

/// Rebuild `path` with a point at every crossing of the cut line
fn insert_splits(path: &Path, from: Point, to: Point) -> SplitPath {
    let closed = path.is_closed();
    let segments = path.segments();
    let mut split = SplitPath {
        points: path.points.clone(),
        closed,
        splits: Vec::new(),
        inserted: false,
    };
    if segments.is_empty() {
        return split;
    }

    let pts = &path.points;
    let mut out = vec![pts[segments[0].start].clone()];
    let mut splits: Vec<(usize, f64)> = Vec::new();
    let mut inserted = false;

    for (si, segment) in segments.iter().enumerate() {
        let start_index = out.len() - 1;
        let mut interior: Vec<(f64, f64)> = Vec::new();
        for hit in segment_hits(segment.to_path_seg(path), from, to) {
            if hit.segment_t >= 1.0 - END_TOLERANCE {
                // Counted as the start of the following segment
                continue;
            }
            if hit.segment_t <= END_TOLERANCE {
                if (closed || si > 0)
                    && !splits.iter().any(|(i, _)| *i == start_index)
                    && crosses_at_vertex(path, &segments, si, to - from)
                {
                    splits.push((start_index, hit.line_t));
                }
                continue;
            }
            interior.push((hit.segment_t, hit.line_t));
        }
        interior.sort_by(|a, b| a.0.total_cmp(&b.0));

        if interior.is_empty() {
            out.extend(indices_between(path, segment.start, segment.end).into_iter().map(|i| pts[i].clone()));
            out.push(pts[segment.end].clone());
            continue;
        }

        inserted = true;
        match segment.handles() {
            None => {
                let (p0, p1) = (pts[segment.start].position(), pts[segment.end].position());
                for &(t, line_t) in &interior {
                    let p = p0.lerp(p1, t);
                    out.push(EditPoint::line_to(p.x, p.y));
                    splits.push((out.len() - 1, line_t));
                }
                out.push(pts[segment.end].clone());
            }
            Some(_) => {
                let ts: Vec<f64> = interior.iter().map(|(t, _)| *t).collect();
                let pieces = split_cubic_many(&segment.to_cubic(path), &ts);
                let count = pieces.len();
                for (k, piece) in pieces.into_iter().enumerate() {
                    out.push(EditPoint::off_curve(piece.p1.x, piece.p1.y));
                    out.push(EditPoint::off_curve(piece.p2.x, piece.p2.y));
                    if k + 1 < count {
                        out.push(EditPoint::curve_to(piece.p3.x, piece.p3.y).with_smooth(true));
                        splits.push((out.len() - 1, interior[k].1));
                    } else {
                        out.push(pts[segment.end].clone());
                    }
                }
            }
        }
    }

    if !inserted && splits.is_empty() {
        return split;
    }
    if closed {
        // The wrapping segment ends on the first point
        out.pop();
    }
    split.points = out;
    split.splits = splits;
    split.inserted = inserted;
    split
}

/// An outline stretch between two cut points of one closed path
#[derive(Debug, Clone, Copy)]
struct Arc {
    path: usize,
    start: usize,
    end: usize,
}

impl Arc {
    fn points(&self, split: &SplitPath) -> Vec<EditPoint> {
        let n = split.points.len();
        let mut out = vec![split.points[self.start].clone()];
        let mut i = (self.start + 1) % n;
        loop {
            out.push(split.points[i].clone());
            if i == self.end {
                break;
            }
            i = (i + 1) % n;
        }
        out
    }
}

/// Closed-path crossings `(path, point, line_t)` in order along the cut.
/// With an odd count the farthest is dropped from its path's splits.
fn closed_crossings(split_paths: &mut [SplitPath]) -> Vec<(usize, usize, f64)> {
    let mut crossings: Vec<(usize, usize, f64)> = split_paths
        .iter()
        .enumerate()
        .filter(|(_, s)| s.closed)
        .flat_map(|(p, s)| s.splits.iter().map(move |&(i, line_t)| (p, i, line_t)))
        .collect();
    crossings.sort_by(|a, b| a.2.total_cmp(&b.2));
    if crossings.len() % 2 == 1 {
        if let Some((p, i, _)) = crossings.pop() {
            debug!("[KNIFE] odd crossing count, not cutting path {} at point {}", p, i);
            split_paths[p].splits.retain(|(index, _)| *index != i);
        }
    }
    crossings
}

/// Cut every path of the layer along the line through `from` and `to`.
///
/// Returns false, leaving the layer untouched, when the line misses every
/// path. An odd number of closed-path crossings cannot all be paired; the
/// one farthest along the line is inserted as a point but not cut.
pub fn slice(layer: &mut LayerMut<'_>, from: Point, to: Point) -> bool {
    let cut = to - from;
    if cut.hypot2() == 0.0 {
        return false;
    }

    let mut split_paths: Vec<SplitPath> = layer
        .layer()
        .paths
        .iter()
        .map(|path| insert_splits(path, from, to))
        .collect();
    if split_paths.iter().all(|s| s.splits.is_empty() && !s.inserted) {
        debug!("[KNIFE] cut from {:?} to {:?} misses every path", from, to);
        return false;
    }

    let crossings = closed_crossings(&mut split_paths);

    // Pair crossings, making paired paths run in opposite directions across
    // the cut. Reversing a path renumbers its points, so pairs are resolved
    // after every reversal.
    let mut pairs: Vec<((usize, f64), (usize, f64))> = Vec::new();
    let mut fixed = vec![false; split_paths.len()];
    for pair in crossings.chunks(2) {
        let (a, b) = (pair[0], pair[1]);
        let (pa, pb) = (a.0, b.0);
        if pa != pb {
            let side_a = split_paths[pa].side(a.2, cut);
            let side_b = split_paths[pb].side(b.2, cut);
            if side_a != 0.0 && side_a == side_b {
                if !fixed[pb] {
                    split_paths[pb].reverse();
                } else if !fixed[pa] {
                    split_paths[pa].reverse();
                } else {
                    debug!("[KNIFE] paths {} and {} run the same way across the cut", pa, pb);
                }
            }
        }
        fixed[pa] = true;
        fixed[pb] = true;
        pairs.push(((pa, a.2), (pb, b.2)));
    }

    // Splits are located by cut position once winding is settled
    let mut partner: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    for ((pa, ta), (pb, tb)) in &pairs {
        if let (Some(a), Some(b)) = (split_paths[*pa].index_of(*ta), split_paths[*pb].index_of(*tb)) {
            partner.insert((*pa, a), (*pb, b));
            partner.insert((*pb, b), (*pa, a));
        }
    }

    let mut arcs: Vec<Arc> = Vec::new();
    let mut arc_from: HashMap<(usize, usize), usize> = HashMap::new();
    for (p, split) in split_paths.iter().enumerate() {
        if !split.closed {
            continue;
        }
        let mut cuts: Vec<usize> = split
            .splits
            .iter()
            .map(|(i, _)| *i)
            .filter(|i| partner.contains_key(&(p, *i)))
            .collect();
        cuts.sort_unstable();
        for (k, &start) in cuts.iter().enumerate() {
            let end = cuts[(k + 1) % cuts.len()];
            arc_from.insert((p, start), arcs.len());
            arcs.push(Arc { path: p, start, end });
        }
    }

    // Walk arcs into new closed contours, keyed by the lowest path they touch
    let mut contours: HashMap<usize, Vec<Path>> = HashMap::new();
    let mut visited = vec![false; arcs.len()];
    for first in 0..arcs.len() {
        if visited[first] {
            continue;
        }
        let mut points: Vec<EditPoint> = Vec::new();
        let mut owner = arcs[first].path;
        let mut current = first;
        loop {
            visited[current] = true;
            let arc = arcs[current];
            owner = owner.min(arc.path);
            let mut arc_points = arc.points(&split_paths[arc.path]);
            let n = arc_points.len();
            arc_points[0].point_type = PointType::Line;
            arc_points[0].smooth = false;
            arc_points[n - 1].smooth = false;
            points.extend(arc_points);

            let next = partner
                .get(&(arc.path, arc.end))
                .and_then(|target| arc_from.get(target))
                .copied();
            match next {
                Some(next) if !visited[next] => current = next,
                _ => break,
            }
        }
        contours.entry(owner).or_default().push(Path::from_points(points));
    }

    let mut paths: Vec<Path> = Vec::new();
    for (p, split) in split_paths.iter().enumerate() {
        let cut_points: Vec<usize> = split.splits.iter().map(|(i, _)| *i).collect();
        if !split.closed {
            if cut_points.is_empty() {
                paths.push(split.path());
            } else {
                paths.extend(split_open_at(&split.points, &cut_points));
            }
            continue;
        }
        let is_cut = cut_points.iter().any(|i| partner.contains_key(&(p, *i)));
        if !is_cut {
            paths.push(split.path());
        }
        if let Some(new_contours) = contours.remove(&p) {
            paths.extend(new_contours);
        }
    }

    if paths == layer.layer().paths {
        return false;
    }
    debug!(
        "[KNIFE] cut from {:?} to {:?}: {} paths become {}",
        from,
        to,
        layer.layer().paths.len(),
        paths.len()
    );
    let mut layer = layer.undo_group();
    layer.set_paths(paths);
    true
}

/// Slice with the cut held horizontal or vertical, whichever is closer to
/// the line through `from` and `to`
pub fn slice_axis_locked(layer: &mut LayerMut<'_>, from: Point, to: Point) -> bool {
    slice(layer, from, axis_lock_position(to, from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::glyph::Glyph;
    use crate::data::layer::Layer;
    use crate::data::path::test_paths::{blob, open_line, square, square_at};
    use crate::editing::undo::UndoTarget;

    fn glyph_with(paths: Vec<Path>) -> Glyph {
        let mut layer = Layer::new("default");
        for path in paths {
            layer = layer.with_path(path);
        }
        Glyph::new("a").with_layer(layer)
    }

    fn areas(glyph: &Glyph) -> Vec<f64> {
        glyph.layer(0).paths.iter().map(|p| p.signed_area()).collect()
    }

    #[test]
    fn test_slice_square_in_half() {
        let mut glyph = glyph_with(vec![square(100.0)]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(50.0, -10.0), Point::new(50.0, 110.0)));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 2);
        for path in paths {
            assert!(path.is_closed());
            assert_eq!(path.len(), 4);
            assert!((path.signed_area() - 5000.0).abs() < 1e-6);
        }
        let bounds = paths[0].bounds().unwrap();
        assert!((bounds.x0 - 50.0).abs() < 1e-9 && (bounds.x1 - 100.0).abs() < 1e-9);

        glyph.undo().unwrap();
        assert_eq!(glyph.layer(0).paths, vec![square(100.0)]);
    }

    #[test]
    fn test_slice_through_corners() {
        let mut glyph = glyph_with(vec![square(100.0)]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(-10.0, -10.0), Point::new(110.0, 110.0)));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 2);
        for path in paths {
            assert_eq!(path.len(), 3);
            assert!((path.signed_area() - 5000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_slice_ring_joins_outer_and_inner() {
        let inner = Path::from_points(reversed_points(&square_at(25.0, 25.0, 50.0)));
        let mut glyph = glyph_with(vec![square(100.0), inner]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(-10.0, 50.0), Point::new(110.0, 50.0)));
        let areas = areas(&glyph);
        assert_eq!(areas.len(), 2);
        for area in areas {
            assert!((area - 3750.0).abs() < 1e-6, "area {}", area);
        }
    }

    #[test]
    fn test_slice_ring_with_same_winding_counters() {
        let mut glyph = glyph_with(vec![square(100.0), square_at(25.0, 25.0, 50.0)]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(-10.0, 50.0), Point::new(110.0, 50.0)));
        let areas = areas(&glyph);
        assert_eq!(areas.len(), 2);
        for area in areas {
            assert!((area - 3750.0).abs() < 1e-6, "area {}", area);
        }
    }

    #[test]
    fn test_slice_curves_keeps_shape() {
        let mut glyph = glyph_with(vec![blob(100.0)]);
        let before = glyph.layer(0).path(0).signed_area();
        assert!(slice(&mut glyph.layer_mut(0), Point::new(-200.0, 0.0), Point::new(200.0, 0.0)));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 2);
        let total: f64 = paths.iter().map(|p| p.signed_area()).sum();
        assert!((total - before).abs() < 1e-6);
        for path in paths {
            assert!(path.is_closed());
            let bounds = path.bounds().unwrap();
            assert!(bounds.y0.abs() < 1e-9 || bounds.y1.abs() < 1e-9);
        }
    }

    #[test]
    fn test_slice_open_path() {
        let mut glyph = glyph_with(vec![open_line(0.0, 0.0, 100.0, 0.0)]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(50.0, -10.0), Point::new(50.0, 10.0)));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], open_line(0.0, 0.0, 50.0, 0.0));
        assert_eq!(paths[1], open_line(50.0, 0.0, 100.0, 0.0));
    }

    #[test]
    fn test_slice_along_an_edge_leaves_path_alone() {
        let touched = square_at(200.0, 0.0, 100.0);
        let mut glyph = glyph_with(vec![square_at(0.0, -50.0, 100.0), touched.clone()]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(-10.0, 0.0), Point::new(400.0, 0.0)));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], touched);
        assert!((paths[0].signed_area() - 5000.0).abs() < 1e-6);
        assert!((paths[1].signed_area() - 5000.0).abs() < 1e-6);
    }

    #[test]
    fn test_slice_ignores_vertex_that_touches_the_cut() {
        let triangle = Path::from_points(vec![
            EditPoint::line_to(200.0, 50.0),
            EditPoint::line_to(250.0, 100.0),
            EditPoint::line_to(150.0, 100.0),
        ]);
        let mut glyph = glyph_with(vec![square(100.0), triangle.clone()]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(-10.0, 50.0), Point::new(400.0, 50.0)));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 3);
        assert!((paths[0].signed_area() - 5000.0).abs() < 1e-6);
        assert!((paths[1].signed_area() - 5000.0).abs() < 1e-6);
        assert_eq!(paths[2], triangle);
        assert!((paths[2].signed_area() - 2500.0).abs() < 1e-6);
    }

    #[test]
    fn test_slice_counts_a_step_along_the_cut_once() {
        // Crosses y=0 by running along it from (100,0) to (50,0)
        let step = Path::from_points(vec![
            EditPoint::line_to(0.0, -50.0),
            EditPoint::line_to(100.0, -50.0),
            EditPoint::line_to(100.0, 0.0),
            EditPoint::line_to(50.0, 0.0),
            EditPoint::line_to(50.0, 50.0),
            EditPoint::line_to(0.0, 50.0),
        ]);
        let mut glyph = glyph_with(vec![step]);
        assert!(slice(&mut glyph.layer_mut(0), Point::new(-10.0, 0.0), Point::new(200.0, 0.0)));
        let mut areas = areas(&glyph);
        areas.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(areas.len(), 2);
        assert!((areas[0] - 2500.0).abs() < 1e-6, "area {}", areas[0]);
        assert!((areas[1] - 5000.0).abs() < 1e-6, "area {}", areas[1]);
    }

    #[test]
    fn test_odd_crossing_count_drops_farthest() {
        let path = square(100.0);
        let mut split_paths = vec![SplitPath {
            points: path.points.clone(),
            closed: true,
            splits: vec![(0, 0.1), (2, 0.9), (1, 0.5)],
            inserted: false,
        }];
        let crossings = closed_crossings(&mut split_paths);
        assert_eq!(crossings, vec![(0, 0, 0.1), (0, 1, 0.5)]);
        assert_eq!(split_paths[0].splits, vec![(0, 0.1), (1, 0.5)]);
    }

    #[test]
    fn test_axis_locked_slice_is_horizontal() {
        let mut glyph = glyph_with(vec![square(100.0)]);
        assert!(slice_axis_locked(&mut glyph.layer_mut(0), Point::new(-10.0, 40.0), Point::new(110.0, 60.0)));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 2);
        let mut areas: Vec<f64> = paths.iter().map(|p| p.signed_area()).collect();
        areas.sort_by(|a, b| a.total_cmp(b));
        assert!((areas[0] - 4000.0).abs() < 1e-6);
        assert!((areas[1] - 6000.0).abs() < 1e-6);
    }

    #[test]
    fn test_slice_that_misses_is_a_noop() {
        let mut glyph = glyph_with(vec![square(100.0)]);
        assert!(!slice(&mut glyph.layer_mut(0), Point::new(200.0, 0.0), Point::new(200.0, 10.0)));
        assert!(!slice(&mut glyph.layer_mut(0), Point::new(5.0, 5.0), Point::new(5.0, 5.0)));
        assert!(!glyph.is_modified());
        assert_eq!(glyph.layer(0).paths, vec![square(100.0)]);
    }
}
