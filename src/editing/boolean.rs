//! Boolean operations on sets of closed contours
//!
//! Contours go through `flo_curves` path arithmetic and are walked back into
//! points afterwards. Overlap checks tessellate with `lyon` and compare
//! filled areas. Open paths never take part; they are carried over
//! verbatim next to the result.

use crate::data::handles::LayerMut;
use crate::data::path::Path;
use crate::data::point::EditPoint;
use crate::editing::path_ops::reversed_points;
use crate::editing::undo::UndoScope;
use crate::geometry::bezier::is_line_like;
use crate::geometry::vector::angle_between;
use flo_curves::bezier::path::{
    path_add, path_intersect, path_remove_interior_points, path_sub, SimpleBezierPath,
};
use flo_curves::Coord2;
use kurbo::{CubicBez, Point, Shape};
use lyon::math::point as lyon_point;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default accuracy handed to the path arithmetic, in font units
pub const DEFAULT_BOOLEAN_ACCURACY: f64 = 0.01;

/// Largest tangent break, in radians, still treated as a smooth join
pub const SMOOTH_TOLERANCE: f64 = 0.05;

/// Tolerance for reading a result curve back as a straight line
const LINE_TOLERANCE: f64 = 1e-3;

/// Result points closer than this are merged
const DUPLICATE_DISTANCE: f64 = 1e-6;

/// Flattening tolerance for area tessellation
const TESSELLATION_TOLERANCE: f32 = 0.05;

/// Area differences below this are tessellation noise
const AREA_TOLERANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Intersect,
    /// First operand minus the second
    Subtract,
    Xor,
}

impl std::fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BooleanOp::Union => "union",
            BooleanOp::Intersect => "intersect",
            BooleanOp::Subtract => "subtract",
            BooleanOp::Xor => "xor",
        };
        f.write_str(name)
    }
}

fn coord(p: Point) -> Coord2 {
    Coord2(p.x, p.y)
}

fn point(c: &Coord2) -> Point {
    Point::new(c.0, c.1)
}

/// A closed contour as a flo_curves perimeter; lines become flat cubics
fn to_flo(path: &Path) -> Option<SimpleBezierPath> {
    let segments = path.segments();
    let first = segments.first()?;
    let start = coord(path.point(first.start).position());
    let curves = segments
        .iter()
        .map(|segment| {
            let curve = segment.to_cubic(path);
            (coord(curve.p1), coord(curve.p2), coord(curve.p3))
        })
        .collect();
    Some((start, curves))
}

/// Walk a flo_curves perimeter back into a closed path
fn from_flo(perimeter: &SimpleBezierPath) -> Option<Path> {
    let (start, curves) = perimeter;
    let mut points: Vec<EditPoint> = Vec::new();
    let mut current = point(start);
    for (c1, c2, end) in curves {
        let curve = CubicBez::new(current, point(c1), point(c2), point(end));
        if curve.p3.distance(current) < DUPLICATE_DISTANCE && is_line_like(&curve, LINE_TOLERANCE) {
            continue;
        }
        if is_line_like(&curve, LINE_TOLERANCE) {
            points.push(EditPoint::line_to(curve.p3.x, curve.p3.y));
        } else {
            points.push(EditPoint::off_curve(curve.p1.x, curve.p1.y));
            points.push(EditPoint::off_curve(curve.p2.x, curve.p2.y));
            points.push(EditPoint::curve_to(curve.p3.x, curve.p3.y));
        }
        current = curve.p3;
    }
    if point(start).distance(current) >= DUPLICATE_DISTANCE {
        points.push(EditPoint::line_to(start.0, start.1));
    }
    if points.iter().filter(|p| p.is_on_curve()).count() < 2 {
        return None;
    }
    // The closing point doubles the start and carries the closing segment
    points.rotate_right(1);
    let mut path = Path::from_points(points);
    mark_smooth_joins(&mut path);
    Some(path)
}

/// Flag on-curve points whose incoming and outgoing tangents agree
fn mark_smooth_joins(path: &mut Path) {
    let n = path.len();
    for index in path.on_curve_indices() {
        let (Some(prev), Some(next)) = (path.prev_index(index), path.next_index(index)) else {
            continue;
        };
        let here = path.points[index].position();
        let incoming = here - path.points[prev].position();
        let outgoing = path.points[next].position() - here;
        let curved = !path.points[prev].is_on_curve() || !path.points[next].is_on_curve();
        path.points[index].smooth = n > 2
            && curved
            && incoming.hypot() > DUPLICATE_DISTANCE
            && outgoing.hypot() > DUPLICATE_DISTANCE
            && angle_between(incoming, outgoing) < SMOOTH_TOLERANCE;
    }
}

/// Outer contours counter-clockwise, counters clockwise, by nesting depth
fn orient(paths: Vec<Path>) -> Vec<Path> {
    let outlines: Vec<_> = paths.iter().map(|p| p.to_bezpath()).collect();
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let probe = path.point(0).position();
            let depth = outlines
                .iter()
                .enumerate()
                .filter(|(j, outline)| *j != i && outline.winding(probe) != 0)
                .count();
            let want_clockwise = depth % 2 == 1;
            if path.is_clockwise() != want_clockwise {
                Path::from_points(reversed_points(path))
            } else {
                path.clone()
            }
        })
        .collect()
}

fn closed(paths: &[Path]) -> Vec<&Path> {
    paths.iter().filter(|p| p.is_closed()).collect()
}

fn open(paths: &[Path]) -> impl Iterator<Item = Path> + '_ {
    paths.iter().filter(|p| p.is_open()).cloned()
}

/// Same outline regardless of start point and selection
fn same_contour(a: &Path, b: &Path) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return a.len() == b.len();
    }
    let n = a.len();
    let key = |p: &EditPoint| (p.position(), p.point_type);
    (0..n).any(|shift| (0..n).all(|i| key(&a.points[i]) == key(&b.points[(i + shift) % n])))
}

fn same_set(a: &[&Path], b: &[&Path]) -> bool {
    a.len() == b.len() && a.iter().all(|pa| b.iter().any(|pb| same_contour(pa, pb)))
}

/// Filled area of a contour set under `rule`
fn filled_area(paths: &[&Path], rule: FillRule) -> Option<f64> {
    let mut builder = lyon::path::Path::builder();
    let mut any = false;
    for path in paths {
        let segments = path.segments();
        let Some(first) = segments.first() else {
            continue;
        };
        let start = path.point(first.start).position();
        builder.begin(lyon_point(start.x as f32, start.y as f32));
        for segment in &segments {
            let curve = segment.to_cubic(path);
            let to = lyon_point(curve.p3.x as f32, curve.p3.y as f32);
            if segment.is_curve() {
                builder.cubic_bezier_to(
                    lyon_point(curve.p1.x as f32, curve.p1.y as f32),
                    lyon_point(curve.p2.x as f32, curve.p2.y as f32),
                    to,
                );
            } else {
                builder.line_to(to);
            }
        }
        builder.end(true);
        any = true;
    }
    if !any {
        return Some(0.0);
    }
    let outline = builder.build();

    let mut buffers: VertexBuffers<lyon::math::Point, u32> = VertexBuffers::new();
    let options = FillOptions::tolerance(TESSELLATION_TOLERANCE).with_fill_rule(rule);
    let result = FillTessellator::new().tessellate_path(
        &outline,
        &options,
        &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| vertex.position()),
    );
    if let Err(err) = result {
        warn!("[BOOLEAN] tessellation failed: {:?}", err);
        return None;
    }

    let area = buffers
        .indices
        .chunks(3)
        .map(|tri| {
            let [a, b, c] = [0, 1, 2].map(|k| buffers.vertices[tri[k] as usize]);
            let ab = (b.x - a.x) as f64 * (c.y - a.y) as f64;
            let ac = (c.x - a.x) as f64 * (b.y - a.y) as f64;
            (ab - ac).abs() / 2.0
        })
        .sum();
    Some(area)
}

fn areas_differ(a: f64, b: f64) -> bool {
    (a - b).abs() > AREA_TOLERANCE.max(1e-5 * a.max(b))
}

/// True when the closed contours of `paths` overlap themselves or each
/// other: the even-odd and non-zero fills cover different areas. Reports
/// true when the outline cannot be tessellated.
pub fn has_overlaps(paths: &[Path]) -> bool {
    let contours = closed(paths);
    match (
        filled_area(&contours, FillRule::EvenOdd),
        filled_area(&contours, FillRule::NonZero),
    ) {
        (Some(even_odd), Some(non_zero)) => areas_differ(even_odd, non_zero),
        _ => true,
    }
}

/// True when the regions filled by `a` and `b` share any area
pub fn regions_overlap(a: &[Path], b: &[Path]) -> bool {
    let (ca, cb) = (closed(a), closed(b));
    if ca.is_empty() || cb.is_empty() {
        return false;
    }
    let both: Vec<&Path> = ca.iter().chain(cb.iter()).copied().collect();
    match (
        filled_area(&ca, FillRule::NonZero),
        filled_area(&cb, FillRule::NonZero),
        filled_area(&both, FillRule::NonZero),
    ) {
        (Some(area_a), Some(area_b), Some(area_both)) => areas_differ(area_a + area_b, area_both),
        _ => true,
    }
}

fn arithmetic(a: &[&Path], b: &[&Path], op: BooleanOp, accuracy: f64) -> Vec<Path> {
    let fa: Vec<SimpleBezierPath> = a.iter().filter_map(|p| to_flo(p)).collect();
    let fb: Vec<SimpleBezierPath> = b.iter().filter_map(|p| to_flo(p)).collect();
    let result: Vec<SimpleBezierPath> = match op {
        BooleanOp::Union => path_add::<SimpleBezierPath>(&fa, &fb, accuracy),
        BooleanOp::Intersect => path_intersect::<SimpleBezierPath>(&fa, &fb, accuracy),
        BooleanOp::Subtract => path_sub::<SimpleBezierPath>(&fa, &fb, accuracy),
        BooleanOp::Xor => {
            let mut pieces = path_sub::<SimpleBezierPath>(&fa, &fb, accuracy);
            pieces.extend(path_sub::<SimpleBezierPath>(&fb, &fa, accuracy));
            pieces
        }
    };
    orient(result.iter().filter_map(from_flo).collect())
}

fn dedup_contours<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Vec<&'a Path> {
    let mut unique: Vec<&Path> = Vec::new();
    for path in paths {
        if !unique.iter().any(|u| same_contour(u, path)) {
            unique.push(path);
        }
    }
    unique
}

/// Combine the closed contours of `a` and `b`. Open paths of both inputs
/// follow the result unchanged.
pub fn combine(a: &[Path], b: &[Path], op: BooleanOp, accuracy: f64) -> Vec<Path> {
    let (ca, cb) = (closed(a), closed(b));
    let carried = || open(a).chain(open(b));

    let contours: Vec<Path> = match op {
        BooleanOp::Union => {
            let unique_a = dedup_contours(ca.iter().copied());
            let extra_b: Vec<&Path> = dedup_contours(cb.iter().copied())
                .into_iter()
                .filter(|pb| !unique_a.iter().any(|pa| same_contour(pa, pb)))
                .collect();
            let all: Vec<&Path> = unique_a.iter().chain(extra_b.iter()).copied().collect();
            let owned: Vec<Path> = all.iter().map(|p| (*p).clone()).collect();
            if !has_overlaps(&owned) {
                owned
            } else {
                arithmetic(&unique_a, &extra_b, op, accuracy)
            }
        }
        BooleanOp::Intersect => {
            if same_set(&ca, &cb) {
                ca.iter().map(|p| (*p).clone()).collect()
            } else if !regions_overlap(a, b) {
                Vec::new()
            } else {
                arithmetic(&ca, &cb, op, accuracy)
            }
        }
        BooleanOp::Subtract => {
            if same_set(&ca, &cb) {
                Vec::new()
            } else if !regions_overlap(a, b) {
                ca.iter().map(|p| (*p).clone()).collect()
            } else {
                arithmetic(&ca, &cb, op, accuracy)
            }
        }
        BooleanOp::Xor => {
            if cb.is_empty() {
                ca.iter().map(|p| (*p).clone()).collect()
            } else if ca.is_empty() {
                cb.iter().map(|p| (*p).clone()).collect()
            } else if same_set(&ca, &cb) {
                Vec::new()
            } else {
                arithmetic(&ca, &cb, op, accuracy)
            }
        }
    };
    debug!(
        "[BOOLEAN] {} of {} and {} contours gives {}",
        op,
        ca.len(),
        cb.len(),
        contours.len()
    );
    contours.into_iter().chain(carried()).collect()
}

pub fn union(a: &[Path], b: &[Path], accuracy: f64) -> Vec<Path> {
    combine(a, b, BooleanOp::Union, accuracy)
}

pub fn intersect(a: &[Path], b: &[Path], accuracy: f64) -> Vec<Path> {
    combine(a, b, BooleanOp::Intersect, accuracy)
}

pub fn subtract(a: &[Path], b: &[Path], accuracy: f64) -> Vec<Path> {
    combine(a, b, BooleanOp::Subtract, accuracy)
}

pub fn xor(a: &[Path], b: &[Path], accuracy: f64) -> Vec<Path> {
    combine(a, b, BooleanOp::Xor, accuracy)
}

/// Group each outer contour with the counters it encloses, so every group
/// reads correctly under flo_curves' even-odd interpretation
fn fill_groups(paths: &[&Path]) -> Vec<Vec<Path>> {
    let outers: Vec<&Path> = paths.iter().filter(|p| !p.is_clockwise()).copied().collect();
    let mut groups: Vec<Vec<Path>> = outers.iter().map(|p| vec![(*p).clone()]).collect();
    for counter in paths.iter().filter(|p| p.is_clockwise()) {
        let probe = counter.point(0).position();
        let owner = outers
            .iter()
            .enumerate()
            .filter(|(_, outer)| outer.to_bezpath().winding(probe) != 0)
            .min_by(|(_, x), (_, y)| x.signed_area().total_cmp(&y.signed_area()))
            .map(|(i, _)| i);
        match owner {
            Some(i) => groups[i].push((*counter).clone()),
            None => groups.push(vec![(*counter).clone()]),
        }
    }
    groups
}

/// Replace a self-overlapping outer contour by the outline of everything it
/// fills. The group's counters are kept as they are.
fn resolve_self_overlap(group: Vec<Path>, accuracy: f64) -> Vec<Path> {
    let Some((outer, counters)) = group.split_first() else {
        return group;
    };
    if !has_overlaps(std::slice::from_ref(outer)) {
        return group;
    }
    let Some(perimeter) = to_flo(outer) else {
        return group;
    };
    let resolved = path_remove_interior_points::<_, SimpleBezierPath>(&vec![perimeter], accuracy);
    let outlines: Vec<Path> = resolved.iter().filter_map(from_flo).collect();
    if outlines.is_empty() {
        warn!("[BOOLEAN] could not resolve a self-overlapping contour");
        return group;
    }
    debug!("[BOOLEAN] self-overlapping contour becomes {} contours", outlines.len());
    orient(outlines).into_iter().chain(counters.iter().cloned()).collect()
}

/// Union of every closed contour in `paths`, counters preserved. Contours
/// that overlap themselves are resolved first.
pub fn merge_contours(paths: &[Path], accuracy: f64) -> Vec<Path> {
    let contours = closed(paths);
    if !has_overlaps(paths) {
        return paths.to_vec();
    }
    let mut merged: Vec<Path> = Vec::new();
    for group in fill_groups(&contours) {
        let group = resolve_self_overlap(group, accuracy);
        merged = if merged.is_empty() {
            group
        } else {
            combine(&merged, &group, BooleanOp::Union, accuracy)
        };
    }
    merged.into_iter().chain(open(paths)).collect()
}

/// Merge overlapping closed contours of the layer into one outline.
/// Returns false when nothing overlaps or merging changes nothing.
pub fn remove_overlaps(layer: &mut LayerMut<'_>, accuracy: f64) -> bool {
    let paths = layer.layer().paths.clone();
    if !has_overlaps(&paths) {
        return false;
    }
    let merged = merge_contours(&paths, accuracy);
    if merged == paths {
        warn!("[BOOLEAN] remove overlaps left {} paths unchanged", paths.len());
        return false;
    }
    debug!("[BOOLEAN] remove overlaps: {} paths become {}", paths.len(), merged.len());
    let mut layer = layer.undo_group();
    layer.set_paths(merged);
    true
}

/// Combine the unselected closed contours (first operand) with the
/// selected ones (second operand), replacing both. Returns false when
/// either side is empty.
pub fn combine_selection(layer: &mut LayerMut<'_>, op: BooleanOp, accuracy: f64) -> bool {
    let (selected, rest): (Vec<Path>, Vec<Path>) = layer
        .layer()
        .paths
        .iter()
        .filter(|p| p.is_closed())
        .cloned()
        .partition(|p| p.has_selection());
    if selected.is_empty() || rest.is_empty() {
        return false;
    }
    let mut result = combine(&rest, &selected, op, accuracy);
    result.extend(layer.layer().paths.iter().filter(|p| p.is_open()).cloned());
    let mut layer = layer.undo_group();
    layer.set_paths(result);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::glyph::Glyph;
    use crate::data::layer::Layer;
    use crate::data::path::test_paths::{open_line, square, square_at};
    use crate::data::point::PointType;
    use crate::editing::undo::UndoTarget;

    fn total_area(paths: &[Path]) -> f64 {
        paths.iter().filter(|p| p.is_closed()).map(|p| p.signed_area()).sum()
    }

    fn ring() -> Vec<Path> {
        vec![
            square(100.0),
            Path::from_points(reversed_points(&square_at(25.0, 25.0, 50.0))),
        ]
    }

    #[test]
    fn test_has_overlaps() {
        assert!(has_overlaps(&[square(100.0), square_at(50.0, 50.0, 100.0)]));
        assert!(!has_overlaps(&[square(100.0), square_at(200.0, 0.0, 100.0)]));
        assert!(!has_overlaps(&ring()));
        assert!(!has_overlaps(&[square(100.0), square_at(100.0, 0.0, 100.0)]));
    }

    #[test]
    fn test_regions_overlap() {
        assert!(regions_overlap(&[square(100.0)], &[square_at(50.0, 50.0, 100.0)]));
        assert!(!regions_overlap(&[square(100.0)], &[square_at(150.0, 0.0, 10.0)]));
        assert!(!regions_overlap(&[square(100.0)], &[]));
    }

    #[test]
    fn test_identities() {
        let a = vec![square(100.0)];
        let unioned = union(&a, &a, DEFAULT_BOOLEAN_ACCURACY);
        assert_eq!(unioned.len(), 1);
        assert!(same_contour(&unioned[0], &a[0]));
        assert!(subtract(&a, &a, DEFAULT_BOOLEAN_ACCURACY).is_empty());
        assert_eq!(xor(&a, &[], DEFAULT_BOOLEAN_ACCURACY), a);
        assert_eq!(xor(&[], &a, DEFAULT_BOOLEAN_ACCURACY), a);
    }

    #[test]
    fn test_disjoint_shortcuts() {
        let a = vec![square(100.0)];
        let b = vec![square_at(200.0, 0.0, 50.0)];
        assert_eq!(union(&a, &b, DEFAULT_BOOLEAN_ACCURACY), vec![a[0].clone(), b[0].clone()]);
        assert!(intersect(&a, &b, DEFAULT_BOOLEAN_ACCURACY).is_empty());
        assert_eq!(subtract(&a, &b, DEFAULT_BOOLEAN_ACCURACY), a);
    }

    #[test]
    fn test_overlapping_squares() {
        let a = vec![square(100.0)];
        let b = vec![square_at(50.0, 50.0, 100.0)];

        let unioned = union(&a, &b, DEFAULT_BOOLEAN_ACCURACY);
        assert_eq!(unioned.len(), 1);
        assert!((total_area(&unioned) - 17500.0).abs() < 1.0);
        assert!(!unioned[0].is_clockwise());

        let common = intersect(&a, &b, DEFAULT_BOOLEAN_ACCURACY);
        assert!((total_area(&common) - 2500.0).abs() < 1.0);

        let difference = subtract(&a, &b, DEFAULT_BOOLEAN_ACCURACY);
        assert!((total_area(&difference) - 7500.0).abs() < 1.0);

        let exclusive = xor(&a, &b, DEFAULT_BOOLEAN_ACCURACY);
        assert_eq!(exclusive.len(), 2);
        assert!((total_area(&exclusive) - 15000.0).abs() < 1.0);
    }

    #[test]
    fn test_result_points_are_lines_for_straight_input() {
        let unioned = union(&[square(100.0)], &[square_at(50.0, 50.0, 100.0)], DEFAULT_BOOLEAN_ACCURACY);
        for path in &unioned {
            assert!(path.points().iter().all(|p| p.point_type() == PointType::Line));
            assert!(path.points().iter().all(|p| !p.is_smooth()));
        }
    }

    #[test]
    fn test_open_paths_are_retained() {
        let line = open_line(0.0, 0.0, 10.0, 10.0);
        let result = union(&[square(100.0), line.clone()], &[square_at(50.0, 50.0, 100.0)], DEFAULT_BOOLEAN_ACCURACY);
        assert_eq!(result.last(), Some(&line));
    }

    #[test]
    fn test_remove_overlaps_keeps_counters() {
        let mut paths = ring();
        paths.push(square_at(150.0, 0.0, 100.0));
        let merged = merge_contours(&paths, DEFAULT_BOOLEAN_ACCURACY);
        assert!(!has_overlaps(&merged));
        assert_eq!(merged, paths);

        paths.push(square_at(20.0, -50.0, 230.0));
        let merged = merge_contours(&paths, DEFAULT_BOOLEAN_ACCURACY);
        assert!(!has_overlaps(&merged));
        let hole_count = merged.iter().filter(|p| p.is_clockwise()).count();
        assert_eq!(hole_count, 0);
    }

    #[test]
    fn test_remove_overlaps_on_layer() {
        let line = open_line(0.0, 0.0, 10.0, 10.0);
        let layer = Layer::new("default")
            .with_path(square(100.0))
            .with_path(square_at(50.0, 50.0, 100.0))
            .with_path(line.clone());
        let mut glyph = Glyph::new("a").with_layer(layer);
        assert!(remove_overlaps(&mut glyph.layer_mut(0), DEFAULT_BOOLEAN_ACCURACY));
        let paths = &glyph.layer(0).paths;
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1], line);
        assert!((paths[0].signed_area() - 17500.0).abs() < 1.0);

        assert!(!remove_overlaps(&mut glyph.layer_mut(0), DEFAULT_BOOLEAN_ACCURACY));
        glyph.undo().unwrap();
        assert_eq!(glyph.layer(0).paths.len(), 3);
    }

    fn pentagram(radius: f64) -> Path {
        let points = (0..5)
            .map(|k| {
                let angle = std::f64::consts::FRAC_PI_2 + k as f64 * 4.0 * std::f64::consts::PI / 5.0;
                EditPoint::line_to(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Path::from_points(points)
    }

    #[test]
    fn test_remove_overlaps_resolves_self_overlapping_contour() {
        let star = pentagram(100.0);
        assert!(has_overlaps(std::slice::from_ref(&star)));
        let filled = filled_area(&[&star], FillRule::NonZero).unwrap();

        let mut glyph = Glyph::new("star").with_layer(Layer::new("default").with_path(star.clone()));
        assert!(remove_overlaps(&mut glyph.layer_mut(0), DEFAULT_BOOLEAN_ACCURACY));
        let paths = &glyph.layer(0).paths;
        assert_ne!(paths, &vec![star]);
        assert!(!has_overlaps(paths));
        assert!(paths.iter().all(|p| !p.is_clockwise()));
        assert!((total_area(paths) - filled).abs() < 0.01 * filled, "area {}", total_area(paths));
        assert!(!remove_overlaps(&mut glyph.layer_mut(0), DEFAULT_BOOLEAN_ACCURACY));
    }

    #[test]
    fn test_combine_selection_subtracts_selected() {
        let mut cutter = square_at(50.0, 50.0, 100.0);
        for point in cutter.points.iter_mut() {
            point.selected = true;
        }
        let layer = Layer::new("default").with_path(square(100.0)).with_path(cutter);
        let mut glyph = Glyph::new("a").with_layer(layer);
        assert!(combine_selection(&mut glyph.layer_mut(0), BooleanOp::Subtract, DEFAULT_BOOLEAN_ACCURACY));
        assert!((total_area(&glyph.layer(0).paths) - 7500.0).abs() < 1.0);
    }
}
