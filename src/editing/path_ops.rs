//! Structural path edits
//!
//! Point insertion, deletion, breaking, joining and reversing. Each
//! operation is one undo step on the glyph and leaves every path it touches
//! well formed: open exactly when the first point is a `Move`, with no `Move`
//! anywhere else.

use crate::core::errors::BezyResult;
use crate::data::font::Font;
use crate::data::handles::LayerMut;
use crate::data::path::{Path, SegmentKind};
use crate::data::point::{EditPoint, PointType};
use crate::data::selection::PointId;
use crate::editing::undo::UndoScope;
use crate::geometry::bezier::{line_handles, quad_to_cubic, split_cubic};
use crate::geometry::curve_fit::{fit_cubic, MAX_FIT_ITERATIONS};
use crate::geometry::utilities::round_point_to_grid;
use crate::geometry::vector::EPSILON;
use kurbo::{Affine, CubicBez, ParamCurve, Point};
use tracing::debug;

/// Fit tolerance used when a deleted point's two curves are merged into one
pub const DEFAULT_FIT_TOLERANCE: f64 = 0.01;

/// Samples taken along each curve when refitting after a delete
const REFIT_SAMPLES: usize = 10;

/// Points of `path` in reverse outline order.
///
/// An on-curve type names the segment arriving at the point, so each type
/// travels with its segment: after reversal a point takes the type of the
/// on-curve point that used to follow it. Closed paths keep their first
/// point; open paths start at their old last point.
pub fn reversed_points(path: &Path) -> Vec<EditPoint> {
    let points = &path.points;
    let n = points.len();
    if n < 2 {
        return points.clone();
    }
    let on_curve = path.on_curve_indices();
    let m = on_curve.len();
    let mut types: Vec<PointType> = points.iter().map(|p| p.point_type).collect();
    let closed = path.is_closed();
    for k in 0..m {
        let next = if k + 1 < m {
            Some(on_curve[k + 1])
        } else if closed {
            Some(on_curve[0])
        } else {
            None
        };
        types[on_curve[k]] = match next {
            Some(next) => points[next].point_type,
            None => PointType::Move,
        };
    }

    let order: Vec<usize> = if closed {
        std::iter::once(0).chain((1..n).rev()).collect()
    } else {
        (0..n).rev().collect()
    };
    order
        .into_iter()
        .map(|i| {
            let mut point = points[i].clone();
            point.point_type = types[i];
            if point.point_type == PointType::Move {
                point.smooth = false;
            }
            point
        })
        .collect()
}

/// Reverse the direction of path `path_index`
pub fn reverse_path(layer: &mut LayerMut<'_>, path_index: usize) {
    let path = layer.layer().path(path_index);
    let points = reversed_points(path);
    layer.path_mut(path_index).set_points(points);
    debug!("Reversed path {}", path_index);
}

/// Make on-curve point `id` the first point of its closed path.
/// Returns false for open paths and off-curve points.
pub fn set_start_point(layer: &mut LayerMut<'_>, id: PointId) -> bool {
    let path = layer.layer().path(id.path);
    if !path.is_closed() || !path.point(id.point).is_on_curve() {
        return false;
    }
    if id.point == 0 {
        return true;
    }
    let points = rotated(&path.points, id.point);
    layer.path_mut(id.path).set_points(points);
    true
}

fn rotated(points: &[EditPoint], start: usize) -> Vec<EditPoint> {
    points[start..].iter().chain(&points[..start]).cloned().collect()
}

/// Turn the line segment starting at `segment_start` into a curve with
/// handles at 1/3 and 2/3 of the line. Returns false if that segment is not
/// a plain line.
pub fn convert_line_to_curve(layer: &mut LayerMut<'_>, path_index: usize, segment_start: usize) -> bool {
    let path = layer.layer().path(path_index);
    let Some(segment) = path.segment_starting_at(segment_start) else {
        return false;
    };
    if segment.kind != SegmentKind::Line || path.next_index(segment.start) != Some(segment.end) {
        return false;
    }
    let (p0, p1) = (
        path.points[segment.start].position(),
        path.points[segment.end].position(),
    );
    let (c1, c2) = line_handles(p0, p1);
    let end = if segment.end > segment.start {
        segment.end + 2
    } else {
        segment.end
    };

    let mut layer = layer.undo_group();
    let mut path = layer.path_mut(path_index);
    path.insert_points(
        segment.start + 1,
        vec![EditPoint::off_curve(c1.x, c1.y), EditPoint::off_curve(c2.x, c2.y)],
    );
    path.point_mut(end).set_type(PointType::Curve);
    debug!("Converted line {}.{} to curve", path_index, segment_start);
    true
}

/// Split the segment starting at `segment_start` at parameter `t` by exact
/// subdivision. Returns the id of the new on-curve point.
pub fn insert_point_on_segment(
    layer: &mut LayerMut<'_>,
    path_index: usize,
    segment_start: usize,
    t: f64,
) -> Option<PointId> {
    let path = layer.layer().path(path_index);
    let segment = path.segment_starting_at(segment_start)?;
    if !(t > 0.0 && t < 1.0) {
        return None;
    }

    match segment.handles() {
        None => {
            if path.next_index(segment.start) != Some(segment.end) {
                return None;
            }
            let position = path.points[segment.start]
                .position()
                .lerp(path.points[segment.end].position(), t);
            let index = segment.start + 1;
            layer
                .path_mut(path_index)
                .insert_point(index, EditPoint::line_to(position.x, position.y));
            Some(PointId::new(path_index, index))
        }
        Some((h1, h2)) => {
            let (left, right) = split_cubic(&segment.to_cubic(path), t);
            let mut layer = layer.undo_group();
            let mut path = layer.path_mut(path_index);
            path.point_mut(h1).set_position(left.p1);
            path.point_mut(h2).set_position(right.p2);
            path.insert_points(
                h1 + 1,
                vec![
                    EditPoint::off_curve(left.p2.x, left.p2.y),
                    EditPoint::curve_to(left.p3.x, left.p3.y).with_smooth(true),
                    EditPoint::off_curve(right.p1.x, right.p1.y),
                ],
            );
            Some(PointId::new(path_index, h1 + 2))
        }
    }
}

/// Cut an open point list at the given interior on-curve indices. Each cut
/// point ends one piece and starts the next as a `Move`.
pub(crate) fn split_open_at(points: &[EditPoint], cuts: &[usize]) -> Vec<Path> {
    let last = points.len().saturating_sub(1);
    let mut pieces = Vec::new();
    let mut current: Vec<EditPoint> = Vec::new();
    for (i, point) in points.iter().enumerate() {
        current.push(point.clone());
        if i > 0 && i < last && cuts.contains(&i) {
            pieces.push(Path::from_points(std::mem::take(&mut current)));
            let mut start = point.clone().with_type(PointType::Move);
            start.smooth = false;
            current.push(start);
        }
    }
    pieces.push(Path::from_points(current));
    pieces.retain(|p| p.len() >= 2);
    pieces
}

fn split_open_at_selected(points: &[EditPoint]) -> Vec<Path> {
    let cuts: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.selected && p.is_on_curve())
        .map(|(i, _)| i)
        .collect();
    split_open_at(points, &cuts)
}

/// Open a closed point list at `start`: the point becomes a `Move` at the
/// front and a copy of it closes the list at the end.
fn open_at(points: &[EditPoint], start: usize) -> Vec<EditPoint> {
    let mut open = rotated(points, start);
    let end = open[0].clone();
    open[0].point_type = PointType::Move;
    open[0].smooth = false;
    open.push(end);
    open
}

/// Break a path at on-curve point `id`.
///
/// A closed path is opened there; an open path is split in two, the second
/// starting with a copy of the point. Returns false for off-curve points
/// and the ends of open paths.
pub fn break_path(layer: &mut LayerMut<'_>, id: PointId) -> bool {
    let path = layer.layer().path(id.path);
    let Some(point) = path.get(id.point) else {
        return false;
    };
    if !point.is_on_curve() {
        return false;
    }

    if path.is_closed() {
        let points = open_at(&path.points, id.point);
        layer.path_mut(id.path).set_points(points);
        debug!("Opened path {} at point {}", id.path, id.point);
        return true;
    }

    if id.point == 0 || id.point + 1 >= path.len() {
        return false;
    }
    let head: Vec<EditPoint> = path.points[..=id.point].to_vec();
    let mut start = path.points[id.point].clone().with_type(PointType::Move);
    start.smooth = false;
    let tail: Vec<EditPoint> = std::iter::once(start)
        .chain(path.points[id.point + 1..].iter().cloned())
        .collect();

    let mut layer = layer.undo_group();
    layer.splice_path_range(
        id.path,
        1,
        vec![Path::from_points(head), Path::from_points(tail)],
    );
    debug!("Split path {} at point {}", id.path, id.point);
    true
}

fn is_open_end(path: &Path, index: usize) -> bool {
    path.is_open() && (index == 0 || index + 1 == path.len())
}

/// Join two open-path end points.
///
/// Both points must be ends of open paths. Two ends of the same path close
/// it; ends of different paths are joined tail to head, reversing either
/// path as needed, and the second path is removed from the layer. Ends that
/// sit on the same position are merged into one point, keeping the
/// position of the first; otherwise a line bridges them.
pub fn try_join_points(layer: &mut LayerMut<'_>, a: PointId, b: PointId) -> bool {
    if a == b {
        return false;
    }
    let paths = layer.layer().paths();
    let (Some(path_a), Some(path_b)) = (paths.get(a.path), paths.get(b.path)) else {
        return false;
    };
    if !is_open_end(path_a, a.point) || !is_open_end(path_b, b.point) {
        return false;
    }

    if a.path == b.path {
        let mut points = path_a.points.clone();
        let last = points.len() - 1;
        let coincident = points[0].position().distance(points[last].position()) < EPSILON;
        if coincident && points.len() > 2 {
            if let Some(tail) = points.pop() {
                points[0].point_type = tail.point_type;
            }
        } else {
            points[0].point_type = PointType::Line;
        }
        layer.path_mut(a.path).set_points(points);
        debug!("Closed path {}", a.path);
        return true;
    }

    let mut first = if a.point == 0 && path_a.len() > 1 {
        reversed_points(path_a)
    } else {
        path_a.points.clone()
    };
    let mut second = if b.point != 0 {
        reversed_points(path_b)
    } else {
        path_b.points.clone()
    };
    let tail = first[first.len() - 1].position();
    if tail.distance(second[0].position()) < EPSILON {
        second.remove(0);
    } else {
        second[0].point_type = PointType::Line;
    }
    first.extend(second);

    let mut layer = layer.undo_group();
    layer.replace_path(a.path, Path::from_points(first));
    layer.remove_path(b.path);
    debug!("Joined path {} into path {}", b.path, a.path);
    true
}

/// Delete everything selected in the layer, refitting with the default
/// tolerance. See [`delete_selection_with_tolerance`].
pub fn delete_selection(layer: &mut LayerMut<'_>, break_paths: bool) -> bool {
    delete_selection_with_tolerance(layer, break_paths, DEFAULT_FIT_TOLERANCE)
}

/// Delete the selected anchors, components and guidelines, and edit the
/// paths holding selected points.
///
/// By default selected on-curve points are removed and their neighbors
/// bridged with a curve built from the surviving handles. A lone selected
/// point between two curves is instead removed by fitting one cubic to the
/// two curves. With `break_paths` the paths are cut at the selected
/// points and nothing is removed. Returns false when nothing was selected.
pub fn delete_selection_with_tolerance(
    layer: &mut LayerMut<'_>,
    break_paths: bool,
    fit_tolerance: f64,
) -> bool {
    if !layer.layer().has_selection() {
        return false;
    }
    let snapshot = layer.layer().clone();
    let mut layer = layer.undo_group();

    for index in (0..snapshot.anchors.len()).rev() {
        if snapshot.anchors[index].selected {
            layer.remove_anchor(index);
        }
    }
    for index in (0..snapshot.components.len()).rev() {
        if snapshot.components[index].selected {
            layer.remove_component(index);
        }
    }
    for index in (0..snapshot.guidelines.len()).rev() {
        if snapshot.guidelines[index].selected {
            layer.remove_guideline(index);
        }
    }

    let mut paths = Vec::with_capacity(snapshot.paths.len());
    let mut touched = 0;
    for path in &snapshot.paths {
        if !path.has_selection() {
            paths.push(path.clone());
            continue;
        }
        touched += 1;
        if break_paths {
            let selected = path
                .points
                .iter()
                .position(|p| p.selected && p.is_on_curve());
            match (path.is_closed(), selected) {
                (true, Some(start)) => {
                    paths.extend(split_open_at_selected(&open_at(&path.points, start)))
                }
                (true, None) => paths.push(path.clone()),
                (false, _) => paths.extend(split_open_at_selected(&path.points)),
            }
        } else if let Some(remaining) = delete_points(path, fit_tolerance) {
            paths.push(remaining);
        }
    }
    if touched > 0 {
        layer.set_paths(paths);
    }
    debug!(
        "Deleted selection ({} paths touched, break_paths: {})",
        touched, break_paths
    );
    true
}

/// Indices strictly between `a` and `b` going forward, wrapping on closed paths
pub(crate) fn indices_between(path: &Path, a: usize, b: usize) -> Vec<usize> {
    if b > a {
        (a + 1..b).collect()
    } else {
        (a + 1..path.len()).chain(0..b).collect()
    }
}

/// A lone selected on-curve point between two curves, with the single
/// cubic that replaces both: `(start, end, curve)`
fn lone_point_refit(path: &Path, tolerance: f64) -> Option<(usize, usize, CubicBez)> {
    let mut selected = path.points.iter().enumerate().filter(|(_, p)| p.selected);
    let (index, point) = selected.next()?;
    if selected.next().is_some() || !point.is_on_curve() {
        return None;
    }
    let incoming = path.segment_ending_at(index)?;
    let outgoing = path.segment_starting_at(index)?;
    if !incoming.is_curve() || !outgoing.is_curve() || incoming.start == outgoing.end {
        return None;
    }
    let first = incoming.to_cubic(path);
    let second = outgoing.to_cubic(path);

    let mut samples: Vec<Point> = (0..=REFIT_SAMPLES)
        .map(|i| first.eval(i as f64 / REFIT_SAMPLES as f64))
        .collect();
    samples.extend((1..=REFIT_SAMPLES).map(|i| second.eval(i as f64 / REFIT_SAMPLES as f64)));

    let fit = fit_cubic(
        &samples,
        Some(first.p1 - first.p0),
        Some(second.p2 - second.p3),
        tolerance,
        MAX_FIT_ITERATIONS,
    )?;
    debug!(
        "Refit curves around point {} (max error {:.3})",
        index,
        fit.max_error()
    );
    Some((incoming.start, outgoing.end, fit.curve))
}

/// The path left after removing its selected points, or `None` when fewer
/// than two on-curve points survive.
fn delete_points(path: &Path, tolerance: f64) -> Option<Path> {
    let points = &path.points;
    let kept: Vec<usize> = path
        .on_curve_indices()
        .into_iter()
        .filter(|&i| !points[i].selected)
        .collect();
    if kept.len() < 2 {
        return None;
    }
    let refit = lone_point_refit(path, tolerance);
    // Deleting the first point of a closed path opens it there
    let cut = path.is_closed()
        && points[0].is_on_curve()
        && points[0].selected
        && refit.is_none();
    let closed = path.is_closed() && !cut;

    let mut out = vec![points[kept[0]].clone()];
    if !closed {
        out[0].point_type = PointType::Move;
        out[0].smooth = false;
    }
    for pair in kept.windows(2) {
        let (handles, end) = bridge(path, pair[0], pair[1], refit);
        out.extend(handles);
        out.push(end);
    }
    if closed {
        let (handles, end) = bridge(path, kept[kept.len() - 1], kept[0], refit);
        out.extend(handles);
        out[0] = end;
    }
    Some(Path::from_points(out))
}

/// What replaces everything between kept on-curve points `a` and `b`:
/// the handles to keep and the updated end point.
fn bridge(
    path: &Path,
    a: usize,
    b: usize,
    refit: Option<(usize, usize, CubicBez)>,
) -> (Vec<EditPoint>, EditPoint) {
    let points = &path.points;
    let inner = indices_between(path, a, b);
    let mut end = points[b].clone();
    let removed_on_curve = inner.iter().any(|&i| points[i].is_on_curve());

    if !removed_on_curve {
        if inner.iter().any(|&i| points[i].selected) {
            // A deleted handle retracts its curve to a line
            end.point_type = PointType::Line;
            return (Vec::new(), end);
        }
        return (inner.iter().map(|&i| points[i].clone()).collect(), end);
    }

    if let Some((start, stop, curve)) = refit {
        if start == a && stop == b {
            end.point_type = PointType::Curve;
            return (
                vec![
                    EditPoint::off_curve(curve.p1.x, curve.p1.y),
                    EditPoint::off_curve(curve.p2.x, curve.p2.y),
                ],
                end,
            );
        }
    }

    let is_free_handle = |i: &usize| !points[*i].is_on_curve() && !points[*i].selected;
    let outgoing = path.next_index(a).filter(is_free_handle);
    let incoming = path.prev_index(b).filter(is_free_handle);
    let (p0, p3) = (points[a].position(), end.position());
    let handles = match (outgoing, incoming) {
        (Some(h1), Some(h2)) => vec![points[h1].clone(), points[h2].clone()],
        (Some(h), None) | (None, Some(h)) => {
            let (c1, c2) = quad_to_cubic(p0, points[h].position(), p3);
            vec![EditPoint::off_curve(c1.x, c1.y), EditPoint::off_curve(c2.x, c2.y)]
        }
        (None, None) => Vec::new(),
    };
    end.point_type = if handles.is_empty() {
        PointType::Line
    } else {
        PointType::Curve
    };
    (handles, end)
}

/// Round every selected point, anchor, guideline and component origin to
/// the grid. Returns how many items moved.
pub fn round_selection(layer: &mut LayerMut<'_>, grid: f64) -> usize {
    let snapshot = layer.layer().clone();
    let mut layer = layer.undo_group();
    let mut rounded = 0;

    for (path_index, path) in snapshot.paths.iter().enumerate() {
        for (point_index, point) in path.points.iter().enumerate() {
            let target = round_point_to_grid(point.position(), grid);
            if point.selected && target != point.position() {
                layer
                    .point_mut(PointId::new(path_index, point_index))
                    .set_position(target);
                rounded += 1;
            }
        }
    }
    for (index, anchor) in snapshot.anchors.iter().enumerate() {
        let target = round_point_to_grid(anchor.position(), grid);
        if anchor.selected && target != anchor.position() {
            layer.anchor_mut(index).set_position(target);
            rounded += 1;
        }
    }
    for (index, guideline) in snapshot.guidelines.iter().enumerate() {
        let target = round_point_to_grid(guideline.position(), grid);
        if guideline.selected && target != guideline.position() {
            layer.guideline_mut(index).set_position(target);
            rounded += 1;
        }
    }
    for (index, component) in snapshot.components.iter().enumerate() {
        let origin = component.origin();
        let target = round_point_to_grid(origin, grid);
        if component.selected && target != origin {
            let transform = Affine::translate(target - origin) * component.transform();
            layer.component_mut(index).set_transform(transform);
            rounded += 1;
        }
    }
    if rounded > 0 {
        debug!("Rounded {} items to grid {}", rounded, grid);
    }
    rounded
}

/// Replace every component of a layer with copies of its resolved outline.
///
/// Mirrored components are reversed so the copies keep their winding.
/// Returns the number of components decomposed; fails on component cycles.
pub fn decompose_components(font: &mut Font, glyph_index: usize, layer_index: usize) -> BezyResult<usize> {
    let glyph = &font.glyphs()[glyph_index];
    let layer = glyph.layer(layer_index);
    let master = layer.master_name().map(str::to_string);
    let mut chain = vec![glyph.name().to_string()];
    let mut paths = Vec::new();
    for component in layer.components() {
        let flips = component.transform().determinant() < 0.0;
        for path in font.component_paths(component, master.as_deref(), &mut chain)? {
            if flips {
                paths.push(Path::from_points(reversed_points(&path)));
            } else {
                paths.push(path);
            }
        }
    }
    let count = layer.components().len();
    if count == 0 {
        return Ok(0);
    }

    let glyph = font.glyph_mut(glyph_index);
    let mut layer = glyph.layer_mut(layer_index);
    let mut layer = layer.undo_group();
    for path in paths {
        layer.add_path(path);
    }
    layer.set_components(Vec::new())?;
    debug!("Decomposed {} components", count);
    Ok(count)
}
