//! Smooth point handling
//!
//! This module keeps tangents continuous through on-curve points marked
//! smooth.
//!
//! ## How the smooth constraint works
//!
//! A smooth on-curve point `P` has two neighbors, one on each side. At
//! least one of them is an off-curve handle:
//!
//! ```text
//! [handle] ---- [SMOOTH P] ---- [handle]      both sides curved
//! [on-curve Q] - [SMOOTH P] ---- [handle]     line on one side
//! ```
//!
//! When one side changes, the other side is pulled back into line:
//! - two handles: the unmoved handle is *rotated* around `P` onto the ray
//!   from the moved handle through `P`, keeping its distance from `P`
//! - a handle across from a line: a moved handle is *projected* onto the
//!   line through `Q` and `P`; when `P` or `Q` moved instead, the handle is
//!   rotated onto the ray from `Q` through `P`
//!
//! The handles do not need to be the same distance from `P`; only the
//! direction is constrained.

use crate::data::handles::LayerMut;
use crate::data::path::Path;
use crate::data::point::PointType;
use crate::data::selection::PointId;
use crate::editing::undo::UndoScope;
use crate::geometry::hobby::hobby_controls;
use crate::geometry::vector::{project_onto_line, rotate_to_ray, unit};
use kurbo::{Point, Vec2};
use tracing::debug;

/// The direct off-curve neighbors of point `index`: `(incoming, outgoing)`
pub fn neighbor_handles(path: &Path, index: usize) -> (Option<usize>, Option<usize>) {
    let is_handle = |i: &usize| !path.points[*i].is_on_curve();
    (
        path.prev_index(index).filter(is_handle),
        path.next_index(index).filter(is_handle),
    )
}

/// Positions that keep the smooth point `index` smooth, given the current
/// (possibly already moved) `positions` of the whole path and which points
/// `moved` this edit.
///
/// Returns the points to reposition; empty when nothing needs to change or
/// the point has no off-curve neighbor.
pub fn constrain_smooth_point(
    path: &Path,
    index: usize,
    positions: &[Point],
    moved: &[bool],
) -> Vec<(usize, Point)> {
    let point = &path.points[index];
    if !point.is_on_curve() || !point.smooth {
        return Vec::new();
    }
    let (Some(prev), Some(next)) = (path.prev_index(index), path.next_index(index)) else {
        return Vec::new();
    };
    let pivot = positions[index];
    let prev_is_handle = !path.points[prev].is_on_curve();
    let next_is_handle = !path.points[next].is_on_curve();

    match (prev_is_handle, next_is_handle) {
        (true, true) => {
            if moved[index] {
                return Vec::new();
            }
            match (moved[prev], moved[next]) {
                (true, false) => vec![(next, rotate_to_ray(positions[next], pivot, positions[prev]))],
                (false, true) => vec![(prev, rotate_to_ray(positions[prev], pivot, positions[next]))],
                _ => Vec::new(),
            }
        }
        (true, false) => align_handle_with_line(prev, next, index, positions, moved),
        (false, true) => align_handle_with_line(next, prev, index, positions, moved),
        (false, false) => Vec::new(),
    }
}

/// One smooth side is a handle, the other a line to on-curve `anchor`
fn align_handle_with_line(
    handle: usize,
    anchor: usize,
    pivot: usize,
    positions: &[Point],
    moved: &[bool],
) -> Vec<(usize, Point)> {
    let (h, q, p) = (positions[handle], positions[anchor], positions[pivot]);
    if moved[handle] && !moved[pivot] {
        vec![(handle, project_onto_line(h, q, p))]
    } else if moved[pivot] || moved[anchor] {
        vec![(handle, rotate_to_ray(h, p, q))]
    } else {
        Vec::new()
    }
}

/// Run the smooth constraint over every smooth on-curve point of `path`,
/// updating `positions` in place. Returns how many points were adjusted.
pub fn constrain_path(path: &Path, positions: &mut [Point], moved: &[bool]) -> usize {
    let mut adjusted = 0;
    for index in path.on_curve_indices() {
        for (target, position) in constrain_smooth_point(path, index, positions, moved) {
            if positions[target] != position {
                debug!(
                    "Smooth constraint at point {}: moving {} to ({:.1}, {:.1})",
                    index, target, position.x, position.y
                );
                positions[target] = position;
                adjusted += 1;
            }
        }
    }
    adjusted
}

/// Toggle the smooth flag of an on-curve point.
///
/// Refuses off-curve points, the end points of open paths and points with
/// no off-curve neighbor. Turning smooth on aligns the handle on the
/// unselected side (the outgoing one when both or neither are selected) so
/// the outline does not kink.
pub fn try_toggle_smooth(layer: &mut LayerMut<'_>, id: PointId) -> bool {
    let path = layer.layer().path(id.path);
    let Some(point) = path.get(id.point) else {
        return false;
    };
    if !point.is_on_curve() {
        return false;
    }
    let (Some(prev), Some(next)) = (path.prev_index(id.point), path.next_index(id.point)) else {
        return false;
    };
    let (incoming, outgoing) = neighbor_handles(path, id.point);
    if incoming.is_none() && outgoing.is_none() {
        return false;
    }

    let turning_on = !point.smooth;
    let pivot = point.position();
    let alignment = if !turning_on {
        None
    } else {
        match (incoming, outgoing) {
            (Some(h_in), Some(h_out)) => {
                let (fixed, free) = if path.points[h_out].selected && !path.points[h_in].selected {
                    (h_out, h_in)
                } else {
                    (h_in, h_out)
                };
                let position = rotate_to_ray(
                    path.points[free].position(),
                    pivot,
                    path.points[fixed].position(),
                );
                Some((free, position))
            }
            (Some(handle), None) => {
                let q = path.points[next].position();
                Some((handle, rotate_to_ray(path.points[handle].position(), pivot, q)))
            }
            (None, Some(handle)) => {
                let q = path.points[prev].position();
                Some((handle, rotate_to_ray(path.points[handle].position(), pivot, q)))
            }
            (None, None) => None,
        }
    };

    let mut layer = layer.undo_group();
    layer.point_mut(id).set_smooth(turning_on);
    if let Some((handle, position)) = alignment {
        layer
            .point_mut(PointId::new(id.path, handle))
            .set_position(position);
    }
    debug!(
        "Point {}.{} smooth: {}",
        id.path, id.point, turning_on
    );
    true
}

/// Refit the handles of every run of curve segments joined by selected
/// smooth points in path `path_index` with a Hobby spline.
///
/// A run's ends keep the tangent of the neighboring segment when the end
/// point is smooth; otherwise they are free. Returns the number of
/// segments refit.
pub fn smooth_selected_run(layer: &mut LayerMut<'_>, path_index: usize) -> usize {
    let path = layer.layer().path(path_index).clone();
    let segments = path.segments();
    if segments.len() < 2 {
        return 0;
    }

    // Group consecutive curve segments whose shared point is a selected
    // smooth point
    let joins = |a: usize, b: usize| {
        let (sa, sb) = (&segments[a], &segments[b]);
        let joint = &path.points[sa.end];
        sa.is_curve() && sb.is_curve() && sa.end == sb.start && joint.smooth && joint.selected
    };
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for i in 0..segments.len() {
        if !segments[i].is_curve() {
            if current.len() >= 2 {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
            continue;
        }
        if let Some(&last) = current.last() {
            if !joins(last, i) {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
        current.push(i);
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    if runs.is_empty() {
        return 0;
    }

    let mut layer = layer.undo_group();
    let mut refit = 0;
    for run in runs {
        let first = segments[run[0]];
        let last = segments[run[run.len() - 1]];
        let mut knots = vec![path.points[first.start].position()];
        knots.extend(run.iter().map(|&i| path.points[segments[i].end].position()));

        let start_direction = end_tangent_into(&path, first.start, true);
        let end_direction = end_tangent_into(&path, last.end, false);
        let controls = hobby_controls(&knots, start_direction, end_direction);

        for (&segment_index, (c1, c2)) in run.iter().zip(controls) {
            if let Some((h1, h2)) = segments[segment_index].handles() {
                layer.point_mut(PointId::new(path_index, h1)).set_position(c1);
                layer.point_mut(PointId::new(path_index, h2)).set_position(c2);
                refit += 1;
            }
        }
    }
    debug!("Hobby refit {} segments in path {}", refit, path_index);
    refit
}

/// Tangent a run must keep at its end point `index`, taken from the handle
/// on the far side when the point is smooth. `at_start` selects whether the
/// run leaves (`true`) or arrives at (`false`) the point.
fn end_tangent_into(path: &Path, index: usize, at_start: bool) -> Option<Vec2> {
    let point = &path.points[index];
    if !point.smooth || point.point_type == PointType::Move {
        return None;
    }
    let pivot = point.position();
    let (incoming, outgoing) = neighbor_handles(path, index);
    if at_start {
        // The run's first handle is `outgoing`; the other side is incoming
        let other = incoming.or_else(|| path.prev_index(index))?;
        unit(pivot - path.points[other].position())
    } else {
        let other = outgoing.or_else(|| path.next_index(index))?;
        unit(path.points[other].position() - pivot)
    }
}
