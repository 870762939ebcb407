//! Shared logic for moving selected points (dragging, nudging, etc.)
//!
//! Moves selected points together with the handles that follow them, then
//! re-applies the smooth-point constraint so tangents stay continuous.
//! Every coordinate a move writes is rounded to the grid; positions produced
//! by the constraint pass are written as computed.

use crate::data::handles::LayerMut;
use crate::data::path::Path;
use crate::data::point::PointType;
use crate::data::selection::PointId;
use crate::editing::smooth_curves::constrain_path;
use crate::editing::undo::UndoScope;
use crate::geometry::utilities::round_point_to_grid;
use crate::geometry::vector::{project_onto_line, unit, EPSILON};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How off-curve handles react when on-curve points move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveMode {
    /// Handles follow their on-curve point
    #[default]
    Normal,
    /// Handles stay put unless a smooth constraint pulls them
    StaticHandles,
    /// Handles keep their relative position between the segment's ends
    InterpolateCurve,
}

/// Result of a point movement operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementResult {
    pub points_moved: usize,
    pub connected_offcurves_moved: usize,
    pub smooth_adjustments: usize,
}

/// The on-curve point an off-curve handle belongs to: the previous point
/// when that is on-curve, otherwise the next one.
pub fn attached_on_curve(path: &Path, handle: usize) -> Option<usize> {
    let on_curve = |i: &usize| path.points[*i].is_on_curve();
    path.prev_index(handle)
        .filter(on_curve)
        .or_else(|| path.next_index(handle).filter(on_curve))
}

/// Move every selected point, anchor, component and guideline of the layer
/// by `(dx, dy)` as one undo step.
///
/// `grid` is the rounding unit for the new coordinates; zero disables
/// rounding.
pub fn move_selection(
    layer: &mut LayerMut<'_>,
    dx: f64,
    dy: f64,
    mode: MoveMode,
    grid: f64,
) -> MovementResult {
    let delta = Vec2::new(dx, dy);
    let mut result = MovementResult::default();
    if delta == Vec2::ZERO || !layer.layer().has_selection() {
        return result;
    }
    let mut layer = layer.undo_group();

    for path_index in 0..layer.layer().paths.len() {
        let path = layer.layer().path(path_index);
        if !path.has_selection() {
            continue;
        }
        let original: Vec<Point> = path.points.iter().map(|p| p.position()).collect();
        let (mut positions, moved) = move_path_points(path, delta, mode, grid, &mut result);
        result.smooth_adjustments += constrain_path(path, &mut positions, &moved);

        for (point_index, position) in positions.into_iter().enumerate() {
            if position != original[point_index] {
                layer
                    .point_mut(PointId::new(path_index, point_index))
                    .set_position(position);
            }
        }
    }

    for index in 0..layer.layer().anchors.len() {
        let anchor = &layer.layer().anchors[index];
        if anchor.selected {
            let position = round_point_to_grid(anchor.position() + delta, grid);
            layer.anchor_mut(index).set_position(position);
        }
    }
    for index in 0..layer.layer().components.len() {
        let component = &layer.layer().components[index];
        if component.selected {
            let origin = component.origin();
            let target = round_point_to_grid(origin + delta, grid);
            let transform = Affine::translate(target - origin) * component.transform();
            layer.component_mut(index).set_transform(transform);
        }
    }
    for index in 0..layer.layer().guidelines.len() {
        let guideline = &layer.layer().guidelines[index];
        if guideline.selected {
            let position = round_point_to_grid(guideline.position() + delta, grid);
            layer.guideline_mut(index).set_position(position);
        }
    }

    debug!(
        "[MOVE] {:?} by ({:.1}, {:.1}): {} points, {} handles, {} smooth adjustments",
        mode, dx, dy, result.points_moved, result.connected_offcurves_moved, result.smooth_adjustments
    );
    result
}

/// New positions for one path plus which points the move itself touched
fn move_path_points(
    path: &Path,
    delta: Vec2,
    mode: MoveMode,
    grid: f64,
    result: &mut MovementResult,
) -> (Vec<Point>, Vec<bool>) {
    let points = &path.points;
    let mut positions: Vec<Point> = points.iter().map(|p| p.position()).collect();
    let mut moved = vec![false; points.len()];

    for (i, point) in points.iter().enumerate() {
        if point.selected {
            positions[i] = round_point_to_grid(point.position() + delta, grid);
            moved[i] = true;
            result.points_moved += 1;
        }
    }

    match mode {
        MoveMode::StaticHandles => {}
        MoveMode::Normal => {
            for (i, point) in points.iter().enumerate() {
                if point.selected || point.is_on_curve() {
                    continue;
                }
                let Some(anchor) = attached_on_curve(path, i) else {
                    continue;
                };
                let owner = &points[anchor];
                if owner.selected && owner.point_type != PointType::Move {
                    positions[i] = round_point_to_grid(point.position() + delta, grid);
                    moved[i] = true;
                    result.connected_offcurves_moved += 1;
                }
            }
        }
        MoveMode::InterpolateCurve => {
            for segment in path.segments() {
                let Some((h1, h2)) = segment.handles() else {
                    continue;
                };
                let (a, b) = (segment.start, segment.end);
                if !moved[a] && !moved[b] {
                    continue;
                }
                let (old_a, old_b) = (points[a].position(), points[b].position());
                let (new_a, new_b) = (positions[a], positions[b]);
                for (handle, attached) in [(h1, a), (h2, b)] {
                    if points[handle].selected {
                        continue;
                    }
                    let fallback = positions[attached] - points[attached].position();
                    let old = points[handle].position();
                    let x = interpolate_axis(old.x, old_a.x, old_b.x, new_a.x, new_b.x, fallback.x);
                    let y = interpolate_axis(old.y, old_a.y, old_b.y, new_a.y, new_b.y, fallback.y);
                    let position = round_point_to_grid(Point::new(x, y), grid);
                    if position != old {
                        positions[handle] = position;
                        moved[handle] = true;
                        result.connected_offcurves_moved += 1;
                    }
                }
            }
        }
    }
    (positions, moved)
}

/// Keep `value`'s fraction between `a` and `b` after they move to `new_a`
/// and `new_b`. A flat span on this axis moves the value by `fallback`.
fn interpolate_axis(value: f64, a: f64, b: f64, new_a: f64, new_b: f64, fallback: f64) -> f64 {
    let span = b - a;
    if span.abs() < EPSILON {
        return value + fallback;
    }
    let f = (value - a) / span;
    new_a + f * (new_b - new_a)
}

/// Keyboard nudge: a Normal-mode move by `(dx, dy)`
pub fn nudge_selection(layer: &mut LayerMut<'_>, dx: f64, dy: f64, grid: f64) -> MovementResult {
    move_selection(layer, dx, dy, MoveMode::Normal, grid)
}

/// Pull both handles of the curve segment starting at on-curve point
/// `segment_start` by `delta`.
///
/// With `maintain_direction`, or at a smooth end point, a handle is
/// projected back onto the line it had through its end point, so only its
/// length changes. Returns false when the segment is not a curve.
pub fn stretch_curve(
    layer: &mut LayerMut<'_>,
    path_index: usize,
    segment_start: usize,
    delta: Vec2,
    maintain_direction: bool,
) -> bool {
    let path = layer.layer().path(path_index);
    let Some(segment) = path.segment_starting_at(segment_start) else {
        return false;
    };
    let Some((h1, h2)) = segment.handles() else {
        return false;
    };
    let mut updates = Vec::with_capacity(2);
    for (handle, end) in [(h1, segment.start), (h2, segment.end)] {
        let old = path.points[handle].position();
        let pivot = path.points[end].position();
        let target = old + delta;
        let keep_direction = maintain_direction || path.points[end].smooth;
        let position = if keep_direction && (old - pivot).hypot() > EPSILON {
            project_onto_line(target, pivot, old)
        } else {
            target
        };
        updates.push((handle, position));
    }

    let mut layer = layer.undo_group();
    for (handle, position) in updates {
        layer
            .point_mut(PointId::new(path_index, handle))
            .set_position(position);
    }
    debug!(
        "Stretched curve {}.{} by ({:.1}, {:.1})",
        path_index, segment_start, delta.x, delta.y
    );
    true
}

/// Scale both handle lengths of a curve segment by `factor`, keeping their
/// directions. Returns false when the segment is not a curve.
pub fn stretch_curve_by(
    layer: &mut LayerMut<'_>,
    path_index: usize,
    segment_start: usize,
    factor: f64,
) -> bool {
    let path = layer.layer().path(path_index);
    let Some(segment) = path.segment_starting_at(segment_start) else {
        return false;
    };
    let Some((h1, h2)) = segment.handles() else {
        return false;
    };
    let updates: Vec<(usize, Point)> = [(h1, segment.start), (h2, segment.end)]
        .into_iter()
        .map(|(handle, end)| {
            let pivot = path.points[end].position();
            (handle, pivot + (path.points[handle].position() - pivot) * factor)
        })
        .collect();

    let mut layer = layer.undo_group();
    for (handle, position) in updates {
        layer
            .point_mut(PointId::new(path_index, handle))
            .set_position(position);
    }
    true
}

/// Give both handles of each selected curve segment the same length
/// relative to the chord: the average of their current ratios.
///
/// A segment counts as selected when both of its end points or either
/// handle is selected. Zero-length handles have no direction and are left
/// alone. Returns the number of segments balanced.
pub fn balance_handles(layer: &mut LayerMut<'_>) -> usize {
    let mut updates: Vec<(PointId, Point)> = Vec::new();
    let mut balanced = 0;
    for (path_index, path) in layer.layer().paths.iter().enumerate() {
        for segment in path.segments() {
            let Some((h1, h2)) = segment.handles() else {
                continue;
            };
            let pts = &path.points;
            let selected = (pts[segment.start].selected && pts[segment.end].selected)
                || pts[h1].selected
                || pts[h2].selected;
            if !selected {
                continue;
            }
            let (a, b) = (pts[segment.start].position(), pts[segment.end].position());
            let chord = (b - a).hypot();
            if chord < EPSILON {
                continue;
            }
            let (v1, v2) = (pts[h1].position() - a, pts[h2].position() - b);
            let (Some(d1), Some(d2)) = (unit(v1), unit(v2)) else {
                continue;
            };
            let ratio = (v1.hypot() / chord + v2.hypot() / chord) / 2.0;
            updates.push((PointId::new(path_index, h1), a + d1 * (ratio * chord)));
            updates.push((PointId::new(path_index, h2), b + d2 * (ratio * chord)));
            balanced += 1;
        }
    }
    if balanced == 0 {
        return 0;
    }

    let mut layer = layer.undo_group();
    for (id, position) in updates {
        layer.point_mut(id).set_position(position);
    }
    debug!("Balanced handles on {} segments", balanced);
    balanced
}
