//! Snapping dragged positions to nearby geometry
//!
//! Targets, in priority order:
//! 1. unselected on-curve points and anchors (snaps both coordinates)
//! 2. vertical metrics and alignment zone edges of the master (snaps y),
//!    or layer and master guidelines (projects onto the guide), whichever
//!    is closer

use crate::data::layer::Layer;
use crate::data::master::Master;
use crate::data::selection::PointId;
use crate::geometry::vector::project_onto_line;
use kurbo::Point;

/// What a position snapped to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapTarget {
    Point(PointId),
    Anchor(usize),
    /// A metric height or zone edge
    Height(f64),
    /// Index into the layer guidelines followed by the master guidelines
    Guideline(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub position: Point,
    pub target: SnapTarget,
}

/// The closest snap within `distance` of `position`, if any
pub fn find_snap(
    layer: &Layer,
    master: Option<&Master>,
    position: Point,
    distance: f64,
) -> Option<Snap> {
    if distance <= 0.0 {
        return None;
    }

    let mut best: Option<(f64, Snap)> = None;
    let mut consider = |d: f64, snap: Snap| {
        if d <= distance && best.as_ref().map_or(true, |(bd, _)| d < *bd) {
            best = Some((d, snap));
        }
    };

    for (path_index, path) in layer.paths.iter().enumerate() {
        for (point_index, point) in path.points.iter().enumerate() {
            if point.selected || !point.is_on_curve() {
                continue;
            }
            consider(
                point.position().distance(position),
                Snap {
                    position: point.position(),
                    target: SnapTarget::Point(PointId::new(path_index, point_index)),
                },
            );
        }
    }
    for (index, anchor) in layer.anchors.iter().enumerate() {
        if !anchor.selected {
            consider(
                anchor.position().distance(position),
                Snap {
                    position: anchor.position(),
                    target: SnapTarget::Anchor(index),
                },
            );
        }
    }
    if let Some((_, snap)) = best {
        return Some(snap);
    }

    let mut best: Option<(f64, Snap)> = None;
    let mut consider = |d: f64, snap: Snap| {
        if d <= distance && best.as_ref().map_or(true, |(bd, _)| d < *bd) {
            best = Some((d, snap));
        }
    };
    if let Some(master) = master {
        for height in master.snap_heights() {
            consider(
                (position.y - height).abs(),
                Snap {
                    position: Point::new(position.x, height),
                    target: SnapTarget::Height(height),
                },
            );
        }
    }
    let master_guides = master.map(|m| m.guidelines()).unwrap_or_default();
    for (index, guide) in layer.guidelines.iter().chain(master_guides).enumerate() {
        let origin = guide.position();
        let projected = project_onto_line(position, origin, origin + guide.direction());
        consider(
            projected.distance(position),
            Snap {
                position: projected,
                target: SnapTarget::Guideline(index),
            },
        );
    }
    best.map(|(_, snap)| snap)
}

/// `position` moved onto the closest snap target within `distance`, or
/// unchanged when there is none
pub fn snap_position(layer: &Layer, master: Option<&Master>, position: Point, distance: f64) -> Point {
    find_snap(layer, master, position, distance).map_or(position, |snap| snap.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::anchor::Anchor;
    use crate::data::guideline::Guideline;
    use crate::data::path::test_paths::square;

    fn layer() -> Layer {
        Layer::new("default")
            .with_path(square(100.0))
            .with_anchor(Anchor::new("top", 50.0, 300.0))
            .with_guideline(Guideline::vertical(250.0))
    }

    fn master() -> Master {
        Master::new("Regular", 1000.0).with_metrics(750.0, -250.0, 700.0, 500.0)
    }

    #[test]
    fn test_snaps_to_points_first() {
        let snap = find_snap(&layer(), Some(&master()), Point::new(97.0, 3.0), 8.0).unwrap();
        assert_eq!(snap.position, Point::new(100.0, 0.0));
        assert_eq!(snap.target, SnapTarget::Point(PointId::new(0, 1)));
        assert_eq!(
            snap_position(&layer(), None, Point::new(52.0, 301.0), 8.0),
            Point::new(50.0, 300.0)
        );
    }

    #[test]
    fn test_selected_points_are_not_targets() {
        let mut layer = layer();
        layer.paths[0].points[1].selected = true;
        let snap = find_snap(&layer, None, Point::new(97.0, 3.0), 8.0);
        assert_eq!(snap, None);
    }

    #[test]
    fn test_snaps_to_metrics_and_guides() {
        let master = master();
        let snapped = snap_position(&layer(), Some(&master), Point::new(400.0, 503.0), 8.0);
        assert_eq!(snapped, Point::new(400.0, 500.0));
        let snapped = snap_position(&layer(), Some(&master), Point::new(246.0, 600.0), 8.0);
        assert!(snapped.distance(Point::new(250.0, 600.0)) < 1e-9);
        let far = Point::new(400.0, 600.0);
        assert_eq!(snap_position(&layer(), Some(&master), far, 8.0), far);
    }
}
