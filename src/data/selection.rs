//! Selection views and hit testing
//!
//! Selection is stored as flags on the entities themselves. [`Selection`]
//! is a snapshot of what is currently flagged in one layer.

use super::layer::Layer;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Index address of a point within a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId {
    pub path: usize,
    pub point: usize,
}

impl PointId {
    pub fn new(path: usize, point: usize) -> Self {
        Self { path, point }
    }
}

/// Anything in a layer that can be selected or hit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectableItem {
    Point(PointId),
    /// A segment, named by its path and the index of its first on-curve point
    Segment { path: usize, start: usize },
    Anchor(usize),
    Component(usize),
    Guideline(usize),
}

/// The selected items of one layer, in outline order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    items: Vec<SelectableItem>,
}

impl Selection {
    /// Everything flagged as selected in `layer`
    pub fn of(layer: &Layer) -> Self {
        let mut items = Vec::new();
        for (path_index, path) in layer.paths.iter().enumerate() {
            for (point_index, point) in path.points.iter().enumerate() {
                if point.selected {
                    items.push(SelectableItem::Point(PointId::new(path_index, point_index)));
                }
            }
        }
        items.extend(
            layer
                .components
                .iter()
                .enumerate()
                .filter(|(_, c)| c.selected)
                .map(|(i, _)| SelectableItem::Component(i)),
        );
        items.extend(
            layer
                .anchors
                .iter()
                .enumerate()
                .filter(|(_, a)| a.selected)
                .map(|(i, _)| SelectableItem::Anchor(i)),
        );
        items.extend(
            layer
                .guidelines
                .iter()
                .enumerate()
                .filter(|(_, g)| g.selected)
                .map(|(i, _)| SelectableItem::Guideline(i)),
        );
        Self { items }
    }

    pub fn items(&self) -> &[SelectableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &SelectableItem) -> bool {
        self.items.contains(item)
    }

    /// Selected point addresses
    pub fn points(&self) -> Vec<PointId> {
        self.items
            .iter()
            .filter_map(|item| match item {
                SelectableItem::Point(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Indices of paths whose every point is selected
    pub fn whole_paths(layer: &Layer) -> Vec<usize> {
        layer
            .paths
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_selected())
            .map(|(i, _)| i)
            .collect()
    }

    /// Bounding box of the selected points and anchors
    pub fn bounds(&self, layer: &Layer) -> Option<Rect> {
        self.items
            .iter()
            .filter_map(|item| match *item {
                SelectableItem::Point(id) => Some(layer.paths[id.path].points[id.point].position()),
                SelectableItem::Anchor(i) => Some(layer.anchors[i].position()),
                SelectableItem::Component(i) => Some(layer.components[i].origin()),
                _ => None,
            })
            .map(|p| Rect::from_points(p, p))
            .reduce(|a, b| a.union(b))
    }
}

/// The item under `position`, or `None` if nothing is within `tolerance`.
///
/// Points, anchors and component origins win over segments, and segments
/// over guidelines; within a tier the closest item wins.
pub fn hit_test(layer: &Layer, position: Point, tolerance: f64) -> Option<SelectableItem> {
    let closest = |candidates: Vec<(f64, SelectableItem)>| {
        candidates
            .into_iter()
            .filter(|(d, _)| *d <= tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, item)| item)
    };

    let mut handles = Vec::new();
    for (path_index, path) in layer.paths.iter().enumerate() {
        for (point_index, point) in path.points.iter().enumerate() {
            handles.push((
                point.position().distance(position),
                SelectableItem::Point(PointId::new(path_index, point_index)),
            ));
        }
    }
    for (i, anchor) in layer.anchors.iter().enumerate() {
        handles.push((anchor.position().distance(position), SelectableItem::Anchor(i)));
    }
    for (i, component) in layer.components.iter().enumerate() {
        handles.push((component.origin().distance(position), SelectableItem::Component(i)));
    }
    if let Some(item) = closest(handles) {
        return Some(item);
    }

    let mut segments = Vec::new();
    for (path_index, path) in layer.paths.iter().enumerate() {
        for segment in path.segments() {
            let (_, distance) = segment.nearest(path, position);
            segments.push((
                distance,
                SelectableItem::Segment {
                    path: path_index,
                    start: segment.start,
                },
            ));
        }
    }
    if let Some(item) = closest(segments) {
        return Some(item);
    }

    closest(
        layer
            .guidelines
            .iter()
            .enumerate()
            .map(|(i, g)| (g.distance_to(position), SelectableItem::Guideline(i)))
            .collect(),
    )
}
