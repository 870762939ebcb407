//! Mutation handles
//!
//! Borrowing views that turn field assignments into recorded changes.
//! Every setter applies exactly one change through the owner's undo store,
//! and setting a field to the value it already has records nothing.

use super::anchor::Anchor;
use super::changes::{
    AnchorField, ComponentField, FontChange, GlyphChange, GuidelineField, LayerField, MasterField,
    PointField,
};
use super::component::Component;
use super::font::Font;
use super::glyph::Glyph;
use super::guideline::Guideline;
use super::layer::Layer;
use super::master::{AlignmentZone, Master};
use super::path::Path;
use super::point::{EditPoint, PointType};
use super::selection::PointId;
use crate::core::errors::{bail, BezyResult};
use crate::editing::change::Splice;
use crate::editing::undo::{UndoScope, UndoTarget};
use kurbo::{Affine, Point, Vec2};
use std::collections::BTreeMap;

/// Edits to one layer of a glyph
pub struct LayerMut<'a> {
    glyph: &'a mut Glyph,
    layer: usize,
}

impl<'a> LayerMut<'a> {
    pub(crate) fn new(glyph: &'a mut Glyph, layer: usize) -> Self {
        Self { glyph, layer }
    }

    pub fn layer(&self) -> &Layer {
        &self.glyph.layers[self.layer]
    }

    pub fn index(&self) -> usize {
        self.layer
    }

    pub fn glyph(&self) -> &Glyph {
        self.glyph
    }

    fn apply(&mut self, change: GlyphChange) {
        self.glyph.apply_change(change);
    }

    fn set_field(&mut self, field: LayerField) {
        let layer = self.layer;
        self.apply(GlyphChange::Layer { layer, field });
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.layer().name {
            self.set_field(LayerField::Name(name));
        }
    }

    pub fn set_master_name(&mut self, master_name: Option<String>) {
        if master_name != self.layer().master_name {
            self.set_field(LayerField::MasterName(master_name));
        }
    }

    pub fn set_width(&mut self, width: f64) {
        if width != self.layer().width {
            self.set_field(LayerField::Width(width));
        }
    }

    pub fn set_vertical_origin(&mut self, origin: Option<f64>) {
        if origin != self.layer().vertical_origin {
            self.set_field(LayerField::VerticalOrigin(origin));
        }
    }

    /// Shift the outline so the left margin becomes `margin`, keeping the
    /// right margin. Returns false for an empty outline.
    pub fn set_left_margin(&mut self, margin: f64) -> bool {
        let Some(current) = self.layer().left_margin() else {
            return false;
        };
        let delta = margin - current;
        let width = self.layer().width + delta;
        let mut layer = self.undo_group();
        layer.translate(Vec2::new(delta, 0.0));
        layer.set_width(width);
        true
    }

    /// Change the advance width so the right margin becomes `margin`.
    /// Returns false for an empty outline.
    pub fn set_right_margin(&mut self, margin: f64) -> bool {
        let Some(current) = self.layer().right_margin() else {
            return false;
        };
        let width = self.layer().width + margin - current;
        self.set_width(width);
        true
    }

    /// Move every point, component and anchor by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        let mut layer = self.undo_group();
        for path_index in 0..layer.layer().paths.len() {
            let mut path = layer.path_mut(path_index);
            for point_index in 0..path.path().len() {
                let position = path.path().points[point_index].position() + delta;
                path.point_mut(point_index).set_position(position);
            }
        }
        for index in 0..layer.layer().components.len() {
            let transform = Affine::translate(delta) * layer.layer().components[index].transform;
            layer.component_mut(index).set_transform(transform);
        }
        for index in 0..layer.layer().anchors.len() {
            let position = layer.layer().anchors[index].position() + delta;
            layer.anchor_mut(index).set_position(position);
        }
    }

    fn splice_paths(&mut self, splice: Splice<Path>) {
        if !splice.is_noop() {
            let layer = self.layer;
            self.apply(GlyphChange::Paths { layer, splice });
        }
    }

    pub fn add_path(&mut self, path: Path) -> usize {
        let index = self.layer().paths.len();
        self.insert_path(index, path);
        index
    }

    pub fn insert_path(&mut self, index: usize, path: Path) {
        self.splice_paths(Splice::insert(index, path));
    }

    pub fn remove_path(&mut self, index: usize) -> Path {
        let removed = self.layer().paths[index].clone();
        self.splice_paths(Splice::remove(index));
        removed
    }

    pub fn replace_path(&mut self, index: usize, path: Path) {
        if self.layer().paths[index] != path {
            self.splice_paths(Splice::replace(index, path));
        }
    }

    /// Replace `count` paths starting at `index` with `paths`
    pub fn splice_path_range(&mut self, index: usize, count: usize, paths: Vec<Path>) {
        self.splice_paths(Splice::new(index, count, paths));
    }

    /// Replace the whole path list as one change
    pub fn set_paths(&mut self, paths: Vec<Path>) {
        if self.layer().paths != paths {
            let len = self.layer().paths.len();
            self.splice_paths(Splice::reset(len, paths));
        }
    }

    /// Edits to one path; panics when out of range
    pub fn path_mut(&mut self, index: usize) -> PathMut<'_> {
        assert!(index < self.layer().paths.len(), "path index {} out of range", index);
        PathMut {
            glyph: self.glyph,
            layer: self.layer,
            path: index,
        }
    }

    /// Shortcut to one point
    pub fn point_mut(&mut self, id: PointId) -> PointMut<'_> {
        assert!(id.path < self.layer().paths.len(), "path index {} out of range", id.path);
        assert!(
            id.point < self.layer().paths[id.path].len(),
            "point index {} out of range",
            id.point
        );
        PointMut {
            glyph: self.glyph,
            layer: self.layer,
            path: id.path,
            point: id.point,
        }
    }

    fn splice_components(&mut self, splice: Splice<Component>) {
        if !splice.is_noop() {
            let layer = self.layer;
            self.apply(GlyphChange::Components { layer, splice });
        }
    }

    /// Fails if the component refers to this glyph itself; longer cycles
    /// are caught by `Font::validate_components`
    pub fn add_component(&mut self, component: Component) -> BezyResult<usize> {
        check_not_self(self.glyph, component.glyph_name())?;
        let index = self.layer().components.len();
        self.splice_components(Splice::insert(index, component));
        Ok(index)
    }

    pub fn remove_component(&mut self, index: usize) -> Component {
        let removed = self.layer().components[index].clone();
        self.splice_components(Splice::remove(index));
        removed
    }

    pub fn set_components(&mut self, components: Vec<Component>) -> BezyResult<()> {
        for component in &components {
            check_not_self(self.glyph, component.glyph_name())?;
        }
        if self.layer().components != components {
            let len = self.layer().components.len();
            self.splice_components(Splice::reset(len, components));
        }
        Ok(())
    }

    pub fn component_mut(&mut self, index: usize) -> ComponentMut<'_> {
        assert!(index < self.layer().components.len(), "component index {} out of range", index);
        ComponentMut {
            glyph: self.glyph,
            layer: self.layer,
            index,
        }
    }

    fn splice_anchors(&mut self, splice: Splice<Anchor>) {
        if !splice.is_noop() {
            let layer = self.layer;
            self.apply(GlyphChange::Anchors { layer, splice });
        }
    }

    pub fn add_anchor(&mut self, anchor: Anchor) -> usize {
        let index = self.layer().anchors.len();
        self.splice_anchors(Splice::insert(index, anchor));
        index
    }

    pub fn remove_anchor(&mut self, index: usize) -> Anchor {
        let removed = self.layer().anchors[index].clone();
        self.splice_anchors(Splice::remove(index));
        removed
    }

    pub fn anchor_mut(&mut self, index: usize) -> AnchorMut<'_> {
        assert!(index < self.layer().anchors.len(), "anchor index {} out of range", index);
        AnchorMut {
            glyph: self.glyph,
            layer: self.layer,
            index,
        }
    }

    fn splice_guidelines(&mut self, splice: Splice<Guideline>) {
        if !splice.is_noop() {
            let layer = self.layer;
            self.apply(GlyphChange::Guidelines { layer, splice });
        }
    }

    pub fn add_guideline(&mut self, guideline: Guideline) -> usize {
        let index = self.layer().guidelines.len();
        self.splice_guidelines(Splice::insert(index, guideline));
        index
    }

    pub fn remove_guideline(&mut self, index: usize) -> Guideline {
        let removed = self.layer().guidelines[index].clone();
        self.splice_guidelines(Splice::remove(index));
        removed
    }

    pub fn guideline_mut(&mut self, index: usize) -> GuidelineMut<'_> {
        assert!(index < self.layer().guidelines.len(), "guideline index {} out of range", index);
        GuidelineMut {
            owner: GuidelineOwner::Layer {
                glyph: self.glyph,
                layer: self.layer,
            },
            index,
        }
    }

    /// Deselect everything in the layer
    pub fn clear_selection(&mut self) {
        self.set_all_selected(false);
    }

    /// Select every point, component, anchor and guideline
    pub fn select_all(&mut self) {
        self.set_all_selected(true);
    }

    fn set_all_selected(&mut self, selected: bool) {
        let mut layer = self.undo_group();
        for path_index in 0..layer.layer().paths.len() {
            layer.path_mut(path_index).set_selected(selected);
        }
        for index in 0..layer.layer().components.len() {
            layer.component_mut(index).set_selected(selected);
        }
        for index in 0..layer.layer().anchors.len() {
            layer.anchor_mut(index).set_selected(selected);
        }
        for index in 0..layer.layer().guidelines.len() {
            layer.guideline_mut(index).set_selected(selected);
        }
    }

    /// Select exactly the given points
    pub fn select_points(&mut self, ids: &[PointId]) {
        let mut layer = self.undo_group();
        for path_index in 0..layer.layer().paths.len() {
            for point_index in 0..layer.layer().paths[path_index].len() {
                let selected = ids.contains(&PointId::new(path_index, point_index));
                layer
                    .point_mut(PointId::new(path_index, point_index))
                    .set_selected(selected);
            }
        }
    }
}

impl UndoScope for LayerMut<'_> {
    fn begin_undo_group(&mut self) -> usize {
        self.glyph.begin_undo_group()
    }

    fn end_undo_group(&mut self) {
        self.glyph.end_undo_group()
    }

    fn reset_undo_group(&mut self) {
        self.glyph.reset_undo_group()
    }
}

/// Edits to one path of a layer
pub struct PathMut<'a> {
    glyph: &'a mut Glyph,
    layer: usize,
    path: usize,
}

impl PathMut<'_> {
    pub fn path(&self) -> &Path {
        &self.glyph.layers[self.layer].paths[self.path]
    }

    fn splice_points(&mut self, splice: Splice<EditPoint>) {
        if !splice.is_noop() {
            let (layer, path) = (self.layer, self.path);
            self.glyph.apply_change(GlyphChange::Points {
                layer,
                path,
                splice,
            });
        }
    }

    pub fn add_point(&mut self, point: EditPoint) -> usize {
        let index = self.path().len();
        self.insert_point(index, point);
        index
    }

    pub fn insert_point(&mut self, index: usize, point: EditPoint) {
        self.splice_points(Splice::insert(index, point));
    }

    pub fn insert_points(&mut self, index: usize, points: Vec<EditPoint>) {
        self.splice_points(Splice::insert_many(index, points));
    }

    pub fn remove_point(&mut self, index: usize) -> EditPoint {
        let removed = self.path().points[index].clone();
        self.splice_points(Splice::remove(index));
        removed
    }

    pub fn remove_points(&mut self, index: usize, count: usize) {
        self.splice_points(Splice::remove_range(index, count));
    }

    /// Replace the whole point list as one change
    pub fn set_points(&mut self, points: Vec<EditPoint>) {
        if self.path().points != points {
            let len = self.path().len();
            self.splice_points(Splice::reset(len, points));
        }
    }

    pub fn point_mut(&mut self, index: usize) -> PointMut<'_> {
        assert!(index < self.path().len(), "point index {} out of range", index);
        PointMut {
            glyph: self.glyph,
            layer: self.layer,
            path: self.path,
            point: index,
        }
    }

    /// Select or deselect every point of the path
    pub fn set_selected(&mut self, selected: bool) {
        for index in 0..self.path().len() {
            self.point_mut(index).set_selected(selected);
        }
    }
}

fn check_not_self(glyph: &Glyph, component_name: &str) -> BezyResult<()> {
    if component_name == glyph.name {
        bail!("Glyph '{}' cannot use itself as a component", glyph.name);
    }
    Ok(())
}

/// Edits to one point
pub struct PointMut<'a> {
    glyph: &'a mut Glyph,
    layer: usize,
    path: usize,
    point: usize,
}

impl PointMut<'_> {
    pub fn point(&self) -> &EditPoint {
        &self.glyph.layers[self.layer].paths[self.path].points[self.point]
    }

    fn set_field(&mut self, field: PointField) {
        let (layer, path, point) = (self.layer, self.path, self.point);
        self.glyph.apply_change(GlyphChange::Point {
            layer,
            path,
            point,
            field,
        });
    }

    pub fn set_x(&mut self, x: f64) {
        if x != self.point().x {
            self.set_field(PointField::X(x));
        }
    }

    pub fn set_y(&mut self, y: f64) {
        if y != self.point().y {
            self.set_field(PointField::Y(y));
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match (position.x != self.point().x, position.y != self.point().y) {
            (true, true) => self.set_field(PointField::Position(position)),
            (true, false) => self.set_field(PointField::X(position.x)),
            (false, true) => self.set_field(PointField::Y(position.y)),
            (false, false) => {}
        }
    }

    pub fn set_type(&mut self, point_type: PointType) {
        if point_type != self.point().point_type {
            self.set_field(PointField::Type(point_type));
        }
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        if smooth != self.point().smooth {
            self.set_field(PointField::Smooth(smooth));
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        if selected != self.point().selected {
            self.set_field(PointField::Selected(selected));
        }
    }
}

/// Edits to one component
pub struct ComponentMut<'a> {
    glyph: &'a mut Glyph,
    layer: usize,
    index: usize,
}

impl ComponentMut<'_> {
    pub fn component(&self) -> &Component {
        &self.glyph.layers[self.layer].components[self.index]
    }

    fn set_field(&mut self, field: ComponentField) {
        let (layer, index) = (self.layer, self.index);
        self.glyph.apply_change(GlyphChange::Component { layer, index, field });
    }

    pub fn set_glyph_name(&mut self, name: impl Into<String>) -> BezyResult<()> {
        let name = name.into();
        check_not_self(self.glyph, &name)?;
        if name != self.component().glyph_name {
            self.set_field(ComponentField::GlyphName(name));
        }
        Ok(())
    }

    pub fn set_transform(&mut self, transform: Affine) {
        if transform != self.component().transform {
            self.set_field(ComponentField::Transform(transform));
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        if selected != self.component().selected {
            self.set_field(ComponentField::Selected(selected));
        }
    }
}

/// Edits to one anchor
pub struct AnchorMut<'a> {
    glyph: &'a mut Glyph,
    layer: usize,
    index: usize,
}

impl AnchorMut<'_> {
    pub fn anchor(&self) -> &Anchor {
        &self.glyph.layers[self.layer].anchors[self.index]
    }

    fn set_field(&mut self, field: AnchorField) {
        let (layer, index) = (self.layer, self.index);
        self.glyph.apply_change(GlyphChange::Anchor { layer, index, field });
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.anchor().name {
            self.set_field(AnchorField::Name(name));
        }
    }

    pub fn set_position(&mut self, position: Point) {
        if position != self.anchor().position() {
            self.set_field(AnchorField::Position(position));
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        if selected != self.anchor().selected {
            self.set_field(AnchorField::Selected(selected));
        }
    }
}

enum GuidelineOwner<'a> {
    Layer { glyph: &'a mut Glyph, layer: usize },
    Master { font: &'a mut Font, master: usize },
}

/// Edits to one guideline, local to a layer or shared by a master
pub struct GuidelineMut<'a> {
    owner: GuidelineOwner<'a>,
    index: usize,
}

impl GuidelineMut<'_> {
    pub fn guideline(&self) -> &Guideline {
        match &self.owner {
            GuidelineOwner::Layer { glyph, layer } => &glyph.layers[*layer].guidelines[self.index],
            GuidelineOwner::Master { font, master } => &font.masters[*master].guidelines[self.index],
        }
    }

    fn set_field(&mut self, field: GuidelineField) {
        let index = self.index;
        match &mut self.owner {
            GuidelineOwner::Layer { glyph, layer } => {
                let layer = *layer;
                glyph.apply_change(GlyphChange::Guideline { layer, index, field });
            }
            GuidelineOwner::Master { font, master } => {
                let master = *master;
                font.apply_change(FontChange::MasterGuideline {
                    master,
                    index,
                    field,
                });
            }
        }
    }

    pub fn set_position(&mut self, position: Point) {
        if position != self.guideline().position() {
            self.set_field(GuidelineField::Position(position));
        }
    }

    pub fn set_angle(&mut self, angle: f64) {
        if angle != self.guideline().angle {
            self.set_field(GuidelineField::Angle(angle));
        }
    }

    pub fn set_name(&mut self, name: Option<String>) {
        if name != self.guideline().name {
            self.set_field(GuidelineField::Name(name));
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        if selected != self.guideline().selected {
            self.set_field(GuidelineField::Selected(selected));
        }
    }
}

/// Edits to one master; recorded in the font's undo store
pub struct MasterMut<'a> {
    font: &'a mut Font,
    master: usize,
}

impl<'a> MasterMut<'a> {
    pub(crate) fn new(font: &'a mut Font, master: usize) -> Self {
        Self { font, master }
    }

    pub fn master(&self) -> &Master {
        &self.font.masters[self.master]
    }

    fn set_field(&mut self, field: MasterField) {
        let master = self.master;
        self.font.apply_change(FontChange::Master { master, field });
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.master().name {
            self.set_field(MasterField::Name(name));
        }
    }

    pub fn set_location(&mut self, location: BTreeMap<String, f64>) {
        if location != self.master().location {
            self.set_field(MasterField::Location(location));
        }
    }

    pub fn set_ascender(&mut self, value: f64) {
        if value != self.master().ascender {
            self.set_field(MasterField::Ascender(value));
        }
    }

    pub fn set_descender(&mut self, value: f64) {
        if value != self.master().descender {
            self.set_field(MasterField::Descender(value));
        }
    }

    pub fn set_cap_height(&mut self, value: f64) {
        if value != self.master().cap_height {
            self.set_field(MasterField::CapHeight(value));
        }
    }

    pub fn set_x_height(&mut self, value: f64) {
        if value != self.master().x_height {
            self.set_field(MasterField::XHeight(value));
        }
    }

    pub fn add_zone(&mut self, zone: AlignmentZone) -> usize {
        let (master, index) = (self.master, self.master().alignment_zones.len());
        self.font.apply_change(FontChange::AlignmentZones {
            master,
            splice: Splice::insert(index, zone),
        });
        index
    }

    pub fn remove_zone(&mut self, index: usize) -> AlignmentZone {
        let master = self.master;
        let removed = self.master().alignment_zones[index];
        self.font.apply_change(FontChange::AlignmentZones {
            master,
            splice: Splice::remove(index),
        });
        removed
    }

    pub fn add_guideline(&mut self, guideline: Guideline) -> usize {
        let (master, index) = (self.master, self.master().guidelines.len());
        self.font.apply_change(FontChange::MasterGuidelines {
            master,
            splice: Splice::insert(index, guideline),
        });
        index
    }

    pub fn remove_guideline(&mut self, index: usize) -> Guideline {
        let master = self.master;
        let removed = self.master().guidelines[index].clone();
        self.font.apply_change(FontChange::MasterGuidelines {
            master,
            splice: Splice::remove(index),
        });
        removed
    }

    pub fn guideline_mut(&mut self, index: usize) -> GuidelineMut<'_> {
        assert!(index < self.master().guidelines.len(), "guideline index {} out of range", index);
        GuidelineMut {
            owner: GuidelineOwner::Master {
                font: self.font,
                master: self.master,
            },
            index,
        }
    }
}

impl UndoScope for MasterMut<'_> {
    fn begin_undo_group(&mut self) -> usize {
        self.font.begin_undo_group()
    }

    fn end_undo_group(&mut self) {
        self.font.end_undo_group()
    }

    fn reset_undo_group(&mut self) {
        self.font.reset_undo_group()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::path::test_paths::{square, square_at};

    fn glyph() -> Glyph {
        Glyph::new("a").with_layer(
            Layer::new("public.default")
                .with_width(300.0)
                .with_path(square_at(50.0, 0.0, 100.0))
                .with_anchor(Anchor::new("top", 100.0, 700.0)),
        )
    }

    #[test]
    fn test_point_setters_record_one_change_each() {
        let mut glyph = glyph();
        {
            let mut layer = glyph.layer_mut(0);
            let mut path = layer.path_mut(0);
            path.point_mut(0).set_x(10.0);
            path.point_mut(0).set_x(10.0);
            path.point_mut(1).set_type(PointType::Line);
        }
        assert_eq!(glyph.undo_store().undo_count(), 1);
        assert_eq!(glyph.layer(0).path(0).point(0).x(), 10.0);
    }

    #[test]
    fn test_set_position_is_one_undo_step() {
        let mut glyph = glyph();
        let id = PointId::new(0, 2);
        glyph.layer_mut(0).point_mut(id).set_position(Point::new(200.0, 170.0));
        glyph.layer_mut(0).anchor_mut(0).set_position(Point::new(120.0, 720.0));
        assert_eq!(glyph.undo_store().undo_count(), 2);

        glyph.undo().unwrap();
        assert_eq!(glyph.layer(0).anchors()[0].position(), Point::new(100.0, 700.0));
        glyph.undo().unwrap();
        assert_eq!(glyph.layer(0).path(0).point(2).position(), Point::new(150.0, 100.0));
    }

    #[test]
    fn test_component_cannot_reference_own_glyph() {
        let mut glyph = glyph();
        assert!(glyph.layer_mut(0).add_component(Component::new("a", Affine::IDENTITY)).is_err());
        assert!(glyph.layer(0).components().is_empty());

        let index = glyph
            .layer_mut(0)
            .add_component(Component::new("b", Affine::IDENTITY))
            .unwrap();
        assert!(glyph.layer_mut(0).component_mut(index).set_glyph_name("a").is_err());
        assert_eq!(glyph.layer(0).components()[0].glyph_name(), "b");
        assert_eq!(glyph.undo_store().undo_count(), 1);
    }

    #[test]
    fn test_translate_is_one_undo_step() {
        let mut glyph = glyph();
        let before = glyph.layer(0).clone();
        glyph.layer_mut(0).translate(Vec2::new(5.0, -5.0));
        assert_eq!(glyph.layer(0).path(0).point(0).position(), Point::new(55.0, -5.0));
        assert_eq!(glyph.layer(0).anchors()[0].position(), Point::new(105.0, 695.0));
        assert_eq!(glyph.undo_store().undo_count(), 1);
        glyph.undo().unwrap();
        assert_eq!(glyph.layer(0), &before);
    }

    #[test]
    fn test_margins() {
        let mut glyph = glyph();
        assert!(glyph.layer_mut(0).set_left_margin(20.0));
        let layer = glyph.layer(0);
        assert_eq!(layer.left_margin(), Some(20.0));
        assert_eq!(layer.right_margin(), Some(150.0));
        assert_eq!(layer.width(), 270.0);

        assert!(glyph.layer_mut(0).set_right_margin(30.0));
        assert_eq!(glyph.layer(0).width(), 150.0);

        let mut empty = Glyph::new("space").with_layer(Layer::new("default").with_width(250.0));
        assert!(!empty.layer_mut(0).set_left_margin(10.0));
    }

    #[test]
    fn test_selection_only_edits_are_not_undo_steps() {
        let mut glyph = glyph();
        glyph.layer_mut(0).select_all();
        assert!(glyph.layer(0).path(0).is_selected());
        assert!(!glyph.is_modified());
        glyph.layer_mut(0).clear_selection();
        assert!(!glyph.layer(0).has_selection());
    }

    #[test]
    fn test_select_points_is_exact() {
        let mut glyph = glyph();
        glyph.layer_mut(0).select_all();
        glyph.layer_mut(0).select_points(&[PointId::new(0, 2)]);
        let path = glyph.layer(0).path(0);
        let selected: Vec<bool> = path.points().iter().map(|p| p.is_selected()).collect();
        assert_eq!(selected, vec![false, false, true, false]);
    }

    #[test]
    fn test_set_paths_replaces_in_one_change() {
        let mut glyph = glyph();
        glyph.layer_mut(0).set_paths(vec![square(1.0), square(2.0)]);
        assert_eq!(glyph.layer(0).paths().len(), 2);
        glyph.undo().unwrap();
        assert_eq!(glyph.layer(0).paths().len(), 1);
    }

    #[test]
    fn test_master_guideline_edits_go_to_font_store() {
        let mut font = Font::new("Test", 1000.0).with_master(Master::new("Regular", 1000.0));
        {
            let mut master = font.master_mut(0);
            let mut master = master.undo_group();
            master.set_x_height(480.0);
            let index = master.add_guideline(Guideline::horizontal(100.0));
            master.guideline_mut(index).set_position(Point::new(0.0, 120.0));
            master.add_zone(AlignmentZone::new(480.0, 12.0));
        }
        assert_eq!(font.masters()[0].guidelines()[0].y(), 120.0);
        assert_eq!(font.undo_store().undo_count(), 1);
        font.undo().unwrap();
        assert_eq!(font.masters()[0], Master::new("Regular", 1000.0));
    }
}
