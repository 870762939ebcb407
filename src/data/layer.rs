//! Layers: one glyph outline at one master

use super::anchor::Anchor;
use super::component::Component;
use super::guideline::Guideline;
use super::path::Path;
use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) name: String,
    /// Resolved against the font's masters by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) master_name: Option<String>,
    pub(crate) width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) vertical_origin: Option<f64>,
    #[serde(default)]
    pub(crate) paths: Vec<Path>,
    #[serde(default)]
    pub(crate) components: Vec<Component>,
    #[serde(default)]
    pub(crate) anchors: Vec<Anchor>,
    #[serde(default)]
    pub(crate) guidelines: Vec<Guideline>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_master(mut self, master_name: impl Into<String>) -> Self {
        self.master_name = Some(master_name.into());
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_path(mut self, path: Path) -> Self {
        self.paths.push(path);
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    pub fn with_guideline(mut self, guideline: Guideline) -> Self {
        self.guidelines.push(guideline);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn master_name(&self) -> Option<&str> {
        self.master_name.as_deref()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn vertical_origin(&self) -> Option<f64> {
        self.vertical_origin
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Path at `index`; panics when out of range
    pub fn path(&self, index: usize) -> &Path {
        &self.paths[index]
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn guidelines(&self) -> &[Guideline] {
        &self.guidelines
    }

    /// Bounds of the layer's own paths (components need the font to resolve)
    pub fn bounds(&self) -> Option<Rect> {
        self.paths
            .iter()
            .filter_map(Path::bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Distance from the origin to the left edge of the outline
    pub fn left_margin(&self) -> Option<f64> {
        self.bounds().map(|b| b.x0)
    }

    /// Distance from the right edge of the outline to the advance width
    pub fn right_margin(&self) -> Option<f64> {
        self.bounds().map(|b| self.width - b.x1)
    }

    pub fn to_bezpaths(&self) -> Vec<BezPath> {
        self.paths.iter().map(Path::to_bezpath).collect()
    }

    pub fn has_selection(&self) -> bool {
        self.paths.iter().any(Path::has_selection)
            || self.components.iter().any(|c| c.selected)
            || self.anchors.iter().any(|a| a.selected)
            || self.guidelines.iter().any(|g| g.selected)
    }
}
