//! Glyphs
//!
//! A glyph owns its layers and its own undo store: undo and redo are scoped
//! per glyph. All mutation goes through the methods here and the handles
//! returned by [`Glyph::layer_mut`].

use super::changes::GlyphChange;
use super::handles::LayerMut;
use super::layer::Layer;
use crate::editing::change::Splice;
use crate::editing::undo::{UndoScope, UndoStore, UndoTarget};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Glyph {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) unicodes: Vec<u32>,
    #[serde(default)]
    pub(crate) layers: Vec<Layer>,
    #[serde(skip)]
    pub(crate) undo: UndoStore<GlyphChange>,
}

/// Glyphs compare by content; undo history is not part of equality
impl PartialEq for Glyph {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.unicodes == other.unicodes && self.layers == other.layers
    }
}

impl Glyph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_unicode(mut self, codepoint: u32) -> Self {
        self.unicodes.push(codepoint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unicodes(&self) -> &[u32] {
        &self.unicodes
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer at `index`; panics when out of range
    pub fn layer(&self, index: usize) -> &Layer {
        &self.layers[index]
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// The layer drawn for `master`, falling back to the first layer
    pub fn layer_for_master(&self, master: Option<&str>) -> Option<&Layer> {
        master
            .and_then(|m| self.layers.iter().find(|l| l.master_name.as_deref() == Some(m)))
            .or_else(|| self.layers.first())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.name {
            self.apply_change(GlyphChange::Name(name));
        }
    }

    pub fn set_unicodes(&mut self, unicodes: Vec<u32>) {
        if unicodes != self.unicodes {
            let splice = Splice::reset(self.unicodes.len(), unicodes);
            self.apply_change(GlyphChange::Unicodes(splice));
        }
    }

    pub fn add_unicode(&mut self, codepoint: u32) {
        let splice = Splice::insert(self.unicodes.len(), codepoint);
        self.apply_change(GlyphChange::Unicodes(splice));
    }

    pub fn add_layer(&mut self, layer: Layer) -> usize {
        let index = self.layers.len();
        self.insert_layer(index, layer);
        index
    }

    pub fn insert_layer(&mut self, index: usize, layer: Layer) {
        self.apply_change(GlyphChange::Layers(Splice::insert(index, layer)));
    }

    pub fn remove_layer(&mut self, index: usize) -> Layer {
        let removed = self.layers[index].clone();
        self.apply_change(GlyphChange::Layers(Splice::remove(index)));
        removed
    }

    /// Mutation handle for one layer; panics when out of range
    pub fn layer_mut(&mut self, index: usize) -> LayerMut<'_> {
        assert!(
            index < self.layers.len(),
            "layer index {} out of range for glyph '{}' ({} layers)",
            index,
            self.name,
            self.layers.len()
        );
        LayerMut::new(self, index)
    }
}

impl UndoTarget for Glyph {
    type Change = GlyphChange;

    fn undo_store(&self) -> &UndoStore<GlyphChange> {
        &self.undo
    }

    fn undo_store_mut(&mut self) -> &mut UndoStore<GlyphChange> {
        &mut self.undo
    }
}

impl UndoScope for Glyph {
    fn begin_undo_group(&mut self) -> usize {
        self.undo.begin_group()
    }

    fn end_undo_group(&mut self) {
        self.undo.end_group()
    }

    fn reset_undo_group(&mut self) {
        self.reset_open_group()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::path::test_paths::square;

    #[test]
    fn test_layer_for_master_falls_back_to_first() {
        let glyph = Glyph::new("a")
            .with_layer(Layer::new("light").with_master("Light"))
            .with_layer(Layer::new("bold").with_master("Bold"));
        assert_eq!(glyph.layer_for_master(Some("Bold")).map(Layer::name), Some("bold"));
        assert_eq!(glyph.layer_for_master(Some("Black")).map(Layer::name), Some("light"));
        assert_eq!(glyph.layer_for_master(None).map(Layer::name), Some("light"));
    }

    #[test]
    fn test_glyph_edits_mark_modified_and_undo() {
        let mut glyph = Glyph::new("a").with_layer(Layer::new("default").with_path(square(10.0)));
        assert!(!glyph.is_modified());
        glyph.set_name("b");
        glyph.add_unicode(0x62);
        glyph.remove_layer(0);
        assert!(glyph.is_modified());
        assert!(glyph.layers().is_empty());

        glyph.undo().unwrap();
        assert_eq!(glyph.layers().len(), 1);
        glyph.undo().unwrap();
        assert!(glyph.unicodes().is_empty());
        glyph.undo().unwrap();
        assert_eq!(glyph.name(), "a");
        assert!(!glyph.is_modified());
    }

    #[test]
    fn test_setting_same_value_records_nothing() {
        let mut glyph = Glyph::new("a");
        glyph.set_name("a");
        glyph.set_unicodes(Vec::new());
        assert!(!glyph.undo_store().can_undo());
    }

    #[test]
    #[should_panic]
    fn test_layer_mut_out_of_range_panics() {
        let mut glyph = Glyph::new("a");
        let _ = glyph.layer_mut(0);
    }
}
