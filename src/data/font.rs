//! The font: glyphs, masters and font-wide info
//!
//! Font-level fields have their own undo store. Glyph contents are edited
//! through [`Font::glyph_mut`] and recorded in that glyph's store.

use super::changes::FontChange;
use super::component::Component;
use super::glyph::Glyph;
use super::guideline::Guideline;
use super::handles::MasterMut;
use super::layer::Layer;
use super::master::Master;
use super::path::Path;
use crate::core::errors::{bail, glyph_not_found, BezyResult};
use crate::editing::change::Splice;
use crate::editing::undo::{UndoScope, UndoStore, UndoTarget};
use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Font {
    pub(crate) family_name: String,
    pub(crate) units_per_em: f64,
    #[serde(default)]
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) glyphs: Vec<Glyph>,
    #[serde(default)]
    pub(crate) masters: Vec<Master>,
    #[serde(skip)]
    pub(crate) undo: UndoStore<FontChange>,
}

impl Font {
    pub fn new(family_name: impl Into<String>, units_per_em: f64) -> Self {
        Self {
            family_name: family_name.into(),
            units_per_em,
            version: "1.0".to_string(),
            ..Default::default()
        }
    }

    pub fn with_master(mut self, master: Master) -> Self {
        self.masters.push(master);
        self
    }

    pub fn with_glyph(mut self, glyph: Glyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn masters(&self) -> &[Master] {
        &self.masters
    }

    /// First glyph named `name`
    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.name == name)
    }

    pub fn glyph_index(&self, name: &str) -> Option<usize> {
        self.glyphs.iter().position(|g| g.name == name)
    }

    /// Glyph for editing; its changes land in the glyph's own undo store
    pub fn glyph_mut(&mut self, index: usize) -> &mut Glyph {
        &mut self.glyphs[index]
    }

    pub fn glyph_by_name_mut(&mut self, name: &str) -> BezyResult<&mut Glyph> {
        let index = self.glyph_index(name).ok_or_else(|| glyph_not_found(name))?;
        Ok(&mut self.glyphs[index])
    }

    pub fn master(&self, name: &str) -> Option<&Master> {
        self.masters.iter().find(|m| m.name == name)
    }

    pub fn master_index(&self, name: &str) -> Option<usize> {
        self.masters.iter().position(|m| m.name == name)
    }

    /// The master a layer belongs to, if it names one that exists
    pub fn master_for_layer(&self, layer: &Layer) -> Option<&Master> {
        layer.master_name.as_deref().and_then(|name| self.master(name))
    }

    /// Layer guides followed by the guides of the layer's master
    pub fn all_guidelines<'a>(&'a self, layer: &'a Layer) -> Vec<&'a Guideline> {
        let mut guides: Vec<&Guideline> = layer.guidelines.iter().collect();
        if let Some(master) = self.master_for_layer(layer) {
            guides.extend(master.guidelines.iter());
        }
        guides
    }

    pub fn set_family_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.family_name {
            self.apply_change(FontChange::FamilyName(name));
        }
    }

    pub fn set_units_per_em(&mut self, units_per_em: f64) {
        if units_per_em != self.units_per_em {
            self.apply_change(FontChange::UnitsPerEm(units_per_em));
        }
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        if version != self.version {
            self.apply_change(FontChange::Version(version));
        }
    }

    pub fn add_glyph(&mut self, glyph: Glyph) -> usize {
        let index = self.glyphs.len();
        self.insert_glyph(index, glyph);
        index
    }

    pub fn insert_glyph(&mut self, index: usize, glyph: Glyph) {
        self.apply_change(FontChange::Glyphs(Splice::insert(index, glyph)));
    }

    pub fn remove_glyph(&mut self, index: usize) -> Glyph {
        let removed = self.glyphs[index].clone();
        self.apply_change(FontChange::Glyphs(Splice::remove(index)));
        removed
    }

    pub fn add_master(&mut self, master: Master) -> usize {
        let index = self.masters.len();
        self.apply_change(FontChange::Masters(Splice::insert(index, master)));
        index
    }

    pub fn remove_master(&mut self, index: usize) -> Master {
        let removed = self.masters[index].clone();
        self.apply_change(FontChange::Masters(Splice::remove(index)));
        removed
    }

    /// Mutation handle for one master; panics when out of range
    pub fn master_mut(&mut self, index: usize) -> MasterMut<'_> {
        assert!(
            index < self.masters.len(),
            "master index {} out of range ({} masters)",
            index,
            self.masters.len()
        );
        MasterMut::new(self, index)
    }

    /// Fail if any component of `glyph_name`, followed transitively,
    /// refers back to a glyph already on the chain
    pub fn validate_components(&self, glyph_name: &str) -> BezyResult<()> {
        let glyph = self.glyph(glyph_name).ok_or_else(|| glyph_not_found(glyph_name))?;
        for layer in &glyph.layers {
            let mut chain = vec![glyph.name.clone()];
            for component in &layer.components {
                self.component_paths(component, layer.master_name.as_deref(), &mut chain)?;
            }
        }
        Ok(())
    }

    /// The layer's own paths followed by its components' paths, decomposed
    /// and transformed into the layer's coordinates. Resolved copies carry
    /// no selection.
    pub fn resolved_paths(&self, glyph_index: usize, layer_index: usize) -> BezyResult<Vec<Path>> {
        let glyph = &self.glyphs[glyph_index];
        let layer = &glyph.layers[layer_index];
        let mut paths = layer.paths.clone();
        let mut chain = vec![glyph.name.clone()];
        for component in &layer.components {
            paths.extend(self.component_paths(component, layer.master_name.as_deref(), &mut chain)?);
        }
        Ok(paths)
    }

    /// Full outline of a layer, components included
    pub fn layer_outline(&self, glyph_index: usize, layer_index: usize) -> BezyResult<Vec<BezPath>> {
        Ok(self
            .resolved_paths(glyph_index, layer_index)?
            .iter()
            .map(Path::to_bezpath)
            .collect())
    }

    /// Bounds of the full outline, components included
    pub fn layer_bounds(&self, glyph_index: usize, layer_index: usize) -> BezyResult<Option<Rect>> {
        Ok(self
            .resolved_paths(glyph_index, layer_index)?
            .iter()
            .filter_map(Path::bounds)
            .reduce(|a, b| a.union(b)))
    }

    /// Paths a component contributes, with nested components resolved.
    ///
    /// `chain` holds the glyph names being resolved, outermost first.
    /// Missing base glyphs contribute nothing.
    pub(crate) fn component_paths(
        &self,
        component: &Component,
        master: Option<&str>,
        chain: &mut Vec<String>,
    ) -> BezyResult<Vec<Path>> {
        let name = component.glyph_name();
        if chain.iter().any(|n| n == name) {
            bail!("component cycle: {} -> {}", chain.join(" -> "), name);
        }
        let Some(base) = self.glyph(name) else {
            warn!("Component refers to missing glyph '{}'", name);
            return Ok(Vec::new());
        };
        let Some(layer) = base.layer_for_master(master) else {
            return Ok(Vec::new());
        };

        chain.push(name.to_string());
        let mut paths = Vec::new();
        for path in &layer.paths {
            paths.push(path.clone());
        }
        for nested in &layer.components {
            paths.extend(self.component_paths(nested, master, chain)?);
        }
        chain.pop();

        Ok(paths
            .iter()
            .map(|p| {
                let mut placed = p.transformed(component.transform);
                for point in &mut placed.points {
                    point.selected = false;
                }
                placed
            })
            .collect())
    }

    /// Run `f` on the glyph named `name`, as one undo step of that glyph
    pub fn edit_glyph<R>(&mut self, name: &str, f: impl FnOnce(&mut Glyph) -> R) -> BezyResult<R> {
        let glyph = self.glyph_by_name_mut(name)?;
        let mut group = glyph.undo_group();
        Ok(f(&mut group))
    }
}

impl UndoTarget for Font {
    type Change = FontChange;

    fn undo_store(&self) -> &UndoStore<FontChange> {
        &self.undo
    }

    fn undo_store_mut(&mut self) -> &mut UndoStore<FontChange> {
        &mut self.undo
    }
}

impl UndoScope for Font {
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

impl Font {
    /// True if the font or any glyph has unsaved edits
    pub fn has_unsaved_changes(&self) -> bool {
        self.is_modified() || self.glyphs.iter().any(|g| g.is_modified())
    }

    /// Forget all history, font and glyphs alike (after a save)
    pub fn clear_history(&mut self) -> BezyResult<()> {
        self.undo.clear()?;
        for glyph in &mut self.glyphs {
            glyph.undo.clear()?;
        }
        Ok(())
    }
}
