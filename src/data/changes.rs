//! Concrete changes for the glyph and font model
//!
//! One variant per settable field and one splice per ordered collection.
//! Targets are addressed by index path (layer, path, point); that is sound
//! because changes are always undone in exact reverse order, so every index
//! is valid again at the moment its change is re-applied.

use super::anchor::Anchor;
use super::component::Component;
use super::font::Font;
use super::glyph::Glyph;
use super::guideline::Guideline;
use super::layer::Layer;
use super::master::{AlignmentZone, Master};
use super::path::Path;
use super::point::{EditPoint, PointType};
use crate::editing::change::{Change, ChangeKind, Splice};
use kurbo::{Affine, Point};
use std::collections::BTreeMap;
use std::mem::swap;

/// Swap both coordinates with `position` as one field
fn swap_position(x: &mut f64, y: &mut f64, position: &mut Point) {
    swap(x, &mut position.x);
    swap(y, &mut position.y);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointField {
    X(f64),
    Y(f64),
    Position(Point),
    Type(PointType),
    Smooth(bool),
    Selected(bool),
}

impl PointField {
    fn swap(&mut self, point: &mut EditPoint) {
        match self {
            PointField::X(v) => swap(&mut point.x, v),
            PointField::Y(v) => swap(&mut point.y, v),
            PointField::Position(v) => swap_position(&mut point.x, &mut point.y, v),
            PointField::Type(v) => swap(&mut point.point_type, v),
            PointField::Smooth(v) => swap(&mut point.smooth, v),
            PointField::Selected(v) => swap(&mut point.selected, v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerField {
    Name(String),
    MasterName(Option<String>),
    Width(f64),
    VerticalOrigin(Option<f64>),
}

impl LayerField {
    fn swap(&mut self, layer: &mut Layer) {
        match self {
            LayerField::Name(v) => swap(&mut layer.name, v),
            LayerField::MasterName(v) => swap(&mut layer.master_name, v),
            LayerField::Width(v) => swap(&mut layer.width, v),
            LayerField::VerticalOrigin(v) => swap(&mut layer.vertical_origin, v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentField {
    GlyphName(String),
    Transform(Affine),
    Selected(bool),
}

impl ComponentField {
    fn swap(&mut self, component: &mut Component) {
        match self {
            ComponentField::GlyphName(v) => swap(&mut component.glyph_name, v),
            ComponentField::Transform(v) => swap(&mut component.transform, v),
            ComponentField::Selected(v) => swap(&mut component.selected, v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorField {
    Name(String),
    X(f64),
    Y(f64),
    Position(Point),
    Selected(bool),
}

impl AnchorField {
    fn swap(&mut self, anchor: &mut Anchor) {
        match self {
            AnchorField::Name(v) => swap(&mut anchor.name, v),
            AnchorField::X(v) => swap(&mut anchor.x, v),
            AnchorField::Y(v) => swap(&mut anchor.y, v),
            AnchorField::Position(v) => swap_position(&mut anchor.x, &mut anchor.y, v),
            AnchorField::Selected(v) => swap(&mut anchor.selected, v),
        }
    }
}

/// Guideline fields; shared by layer guides and master guides
#[derive(Debug, Clone, PartialEq)]
pub enum GuidelineField {
    X(f64),
    Y(f64),
    Position(Point),
    Angle(f64),
    Name(Option<String>),
    Selected(bool),
}

impl GuidelineField {
    fn swap(&mut self, guideline: &mut Guideline) {
        match self {
            GuidelineField::X(v) => swap(&mut guideline.x, v),
            GuidelineField::Y(v) => swap(&mut guideline.y, v),
            GuidelineField::Position(v) => swap_position(&mut guideline.x, &mut guideline.y, v),
            GuidelineField::Angle(v) => swap(&mut guideline.angle, v),
            GuidelineField::Name(v) => swap(&mut guideline.name, v),
            GuidelineField::Selected(v) => swap(&mut guideline.selected, v),
        }
    }

    fn is_selection(&self) -> bool {
        matches!(self, GuidelineField::Selected(_))
    }
}

/// Every mutation of a glyph and what it owns
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphChange {
    Name(String),
    Unicodes(Splice<u32>),
    Layers(Splice<Layer>),
    Layer {
        layer: usize,
        field: LayerField,
    },
    Paths {
        layer: usize,
        splice: Splice<Path>,
    },
    Points {
        layer: usize,
        path: usize,
        splice: Splice<EditPoint>,
    },
    Point {
        layer: usize,
        path: usize,
        point: usize,
        field: PointField,
    },
    Components {
        layer: usize,
        splice: Splice<Component>,
    },
    Component {
        layer: usize,
        index: usize,
        field: ComponentField,
    },
    Anchors {
        layer: usize,
        splice: Splice<Anchor>,
    },
    Anchor {
        layer: usize,
        index: usize,
        field: AnchorField,
    },
    Guidelines {
        layer: usize,
        splice: Splice<Guideline>,
    },
    Guideline {
        layer: usize,
        index: usize,
        field: GuidelineField,
    },
}

impl ChangeKind for GlyphChange {
    fn is_shallow(&self) -> bool {
        self.affects_selection()
    }

    fn affects_selection(&self) -> bool {
        match self {
            GlyphChange::Point { field, .. } => matches!(field, PointField::Selected(_)),
            GlyphChange::Component { field, .. } => matches!(field, ComponentField::Selected(_)),
            GlyphChange::Anchor { field, .. } => matches!(field, AnchorField::Selected(_)),
            GlyphChange::Guideline { field, .. } => field.is_selection(),
            _ => false,
        }
    }
}

impl Change<Glyph> for GlyphChange {
    fn apply(&mut self, glyph: &mut Glyph) {
        match self {
            GlyphChange::Name(name) => swap(&mut glyph.name, name),
            GlyphChange::Unicodes(splice) => splice.apply_to(&mut glyph.unicodes),
            GlyphChange::Layers(splice) => splice.apply_to(&mut glyph.layers),
            GlyphChange::Layer { layer, field } => field.swap(&mut glyph.layers[*layer]),
            GlyphChange::Paths { layer, splice } => splice.apply_to(&mut glyph.layers[*layer].paths),
            GlyphChange::Points {
                layer,
                path,
                splice,
            } => splice.apply_to(&mut glyph.layers[*layer].paths[*path].points),
            GlyphChange::Point {
                layer,
                path,
                point,
                field,
            } => field.swap(&mut glyph.layers[*layer].paths[*path].points[*point]),
            GlyphChange::Components { layer, splice } => {
                splice.apply_to(&mut glyph.layers[*layer].components)
            }
            GlyphChange::Component {
                layer,
                index,
                field,
            } => field.swap(&mut glyph.layers[*layer].components[*index]),
            GlyphChange::Anchors { layer, splice } => splice.apply_to(&mut glyph.layers[*layer].anchors),
            GlyphChange::Anchor {
                layer,
                index,
                field,
            } => field.swap(&mut glyph.layers[*layer].anchors[*index]),
            GlyphChange::Guidelines { layer, splice } => {
                splice.apply_to(&mut glyph.layers[*layer].guidelines)
            }
            GlyphChange::Guideline {
                layer,
                index,
                field,
            } => field.swap(&mut glyph.layers[*layer].guidelines[*index]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MasterField {
    Name(String),
    Location(BTreeMap<String, f64>),
    Ascender(f64),
    Descender(f64),
    CapHeight(f64),
    XHeight(f64),
}

impl MasterField {
    fn swap(&mut self, master: &mut Master) {
        match self {
            MasterField::Name(v) => swap(&mut master.name, v),
            MasterField::Location(v) => swap(&mut master.location, v),
            MasterField::Ascender(v) => swap(&mut master.ascender, v),
            MasterField::Descender(v) => swap(&mut master.descender, v),
            MasterField::CapHeight(v) => swap(&mut master.cap_height, v),
            MasterField::XHeight(v) => swap(&mut master.x_height, v),
        }
    }
}

/// Mutations of font-level state; glyph contents have their own stores
#[derive(Debug, Clone, PartialEq)]
pub enum FontChange {
    FamilyName(String),
    UnitsPerEm(f64),
    Version(String),
    Glyphs(Splice<Glyph>),
    Masters(Splice<Master>),
    Master {
        master: usize,
        field: MasterField,
    },
    AlignmentZones {
        master: usize,
        splice: Splice<AlignmentZone>,
    },
    MasterGuidelines {
        master: usize,
        splice: Splice<Guideline>,
    },
    MasterGuideline {
        master: usize,
        index: usize,
        field: GuidelineField,
    },
}

impl ChangeKind for FontChange {
    fn is_shallow(&self) -> bool {
        self.affects_selection()
    }

    fn affects_selection(&self) -> bool {
        matches!(self, FontChange::MasterGuideline { field, .. } if field.is_selection())
    }
}

impl Change<Font> for FontChange {
    fn apply(&mut self, font: &mut Font) {
        match self {
            FontChange::FamilyName(v) => swap(&mut font.family_name, v),
            FontChange::UnitsPerEm(v) => swap(&mut font.units_per_em, v),
            FontChange::Version(v) => swap(&mut font.version, v),
            FontChange::Glyphs(splice) => splice.apply_to(&mut font.glyphs),
            FontChange::Masters(splice) => splice.apply_to(&mut font.masters),
            FontChange::Master { master, field } => field.swap(&mut font.masters[*master]),
            FontChange::AlignmentZones { master, splice } => {
                splice.apply_to(&mut font.masters[*master].alignment_zones)
            }
            FontChange::MasterGuidelines { master, splice } => {
                splice.apply_to(&mut font.masters[*master].guidelines)
            }
            FontChange::MasterGuideline {
                master,
                index,
                field,
            } => field.swap(&mut font.masters[*master].guidelines[*index]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::path::test_paths::square;

    fn glyph() -> Glyph {
        Glyph::new("a").with_layer(Layer::new("public.default").with_width(500.0).with_path(square(100.0)))
    }

    #[test]
    fn test_every_point_field_is_an_involution() {
        let original = glyph();
        let fields = [
            PointField::X(42.0),
            PointField::Y(-7.5),
            PointField::Type(PointType::Curve),
            PointField::Smooth(true),
            PointField::Selected(true),
        ];
        for field in fields {
            let mut g = original.clone();
            let mut change = GlyphChange::Point {
                layer: 0,
                path: 0,
                point: 1,
                field,
            };
            change.apply(&mut g);
            assert_ne!(g.layers(), original.layers());
            change.apply(&mut g);
            assert_eq!(g.layers(), original.layers());
        }
    }

    #[test]
    fn test_structural_changes_are_involutions() {
        let original = glyph();
        let changes = vec![
            GlyphChange::Name("b".into()),
            GlyphChange::Unicodes(Splice::insert(0, 0x61)),
            GlyphChange::Layers(Splice::insert(1, Layer::new("bold"))),
            GlyphChange::Layer {
                layer: 0,
                field: LayerField::Width(10.0),
            },
            GlyphChange::Paths {
                layer: 0,
                splice: Splice::remove(0),
            },
            GlyphChange::Points {
                layer: 0,
                path: 0,
                splice: Splice::remove_range(1, 2),
            },
            GlyphChange::Anchors {
                layer: 0,
                splice: Splice::insert(0, Anchor::new("top", 1.0, 2.0)),
            },
            GlyphChange::Components {
                layer: 0,
                splice: Splice::insert(0, Component::new("b", Affine::IDENTITY)),
            },
            GlyphChange::Guidelines {
                layer: 0,
                splice: Splice::insert(0, Guideline::horizontal(20.0)),
            },
        ];
        for mut change in changes {
            let mut g = original.clone();
            change.apply(&mut g);
            assert!(g.name() != original.name()
                || g.unicodes() != original.unicodes()
                || g.layers() != original.layers());
            change.apply(&mut g);
            assert_eq!(g.name(), original.name());
            assert_eq!(g.unicodes(), original.unicodes());
            assert_eq!(g.layers(), original.layers());
        }
    }

    #[test]
    fn test_selection_changes_are_shallow() {
        let selected = GlyphChange::Point {
            layer: 0,
            path: 0,
            point: 0,
            field: PointField::Selected(true),
        };
        assert!(selected.is_shallow());
        assert!(selected.affects_selection());
        let moved = GlyphChange::Point {
            layer: 0,
            path: 0,
            point: 0,
            field: PointField::X(1.0),
        };
        assert!(!moved.is_shallow());
        assert!(!GlyphChange::Name("x".into()).is_shallow());
    }

    #[test]
    fn test_font_changes_are_involutions() {
        let original = Font::new("Test", 1000.0).with_master(Master::new("Regular", 1000.0));
        let changes = vec![
            FontChange::FamilyName("Other".into()),
            FontChange::UnitsPerEm(2048.0),
            FontChange::Master {
                master: 0,
                field: MasterField::XHeight(480.0),
            },
            FontChange::AlignmentZones {
                master: 0,
                splice: Splice::insert(0, AlignmentZone::new(0.0, -12.0)),
            },
            FontChange::MasterGuidelines {
                master: 0,
                splice: Splice::insert(0, Guideline::vertical(10.0)),
            },
            FontChange::Glyphs(Splice::insert(0, Glyph::new("a"))),
        ];
        for mut change in changes {
            let mut font = original.clone();
            change.apply(&mut font);
            change.apply(&mut font);
            assert_eq!(font.family_name(), original.family_name());
            assert_eq!(font.units_per_em(), original.units_per_em());
            assert_eq!(font.masters(), original.masters());
            assert_eq!(font.glyphs().len(), original.glyphs().len());
        }
    }
}
