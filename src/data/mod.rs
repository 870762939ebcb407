//! Data Model
//!
//! The font/glyph/layer/path/point tree, the changes that mutate it and the
//! handles that issue those changes:
//! - Entities own their children; parents are addressed by index
//! - Every mutation is a recorded, self-inverting change
//! - UFO conversion through norad

pub mod anchor;
pub mod changes;
pub mod component;
pub mod conversions;
pub mod font;
pub mod glyph;
pub mod guideline;
pub mod handles;
pub mod layer;
pub mod master;
pub mod path;
pub mod point;
pub mod selection;

// Re-export commonly used items
pub use anchor::Anchor;
pub use component::Component;
pub use font::Font;
pub use glyph::Glyph;
pub use guideline::Guideline;
pub use handles::{AnchorMut, ComponentMut, GuidelineMut, LayerMut, MasterMut, PathMut, PointMut};
pub use layer::Layer;
pub use master::{AlignmentZone, Master};
pub use path::{Path, Segment, SegmentKind};
pub use point::{EditPoint, PointType};
pub use selection::{hit_test, PointId, SelectableItem, Selection};
