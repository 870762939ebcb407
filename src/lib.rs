//! Bezy core: the glyph data model, undo system and outline geometry engine
//! of the Bezy font editor.
pub mod core;
pub mod data;
pub mod editing;
pub mod geometry;
pub mod logging;
