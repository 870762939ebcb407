//! Geometric Primitives and Operations

pub mod bezier;
pub mod curve_fit;
pub mod hobby;
pub mod intersect;
pub mod utilities;
pub mod vector;

// Re-export commonly used items
pub use utilities::{axis_lock_position, round_point_to_grid, round_to_grid};
pub use vector::EPSILON;
