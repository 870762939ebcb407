//! Editing Functionality
//!
//! This module contains the editing engine:
//! - Reversible changes and the undo/redo store
//! - Selection movement with smooth-point constraints
//! - Structural path edits, slicing and boolean operations
//! - Snapping

pub mod boolean;
pub mod change;
pub mod knife;
pub mod movement;
pub mod path_ops;
pub mod smooth_curves;
pub mod snapping;
pub mod undo;

// Re-export commonly used items
pub use boolean::{combine, has_overlaps, remove_overlaps, BooleanOp};
pub use change::{Change, ChangeGroup, ChangeKind, Splice};
pub use knife::{slice, slice_axis_locked};
pub use movement::{move_selection, nudge_selection, MoveMode, MovementResult};
pub use path_ops::{break_path, delete_selection, try_join_points};
pub use smooth_curves::try_toggle_smooth;
pub use snapping::{find_snap, snap_position, Snap, SnapTarget};
pub use undo::{UndoGroup, UndoScope, UndoStore, UndoTarget};
