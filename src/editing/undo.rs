//! Undo/redo store with grouping
//!
//! Each glyph (and the font itself) owns one [`UndoStore`]. Edits push
//! self-inverting changes onto it; undo pops and re-applies them, which turns
//! them back into forward changes for redo.
//!
//! Only non-shallow entries are counted. One undo step undoes exactly one
//! non-shallow entry plus any shallow (selection-only) entries stacked on top
//! of it.

use super::change::{Change, ChangeGroup, ChangeKind};
use crate::core::errors::{ensure, BezyResult};
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

/// One committed undo step
#[derive(Debug, Clone, PartialEq)]
pub enum UndoEntry<C> {
    Single(C),
    Group(ChangeGroup<C>),
}

impl<C: ChangeKind> ChangeKind for UndoEntry<C> {
    fn is_shallow(&self) -> bool {
        match self {
            UndoEntry::Single(change) => change.is_shallow(),
            UndoEntry::Group(group) => group.is_shallow(),
        }
    }

    fn affects_selection(&self) -> bool {
        match self {
            UndoEntry::Single(change) => change.affects_selection(),
            UndoEntry::Group(group) => group.affects_selection(),
        }
    }
}

impl<T, C: Change<T>> Change<T> for UndoEntry<C> {
    fn apply(&mut self, target: &mut T) {
        match self {
            UndoEntry::Single(change) => change.apply(target),
            UndoEntry::Group(group) => group.apply(target),
        }
    }
}

/// Undo and redo stacks for one owner
#[derive(Debug, Clone)]
pub struct UndoStore<C> {
    undo_stack: Vec<UndoEntry<C>>,
    redo_stack: Vec<UndoEntry<C>>,
    undo_count: usize,
    redo_count: usize,
    group: Option<ChangeGroup<C>>,
    group_depth: usize,
    enabled: bool,
}

impl<C> Default for UndoStore<C> {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_count: 0,
            redo_count: 0,
            group: None,
            group_depth: 0,
            enabled: true,
        }
    }
}

impl<C: ChangeKind> UndoStore<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change that has already been applied.
    ///
    /// Inside an open group the change joins the group. Otherwise it is
    /// pushed as its own step; non-shallow changes invalidate redo.
    pub fn process_change(&mut self, change: C) {
        if !self.enabled {
            return;
        }
        match self.group.as_mut() {
            Some(group) => group.push(change),
            None => self.push_entry(UndoEntry::Single(change)),
        }
    }

    fn push_entry(&mut self, entry: UndoEntry<C>) {
        if !entry.is_shallow() {
            self.undo_count += 1;
            self.redo_stack.clear();
            self.redo_count = 0;
        }
        self.undo_stack.push(entry);
    }

    /// Open a group, or deepen the one already open. Returns the new depth.
    pub fn begin_group(&mut self) -> usize {
        if self.group.is_none() {
            self.group = Some(ChangeGroup::new());
        }
        self.group_depth += 1;
        self.group_depth
    }

    /// Close one level of grouping; the outermost close commits the group
    /// as a single undo step (empty groups are dropped).
    pub fn end_group(&mut self) {
        if self.group_depth == 0 {
            warn!("end_group called without an open undo group");
            return;
        }
        self.group_depth -= 1;
        if self.group_depth > 0 {
            return;
        }
        if let Some(group) = self.group.take() {
            if !group.is_empty() {
                debug!(
                    "Committing undo group with {} changes (shallow: {})",
                    group.len(),
                    group.is_shallow()
                );
                self.push_entry(UndoEntry::Group(group));
            }
        }
    }

    /// Swap out the open group's accumulated changes, keeping it open
    fn take_group_changes(&mut self) -> Option<ChangeGroup<C>> {
        self.group.as_mut().map(std::mem::take)
    }

    pub fn is_group_open(&self) -> bool {
        self.group.is_some()
    }

    pub fn group_depth(&self) -> usize {
        self.group_depth
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True if there are unsaved non-shallow edits, counting an open group
    pub fn is_dirty(&self) -> bool {
        self.undo_count > 0 || self.group.as_ref().is_some_and(|g| !g.is_shallow())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_count > 0 && self.group.is_none()
    }

    pub fn can_redo(&self) -> bool {
        self.redo_count > 0 && self.group.is_none()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_count
    }

    pub fn redo_count(&self) -> usize {
        self.redo_count
    }

    /// Drop all history
    pub fn clear(&mut self) -> BezyResult<()> {
        ensure!(
            self.group.is_none(),
            "cannot clear undo history while an undo group is open"
        );
        ensure!(
            self.enabled,
            "cannot clear undo history while undo or redo is running"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_count = 0;
        self.redo_count = 0;
        Ok(())
    }
}

/// Something that owns an undo store and can have its changes applied to it
pub trait UndoTarget: Sized {
    type Change: Change<Self>;

    fn undo_store(&self) -> &UndoStore<Self::Change>;

    fn undo_store_mut(&mut self) -> &mut UndoStore<Self::Change>;

    /// Apply a change and record it
    fn apply_change(&mut self, mut change: Self::Change) {
        change.apply(self);
        self.undo_store_mut().process_change(change);
    }

    /// Undo the most recent non-shallow step along with the shallow entries
    /// stacked above it.
    fn undo(&mut self) -> BezyResult<()> {
        let store = self.undo_store();
        ensure!(
            store.group.is_none(),
            "cannot undo while an undo group is open"
        );
        ensure!(store.undo_count > 0, "nothing to undo");

        self.undo_store_mut().enabled = false;
        while let Some(mut entry) = self.undo_store_mut().undo_stack.pop() {
            entry.apply(self);
            let deep = !entry.is_shallow();
            let store = self.undo_store_mut();
            store.redo_stack.push(entry);
            if deep {
                store.undo_count -= 1;
                store.redo_count += 1;
                break;
            }
        }
        self.undo_store_mut().enabled = true;
        debug!("Undo applied, {} steps left", self.undo_store().undo_count);
        Ok(())
    }

    /// Redo the next non-shallow step along with the shallow entries that
    /// were undone together with it.
    fn redo(&mut self) -> BezyResult<()> {
        let store = self.undo_store();
        ensure!(
            store.group.is_none(),
            "cannot redo while an undo group is open"
        );
        ensure!(store.redo_count > 0, "nothing to redo");

        self.undo_store_mut().enabled = false;
        let mut found_deep = false;
        loop {
            let store = self.undo_store_mut();
            let next_is_deep = match store.redo_stack.last() {
                Some(entry) => !entry.is_shallow(),
                None => break,
            };
            if found_deep && next_is_deep {
                break;
            }
            let Some(mut entry) = store.redo_stack.pop() else {
                break;
            };
            entry.apply(self);
            let store = self.undo_store_mut();
            store.undo_stack.push(entry);
            if next_is_deep {
                found_deep = true;
                store.redo_count -= 1;
                store.undo_count += 1;
            }
        }
        self.undo_store_mut().enabled = true;
        debug!("Redo applied, {} steps left", self.undo_store().redo_count);
        Ok(())
    }

    /// Roll back everything recorded in the open group without closing it
    fn reset_open_group(&mut self) {
        if let Some(mut changes) = self.undo_store_mut().take_group_changes() {
            if changes.is_empty() {
                return;
            }
            debug!("Resetting undo group ({} changes)", changes.len());
            self.undo_store_mut().enabled = false;
            changes.apply(self);
            self.undo_store_mut().enabled = true;
        }
    }

    fn is_modified(&self) -> bool {
        self.undo_store().is_dirty()
    }
}

/// Anything an undo group can be opened on: the store owners themselves and
/// the mutation handles that forward to them.
pub trait UndoScope {
    fn begin_undo_group(&mut self) -> usize;

    fn end_undo_group(&mut self);

    fn reset_undo_group(&mut self);

    /// Open a group that commits when the returned guard drops.
    ///
    /// Opening a group while one is already open yields a nested guard;
    /// only the outermost guard commits.
    fn undo_group(&mut self) -> UndoGroup<'_, Self>
    where
        Self: Sized,
    {
        let depth = self.begin_undo_group();
        UndoGroup {
            target: self,
            depth,
        }
    }
}

/// Scope guard for an open undo group.
///
/// Dereferences to the scoped value so edits go through it. Dropping the
/// guard closes the group on every exit path, including panics and early
/// returns.
pub struct UndoGroup<'a, T: UndoScope> {
    target: &'a mut T,
    depth: usize,
}

impl<T: UndoScope> UndoGroup<'_, T> {
    /// Nesting depth of this guard, 1 for the outermost
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Undo everything recorded in the group so far and start over empty.
    ///
    /// Used by drags: each pointer move resets and re-applies the full delta.
    pub fn reset(&mut self) {
        self.target.reset_undo_group();
    }

    /// Abandon the group, restoring the state from before it was opened
    pub fn cancel(mut self) {
        self.reset();
    }
}

impl<T: UndoScope> Deref for UndoGroup<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: UndoScope> DerefMut for UndoGroup<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: UndoScope> Drop for UndoGroup<'_, T> {
    fn drop(&mut self) {
        self.target.end_undo_group();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Edit {
        Value(i32),
        Selected(bool),
    }

    impl ChangeKind for Edit {
        fn is_shallow(&self) -> bool {
            matches!(self, Edit::Selected(_))
        }
        fn affects_selection(&self) -> bool {
            self.is_shallow()
        }
    }

    #[derive(Debug, Default)]
    struct Doc {
        value: i32,
        selected: bool,
        undo: UndoStore<Edit>,
    }

    impl Change<Doc> for Edit {
        fn apply(&mut self, doc: &mut Doc) {
            match self {
                Edit::Value(v) => std::mem::swap(&mut doc.value, v),
                Edit::Selected(s) => std::mem::swap(&mut doc.selected, s),
            }
        }
    }

    impl UndoTarget for Doc {
        type Change = Edit;
        fn undo_store(&self) -> &UndoStore<Edit> {
            &self.undo
        }
        fn undo_store_mut(&mut self) -> &mut UndoStore<Edit> {
            &mut self.undo
        }
    }

    impl UndoScope for Doc {
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

    #[test]
    fn test_undo_redo_single_edit() {
        let mut doc = Doc::default();
        doc.apply_change(Edit::Value(3));
        assert!(doc.is_modified());
        doc.undo().unwrap();
        assert_eq!(doc.value, 0);
        assert!(!doc.is_modified());
        doc.redo().unwrap();
        assert_eq!(doc.value, 3);
    }

    #[test]
    fn test_undo_takes_trailing_selection_changes() {
        let mut doc = Doc::default();
        doc.apply_change(Edit::Value(3));
        doc.apply_change(Edit::Selected(true));
        doc.undo().unwrap();
        assert_eq!(doc.value, 0);
        assert!(!doc.selected);
        doc.redo().unwrap();
        assert_eq!(doc.value, 3);
        assert!(doc.selected);
    }

    #[test]
    fn test_undo_with_nothing_fails() {
        let mut doc = Doc::default();
        assert!(doc.undo().is_err());
        doc.apply_change(Edit::Selected(true));
        // Selection alone isn't an undoable edit
        assert!(doc.undo().is_err());
        assert!(doc.redo().is_err());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut doc = Doc::default();
        doc.apply_change(Edit::Value(1));
        doc.undo().unwrap();
        assert!(doc.undo_store().can_redo());
        doc.apply_change(Edit::Value(2));
        assert!(!doc.undo_store().can_redo());
    }

    #[test]
    fn test_group_commits_once() {
        let mut doc = Doc::default();
        {
            let mut group = doc.undo_group();
            group.apply_change(Edit::Value(1));
            {
                let mut inner = group.undo_group();
                assert_eq!(inner.depth(), 2);
                inner.apply_change(Edit::Value(2));
            }
            assert!(group.undo_store().is_group_open());
            assert!(!group.undo_store().can_undo());
            assert!(group.undo().is_err());
            group.apply_change(Edit::Value(5));
        }
        assert_eq!(doc.undo_store().undo_count(), 1);
        doc.undo().unwrap();
        assert_eq!(doc.value, 0);
        doc.redo().unwrap();
        assert_eq!(doc.value, 5);
    }

    #[test]
    fn test_shallow_group_is_not_dirty() {
        let mut doc = Doc::default();
        {
            let mut group = doc.undo_group();
            group.apply_change(Edit::Selected(true));
            assert!(!group.is_modified());
        }
        assert!(!doc.is_modified());

        {
            let mut group = doc.undo_group();
            group.apply_change(Edit::Selected(false));
            group.apply_change(Edit::Value(7));
            assert!(group.is_modified());
        }
        assert!(doc.is_modified());
        assert_eq!(doc.undo_store().undo_count(), 1);
    }

    #[test]
    fn test_group_reset_and_cancel() {
        let mut doc = Doc::default();
        {
            let mut group = doc.undo_group();
            group.apply_change(Edit::Value(5));
            group.reset();
            assert_eq!(group.value, 0);
            group.apply_change(Edit::Value(3));
        }
        assert_eq!(doc.value, 3);
        doc.undo().unwrap();
        assert_eq!(doc.value, 0);

        let group = {
            let mut group = doc.undo_group();
            group.apply_change(Edit::Value(9));
            group
        };
        group.cancel();
        assert_eq!(doc.value, 0);
        assert!(!doc.undo_store().is_group_open());
    }

    #[test]
    fn test_clear_rules() {
        let mut doc = Doc::default();
        doc.apply_change(Edit::Value(1));
        {
            let mut group = doc.undo_group();
            assert!(group.undo_store_mut().clear().is_err());
        }
        doc.undo_store_mut().clear().unwrap();
        assert!(!doc.is_modified());
        assert!(!doc.undo_store().can_undo());
    }
}
