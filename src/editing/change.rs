//! Reversible change protocol
//!
//! Every mutation of the glyph and font model is a value implementing
//! [`Change`]. Applying a change swaps the stored value with the target's
//! field, so the change turns into its own inverse: applying it twice is a
//! no-op pair.

/// Classification shared by every change
pub trait ChangeKind {
    /// True if the change must not count toward the dirty counter
    fn is_shallow(&self) -> bool;

    /// True if applying the change toggles selection state
    fn affects_selection(&self) -> bool;
}

/// A self-inverting mutation of `T`
pub trait Change<T>: ChangeKind {
    /// Apply to `target`; afterwards `self` holds the inverse change.
    fn apply(&mut self, target: &mut T);
}

/// An ordered batch of changes treated as one undo step
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeGroup<C> {
    changes: Vec<C>,
}

impl<C> Default for ChangeGroup<C> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<C> ChangeGroup<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: C) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.changes.iter()
    }
}

impl<C> FromIterator<C> for ChangeGroup<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl<C: ChangeKind> ChangeKind for ChangeGroup<C> {
    /// An empty group is shallow
    fn is_shallow(&self) -> bool {
        self.changes.iter().all(ChangeKind::is_shallow)
    }

    fn affects_selection(&self) -> bool {
        self.changes.iter().any(ChangeKind::affects_selection)
    }
}

impl<T, C: Change<T>> Change<T> for ChangeGroup<C> {
    /// Children are applied last-to-first, then the list is reversed so the
    /// next application replays the inverse batch in the right order.
    fn apply(&mut self, target: &mut T) {
        for change in self.changes.iter_mut().rev() {
            change.apply(target);
        }
        self.changes.reverse();
    }
}

/// Replace `remove` items at `index` with `insert`.
///
/// This one shape covers insert, remove, remove-range, replace-at and reset
/// of an ordered collection. Applying it leaves the removed items in
/// `insert` and their count in `remove`, which is exactly the inverse
/// splice. Indices past the end panic like slice indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct Splice<T> {
    index: usize,
    remove: usize,
    insert: Vec<T>,
}

impl<T> Splice<T> {
    pub fn new(index: usize, remove: usize, insert: Vec<T>) -> Self {
        Self {
            index,
            remove,
            insert,
        }
    }

    pub fn insert(index: usize, item: T) -> Self {
        Self::new(index, 0, vec![item])
    }

    pub fn insert_many(index: usize, items: Vec<T>) -> Self {
        Self::new(index, 0, items)
    }

    pub fn remove(index: usize) -> Self {
        Self::new(index, 1, Vec::new())
    }

    pub fn remove_range(index: usize, count: usize) -> Self {
        Self::new(index, count, Vec::new())
    }

    pub fn replace(index: usize, item: T) -> Self {
        Self::new(index, 1, vec![item])
    }

    /// Replace the whole collection of length `current_len`
    pub fn reset(current_len: usize, items: Vec<T>) -> Self {
        Self::new(0, current_len, items)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn remove_count(&self) -> usize {
        self.remove
    }

    pub fn items(&self) -> &[T] {
        &self.insert
    }

    pub fn is_noop(&self) -> bool {
        self.remove == 0 && self.insert.is_empty()
    }

    pub fn apply_to(&mut self, list: &mut Vec<T>) {
        let insert = std::mem::take(&mut self.insert);
        let inserted = insert.len();
        let end = self.index + self.remove;
        let removed: Vec<T> = list.splice(self.index..end, insert).collect();
        self.remove = inserted;
        self.insert = removed;
    }
}
