//! Selection of entries for bulk operations.

use std::collections::HashSet;

use crate::model::EntryId;

/// Set of selected entry ids.
///
/// Every mutation takes the current filtered id set so the selection
/// stays a subset of it; ids outside the filtered set are never
/// admitted.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<EntryId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order, for stable iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntryId> {
        let mut ids: Vec<EntryId> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Flip the selection state of `id`. Ignored when the id is not
    /// part of the filtered set.
    pub fn toggle(&mut self, id: EntryId, filtered: &[EntryId]) {
        if !filtered.contains(&id) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Select every filtered id (`on`) or clear the selection (`!on`).
    /// Covers the whole filtered set, not just the visible page.
    pub fn select_all(&mut self, on: bool, filtered: &[EntryId]) {
        if on {
            self.selected = filtered.iter().copied().collect();
        } else {
            self.selected.clear();
        }
    }

    /// True when every filtered id is selected (and the set is
    /// non-empty).
    #[must_use]
    pub fn is_all_selected(&self, filtered: &[EntryId]) -> bool {
        !filtered.is_empty() && filtered.iter().all(|id| self.selected.contains(id))
    }

    /// Drop ids that left the filtered set, keeping the subset
    /// invariant after the underlying data changed.
    pub fn prune(&mut self, filtered: &[EntryId]) {
        self.selected.retain(|id| filtered.contains(id));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
