use std::collections::HashSet;

use quadcanvas_core::ObjectId;

/// Tracks which objects are selected.
///
/// `SelectionManager` is responsible for:
/// - The set of selected ids
/// - The "primary" selection (the object most recently selected)
/// - Single versus multi-select replacement rules
///
/// # Selection Model
///
/// - **Primary Selection**: the most recently selected id, used as the anchor
///   for property panels and keyboard nudges
/// - **Multiple Selection**: any number of ids may be selected at once
/// - **Multi-select**: when `multi` is `false`, selecting replaces the whole
///   selection; when `true`, it adds to it
///
/// # Design
///
/// The manager only stores ids. It never checks whether an id exists: the
/// repository validates ids before forwarding and calls [`forget`] when an
/// object is removed so the set never names a dead object.
///
/// [`forget`]: SelectionManager::forget
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    /// Every selected id
    selected: HashSet<ObjectId>,
    /// Selected ids, oldest selection first; the last one is primary
    recency: Vec<ObjectId>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadcanvas_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert_eq!(manager.selected_id(), None);
    /// assert_eq!(manager.selected_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID of the primary selected object.
    pub fn selected_id(&self) -> Option<ObjectId> {
        self.recency.last().copied()
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected.contains(&id)
    }

    /// Returns the number of selected objects.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Iterates the selected ids, least recently selected first.
    pub fn selected_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.recency.iter().copied()
    }

    /// Selects `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - The id to select; the caller guarantees it exists
    /// * `multi` - If `true`, adds to the existing selection; if `false`,
    ///   replaces it
    pub fn select(&mut self, id: ObjectId, multi: bool) {
        if !multi {
            self.deselect_all();
        }
        self.mark(id);
    }

    /// Selects every id in `ids`.
    ///
    /// With `multi` set to `false` the previous selection is replaced even
    /// when `ids` is empty. The last id becomes the primary selection.
    pub fn select_many(&mut self, ids: impl IntoIterator<Item = ObjectId>, multi: bool) {
        if !multi {
            self.deselect_all();
        }
        for id in ids {
            self.mark(id);
        }
    }

    /// Flips the selection state of `id` without touching other ids
    /// (Shift+click behavior).
    pub fn toggle(&mut self, id: ObjectId) -> bool {
        if self.deselect(id) {
            false
        } else {
            self.mark(id);
            true
        }
    }

    /// Removes `id` from the selection. The primary selection falls back to
    /// the most recently selected id that remains.
    pub fn deselect(&mut self, id: ObjectId) -> bool {
        let removed = self.selected.remove(&id);
        if removed {
            self.recency.retain(|&r| r != id);
        }
        removed
    }

    /// Drops `id` after its object was removed from the canvas.
    pub fn forget(&mut self, id: ObjectId) {
        self.deselect(id);
    }

    /// Deselects everything and clears the primary selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
        self.recency.clear();
    }

    fn mark(&mut self, id: ObjectId) {
        if !self.selected.insert(id) {
            self.recency.retain(|&r| r != id);
        }
        self.recency.push(id);
    }
}
