//! Object repository: the source of truth for what is on the canvas.

use quadcanvas_core::{Bounds, CanvasObject, IndexError, ObjectId, Point, RepositoryError};

use crate::selection_manager::SelectionManager;
use crate::shape_store::ShapeStore;
use crate::spatial_index::{SpatialIndex, SpatialIndexStats};

/// Where a removed object sat, so it can be put back exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedSlot {
    /// Position in paint order, bottom first
    pub position: usize,
    order: Option<u64>,
}

/// Id-keyed object collection with paint order, selection and a spatial index.
///
/// The repository is the only owner of its [`SpatialIndex`]. The index is a
/// derived cache of the stored objects' bounds: every mutation that can move
/// a box (`add`, `update`, `remove`, `clear`) refreshes it before returning,
/// so queries always see current geometry.
#[derive(Debug, Clone)]
pub struct Repository<O> {
    shape_store: ShapeStore<O>,
    selection_manager: SelectionManager,
    spatial_index: SpatialIndex,
}

impl<O: CanvasObject> Repository<O> {
    /// Creates an empty repository over the default world.
    pub fn new() -> Self {
        Self::with_index(SpatialIndex::default())
    }

    /// Creates an empty repository whose index covers `world`.
    pub fn with_world(world: Bounds, capacity: usize, max_depth: usize) -> Result<Self, IndexError> {
        Ok(Self::with_index(SpatialIndex::new(world, capacity, max_depth)?))
    }

    /// Creates a repository around an index. Anything already in the index
    /// is discarded.
    pub fn with_index(mut spatial_index: SpatialIndex) -> Self {
        spatial_index.clear();
        Self {
            shape_store: ShapeStore::new(),
            selection_manager: SelectionManager::new(),
            spatial_index,
        }
    }

    pub fn len(&self) -> usize {
        self.shape_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape_store.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.shape_store.contains(id)
    }

    /// Adds `object` on top of the paint order and indexes it.
    pub fn add(&mut self, object: O) -> Result<(), RepositoryError> {
        let id = object.id();
        let bounds = object.bounds();
        if self.shape_store.insert(object).is_err() {
            return Err(RepositoryError::DuplicateId { id });
        }
        self.spatial_index.insert(id, &bounds);
        tracing::trace!(%id, ?bounds, "object added");
        Ok(())
    }

    pub fn get_by_id(&self, id: ObjectId) -> Option<&O> {
        self.shape_store.get(id)
    }

    /// All objects in paint order, bottom first.
    pub fn get_all(&self) -> impl DoubleEndedIterator<Item = &O> + '_ {
        self.shape_store.iter()
    }

    /// Selected objects in paint order, bottom first.
    pub fn get_selected(&self) -> Vec<&O> {
        self.shape_store
            .iter()
            .filter(|o| self.selection_manager.is_selected(o.id()))
            .collect()
    }

    /// Replaces the stored object that has `object`'s id and re-indexes it.
    ///
    /// Paint order and selection are untouched. Returns the previous value.
    pub fn update(&mut self, object: O) -> Result<O, RepositoryError> {
        let id = object.id();
        let bounds = object.bounds();
        let previous = self
            .shape_store
            .replace(object)
            .map_err(|_| RepositoryError::NotFound { id })?;
        self.spatial_index.update(id, &bounds);
        tracing::trace!(%id, ?bounds, "object updated");
        Ok(previous)
    }

    /// Removes `id` from storage, index and selection.
    pub fn remove(&mut self, id: ObjectId) -> Option<O> {
        self.detach(id).map(|(object, _)| object)
    }

    /// Removes `id` like [`remove`](Self::remove) and reports where it sat.
    pub fn detach(&mut self, id: ObjectId) -> Option<(O, RemovedSlot)> {
        let position = self.shape_store.draw_position(id)?;
        let order = self.spatial_index.order_of(id);
        let object = self.shape_store.remove(id)?;
        self.spatial_index.remove(id);
        self.selection_manager.forget(id);
        tracing::trace!(%id, position, "object removed");
        Some((object, RemovedSlot { position, order }))
    }

    /// Puts a detached object back at its old paint position, under its old
    /// index stamp.
    pub fn restore(&mut self, object: O, slot: RemovedSlot) -> Result<(), RepositoryError> {
        let id = object.id();
        let bounds = object.bounds();
        if self.shape_store.insert_at(object, slot.position).is_err() {
            return Err(RepositoryError::DuplicateId { id });
        }
        match slot.order {
            Some(order) => self.spatial_index.restore(id, &bounds, order),
            None => self.spatial_index.insert(id, &bounds),
        };
        tracing::trace!(%id, position = slot.position, "object restored");
        Ok(())
    }

    /// The topmost object whose bounds contain `point`.
    pub fn hit_test(&self, point: &Point) -> Option<&O> {
        self.spatial_index
            .hit_test(point.x, point.y)
            .and_then(|id| self.shape_store.get(id))
    }

    /// Objects whose bounds intersect `region`, in paint order.
    pub fn query(&self, region: &Bounds) -> Vec<&O> {
        self.spatial_index
            .query(region)
            .into_iter()
            .filter_map(|id| self.shape_store.get(id))
            .collect()
    }

    /// Objects whose bounds contain `point`, in paint order.
    pub fn query_point(&self, point: &Point) -> Vec<&O> {
        self.spatial_index
            .query_point(point.x, point.y)
            .into_iter()
            .filter_map(|id| self.shape_store.get(id))
            .collect()
    }

    /// Empties storage, paint order, selection and index.
    pub fn clear(&mut self) {
        self.shape_store.clear();
        self.selection_manager.deselect_all();
        self.spatial_index.clear();
        tracing::debug!("repository cleared");
    }

    /// Selects `id`, replacing the selection unless `multi` is set.
    ///
    /// Selecting an id that is not present changes nothing and returns
    /// `false`.
    pub fn select(&mut self, id: ObjectId, multi: bool) -> bool {
        if !self.shape_store.contains(id) {
            return false;
        }
        self.selection_manager.select(id, multi);
        true
    }

    /// Flips the selection state of `id`. Returns the new state.
    pub fn toggle_selection(&mut self, id: ObjectId) -> bool {
        if !self.shape_store.contains(id) {
            return false;
        }
        self.selection_manager.toggle(id)
    }

    pub fn deselect(&mut self, id: ObjectId) -> bool {
        self.selection_manager.deselect(id)
    }

    pub fn deselect_all(&mut self) {
        self.selection_manager.deselect_all();
    }

    /// Selects every object; the topmost becomes the primary selection.
    pub fn select_all(&mut self) {
        let ids: Vec<ObjectId> = self.shape_store.draw_order_iter().collect();
        self.selection_manager.select_many(ids, false);
    }

    /// Selects every object whose bounds intersect `region`.
    ///
    /// Negative-size regions are fine: [`Bounds`] is always normalized.
    pub fn select_in_region(&mut self, region: &Bounds, multi: bool) -> usize {
        let ids = self.spatial_index.query(region);
        let count = ids.len();
        self.selection_manager.select_many(ids, multi);
        count
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection_manager.is_selected(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection_manager.selected_count()
    }

    /// The most recently selected id.
    pub fn primary_selection(&self) -> Option<ObjectId> {
        self.selection_manager.selected_id()
    }

    /// Ids of the selected objects in paint order.
    pub fn selected_ids(&self) -> Vec<ObjectId> {
        self.shape_store
            .draw_order_iter()
            .filter(|&id| self.selection_manager.is_selected(id))
            .collect()
    }

    /// Read-only view of the index, for diagnostics.
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial_index
    }

    pub fn index_stats(&self) -> SpatialIndexStats {
        self.spatial_index.stats()
    }

    /// Position of `id` in paint order.
    pub fn paint_position(&self, id: ObjectId) -> Option<usize> {
        self.shape_store.draw_position(id)
    }
}

impl<O: CanvasObject> Default for Repository<O> {
    fn default() -> Self {
        Self::new()
    }
}
