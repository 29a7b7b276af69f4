use std::collections::HashMap;

use quadcanvas_core::{CanvasObject, ObjectId};

/// Id-keyed object storage with a stable draw order.
///
/// Draw order is insertion order: the last id is painted last and sits on
/// top. The store does not know about the spatial index; keeping the two in
/// step is the repository's job.
#[derive(Debug, Clone)]
pub struct ShapeStore<O> {
    objects: HashMap<ObjectId, O>,
    draw_order: Vec<ObjectId>,
}

impl<O: CanvasObject> ShapeStore<O> {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            draw_order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Appends `object` on top of the draw order.
    ///
    /// Hands the object back if its id is already stored.
    pub fn insert(&mut self, object: O) -> Result<(), O> {
        let id = object.id();
        if self.objects.contains_key(&id) {
            return Err(object);
        }
        self.objects.insert(id, object);
        self.draw_order.push(id);
        Ok(())
    }

    /// Inserts `object` at `position` in the draw order, clamped to the
    /// top. Hands the object back if its id is already stored.
    pub fn insert_at(&mut self, object: O, position: usize) -> Result<(), O> {
        let id = object.id();
        if self.objects.contains_key(&id) {
            return Err(object);
        }
        self.objects.insert(id, object);
        let position = position.min(self.draw_order.len());
        self.draw_order.insert(position, id);
        Ok(())
    }

    /// Swaps in `object` for the stored object with the same id, keeping
    /// its draw position. Hands the object back if the id is not stored.
    pub fn replace(&mut self, object: O) -> Result<O, O> {
        match self.objects.get_mut(&object.id()) {
            Some(slot) => Ok(std::mem::replace(slot, object)),
            None => Err(object),
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&O> {
        self.objects.get(&id)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<O> {
        let object = self.objects.remove(&id)?;
        if let Some(pos) = self.draw_order.iter().position(|&d| d == id) {
            self.draw_order.remove(pos);
        }
        Some(object)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.draw_order.clear();
    }

    /// Objects in draw order, bottom first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &O> + '_ {
        self.draw_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Ids in draw order, bottom first.
    pub fn draw_order_iter(&self) -> impl DoubleEndedIterator<Item = ObjectId> + '_ {
        self.draw_order.iter().copied()
    }

    /// Position of `id` in the draw order.
    pub fn draw_position(&self, id: ObjectId) -> Option<usize> {
        self.draw_order.iter().position(|&d| d == id)
    }
}

impl<O: CanvasObject> Default for ShapeStore<O> {
    fn default() -> Self {
        Self::new()
    }
}
