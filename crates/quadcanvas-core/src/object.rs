//! Object identity and the capability set the repository consumes.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;

/// Stable identifier of a canvas object.
///
/// An id is unique for the whole lifetime of its object and survives
/// undo/redo unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Hands out fresh object ids.
///
/// There is no process-wide counter: whoever creates objects owns an
/// allocator and passes it where ids are needed.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator whose first id is `#1`.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Creates an allocator whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Returns a fresh id.
    ///
    /// The counter saturates at `u64::MAX`; once there, the same id is
    /// handed out again and the repository reports it as a duplicate.
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> ObjectId {
        ObjectId(self.next)
    }

    /// Makes sure future ids are greater than `id`.
    ///
    /// Used after restoring objects that were numbered elsewhere.
    pub fn reserve_past(&mut self, id: ObjectId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability set of an object stored on the canvas.
///
/// Objects are opaque to the repository: it only needs a stable id, the
/// current world-space bounding box, and deep clones for undo snapshots.
/// Mutation happens on the object itself; after any change that affects
/// [`bounds`](Self::bounds) the owner must hand the object back through
/// `Repository::update` so the spatial index is refreshed.
pub trait CanvasObject: Clone {
    /// Stable identifier.
    fn id(&self) -> ObjectId;

    /// Current world-space bounding box.
    fn bounds(&self) -> Bounds;
}

/// Invalidate-then-recompute cache for derived bounds.
///
/// Mutators call [`invalidate`](Self::invalidate); readers call
/// [`get_or_compute`](Self::get_or_compute) with the function that derives
/// the bounds from the object's state.
#[derive(Debug, Clone, Default)]
pub struct CachedBounds {
    cached: Cell<Option<Bounds>>,
}

impl CachedBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> Bounds) -> Bounds {
        if let Some(bounds) = self.cached.get() {
            return bounds;
        }
        let bounds = compute();
        self.cached.set(Some(bounds));
        bounds
    }

    pub fn invalidate(&self) {
        self.cached.set(None);
    }

    pub fn is_valid(&self) -> bool {
        self.cached.get().is_some()
    }
}
