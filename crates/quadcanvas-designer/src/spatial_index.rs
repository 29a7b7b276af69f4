//! Quadtree spatial index for region and point queries.
//!
//! The index maps axis-aligned bounding boxes to [`ObjectId`]s and knows
//! nothing else about the objects. Each entry lives in exactly one node: the
//! deepest node whose child quadrants cannot hold it on their own. Nodes
//! divide the first time they hold more than `capacity` entries while above
//! `max_depth`, and never merge back.

use std::collections::HashMap;

use quadcanvas_core::constants::{DEFAULT_MAX_DEPTH, DEFAULT_NODE_CAPACITY, DEFAULT_WORLD_EXTENT};
use quadcanvas_core::{Bounds, IndexError, ObjectId};

#[derive(Debug, Clone, Copy)]
struct IndexedItem {
    id: ObjectId,
    bounds: Bounds,
    order: u64,
}

/// Where an id was last registered. `placed` is false for boxes that fell
/// outside the world and were dropped.
#[derive(Debug, Clone, Copy)]
struct EntryInfo {
    bounds: Bounds,
    order: u64,
    placed: bool,
}

#[derive(Debug, Clone)]
struct QuadtreeNode {
    bounds: Bounds,
    depth: usize,
    items: Vec<IndexedItem>,
    children: Option<Box<[QuadtreeNode; 4]>>,
}

impl QuadtreeNode {
    fn new(bounds: Bounds, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    /// Zero-area boxes never fit a child, so they stay where they land.
    fn fits(&self, bounds: &Bounds) -> bool {
        bounds.has_area() && self.bounds.contains_bounds(bounds)
    }

    fn insert(&mut self, item: IndexedItem, capacity: usize, max_depth: usize) {
        if let Some(children) = self.children.as_mut() {
            match children.iter_mut().find(|c| c.fits(&item.bounds)) {
                Some(child) => child.insert(item, capacity, max_depth),
                None => self.items.push(item),
            }
            return;
        }

        self.items.push(item);
        if self.items.len() > capacity && self.depth < max_depth {
            self.subdivide(capacity, max_depth);
        }
    }

    fn subdivide(&mut self, capacity: usize, max_depth: usize) {
        let child_depth = self.depth + 1;
        let children = self
            .bounds
            .quadrants()
            .map(|quadrant| QuadtreeNode::new(quadrant, child_depth));
        self.children = Some(Box::new(children));

        tracing::debug!(
            depth = self.depth,
            items = self.items.len(),
            "subdividing quadtree node"
        );

        for item in std::mem::take(&mut self.items) {
            self.insert(item, capacity, max_depth);
        }
    }

    /// Follows the same containment path `insert` took for `bounds`.
    fn remove(&mut self, id: ObjectId, bounds: &Bounds) -> bool {
        if let Some(pos) = self.items.iter().position(|item| item.id == id) {
            self.items.swap_remove(pos);
            return true;
        }
        match self.children.as_mut() {
            Some(children) => children
                .iter_mut()
                .find(|c| c.fits(bounds))
                .is_some_and(|child| child.remove(id, bounds)),
            None => false,
        }
    }

    fn query(&self, region: &Bounds, out: &mut Vec<IndexedItem>) {
        // Items held here may stick out of this node (the root keeps boxes
        // that only partly overlap the world), so they are always tested.
        out.extend(
            self.items
                .iter()
                .filter(|item| item.bounds.intersects(region))
                .copied(),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.bounds.intersects(region) {
                    child.query(region, out);
                }
            }
        }
    }

    fn query_point(&self, x: f64, y: f64, out: &mut Vec<IndexedItem>) {
        out.extend(
            self.items
                .iter()
                .filter(|item| item.bounds.contains_point(x, y))
                .copied(),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.bounds.contains_point(x, y) {
                    child.query_point(x, y, out);
                }
            }
        }
    }

    fn topmost_at(&self, x: f64, y: f64, best: &mut Option<IndexedItem>) {
        for item in &self.items {
            if item.bounds.contains_point(x, y) && best.is_none_or(|b| item.order > b.order) {
                *best = Some(*item);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.bounds.contains_point(x, y) {
                    child.topmost_at(x, y, best);
                }
            }
        }
    }

    fn collect_stats(&self, stats: &mut SpatialIndexStats) {
        stats.total_nodes += 1;
        stats.total_items += self.items.len();
        stats.max_depth_reached = stats.max_depth_reached.max(self.depth);
        stats.max_items_in_node = stats.max_items_in_node.max(self.items.len());
        if let Some(children) = &self.children {
            stats.divided_nodes += 1;
            for child in children.iter() {
                child.collect_stats(stats);
            }
        }
    }
}

/// Shape of the tree at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpatialIndexStats {
    /// Nodes in the tree, including the root.
    pub total_nodes: usize,
    /// Entries held across all nodes.
    pub total_items: usize,
    /// Nodes that have been divided.
    pub divided_nodes: usize,
    /// Depth of the deepest node (the root is depth 0).
    pub max_depth_reached: usize,
    /// Largest number of entries held by a single node.
    pub max_items_in_node: usize,
    /// Ids registered with boxes outside the world, and therefore unindexed.
    pub dropped_items: usize,
}

/// Quadtree over a fixed world rectangle.
///
/// Every registered id is stamped with an insertion order. Point hit tests
/// resolve overlaps in favour of the latest stamp, and [`update`] keeps the
/// stamp of the entry it moves, so hit-test order follows first insertion.
///
/// [`update`]: SpatialIndex::update
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    root: QuadtreeNode,
    entries: HashMap<ObjectId, EntryInfo>,
    capacity: usize,
    max_depth: usize,
    next_order: u64,
    placed: usize,
}

impl SpatialIndex {
    /// Creates an empty index covering `world`.
    ///
    /// `capacity` and `max_depth` must be positive and `world` must be a
    /// finite box with positive area.
    pub fn new(world: Bounds, capacity: usize, max_depth: usize) -> Result<Self, IndexError> {
        if capacity == 0 {
            return Err(IndexError::InvalidCapacity);
        }
        if max_depth == 0 {
            return Err(IndexError::InvalidMaxDepth);
        }
        if !world.is_finite() || !world.has_area() {
            return Err(IndexError::InvalidWorldBounds {
                min_x: world.min_x,
                min_y: world.min_y,
                max_x: world.max_x,
                max_y: world.max_y,
            });
        }
        Ok(Self::new_unchecked(world, capacity, max_depth))
    }

    fn new_unchecked(world: Bounds, capacity: usize, max_depth: usize) -> Self {
        Self {
            root: QuadtreeNode::new(world, 0),
            entries: HashMap::new(),
            capacity,
            max_depth,
            next_order: 0,
            placed: 0,
        }
    }

    /// The rectangle covered by the root node.
    pub fn world_bounds(&self) -> Bounds {
        self.root.bounds
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Registers `id` with `bounds`.
    ///
    /// Boxes that do not intersect the world (or are not finite) are
    /// dropped and `false` is returned. Inserting an id that is already
    /// registered behaves like [`update`](Self::update).
    pub fn insert(&mut self, id: ObjectId, bounds: &Bounds) -> bool {
        if self.entries.contains_key(&id) {
            return self.update(id, bounds);
        }
        let order = self.next_order;
        self.next_order += 1;
        self.place(id, *bounds, order)
    }

    fn place(&mut self, id: ObjectId, bounds: Bounds, order: u64) -> bool {
        let placed = bounds.is_finite() && bounds.intersects(&self.root.bounds);
        if placed {
            self.root
                .insert(IndexedItem { id, bounds, order }, self.capacity, self.max_depth);
            self.placed += 1;
        } else {
            tracing::debug!(%id, ?bounds, "bounds outside world, entry not indexed");
        }
        self.entries.insert(
            id,
            EntryInfo {
                bounds,
                order,
                placed,
            },
        );
        placed
    }

    /// Removes `id` wherever it is indexed. Returns whether it was indexed.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        match self.entries.remove(&id) {
            Some(info) => self.unplace(id, &info),
            None => false,
        }
    }

    fn unplace(&mut self, id: ObjectId, info: &EntryInfo) -> bool {
        if !info.placed {
            return false;
        }
        self.placed -= 1;
        let removed = self.root.remove(id, &info.bounds);
        if !removed {
            tracing::warn!(%id, "indexed entry not found on its containment path");
        }
        removed
    }

    /// Insertion stamp of `id`, including ids whose boxes were dropped.
    pub fn order_of(&self, id: ObjectId) -> Option<u64> {
        self.entries.get(&id).map(|info| info.order)
    }

    /// Registers `id` under a stamp it held before, e.g. when a removal is
    /// undone. Hit-test ordering against the other entries is what it was
    /// before the removal. Returns whether the box is indexed.
    pub fn restore(&mut self, id: ObjectId, bounds: &Bounds, order: u64) -> bool {
        if let Some(info) = self.entries.remove(&id) {
            self.unplace(id, &info);
        }
        self.next_order = self.next_order.max(order.saturating_add(1));
        self.place(id, *bounds, order)
    }

    /// Moves `id` to `bounds`, keeping its insertion order.
    ///
    /// Equivalent to [`remove`](Self::remove) followed by
    /// [`insert`](Self::insert). Returns whether the new box is indexed.
    pub fn update(&mut self, id: ObjectId, bounds: &Bounds) -> bool {
        match self.entries.remove(&id) {
            Some(info) => {
                self.unplace(id, &info);
                self.place(id, *bounds, info.order)
            }
            None => self.insert(id, bounds),
        }
    }

    /// Ids whose boxes intersect `region`, bottom to top.
    pub fn query(&self, region: &Bounds) -> Vec<ObjectId> {
        let mut hits = Vec::new();
        self.root.query(region, &mut hits);
        Self::into_ordered_ids(hits)
    }

    /// Ids whose boxes contain the point, bottom to top.
    pub fn query_point(&self, x: f64, y: f64) -> Vec<ObjectId> {
        let mut hits = Vec::new();
        self.root.query_point(x, y, &mut hits);
        Self::into_ordered_ids(hits)
    }

    /// The most recently inserted id whose box contains the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ObjectId> {
        let mut best = None;
        self.root.topmost_at(x, y, &mut best);
        best.map(|item| item.id)
    }

    fn into_ordered_ids(mut hits: Vec<IndexedItem>) -> Vec<ObjectId> {
        hits.sort_unstable_by_key(|item| item.order);
        hits.into_iter().map(|item| item.id).collect()
    }

    /// True when `id` is currently indexed.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.get(&id).is_some_and(|info| info.placed)
    }

    /// The box `id` is indexed under.
    pub fn bounds_of(&self, id: ObjectId) -> Option<Bounds> {
        self.entries
            .get(&id)
            .filter(|info| info.placed)
            .map(|info| info.bounds)
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.placed
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry and collapses the tree back to a single root.
    pub fn clear(&mut self) {
        self.root = QuadtreeNode::new(self.root.bounds, 0);
        self.entries.clear();
        self.next_order = 0;
        self.placed = 0;
    }

    pub fn stats(&self) -> SpatialIndexStats {
        let mut stats = SpatialIndexStats {
            dropped_items: self.entries.values().filter(|info| !info.placed).count(),
            ..SpatialIndexStats::default()
        };
        self.root.collect_stats(&mut stats);
        stats
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new_unchecked(
            Bounds::new(
                -DEFAULT_WORLD_EXTENT,
                -DEFAULT_WORLD_EXTENT,
                DEFAULT_WORLD_EXTENT,
                DEFAULT_WORLD_EXTENT,
            ),
            DEFAULT_NODE_CAPACITY,
            DEFAULT_MAX_DEPTH,
        )
    }
}
