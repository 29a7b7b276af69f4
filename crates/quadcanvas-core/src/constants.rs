//! Default tuning values shared by the index, the history and the settings crate.

/// Half-extent of the default addressable world, in world units.
pub const DEFAULT_WORLD_EXTENT: f64 = 1_000_000.0;

/// Entries a quadtree node holds before it divides.
pub const DEFAULT_NODE_CAPACITY: usize = 8;

/// Deepest level a quadtree node may reach.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Undo entries kept before the oldest is evicted.
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 50;
