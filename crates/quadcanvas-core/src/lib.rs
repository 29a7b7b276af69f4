//! # QuadCanvas Core
//!
//! Core types shared by every QuadCanvas crate:
//! world-space geometry, the object capability trait consumed by the
//! repository, explicit id allocation, and the layered error types.

pub mod constants;
pub mod error;
pub mod geometry;
pub mod object;

pub use error::{CommandError, Error, HistoryError, IndexError, RepositoryError, Result};
pub use geometry::{Bounds, Point};
pub use object::{CachedBounds, CanvasObject, IdAllocator, ObjectId};
