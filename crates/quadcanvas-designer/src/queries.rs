//! Query use-cases over the repository.
//!
//! These are the entry points an interaction layer calls for pointer
//! picking and click selection. They are kept as separate seams so filtering
//! (locked layers, hidden objects) can be added without touching the
//! repository.

use quadcanvas_core::{CanvasObject, ObjectId, Point};

use crate::repository::Repository;

/// The topmost object whose bounds contain `point`.
pub fn hit_test<'a, O: CanvasObject>(repo: &'a Repository<O>, point: &Point) -> Option<&'a O> {
    repo.hit_test(point)
}

/// Selects `id`, clearing every other selection unless `multi_select`.
///
/// Selecting an id that is not on the canvas is a no-op and returns `false`.
pub fn select<O: CanvasObject>(repo: &mut Repository<O>, id: ObjectId, multi_select: bool) -> bool {
    repo.select(id, multi_select)
}
