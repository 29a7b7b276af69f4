//! Canvas session for UI integration.
//!
//! Bundles the repository, the command history and the id allocator, and
//! routes every mutation through a command so it can be undone.

use quadcanvas_core::{
    Bounds, CanvasObject, CommandError, HistoryError, IdAllocator, ObjectId, Point,
    RepositoryError,
};

use crate::commands::CanvasCommand;
use crate::history::CommandHistory;
use crate::repository::Repository;

/// Editing session over one canvas.
#[derive(Debug, Clone)]
pub struct CanvasSession<O> {
    repository: Repository<O>,
    history: CommandHistory<O>,
    ids: IdAllocator,
    is_modified: bool,
}

impl<O: CanvasObject> CanvasSession<O> {
    pub fn new(repository: Repository<O>, history: CommandHistory<O>) -> Self {
        Self {
            repository,
            history,
            ids: IdAllocator::new(),
            is_modified: false,
        }
    }

    /// Returns a fresh id for a new object.
    pub fn allocate_id(&mut self) -> ObjectId {
        self.ids.allocate()
    }

    pub fn id_allocator_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub fn repository(&self) -> &Repository<O> {
        &self.repository
    }

    pub fn history(&self) -> &CommandHistory<O> {
        &self.history
    }

    /// Executes an arbitrary command through the history.
    pub fn execute(&mut self, command: CanvasCommand<O>) -> Result<(), HistoryError> {
        self.history.execute(command, &mut self.repository)?;
        self.is_modified = true;
        Ok(())
    }

    /// Adds `object` as an undoable step.
    pub fn create(&mut self, object: O) -> Result<ObjectId, HistoryError> {
        let id = object.id();
        self.execute(CanvasCommand::create(object))?;
        self.ids.reserve_past(id);
        Ok(id)
    }

    /// Deletes `id` as an undoable step.
    pub fn delete(&mut self, id: ObjectId) -> Result<(), HistoryError> {
        self.execute(CanvasCommand::delete(id))
    }

    /// Edits a copy of `id` and records the change as a modify command
    /// named `name`.
    pub fn modify(
        &mut self,
        id: ObjectId,
        name: &str,
        edit: impl FnOnce(&mut O),
    ) -> Result<(), HistoryError> {
        let before = self
            .repository
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| CommandError::MissingTarget {
                id,
                command: name.to_string(),
            })?;
        let mut after = before.clone();
        edit(&mut after);
        let command = CanvasCommand::modify(before, after)?.with_name(name);
        self.execute(command)
    }

    /// Deletes every selected object as a single undo step.
    ///
    /// Returns how many objects were deleted.
    pub fn delete_selected(&mut self) -> Result<usize, HistoryError> {
        let ids = self.repository.selected_ids();
        if ids.is_empty() {
            return Ok(0);
        }
        let count = ids.len();
        let commands = ids.into_iter().map(CanvasCommand::delete).collect();
        self.execute(CanvasCommand::batch("Delete Selection", commands))?;
        Ok(count)
    }

    pub fn undo(&mut self) -> Result<bool, HistoryError> {
        let undone = self.history.undo(&mut self.repository)?;
        self.is_modified |= undone;
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, HistoryError> {
        let redone = self.history.redo(&mut self.repository)?;
        self.is_modified |= redone;
        Ok(redone)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn hit_test(&self, point: &Point) -> Option<&O> {
        crate::queries::hit_test(&self.repository, point)
    }

    pub fn query(&self, region: &Bounds) -> Vec<&O> {
        self.repository.query(region)
    }

    /// Selection is not an undoable step.
    pub fn select(&mut self, id: ObjectId, multi: bool) -> bool {
        crate::queries::select(&mut self.repository, id, multi)
    }

    pub fn select_in_region(&mut self, region: &Bounds, multi: bool) -> usize {
        self.repository.select_in_region(region, multi)
    }

    pub fn deselect_all(&mut self) {
        self.repository.deselect_all();
    }

    /// Replaces the whole canvas with `objects`, e.g. after loading a file.
    ///
    /// History is cleared and the id allocator moves past every loaded id.
    /// On a duplicate id the canvas is left empty.
    pub fn load(&mut self, objects: impl IntoIterator<Item = O>) -> Result<usize, RepositoryError> {
        self.repository.clear();
        self.history.clear();
        self.is_modified = false;
        for object in objects {
            let id = object.id();
            if let Err(err) = self.repository.add(object) {
                self.repository.clear();
                return Err(err);
            }
            self.ids.reserve_past(id);
        }
        tracing::info!(objects = self.repository.len(), "canvas loaded");
        Ok(self.repository.len())
    }

    /// Starts an empty document.
    pub fn clear(&mut self) {
        self.repository.clear();
        self.history.clear();
        self.is_modified = false;
    }

    /// True when something changed since the last load or save.
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }
}

impl<O: CanvasObject> Default for CanvasSession<O> {
    fn default() -> Self {
        Self::new(Repository::new(), CommandHistory::default())
    }
}
