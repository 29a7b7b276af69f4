//! Bounded linear undo/redo over [`CanvasCommand`]s.

use std::collections::VecDeque;

use quadcanvas_core::constants::DEFAULT_MAX_HISTORY_SIZE;
use quadcanvas_core::{CanvasObject, HistoryError};

use crate::commands::CanvasCommand;
use crate::repository::Repository;

/// Executed commands and a cursor separating undoable from redoable ones.
///
/// Entries `[0, cursor)` can be undone, entries `[cursor, len)` can be
/// redone. Executing a new command discards the redo side. When more than
/// `max_history_size` entries would be kept, the oldest is dropped and its
/// snapshots are released.
#[derive(Debug, Clone)]
pub struct CommandHistory<O> {
    entries: VecDeque<CanvasCommand<O>>,
    cursor: usize,
    max_history_size: usize,
}

impl<O: CanvasObject> CommandHistory<O> {
    pub fn new(max_history_size: usize) -> Result<Self, HistoryError> {
        if max_history_size == 0 {
            return Err(HistoryError::InvalidMaxSize);
        }
        Ok(Self {
            entries: VecDeque::with_capacity(max_history_size.min(256)),
            cursor: 0,
            max_history_size,
        })
    }

    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Applies `command` and records it.
    ///
    /// A command that fails to apply is not recorded and the redo side is
    /// left untouched.
    pub fn execute(
        &mut self,
        mut command: CanvasCommand<O>,
        repo: &mut Repository<O>,
    ) -> Result<(), HistoryError> {
        command.apply(repo)?;

        let discarded = self.entries.len() - self.cursor;
        if discarded > 0 {
            self.entries.truncate(self.cursor);
            tracing::debug!(discarded, "redo branch discarded");
        }

        tracing::debug!(command = command.name(), "command executed");
        self.entries.push_back(command);
        self.cursor += 1;

        while self.entries.len() > self.max_history_size {
            if let Some(evicted) = self.entries.pop_front() {
                self.cursor -= 1;
                tracing::debug!(command = evicted.name(), "oldest history entry evicted");
            }
        }
        Ok(())
    }

    /// Reverses the newest undoable command.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. If the command
    /// fails, the cursor does not move.
    pub fn undo(&mut self, repo: &mut Repository<O>) -> Result<bool, HistoryError> {
        if self.cursor == 0 {
            return Ok(false);
        }
        let command = &mut self.entries[self.cursor - 1];
        command.undo(repo)?;
        tracing::debug!(command = command.name(), "command undone");
        self.cursor -= 1;
        Ok(true)
    }

    /// Re-applies the oldest redoable command.
    ///
    /// Returns `Ok(false)` when there is nothing to redo. If the command
    /// fails, the cursor does not move.
    pub fn redo(&mut self, repo: &mut Repository<O>) -> Result<bool, HistoryError> {
        if self.cursor == self.entries.len() {
            return Ok(false);
        }
        let command = &mut self.entries[self.cursor];
        command.apply(repo)?;
        tracing::debug!(command = command.name(), "command redone");
        self.cursor += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Number of commands that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Number of commands that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// Total number of recorded commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the command the next [`undo`](Self::undo) would reverse.
    pub fn undo_description(&self) -> Option<String> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|c| c.name().to_string())
    }

    /// Name of the command the next [`redo`](Self::redo) would apply.
    pub fn redo_description(&self) -> Option<String> {
        self.entries.get(self.cursor).map(|c| c.name().to_string())
    }

    /// Names of every recorded command, oldest first, including redoable ones.
    pub fn full_history(&self) -> Vec<String> {
        self.entries.iter().map(|c| c.name().to_string()).collect()
    }

    /// Forgets every recorded command. The repository is not touched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl<O: CanvasObject> Default for CommandHistory<O> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
        }
    }
}
