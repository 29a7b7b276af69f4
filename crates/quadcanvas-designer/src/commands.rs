use quadcanvas_core::{CanvasObject, CommandError, ObjectId, RepositoryError};

use crate::repository::{RemovedSlot, Repository};

/// Adds an object. The object lives here while the command is undone and in
/// the repository while it is applied.
#[derive(Debug, Clone)]
pub struct CreateObject<O> {
    pub id: ObjectId,
    pub object: Option<O>, // Some when not on the canvas
    pub name: String,
}

impl<O: CanvasObject> CreateObject<O> {
    pub fn new(object: O) -> Self {
        Self {
            id: object.id(),
            object: Some(object),
            name: "Create Object".to_string(),
        }
    }
}

/// Removes an object, keeping the removed instance and its paint slot for
/// undo.
#[derive(Debug, Clone)]
pub struct DeleteObject<O> {
    pub id: ObjectId,
    pub object: Option<O>, // Some while deleted
    pub slot: Option<RemovedSlot>,
    pub name: String,
}

impl<O: CanvasObject> DeleteObject<O> {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            object: None,
            slot: None,
            name: "Delete Object".to_string(),
        }
    }
}

/// Swaps an object between two full snapshots.
#[derive(Debug, Clone)]
pub struct ModifyObject<O> {
    pub id: ObjectId,
    pub before: O,
    pub after: O,
    pub name: String,
}

impl<O: CanvasObject> ModifyObject<O> {
    /// Both snapshots must carry the same id.
    pub fn new(before: O, after: O) -> Result<Self, CommandError> {
        if before.id() != after.id() {
            return Err(CommandError::IdMismatch {
                before: before.id(),
                after: after.id(),
            });
        }
        Ok(Self {
            id: before.id(),
            before,
            after,
            name: "Modify Object".to_string(),
        })
    }
}

/// Several commands applied and undone as one history entry.
#[derive(Debug, Clone)]
pub struct BatchCommand<O> {
    pub commands: Vec<CanvasCommand<O>>,
    pub name: String,
}

/// A reversible mutation of a [`Repository`].
#[derive(Debug, Clone)]
pub enum CanvasCommand<O> {
    Create(CreateObject<O>),
    Delete(DeleteObject<O>),
    Modify(ModifyObject<O>),
    Batch(BatchCommand<O>),
}

impl<O: CanvasObject> CanvasCommand<O> {
    pub fn create(object: O) -> Self {
        CanvasCommand::Create(CreateObject::new(object))
    }

    pub fn delete(id: ObjectId) -> Self {
        CanvasCommand::Delete(DeleteObject::new(id))
    }

    pub fn modify(before: O, after: O) -> Result<Self, CommandError> {
        Ok(CanvasCommand::Modify(ModifyObject::new(before, after)?))
    }

    pub fn batch(name: impl Into<String>, commands: Vec<CanvasCommand<O>>) -> Self {
        CanvasCommand::Batch(BatchCommand {
            commands,
            name: name.into(),
        })
    }

    /// Replaces the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match &mut self {
            CanvasCommand::Create(cmd) => cmd.name = name,
            CanvasCommand::Delete(cmd) => cmd.name = name,
            CanvasCommand::Modify(cmd) => cmd.name = name,
            CanvasCommand::Batch(cmd) => cmd.name = name,
        }
        self
    }

    /// Display name, as shown in "Undo ..." menu entries.
    pub fn name(&self) -> &str {
        match self {
            CanvasCommand::Create(cmd) => &cmd.name,
            CanvasCommand::Delete(cmd) => &cmd.name,
            CanvasCommand::Modify(cmd) => &cmd.name,
            CanvasCommand::Batch(cmd) => &cmd.name,
        }
    }

    /// Performs the mutation.
    ///
    /// On error the repository is left as it was before the call.
    pub fn apply(&mut self, repo: &mut Repository<O>) -> Result<(), CommandError> {
        match self {
            CanvasCommand::Create(cmd) => {
                let object = take_snapshot(&mut cmd.object, &cmd.name, "already applied")?;
                if repo.contains(cmd.id) {
                    cmd.object = Some(object);
                    return Err(RepositoryError::DuplicateId { id: cmd.id }.into());
                }
                repo.add(object)?;
            }
            CanvasCommand::Delete(cmd) => {
                if cmd.object.is_some() {
                    return Err(invalid_state(&cmd.name, "already applied"));
                }
                let (object, slot) = repo
                    .detach(cmd.id)
                    .ok_or_else(|| missing(cmd.id, &cmd.name))?;
                cmd.object = Some(object);
                cmd.slot = Some(slot);
            }
            CanvasCommand::Modify(cmd) => {
                if !repo.contains(cmd.id) {
                    return Err(missing(cmd.id, &cmd.name));
                }
                repo.update(cmd.after.clone())?;
            }
            CanvasCommand::Batch(cmd) => {
                for i in 0..cmd.commands.len() {
                    if let Err(err) = cmd.commands[i].apply(repo) {
                        roll_back(&mut cmd.commands[..i], repo, &cmd.name);
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Reverses a previous [`apply`](Self::apply).
    ///
    /// On error the repository is left as it was before the call.
    pub fn undo(&mut self, repo: &mut Repository<O>) -> Result<(), CommandError> {
        match self {
            CanvasCommand::Create(cmd) => {
                if cmd.object.is_some() {
                    return Err(invalid_state(&cmd.name, "not applied"));
                }
                let object = repo.remove(cmd.id).ok_or_else(|| missing(cmd.id, &cmd.name))?;
                cmd.object = Some(object);
            }
            CanvasCommand::Delete(cmd) => {
                let object = take_snapshot(&mut cmd.object, &cmd.name, "not applied")?;
                if repo.contains(cmd.id) {
                    cmd.object = Some(object);
                    return Err(RepositoryError::DuplicateId { id: cmd.id }.into());
                }
                match cmd.slot.take() {
                    Some(slot) => repo.restore(object, slot)?,
                    None => repo.add(object)?,
                }
            }
            CanvasCommand::Modify(cmd) => {
                if !repo.contains(cmd.id) {
                    return Err(missing(cmd.id, &cmd.name));
                }
                repo.update(cmd.before.clone())?;
            }
            CanvasCommand::Batch(cmd) => {
                let len = cmd.commands.len();
                for i in (0..len).rev() {
                    if let Err(err) = cmd.commands[i].undo(repo) {
                        // Put back what was already undone.
                        for done in &mut cmd.commands[i + 1..] {
                            if let Err(redo_err) = done.apply(repo) {
                                tracing::warn!(
                                    batch = %cmd.name,
                                    error = %redo_err,
                                    "failed to restore batch after undo error"
                                );
                            }
                        }
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Ids this command touches.
    pub fn target_ids(&self) -> Vec<ObjectId> {
        match self {
            CanvasCommand::Create(cmd) => vec![cmd.id],
            CanvasCommand::Delete(cmd) => vec![cmd.id],
            CanvasCommand::Modify(cmd) => vec![cmd.id],
            CanvasCommand::Batch(cmd) => cmd.commands.iter().flat_map(|c| c.target_ids()).collect(),
        }
    }
}

fn take_snapshot<O>(slot: &mut Option<O>, command: &str, reason: &str) -> Result<O, CommandError> {
    slot.take().ok_or_else(|| invalid_state(command, reason))
}

fn missing(id: ObjectId, command: &str) -> CommandError {
    CommandError::MissingTarget {
        id,
        command: command.to_string(),
    }
}

fn invalid_state(command: &str, reason: &str) -> CommandError {
    CommandError::InvalidState {
        command: command.to_string(),
        reason: reason.to_string(),
    }
}

fn roll_back<O: CanvasObject>(applied: &mut [CanvasCommand<O>], repo: &mut Repository<O>, batch: &str) {
    for cmd in applied.iter_mut().rev() {
        if let Err(err) = cmd.undo(repo) {
            tracing::warn!(batch, error = %err, "failed to roll back batch member");
        }
    }
}
