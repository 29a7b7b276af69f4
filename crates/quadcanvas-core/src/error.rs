//! Error handling for QuadCanvas
//!
//! Every error here is a caller-contract fault: the core never retries or
//! repairs a violated invariant, it reports the offending call.
//! - Index errors (invalid quadtree construction parameters)
//! - Repository errors (duplicate or unknown ids)
//! - Command errors (targets missing when a command is applied or undone)
//! - History errors (invalid history bound)
//!
//! Situations that are deliberately silent (inserting outside the world,
//! undo at a history boundary, removing an absent id) are not errors.

use thiserror::Error;

use crate::object::ObjectId;

/// Spatial index construction error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Node capacity must be at least one
    #[error("Node capacity must be > 0")]
    InvalidCapacity,

    /// Maximum depth must be at least one
    #[error("Maximum depth must be > 0")]
    InvalidMaxDepth,

    /// World bounds must be finite with positive area
    #[error("Invalid world bounds ({min_x}, {min_y}) - ({max_x}, {max_y})")]
    InvalidWorldBounds {
        /// Left edge.
        min_x: f64,
        /// Top edge.
        min_y: f64,
        /// Right edge.
        max_x: f64,
        /// Bottom edge.
        max_y: f64,
    },
}

/// Object repository error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// An object with this id is already present
    #[error("Object {id} already exists")]
    DuplicateId {
        /// The conflicting id.
        id: ObjectId,
    },

    /// No object with this id is present
    #[error("Object {id} not found")]
    NotFound {
        /// The missing id.
        id: ObjectId,
    },
}

/// Command application error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The object a command operates on is not in the repository
    #[error("{command}: target object {id} is missing")]
    MissingTarget {
        /// The missing id.
        id: ObjectId,
        /// Display name of the failing command.
        command: String,
    },

    /// Before and after snapshots of a modification disagree on identity
    #[error("Modification snapshots disagree on identity: {before} vs {after}")]
    IdMismatch {
        /// Id of the before snapshot.
        before: ObjectId,
        /// Id of the after snapshot.
        after: ObjectId,
    },

    /// The command was asked to apply or undo twice in a row
    #[error("{command}: {reason}")]
    InvalidState {
        /// Display name of the failing command.
        command: String,
        /// What was inconsistent.
        reason: String,
    },

    /// The repository rejected the change
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Command history error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// History must keep at least one entry
    #[error("Maximum history size must be > 0")]
    InvalidMaxSize,

    /// The command being executed, undone or redone failed
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Main error type for QuadCanvas
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Spatial index error
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Repository error
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// History error
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error reports an id that was expected but absent
    pub fn is_missing_object(&self) -> bool {
        matches!(
            self,
            Error::Repository(RepositoryError::NotFound { .. })
                | Error::Command(CommandError::MissingTarget { .. })
                | Error::History(HistoryError::Command(CommandError::MissingTarget { .. }))
        )
    }

    /// Check if this error reports a duplicate id
    pub fn is_duplicate_id(&self) -> bool {
        matches!(
            self,
            Error::Repository(RepositoryError::DuplicateId { .. })
                | Error::Command(CommandError::Repository(RepositoryError::DuplicateId { .. }))
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
