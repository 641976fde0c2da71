use std::fmt;

use marginalia_model::{ModelError, ObjectId};
use thiserror::Error;

/// Which kind of document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Note,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Book => f.write_str("book"),
            EntityKind::Note => f.write_str("note"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Identifier mismatch: path names {path} but body names {body}")]
    IdentifierMismatch { path: ObjectId, body: ObjectId },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: ObjectId },

    /// A note was created against a book that does not exist.
    #[error("book {0} does not exist")]
    BookNotFound(ObjectId),

    /// The note could not be unlinked from its book, so it was left in place.
    #[error("failed to detach note {note_id} from book {book_id}: {reason}")]
    DetachFailed {
        note_id: ObjectId,
        book_id: ObjectId,
        reason: String,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl TrackerError {
    pub fn book_not_found(id: ObjectId) -> Self {
        TrackerError::NotFound {
            kind: EntityKind::Book,
            id,
        }
    }

    pub fn note_not_found(id: ObjectId) -> Self {
        TrackerError::NotFound {
            kind: EntityKind::Note,
            id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TrackerError::NotFound { .. } | TrackerError::BookNotFound(_)
        )
    }
}

impl From<ModelError> for TrackerError {
    fn from(err: ModelError) -> Self {
        TrackerError::InvalidIdentifier(err.to_string())
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for TrackerError {
    fn from(err: sqlx::Error) -> Self {
        TrackerError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
