//! Sparse edits of a single book or note.
//!
//! An edit never touches relationship state: the patch types carry no
//! `notes` or `bookID` field, so those keys are dropped while binding.

use std::sync::Arc;

use marginalia_model::{Book, BookPatch, NotePatch, ObjectId};
use serde::Deserialize;
use tracing::debug;

use crate::application::unit_of_work::AppUnitOfWork;
use crate::database::ports::{books::BookRepository, notes::NoteRepository};
use crate::domain::identifiers::{decode_id, decode_optional_id};
use crate::error::{Result, TrackerError};

/// An edit payload: the target `id` plus the fields to change.
///
/// A missing `id` binds as empty and then fails to decode, so it reports
/// `InvalidIdentifier` like any other malformed id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditRequest<P> {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub patch: P,
}

impl<P> EditRequest<P> {
    pub fn target(&self) -> Result<ObjectId> {
        decode_id(&self.id)
    }

    /// Decode the body id and require it to equal `path_id`.
    pub fn addressed_to(&self, path_id: ObjectId) -> Result<ObjectId> {
        let body_id = self.target()?;
        if body_id != path_id {
            return Err(TrackerError::IdentifierMismatch {
                path: path_id,
                body: body_id,
            });
        }
        Ok(body_id)
    }
}

/// Note fields as a client sends them. `replyTo` stays text until
/// [`NoteEdit::decode`] so a malformed reference reports `InvalidIdentifier`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteEdit {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "replyTo", default)]
    pub reply_to: Option<String>,
}

impl NoteEdit {
    /// `""` and `null` both leave a field untouched.
    pub fn decode(&self) -> Result<NotePatch> {
        Ok(NotePatch {
            content: self.content.clone().filter(|content| !content.is_empty()),
            reply_to: decode_optional_id(self.reply_to.as_deref())?,
        })
    }
}

#[derive(Clone)]
pub struct PartialUpdateTranslator {
    books: Arc<dyn BookRepository>,
    notes: Arc<dyn NoteRepository>,
}

impl std::fmt::Debug for PartialUpdateTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialUpdateTranslator").finish_non_exhaustive()
    }
}

impl PartialUpdateTranslator {
    pub fn new(uow: &AppUnitOfWork) -> Self {
        Self::from_ports(Arc::clone(&uow.books), Arc::clone(&uow.notes))
    }

    pub fn from_ports(books: Arc<dyn BookRepository>, notes: Arc<dyn NoteRepository>) -> Self {
        Self { books, notes }
    }

    /// Apply the present fields and return the book as stored afterwards.
    pub async fn edit_book(&self, request: &EditRequest<BookPatch>) -> Result<Book> {
        let id = request.target()?;
        let patch = &request.patch;

        let updated = if patch.is_empty() {
            debug!(book_id = %id, "empty book patch; nothing to write");
            self.books.get(id).await?
        } else {
            let fields: Vec<_> = patch.assignments().iter().map(|a| a.field).collect();
            debug!(book_id = %id, ?fields, "updating book");
            self.books.update(id, patch).await?
        };

        updated.ok_or_else(|| TrackerError::book_not_found(id))
    }

    /// Apply the present fields. Returns the number of notes modified, which
    /// is 0 when the patch carried nothing to write.
    pub async fn edit_note(&self, request: &EditRequest<NoteEdit>) -> Result<u64> {
        let id = request.target()?;
        let patch = request.patch.decode()?;

        if patch.is_empty() {
            debug!(note_id = %id, "empty note patch; nothing to write");
            return match self.notes.get(id).await? {
                Some(_) => Ok(0),
                None => Err(TrackerError::note_not_found(id)),
            };
        }

        let fields: Vec<_> = patch.assignments().iter().map(|a| a.field).collect();
        debug!(note_id = %id, ?fields, "updating note");
        if self.notes.update(id, &patch).await? {
            Ok(1)
        } else {
            Err(TrackerError::note_not_found(id))
        }
    }
}
