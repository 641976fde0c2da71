//! Keeps a book's `notes` list consistent with the note documents.
//!
//! Creation appends the reference before inserting the note and rolls the
//! reference back if the insert fails. Deletion detaches the reference before
//! removing the note. Deleting a book removes its notes first.

use std::sync::Arc;

use async_trait::async_trait;
use marginalia_model::{NewNote, Note, ObjectId};
use tracing::{debug, error, info, warn};

use crate::application::unit_of_work::AppUnitOfWork;
use crate::database::ports::{books::BookRepository, notes::NoteRepository};
use crate::domain::saga::{Saga, SagaStep};
use crate::error::{Result, TrackerError};

#[derive(Clone)]
pub struct RelationshipMaintainer {
    books: Arc<dyn BookRepository>,
    notes: Arc<dyn NoteRepository>,
}

impl std::fmt::Debug for RelationshipMaintainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipMaintainer").finish_non_exhaustive()
    }
}

impl RelationshipMaintainer {
    pub fn new(uow: &AppUnitOfWork) -> Self {
        Self::from_ports(Arc::clone(&uow.books), Arc::clone(&uow.notes))
    }

    pub fn from_ports(books: Arc<dyn BookRepository>, notes: Arc<dyn NoteRepository>) -> Self {
        Self { books, notes }
    }

    /// Attach a new note to an existing book and return the stored note.
    pub async fn create_note(&self, new: NewNote) -> Result<Note> {
        let note = Note::create(new);

        let outcome = Saga::new("create_note")
            .step(AppendNoteReference {
                books: self.books.as_ref(),
                book_id: note.book_id,
                note_id: note.id,
            })
            .step(InsertNote {
                notes: self.notes.as_ref(),
                note: &note,
            })
            .run()
            .await;

        match outcome {
            Ok(()) => {
                info!(book_id = %note.book_id, note_id = %note.id, "note attached");
                Ok(note)
            }
            Err(failure) => {
                if !failure.is_fully_compensated() {
                    error!(
                        book_id = %note.book_id,
                        note_id = %note.id,
                        "dangling note reference left on book; repair manually"
                    );
                }
                Err(failure.into_error())
            }
        }
    }

    /// Detach a note from its book, then remove it. Returns the number of
    /// notes deleted.
    pub async fn delete_note(&self, note_id: ObjectId) -> Result<u64> {
        let note = self
            .notes
            .get(note_id)
            .await?
            .ok_or_else(|| TrackerError::note_not_found(note_id))?;

        match self.books.detach_note(note.book_id, note.id).await {
            Ok(true) => {
                debug!(book_id = %note.book_id, note_id = %note.id, "note reference detached");
            }
            Ok(false) => {
                warn!(
                    book_id = %note.book_id,
                    note_id = %note.id,
                    "owning book is gone; deleting orphaned note"
                );
            }
            Err(err) => {
                warn!(
                    book_id = %note.book_id,
                    note_id = %note.id,
                    error = %err,
                    "detach failed; note left in place"
                );
                return Err(TrackerError::DetachFailed {
                    note_id: note.id,
                    book_id: note.book_id,
                    reason: err.to_string(),
                });
            }
        }

        let deleted = self.notes.delete(note.id).await?;
        info!(note_id = %note.id, deleted, "note deleted");
        Ok(deleted)
    }

    /// Remove every note owned by the book, then the book itself. Returns the
    /// number of books deleted (0 when the book did not exist).
    pub async fn delete_book(&self, book_id: ObjectId) -> Result<u64> {
        let notes_deleted = self.notes.delete_by_book(book_id).await?;

        match self.books.delete(book_id).await {
            Ok(deleted) => {
                info!(book_id = %book_id, notes_deleted, deleted, "book deleted");
                Ok(deleted)
            }
            Err(err) => {
                error!(
                    book_id = %book_id,
                    notes_deleted,
                    error = %err,
                    "book delete failed after its notes were removed"
                );
                Err(err)
            }
        }
    }
}

struct AppendNoteReference<'a> {
    books: &'a dyn BookRepository,
    book_id: ObjectId,
    note_id: ObjectId,
}

#[async_trait]
impl SagaStep for AppendNoteReference<'_> {
    fn name(&self) -> &'static str {
        "append_note_reference"
    }

    async fn execute(&self) -> Result<()> {
        if self.books.append_note(self.book_id, self.note_id).await? {
            Ok(())
        } else {
            Err(TrackerError::BookNotFound(self.book_id))
        }
    }

    async fn compensate(&self) -> Result<()> {
        if !self.books.detach_note(self.book_id, self.note_id).await? {
            // Nothing left to hold the reference.
            warn!(book_id = %self.book_id, "book vanished before rollback");
        }
        Ok(())
    }
}

struct InsertNote<'a> {
    notes: &'a dyn NoteRepository,
    note: &'a Note,
}

#[async_trait]
impl SagaStep for InsertNote<'_> {
    fn name(&self) -> &'static str {
        "insert_note"
    }

    async fn execute(&self) -> Result<()> {
        self.notes.insert(self.note).await
    }
}
