//! Reads and book creation. Nothing here touches relationship state.

use std::sync::Arc;

use marginalia_model::{Book, BookFilter, NewBook, Note, ObjectId};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::application::unit_of_work::AppUnitOfWork;
use crate::database::ports::{books::BookRepository, notes::NoteRepository};
use crate::error::{Result, TrackerError};

/// Raw list-books query parameters. Empty values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
}

impl BookQuery {
    pub fn into_filter(self) -> Result<BookFilter> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        let status = match non_empty(self.status) {
            Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
                TrackerError::InvalidFilter(format!("status must be an integer, got {raw:?}"))
            })?),
            None => None,
        };

        Ok(BookFilter {
            title: non_empty(self.title),
            author: non_empty(self.author),
            status,
        })
    }
}

#[derive(Clone)]
pub struct ReadingCatalog {
    books: Arc<dyn BookRepository>,
    notes: Arc<dyn NoteRepository>,
}

impl std::fmt::Debug for ReadingCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingCatalog").finish_non_exhaustive()
    }
}

impl ReadingCatalog {
    pub fn new(uow: &AppUnitOfWork) -> Self {
        Self::from_ports(Arc::clone(&uow.books), Arc::clone(&uow.notes))
    }

    pub fn from_ports(books: Arc<dyn BookRepository>, notes: Arc<dyn NoteRepository>) -> Self {
        Self { books, notes }
    }

    pub async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let books = self.books.list(filter).await?;
        debug!(count = books.len(), ?filter, "listed books");
        Ok(books)
    }

    pub async fn get_book(&self, id: ObjectId) -> Result<Book> {
        self.books
            .get(id)
            .await?
            .ok_or_else(|| TrackerError::book_not_found(id))
    }

    /// Store a new book with no notes and return its id.
    pub async fn create_book(&self, new: NewBook) -> Result<ObjectId> {
        let book = Book::create(new);
        self.books.insert(&book).await?;
        info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book.id)
    }

    pub async fn get_note(&self, id: ObjectId) -> Result<Note> {
        self.notes
            .get(id)
            .await?
            .ok_or_else(|| TrackerError::note_not_found(id))
    }

    /// The book's notes in attachment order. A reference whose note document
    /// is missing yields `Note::default()` in its slot.
    pub async fn list_notes_by_book(&self, book_id: ObjectId) -> Result<Vec<Note>> {
        let book = self.get_book(book_id).await?;

        let mut notes = Vec::with_capacity(book.notes.len());
        for note_id in &book.notes {
            match self.notes.get(*note_id).await? {
                Some(note) => notes.push(note),
                None => {
                    warn!(book_id = %book_id, note_id = %note_id, "book references a missing note");
                    notes.push(Note::default());
                }
            }
        }
        Ok(notes)
    }
}
