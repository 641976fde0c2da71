//! Failure-injecting wrappers around the in-memory repositories.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use marginalia_core::application::unit_of_work::AppUnitOfWork;
use marginalia_core::database::infrastructure::memory::{
    InMemoryBookRepository, InMemoryNoteRepository,
};
use marginalia_core::database::ports::{books::BookRepository, notes::NoteRepository};
use marginalia_core::{Result, TrackerError};
use marginalia_model::{Book, BookFilter, BookPatch, Note, NotePatch, ObjectId};

fn injected(operation: &str) -> TrackerError {
    TrackerError::Store(format!("injected {operation} failure"))
}

#[derive(Debug, Default)]
pub struct FlakyBooks {
    pub inner: InMemoryBookRepository,
    pub fail_append: AtomicBool,
    pub fail_detach: AtomicBool,
    pub fail_delete: AtomicBool,
    pub calls: AtomicUsize,
}

impl FlakyBooks {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookRepository for FlakyBooks {
    async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        self.touch();
        self.inner.list(filter).await
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Book>> {
        self.touch();
        self.inner.get(id).await
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        self.touch();
        self.inner.insert(book).await
    }

    async fn update(&self, id: ObjectId, patch: &BookPatch) -> Result<Option<Book>> {
        self.touch();
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        self.touch();
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(injected("book delete"));
        }
        self.inner.delete(id).await
    }

    async fn append_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool> {
        self.touch();
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(injected("append"));
        }
        self.inner.append_note(book_id, note_id).await
    }

    async fn detach_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool> {
        self.touch();
        if self.fail_detach.load(Ordering::SeqCst) {
            return Err(injected("detach"));
        }
        self.inner.detach_note(book_id, note_id).await
    }
}

#[derive(Debug, Default)]
pub struct FlakyNotes {
    pub inner: InMemoryNoteRepository,
    pub fail_insert: AtomicBool,
    pub calls: AtomicUsize,
}

impl FlakyNotes {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NoteRepository for FlakyNotes {
    async fn get(&self, id: ObjectId) -> Result<Option<Note>> {
        self.touch();
        self.inner.get(id).await
    }

    async fn insert(&self, note: &Note) -> Result<()> {
        self.touch();
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(injected("note insert"));
        }
        self.inner.insert(note).await
    }

    async fn update(&self, id: ObjectId, patch: &NotePatch) -> Result<bool> {
        self.touch();
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        self.touch();
        self.inner.delete(id).await
    }

    async fn delete_by_book(&self, book_id: ObjectId) -> Result<u64> {
        self.touch();
        self.inner.delete_by_book(book_id).await
    }
}

/// Shared handles to the wrapped stores plus a unit of work over them.
pub struct Harness {
    pub books: Arc<FlakyBooks>,
    pub notes: Arc<FlakyNotes>,
    pub uow: AppUnitOfWork,
}

impl Harness {
    pub fn new() -> Self {
        let books = Arc::new(FlakyBooks::default());
        let notes = Arc::new(FlakyNotes::default());
        let uow = AppUnitOfWork::builder()
            .with_books(books.clone())
            .with_notes(notes.clone())
            .build()
            .expect("both ports supplied");
        Self { books, notes, uow }
    }

    pub fn store_calls(&self) -> usize {
        self.books.calls() + self.notes.calls()
    }
}
