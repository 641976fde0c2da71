use async_trait::async_trait;
use marginalia_model::{Book, BookFilter, BookPatch, ObjectId};

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Every book matching `filter`, ordered by id.
    async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>>;

    async fn get(&self, id: ObjectId) -> Result<Option<Book>>;

    async fn insert(&self, book: &Book) -> Result<()>;

    /// Write the present fields of `patch` and return the post-update book,
    /// or `None` when no book has this id.
    async fn update(&self, id: ObjectId, patch: &BookPatch) -> Result<Option<Book>>;

    /// Returns the number of books removed (0 or 1).
    async fn delete(&self, id: ObjectId) -> Result<u64>;

    /// Push `note_id` onto the end of the book's `notes`. Returns `false` when
    /// the book does not exist.
    async fn append_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool>;

    /// Remove every occurrence of `note_id` from the book's `notes`. Returns
    /// `false` when the book does not exist; a book that never referenced the
    /// note still counts as matched.
    async fn detach_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool>;
}
