use async_trait::async_trait;
use marginalia_model::{Note, NotePatch, ObjectId};

use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn get(&self, id: ObjectId) -> Result<Option<Note>>;

    async fn insert(&self, note: &Note) -> Result<()>;

    /// Write the present fields of `patch`. Returns whether a note matched.
    async fn update(&self, id: ObjectId, patch: &NotePatch) -> Result<bool>;

    /// Returns the number of notes removed (0 or 1).
    async fn delete(&self, id: ObjectId) -> Result<u64>;

    /// Remove every note owned by `book_id`, returning how many were removed.
    async fn delete_by_book(&self, book_id: ObjectId) -> Result<u64>;
}
