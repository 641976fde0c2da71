use std::collections::BTreeMap;

use async_trait::async_trait;
use marginalia_model::{Note, NotePatch, ObjectId};
use tokio::sync::RwLock;

use crate::database::ports::notes::NoteRepository;
use crate::error::{Result, TrackerError};

#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    notes: RwLock<BTreeMap<ObjectId, Note>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes owned by `book_id`, ordered by id.
    pub async fn owned_by(&self, book_id: ObjectId) -> Vec<Note> {
        self.notes
            .read()
            .await
            .values()
            .filter(|note| note.book_id == book_id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn get(&self, id: ObjectId) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(&id).cloned())
    }

    async fn insert(&self, note: &Note) -> Result<()> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(TrackerError::Store(format!(
                "duplicate key: note {} already exists",
                note.id
            )));
        }
        notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn update(&self, id: ObjectId, patch: &NotePatch) -> Result<bool> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&id) {
            Some(note) => {
                patch.apply_to(note);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        Ok(u64::from(self.notes.write().await.remove(&id).is_some()))
    }

    async fn delete_by_book(&self, book_id: ObjectId) -> Result<u64> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|_, note| note.book_id != book_id);
        Ok((before - notes.len()) as u64)
    }
}
