use std::collections::BTreeMap;

use async_trait::async_trait;
use marginalia_model::{Book, BookFilter, BookPatch, ObjectId};
use tokio::sync::RwLock;

use crate::database::ports::books::BookRepository;
use crate::error::{Result, TrackerError};

#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<BTreeMap<ObjectId, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.id) {
            return Err(TrackerError::Store(format!(
                "duplicate key: book {} already exists",
                book.id
            )));
        }
        books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update(&self, id: ObjectId, patch: &BookPatch) -> Result<Option<Book>> {
        let mut books = self.books.write().await;
        Ok(books.get_mut(&id).map(|book| {
            patch.apply_to(book);
            book.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        Ok(u64::from(self.books.write().await.remove(&id).is_some()))
    }

    async fn append_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool> {
        let mut books = self.books.write().await;
        match books.get_mut(&book_id) {
            Some(book) => {
                book.notes.push(note_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn detach_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool> {
        let mut books = self.books.write().await;
        match books.get_mut(&book_id) {
            Some(book) => {
                book.notes.retain(|id| *id != note_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use marginalia_model::NewBook;

    use super::*;

    fn book(title: &str, status: i32) -> Book {
        Book::create(NewBook {
            title: title.into(),
            author: "Le Guin".into(),
            status,
            ..NewBook::default()
        })
    }

    #[tokio::test]
    async fn list_applies_filter_in_id_order() {
        let repo = InMemoryBookRepository::new();
        let first = book("The Dispossessed", 1);
        let second = book("The Lathe of Heaven", 2);
        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        let all = repo.list(&BookFilter::default()).await.unwrap();
        assert_eq!(
            all.iter().map(|b| b.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );

        let reading = repo
            .list(&BookFilter {
                status: Some(2),
                ..BookFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(reading, vec![second]);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_store_error() {
        let repo = InMemoryBookRepository::new();
        let dune = book("Dune", 0);
        repo.insert(&dune).await.unwrap();
        let err = repo.insert(&dune).await.unwrap_err();
        assert!(matches!(err, TrackerError::Store(_)));
    }

    #[tokio::test]
    async fn detach_removes_every_occurrence() {
        let repo = InMemoryBookRepository::new();
        let dune = book("Dune", 0);
        repo.insert(&dune).await.unwrap();
        let note = ObjectId::new();
        let other = ObjectId::new();

        assert!(repo.append_note(dune.id, note).await.unwrap());
        assert!(repo.append_note(dune.id, other).await.unwrap());
        assert!(repo.append_note(dune.id, note).await.unwrap());
        assert!(repo.detach_note(dune.id, note).await.unwrap());

        let stored = repo.get(dune.id).await.unwrap().unwrap();
        assert_eq!(stored.notes, vec![other]);
        assert!(!repo.append_note(ObjectId::new(), note).await.unwrap());
        assert!(!repo.detach_note(ObjectId::new(), note).await.unwrap());
    }
}
