use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::infrastructure::memory::{InMemoryBookRepository, InMemoryNoteRepository};
#[cfg(feature = "database")]
use crate::database::postgres::PostgresDatabase;
use crate::database::ports::{books::BookRepository, notes::NoteRepository};

/// Aggregates the repository ports used by the domain services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub books: Arc<dyn BookRepository>,
    pub notes: Arc<dyn NoteRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("books", &type_name_of_val(self.books.as_ref()))
            .field("notes", &type_name_of_val(self.notes.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    pub fn builder() -> AppUnitOfWorkBuilder {
        AppUnitOfWorkBuilder::new()
    }

    /// Compose the unit of work from the Postgres adapters.
    #[cfg(feature = "database")]
    pub fn from_postgres(postgres: &PostgresDatabase) -> Self {
        Self {
            books: Arc::new(postgres.books()),
            notes: Arc::new(postgres.notes()),
        }
    }

    /// Compose the unit of work from fresh, empty in-memory adapters.
    pub fn in_memory() -> Self {
        Self {
            books: Arc::new(InMemoryBookRepository::new()),
            notes: Arc::new(InMemoryNoteRepository::new()),
        }
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    books: Option<Arc<dyn BookRepository>>,
    notes: Option<Arc<dyn NoteRepository>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("books", &self.books.is_some())
            .field("notes", &self.notes.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(mut self, repo: Arc<dyn BookRepository>) -> Self {
        self.books = Some(repo);
        self
    }

    pub fn with_notes(mut self, repo: Arc<dyn NoteRepository>) -> Self {
        self.notes = Some(repo);
        self
    }

    /// Build a validated AppUnitOfWork. Returns a string error if any required
    /// repository is missing.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            books: self
                .books
                .ok_or_else(|| "missing BookRepository".to_string())?,
            notes: self
                .notes
                .ok_or_else(|| "missing NoteRepository".to_string())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_both_ports() {
        let err = AppUnitOfWork::builder()
            .with_books(Arc::new(InMemoryBookRepository::new()))
            .build()
            .unwrap_err();
        assert_eq!(err, "missing NoteRepository");

        let uow = AppUnitOfWork::builder()
            .with_books(Arc::new(InMemoryBookRepository::new()))
            .with_notes(Arc::new(InMemoryNoteRepository::new()))
            .build()
            .unwrap();
        assert!(format!("{uow:?}").contains("BookRepository"));
    }
}
