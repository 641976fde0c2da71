use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marginalia_model::{Book, BookFilter, BookPatch, ObjectId};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};

use crate::database::ports::books::BookRepository;
use crate::error::{Result, TrackerError};

use super::push_assignments;

const BOOK_COLUMNS: &str =
    "id, title, author, status, start_time, end_time, notes, description";

#[derive(Debug, Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Book> {
        let read = |column: &str, e: sqlx::Error| {
            TrackerError::Store(format!("Failed to read book {column}: {e}"))
        };

        let id: ObjectId = row.try_get("id").map_err(|e| read("id", e))?;
        let title: String = row.try_get("title").map_err(|e| read("title", e))?;
        let author: String = row.try_get("author").map_err(|e| read("author", e))?;
        let status: i32 = row.try_get("status").map_err(|e| read("status", e))?;
        let start_time: Option<DateTime<Utc>> = row
            .try_get("start_time")
            .map_err(|e| read("start_time", e))?;
        let end_time: Option<DateTime<Utc>> =
            row.try_get("end_time").map_err(|e| read("end_time", e))?;
        let notes: Vec<ObjectId> = row.try_get("notes").map_err(|e| read("notes", e))?;
        let description: String = row
            .try_get("description")
            .map_err(|e| read("description", e))?;

        Ok(Book {
            id,
            title,
            author,
            status,
            start_time,
            end_time,
            notes,
            description,
        })
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {BOOK_COLUMNS} FROM book WHERE TRUE"));
        if let Some(title) = &filter.title {
            builder.push(" AND title = ").push_bind(title);
        }
        if let Some(author) = &filter.author {
            builder.push(" AND author = ").push_bind(author);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(|e| TrackerError::Store(format!("Failed to list books: {e}")))?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Book>> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM book WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| TrackerError::Store(format!("Failed to load book {id}: {e}")))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn insert(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO book (id, title, author, status, start_time, end_time, notes, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.status)
        .bind(book.start_time)
        .bind(book.end_time)
        .bind(&book.notes)
        .bind(&book.description)
        .execute(self.pool())
        .await
        .map_err(|e| TrackerError::Store(format!("Failed to insert book {}: {e}", book.id)))?;

        Ok(())
    }

    async fn update(&self, id: ObjectId, patch: &BookPatch) -> Result<Option<Book>> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return self.get(id).await;
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE book SET ");
        push_assignments(&mut builder, assignments);
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(format!(" RETURNING {BOOK_COLUMNS}"));

        let row = builder
            .build()
            .fetch_optional(self.pool())
            .await
            .map_err(|e| TrackerError::Store(format!("Failed to update book {id}: {e}")))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM book WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| TrackerError::Store(format!("Failed to delete book {id}: {e}")))?;

        Ok(result.rows_affected())
    }

    async fn append_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool> {
        let result =
            sqlx::query("UPDATE book SET notes = array_append(notes, $2) WHERE id = $1")
                .bind(book_id)
                .bind(note_id)
                .execute(self.pool())
                .await
                .map_err(|e| {
                    TrackerError::Store(format!(
                        "Failed to append note {note_id} to book {book_id}: {e}"
                    ))
                })?;

        Ok(result.rows_affected() > 0)
    }

    async fn detach_note(&self, book_id: ObjectId, note_id: ObjectId) -> Result<bool> {
        let result =
            sqlx::query("UPDATE book SET notes = array_remove(notes, $2) WHERE id = $1")
                .bind(book_id)
                .bind(note_id)
                .execute(self.pool())
                .await
                .map_err(|e| {
                    TrackerError::Store(format!(
                        "Failed to detach note {note_id} from book {book_id}: {e}"
                    ))
                })?;

        Ok(result.rows_affected() > 0)
    }
}
