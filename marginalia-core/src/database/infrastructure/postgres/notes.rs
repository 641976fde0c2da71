use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marginalia_model::{Note, NotePatch, ObjectId};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};

use crate::database::ports::notes::NoteRepository;
use crate::error::{Result, TrackerError};

use super::push_assignments;

#[derive(Debug, Clone)]
pub struct PostgresNoteRepository {
    pool: PgPool,
}

impl PostgresNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Note> {
        let read = |column: &str, e: sqlx::Error| {
            TrackerError::Store(format!("Failed to read note {column}: {e}"))
        };

        let id: ObjectId = row.try_get("id").map_err(|e| read("id", e))?;
        let book_id: ObjectId = row.try_get("book_id").map_err(|e| read("book_id", e))?;
        let content: String = row.try_get("content").map_err(|e| read("content", e))?;
        let reply_to: Option<ObjectId> =
            row.try_get("reply_to").map_err(|e| read("reply_to", e))?;
        let create_time: DateTime<Utc> = row
            .try_get("create_time")
            .map_err(|e| read("create_time", e))?;

        Ok(Note {
            id,
            book_id,
            content,
            reply_to,
            create_time,
        })
    }
}

#[async_trait]
impl NoteRepository for PostgresNoteRepository {
    async fn get(&self, id: ObjectId) -> Result<Option<Note>> {
        let row = sqlx::query(
            "SELECT id, book_id, content, reply_to, create_time FROM note WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| TrackerError::Store(format!("Failed to load note {id}: {e}")))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn insert(&self, note: &Note) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO note (id, book_id, content, reply_to, create_time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(note.id)
        .bind(note.book_id)
        .bind(&note.content)
        .bind(note.reply_to)
        .bind(note.create_time)
        .execute(self.pool())
        .await
        .map_err(|e| TrackerError::Store(format!("Failed to insert note {}: {e}", note.id)))?;

        Ok(())
    }

    async fn update(&self, id: ObjectId, patch: &NotePatch) -> Result<bool> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Ok(self.get(id).await?.is_some());
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE note SET ");
        push_assignments(&mut builder, assignments);
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder
            .build()
            .execute(self.pool())
            .await
            .map_err(|e| TrackerError::Store(format!("Failed to update note {id}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| TrackerError::Store(format!("Failed to delete note {id}: {e}")))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_book(&self, book_id: ObjectId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM note WHERE book_id = $1")
            .bind(book_id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                TrackerError::Store(format!("Failed to delete notes of book {book_id}: {e}"))
            })?;

        Ok(result.rows_affected())
    }
}
