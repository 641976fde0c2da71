//! PostgreSQL infrastructure adapters implementing the database ports.

mod books;
mod notes;

pub use books::PostgresBookRepository;
pub use notes::PostgresNoteRepository;

use marginalia_model::{FieldAssignment, FieldValue};
use sqlx::{Postgres, QueryBuilder};

/// Append `column = $n` pairs for each assignment, comma separated.
fn push_assignments<'args>(
    builder: &mut QueryBuilder<'args, Postgres>,
    assignments: Vec<FieldAssignment>,
) {
    let mut set = builder.separated(", ");
    for assignment in assignments {
        set.push(assignment.field);
        set.push_unseparated(" = ");
        match assignment.value {
            FieldValue::Text(text) => set.push_bind_unseparated(text),
            FieldValue::Integer(value) => set.push_bind_unseparated(value),
            FieldValue::Timestamp(at) => set.push_bind_unseparated(at),
            FieldValue::Identifier(id) => set.push_bind_unseparated(id),
        };
    }
}
