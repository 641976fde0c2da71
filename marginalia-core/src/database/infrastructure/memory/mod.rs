//! Process-local adapters backed by ordered maps.
//!
//! Used by the `memory` store backend and by tests. Each call takes the lock
//! for a single collection, so these give the same per-document atomicity as
//! the PostgreSQL adapter and nothing more.

mod books;
mod notes;

pub use books::InMemoryBookRepository;
pub use notes::InMemoryNoteRepository;
