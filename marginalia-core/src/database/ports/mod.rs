//! Repository ports (interfaces) for the two document collections.
//!
//! Each port covers exactly one collection; nothing here spans both. Keeping
//! the book's `notes` list consistent with the note documents is the job of
//! [`crate::domain::relationships`].

pub mod books;
pub mod notes;
