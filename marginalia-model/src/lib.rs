//! Core data model definitions shared across Marginalia crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod book;
pub mod error;
pub mod ids;
pub mod note;
pub mod patch;
#[cfg(feature = "serde")]
pub mod serde_helpers;

pub use book::{Book, BookFilter, NewBook};
pub use error::{ModelError, Result as ModelResult};
pub use ids::ObjectId;
pub use note::{NewNote, Note};
pub use patch::{BookPatch, FieldAssignment, FieldValue, NotePatch};
