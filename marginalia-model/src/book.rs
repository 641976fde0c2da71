use chrono::{DateTime, Utc};

use crate::ids::ObjectId;

/// A tracked book and the ordered references to its notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Book {
    pub id: ObjectId,
    pub title: String,
    pub author: String,
    pub status: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Note identifiers in attachment order. Every entry must name a note whose
    /// `book_id` is this book.
    pub notes: Vec<ObjectId>,
    pub description: String,
}

impl Book {
    /// Materialize a new book with a freshly minted id and no notes.
    pub fn create(new: NewBook) -> Self {
        Self {
            id: ObjectId::new(),
            title: new.title,
            author: new.author,
            status: new.status,
            start_time: new.start_time,
            end_time: new.end_time,
            notes: Vec::new(),
            description: new.description,
        }
    }

    pub fn references(&self, note_id: ObjectId) -> bool {
        self.notes.contains(&note_id)
    }
}

/// Client payload for creating a book. Any `id` or `notes` the client sends
/// is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub status: i32,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::serde_helpers::empty_as_none")
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::serde_helpers::empty_as_none")
    )]
    pub end_time: Option<DateTime<Utc>>,
    pub description: String,
}

/// Conjunctive exact-match filter used when listing books. Unset fields do
/// not constrain the result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<i32>,
}

impl BookFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.status.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.title.as_ref().is_none_or(|title| *title == book.title)
            && self.author.as_ref().is_none_or(|author| *author == book.author)
            && self.status.is_none_or(|status| status == book.status)
    }
}
