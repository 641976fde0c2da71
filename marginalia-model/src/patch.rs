//! Sparse patches for partial edits.
//!
//! Every editable field is optional; only present fields are written. On the
//! wire an empty string is read as "not provided", so a patch can never clear a
//! text field back to empty.

use chrono::{DateTime, Utc};

use crate::{book::Book, ids::ObjectId, note::Note};

/// A typed value destined for a single stored field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Timestamp(DateTime<Utc>),
    Identifier(ObjectId),
}

/// One `field = value` pair of a targeted update. `field` is the storage
/// column name and always comes from a fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: &'static str,
    pub value: FieldValue,
}

impl FieldAssignment {
    fn new(field: &'static str, value: FieldValue) -> Self {
        Self { field, value }
    }
}

/// Editable subset of [`Book`]. Relationship state (`notes`) is not editable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct BookPatch {
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub title: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub author: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub status: Option<i32>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub end_time: Option<DateTime<Utc>>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Column assignments for every present field, in declaration order.
    pub fn assignments(&self) -> Vec<FieldAssignment> {
        let mut out = Vec::new();
        if let Some(title) = &self.title {
            out.push(FieldAssignment::new("title", FieldValue::Text(title.clone())));
        }
        if let Some(author) = &self.author {
            out.push(FieldAssignment::new("author", FieldValue::Text(author.clone())));
        }
        if let Some(description) = &self.description {
            out.push(FieldAssignment::new(
                "description",
                FieldValue::Text(description.clone()),
            ));
        }
        if let Some(status) = self.status {
            out.push(FieldAssignment::new("status", FieldValue::Integer(status)));
        }
        if let Some(start) = self.start_time {
            out.push(FieldAssignment::new("start_time", FieldValue::Timestamp(start)));
        }
        if let Some(end) = self.end_time {
            out.push(FieldAssignment::new("end_time", FieldValue::Timestamp(end)));
        }
        out
    }

    /// Apply in place. Returns whether any stored value changed.
    pub fn apply_to(&self, book: &mut Book) -> bool {
        let before = book.clone();
        if let Some(title) = &self.title {
            book.title.clone_from(title);
        }
        if let Some(author) = &self.author {
            book.author.clone_from(author);
        }
        if let Some(description) = &self.description {
            book.description.clone_from(description);
        }
        if let Some(status) = self.status {
            book.status = status;
        }
        if let Some(start) = self.start_time {
            book.start_time = Some(start);
        }
        if let Some(end) = self.end_time {
            book.end_time = Some(end);
        }
        *book != before
    }
}

/// Editable subset of [`Note`]. The owning book is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct NotePatch {
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub content: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "crate::serde_helpers::empty_as_none",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub reply_to: Option<ObjectId>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.reply_to.is_none()
    }

    pub fn assignments(&self) -> Vec<FieldAssignment> {
        let mut out = Vec::new();
        if let Some(content) = &self.content {
            out.push(FieldAssignment::new("content", FieldValue::Text(content.clone())));
        }
        if let Some(reply_to) = self.reply_to {
            out.push(FieldAssignment::new("reply_to", FieldValue::Identifier(reply_to)));
        }
        out
    }

    pub fn apply_to(&self, note: &mut Note) -> bool {
        let before = note.clone();
        if let Some(content) = &self.content {
            note.content.clone_from(content);
        }
        if let Some(reply_to) = self.reply_to {
            note.reply_to = Some(reply_to);
        }
        *note != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::NewBook;

    #[test]
    fn only_present_fields_are_assigned() {
        let patch = BookPatch {
            author: Some("Frank Herbert".into()),
            status: Some(2),
            ..BookPatch::default()
        };
        let fields: Vec<_> = patch.assignments().iter().map(|a| a.field).collect();
        assert_eq!(fields, ["author", "status"]);
        assert!(BookPatch::default().is_empty());
    }

    #[test]
    fn apply_leaves_absent_fields_untouched() {
        let mut book = Book::create(NewBook {
            title: "Dune".into(),
            author: "Herbert".into(),
            description: "spice".into(),
            ..NewBook::default()
        });
        let patch = BookPatch {
            description: Some("desert planet".into()),
            ..BookPatch::default()
        };
        assert!(patch.apply_to(&mut book));
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Herbert");
        assert_eq!(book.description, "desert planet");
        assert!(!patch.apply_to(&mut book));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn empty_strings_deserialize_as_absent() {
        let patch: BookPatch = serde_json::from_str(
            r#"{"title": "", "author": "Herbert", "status": "", "notes": [], "endTime": null}"#,
        )
        .unwrap();
        assert_eq!(
            patch,
            BookPatch {
                author: Some("Herbert".into()),
                ..BookPatch::default()
            }
        );

        let patch: NotePatch =
            serde_json::from_str(r#"{"content": "", "replyTo": ""}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn note_patch_reads_reply_target() {
        let patch: NotePatch = serde_json::from_str(
            r#"{"content": "see ch2", "replyTo": "5f1d7a3b9c0e4d2a1b3c4d5e", "bookID": "5f1d7a3b9c0e4d2a1b3c4d5f"}"#,
        )
        .unwrap();
        assert_eq!(patch.content.as_deref(), Some("see ch2"));
        assert_eq!(
            patch.reply_to,
            Some(ObjectId::parse_str("5f1d7a3b9c0e4d2a1b3c4d5e").unwrap())
        );
        assert_eq!(patch.assignments().len(), 2);
    }
}
