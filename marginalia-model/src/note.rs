use chrono::{DateTime, Utc};

use crate::ids::ObjectId;

/// A note attached to exactly one book.
///
/// `Note::default()` is the zero-valued placeholder returned for a book
/// reference whose note document cannot be found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Note {
    pub id: ObjectId,
    #[cfg_attr(feature = "serde", serde(rename = "bookID"))]
    pub book_id: ObjectId,
    pub content: String,
    pub reply_to: Option<ObjectId>,
    pub create_time: DateTime<Utc>,
}

impl Note {
    /// Materialize a new note with a freshly minted id, stamped now.
    pub fn create(new: NewNote) -> Self {
        let create_time = Utc::now();
        Self {
            id: ObjectId::with_timestamp(create_time),
            book_id: new.book_id,
            content: new.content,
            reply_to: new.reply_to,
            create_time,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_nil()
    }
}

/// Decoded input for attaching a note to a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub book_id: ObjectId,
    pub content: String,
    pub reply_to: Option<ObjectId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_stamps_id_and_time() {
        let book_id = ObjectId::new();
        let note = Note::create(NewNote {
            book_id,
            content: "ch1".into(),
            reply_to: None,
        });
        assert_eq!(note.book_id, book_id);
        assert_eq!(note.id.timestamp().timestamp(), note.create_time.timestamp());
        assert!(!note.is_placeholder());
        assert!(Note::default().is_placeholder());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn book_id_uses_original_field_name() {
        let note = Note::create(NewNote {
            book_id: ObjectId::from_bytes([1; 12]),
            content: String::new(),
            reply_to: None,
        });
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["bookID"], "010101010101010101010101");
        assert!(value["replyTo"].is_null());
        assert!(value.get("createTime").is_some());
    }
}
