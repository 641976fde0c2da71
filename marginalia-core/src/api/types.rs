use marginalia_model::NewNote;
use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{decode_id, decode_optional_id};
use crate::error::Result;

/// Response envelope: `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Body of `POST /note`. Ids stay as text until [`Self::into_new_note`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(rename = "bookID", default)]
    pub book_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "replyTo", default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl CreateNoteRequest {
    pub fn into_new_note(self) -> Result<NewNote> {
        Ok(NewNote {
            book_id: decode_id(&self.book_id)?,
            reply_to: decode_optional_id(self.reply_to.as_deref())?,
            content: self.content,
        })
    }
}

/// Body of the collection `DELETE` routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub id: String,
}

/// Query of `GET /note`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteQuery {
    #[serde(default)]
    pub bookid: String,
}
