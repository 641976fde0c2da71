/// Versioned route constants shared by the server and its clients
pub mod routes;

/// Wire envelopes and request payloads
pub mod types;

pub use types::{ApiResponse, CreateNoteRequest, DeleteRequest, NoteQuery};
