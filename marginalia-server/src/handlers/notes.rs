use axum::extract::{Path, State};
use axum::response::Json;

use marginalia_core::{
    api::{ApiResponse, CreateNoteRequest, DeleteRequest, NoteQuery},
    domain::{
        decode_id,
        editing::{EditRequest, NoteEdit},
    },
};
use marginalia_model::{Note, ObjectId};

use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{ApiJson, ApiQuery},
};

/// `GET /api/v1/note?bookid=`
pub async fn list_notes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NoteQuery>,
) -> AppResult<Json<ApiResponse<Vec<Note>>>> {
    let book_id = decode_id(&query.bookid)?;
    let notes = state.catalog().list_notes_by_book(book_id).await?;
    Ok(Json(ApiResponse::success(notes)))
}

/// `GET /api/v1/note/{noteid}`
pub async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> AppResult<Json<ApiResponse<Note>>> {
    let id = decode_id(&note_id)?;
    let note = state.catalog().get_note(id).await?;
    Ok(Json(ApiResponse::success(note)))
}

/// `POST /api/v1/note`
pub async fn create_note(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateNoteRequest>,
) -> AppResult<Json<ApiResponse<ObjectId>>> {
    let new_note = request.into_new_note()?;
    let note = state.relationships().create_note(new_note).await?;
    Ok(Json(ApiResponse::success(note.id)))
}

/// `DELETE /api/v1/note`
pub async fn delete_note(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DeleteRequest>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let id = decode_id(&request.id)?;
    let deleted = state.relationships().delete_note(id).await?;
    Ok(Json(ApiResponse::success(deleted)))
}

/// `POST /api/v1/note/{noteid}`
pub async fn edit_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    ApiJson(request): ApiJson<EditRequest<NoteEdit>>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let path_id = decode_id(&note_id)?;
    request.addressed_to(path_id)?;
    let modified = state.editing().edit_note(&request).await?;
    Ok(Json(ApiResponse::success(modified)))
}
