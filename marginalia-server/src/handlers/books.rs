use axum::extract::{Path, State};
use axum::response::Json;
use tracing::info;

use marginalia_core::{
    api::{ApiResponse, DeleteRequest},
    domain::{catalog::BookQuery, decode_id, editing::EditRequest},
};
use marginalia_model::{Book, BookPatch, NewBook, ObjectId};

use crate::infra::{
    app_state::AppState,
    errors::AppResult,
    extract::{ApiJson, ApiQuery},
};

/// `GET /api/v1/book`
pub async fn list_books(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let filter = query.into_filter()?;
    let books = state.catalog().list_books(&filter).await?;
    Ok(Json(ApiResponse::success(books)))
}

/// `GET /api/v1/book/{bookid}`
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let id = decode_id(&book_id)?;
    let book = state.catalog().get_book(id).await?;
    Ok(Json(ApiResponse::success(book)))
}

/// `POST /api/v1/book`
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(new_book): ApiJson<NewBook>,
) -> AppResult<Json<ApiResponse<ObjectId>>> {
    let id = state.catalog().create_book(new_book).await?;
    Ok(Json(ApiResponse::success(id)))
}

/// `DELETE /api/v1/book`: removes the book and every note it owns.
pub async fn delete_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DeleteRequest>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let id = decode_id(&request.id)?;
    let deleted = state.relationships().delete_book(id).await?;
    info!(book_id = %id, deleted, "book delete handled");
    Ok(Json(ApiResponse::success(deleted)))
}

/// `POST /api/v1/book/{bookid}`
pub async fn edit_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    ApiJson(request): ApiJson<EditRequest<BookPatch>>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let path_id = decode_id(&book_id)?;
    request.addressed_to(path_id)?;
    let book = state.editing().edit_book(&request).await?;
    Ok(Json(ApiResponse::success(book)))
}
