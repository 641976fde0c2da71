use axum::{Router, routing::get};

use marginalia_core::api::routes::v1;

use crate::{
    AppState,
    handlers::{books, notes},
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            v1::books::COLLECTION,
            get(books::list_books)
                .post(books::create_book)
                .delete(books::delete_book),
        )
        .route(
            v1::books::ITEM,
            get(books::get_book).post(books::edit_book),
        )
        .route(
            v1::notes::COLLECTION,
            get(notes::list_notes)
                .post(notes::create_note)
                .delete(notes::delete_note),
        )
        .route(
            v1::notes::ITEM,
            get(notes::get_note).post(notes::edit_note),
        )
}
