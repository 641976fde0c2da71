#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum_test::TestServer;
use marginalia_core::application::unit_of_work::AppUnitOfWork;
use marginalia_core::database::StoreContext;
use marginalia_core::database::infrastructure::memory::{
    InMemoryBookRepository, InMemoryNoteRepository,
};
use marginalia_core::database::ports::books::BookRepository;
use marginalia_core::{TrackerError, api::routes::v1};
use marginalia_model::{Book, BookFilter, BookPatch, ObjectId};
use marginalia_server::{AppState, app::create_app, infra::config::Config};
use serde_json::{Value, json};

pub fn build_test_server(store: StoreContext) -> Result<(TestServer, AppState)> {
    let state = AppState::new(Config::development(), store);
    let router = create_app(state.clone());
    let make_service = router.into_make_service_with_connect_info::<SocketAddr>();
    let server = TestServer::builder()
        .http_transport()
        .build(make_service)
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok((server, state))
}

pub fn build_memory_server() -> Result<(TestServer, AppState)> {
    build_test_server(StoreContext::in_memory())
}

pub async fn create_book(server: &TestServer, title: &str, author: &str, status: i32) -> String {
    let response = server
        .post(v1::books::COLLECTION)
        .json(&json!({ "title": title, "author": author, "status": status }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]
        .as_str()
        .unwrap_or_else(|| panic!("create book returned no id: {body}"))
        .to_string()
}

pub async fn create_note(server: &TestServer, book_id: &str, content: &str) -> String {
    let response = server
        .post(v1::notes::COLLECTION)
        .json(&json!({ "bookID": book_id, "content": content }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]
        .as_str()
        .unwrap_or_else(|| panic!("create note returned no id: {body}"))
        .to_string()
}

/// Book store whose `detach_note` can be switched to fail.
#[derive(Debug, Default)]
pub struct DetachFailingBooks {
    pub inner: InMemoryBookRepository,
    pub fail_detach: AtomicBool,
}

#[async_trait]
impl BookRepository for DetachFailingBooks {
    async fn list(&self, filter: &BookFilter) -> marginalia_core::Result<Vec<Book>> {
        self.inner.list(filter).await
    }

    async fn get(&self, id: ObjectId) -> marginalia_core::Result<Option<Book>> {
        self.inner.get(id).await
    }

    async fn insert(&self, book: &Book) -> marginalia_core::Result<()> {
        self.inner.insert(book).await
    }

    async fn update(
        &self,
        id: ObjectId,
        patch: &BookPatch,
    ) -> marginalia_core::Result<Option<Book>> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: ObjectId) -> marginalia_core::Result<u64> {
        self.inner.delete(id).await
    }

    async fn append_note(&self, book_id: ObjectId, note_id: ObjectId) -> marginalia_core::Result<bool> {
        self.inner.append_note(book_id, note_id).await
    }

    async fn detach_note(&self, book_id: ObjectId, note_id: ObjectId) -> marginalia_core::Result<bool> {
        if self.fail_detach.load(Ordering::SeqCst) {
            return Err(TrackerError::Store("injected detach failure".into()));
        }
        self.inner.detach_note(book_id, note_id).await
    }
}

pub fn detach_failing_store() -> Result<(StoreContext, Arc<DetachFailingBooks>)> {
    let books = Arc::new(DetachFailingBooks::default());
    let unit_of_work = AppUnitOfWork::builder()
        .with_books(books.clone())
        .with_notes(Arc::new(InMemoryNoteRepository::default()))
        .build()
        .map_err(|err| anyhow!(err))?;
    Ok((StoreContext::from_unit_of_work(unit_of_work), books))
}
