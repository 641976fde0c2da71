use std::sync::atomic::Ordering;

use anyhow::Result;
use axum::http::StatusCode;
use marginalia_core::api::routes::{utils as route_utils, v1};
use marginalia_core::database::ports::notes::NoteRepository;
use marginalia_model::{Note, ObjectId};
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::{build_memory_server, build_test_server, create_book, create_note, detach_failing_store};

fn book_path(id: &str) -> String {
    route_utils::replace_param(v1::books::ITEM, "bookid", id)
}

fn note_path(id: &str) -> String {
    route_utils::replace_param(v1::notes::ITEM, "noteid", id)
}

async fn book_notes(server: &axum_test::TestServer, book_id: &str) -> Value {
    server.get(&book_path(book_id)).await.json::<Value>()["data"]["notes"].clone()
}

#[tokio::test]
async fn note_lifecycle_keeps_book_references_in_step() -> Result<()> {
    let (server, _state) = build_memory_server()?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;

    let note_id = create_note(&server, &book_id, "ch1").await;
    assert_eq!(book_notes(&server, &book_id).await, json!([note_id]));

    let response = server.get(&note_path(&note_id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["bookID"], book_id.as_str());
    assert_eq!(body["data"]["content"], "ch1");

    let response = server
        .delete(v1::notes::COLLECTION)
        .json(&json!({ "id": note_id }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], 1);

    assert_eq!(book_notes(&server, &book_id).await, json!([]));
    server.get(&note_path(&note_id)).await.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn notes_append_in_creation_order() -> Result<()> {
    let (server, _state) = build_memory_server()?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;

    let first = create_note(&server, &book_id, "ch1").await;
    let second = create_note(&server, &book_id, "ch2").await;

    assert_eq!(book_notes(&server, &book_id).await, json!([first, second]));

    let listed: Value = server
        .get(v1::notes::COLLECTION)
        .add_query_param("bookid", &book_id)
        .await
        .json();
    let contents: Vec<&str> = listed["data"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|note| note["content"].as_str())
        .collect();
    assert_eq!(contents, vec!["ch1", "ch2"]);
    Ok(())
}

#[tokio::test]
async fn note_for_missing_book_is_rejected_and_not_stored() -> Result<()> {
    let (server, state) = build_memory_server()?;

    let response = server
        .post(v1::notes::COLLECTION)
        .json(&json!({ "bookID": "5f1d7a3b9c0e4d2a1b3c4d5e", "content": "orphan" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["success"], false);

    let stored = state
        .store()
        .unit_of_work()
        .notes
        .delete_by_book(ObjectId::parse_str("5f1d7a3b9c0e4d2a1b3c4d5e")?)
        .await?;
    assert_eq!(stored, 0);
    Ok(())
}

#[tokio::test]
async fn reply_to_must_be_a_valid_id_when_present() -> Result<()> {
    let (server, _state) = build_memory_server()?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;
    let parent = create_note(&server, &book_id, "ch1").await;

    let response = server
        .post(v1::notes::COLLECTION)
        .json(&json!({ "bookID": book_id, "content": "re", "replyTo": "zz" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post(v1::notes::COLLECTION)
        .json(&json!({ "bookID": book_id, "content": "re", "replyTo": parent }))
        .await;
    response.assert_status_ok();
    let reply_id = response.json::<Value>()["data"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let body: Value = server.get(&note_path(&reply_id)).await.json();
    assert_eq!(body["data"]["replyTo"], parent.as_str());
    Ok(())
}

#[tokio::test]
async fn listing_requires_a_valid_book_id() -> Result<()> {
    let (server, _state) = build_memory_server()?;

    server
        .get(v1::notes::COLLECTION)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get(v1::notes::COLLECTION)
        .add_query_param("bookid", "123")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get(v1::notes::COLLECTION)
        .add_query_param("bookid", "5f1d7a3b9c0e4d2a1b3c4d5e")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn dangling_reference_lists_as_placeholder() -> Result<()> {
    let (server, state) = build_memory_server()?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;
    let kept = create_note(&server, &book_id, "ch1").await;
    let lost = create_note(&server, &book_id, "ch2").await;

    state
        .store()
        .unit_of_work()
        .notes
        .delete(ObjectId::parse_str(&lost)?)
        .await?;

    let listed: Value = server
        .get(v1::notes::COLLECTION)
        .add_query_param("bookid", &book_id)
        .await
        .json();
    let notes: Vec<Note> = serde_json::from_value(listed["data"].clone())?;
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id.to_string(), kept);
    assert!(notes[1].is_placeholder());
    Ok(())
}

#[tokio::test]
async fn edit_note_reports_modified_count() -> Result<()> {
    let (server, _state) = build_memory_server()?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;
    let note_id = create_note(&server, &book_id, "ch1").await;

    let response = server
        .post(&note_path(&note_id))
        .json(&json!({ "id": note_id, "content": "chapter one" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], 1);

    let response = server
        .post(&note_path(&note_id))
        .json(&json!({ "id": note_id, "content": "" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], 0);

    let body: Value = server.get(&note_path(&note_id)).await.json();
    assert_eq!(body["data"]["content"], "chapter one");
    Ok(())
}

#[tokio::test]
async fn edit_note_cannot_move_it_to_another_book() -> Result<()> {
    let (server, _state) = build_memory_server()?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;
    let other_book = create_book(&server, "Emma", "Jane Austen", 1).await;
    let note_id = create_note(&server, &book_id, "ch1").await;

    let response = server
        .post(&note_path(&note_id))
        .json(&json!({ "id": note_id, "bookID": other_book }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], 0);

    let body: Value = server.get(&note_path(&note_id)).await.json();
    assert_eq!(body["data"]["bookID"], book_id.as_str());
    Ok(())
}

#[tokio::test]
async fn edit_note_with_bad_ids() -> Result<()> {
    let (server, _state) = build_memory_server()?;
    let missing = "5f1d7a3b9c0e4d2a1b3c4d5e";

    server
        .post(&note_path("xyz"))
        .json(&json!({ "id": "xyz", "content": "x" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post(&note_path(missing))
        .json(&json!({ "content": "x" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post(&note_path(missing))
        .json(&json!({ "id": missing, "content": "x" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn edit_note_rejects_malformed_reply_to() -> Result<()> {
    let (server, _state) = build_memory_server()?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;
    let note_id = create_note(&server, &book_id, "ch1").await;

    let response = server
        .post(&note_path(&note_id))
        .json(&json!({ "id": note_id, "content": "revised", "replyTo": "zz" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap_or_default().contains("Invalid identifier"));

    let body: Value = server.get(&note_path(&note_id)).await.json();
    assert_eq!(body["data"]["content"], "ch1");

    let response = server
        .post(&note_path(&note_id))
        .json(&json!({ "id": note_id, "replyTo": note_id.to_uppercase() }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"], 1);
    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_note_is_not_found() -> Result<()> {
    let (server, _state) = build_memory_server()?;

    server
        .delete(v1::notes::COLLECTION)
        .json(&json!({ "id": "5f1d7a3b9c0e4d2a1b3c4d5e" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(v1::notes::COLLECTION)
        .json(&json!({ "id": "" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn failed_detach_leaves_note_in_place() -> Result<()> {
    let (store, books) = detach_failing_store()?;
    let (server, _state) = build_test_server(store)?;
    let book_id = create_book(&server, "Dune", "Frank Herbert", 1).await;
    let note_id = create_note(&server, &book_id, "ch1").await;

    books.fail_detach.store(true, Ordering::SeqCst);
    let response = server
        .delete(v1::notes::COLLECTION)
        .json(&json!({ "id": note_id }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["success"], false);

    server.get(&note_path(&note_id)).await.assert_status_ok();
    assert_eq!(book_notes(&server, &book_id).await, json!([note_id]));
    Ok(())
}
