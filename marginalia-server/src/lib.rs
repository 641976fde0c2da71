//! # Marginalia Server
//!
//! HTTP surface of the Marginalia reading tracker: books, the notes attached
//! to them, and the maintenance of that relationship.
//!
//! The binary in `main.rs` loads configuration, opens the store, and serves
//! the router built by [`app::create_app`]. Everything needed to build that
//! router lives in this library so integration tests can drive it directly.

pub mod app;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
