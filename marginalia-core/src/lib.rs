//! # Marginalia Core
//!
//! Storage ports, adapters, and the book/note relationship rules behind the
//! Marginalia reading tracker.
//!
//! ## Feature Flags
//!
//! - `database`: Enables the PostgreSQL adapter (SQLx)
//! - `postgres-tests`: Runs adapter tests against a live PostgreSQL server
//!
//! ## Architecture
//!
//! - [`database`]: Repository ports with PostgreSQL and in-memory adapters
//! - [`application`]: Unit of work aggregating the ports
//! - [`domain`]: Catalog reads, the relationship maintainer, and partial edits
//! - [`api`]: Route constants and wire envelopes shared with the server
//!
//! ## Examples
//!
//! ```no_run
//! use marginalia_core::{
//!     application::unit_of_work::AppUnitOfWork,
//!     domain::relationships::RelationshipMaintainer,
//! };
//! use marginalia_model::{NewNote, ObjectId};
//!
//! async fn attach(book_id: ObjectId) -> marginalia_core::Result<()> {
//!     let uow = AppUnitOfWork::in_memory();
//!     let maintainer = RelationshipMaintainer::new(&uow);
//!     maintainer
//!         .create_note(NewNote {
//!             book_id,
//!             content: "Chapter one".into(),
//!             reply_to: None,
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Route constants and wire envelopes
pub mod api;

/// Application-level composition (unit of work)
pub mod application;

/// Repository ports and storage adapters
pub mod database;

/// Catalog reads, relationship maintenance, and partial edits
pub mod domain;

/// Error types shared by every layer
pub mod error;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use error::{EntityKind, Result, TrackerError};
