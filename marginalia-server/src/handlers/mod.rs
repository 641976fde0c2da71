//! HTTP request handlers organized by resource

pub mod books;
pub mod notes;
pub mod ops;

pub use ops::{health_handler, ping_handler};
