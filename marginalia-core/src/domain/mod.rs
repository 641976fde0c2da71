pub mod catalog;
pub mod editing;
pub mod identifiers;
pub mod relationships;
pub mod saga;

pub use catalog::ReadingCatalog;
pub use editing::PartialUpdateTranslator;
pub use identifiers::{decode_id, decode_optional_id};
pub use relationships::RelationshipMaintainer;
