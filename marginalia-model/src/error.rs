use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The text is not the 24-digit hexadecimal form of an [`ObjectId`].
    ///
    /// [`ObjectId`]: crate::ObjectId
    InvalidIdentifier { input: String, reason: &'static str },
    /// A raw byte buffer did not hold exactly 12 bytes.
    InvalidIdentifierBytes(usize),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidIdentifier { input, reason } => {
                write!(f, "invalid identifier {input:?}: {reason}")
            }
            ModelError::InvalidIdentifierBytes(len) => {
                write!(f, "identifier must be 12 bytes, got {len}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
