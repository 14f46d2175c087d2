//! Parser errors

use fos_intern::InternError;

use crate::feature::Feature;
use crate::parser::EventType;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParserError>;

/// Parser error
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("String cache error: {0}")]
    Cache(#[from] InternError),

    #[error("Parser cannot be cloned: {0}")]
    CloneNotSupported(#[from] DuplicateError),

    #[error("Feature {feature} can only be changed before parsing (current event: {event:?})")]
    FeatureLocked { feature: Feature, event: EventType },

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Read chunk size must be positive")]
    ZeroReadChunk,

    #[error("No input source set")]
    NoInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in input at byte {offset}")]
    InvalidUtf8 { offset: u64 },

    #[error("End tag </{found}> does not match start tag <{expected}>")]
    MismatchedEndTag { expected: String, found: String },

    #[error("End tag with no open element")]
    StackUnderflow,
}

/// An input source refused to be duplicated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} cannot be duplicated: {reason}")]
pub struct DuplicateError {
    pub kind: &'static str,
    pub reason: String,
}
