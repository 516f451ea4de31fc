use thiserror::Error;
use std::io;

/// Custom error types for the fuzzy fields library
#[derive(Error, Debug)]
pub enum FuzzyFieldsError {
    /// Field specification is neither a field name nor a descriptor object
    #[error("Fields items must be String or Object, found {0}")]
    InvalidSpecKind(String),

    /// Descriptor object without a usable `name`
    #[error("Field descriptor is missing a non-empty string `name`")]
    MissingFieldName,

    /// Descriptor option with the wrong type
    #[error("Invalid option `{option}` for field `{field}`: expected {expected}")]
    InvalidSpecOption {
        field: String,
        option: String,
        expected: String,
    },

    /// Field name that collides with the derived namespace
    #[error("Field name `{0}` is reserved for derived tokens")]
    ReservedFieldName(String),

    /// Two specifications for the same source field
    #[error("Field `{0}` is declared more than once")]
    DuplicateField(String),

    /// Failure reported by a tokenizer
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Error during JSON processing
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for fuzzy fields operations
pub type Result<T> = std::result::Result<T, FuzzyFieldsError>;
