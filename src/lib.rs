//! # Fuzzy Fields
//!
//! Fuzzy Fields keeps derived n-gram tokens next to document records so a
//! full-text index can match them approximately, without the caller having
//! to maintain those tokens by hand.
//!
//! ## Features
//!
//! - Small JSON DSL declaring which fields take part in fuzzy search
//! - Schema augmentation: derived field declarations, text indexes and weights
//! - Token generation on every document write, including arrays of nested objects
//! - View sanitization hiding every derived token from outward serialization
//!
//! ## Example
//!
//! ```rust
//! use fuzzy_fields::{Attributes, FuzzyFields, ViewKind};
//! use serde_json::json;
//!
//! // Declare the fuzzy fields
//! let fields = FuzzyFields::from_raw(&[
//!     json!("title"),
//!     json!({"name": "description", "weight": 5}),
//!     json!({"name": "tags", "keys": ["label"]}),
//! ]).unwrap();
//! assert!(fields.indexes().contains_key("fuzzy.tags.label"));
//!
//! // Generate tokens before the document is written
//! let mut doc = Attributes::new();
//! doc.add_field("title", "Apple iPhone")
//!    .add_field("tags", json!([{"label": "phone"}]));
//! fields.generate(&mut doc).unwrap();
//! assert!(doc.derived_field("title").is_some());
//!
//! // Outward views never carry derived tokens
//! let view = fields.to_view(ViewKind::Json, &doc);
//! assert!(view.get("fuzzy").is_none());
//! ```

mod config;
mod document;
mod error;
mod field_spec;
mod fuzzy_fields;
mod generate;
mod ngram;
mod persistence;
mod sanitize;
mod schema;

// Re-export public API
pub use config::FuzzyConfig;
pub use document::{text_value, Attributes};
pub use error::{FuzzyFieldsError, Result};
pub use field_spec::{
    derived_key_path, derived_path, parse_specs, FieldOptions, FieldSpec, SpecKeys, SpecKind,
    FUZZY_NAMESPACE,
};
pub use fuzzy_fields::FuzzyFields;
pub use generate::generate;
pub use ngram::{generate_ngrams, normalize_text, NGramOptions, NGrams, Tokenizer, DEFAULT_MIN_SIZE};
pub use persistence::{load_from_file, save_to_file};
pub use sanitize::{sanitize, sanitize_value, Transformers, ViewKind, ViewTransform};
pub use schema::{
    augment, augment_raw, Augmentation, FieldType, IndexKind, IndexMap, SchemaField, SchemaPatch,
    SchemaTarget, WeightMap,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
