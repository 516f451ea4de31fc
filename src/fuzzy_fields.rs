use rayon::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::FuzzyConfig;
use crate::document::Attributes;
use crate::error::{FuzzyFieldsError, Result};
use crate::field_spec::{check_unique, parse_specs, FieldSpec};
use crate::generate::generate;
use crate::ngram::{NGrams, Tokenizer};
use crate::persistence::{load_from_file, save_to_file};
use crate::sanitize::{Transformers, ViewKind};
use crate::schema::{augment, Augmentation, IndexMap, SchemaPatch, SchemaTarget, WeightMap};

/// Main entry point for the fuzzy fields library
///
/// Holds a validated specification list together with the schema it derives,
/// and runs token generation and view sanitization for documents of that
/// schema.
#[derive(Debug)]
pub struct FuzzyFields<T = NGrams> {
    /// Validated configuration
    config: FuzzyConfig,

    /// Derived schema, index and weight declarations
    augmentation: Augmentation,

    /// Tokenizer used for every generation
    tokenizer: T,

    /// Outward view hooks
    transformers: Transformers,

    /// Path to the configuration file (if loaded from or saved to disk)
    path: Option<PathBuf>,
}

impl FuzzyFields<NGrams> {
    /// Create from already classified specifications
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self> {
        Self::from_config(FuzzyConfig::new().with_fields(specs))
    }

    /// Create from raw DSL entries, classifying them eagerly
    pub fn from_raw(raw: &[Value]) -> Result<Self> {
        Self::new(parse_specs(raw)?)
    }

    /// Create from a configuration
    pub fn from_config(config: FuzzyConfig) -> Result<Self> {
        check_unique(&config.fields)?;
        let augmentation = augment(&config.fields);
        Ok(Self {
            config,
            augmentation,
            tokenizer: NGrams,
            transformers: Transformers::new(),
            path: None,
        })
    }

    /// Load the configuration stored at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut instance = Self::from_config(load_from_file(&path_buf)?)?;
        instance.path = Some(path_buf);
        Ok(instance)
    }
}

impl<T: Tokenizer> FuzzyFields<T> {
    /// Replace the tokenizer
    pub fn with_tokenizer<U: Tokenizer>(self, tokenizer: U) -> FuzzyFields<U> {
        FuzzyFields {
            config: self.config,
            augmentation: self.augmentation,
            tokenizer,
            transformers: self.transformers,
            path: self.path,
        }
    }

    /// Replace the outward view hooks
    pub fn with_transformers(mut self, transformers: Transformers) -> Self {
        self.transformers = transformers;
        self
    }

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    /// Validated field specifications
    pub fn specs(&self) -> &[FieldSpec] {
        &self.config.fields
    }

    pub fn augmentation(&self) -> &Augmentation {
        &self.augmentation
    }

    /// Derived field declarations
    pub fn schema(&self) -> &SchemaPatch {
        &self.augmentation.schema
    }

    /// Full-text index declarations
    pub fn indexes(&self) -> &IndexMap {
        &self.augmentation.indexes
    }

    /// Full-text index weights
    pub fn weights(&self) -> &WeightMap {
        &self.augmentation.weights
    }

    pub fn transformers(&self) -> &Transformers {
        &self.transformers
    }

    /// Add the derived field declarations to a storage schema
    pub fn apply_schema<S: SchemaTarget + ?Sized>(&self, target: &mut S) -> Result<()> {
        self.augmentation.apply_to(target)
    }

    /// Regenerate the derived tokens of one document before it is written
    pub fn generate(&self, attributes: &mut Attributes) -> Result<()> {
        generate(self.specs(), attributes, &self.tokenizer)?;
        if self.config.collect_metrics {
            metrics::counter!("fuzzy_fields_documents_generated", 1);
        }
        Ok(())
    }

    /// Outward view of a document with derived tokens removed
    pub fn to_view(&self, kind: ViewKind, attributes: &Attributes) -> Attributes {
        self.transformers.apply(kind, attributes.clone())
    }

    /// Outward JSON of a document with derived tokens removed
    pub fn to_json(&self, attributes: &Attributes) -> Value {
        self.transformers.to_json(attributes.clone())
    }

    /// Save the configuration to the file it was opened from
    pub fn commit(&self) -> Result<()> {
        if let Some(path) = &self.path {
            save_to_file(&self.config, path)
        } else {
            Err(FuzzyFieldsError::IoError(std::io::Error::other(
                "No file path specified. Use save_to_file instead.",
            )))
        }
    }

    /// Save the configuration to a specific file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path_buf = path.as_ref().to_path_buf();
        save_to_file(&self.config, &path_buf)?;
        self.path = Some(path_buf);
        Ok(())
    }
}

impl<T: Tokenizer + Sync> FuzzyFields<T> {
    /// Regenerate the derived tokens of a batch of documents
    ///
    /// Documents are independent of each other, so with `parallel` enabled
    /// the batch is spread over the rayon thread pool. The first tokenizer
    /// error is returned.
    pub fn generate_all(&self, documents: &mut [Attributes]) -> Result<()> {
        if self.config.parallel {
            documents
                .par_iter_mut()
                .try_for_each(|attributes| generate(self.specs(), attributes, &self.tokenizer))?;
        } else {
            documents
                .iter_mut()
                .try_for_each(|attributes| generate(self.specs(), attributes, &self.tokenizer))?;
        }

        if self.config.collect_metrics {
            metrics::counter!("fuzzy_fields_documents_generated", documents.len() as u64);
        }
        log::debug!("Generated derived tokens for a batch of {} documents", documents.len());
        Ok(())
    }
}
