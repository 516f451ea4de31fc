use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::field_spec::FieldSpec;

/// Fuzzy fields configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Fields that carry derived tokens, in the specification DSL
    pub fields: Vec<FieldSpec>,

    /// Whether to collect metrics
    pub collect_metrics: bool,

    /// Whether batch generation runs on the rayon thread pool
    pub parallel: bool,
}

impl FuzzyConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON, validating every field specification
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the field specifications
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    /// Append one field specification
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Set whether to collect metrics
    pub fn with_collect_metrics(mut self, collect: bool) -> Self {
        self.collect_metrics = collect;
        self
    }

    /// Set whether batch generation runs in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
