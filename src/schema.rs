use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{FuzzyFieldsError, Result};
use crate::field_spec::{derived_key_path, derived_path, parse_specs, FieldSpec, FUZZY_NAMESPACE};

/// Storage type of a derived field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Sequence of token strings
    StringArray,

    /// Sequence of arbitrarily shaped values
    Mixed,
}

/// Declaration of one derived field for the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Storage type
    pub field_type: FieldType,

    /// Value stored before any tokens are generated
    pub default: Value,

    /// Whether the storage layer should build its own default index.
    /// Always `false`: indexing is declared through the [`IndexMap`].
    pub index: bool,
}

impl SchemaField {
    /// Token sequence field, defaulting to an empty string
    pub fn string_array() -> Self {
        Self {
            field_type: FieldType::StringArray,
            default: Value::String(String::new()),
            index: false,
        }
    }

    /// Sequence of nested token structures, defaulting to an empty sequence
    pub fn mixed() -> Self {
        Self {
            field_type: FieldType::Mixed,
            default: Value::Array(Vec::new()),
            index: false,
        }
    }
}

/// Index kind declared for a derived path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Text,
}

/// Derived path to field declaration
pub type SchemaPatch = BTreeMap<String, SchemaField>;

/// Derived path to full-text index kind
pub type IndexMap = BTreeMap<String, IndexKind>;

/// Derived path to full-text weight
pub type WeightMap = BTreeMap<String, f64>;

/// Mutable schema owned by the storage layer
pub trait SchemaTarget {
    /// Whether a top-level or dotted path is already declared
    fn contains_field(&self, path: &str) -> bool;

    /// Declare a field at a dotted path
    fn add_field(&mut self, path: &str, field: SchemaField) -> Result<()>;
}

impl SchemaTarget for SchemaPatch {
    fn contains_field(&self, path: &str) -> bool {
        self.contains_key(path)
    }

    fn add_field(&mut self, path: &str, field: SchemaField) -> Result<()> {
        self.insert(path.to_string(), field);
        Ok(())
    }
}

/// Everything derived from a specification list at schema-definition time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Augmentation {
    /// Derived field declarations
    pub schema: SchemaPatch,

    /// Full-text index declarations
    pub indexes: IndexMap,

    /// Full-text index weights, only for specifications with a weight
    pub weights: WeightMap,
}

impl Augmentation {
    /// Fold one specification into the augmentation
    fn with_spec(mut self, spec: &FieldSpec) -> Self {
        match spec {
            FieldSpec::String(name) => {
                let path = derived_path(name);
                self.schema.insert(path.clone(), SchemaField::string_array());
                self.indexes.insert(path, IndexKind::Text);
            }
            FieldSpec::Object(options) => {
                let path = derived_path(&options.name);
                self.schema.insert(path.clone(), SchemaField::string_array());
                self.indexes.insert(path.clone(), IndexKind::Text);
                match options.weight {
                    Some(weight) if weight != 0.0 => {
                        self.weights.insert(path, weight);
                    }
                    _ => {}
                }
            }
            FieldSpec::KeyedObject { options, keys } => {
                for key in keys {
                    self.indexes
                        .insert(derived_key_path(&options.name, key), IndexKind::Text);
                }
                self.schema
                    .insert(derived_path(&options.name), SchemaField::mixed());
            }
        }
        log::trace!("Augmented schema for fuzzy field {}", spec.name());
        self
    }

    /// Apply the derived field declarations to a storage schema
    ///
    /// Fails before touching the target if it declares its own field under
    /// the reserved namespace.
    pub fn apply_to<S: SchemaTarget + ?Sized>(&self, target: &mut S) -> Result<()> {
        if target.contains_field(FUZZY_NAMESPACE) {
            return Err(FuzzyFieldsError::ReservedFieldName(FUZZY_NAMESPACE.to_string()));
        }
        for (path, field) in &self.schema {
            target.add_field(path, field.clone())?;
        }
        Ok(())
    }
}

/// Derive the schema patch, index map and weight map for a specification list
pub fn augment(specs: &[FieldSpec]) -> Augmentation {
    let augmentation = specs
        .iter()
        .fold(Augmentation::default(), Augmentation::with_spec);
    log::debug!(
        "Augmented schema with {} derived fields and {} text indexes",
        augmentation.schema.len(),
        augmentation.indexes.len()
    );
    augmentation
}

/// Classify raw DSL entries, then augment `target` with them
///
/// The whole list is validated before the target is touched, so a malformed
/// entry leaves the schema unchanged.
pub fn augment_raw<S: SchemaTarget + ?Sized>(target: &mut S, raw: &[Value]) -> Result<Augmentation> {
    let specs = parse_specs(raw)?;
    let augmentation = augment(&specs);
    augmentation.apply_to(target)?;
    Ok(augmentation)
}
