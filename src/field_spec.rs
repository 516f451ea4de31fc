//! Field specifications and the derived path convention.
//!
//! A specification is written in a small JSON DSL: either a bare field name
//! or a descriptor object.
//!
//! ```json
//! ["title", {"name": "body", "weight": 5, "minSize": 3},
//!  {"name": "tags", "keys": ["label", "lang"]}]
//! ```
//!
//! Every specification owns exactly one path under [`FUZZY_NAMESPACE`]. The
//! schema augmenter, the token generator and the sanitizer all go through
//! [`derived_path`] so the three stay in agreement.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::error::{FuzzyFieldsError, Result};
use crate::ngram::NGramOptions;

/// Reserved top-level key holding derived tokens
pub const FUZZY_NAMESPACE: &str = "fuzzy";

/// Derived path of a field, e.g. `fuzzy.title`
pub fn derived_path(name: &str) -> String {
    format!("{FUZZY_NAMESPACE}.{name}")
}

/// Derived path of one sub-key of a keyed field, e.g. `fuzzy.tags.label`
pub fn derived_key_path(name: &str, key: &str) -> String {
    format!("{FUZZY_NAMESPACE}.{name}.{key}")
}

/// Sub-keys of a keyed specification
pub type SpecKeys = SmallVec<[String; 4]>;

/// Tuning options shared by descriptor specifications
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    /// Source field name
    pub name: String,

    /// Weight of the derived field inside the full-text index
    pub weight: Option<f64>,

    /// Smallest n-gram the tokenizer should emit
    pub min_size: Option<usize>,

    /// Only emit word prefixes
    pub prefix_only: Option<bool>,

    /// Strip special characters before tokenizing
    pub escape_special_characters: bool,
}

impl FieldOptions {
    /// Options with defaults for the given field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
            min_size: None,
            prefix_only: None,
            escape_special_characters: true,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn with_prefix_only(mut self, prefix_only: bool) -> Self {
        self.prefix_only = Some(prefix_only);
        self
    }

    pub fn with_escape_special_characters(mut self, escape: bool) -> Self {
        self.escape_special_characters = escape;
        self
    }

    /// Tokenizer tuning for this field
    pub fn ngram_options(&self) -> NGramOptions {
        NGramOptions {
            escape_special_characters: self.escape_special_characters,
            min_size: self.min_size,
            prefix_only: self.prefix_only,
        }
    }
}

/// Which variant a specification classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    String,
    Object,
    KeyedObject,
}

/// One validated fuzzy field specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum FieldSpec {
    /// Bare field name, default tuning
    String(String),

    /// Single field with tuning options
    Object(FieldOptions),

    /// Array of nested objects, tokenized per listed sub-key
    KeyedObject {
        options: FieldOptions,
        keys: SpecKeys,
    },
}

impl FieldSpec {
    /// Classify one raw DSL entry
    pub fn classify(raw: &Value) -> Result<Self> {
        match raw {
            Value::String(name) => Ok(FieldSpec::String(check_name(name)?)),
            Value::Object(descriptor) => classify_descriptor(descriptor),
            other => Err(FuzzyFieldsError::InvalidSpecKind(json_type_name(other).to_string())),
        }
    }

    /// Source field name
    pub fn name(&self) -> &str {
        match self {
            FieldSpec::String(name) => name,
            FieldSpec::Object(options) => &options.name,
            FieldSpec::KeyedObject { options, .. } => &options.name,
        }
    }

    pub fn kind(&self) -> SpecKind {
        match self {
            FieldSpec::String(_) => SpecKind::String,
            FieldSpec::Object(_) => SpecKind::Object,
            FieldSpec::KeyedObject { .. } => SpecKind::KeyedObject,
        }
    }

    /// Path of this field's derived tokens
    pub fn derived_path(&self) -> String {
        derived_path(self.name())
    }

    /// Tokenizer tuning for this field
    pub fn ngram_options(&self) -> NGramOptions {
        match self {
            FieldSpec::String(_) => NGramOptions::default(),
            FieldSpec::Object(options) => options.ngram_options(),
            FieldSpec::KeyedObject { options, .. } => options.ngram_options(),
        }
    }
}

/// Classify a whole specification list, stopping at the first invalid entry
pub fn parse_specs(raw: &[Value]) -> Result<Vec<FieldSpec>> {
    let specs = raw
        .iter()
        .map(FieldSpec::classify)
        .collect::<Result<Vec<_>>>()?;
    check_unique(&specs)?;
    Ok(specs)
}

/// Reject specifications that would share a derived path
pub(crate) fn check_unique(specs: &[FieldSpec]) -> Result<()> {
    let mut names = FxHashSet::default();
    for spec in specs {
        if !names.insert(spec.name()) {
            return Err(FuzzyFieldsError::DuplicateField(spec.name().to_string()));
        }
    }
    Ok(())
}

fn check_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(FuzzyFieldsError::MissingFieldName);
    }
    if name == FUZZY_NAMESPACE {
        return Err(FuzzyFieldsError::ReservedFieldName(name.to_string()));
    }
    // A dot would split the name across derived path segments
    if name.contains('.') {
        return Err(FuzzyFieldsError::InvalidSpecOption {
            field: name.to_string(),
            option: "name".to_string(),
            expected: "a field name without `.`".to_string(),
        });
    }
    Ok(name.to_string())
}

const KEYS_EXPECTED: &str = "an array of non-empty strings without `.`";

fn classify_descriptor(descriptor: &Map<String, Value>) -> Result<FieldSpec> {
    let name = match descriptor.get("name") {
        Some(Value::String(name)) => check_name(name)?,
        _ => return Err(FuzzyFieldsError::MissingFieldName),
    };

    let invalid = |option: &str, expected: &str| FuzzyFieldsError::InvalidSpecOption {
        field: name.clone(),
        option: option.to_string(),
        expected: expected.to_string(),
    };

    let weight = match descriptor.get("weight") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_f64().ok_or_else(|| invalid("weight", "a number"))?),
    };

    let min_size = match descriptor.get("minSize") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_u64()
                .and_then(|size| usize::try_from(size).ok())
                .ok_or_else(|| invalid("minSize", "a non-negative integer"))?,
        ),
    };

    let prefix_only = match descriptor.get("prefixOnly") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_bool().ok_or_else(|| invalid("prefixOnly", "a boolean"))?),
    };

    // Only an explicit `false` turns escaping off
    let escape_special_characters = !matches!(
        descriptor.get("escapeSpecialCharacters"),
        Some(Value::Bool(false))
    );

    let keys: SpecKeys = match descriptor.get("keys") {
        None | Some(Value::Null) => SpecKeys::new(),
        Some(Value::Array(keys)) => keys
            .iter()
            .map(|key| match key {
                Value::String(key) if !key.is_empty() && !key.contains('.') => Ok(key.clone()),
                _ => Err(invalid("keys", KEYS_EXPECTED)),
            })
            .collect::<Result<_>>()?,
        Some(_) => return Err(invalid("keys", KEYS_EXPECTED)),
    };

    let options = FieldOptions {
        name,
        weight,
        min_size,
        prefix_only,
        escape_special_characters,
    };

    if keys.is_empty() {
        Ok(FieldSpec::Object(options))
    } else {
        Ok(FieldSpec::KeyedObject { options, keys })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whole-number weights are written back as integers, as they are usually declared
fn weight_value(weight: f64) -> Value {
    if weight.fract() == 0.0 && weight.abs() < i64::MAX as f64 {
        Value::from(weight as i64)
    } else {
        Value::from(weight)
    }
}

impl TryFrom<Value> for FieldSpec {
    type Error = FuzzyFieldsError;

    fn try_from(raw: Value) -> Result<Self> {
        FieldSpec::classify(&raw)
    }
}

impl From<FieldSpec> for Value {
    fn from(spec: FieldSpec) -> Self {
        let (options, keys) = match spec {
            FieldSpec::String(name) => return Value::String(name),
            FieldSpec::Object(options) => (options, SpecKeys::new()),
            FieldSpec::KeyedObject { options, keys } => (options, keys),
        };

        let mut descriptor = Map::new();
        descriptor.insert("name".to_string(), Value::String(options.name));
        if let Some(weight) = options.weight {
            descriptor.insert("weight".to_string(), weight_value(weight));
        }
        if let Some(min_size) = options.min_size {
            descriptor.insert("minSize".to_string(), min_size.into());
        }
        if let Some(prefix_only) = options.prefix_only {
            descriptor.insert("prefixOnly".to_string(), prefix_only.into());
        }
        if !options.escape_special_characters {
            descriptor.insert("escapeSpecialCharacters".to_string(), Value::Bool(false));
        }
        if !keys.is_empty() {
            descriptor.insert(
                "keys".to_string(),
                Value::Array(keys.into_iter().map(Value::String).collect()),
            );
        }
        Value::Object(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_string() {
        let spec = FieldSpec::classify(&json!("title")).unwrap();
        assert_eq!(spec, FieldSpec::String("title".to_string()));
        assert_eq!(spec.kind(), SpecKind::String);
        assert_eq!(spec.derived_path(), "fuzzy.title");
    }

    #[test]
    fn test_classify_object() {
        let spec = FieldSpec::classify(&json!({
            "name": "title",
            "weight": 5,
            "minSize": 3,
            "prefixOnly": true
        }))
        .unwrap();

        match spec {
            FieldSpec::Object(options) => {
                assert_eq!(options.name, "title");
                assert_eq!(options.weight, Some(5.0));
                assert_eq!(options.min_size, Some(3));
                assert_eq!(options.prefix_only, Some(true));
                assert!(options.escape_special_characters);
            }
            other => panic!("expected object spec, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_keyed_object() {
        let spec = FieldSpec::classify(&json!({"name": "tags", "keys": ["label", "lang"]})).unwrap();
        assert_eq!(spec.kind(), SpecKind::KeyedObject);
        if let FieldSpec::KeyedObject { options, keys } = spec {
            assert_eq!(options.name, "tags");
            assert_eq!(keys.to_vec(), vec!["label".to_string(), "lang".to_string()]);
        }
    }

    #[test]
    fn test_empty_keys_is_object() {
        let spec = FieldSpec::classify(&json!({"name": "tags", "keys": []})).unwrap();
        assert_eq!(spec.kind(), SpecKind::Object);
    }

    #[test]
    fn test_classify_rejects_other_kinds() {
        for raw in [json!(42), json!(true), json!(null), json!(["title"])] {
            assert!(matches!(
                FieldSpec::classify(&raw),
                Err(FuzzyFieldsError::InvalidSpecKind(_))
            ));
        }
    }

    #[test]
    fn test_classify_rejects_bad_descriptors() {
        assert!(matches!(
            FieldSpec::classify(&json!({"weight": 2})),
            Err(FuzzyFieldsError::MissingFieldName)
        ));
        assert!(matches!(
            FieldSpec::classify(&json!("")),
            Err(FuzzyFieldsError::MissingFieldName)
        ));
        assert!(matches!(
            FieldSpec::classify(&json!({"name": "title", "minSize": -1})),
            Err(FuzzyFieldsError::InvalidSpecOption { .. })
        ));
        assert!(matches!(
            FieldSpec::classify(&json!({"name": "tags", "keys": "label"})),
            Err(FuzzyFieldsError::InvalidSpecOption { .. })
        ));
        assert!(matches!(
            FieldSpec::classify(&json!("fuzzy")),
            Err(FuzzyFieldsError::ReservedFieldName(_))
        ));
    }

    #[test]
    fn test_dotted_names_and_keys_rejected() {
        for raw in [
            json!("a.b"),
            json!({"name": "a.b", "weight": 2}),
            json!({"name": "a", "keys": ["b.c"]}),
        ] {
            assert!(matches!(
                FieldSpec::classify(&raw),
                Err(FuzzyFieldsError::InvalidSpecOption { .. })
            ));
        }
    }

    #[test]
    fn test_dotted_name_cannot_collide_with_sub_key() {
        let result = parse_specs(&[json!("a.b"), json!({"name": "a", "keys": ["b"]})]);
        assert!(matches!(
            result,
            Err(FuzzyFieldsError::InvalidSpecOption { field, option, .. }) if field == "a.b" && option == "name"
        ));
    }

    #[test]
    fn test_escape_only_disabled_by_false() {
        let escape = |raw: Value| FieldSpec::classify(&raw).unwrap().ngram_options().escape_special_characters;

        assert!(escape(json!({"name": "title"})));
        assert!(escape(json!({"name": "title", "escapeSpecialCharacters": true})));
        assert!(escape(json!({"name": "title", "escapeSpecialCharacters": "no"})));
        assert!(escape(json!({"name": "title", "escapeSpecialCharacters": 0})));
        assert!(!escape(json!({"name": "title", "escapeSpecialCharacters": false})));
    }

    #[test]
    fn test_parse_specs_aborts_batch() {
        let result = parse_specs(&[json!("title"), json!(7), json!("body")]);
        assert!(matches!(result, Err(FuzzyFieldsError::InvalidSpecKind(_))));
    }

    #[test]
    fn test_parse_specs_rejects_duplicates() {
        let result = parse_specs(&[json!("title"), json!({"name": "title", "weight": 2})]);
        assert!(matches!(result, Err(FuzzyFieldsError::DuplicateField(name)) if name == "title"));
    }

    #[test]
    fn test_serde_uses_dsl_shape() {
        let raw = json!(["title", {"name": "tags", "keys": ["label"], "escapeSpecialCharacters": false}]);
        let specs: Vec<FieldSpec> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(serde_json::to_value(&specs).unwrap(), raw);
    }

    #[test]
    fn test_weight_keeps_declared_form() {
        let raw = json!([{"name": "title", "weight": 5}, {"name": "body", "weight": 1.5}]);
        let specs: Vec<FieldSpec> = serde_json::from_value(raw.clone()).unwrap();

        let back = serde_json::to_value(&specs).unwrap();
        assert_eq!(back, raw);
        assert!(back[0]["weight"].is_i64());
        assert!(back[1]["weight"].is_f64());
    }
}
