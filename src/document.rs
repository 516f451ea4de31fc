use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field_spec::FUZZY_NAMESPACE;

/// Field values of one document, including the derived `fuzzy` sub-mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    /// Fields containing the document data
    pub fields: Map<String, Value>,
}

impl Attributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the attribute set
    pub fn add_field<T>(&mut self, name: impl Into<String>, value: T) -> &mut Self
    where
        T: Serialize,
    {
        if let Ok(value) = serde_json::to_value(value) {
            self.fields.insert(name.into(), value);
        }
        self
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Derived tokens, if any have been generated
    pub fn derived(&self) -> Option<&Map<String, Value>> {
        self.fields.get(FUZZY_NAMESPACE).and_then(Value::as_object)
    }

    /// Derived tokens for one field
    pub fn derived_field(&self, name: &str) -> Option<&Value> {
        self.derived().and_then(|derived| derived.get(name))
    }

    /// Write one field's derived tokens, returning the tokens it replaced
    pub fn insert_derived(&mut self, name: impl Into<String>, tokens: Value) -> Option<Value> {
        let name = name.into();
        let previous = self.derived_field(&name).cloned();
        self.extend_derived(std::iter::once((name, tokens)));
        previous
    }

    /// Write several fields' derived tokens at once
    ///
    /// The derived namespace is created on first use; a non-object stored
    /// under the reserved key is replaced.
    pub fn extend_derived<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let entry = self
            .fields
            .entry(FUZZY_NAMESPACE)
            .or_insert_with(|| Value::Object(Map::new()));

        match entry {
            Value::Object(derived) => derived.extend(entries),
            other => *other = Value::Object(entries.into_iter().collect()),
        }
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Attributes> for Value {
    fn from(attributes: Attributes) -> Self {
        Value::Object(attributes.fields)
    }
}

/// Text fed to the tokenizer for a source value
///
/// Strings are used as-is and sequences are joined with a single space.
/// Other values use their JSON text.
pub fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(text_value)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
