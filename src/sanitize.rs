use serde_json::Value;
use std::fmt;

use crate::document::Attributes;
use crate::field_spec::FUZZY_NAMESPACE;

/// Remove the whole derived namespace from an outward view
pub fn sanitize(mut view: Attributes) -> Attributes {
    view.fields.remove(FUZZY_NAMESPACE);
    view
}

/// Remove the derived namespace from a plain JSON snapshot
pub fn sanitize_value(mut view: Value) -> Value {
    if let Value::Object(fields) = &mut view {
        fields.remove(FUZZY_NAMESPACE);
    }
    view
}

/// Outward serialization a transform is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Plain object conversion
    Object,

    /// JSON serialization
    Json,
}

/// Caller-supplied transform run on a view before sanitizing
pub type ViewTransform = Box<dyn Fn(&mut Attributes) + Send + Sync>;

/// Transform hooks for every outward view
///
/// A caller transform registered for a view kind runs first; the sanitizer
/// always runs last, so a caller transform cannot re-expose derived tokens.
#[derive(Default)]
pub struct Transformers {
    to_object: Option<ViewTransform>,
    to_json: Option<ViewTransform>,
}

impl Transformers {
    /// Hooks that only sanitize
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `transform` before sanitizing object views
    pub fn with_object_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&mut Attributes) + Send + Sync + 'static,
    {
        self.to_object = Some(Box::new(transform));
        self
    }

    /// Run `transform` before sanitizing JSON views
    pub fn with_json_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&mut Attributes) + Send + Sync + 'static,
    {
        self.to_json = Some(Box::new(transform));
        self
    }

    /// Produce the outward view of a document
    pub fn apply(&self, kind: ViewKind, mut view: Attributes) -> Attributes {
        let transform = match kind {
            ViewKind::Object => &self.to_object,
            ViewKind::Json => &self.to_json,
        };
        if let Some(transform) = transform {
            transform(&mut view);
        }
        sanitize(view)
    }

    /// Outward view serialized as JSON
    pub fn to_json(&self, view: Attributes) -> Value {
        self.apply(ViewKind::Json, view).into()
    }
}

impl fmt::Debug for Transformers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformers")
            .field("to_object", &self.to_object.is_some())
            .field("to_json", &self.to_json.is_some())
            .finish()
    }
}
