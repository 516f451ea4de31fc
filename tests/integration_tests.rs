use fuzzy_fields::{
    augment, generate, parse_specs, sanitize, Attributes, FieldSpec, FuzzyFields, FuzzyFieldsError,
    NGramOptions, NGrams, Result, SchemaPatch, Transformers, ViewKind,
};
use serde_json::json;
use std::cell::RefCell;

fn specs() -> Vec<FieldSpec> {
    parse_specs(&[
        json!("title"),
        json!({"name": "description", "weight": 5, "prefixOnly": true}),
        json!({"name": "tags", "keys": ["label", "lang"]}),
    ])
    .unwrap()
}

fn document() -> Attributes {
    let mut doc = Attributes::new();
    doc.add_field("title", vec!["Hello", "World"])
        .add_field("description", "Fuzzy search for documents")
        .add_field("tags", json!([{"label": "greeting", "lang": "en"}]))
        .add_field("views", 12);
    doc
}

#[test]
fn test_full_workflow() {
    let fields = FuzzyFields::new(specs()).unwrap();

    // Schema definition time
    let mut schema = SchemaPatch::new();
    fields.apply_schema(&mut schema).unwrap();
    assert_eq!(schema.len(), 3);
    assert!(fields.indexes().contains_key("fuzzy.tags.label"));
    assert!(fields.indexes().contains_key("fuzzy.tags.lang"));
    assert_eq!(fields.weights().get("fuzzy.description"), Some(&5.0));

    // Document write
    let mut doc = document();
    fields.generate(&mut doc).unwrap();

    let derived = doc.derived().unwrap();
    let mut keys: Vec<&String> = derived.keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["description", "tags", "title"]);

    let title_tokens = doc.derived_field("title").unwrap().as_array().unwrap();
    assert!(title_tokens.contains(&json!("hello")));
    assert!(title_tokens.contains(&json!("world")));

    // Outward serialization
    let view = fields.to_json(&doc);
    assert!(view.get("fuzzy").is_none());
    assert_eq!(view["views"], json!(12));
}

#[test]
fn test_round_trip_removes_namespace() {
    let specs = specs();
    let mut doc = document();
    generate(&specs, &mut doc, &NGrams).unwrap();

    assert!(doc.get("fuzzy").is_some());
    let view = sanitize(doc);
    assert!(view.get("fuzzy").is_none());
    assert!(view.get("title").is_some());
}

#[test]
fn test_array_join_is_tokenized_once() {
    let seen = RefCell::new(Vec::new());
    let recorder = |text: &str, _: &NGramOptions| -> Result<Vec<String>> {
        seen.borrow_mut().push(text.to_string());
        Ok(Vec::new())
    };

    let mut doc = Attributes::new();
    doc.add_field("title", vec!["Hello", "World"]);
    generate(&[FieldSpec::String("title".to_string())], &mut doc, &recorder).unwrap();

    assert_eq!(*seen.borrow(), vec!["Hello World".to_string()]);
}

#[test]
fn test_escaping_default_matches_explicit_true() {
    let implicit = parse_specs(&[json!({"name": "title"})]).unwrap();
    let explicit = parse_specs(&[json!({"name": "title", "escapeSpecialCharacters": true})]).unwrap();
    let disabled = parse_specs(&[json!({"name": "title", "escapeSpecialCharacters": false})]).unwrap();

    let run = |specs: &[FieldSpec]| {
        let mut doc = Attributes::new();
        doc.add_field("title", "C++ & Rust!");
        generate(specs, &mut doc, &NGrams).unwrap();
        doc.derived_field("title").cloned()
    };

    assert_eq!(run(&implicit), run(&explicit));
    assert_ne!(run(&implicit), run(&disabled));
}

#[test]
fn test_keyed_without_source_creates_nothing() {
    let mut doc = Attributes::new();
    doc.add_field("title", "Hello");

    generate(&specs(), &mut doc, &NGrams).unwrap();
    assert!(doc.derived_field("tags").is_none());
    assert!(doc.derived_field("description").is_none());
    assert!(doc.derived_field("title").is_some());
}

#[test]
fn test_regeneration_overwrites_governed_paths() {
    let fields = FuzzyFields::new(specs()).unwrap();
    let mut doc = document();
    fields.generate(&mut doc).unwrap();

    doc.add_field("tags", json!([{"label": "farewell", "lang": "fr"}, {"label": "adieu"}]));
    fields.generate(&mut doc).unwrap();

    let tags = doc.derived_field("tags").unwrap().as_array().unwrap();
    assert_eq!(tags.len(), 2);
    let first = &tags[0]["fuzzy"];
    assert!(first["label"].as_array().unwrap().contains(&json!("farewell")));
    assert!(first["lang"].as_array().unwrap().contains(&json!("fr")));
    assert_eq!(tags[1]["fuzzy"]["lang"], json!([]));
}

#[test]
fn test_invalid_specs_fail_eagerly() {
    assert!(matches!(
        FuzzyFields::from_raw(&[json!("title"), json!(1.5)]),
        Err(FuzzyFieldsError::InvalidSpecKind(_))
    ));
    assert!(matches!(
        FuzzyFields::from_raw(&[json!({"name": "title", "prefixOnly": "yes"})]),
        Err(FuzzyFieldsError::InvalidSpecOption { .. })
    ));
}

#[test]
fn test_augment_weight_presence() {
    let weighted = augment(&parse_specs(&[json!({"name": "title", "weight": 5})]).unwrap());
    assert_eq!(weighted.weights.get("fuzzy.title"), Some(&5.0));

    let unweighted = augment(&parse_specs(&[json!({"name": "title"})]).unwrap());
    assert!(unweighted.weights.is_empty());
}

#[test]
fn test_transformers_compose_with_sanitizer() {
    let fields = FuzzyFields::new(specs())
        .unwrap()
        .with_transformers(Transformers::new().with_object_transform(|view| {
            view.fields.remove("views");
        }));

    let mut doc = document();
    fields.generate(&mut doc).unwrap();

    let object = fields.to_view(ViewKind::Object, &doc);
    assert!(object.get("views").is_none());
    assert!(object.get("fuzzy").is_none());

    let json = fields.to_json(&doc);
    assert_eq!(json["views"], json!(12));
    assert!(json.get("fuzzy").is_none());
}
