use serde_json::{Map, Value};

use crate::document::{text_value, Attributes};
use crate::error::Result;
use crate::field_spec::{FieldSpec, FUZZY_NAMESPACE};
use crate::ngram::{NGramOptions, Tokenizer};

/// Regenerate the derived tokens of every specified field
///
/// Each specification writes only to its own entry under `fuzzy`; derived
/// entries no specification governs are left as they are. A source field
/// that is absent or `null` leaves its derived entry untouched, while a
/// present but empty value regenerates to empty tokens.
///
/// All tokens are computed before any is written, so a tokenizer error
/// leaves the derived namespace exactly as it was.
pub fn generate<T>(specs: &[FieldSpec], attributes: &mut Attributes, tokenizer: &T) -> Result<()>
where
    T: Tokenizer + ?Sized,
{
    let mut generated = Vec::new();

    for spec in specs {
        let tokens = match spec {
            FieldSpec::String(name) => field_tokens(attributes, name, &NGramOptions::default(), tokenizer)?,
            FieldSpec::Object(options) => {
                field_tokens(attributes, &options.name, &options.ngram_options(), tokenizer)?
            }
            FieldSpec::KeyedObject { options, keys } => {
                keyed_tokens(attributes, &options.name, keys, &options.ngram_options(), tokenizer)?
            }
        };

        if let Some(tokens) = tokens {
            log::trace!("Generated tokens for fuzzy field {}", spec.name());
            generated.push((spec.name().to_string(), tokens));
        }
    }

    log::debug!(
        "Generated derived tokens for {} of {} fuzzy fields",
        generated.len(),
        specs.len()
    );
    if !generated.is_empty() {
        attributes.extend_derived(generated);
    }
    Ok(())
}

fn source_value<'a>(attributes: &'a Attributes, name: &str) -> Option<&'a Value> {
    attributes.get(name).filter(|value| !value.is_null())
}

fn tokenize<T>(value: &Value, options: &NGramOptions, tokenizer: &T) -> Result<Value>
where
    T: Tokenizer + ?Sized,
{
    let tokens = tokenizer.make_ngrams(&text_value(value), options)?;
    Ok(Value::Array(tokens.into_iter().map(Value::String).collect()))
}

fn field_tokens<T>(
    attributes: &Attributes,
    name: &str,
    options: &NGramOptions,
    tokenizer: &T,
) -> Result<Option<Value>>
where
    T: Tokenizer + ?Sized,
{
    source_value(attributes, name)
        .map(|value| tokenize(value, options, tokenizer))
        .transpose()
}

/// Tokens for an array of nested objects: one `{ fuzzy: { key: tokens } }`
/// per element, in source order, with every key side by side
fn keyed_tokens<T>(
    attributes: &Attributes,
    name: &str,
    keys: &[String],
    options: &NGramOptions,
    tokenizer: &T,
) -> Result<Option<Value>>
where
    T: Tokenizer + ?Sized,
{
    let elements = match source_value(attributes, name) {
        Some(Value::Array(elements)) => elements.as_slice(),
        Some(element) => std::slice::from_ref(element),
        None => return Ok(None),
    };

    let empty = Value::String(String::new());
    let mut output = Vec::with_capacity(elements.len());

    for element in elements {
        let mut per_key = Map::new();
        for key in keys {
            let value = element
                .get(key.as_str())
                .filter(|value| !value.is_null())
                .unwrap_or(&empty);
            per_key.insert(key.clone(), tokenize(value, options, tokenizer)?);
        }

        let mut structure = Map::new();
        structure.insert(FUZZY_NAMESPACE.to_string(), Value::Object(per_key));
        output.push(Value::Object(structure));
    }

    Ok(Some(Value::Array(output)))
}
