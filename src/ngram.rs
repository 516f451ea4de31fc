use rustc_hash::FxHashSet;

use crate::error::Result;

/// Minimum n-gram size used when a specification does not set one
pub const DEFAULT_MIN_SIZE: usize = 2;

/// Tuning parameters passed to a tokenizer for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGramOptions {
    /// Strip characters that are neither alphanumeric nor whitespace
    pub escape_special_characters: bool,

    /// Smallest n-gram to emit (tokenizer default when unset)
    pub min_size: Option<usize>,

    /// Emit only word prefixes (tokenizer default when unset)
    pub prefix_only: Option<bool>,
}

impl Default for NGramOptions {
    fn default() -> Self {
        Self {
            escape_special_characters: true,
            min_size: None,
            prefix_only: None,
        }
    }
}

/// Turns a source value into the tokens stored under the derived namespace.
///
/// Implementations must be pure: the same text and options always produce
/// the same sequence. Errors are not handled by the generator and surface
/// to whoever triggered generation.
pub trait Tokenizer {
    fn make_ngrams(&self, text: &str, options: &NGramOptions) -> Result<Vec<String>>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str, &NGramOptions) -> Result<Vec<String>>,
{
    fn make_ngrams(&self, text: &str, options: &NGramOptions) -> Result<Vec<String>> {
        self(text, options)
    }
}

/// Default n-gram tokenizer
///
/// Every word of the normalized text contributes all of its substrings from
/// `min_size` characters up to its full length. With `prefix_only` only the
/// substrings anchored at the start of the word are kept, e.g. "apple" with
/// the default minimum yields "ap", "app", "appl", "apple".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NGrams;

impl Tokenizer for NGrams {
    fn make_ngrams(&self, text: &str, options: &NGramOptions) -> Result<Vec<String>> {
        Ok(generate_ngrams(text, options))
    }
}

/// Generate n-grams for every word of `text`, de-duplicated in first-seen order
pub fn generate_ngrams(text: &str, options: &NGramOptions) -> Vec<String> {
    let min_size = options.min_size.unwrap_or(DEFAULT_MIN_SIZE).max(1);
    let prefix_only = options.prefix_only.unwrap_or(false);

    let normalized = if options.escape_special_characters {
        normalize_text(text)
    } else {
        text.to_lowercase()
    };

    let mut seen = FxHashSet::default();
    let mut ngrams = Vec::new();

    for word in normalized.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();

        if chars.len() < min_size {
            if seen.insert(word.to_string()) {
                ngrams.push(word.to_string());
            }
            continue;
        }

        for size in min_size..=chars.len() {
            let last_start = if prefix_only { 0 } else { chars.len() - size };
            for start in 0..=last_start {
                let gram: String = chars[start..start + size].iter().collect();
                if seen.insert(gram.clone()) {
                    ngrams.push(gram);
                }
            }
        }
    }

    ngrams
}

/// Normalize text before tokenizing
///
/// This function:
/// 1. Removes punctuation and other special characters
/// 2. Converts text to lowercase
/// 3. Trims whitespace
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}
