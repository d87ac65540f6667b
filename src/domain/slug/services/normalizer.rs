use std::sync::Arc;

use crate::application::ports::util::{Transliterator, Urlizer};
use crate::domain::slug::config::SlugField;
use crate::domain::slug::record::SluggableRecord;
use crate::domain::slug::value_objects::SlugStyle;

/// Text pipeline turning raw source text into a slug candidate:
/// transliteration, urlization, prefix/suffix, then casing.
#[derive(Clone)]
pub struct SlugNormalizer {
    transliterator: Arc<dyn Transliterator>,
    urlizer: Arc<dyn Urlizer>,
}

impl SlugNormalizer {
    pub fn new(transliterator: Arc<dyn Transliterator>, urlizer: Arc<dyn Urlizer>) -> Self {
        Self {
            transliterator,
            urlizer,
        }
    }

    pub fn transliterate(&self, text: &str, separator: &str, record: &dyn SluggableRecord) -> String {
        self.transliterator.transliterate(text, separator, record)
    }

    pub fn urlize(&self, text: &str, separator: &str) -> String {
        self.urlizer.urlize(text, separator)
    }

    pub fn normalize(&self, raw: &str, field: &SlugField, record: &dyn SluggableRecord) -> String {
        let separator = field.separator.as_str();
        let transliterated = self.transliterate(raw, separator, record);
        let urlized = self.urlize(&transliterated, separator);
        let affixed = format!("{}{}{}", field.prefix, urlized, field.suffix);
        apply_style(&affixed, field.style, separator)
    }
}

pub fn apply_style(text: &str, style: SlugStyle, separator: &str) -> String {
    match style {
        SlugStyle::None => text.to_string(),
        SlugStyle::Camel => camelize(text, separator),
        SlugStyle::Lower => text.to_lowercase(),
        SlugStyle::Upper => text.to_uppercase(),
    }
}

// Uppercases an ASCII letter at the start of the text or right after a
// separator.
fn camelize(text: &str, separator: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut at_boundary = true;

    while let Some(ch) = rest.chars().next() {
        if !separator.is_empty() && rest.starts_with(separator) {
            out.push_str(separator);
            rest = &rest[separator.len()..];
            at_boundary = true;
            continue;
        }
        if at_boundary {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        at_boundary = false;
        rest = &rest[ch.len_utf8()..];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainResult;
    use crate::domain::slug::value_objects::FieldValue;
    use crate::infrastructure::util::{DeunicodeTransliterator, DefaultUrlizer};
    use std::collections::BTreeMap;

    #[derive(Debug)]
    struct Blank;

    impl SluggableRecord for Blank {
        fn record_type(&self) -> &str {
            "blank"
        }

        fn get(&self, _field: &str) -> Option<FieldValue> {
            None
        }

        fn set(&mut self, _field: &str, _value: FieldValue) -> DomainResult<()> {
            Ok(())
        }

        fn values(&self) -> BTreeMap<String, FieldValue> {
            BTreeMap::new()
        }
    }

    fn normalizer() -> SlugNormalizer {
        SlugNormalizer::new(Arc::new(DeunicodeTransliterator), Arc::new(DefaultUrlizer))
    }

    fn field(separator: &str, style: SlugStyle) -> SlugField {
        SlugField {
            name: "slug".into(),
            source_fields: vec!["title".into()],
            separator: separator.into(),
            style,
            updatable: true,
            unique: true,
            unique_base: None,
            date_format: "%Y-%m-%d".into(),
            prefix: String::new(),
            suffix: String::new(),
            max_length: None,
            nullable: false,
            identifier: false,
        }
    }

    #[test]
    fn transliterate_keeps_word_boundaries() {
        let out = normalizer().transliterate("北京", "-", &Blank);
        assert_eq!(out.trim(), "Bei Jing");
    }

    #[test]
    fn urlize_lowercases_and_collapses_separators() {
        let n = normalizer();
        assert_eq!(n.urlize("  Hello,   World!! ", "-"), "hello-world");
        assert_eq!(n.urlize("Hello World", "_"), "hello_world");
        assert_eq!(n.urlize("--a--b--", "-"), "a-b");
    }

    #[test]
    fn camel_uppercases_word_starts() {
        assert_eq!(apply_style("hello-world", SlugStyle::Camel, "-"), "Hello-World");
        assert_eq!(apply_style("hello__big__world", SlugStyle::Camel, "__"), "Hello__Big__World");
        assert_eq!(apply_style("hello-2nd", SlugStyle::Camel, "-"), "Hello-2nd");
        assert_eq!(apply_style("hello", SlugStyle::Camel, ""), "Hello");
    }

    #[test]
    fn case_folding_styles() {
        assert_eq!(apply_style("Hello-World", SlugStyle::Lower, "-"), "hello-world");
        assert_eq!(apply_style("hello-world", SlugStyle::Upper, "-"), "HELLO-WORLD");
        assert_eq!(apply_style("Ünïcode", SlugStyle::Lower, "-"), "ünïcode");
        assert_eq!(apply_style("as-is", SlugStyle::None, "-"), "as-is");
    }

    #[test]
    fn normalize_runs_the_full_pipeline() {
        let n = normalizer();
        assert_eq!(n.normalize("hello world", &field("-", SlugStyle::Camel), &Blank), "Hello-World");
        assert_eq!(n.normalize("hello world", &field("-", SlugStyle::Lower), &Blank), "hello-world");
        assert_eq!(n.normalize("Crème Brûlée", &field(".", SlugStyle::None), &Blank), "creme.brulee");

        let mut affixed = field("-", SlugStyle::None);
        affixed.prefix = "post-".into();
        affixed.suffix = "-draft".into();
        assert_eq!(n.normalize("My Post", &affixed, &Blank), "post-my-post-draft");
    }

    #[test]
    fn custom_functions_can_be_plugged_in() {
        let n = SlugNormalizer::new(
            Arc::new(|text: &str, _sep: &str, _record: &dyn SluggableRecord| text.replace('&', " and ")),
            Arc::new(|text: &str, sep: &str| text.split_whitespace().collect::<Vec<_>>().join(sep)),
        );
        assert_eq!(n.normalize("Salt & Pepper", &field("+", SlugStyle::None), &Blank), "Salt+and+Pepper");
    }
}
