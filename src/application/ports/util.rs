// src/application/ports/util.rs
use crate::domain::slug::SluggableRecord;

/// Maps arbitrary text to an ASCII approximation, keeping word boundaries.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str, separator: &str, record: &dyn SluggableRecord) -> String;
}

/// Turns text into a lowercase, separator-delimited token sequence.
pub trait Urlizer: Send + Sync {
    fn urlize(&self, text: &str, separator: &str) -> String;
}

impl<F> Transliterator for F
where
    F: Fn(&str, &str, &dyn SluggableRecord) -> String + Send + Sync,
{
    fn transliterate(&self, text: &str, separator: &str, record: &dyn SluggableRecord) -> String {
        self(text, separator, record)
    }
}

impl<F> Urlizer for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn urlize(&self, text: &str, separator: &str) -> String {
        self(text, separator)
    }
}
