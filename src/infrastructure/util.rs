use crate::application::ports::util::{Transliterator, Urlizer};
use crate::domain::slug::SluggableRecord;
use slug::slugify;

/// Transliterates through `deunicode`; CJK ideographs come out as
/// space-separated syllables ("北京" -> "Bei Jing").
#[derive(Default, Clone, Copy, Debug)]
pub struct DeunicodeTransliterator;

impl Transliterator for DeunicodeTransliterator {
    fn transliterate(&self, text: &str, _separator: &str, _record: &dyn SluggableRecord) -> String {
        deunicode::deunicode(text)
    }
}

/// Urlizes with `slug::slugify`, then swaps its hyphens for the configured
/// separator.
#[derive(Default, Clone, Copy, Debug)]
pub struct DefaultUrlizer;

impl Urlizer for DefaultUrlizer {
    fn urlize(&self, text: &str, separator: &str) -> String {
        let slug = slugify(text);
        if separator == "-" {
            slug
        } else {
            slug.replace('-', separator)
        }
    }
}
