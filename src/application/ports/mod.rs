// src/application/ports/mod.rs
pub mod util;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type TransliteratorPort = dyn util::Transliterator;
pub type UrlizerPort = dyn util::Urlizer;
