// src/domain/slug/services/mod.rs
pub mod builder;
pub mod ledger;
pub mod normalizer;
pub mod resolver;

pub use builder::{BuildOutcome, GeneratedSlug, SlugBuilder};
pub use ledger::BatchLedger;
pub use normalizer::{SlugNormalizer, apply_style};
pub use resolver::{SlugTarget, UniquenessResolver};
