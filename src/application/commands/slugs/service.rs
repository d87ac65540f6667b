// src/application/commands/slugs/service.rs
use std::sync::Arc;

use crate::{
    application::{
        ports::{TransliteratorPort, UrlizerPort},
        registry::SlugRegistry,
    },
    domain::slug::{
        SlugRepository,
        services::{SlugBuilder, SlugNormalizer, UniquenessResolver},
    },
};

/// Entry point for the two lifecycle hooks: preparing records before they
/// are created and building slugs when a batch is flushed.
pub struct SlugCommandService {
    pub(super) registry: Arc<SlugRegistry>,
    pub(super) builder: SlugBuilder,
}

impl SlugCommandService {
    pub fn new(
        registry: Arc<SlugRegistry>,
        repository: Arc<dyn SlugRepository>,
        transliterator: Arc<TransliteratorPort>,
        urlizer: Arc<UrlizerPort>,
    ) -> Self {
        let normalizer = SlugNormalizer::new(transliterator, urlizer);
        let resolver = UniquenessResolver::new(repository);
        Self {
            registry,
            builder: SlugBuilder::new(normalizer, resolver),
        }
    }

    pub fn registry(&self) -> Arc<SlugRegistry> {
        Arc::clone(&self.registry)
    }
}
