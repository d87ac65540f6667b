// tests/support/fixtures.rs
use std::sync::Arc;

use slugforge::application::commands::slugs::SlugCommandService;
use slugforge::application::registry::SlugRegistry;
use slugforge::domain::slug::{
    ChangeTracker, FieldKind, FieldMapping, FieldValue, RecordHandle, RecordMetadata, SlugOptions,
    SlugRepository,
};
use slugforge::infrastructure::unit_of_work::InMemoryUnitOfWork;
use slugforge::infrastructure::util::{DefaultUrlizer, DeunicodeTransliterator};

use super::records::Doc;

pub const ARTICLE: &str = "article";

/// `article`: integer id, title, nullable category and publication date,
/// and a 64-character slug.
pub fn article_metadata() -> RecordMetadata {
    article_metadata_with_slug(FieldMapping::string("slug").with_length(64))
}

pub fn article_metadata_with_slug(slug: FieldMapping) -> RecordMetadata {
    RecordMetadata::new(ARTICLE)
        .with_field(FieldMapping::new("id", FieldKind::Integer).identifier())
        .with_field(FieldMapping::string("title"))
        .with_field(FieldMapping::new("category", FieldKind::Integer).nullable())
        .with_field(FieldMapping::new("published_on", FieldKind::Date).nullable())
        .with_field(slug)
}

pub fn article(title: &str) -> Doc {
    Doc::of(&article_metadata()).with("title", title)
}

pub fn registry_with(metadata: RecordMetadata, options: SlugOptions) -> Arc<SlugRegistry> {
    let mut registry = SlugRegistry::new();
    registry
        .register(metadata, [("slug", options)])
        .expect("fixture registration");
    Arc::new(registry)
}

pub fn service(registry: &Arc<SlugRegistry>, repository: Arc<dyn SlugRepository>) -> SlugCommandService {
    SlugCommandService::new(
        Arc::clone(registry),
        repository,
        Arc::new(DeunicodeTransliterator),
        Arc::new(DefaultUrlizer),
    )
}

/// Slug text currently held by `record`, panicking on anything else.
pub fn slug_of(uow: &InMemoryUnitOfWork, record: RecordHandle) -> String {
    slug_field_of(uow, record, "slug")
}

pub fn slug_field_of(uow: &InMemoryUnitOfWork, record: RecordHandle, field: &str) -> String {
    match uow.get(record, field) {
        Some(FieldValue::Text(slug)) => slug,
        other => panic!("expected text in {record}.{field}, got {other:?}"),
    }
}

/// Changes `field` on a tracked record the way application code would.
pub fn edit(uow: &mut InMemoryUnitOfWork, record: RecordHandle, field: &str, value: impl Into<FieldValue>) {
    uow.record_mut(record)
        .expect("tracked record")
        .set(field, value.into())
        .expect("known field");
}
