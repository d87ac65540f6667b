// tests/support/mocks/repos.rs
use std::sync::Mutex;

use async_trait::async_trait;

use slugforge::domain::errors::{DomainError, DomainResult};
use slugforge::domain::slug::{FieldValue, SlugQuery, SlugRepository, StoredSlug, SuspendedFilters};
use slugforge::infrastructure::repositories::InMemorySlugRepository;

/* -------------------------------- FailingSlugRepo -------------------------------- */

/// Every lookup fails as if the database were unreachable.
pub struct FailingSlugRepo;

#[async_trait]
impl SlugRepository for FailingSlugRepo {
    async fn find_by_prefix(&self, _query: SlugQuery<'_>) -> DomainResult<Vec<StoredSlug>> {
        Err(DomainError::Persistence("connection refused".into()))
    }
}

/* -------------------------------- RecordingSlugRepo -------------------------------- */

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub root_type: String,
    pub field: String,
    pub prefix: String,
    pub group: Option<(String, FieldValue)>,
    pub exclude_id: Option<FieldValue>,
}

/// Wraps an in-memory repository and records every query it receives.
pub struct RecordingSlugRepo {
    pub inner: InMemorySlugRepository,
    pub queries: Mutex<Vec<RecordedQuery>>,
}

impl RecordingSlugRepo {
    pub fn new(inner: InMemorySlugRepository) -> Self {
        Self {
            inner,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<RecordedQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlugRepository for RecordingSlugRepo {
    async fn find_by_prefix(&self, query: SlugQuery<'_>) -> DomainResult<Vec<StoredSlug>> {
        self.queries.lock().unwrap().push(RecordedQuery {
            root_type: query.root_type.to_string(),
            field: query.field.to_string(),
            prefix: query.prefix.to_string(),
            group: query.group.map(|(field, value)| (field.to_string(), value.clone())),
            exclude_id: query.exclude_id.cloned(),
        });
        self.inner.find_by_prefix(query).await
    }

    fn suspend_filters(&self) -> SuspendedFilters {
        self.inner.suspend_filters()
    }

    fn restore_filters(&self, suspended: SuspendedFilters) {
        self.inner.restore_filters(suspended)
    }
}
