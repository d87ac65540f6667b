use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::slug::value_objects::FieldValue;

/// Lookup of stored slugs sharing a prefix, scoped to one root record type.
#[derive(Debug, Clone, Copy)]
pub struct SlugQuery<'a> {
    pub root_type: &'a str,
    pub field: &'a str,
    /// Matched case-insensitively against the start of the stored slug.
    pub prefix: &'a str,
    /// Uniqueness base field and the value the stored row must hold.
    pub group: Option<(&'a str, &'a FieldValue)>,
    pub exclude_id: Option<&'a FieldValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSlug {
    pub id: FieldValue,
    pub slug: String,
}

/// Row filters a repository had active before a uniqueness query.
#[derive(Debug, Default)]
pub struct SuspendedFilters(pub Vec<String>);

#[async_trait]
pub trait SlugRepository: Send + Sync {
    async fn find_by_prefix(&self, query: SlugQuery<'_>) -> DomainResult<Vec<StoredSlug>>;

    /// Disables filters that would hide rows (soft deletes and the like)
    /// and returns what was disabled.
    fn suspend_filters(&self) -> SuspendedFilters {
        SuspendedFilters::default()
    }

    fn restore_filters(&self, _suspended: SuspendedFilters) {}
}
