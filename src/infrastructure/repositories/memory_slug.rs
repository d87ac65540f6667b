// src/infrastructure/repositories/memory_slug.rs
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::{FieldValue, SlugQuery, SlugRepository, StoredSlug, SuspendedFilters};

const SOFT_DELETE_FILTER: &str = "soft_delete";

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: FieldValue,
    pub values: BTreeMap<String, FieldValue>,
    pub deleted: bool,
}

/// Process-local store of committed records, keyed by root type. With the
/// soft-delete filter on, deleted rows are invisible except while a
/// uniqueness query has the filters suspended.
#[derive(Debug, Default)]
pub struct InMemorySlugRepository {
    rows: RwLock<HashMap<String, Vec<StoredRecord>>>,
    soft_delete_filter: AtomicBool,
    queries: AtomicUsize,
}

impl InMemorySlugRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_soft_delete_filter(self) -> Self {
        self.soft_delete_filter.store(true, Ordering::SeqCst);
        self
    }

    pub fn soft_delete_filter_enabled(&self) -> bool {
        self.soft_delete_filter.load(Ordering::SeqCst)
    }

    /// Number of prefix lookups served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Inserts or replaces the row with the same id.
    pub fn save(
        &self,
        root_type: &str,
        id: FieldValue,
        values: BTreeMap<String, FieldValue>,
    ) -> DomainResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let rows = rows.entry(root_type.to_string()).or_default();
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => row.values = values,
            None => rows.push(StoredRecord {
                id,
                values,
                deleted: false,
            }),
        }
        Ok(())
    }

    /// Stores a row holding only `slug_field`, for seeding lookups.
    pub fn seed(&self, root_type: &str, id: i64, slug_field: &str, slug: &str) -> DomainResult<()> {
        let values = BTreeMap::from([
            ("id".to_string(), FieldValue::Integer(id)),
            (slug_field.to_string(), FieldValue::text(slug)),
        ]);
        self.save(root_type, FieldValue::Integer(id), values)
    }

    pub fn soft_delete(&self, root_type: &str, id: &FieldValue) -> DomainResult<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let row = rows
            .get_mut(root_type)
            .and_then(|rows| rows.iter_mut().find(|row| &row.id == id))
            .ok_or_else(|| DomainError::Validation(format!("no {root_type} row with id {id}")))?;
        row.deleted = true;
        Ok(())
    }

    pub fn rows(&self, root_type: &str) -> DomainResult<Vec<StoredRecord>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(root_type).cloned().unwrap_or_default())
    }

    /// Next free integer id for `root_type`.
    pub fn next_id(&self, root_type: &str) -> DomainResult<i64> {
        let rows = self.rows.read().map_err(poisoned)?;
        let max = rows
            .get(root_type)
            .into_iter()
            .flatten()
            .filter_map(|row| match row.id {
                FieldValue::Integer(id) => Some(id),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> DomainError {
    DomainError::Persistence("in-memory slug store lock poisoned".into())
}

#[async_trait]
impl SlugRepository for InMemorySlugRepository {
    async fn find_by_prefix(&self, query: SlugQuery<'_>) -> DomainResult<Vec<StoredSlug>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let hide_deleted = self.soft_delete_filter_enabled();
        let prefix = query.prefix.to_lowercase();

        let rows = self.rows.read().map_err(poisoned)?;
        let found = rows
            .get(query.root_type)
            .into_iter()
            .flatten()
            .filter(|row| !(hide_deleted && row.deleted))
            .filter(|row| query.exclude_id != Some(&row.id))
            .filter(|row| match query.group {
                Some((field, value)) => row.values.get(field).unwrap_or(&FieldValue::Null) == value,
                None => true,
            })
            .filter_map(|row| match row.values.get(query.field) {
                Some(FieldValue::Text(slug)) if slug.to_lowercase().starts_with(&prefix) => {
                    Some(StoredSlug {
                        id: row.id.clone(),
                        slug: slug.clone(),
                    })
                }
                _ => None,
            })
            .collect();
        Ok(found)
    }

    fn suspend_filters(&self) -> SuspendedFilters {
        if self.soft_delete_filter.swap(false, Ordering::SeqCst) {
            SuspendedFilters(vec![SOFT_DELETE_FILTER.to_string()])
        } else {
            SuspendedFilters::default()
        }
    }

    fn restore_filters(&self, suspended: SuspendedFilters) {
        if suspended.0.iter().any(|name| name == SOFT_DELETE_FILTER) {
            self.soft_delete_filter.store(true, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(prefix: &str) -> SlugQuery<'_> {
        SlugQuery {
            root_type: "article",
            field: "slug",
            prefix,
            group: None,
            exclude_id: None,
        }
    }

    #[tokio::test]
    async fn prefix_lookup_is_case_insensitive() {
        let repo = InMemorySlugRepository::new();
        repo.seed("article", 1, "slug", "Hello-World").unwrap();
        repo.seed("article", 2, "slug", "goodbye").unwrap();
        repo.seed("page", 3, "slug", "hello-world").unwrap();

        let found = repo.find_by_prefix(query("hello")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slug, "Hello-World");
        assert_eq!(repo.query_count(), 1);
    }

    #[tokio::test]
    async fn excluded_id_and_other_groups_are_skipped() {
        let repo = InMemorySlugRepository::new();
        let mut values = BTreeMap::from([
            ("slug".to_string(), FieldValue::text("tea")),
            ("category".to_string(), FieldValue::Integer(1)),
        ]);
        repo.save("article", FieldValue::Integer(1), values.clone()).unwrap();
        values.insert("category".into(), FieldValue::Integer(2));
        repo.save("article", FieldValue::Integer(2), values).unwrap();

        let one = FieldValue::Integer(1);
        let mut q = query("tea");
        q.group = Some(("category", &one));
        assert_eq!(repo.find_by_prefix(q).await.unwrap().len(), 1);

        q.exclude_id = Some(&one);
        assert!(repo.find_by_prefix(q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn soft_deleted_rows_hidden_until_filters_suspended() {
        let repo = InMemorySlugRepository::new().with_soft_delete_filter();
        repo.seed("article", 1, "slug", "gone").unwrap();
        repo.soft_delete("article", &FieldValue::Integer(1)).unwrap();

        assert!(repo.find_by_prefix(query("gone")).await.unwrap().is_empty());

        let suspended = repo.suspend_filters();
        assert_eq!(repo.find_by_prefix(query("gone")).await.unwrap().len(), 1);
        repo.restore_filters(suspended);
        assert!(repo.soft_delete_filter_enabled());
    }

    #[test]
    fn next_id_follows_the_highest_integer_id() {
        let repo = InMemorySlugRepository::new();
        assert_eq!(repo.next_id("article").unwrap(), 1);
        repo.seed("article", 41, "slug", "a").unwrap();
        assert_eq!(repo.next_id("article").unwrap(), 42);
    }
}
