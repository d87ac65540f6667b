use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::config::SlugField;
use crate::domain::slug::metadata::RecordMetadata;
use crate::domain::slug::repository::{SlugQuery, SlugRepository};
use crate::domain::slug::services::ledger::BatchLedger;
use crate::domain::slug::tracker::ChangeTracker;
use crate::domain::slug::value_objects::{FieldValue, RecordHandle};

/// The slug field of one record being processed.
#[derive(Debug, Clone, Copy)]
pub struct SlugTarget<'a> {
    pub record: RecordHandle,
    pub metadata: &'a RecordMetadata,
    pub field: &'a SlugField,
}

impl SlugTarget<'_> {
    pub fn root_type(&self) -> &str {
        &self.metadata.root_type
    }
}

/// Search state of one disambiguation pass. The first pass filters
/// candidates down to exact and numbered matches of the preferred slug;
/// passes retried after truncation keep every prefix match and always
/// append a suffix, starting at `10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attempt {
    exponent: u32,
    retry: bool,
}

impl Attempt {
    const FIRST: Self = Self {
        exponent: 0,
        retry: false,
    };
}

/// Finds a slug that no other record of the same root type (and unique
/// base group) holds, neither in the store nor earlier in the batch.
pub struct UniquenessResolver {
    repository: Arc<dyn SlugRepository>,
}

impl UniquenessResolver {
    pub fn new(repository: Arc<dyn SlugRepository>) -> Self {
        Self { repository }
    }

    /// Resolves `preferred` to a free slug and writes it to the record.
    pub async fn resolve(
        &self,
        tracker: &mut dyn ChangeTracker,
        ledger: &BatchLedger,
        target: SlugTarget<'_>,
        preferred: String,
    ) -> DomainResult<String> {
        let separator = target.field.separator.as_str();
        let mut preferred = preferred;
        let mut attempt = Attempt::FIRST;

        let resolved = loop {
            let taken = self
                .similar_slugs(&*tracker, ledger, target, &preferred, attempt)
                .await?;

            if taken.is_empty() || (!attempt.retry && !taken.contains(&preferred)) {
                break preferred;
            }

            let (generated, suffix) = first_free(&preferred, separator, &taken, attempt.exponent);

            let Some(max_length) = target.field.max_length else {
                break generated;
            };
            if generated.chars().count() <= max_length {
                break generated;
            }

            let digits = suffix.to_string().len();
            let truncated = truncate_for_suffix(&preferred, separator, digits, max_length)
                .ok_or_else(|| {
                    DomainError::Conflict(format!(
                        "no unique value for {}.{} fits in {max_length} characters",
                        target.metadata.record_type, target.field.name
                    ))
                })?;

            tracing::warn!(
                record = %target.record,
                field = %target.field.name,
                from = %preferred,
                to = %truncated,
                "truncating slug base to make room for a suffix"
            );

            write_slug(tracker, target, &truncated)?;
            attempt = Attempt {
                exponent: (digits - 1) as u32,
                retry: true,
            };
            preferred = truncated;
        };

        write_slug(tracker, target, &resolved)?;
        Ok(resolved)
    }

    async fn similar_slugs(
        &self,
        tracker: &dyn ChangeTracker,
        ledger: &BatchLedger,
        target: SlugTarget<'_>,
        preferred: &str,
        attempt: Attempt,
    ) -> DomainResult<BTreeSet<String>> {
        let field = target.field;
        let record = tracker
            .record(target.record)
            .ok_or_else(|| DomainError::Validation(format!("record {} is not tracked", target.record)))?;

        let group = match &field.unique_base {
            Some(base) => Some((
                base.as_str(),
                record
                    .get(base)
                    .ok_or_else(|| DomainError::unknown_field(record.record_type(), base))?,
            )),
            None => None,
        };

        let mut similar: Vec<String> = Vec::new();

        for handle in ledger.candidates_for(target.root_type()) {
            let Some(other) = tracker.record(*handle) else {
                continue;
            };
            if let Some((base, value)) = &group {
                if other.get(base).as_ref() != Some(value) {
                    continue;
                }
            }
            if let Some(FieldValue::Text(slug)) = other.get(&field.name) {
                if starts_with_ignore_case(&slug, preferred) {
                    similar.push(slug);
                }
            }
        }

        let exclude_id = match target.metadata.identifier_field() {
            Some(id_field)
                if !field.identifier && !tracker.is_scheduled_for_insert(target.record) =>
            {
                record.get(id_field).filter(|id| !id.is_null())
            }
            _ => None,
        };

        let query = SlugQuery {
            root_type: target.root_type(),
            field: &field.name,
            prefix: preferred,
            group: group.as_ref().map(|(base, value)| (*base, value)),
            exclude_id: exclude_id.as_ref(),
        };

        let suspended = self.repository.suspend_filters();
        let stored = self.repository.find_by_prefix(query).await;
        self.repository.restore_filters(suspended);

        similar.extend(stored?.into_iter().map(|row| row.slug));

        tracing::trace!(
            record = %target.record,
            field = %field.name,
            preferred,
            candidates = similar.len(),
            "collected similar slugs"
        );

        let taken = similar
            .into_iter()
            .filter(|slug| attempt.retry || is_same_or_numbered(slug, preferred, &field.separator))
            .collect();
        Ok(taken)
    }
}

fn write_slug(tracker: &mut dyn ChangeTracker, target: SlugTarget<'_>, slug: &str) -> DomainResult<()> {
    tracker
        .record_mut(target.record)
        .ok_or_else(|| DomainError::Validation(format!("record {} is not tracked", target.record)))?
        .set(&target.field.name, FieldValue::text(slug))
}

/// First `preferred + separator + i`, `i >= 10^exponent`, not in `taken`.
fn first_free(
    preferred: &str,
    separator: &str,
    taken: &BTreeSet<String>,
    exponent: u32,
) -> (String, u64) {
    let mut suffix = 10u64.pow(exponent);
    loop {
        let candidate = format!("{preferred}{separator}{suffix}");
        if !taken.contains(&candidate) {
            return (candidate, suffix);
        }
        suffix += 1;
    }
}

/// Cuts `preferred` so that it plus a separator and a `digits`-wide suffix
/// fits `max_length`, dropping a dangling separator. `None` when no base
/// character would remain.
fn truncate_for_suffix(
    preferred: &str,
    separator: &str,
    digits: usize,
    max_length: usize,
) -> Option<String> {
    let budget = max_length.checked_sub(digits + separator.chars().count())?;
    let mut truncated: String = preferred.chars().take(budget).collect();
    if !separator.is_empty() && truncated.ends_with(separator) {
        truncated.truncate(truncated.len() - separator.len());
    }
    (!truncated.is_empty()).then_some(truncated)
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// `candidate` equals `preferred`, or is `preferred` followed by the
/// separator and a number, ignoring case.
fn is_same_or_numbered(candidate: &str, preferred: &str, separator: &str) -> bool {
    let candidate = candidate.to_lowercase();
    let Some(rest) = candidate.strip_prefix(&preferred.to_lowercase()) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    rest.strip_prefix(&separator.to_lowercase())
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(slugs: &[&str]) -> BTreeSet<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numbered_filter_ignores_unrelated_prefix_matches() {
        assert!(is_same_or_numbered("foo", "foo", "-"));
        assert!(is_same_or_numbered("foo-2", "foo", "-"));
        assert!(is_same_or_numbered("FOO-12", "foo", "-"));
        assert!(!is_same_or_numbered("foobar", "foo", "-"));
        assert!(!is_same_or_numbered("foo-bar", "foo", "-"));
        assert!(!is_same_or_numbered("foo-", "foo", "-"));
        assert!(is_same_or_numbered("foo7", "foo", ""));
    }

    #[test]
    fn first_free_probes_upward_from_the_exponent() {
        assert_eq!(first_free("a", "-", &taken(&["a"]), 0), ("a-1".to_string(), 1));
        assert_eq!(first_free("a", "-", &taken(&["a-1", "a-2"]), 0), ("a-3".to_string(), 3));
        assert_eq!(first_free("a", "_", &taken(&["a_10"]), 1), ("a_11".to_string(), 11));
    }

    #[test]
    fn truncation_makes_room_for_separator_and_digits() {
        assert_eq!(truncate_for_suffix("abcdefghij", "-", 1, 8).as_deref(), Some("abcdef"));
        assert_eq!(truncate_for_suffix("abcdefghij", "-", 2, 8).as_deref(), Some("abcde"));
        assert_eq!(truncate_for_suffix("abc-defghij", "-", 2, 7).as_deref(), Some("abc"));
        assert_eq!(truncate_for_suffix("abcdef", "--", 1, 5).as_deref(), Some("ab"));
        assert_eq!(truncate_for_suffix("abcdef", "-", 3, 4), None);
    }

    #[test]
    fn prefix_test_ignores_case() {
        assert!(starts_with_ignore_case("Hello-World-2", "hello-world"));
        assert!(!starts_with_ignore_case("hello", "hello-world"));
    }
}
