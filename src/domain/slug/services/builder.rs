use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::services::ledger::BatchLedger;
use crate::domain::slug::services::normalizer::SlugNormalizer;
use crate::domain::slug::services::resolver::{SlugTarget, UniquenessResolver};
use crate::domain::slug::tracker::{ChangeSet, ChangeTracker};
use crate::domain::slug::value_objects::FieldValue;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSlug {
    pub field: String,
    pub previous: FieldValue,
    pub slug: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Skipped,
    Generated(GeneratedSlug),
}

/// Decides whether a slug field needs regenerating and, if so, builds,
/// bounds and (for unique fields) disambiguates it.
pub struct SlugBuilder {
    normalizer: SlugNormalizer,
    resolver: UniquenessResolver,
}

impl SlugBuilder {
    pub fn new(normalizer: SlugNormalizer, resolver: UniquenessResolver) -> Self {
        Self {
            normalizer,
            resolver,
        }
    }

    pub async fn build(
        &self,
        tracker: &mut dyn ChangeTracker,
        ledger: &BatchLedger,
        target: SlugTarget<'_>,
        change_set: &ChangeSet,
        is_insert: bool,
    ) -> DomainResult<BuildOutcome> {
        let field = target.field;
        let record = tracker
            .record(target.record)
            .ok_or_else(|| DomainError::Validation(format!("record {} is not tracked", target.record)))?;
        let record_type = record.record_type();

        let current = record
            .get(&field.name)
            .ok_or_else(|| DomainError::unknown_field(record_type, &field.name))?;
        let slug_changed = change_set.contains(&field.name);

        if !field.updatable && !is_insert && !slug_changed && !current.is_placeholder() {
            return Ok(BuildOutcome::Skipped);
        }

        let previous = change_set
            .get(&field.name)
            .map_or_else(|| current.clone(), |change| change.old.clone());

        let (raw, changed) = if current.is_empty() || current.is_placeholder() || !slug_changed {
            let mut changed = slug_changed;
            let mut words = Vec::with_capacity(field.source_fields.len());
            for source in &field.source_fields {
                changed |= change_set.contains(source);
                let value = record
                    .get(source)
                    .ok_or_else(|| DomainError::missing_source_field(record_type, source))?;
                words.push(value.to_source_text(&field.date_format));
            }
            (words.join(" ").trim().to_string(), changed)
        } else {
            // Set by hand; keep the caller's text as the raw slug.
            (current.to_string(), true)
        };

        if !changed {
            return Ok(BuildOutcome::Skipped);
        }

        let mut slug = self.normalizer.normalize(&raw, field, record);
        if let Some(max_length) = field.max_length {
            if slug.chars().count() > max_length {
                slug = slug.chars().take(max_length).collect();
                let separator = field.separator.as_str();
                if !separator.is_empty() && slug.ends_with(separator) {
                    slug.truncate(slug.len() - separator.len());
                }
            }
        }

        let mut value = if slug.is_empty() && field.nullable {
            FieldValue::Null
        } else {
            FieldValue::Text(slug)
        };

        tracker
            .record_mut(target.record)
            .ok_or_else(|| DomainError::Validation(format!("record {} is not tracked", target.record)))?
            .set(&field.name, value.clone())?;

        if field.unique {
            if let FieldValue::Text(preferred) = value {
                let resolved = self.resolver.resolve(tracker, ledger, target, preferred).await?;
                value = FieldValue::Text(resolved);
            }
        }

        tracker.notify_field_changed(target.record, &field.name, previous.clone(), value.clone());
        tracker.recompute_change_set(target.record);

        Ok(BuildOutcome::Generated(GeneratedSlug {
            field: field.name.clone(),
            previous,
            slug: value,
        }))
    }
}
