use serde::Serialize;

use crate::domain::slug::services::GeneratedSlug;
use crate::domain::slug::{FieldValue, RecordHandle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSlugDto {
    pub record: usize,
    pub record_type: String,
    pub field: String,
    pub previous: Option<String>,
    pub slug: Option<String>,
}

impl GeneratedSlugDto {
    pub fn new(record: RecordHandle, record_type: impl Into<String>, generated: GeneratedSlug) -> Self {
        Self {
            record: record.0,
            record_type: record_type.into(),
            field: generated.field,
            previous: text_of(generated.previous),
            slug: text_of(generated.slug),
        }
    }
}

fn text_of(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::Null => None,
        other => Some(other.to_string()),
    }
}

/// Slugs written during one flush, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub generated: Vec<GeneratedSlugDto>,
}

impl FlushReport {
    pub fn push(&mut self, generated: GeneratedSlugDto) {
        self.generated.push(generated);
    }

    pub fn for_record(&self, record: RecordHandle) -> impl Iterator<Item = &GeneratedSlugDto> {
        self.generated.iter().filter(move |dto| dto.record == record.0)
    }

    pub fn slug_of(&self, record: RecordHandle, field: &str) -> Option<&str> {
        self.for_record(record)
            .find(|dto| dto.field == field)
            .and_then(|dto| dto.slug.as_deref())
    }

    pub fn len(&self) -> usize {
        self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }
}
