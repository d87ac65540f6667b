use std::collections::BTreeMap;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::{FieldKind, FieldMapping, FieldValue, RecordMetadata, SluggableRecord};

pub const ENTRY_TYPE: &str = "entry";

/// The record type the preview binary slugs: a title and its slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub id: Option<i64>,
    pub title: String,
    pub slug: Option<String>,
}

impl Entry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            slug: None,
        }
    }

    pub fn metadata(max_length: Option<usize>) -> RecordMetadata {
        let mut slug = FieldMapping::string("slug");
        slug.length = max_length;
        RecordMetadata::new(ENTRY_TYPE)
            .with_field(FieldMapping::new("id", FieldKind::Integer).identifier())
            .with_field(FieldMapping::string("title"))
            .with_field(slug)
    }
}

impl SluggableRecord for Entry {
    fn record_type(&self) -> &str {
        ENTRY_TYPE
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "title" => Some(FieldValue::text(&self.title)),
            "slug" => Some(self.slug.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> DomainResult<()> {
        match (field, value) {
            ("id", FieldValue::Integer(id)) => self.id = Some(id),
            ("id", FieldValue::Null) => self.id = None,
            ("title", FieldValue::Text(title)) => self.title = title,
            ("slug", FieldValue::Text(slug)) => self.slug = Some(slug),
            ("slug", FieldValue::Null) => self.slug = None,
            (field, value) => {
                return Err(DomainError::Validation(format!(
                    "cannot set {ENTRY_TYPE}.{field} to {value:?}"
                )));
            }
        }
        Ok(())
    }

    fn values(&self) -> BTreeMap<String, FieldValue> {
        ["id", "title", "slug"]
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field.to_string(), value)))
            .collect()
    }
}
