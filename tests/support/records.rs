// tests/support/records.rs
use std::collections::BTreeMap;

use slugforge::domain::errors::{DomainError, DomainResult};
use slugforge::domain::slug::{FieldValue, RecordMetadata, SluggableRecord};

/// Map-backed record whose field set is fixed by its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc {
    record_type: String,
    values: BTreeMap<String, FieldValue>,
}

impl Doc {
    pub fn of(metadata: &RecordMetadata) -> Self {
        Self {
            record_type: metadata.record_type.clone(),
            values: metadata
                .fields
                .iter()
                .map(|field| (field.name.clone(), FieldValue::Null))
                .collect(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.set(field, value.into())
            .unwrap_or_else(|err| panic!("fixture field {field}: {err}"));
        self
    }
}

impl SluggableRecord for Doc {
    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        self.values.get(field).cloned()
    }

    fn set(&mut self, field: &str, value: FieldValue) -> DomainResult<()> {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(DomainError::unknown_field(&self.record_type, field)),
        }
    }

    fn values(&self) -> BTreeMap<String, FieldValue> {
        self.values.clone()
    }
}
