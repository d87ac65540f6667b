use std::collections::BTreeMap;

use crate::domain::slug::record::SluggableRecord;
use crate::domain::slug::value_objects::{FieldValue, RecordHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Pending field transitions of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet(BTreeMap<String, FieldChange>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, old: FieldValue, new: FieldValue) {
        self.0.insert(field.into(), FieldChange { old, new });
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Unit-of-work collaborator: owns the records of a batch, knows what is
/// scheduled and which fields changed.
pub trait ChangeTracker: Send {
    fn scheduled_insertions(&self) -> Vec<RecordHandle>;

    fn scheduled_updates(&self) -> Vec<RecordHandle>;

    fn is_scheduled_for_insert(&self, record: RecordHandle) -> bool;

    fn change_set_of(&self, record: RecordHandle) -> ChangeSet;

    fn notify_field_changed(
        &mut self,
        record: RecordHandle,
        field: &str,
        old: FieldValue,
        new: FieldValue,
    );

    fn recompute_change_set(&mut self, record: RecordHandle);

    fn record(&self, record: RecordHandle) -> Option<&dyn SluggableRecord>;

    fn record_mut(&mut self, record: RecordHandle) -> Option<&mut dyn SluggableRecord>;
}
