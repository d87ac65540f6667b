use std::collections::BTreeMap;

use crate::application::registry::SlugRegistry;
use crate::domain::errors::DomainResult;
use crate::domain::slug::{ChangeSet, ChangeTracker, FieldValue, RecordHandle, SluggableRecord};
use crate::infrastructure::repositories::InMemorySlugRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    New,
    Managed,
}

#[derive(Debug)]
struct Entry {
    record: Box<dyn SluggableRecord>,
    original: BTreeMap<String, FieldValue>,
    state: EntryState,
    change_set: Option<ChangeSet>,
}

impl Entry {
    fn diff(&self) -> ChangeSet {
        let mut change_set = ChangeSet::new();
        for (field, current) in self.record.values() {
            let old = self.original.get(&field).cloned().unwrap_or_default();
            if old != current {
                change_set.insert(field, old, current);
            }
        }
        change_set
    }
}

/// A field transition reported through [`ChangeTracker::notify_field_changed`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNotification {
    pub record: RecordHandle,
    pub field: String,
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Change tracker over records held in memory. New records are scheduled
/// for insertion; attached records are scheduled for update once any of
/// their fields differs from the snapshot taken when they were attached.
#[derive(Debug, Default)]
pub struct InMemoryUnitOfWork {
    entries: Vec<Entry>,
    notifications: Vec<FieldNotification>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persist(&mut self, record: Box<dyn SluggableRecord>) -> RecordHandle {
        self.push(record, BTreeMap::new(), EntryState::New)
    }

    pub fn attach(&mut self, record: Box<dyn SluggableRecord>) -> RecordHandle {
        let original = record.values();
        self.push(record, original, EntryState::Managed)
    }

    fn push(
        &mut self,
        record: Box<dyn SluggableRecord>,
        original: BTreeMap<String, FieldValue>,
        state: EntryState,
    ) -> RecordHandle {
        self.entries.push(Entry {
            record,
            original,
            state,
            change_set: None,
        });
        RecordHandle(self.entries.len() - 1)
    }

    pub fn get(&self, record: RecordHandle, field: &str) -> Option<FieldValue> {
        self.entries.get(record.0)?.record.get(field)
    }

    pub fn notifications(&self) -> &[FieldNotification] {
        &self.notifications
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes new and changed records to `repository`, assigning integer ids
    /// to records whose identifier is still empty, then snapshots every
    /// record as managed.
    pub fn commit(
        &mut self,
        repository: &InMemorySlugRepository,
        registry: &SlugRegistry,
    ) -> DomainResult<()> {
        for entry in &mut self.entries {
            if entry.state == EntryState::Managed && entry.diff().is_empty() {
                continue;
            }

            let record_type = entry.record.record_type().to_string();
            let (root_type, id_field) = match registry.metadata(&record_type) {
                Some(meta) => (
                    meta.root_type.clone(),
                    meta.identifier_field().unwrap_or("id").to_string(),
                ),
                None => (record_type.clone(), "id".to_string()),
            };

            let mut id = entry.record.get(&id_field).unwrap_or_default();
            if id.is_null() {
                id = FieldValue::Integer(repository.next_id(&root_type)?);
                entry.record.set(&id_field, id.clone())?;
            }

            let values = entry.record.values();
            repository.save(&root_type, id, values.clone())?;

            entry.original = values;
            entry.state = EntryState::Managed;
            entry.change_set = None;
        }
        self.notifications.clear();
        Ok(())
    }
}

impl ChangeTracker for InMemoryUnitOfWork {
    fn scheduled_insertions(&self) -> Vec<RecordHandle> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state == EntryState::New)
            .map(|(index, _)| RecordHandle(index))
            .collect()
    }

    fn scheduled_updates(&self) -> Vec<RecordHandle> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state == EntryState::Managed && !entry.diff().is_empty())
            .map(|(index, _)| RecordHandle(index))
            .collect()
    }

    fn is_scheduled_for_insert(&self, record: RecordHandle) -> bool {
        self.entries
            .get(record.0)
            .is_some_and(|entry| entry.state == EntryState::New)
    }

    fn change_set_of(&self, record: RecordHandle) -> ChangeSet {
        match self.entries.get(record.0) {
            Some(entry) => entry.change_set.clone().unwrap_or_else(|| entry.diff()),
            None => ChangeSet::new(),
        }
    }

    fn notify_field_changed(
        &mut self,
        record: RecordHandle,
        field: &str,
        old: FieldValue,
        new: FieldValue,
    ) {
        if let Some(entry) = self.entries.get_mut(record.0) {
            let mut change_set = entry.change_set.take().unwrap_or_else(|| entry.diff());
            change_set.insert(field, old.clone(), new.clone());
            entry.change_set = Some(change_set);
        }
        self.notifications.push(FieldNotification {
            record,
            field: field.to_string(),
            old,
            new,
        });
    }

    fn recompute_change_set(&mut self, record: RecordHandle) {
        if let Some(entry) = self.entries.get_mut(record.0) {
            entry.change_set = Some(entry.diff());
        }
    }

    fn record(&self, record: RecordHandle) -> Option<&dyn SluggableRecord> {
        let entry = self.entries.get(record.0)?;
        Some(entry.record.as_ref())
    }

    fn record_mut(&mut self, record: RecordHandle) -> Option<&mut dyn SluggableRecord> {
        let entry = self.entries.get_mut(record.0)?;
        Some(entry.record.as_mut())
    }
}
