use std::collections::HashMap;

use crate::domain::slug::value_objects::RecordHandle;

/// Records that received a slug earlier in the running batch, grouped by
/// root record type. Owned by a single flush; records are appended once
/// their slugs are final, so a record never sees itself as a candidate.
#[derive(Debug, Default)]
pub struct BatchLedger {
    entries: HashMap<String, Vec<RecordHandle>>,
}

impl BatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn record(&mut self, root_type: &str, record: RecordHandle) {
        self.entries
            .entry(root_type.to_string())
            .or_default()
            .push(record);
    }

    pub fn candidates_for(&self, root_type: &str) -> &[RecordHandle] {
        self.entries.get(root_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
