use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::DomainResult;
use crate::domain::slug::value_objects::FieldValue;

/// Field access for a concrete record type. Implemented once per type in
/// place of runtime reflection; the matching [`RecordMetadata`] carries the
/// storage constraints.
///
/// [`RecordMetadata`]: crate::domain::slug::metadata::RecordMetadata
pub trait SluggableRecord: Send + Sync + fmt::Debug {
    fn record_type(&self) -> &str;

    /// Reads `field`, or `None` when the type has no such field.
    fn get(&self, field: &str) -> Option<FieldValue>;

    fn set(&mut self, field: &str, value: FieldValue) -> DomainResult<()>;

    /// Every mapped field with its current value.
    fn values(&self) -> BTreeMap<String, FieldValue>;
}
