use super::SlugCommandService;
use crate::domain::{
    errors::DomainResult,
    slug::{FieldValue, IDENTIFIER_PLACEHOLDER, SluggableRecord},
};

impl SlugCommandService {
    /// Before-create hook. Slug fields that are also the record identifier
    /// cannot stay empty until the flush, so they get a placeholder.
    pub fn prepare_insert(&self, record: &mut dyn SluggableRecord) -> DomainResult<()> {
        let Some(sluggable) = self.registry.get(record.record_type()) else {
            return Ok(());
        };

        for field in sluggable.fields.iter().filter(|field| field.identifier) {
            record.set(&field.name, FieldValue::text(IDENTIFIER_PLACEHOLDER))?;
        }
        Ok(())
    }
}
