use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::{RecordMetadata, SlugField, SlugMapping, SlugOptions};

/// A record type with its resolved slug fields, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SluggableType {
    pub metadata: RecordMetadata,
    pub fields: Vec<SlugField>,
}

/// Slug configuration resolved once per record type.
#[derive(Debug, Default, Clone)]
pub struct SlugRegistry {
    types: HashMap<String, Arc<SluggableType>>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `slugs` against `metadata` and caches the result. Nothing
    /// is registered for the type if any field fails.
    pub fn register<I, S>(&mut self, metadata: RecordMetadata, slugs: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = (S, SlugOptions)>,
        S: AsRef<str>,
    {
        let fields = slugs
            .into_iter()
            .map(|(name, options)| SlugField::resolve(&metadata, name.as_ref(), options))
            .collect::<DomainResult<Vec<_>>>()?;

        if fields.is_empty() {
            return Err(DomainError::invalid_configuration(format!(
                "record type `{}` has no slug fields",
                metadata.record_type
            )));
        }

        tracing::debug!(
            record_type = %metadata.record_type,
            root_type = %metadata.root_type,
            fields = fields.len(),
            "registered sluggable record type"
        );

        self.types.insert(
            metadata.record_type.clone(),
            Arc::new(SluggableType { metadata, fields }),
        );
        Ok(())
    }

    /// Registers every record type named in `mapping`, taking storage
    /// constraints from `metadata`.
    pub fn register_mapping(
        &mut self,
        metadata: impl IntoIterator<Item = RecordMetadata>,
        mapping: SlugMapping,
    ) -> DomainResult<()> {
        let mut metadata: HashMap<String, RecordMetadata> = metadata
            .into_iter()
            .map(|meta| (meta.record_type.clone(), meta))
            .collect();

        for (record_type, slugs) in mapping.0 {
            let meta = metadata
                .remove(&record_type)
                .ok_or_else(|| DomainError::UnknownRecordType(record_type.clone()))?;
            self.register(meta, slugs)?;
        }
        Ok(())
    }

    pub fn get(&self, record_type: &str) -> Option<Arc<SluggableType>> {
        self.types.get(record_type).cloned()
    }

    pub fn is_sluggable(&self, record_type: &str) -> bool {
        self.types.contains_key(record_type)
    }

    pub fn metadata(&self, record_type: &str) -> Option<&RecordMetadata> {
        self.types.get(record_type).map(|ty| &ty.metadata)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
