pub mod config;
pub mod metadata;
pub mod record;
pub mod repository;
pub mod services;
pub mod tracker;
pub mod value_objects;

pub use config::{SlugField, SlugMapping, SlugOptions};
pub use metadata::{FieldKind, FieldMapping, RecordMetadata};
pub use record::SluggableRecord;
pub use repository::{SlugQuery, SlugRepository, StoredSlug, SuspendedFilters};
pub use tracker::{ChangeSet, ChangeTracker, FieldChange};
pub use value_objects::{FieldValue, IDENTIFIER_PLACEHOLDER, RecordHandle, SlugStyle};
