// src/infrastructure/repositories/mod.rs
mod error;
mod memory_slug;
mod postgres_slug;

pub use error::map_sqlx;
pub use memory_slug::{InMemorySlugRepository, StoredRecord};
pub use postgres_slug::{PostgresSlugRepository, SlugTable};
