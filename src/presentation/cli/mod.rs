mod entry;

pub use entry::{ENTRY_TYPE, Entry};

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::application::{commands::slugs::SlugCommandService, registry::SlugRegistry};
use crate::config::AppConfig;
use crate::domain::slug::{SlugMapping, SlugOptions, SlugRepository};
use crate::infrastructure::{
    database,
    repositories::{InMemorySlugRepository, PostgresSlugRepository, SlugTable},
    unit_of_work::InMemoryUnitOfWork,
    util::{DefaultUrlizer, DeunicodeTransliterator},
};

const USAGE: &str = "usage: slugforge [--json] <title>...";

/// Slugs every title argument as one batch of new entries and prints the
/// result. Nothing is written back to the database.
pub async fn run(config: &AppConfig, args: Vec<String>) -> Result<()> {
    let json = args.iter().any(|arg| arg == "--json");
    let titles: Vec<String> = args.into_iter().filter(|arg| arg != "--json").collect();
    if titles.is_empty() {
        bail!(USAGE);
    }

    let registry = Arc::new(build_registry(config)?);
    let repository = build_repository(config).await?;
    let service = SlugCommandService::new(
        Arc::clone(&registry),
        repository,
        Arc::new(DeunicodeTransliterator),
        Arc::new(DefaultUrlizer),
    );

    let mut uow = InMemoryUnitOfWork::new();
    let mut handles = Vec::with_capacity(titles.len());
    for title in &titles {
        let mut entry = Entry::new(title.as_str());
        service.prepare_insert(&mut entry)?;
        handles.push(uow.persist(Box::new(entry)));
    }

    let report = service.flush(&mut uow).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (title, handle) in titles.iter().zip(handles) {
            let slug = uow.get(handle, "slug").unwrap_or_default();
            println!("{title} -> {slug}");
        }
    }
    Ok(())
}

fn build_registry(config: &AppConfig) -> Result<SlugRegistry> {
    let metadata = Entry::metadata(config.max_length());
    let mut registry = SlugRegistry::new();

    match config.mapping_path() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading slug mapping {}", path.display()))?;
            registry.register_mapping([metadata], SlugMapping::from_json(&raw)?)?;
        }
        None => {
            let options = SlugOptions::new(["title"])
                .separator(config.separator())
                .style(config.style())
                .unique(config.unique());
            registry.register(metadata, [("slug", options)])?;
        }
    }
    Ok(registry)
}

async fn build_repository(config: &AppConfig) -> Result<Arc<dyn SlugRepository>> {
    let Some(url) = config.database_url() else {
        tracing::info!("no DATABASE_URL set, checking collisions within this run only");
        return Ok(Arc::new(InMemorySlugRepository::new()));
    };

    let pool = database::init_pool(url).await?;
    let table = SlugTable::new(config.table())
        .with_id_column(config.id_column())
        .with_column("slug", config.slug_column());
    let repository = PostgresSlugRepository::new(pool).with_table(ENTRY_TYPE, table)?;
    tracing::info!(table = config.table(), "checking collisions against postgres");
    Ok(Arc::new(repository))
}
