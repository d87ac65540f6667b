// src/config.rs
use std::{env, path::PathBuf};
use thiserror::Error;

use crate::domain::slug::SlugStyle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    database_url: Option<String>,
    table: String,
    id_column: String,
    slug_column: String,
    separator: String,
    style: SlugStyle,
    max_length: Option<usize>,
    unique: bool,
    mapping_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_table() -> String {
    "entries".into()
}

fn default_id_column() -> String {
    "id".into()
}

fn default_slug_column() -> String {
    "slug".into()
}

fn default_separator() -> String {
    "-".into()
}

impl AppConfig {
    /// Build configuration from environment variables, with defaults for
    /// everything; only malformed values are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let style = match non_empty("SLUG_STYLE") {
            Some(raw) => raw.parse::<SlugStyle>().map_err(ConfigError::Invalid)?,
            None => SlugStyle::None,
        };

        let max_length = non_empty("SLUG_MAX_LENGTH")
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|len| *len > 0)
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!(
                            "SLUG_MAX_LENGTH must be a positive integer, got `{raw}`"
                        ))
                    })
            })
            .transpose()?;

        let unique = non_empty("SLUG_UNIQUE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            table: non_empty("SLUG_TABLE").unwrap_or_else(default_table),
            id_column: non_empty("SLUG_ID_COLUMN").unwrap_or_else(default_id_column),
            slug_column: non_empty("SLUG_COLUMN").unwrap_or_else(default_slug_column),
            separator: lookup("SLUG_SEPARATOR").unwrap_or_else(default_separator),
            style,
            max_length,
            unique,
            mapping_path: non_empty("SLUG_MAPPING_PATH").map(PathBuf::from),
        })
    }

    /// Postgres connection string; when absent, collisions are only
    /// checked within the current run.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn slug_column(&self) -> &str {
        &self.slug_column
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn style(&self) -> SlugStyle {
        self.style
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    pub fn mapping_path(&self) -> Option<&PathBuf> {
        self.mapping_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url(), None);
        assert_eq!(config.table(), "entries");
        assert_eq!(config.slug_column(), "slug");
        assert_eq!(config.separator(), "-");
        assert_eq!(config.style(), SlugStyle::None);
        assert_eq!(config.max_length(), None);
        assert!(config.unique());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/cms"),
            ("SLUG_SEPARATOR", "_"),
            ("SLUG_STYLE", "upper"),
            ("SLUG_MAX_LENGTH", "40"),
            ("SLUG_UNIQUE", "false"),
        ])
        .unwrap();
        assert_eq!(config.database_url(), Some("postgres://localhost/cms"));
        assert_eq!(config.separator(), "_");
        assert_eq!(config.style(), SlugStyle::Upper);
        assert_eq!(config.max_length(), Some(40));
        assert!(!config.unique());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(config(&[("SLUG_MAX_LENGTH", "zero")]).is_err());
        assert!(config(&[("SLUG_MAX_LENGTH", "0")]).is_err());
        assert!(config(&[("SLUG_STYLE", "shouting")]).is_err());
    }
}
