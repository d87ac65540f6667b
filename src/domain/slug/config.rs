use std::collections::BTreeMap;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::metadata::RecordMetadata;
use crate::domain::slug::value_objects::SlugStyle;

pub const DEFAULT_SEPARATOR: &str = "-";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_separator() -> String {
    DEFAULT_SEPARATOR.into()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.into()
}

fn default_true() -> bool {
    true
}

/// Options for one slug field, as written in a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SlugOptions {
    pub fields: Vec<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default)]
    pub style: SlugStyle,
    #[serde(default = "default_true")]
    pub updatable: bool,
    #[serde(default = "default_true")]
    pub unique: bool,
    #[serde(default)]
    pub unique_base: Option<String>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

impl SlugOptions {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            separator: default_separator(),
            style: SlugStyle::None,
            updatable: true,
            unique: true,
            unique_base: None,
            date_format: default_date_format(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn style(mut self, style: SlugStyle) -> Self {
        self.style = style;
        self
    }

    pub fn updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn unique_base(mut self, field: impl Into<String>) -> Self {
        self.unique_base = Some(field.into());
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Slug options per record type and slug field, loaded from JSON:
/// `{ "article": { "slug": { "fields": ["title"] } } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlugMapping(pub BTreeMap<String, BTreeMap<String, SlugOptions>>);

impl SlugMapping {
    pub fn from_json(input: &str) -> DomainResult<Self> {
        serde_json::from_str(input).map_err(|err| {
            DomainError::invalid_configuration(format!("slug mapping: {err}"))
        })
    }
}

/// A slug field resolved against its record type's storage mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugField {
    pub name: String,
    pub source_fields: Vec<String>,
    pub separator: String,
    pub style: SlugStyle,
    pub updatable: bool,
    pub unique: bool,
    pub unique_base: Option<String>,
    pub date_format: String,
    pub prefix: String,
    pub suffix: String,
    pub max_length: Option<usize>,
    pub nullable: bool,
    pub identifier: bool,
}

impl SlugField {
    pub fn resolve(
        metadata: &RecordMetadata,
        name: &str,
        options: SlugOptions,
    ) -> DomainResult<Self> {
        let record_type = metadata.record_type.as_str();
        let mapping = metadata
            .field(name)
            .ok_or_else(|| DomainError::unknown_field(record_type, name))?;

        if !mapping.kind.holds_slug() {
            return Err(DomainError::invalid_configuration(format!(
                "{record_type}.{name} cannot store a slug, its type is {:?}",
                mapping.kind
            )));
        }

        if options.fields.is_empty() {
            return Err(DomainError::invalid_configuration(format!(
                "{record_type}.{name} has no source fields"
            )));
        }

        for source in &options.fields {
            let source_mapping = metadata
                .field(source)
                .ok_or_else(|| DomainError::missing_source_field(record_type, source))?;
            if !source_mapping.kind.is_sluggable_source() {
                return Err(DomainError::invalid_configuration(format!(
                    "{record_type}.{source} of type {:?} cannot be used as a slug source",
                    source_mapping.kind
                )));
            }
        }

        if let Some(base) = &options.unique_base {
            if !metadata.has_field(base) {
                return Err(DomainError::unknown_field(record_type, base));
            }
        }

        if StrftimeItems::new(&options.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(DomainError::invalid_configuration(format!(
                "{record_type}.{name} has an invalid date format `{}`",
                options.date_format
            )));
        }

        Ok(Self {
            name: name.to_string(),
            source_fields: options.fields,
            separator: options.separator,
            style: options.style,
            updatable: options.updatable,
            unique: options.unique,
            unique_base: options.unique_base,
            date_format: options.date_format,
            prefix: options.prefix,
            suffix: options.suffix,
            max_length: mapping.length,
            nullable: mapping.nullable,
            identifier: mapping.identifier,
        })
    }
}
