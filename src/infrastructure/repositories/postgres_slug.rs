// src/infrastructure/repositories/postgres_slug.rs
use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slug::{FieldValue, SlugQuery, SlugRepository, StoredSlug};

/// Where the records of one root type live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugTable {
    table: String,
    id_column: String,
    columns: HashMap<String, String>,
}

impl SlugTable {
    /// `table` may be schema-qualified. The id column defaults to `id`
    /// and fields map to same-named columns unless overridden.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            id_column: "id".into(),
            columns: HashMap::new(),
        }
    }

    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    pub fn with_column(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    fn column_for(&self, field: &str) -> DomainResult<String> {
        let column = self.columns.get(field).map_or(field, String::as_str);
        quote_identifier(column)
    }

    fn validate(&self) -> DomainResult<()> {
        quote_table(&self.table)?;
        quote_identifier(&self.id_column)?;
        for column in self.columns.values() {
            quote_identifier(column)?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostgresSlugRepository {
    pool: PgPool,
    tables: HashMap<String, SlugTable>,
}

impl PostgresSlugRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tables: HashMap::new(),
        }
    }

    pub fn with_table(mut self, root_type: impl Into<String>, table: SlugTable) -> DomainResult<Self> {
        table.validate()?;
        self.tables.insert(root_type.into(), table);
        Ok(self)
    }
}

#[derive(Debug, FromRow)]
struct SlugRow {
    id: String,
    slug: String,
}

#[async_trait]
impl SlugRepository for PostgresSlugRepository {
    async fn find_by_prefix(&self, query: SlugQuery<'_>) -> DomainResult<Vec<StoredSlug>> {
        let table = self
            .tables
            .get(query.root_type)
            .ok_or_else(|| DomainError::UnknownRecordType(query.root_type.to_string()))?;

        let mut builder = build_prefix_query(table, query)?;
        let rows = builder
            .build_query_as::<SlugRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|row| StoredSlug {
                id: FieldValue::Text(row.id),
                slug: row.slug,
            })
            .collect())
    }
}

fn build_prefix_query(
    table: &SlugTable,
    query: SlugQuery<'_>,
) -> DomainResult<QueryBuilder<'static, Postgres>> {
    let id_column = quote_identifier(&table.id_column)?;
    let slug_column = table.column_for(query.field)?;

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT CAST(");
    builder.push(&id_column);
    builder.push(" AS TEXT) AS id, ");
    builder.push(&slug_column);
    builder.push(" AS slug FROM ");
    builder.push(quote_table(&table.table)?);
    builder.push(" WHERE ");
    builder.push(&slug_column);
    builder.push(" ILIKE ");
    builder.push_bind(like_prefix(query.prefix));
    builder.push(" ESCAPE '\\'");

    if let Some((field, value)) = query.group {
        builder.push(" AND ");
        builder.push(table.column_for(field)?);
        if value.is_null() {
            builder.push(" IS NULL");
        } else {
            builder.push(" = ");
            push_value(&mut builder, value);
        }
    }

    if let Some(id) = query.exclude_id {
        builder.push(" AND CAST(");
        builder.push(&id_column);
        builder.push(" AS TEXT) <> ");
        builder.push_bind(id.to_string());
    }

    Ok(builder)
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &FieldValue) {
    match value.clone() {
        FieldValue::Text(v) => {
            builder.push_bind(v);
        }
        FieldValue::Integer(v) => {
            builder.push_bind(v);
        }
        FieldValue::Float(v) => {
            builder.push_bind(v);
        }
        FieldValue::Bool(v) => {
            builder.push_bind(v);
        }
        FieldValue::Date(v) => {
            builder.push_bind(v);
        }
        FieldValue::DateTime(v) => {
            builder.push_bind(v);
        }
        FieldValue::Time(v) => {
            builder.push_bind(v);
        }
        FieldValue::Null => {
            builder.push("NULL");
        }
    }
}

/// LIKE pattern matching anything that starts with `prefix` literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn quote_identifier(name: &str) -> DomainResult<String> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !valid {
        return Err(DomainError::invalid_configuration(format!(
            "`{name}` is not a valid SQL identifier"
        )));
    }
    Ok(format!("\"{name}\""))
}

fn quote_table(name: &str) -> DomainResult<String> {
    let parts = name
        .split('.')
        .map(quote_identifier)
        .collect::<DomainResult<Vec<_>>>()?;
    Ok(parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query<'a>(group: Option<(&'a str, &'a FieldValue)>, exclude: Option<&'a FieldValue>) -> SlugQuery<'a> {
        SlugQuery {
            root_type: "article",
            field: "slug",
            prefix: "hello_world",
            group,
            exclude_id: exclude,
        }
    }

    #[test]
    fn like_prefix_escapes_metacharacters() {
        assert_eq!(like_prefix("foo"), "foo%");
        assert_eq!(like_prefix("50%_off\\"), "50\\%\\_off\\\\%");
    }

    #[test]
    fn identifiers_are_validated_and_quoted() {
        assert_eq!(quote_identifier("slug_2").unwrap(), "\"slug_2\"");
        assert_eq!(quote_table("public.articles").unwrap(), "\"public\".\"articles\"");
        assert!(quote_identifier("slug; DROP TABLE x").is_err());
        assert!(quote_identifier("").is_err());
        assert!(quote_identifier("2fast").is_err());
    }

    #[test]
    fn prefix_query_without_scope() {
        let table = SlugTable::new("articles");
        let builder = build_prefix_query(&table, query(None, None)).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT CAST(\"id\" AS TEXT) AS id, \"slug\" AS slug FROM \"articles\" WHERE \"slug\" ILIKE $1 ESCAPE '\\'"
        );
    }

    #[test]
    fn prefix_query_with_group_and_exclusion() {
        let table = SlugTable::new("cms.articles")
            .with_id_column("article_id")
            .with_column("category", "category_id");
        let category = FieldValue::Integer(3);
        let id = FieldValue::Integer(7);
        let builder = build_prefix_query(&table, query(Some(("category", &category)), Some(&id))).unwrap();
        assert_eq!(
            builder.sql(),
            "SELECT CAST(\"article_id\" AS TEXT) AS id, \"slug\" AS slug FROM \"cms\".\"articles\" \
             WHERE \"slug\" ILIKE $1 ESCAPE '\\' AND \"category_id\" = $2 AND CAST(\"article_id\" AS TEXT) <> $3"
        );
    }

    #[test]
    fn null_group_uses_is_null() {
        let table = SlugTable::new("articles");
        let builder = build_prefix_query(&table, query(Some(("category", &FieldValue::Null)), None)).unwrap();
        assert!(builder.sql().ends_with("AND \"category\" IS NULL"));
    }
}
