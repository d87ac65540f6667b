use crate::domain::errors::DomainError;

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    // undefined_table / undefined_column: the slug table mapping is wrong
                    "42P01" | "42703" => {
                        return DomainError::InvalidConfiguration(db_err.message().to_string());
                    }
                    "42501" => {
                        return DomainError::Persistence(format!(
                            "permission denied: {}",
                            db_err.message()
                        ));
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        sqlx::Error::ColumnDecode { index, source } => {
            DomainError::Persistence(format!("cannot decode column {index}: {source}"))
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
