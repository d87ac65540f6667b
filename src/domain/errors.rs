use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("unknown record type: {0}")]
    UnknownRecordType(String),
    #[error("unknown field `{field}` on record type `{record_type}`")]
    UnknownField { record_type: String, field: String },
    #[error("source field `{field}` is not mapped on record type `{record_type}`")]
    MissingSourceField { record_type: String, field: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn unknown_field(record_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            record_type: record_type.into(),
            field: field.into(),
        }
    }

    pub fn missing_source_field(record_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingSourceField {
            record_type: record_type.into(),
            field: field.into(),
        }
    }
}
