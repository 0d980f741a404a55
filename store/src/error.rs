//! Store error types.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Row not found: {resource_type}/{id}")]
    RowNotFound { resource_type: String, id: String },

    #[error("Duplicate id {id} in table {resource_type}")]
    DuplicateId { resource_type: String, id: String },

    #[error("Id space exhausted for table {0}")]
    IdSpaceExhausted(String),
}

impl StoreError {
    pub fn row_not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::RowNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate_id(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
