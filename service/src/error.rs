//! Service error types.

use jolt_core::messages::*;
use jolt_core::{ErrorObject, ToErrorObject};
use jolt_transaction::TransactionError;
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur while a service applies a write.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Resource of type '{resource_type}' with ID '{id}' does not exist.")]
    NotFound { resource_type: String, id: String },

    #[error("Related resource of type '{resource_type}' with ID '{id}' in relationship '{relationship}' does not exist.")]
    RelatedNotFound {
        relationship: String,
        resource_type: String,
        id: String,
    },

    #[error("Unknown attribute: {attr} on type {type_name}")]
    UnknownAttribute { type_name: String, attr: String },

    #[error("Unknown relationship: {relationship} on type {type_name}")]
    UnknownRelationship {
        type_name: String,
        relationship: String,
    },

    #[error("Missing required attribute: {attr} on type {type_name}")]
    MissingRequired { type_name: String, attr: String },

    #[error("Cannot set non-nullable attribute to null: {attr} on type {type_name}")]
    RequiredNullViolation { type_name: String, attr: String },

    #[error("Invalid attribute type: expected {expected}, got {actual} for {attr}")]
    InvalidAttrType {
        attr: String,
        expected: String,
        actual: String,
    },

    #[error("Cannot modify readonly attribute: {attr} on type {type_name}")]
    ReadonlyAttribute { type_name: String, attr: String },

    #[error("Value of {attr} does not match pattern {pattern}")]
    PatternMismatch { attr: String, pattern: String },

    #[error("Length of {attr} must be between {min} and {max}, got {actual}")]
    LengthViolation {
        attr: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Relationship {relationship} expects type '{expected}', got '{actual}'")]
    RelationshipTypeMismatch {
        relationship: String,
        expected: String,
        actual: String,
    },

    #[error("Relationship {relationship} is {expected}")]
    CardinalityMismatch {
        relationship: String,
        expected: &'static str,
    },

    #[error("'{id}' is not a valid ID for type '{resource_type}'")]
    InvalidId { resource_type: String, id: String },

    #[error("Resource of type '{resource_type}' with ID '{id}' already exists.")]
    Conflict { resource_type: String, id: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

impl ServiceError {
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn related_not_found(
        relationship: impl Into<String>,
        resource_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self::RelatedNotFound {
            relationship: relationship.into(),
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn unknown_attribute(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            type_name: type_name.into(),
            attr: attr.into(),
        }
    }

    pub fn unknown_relationship(type_name: impl Into<String>, relationship: impl Into<String>) -> Self {
        Self::UnknownRelationship {
            type_name: type_name.into(),
            relationship: relationship.into(),
        }
    }

    pub fn missing_required(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::MissingRequired {
            type_name: type_name.into(),
            attr: attr.into(),
        }
    }

    pub fn required_null_violation(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::RequiredNullViolation {
            type_name: type_name.into(),
            attr: attr.into(),
        }
    }

    pub fn invalid_attr_type(
        attr: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttrType {
            attr: attr.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn readonly_attribute(type_name: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::ReadonlyAttribute {
            type_name: type_name.into(),
            attr: attr.into(),
        }
    }

    pub fn pattern_mismatch(attr: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::PatternMismatch {
            attr: attr.into(),
            pattern: pattern.into(),
        }
    }

    pub fn length_violation(attr: impl Into<String>, min: usize, max: usize, actual: usize) -> Self {
        Self::LengthViolation {
            attr: attr.into(),
            min,
            max,
            actual,
        }
    }

    pub fn relationship_type_mismatch(
        relationship: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::RelationshipTypeMismatch {
            relationship: relationship.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn cardinality_mismatch(relationship: impl Into<String>, to_many: bool) -> Self {
        Self::CardinalityMismatch {
            relationship: relationship.into(),
            expected: if to_many { "to-many" } else { "to-one" },
        }
    }

    pub fn invalid_id(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::InvalidId {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn conflict(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// HTTP status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::NotFound { .. }
            | ServiceError::RelatedNotFound { .. }
            | ServiceError::UnknownRelationship { .. } => 404,
            ServiceError::RelationshipTypeMismatch { .. } | ServiceError::Conflict { .. } => 409,
            ServiceError::UnknownAttribute { .. }
            | ServiceError::MissingRequired { .. }
            | ServiceError::RequiredNullViolation { .. }
            | ServiceError::InvalidAttrType { .. }
            | ServiceError::ReadonlyAttribute { .. }
            | ServiceError::PatternMismatch { .. }
            | ServiceError::LengthViolation { .. }
            | ServiceError::CardinalityMismatch { .. }
            | ServiceError::InvalidId { .. } => 422,
            ServiceError::Cancelled => 499,
            ServiceError::Transaction(_) => 500,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => TITLE_RESOURCE_NOT_FOUND,
            ServiceError::RelatedNotFound { .. } => TITLE_RELATED_NOT_FOUND,
            ServiceError::UnknownRelationship { .. } => TITLE_RELATIONSHIP_NOT_FOUND,
            ServiceError::RelationshipTypeMismatch { .. } => TITLE_RELATIONSHIP_TYPE_MISMATCH,
            ServiceError::CardinalityMismatch { .. } => TITLE_CARDINALITY_MISMATCH,
            ServiceError::InvalidId { .. } => TITLE_INVALID_ID,
            ServiceError::Conflict { .. } => TITLE_CONFLICT,
            ServiceError::Cancelled => TITLE_CANCELLED,
            ServiceError::Transaction(_) => TITLE_INTERNAL,
            _ => TITLE_VALIDATION_FAILED,
        }
    }

    /// Member of the operation the failure points at, relative to it.
    fn member(&self) -> String {
        match self {
            ServiceError::UnknownAttribute { attr, .. }
            | ServiceError::MissingRequired { attr, .. }
            | ServiceError::RequiredNullViolation { attr, .. }
            | ServiceError::InvalidAttrType { attr, .. }
            | ServiceError::ReadonlyAttribute { attr, .. }
            | ServiceError::PatternMismatch { attr, .. }
            | ServiceError::LengthViolation { attr, .. } => format!("/data/attributes/{attr}"),
            ServiceError::UnknownRelationship { relationship, .. }
            | ServiceError::RelationshipTypeMismatch { relationship, .. }
            | ServiceError::CardinalityMismatch { relationship, .. } => {
                format!("/data/relationships/{relationship}")
            }
            ServiceError::Conflict { .. } => "/data/id".to_string(),
            _ => String::new(),
        }
    }
}

impl ToErrorObject for ServiceError {
    fn to_error_object(&self, index: Option<usize>) -> ErrorObject {
        let error = ErrorObject::new(self.status(), self.title());
        let error = match self {
            // Internal details stay in the logs.
            ServiceError::Transaction(_) | ServiceError::Cancelled => error,
            other => error.with_detail(other.to_string()),
        };
        error.at_operation(index, &self.member())
    }
}
