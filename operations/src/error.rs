//! Operation and batch error types.

use jolt_core::messages::*;
use jolt_core::{ErrorDocument, ErrorObject, OperationKind, ToErrorObject, OPERATIONS_MEMBER};
use jolt_service::ServiceError;
use jolt_transaction::TransactionError;
use thiserror::Error;

use crate::local_ids::LocalIdError;

/// Result type for a single operation.
pub type OperationResult<T> = Result<T, OperationError>;

/// Result type for a whole batch.
pub type BatchResult<T> = Result<T, BatchError>;

/// Failures of one operation. `member` fields are pointers relative to the
/// operation, e.g. `/data/relationships/author/data/lid`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("Local ID '{lid}' of type '{resource_type}' is already defined.")]
    DuplicateLocalId {
        lid: String,
        resource_type: String,
        member: String,
    },

    #[error("Local ID '{lid}' of type '{resource_type}' is not defined by an earlier operation.")]
    UnknownLocalId {
        lid: String,
        resource_type: String,
        member: String,
    },

    #[error("Local ID '{lid}' of type '{resource_type}' is referenced before its resource is created.")]
    LocalIdNotYetAssigned {
        lid: String,
        resource_type: String,
        member: String,
    },

    #[error("Resources of type '{resource_type}' cannot be created with a client-supplied ID.")]
    ResourceIdInPostRequestNotAllowed { resource_type: String },

    #[error("Resource type '{resource_type}' does not exist.")]
    UnknownResourceType {
        resource_type: String,
        member: String,
    },

    #[error("The '{kind}' operation is not accessible for resource type '{resource_type}'.")]
    UnsupportedOperation {
        resource_type: String,
        kind: OperationKind,
    },

    #[error("{detail}")]
    InvalidOperation { member: String, detail: String },

    #[error("Resource of type '{resource_type}' does not contain a relationship named '{relationship}'.")]
    RelationshipNotFound {
        resource_type: String,
        relationship: String,
        member: String,
    },

    #[error("Relationship '{relationship}' is not a to-many relationship.")]
    RelationshipNotToMany { relationship: String },

    #[error("Type '{actual}' is not convertible to type '{expected}' of relationship '{relationship}'.")]
    RelationshipTypeMismatch {
        relationship: String,
        expected: String,
        actual: String,
        member: String,
    },

    #[error("Type '{actual}' in 'data.type' does not match type '{expected}' in 'ref.type'.")]
    ResourceTypeMismatch { expected: String, actual: String },

    #[error("Resource ID '{data_id}' in 'data.id' does not match '{ref_id}' in 'ref.id'.")]
    ResourceIdMismatch {
        ref_id: String,
        data_id: String,
        member: String,
    },

    #[error("'{id}' is not a valid ID for resource type '{resource_type}'.")]
    InvalidId {
        resource_type: String,
        id: String,
        member: String,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("operation cancelled")]
    Cancelled,
}

impl OperationError {
    /// Tie a tracker failure to the member that carried the lid.
    pub fn local_id(error: LocalIdError, member: impl Into<String>) -> Self {
        let member = member.into();
        match error {
            LocalIdError::Duplicate { lid, resource_type } => Self::DuplicateLocalId {
                lid,
                resource_type,
                member,
            },
            LocalIdError::Unknown { lid, resource_type } => Self::UnknownLocalId {
                lid,
                resource_type,
                member,
            },
            LocalIdError::NotYetAssigned { lid, resource_type } => Self::LocalIdNotYetAssigned {
                lid,
                resource_type,
                member,
            },
        }
    }

    pub fn client_id_not_allowed(resource_type: impl Into<String>) -> Self {
        Self::ResourceIdInPostRequestNotAllowed {
            resource_type: resource_type.into(),
        }
    }

    pub fn unknown_resource_type(resource_type: impl Into<String>, member: impl Into<String>) -> Self {
        Self::UnknownResourceType {
            resource_type: resource_type.into(),
            member: member.into(),
        }
    }

    pub fn unsupported_operation(resource_type: impl Into<String>, kind: OperationKind) -> Self {
        Self::UnsupportedOperation {
            resource_type: resource_type.into(),
            kind,
        }
    }

    pub fn invalid_operation(member: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidOperation {
            member: member.into(),
            detail: detail.into(),
        }
    }

    pub fn relationship_not_found(
        resource_type: impl Into<String>,
        relationship: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self::RelationshipNotFound {
            resource_type: resource_type.into(),
            relationship: relationship.into(),
            member: member.into(),
        }
    }

    pub fn relationship_not_to_many(relationship: impl Into<String>) -> Self {
        Self::RelationshipNotToMany {
            relationship: relationship.into(),
        }
    }

    pub fn relationship_type_mismatch(
        relationship: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self::RelationshipTypeMismatch {
            relationship: relationship.into(),
            expected: expected.into(),
            actual: actual.into(),
            member: member.into(),
        }
    }

    pub fn resource_type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ResourceTypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn resource_id_mismatch(
        ref_id: impl Into<String>,
        data_id: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self::ResourceIdMismatch {
            ref_id: ref_id.into(),
            data_id: data_id.into(),
            member: member.into(),
        }
    }

    pub fn invalid_id(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self::InvalidId {
            resource_type: resource_type.into(),
            id: id.into(),
            member: member.into(),
        }
    }

    /// HTTP status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            OperationError::DuplicateLocalId { .. }
            | OperationError::UnknownLocalId { .. }
            | OperationError::LocalIdNotYetAssigned { .. } => 400,
            OperationError::ResourceIdInPostRequestNotAllowed { .. }
            | OperationError::UnsupportedOperation { .. }
            | OperationError::RelationshipNotToMany { .. } => 403,
            OperationError::RelationshipNotFound { .. } => 404,
            OperationError::RelationshipTypeMismatch { .. }
            | OperationError::ResourceTypeMismatch { .. }
            | OperationError::ResourceIdMismatch { .. } => 409,
            OperationError::UnknownResourceType { .. }
            | OperationError::InvalidOperation { .. }
            | OperationError::InvalidId { .. } => 422,
            OperationError::Cancelled => 499,
            OperationError::Service(error) => error.status(),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            OperationError::DuplicateLocalId { .. } => TITLE_DUPLICATE_LOCAL_ID,
            OperationError::UnknownLocalId { .. } => TITLE_UNKNOWN_LOCAL_ID,
            OperationError::LocalIdNotYetAssigned { .. } => TITLE_LOCAL_ID_NOT_ASSIGNED,
            OperationError::ResourceIdInPostRequestNotAllowed { .. } => TITLE_CLIENT_ID_NOT_ALLOWED,
            OperationError::UnknownResourceType { .. } => TITLE_UNKNOWN_RESOURCE_TYPE,
            OperationError::UnsupportedOperation { .. } => TITLE_UNSUPPORTED_OPERATION,
            OperationError::InvalidOperation { .. } => TITLE_INVALID_OPERATION,
            OperationError::RelationshipNotFound { .. } => TITLE_RELATIONSHIP_NOT_FOUND,
            OperationError::RelationshipNotToMany { .. } => TITLE_RELATIONSHIP_NOT_TO_MANY,
            OperationError::RelationshipTypeMismatch { .. }
            | OperationError::ResourceTypeMismatch { .. } => TITLE_RELATIONSHIP_TYPE_MISMATCH,
            OperationError::ResourceIdMismatch { .. } => TITLE_ID_MISMATCH,
            OperationError::InvalidId { .. } => TITLE_INVALID_ID,
            OperationError::Cancelled => TITLE_CANCELLED,
            OperationError::Service(_) => TITLE_INTERNAL,
        }
    }

    fn member(&self) -> &str {
        match self {
            OperationError::DuplicateLocalId { member, .. }
            | OperationError::UnknownLocalId { member, .. }
            | OperationError::LocalIdNotYetAssigned { member, .. }
            | OperationError::UnknownResourceType { member, .. }
            | OperationError::InvalidOperation { member, .. }
            | OperationError::RelationshipNotFound { member, .. }
            | OperationError::RelationshipTypeMismatch { member, .. }
            | OperationError::ResourceIdMismatch { member, .. }
            | OperationError::InvalidId { member, .. } => member,
            OperationError::ResourceIdInPostRequestNotAllowed { .. } => "/data/id",
            OperationError::ResourceTypeMismatch { .. } => "/data/type",
            OperationError::RelationshipNotToMany { .. } => "/ref/relationship",
            OperationError::UnsupportedOperation { .. } => "/op",
            OperationError::Service(_) | OperationError::Cancelled => "",
        }
    }
}

impl ToErrorObject for OperationError {
    fn to_error_object(&self, index: Option<usize>) -> ErrorObject {
        match self {
            OperationError::Service(error) => error.to_error_object(index),
            OperationError::Cancelled => {
                ErrorObject::new(self.status(), self.title()).at_operation(index, "")
            }
            other => ErrorObject::new(other.status(), other.title())
                .with_detail(other.to_string())
                .at_operation(index, other.member()),
        }
    }
}

/// Failure of a whole request. Exactly one is produced per failed batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Missing request body.")]
    MissingBody,

    #[error("{0}")]
    InvalidBody(String),

    #[error("The request body contains no operations.")]
    NoOperations,

    #[error("The number of operations in this request ({count}) is higher than the maximum of {max}.")]
    TooManyOperations { count: usize, max: usize },

    #[error("operation {index} failed: {error}")]
    Operation { index: usize, error: OperationError },

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

impl BatchError {
    pub fn operation(index: usize, error: impl Into<OperationError>) -> Self {
        Self::Operation {
            index,
            error: error.into(),
        }
    }

    /// Index of the failing operation, if the failure belongs to one.
    pub fn index(&self) -> Option<usize> {
        match self {
            BatchError::Operation { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            BatchError::MissingBody | BatchError::InvalidBody(_) => 422,
            BatchError::NoOperations => 400,
            BatchError::TooManyOperations { .. } => 413,
            BatchError::Operation { error, .. } => error.status(),
            BatchError::Transaction(_) => 500,
        }
    }

    pub fn to_error_document(&self) -> ErrorDocument {
        ErrorDocument::single(self.to_error_object(self.index()))
    }
}

impl ToErrorObject for BatchError {
    fn to_error_object(&self, index: Option<usize>) -> ErrorObject {
        let pointer = format!("/{OPERATIONS_MEMBER}");
        match self {
            BatchError::MissingBody => ErrorObject::new(self.status(), TITLE_MISSING_BODY),
            BatchError::InvalidBody(detail) => {
                ErrorObject::new(self.status(), TITLE_INVALID_OPERATION).with_detail(detail.clone())
            }
            BatchError::NoOperations => ErrorObject::new(self.status(), TITLE_NO_OPERATIONS)
                .with_detail(self.to_string())
                .with_pointer(pointer),
            BatchError::TooManyOperations { .. } => {
                ErrorObject::new(self.status(), TITLE_TOO_MANY_OPERATIONS)
                    .with_detail(self.to_string())
                    .with_pointer(pointer)
            }
            BatchError::Operation { error, .. } => error.to_error_object(index),
            BatchError::Transaction(_) => ErrorObject::new(self.status(), TITLE_INTERNAL),
        }
    }
}
