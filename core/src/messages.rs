//! Error titles shared across the pipeline.
//!
//! These constants keep the wire titles identical wherever an error is raised.

pub const TITLE_CLIENT_ID_NOT_ALLOWED: &str =
    "Specifying the resource ID in POST requests is not allowed.";

pub const TITLE_DUPLICATE_LOCAL_ID: &str = "Another local ID with the same name is already defined at this point.";

pub const TITLE_UNKNOWN_LOCAL_ID: &str = "Server-generated value for local ID is not available at this point.";

pub const TITLE_LOCAL_ID_NOT_ASSIGNED: &str = "Local ID cannot be both defined and used within the same operation.";

pub const TITLE_UNKNOWN_RESOURCE_TYPE: &str = "Request body includes unknown resource type.";

pub const TITLE_UNSUPPORTED_OPERATION: &str = "The requested operation is not accessible.";

pub const TITLE_INVALID_OPERATION: &str = "Failed to deserialize request body.";

pub const TITLE_NO_OPERATIONS: &str = "No operations found.";

pub const TITLE_TOO_MANY_OPERATIONS: &str = "Request exceeds the maximum number of operations.";

pub const TITLE_MISSING_BODY: &str = "Missing request body.";

pub const TITLE_RESOURCE_NOT_FOUND: &str = "The requested resource does not exist.";

pub const TITLE_RELATED_NOT_FOUND: &str = "A related resource does not exist.";

pub const TITLE_RELATIONSHIP_NOT_FOUND: &str = "The requested relationship does not exist.";

pub const TITLE_RELATIONSHIP_NOT_TO_MANY: &str = "Only to-many relationships can be targeted through this operation.";

pub const TITLE_RELATIONSHIP_TYPE_MISMATCH: &str = "Resource type mismatch between relationship and identifier.";

pub const TITLE_ID_MISMATCH: &str = "Resource ID mismatch between 'ref.id' and 'data.id'.";

pub const TITLE_INVALID_ID: &str = "The resource ID is invalid.";

pub const TITLE_CARDINALITY_MISMATCH: &str = "The relationship data does not match the relationship cardinality.";

pub const TITLE_CONFLICT: &str = "The resource conflicts with existing state.";

pub const TITLE_VALIDATION_FAILED: &str = "Input validation failed.";

pub const TITLE_CANCELLED: &str = "The request was cancelled.";

pub const TITLE_INTERNAL: &str = "An unhandled error occurred while processing an operation in this request.";
