//! Jolt Service
//!
//! The generic single-resource service the operation processors delegate to.
//!
//! Responsibilities:
//! - Validate attributes and relationships against the registry
//! - Apply creates, updates, deletes and relationship changes inside a transaction
//! - Clear references to deleted resources
//! - Report whether a write produced state the client did not send
//!
//! # Module Structure
//!
//! - `service` - The `ResourceService<K>` trait
//! - `store_service` - `StoreResourceService<K>`, backed by jolt-store
//! - `ops/` - Individual operation implementations (create, update, delete, add, set, remove)
//! - `validation` - Shared attribute and relationship validation helpers
//! - `tracking` - Change detection for write results
//! - `resource` - Typed resources and drafts
//! - `error` - Error types for service failures

mod error;
mod ops;
mod resource;
mod service;
mod store_service;
mod tracking;
mod validation;

pub use error::{ServiceError, ServiceResult};
pub use jolt_store::{RelationshipValue, RowRef};
pub use resource::{RelationshipInput, Resource, ResourceDraft};
pub use service::ResourceService;
pub use store_service::StoreResourceService;
pub use tracking::ChangeTracking;
