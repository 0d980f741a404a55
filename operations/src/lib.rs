//! Jolt Operations
//!
//! The atomic operations pipeline: an ordered batch of add, update and
//! remove operations applied as one all-or-nothing unit.
//!
//! Responsibilities:
//! - Classify wire operations into the six effective kinds
//! - Track local ids and resolve them to server-assigned ids
//! - Resolve a processor per (resource type, operation kind)
//! - Run the batch inside one transaction, rolling back on the first failure
//! - Build resource representations and map outcomes to responses
//!
//! # Module Structure
//!
//! - `atomic` - `AtomicOperationsProcessor`, the transactional batch loop
//! - `classify` - Shape checks and classification of wire operations
//! - `controller` - Request/response boundary (status codes, documents)
//! - `local_ids` - `LocalIdTracker`
//! - `processor` - The `OperationProcessor` trait and its context
//! - `processors/` - One processor per operation kind
//! - `registry` - `ProcessorRegistry`, keyed by type and kind
//! - `representation` - `ResourceObjectBuilder`
//! - `error` - Error types for operation and batch failures

mod atomic;
mod classify;
mod controller;
mod error;
mod local_ids;
mod processor;
pub mod processors;
mod registry;
mod representation;

pub use atomic::AtomicOperationsProcessor;
pub use classify::{classify, ClassifiedOperation, IdRef, Identifier, LidUse, RelationshipData, ResourceInput};
pub use controller::{AtomicOperationsController, Response};
pub use error::{BatchError, BatchResult, OperationError, OperationResult};
pub use local_ids::{LocalIdError, LocalIdTracker};
pub use processor::{OperationContext, OperationProcessor};
pub use registry::{ProcessorRegistry, ProcessorRegistryBuilder, ProcessorRegistryError};
pub use representation::ResourceObjectBuilder;
