//! Jolt Core Types
//!
//! This crate provides the foundational types used throughout Jolt:
//! - Identity types (IdKind, ResourceKey)
//! - The atomic operations wire model (documents, resource objects, results)
//! - Operation kinds (the six effective add/update/remove variants)
//! - JSON:API error objects and the ToErrorObject conversion
//! - Cooperative cancellation
//! - Options (TOML + environment)

mod cancel;
mod document;
mod error;
mod id;
mod kind;
pub mod messages;
mod options;

pub use cancel::*;
pub use document::*;
pub use error::*;
pub use id::*;
pub use kind::*;
pub use options::*;
