//! Jolt Registry
//!
//! Immutable metadata about resource types: attributes, relationships,
//! id kinds, accepted operations and inheritance.

mod builder;
mod registry;
mod types;

pub use builder::{RegistryBuilder, RegistryError, TypeBuilder};
pub use registry::Registry;
pub use types::*;
