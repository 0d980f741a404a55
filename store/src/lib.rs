//! Jolt Store
//!
//! In-memory relational storage for resources:
//! - One table per resource type, keyed by the wire form of the id
//! - Id allocation per table, sequential or random depending on the id kind
//! - Reference index: find rows whose relationships point at a row
//! - A shared `Database` handle that transactions lock exclusively

mod database;
mod error;
mod index;
mod row;
mod tables;

pub use database::Database;
pub use error::{StoreError, StoreResult};
pub use index::ReferenceIndex;
pub use row::{RelationshipValue, Row, RowRef};
pub use tables::{Table, Tables};
