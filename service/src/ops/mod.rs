//! Service operation implementations.
//!
//! Each write (create, update, delete and the three relationship changes)
//! lives in its own module. Operations are synchronous: they run against
//! the tables held by the caller's transaction.

mod add;
mod create;
mod delete;
mod remove;
mod set;
mod update;

pub use add::execute_add_to_relationship;
pub use create::execute_create;
pub use delete::execute_delete;
pub use remove::execute_remove_from_relationship;
pub use set::execute_set_relationship;
pub use update::execute_update;

use jolt_registry::{RelationshipDef, TypeDef};
use jolt_store::Row;
use jolt_transaction::Transaction;

use crate::error::{ServiceError, ServiceResult};
use crate::validation;

/// Load a copy of the row that a write targets.
fn load_row(txn: &Transaction, type_def: &TypeDef, id: &str) -> ServiceResult<Row> {
    txn.get(&type_def.name, id)
        .cloned()
        .ok_or_else(|| ServiceError::not_found(&type_def.name, id))
}

/// Look up a relationship that must be to-many.
fn to_many_def<'a>(type_def: &'a TypeDef, relationship: &str) -> ServiceResult<&'a RelationshipDef> {
    let rel_def = validation::relationship_def(type_def, relationship)?;
    if !rel_def.is_to_many() {
        return Err(ServiceError::cardinality_mismatch(relationship, true));
    }
    Ok(rel_def)
}
