//! REMOVE operation - removes members from a to-many relationship.

use jolt_core::ResourceKey;
use jolt_registry::{Registry, TypeDef};
use jolt_store::{RelationshipValue, RowRef};
use jolt_transaction::Transaction;
use tracing::debug;

use crate::error::ServiceResult;
use crate::ops::{load_row, to_many_def};
use crate::validation;

/// Execute a remove-from-relationship. The related resources must exist;
/// members that are not in the relationship are ignored.
pub fn execute_remove_from_relationship<K: ResourceKey>(
    registry: &Registry,
    type_def: &TypeDef,
    txn: &mut Transaction,
    id: &K,
    relationship: &str,
    related: Vec<RowRef>,
) -> ServiceResult<()> {
    let mut row = load_row(txn, type_def, &id.to_key_string())?;
    let rel_def = to_many_def(type_def, relationship)?;
    validation::validate_targets(registry, txn, rel_def, &related)?;

    let mut removed = 0;
    if let Some(RelationshipValue::Many(members)) = row.relationships.get_mut(relationship) {
        for target in &related {
            if members.remove(target) {
                removed += 1;
            }
        }
    }

    if removed > 0 {
        debug!(resource = %row.row_ref(), relationship, removed, "relationship members removed");
        txn.replace(row)?;
    }
    Ok(())
}
