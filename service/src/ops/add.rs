//! ADD operation - adds members to a to-many relationship.

use std::collections::BTreeSet;

use jolt_core::ResourceKey;
use jolt_registry::{Registry, TypeDef};
use jolt_store::{RelationshipValue, RowRef};
use jolt_transaction::Transaction;
use tracing::debug;

use crate::error::ServiceResult;
use crate::ops::{load_row, to_many_def};
use crate::validation;

/// Execute an add-to-relationship. Members already present are kept once.
pub fn execute_add_to_relationship<K: ResourceKey>(
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

    let value = row
        .relationships
        .entry(relationship.to_string())
        .or_insert_with(|| RelationshipValue::Many(BTreeSet::new()));
    let mut added = 0;
    if let RelationshipValue::Many(members) = value {
        for target in related {
            if members.insert(target) {
                added += 1;
            }
        }
    }

    if added > 0 {
        debug!(resource = %row.row_ref(), relationship, added, "relationship members added");
        txn.replace(row)?;
    }
    Ok(())
}
