//! SET operation - replaces a relationship's value.

use jolt_core::ResourceKey;
use jolt_registry::{Registry, TypeDef};
use jolt_transaction::Transaction;
use tracing::debug;

use crate::error::ServiceResult;
use crate::ops::load_row;
use crate::resource::RelationshipInput;
use crate::validation;

/// Execute a set-relationship: null or one identifier for to-one
/// relationships, a (possibly empty) list for to-many relationships.
pub fn execute_set_relationship<K: ResourceKey>(
    registry: &Registry,
    type_def: &TypeDef,
    txn: &mut Transaction,
    id: &K,
    relationship: &str,
    input: RelationshipInput,
) -> ServiceResult<()> {
    let mut row = load_row(txn, type_def, &id.to_key_string())?;
    validation::validate_relationship_input(registry, txn, type_def, relationship, &input)?;

    let value = input.into_value();
    if row.relationships.get(relationship) != Some(&value) {
        row.relationships.insert(relationship.to_string(), value);
        debug!(resource = %row.row_ref(), relationship, "relationship replaced");
        txn.replace(row)?;
    }
    Ok(())
}
