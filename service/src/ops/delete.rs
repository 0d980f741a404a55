//! DELETE operation - removes a resource and every reference to it.

use jolt_core::ResourceKey;
use jolt_registry::TypeDef;
use jolt_transaction::Transaction;
use tracing::debug;

use crate::error::ServiceResult;
use crate::ops::load_row;

/// Execute a delete. Relationships pointing at the deleted resource are
/// cleared: to-one values become null, to-many values lose the entry.
pub fn execute_delete<K: ResourceKey>(
    type_def: &TypeDef,
    txn: &mut Transaction,
    id: &K,
) -> ServiceResult<()> {
    let row = load_row(txn, type_def, &id.to_key_string())?;
    let target = row.row_ref();

    let mut cleared = 0;
    for source in txn.referencing(&target) {
        if source == target {
            continue;
        }
        let Some(mut referencing) = txn.get(&source.resource_type, &source.id).cloned() else {
            continue;
        };
        if referencing.forget(&target) {
            txn.replace(referencing)?;
            cleared += 1;
        }
    }

    txn.remove(&row.resource_type, &row.id)?;
    debug!(resource = %target, cleared, "resource deleted");
    Ok(())
}
