//! UPDATE operation - applies a partial change to an existing resource.

use jolt_core::ResourceKey;
use jolt_registry::{Registry, TypeDef};
use jolt_transaction::Transaction;
use tracing::debug;

use crate::error::ServiceResult;
use crate::ops::load_row;
use crate::resource::{Resource, ResourceDraft};
use crate::tracking::{has_implicit_changes, ChangeTracking};
use crate::validation::{self, WriteMode};

/// Execute an update. Members absent from the draft keep their value.
pub fn execute_update<K: ResourceKey>(
    registry: &Registry,
    type_def: &TypeDef,
    txn: &mut Transaction,
    id: &K,
    draft: ResourceDraft<K>,
    tracking: ChangeTracking,
) -> ServiceResult<Option<Resource<K>>> {
    let existing = load_row(txn, type_def, &id.to_key_string())?;

    for (name, value) in &draft.attributes {
        validation::validate_attribute(type_def, name, value, WriteMode::Update)?;
    }
    for (name, input) in &draft.relationships {
        validation::validate_relationship_input(registry, txn, type_def, name, input)?;
    }

    let mut row = existing.clone();
    row.attributes
        .extend(draft.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    for (name, input) in draft.relationships {
        row.relationships.insert(name, input.into_value());
    }

    if row != existing {
        txn.replace(row.clone())?;
        debug!(resource_type = %row.resource_type, id = %row.id, "resource updated");
    }

    let report = match tracking {
        ChangeTracking::Always => true,
        ChangeTracking::Detect => {
            has_implicit_changes(&existing.attributes, &draft.attributes, &row.attributes)
        }
    };
    if report {
        Resource::from_row(&row).map(Some)
    } else {
        Ok(None)
    }
}
