//! CREATE operation - inserts a new resource.

use std::collections::BTreeMap;

use jolt_core::ResourceKey;
use jolt_registry::{Registry, TypeDef};
use jolt_store::Row;
use jolt_transaction::Transaction;
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::resource::{Resource, ResourceDraft};
use crate::tracking::{has_implicit_changes, ChangeTracking};
use crate::validation::{self, WriteMode};

/// Execute a create.
///
/// Returns the stored resource when the server assigned the id, when
/// defaults were applied, or when `tracking` asks for it unconditionally.
pub fn execute_create<K: ResourceKey>(
    registry: &Registry,
    type_def: &TypeDef,
    txn: &mut Transaction,
    draft: ResourceDraft<K>,
    tracking: ChangeTracking,
) -> ServiceResult<Option<Resource<K>>> {
    let ResourceDraft {
        id,
        attributes: requested,
        relationships,
        ..
    } = draft;

    for (name, value) in &requested {
        validation::validate_attribute(type_def, name, value, WriteMode::Create)?;
    }

    let mut attributes = requested.clone();
    validation::check_required_attributes(type_def, &attributes)?;
    validation::apply_defaults(type_def, &mut attributes);

    for (name, input) in &relationships {
        validation::validate_relationship_input(registry, txn, type_def, name, input)?;
    }

    let server_assigned = id.is_none();
    let id = match id {
        Some(id) => {
            let id = id.to_key_string();
            if txn.get(&type_def.name, &id).is_some() {
                return Err(ServiceError::conflict(&type_def.name, id));
            }
            id
        }
        None => txn.allocate_id(&type_def.name)?,
    };

    let mut row = Row::new(&type_def.name, id);
    row.attributes = attributes;
    row.relationships = relationships
        .into_iter()
        .map(|(name, input)| (name, input.into_value()))
        .collect();
    txn.insert(row.clone())?;
    debug!(resource_type = %row.resource_type, id = %row.id, "resource created");

    let report = match tracking {
        ChangeTracking::Always => true,
        ChangeTracking::Detect => {
            server_assigned || has_implicit_changes(&BTreeMap::new(), &requested, &row.attributes)
        }
    };
    if report {
        Resource::from_row(&row).map(Some)
    } else {
        Ok(None)
    }
}
