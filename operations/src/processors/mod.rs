//! One processor per operation kind.
//!
//! Every processor is generic over the key type of the resource it serves
//! and delegates the actual write to a `ResourceService<K>`. The helpers in
//! this module turn classified wire data into typed service input, resolving
//! local ids through the batch's tracker on the way.

mod add_to_relationship;
mod create;
mod delete;
mod remove_from_relationship;
mod set_relationship;
mod update;

pub use add_to_relationship::{AddToRelationshipProcessor, DefaultAddToRelationshipProcessor};
pub use create::{CreateProcessor, DefaultCreateProcessor};
pub use delete::{DefaultDeleteProcessor, DeleteProcessor};
pub use remove_from_relationship::{DefaultRemoveFromRelationshipProcessor, RemoveFromRelationshipProcessor};
pub use set_relationship::{DefaultSetRelationshipProcessor, SetRelationshipProcessor};
pub use update::{DefaultUpdateProcessor, UpdateProcessor};

use jolt_core::ResourceKey;
use jolt_registry::{Registry, RelationshipDef};
use jolt_service::{RelationshipInput, ResourceDraft, RowRef};

use crate::classify::{ClassifiedOperation, IdRef, Identifier, RelationshipData, ResourceInput};
use crate::error::{OperationError, OperationResult};
use crate::processor::OperationContext;

/// Parse a wire id as `K`.
fn parse_key<K: ResourceKey>(resource_type: &str, raw: &str, member: &str) -> OperationResult<K> {
    K::parse_key(raw).ok_or_else(|| OperationError::invalid_id(resource_type, raw, member))
}

/// Turn an id slot into a wire id, resolving a local id through the tracker.
fn resolve_id_ref(
    ctx: &OperationContext<'_>,
    resource_type: &str,
    slot: &IdRef,
    member: &str,
) -> OperationResult<String> {
    match slot {
        IdRef::Id(id) => Ok(id.clone()),
        IdRef::Lid(lid) => ctx
            .local_ids
            .resolve(lid, resource_type)
            .map_err(|error| OperationError::local_id(error, member)),
    }
}

/// The typed id of the resource an operation targets.
fn resolve_target<K: ResourceKey>(
    operation: &ClassifiedOperation,
    ctx: &OperationContext<'_>,
) -> OperationResult<K> {
    let member = operation.target_id_member();
    let slot = operation.target.as_ref().ok_or_else(|| {
        OperationError::invalid_operation(operation.target_member, "The 'id' or 'lid' element is required.")
    })?;
    let id = resolve_id_ref(ctx, &operation.resource_type, slot, &member)?;
    parse_key(&operation.resource_type, &id, &member)
}

/// Look up a relationship of `resource_type`.
fn relationship_def<'r>(
    registry: &'r Registry,
    resource_type: &str,
    relationship: &str,
    member: &str,
) -> OperationResult<&'r RelationshipDef> {
    registry
        .get_relationship(resource_type, relationship)
        .ok_or_else(|| OperationError::relationship_not_found(resource_type, relationship, member))
}

/// The relationship named in `ref.relationship`.
fn target_relationship<'r>(
    operation: &ClassifiedOperation,
    registry: &'r Registry,
) -> OperationResult<&'r RelationshipDef> {
    let relationship = operation.relationship.as_deref().ok_or_else(|| {
        OperationError::invalid_operation("/ref", "The 'relationship' element is required.")
    })?;
    relationship_def(registry, &operation.resource_type, relationship, "/ref/relationship")
}

/// Check an identifier against the relationship it is used in and resolve
/// its id.
fn resolve_identifier(
    ctx: &OperationContext<'_>,
    rel_def: &RelationshipDef,
    identifier: &Identifier,
) -> OperationResult<RowRef> {
    let type_def = ctx.registry.get_type(&identifier.resource_type).ok_or_else(|| {
        OperationError::unknown_resource_type(&identifier.resource_type, identifier.type_member())
    })?;
    if !ctx.registry.is_subtype(&identifier.resource_type, &rel_def.target_type) {
        return Err(OperationError::relationship_type_mismatch(
            &rel_def.name,
            &rel_def.target_type,
            &identifier.resource_type,
            identifier.type_member(),
        ));
    }

    let member = identifier.id_member();
    let id = resolve_id_ref(ctx, &identifier.resource_type, &identifier.id, &member)?;
    let Some(canonical) = type_def.id_kind.canonicalize(&id) else {
        return Err(OperationError::invalid_id(&identifier.resource_type, id, member));
    };
    Ok(RowRef::new(&identifier.resource_type, canonical))
}

fn resolve_identifiers<'i>(
    ctx: &OperationContext<'_>,
    rel_def: &RelationshipDef,
    identifiers: impl IntoIterator<Item = &'i Identifier>,
) -> OperationResult<Vec<RowRef>> {
    identifiers
        .into_iter()
        .map(|identifier| resolve_identifier(ctx, rel_def, identifier))
        .collect()
}

/// Resolve relationship data whose shape must match the relationship.
fn resolve_relationship_data(
    ctx: &OperationContext<'_>,
    rel_def: &RelationshipDef,
    data: &RelationshipData,
    member: &str,
) -> OperationResult<RelationshipInput> {
    if data.is_to_many() != rel_def.is_to_many() {
        let expected = if rel_def.is_to_many() {
            "an array of resource identifiers"
        } else {
            "a single resource identifier or null"
        };
        return Err(OperationError::invalid_operation(
            member,
            format!("Expected {expected} for relationship '{}'.", rel_def.name),
        ));
    }
    match data {
        RelationshipData::ToOne(identifier) => identifier
            .as_ref()
            .map(|identifier| resolve_identifier(ctx, rel_def, identifier))
            .transpose()
            .map(RelationshipInput::ToOne),
        RelationshipData::ToMany(identifiers) => {
            resolve_identifiers(ctx, rel_def, identifiers).map(RelationshipInput::ToMany)
        }
    }
}

/// Convert the resource object of a create or update into a service draft.
/// The draft carries no id; creates set it themselves.
fn build_draft<K: ResourceKey>(
    ctx: &OperationContext<'_>,
    resource_type: &str,
    input: &ResourceInput,
) -> OperationResult<ResourceDraft<K>> {
    let mut draft = ResourceDraft::new(resource_type);
    draft.attributes = input.attributes.clone();
    for (name, data) in &input.relationships {
        let member = format!("/data/relationships/{name}");
        let rel_def = relationship_def(ctx.registry, resource_type, name, &member)?;
        let value = resolve_relationship_data(ctx, rel_def, data, &member)?;
        draft.relationships.insert(name.clone(), value);
    }
    Ok(draft)
}
