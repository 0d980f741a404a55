//! Attribute and relationship validation helpers for service operations.

use std::collections::BTreeMap;

use jolt_registry::{value_kind_name, Registry, RelationshipDef, TypeDef};
use jolt_store::RowRef;
use jolt_transaction::Transaction;
use regex_lite::Regex;
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::resource::RelationshipInput;

/// Whether an attribute is being written by a create or an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Validate an attribute assignment against the type definition.
pub fn validate_attribute(
    type_def: &TypeDef,
    attr_name: &str,
    value: &Value,
    mode: WriteMode,
) -> ServiceResult<()> {
    let attr_def = type_def
        .get_attr(attr_name)
        .ok_or_else(|| ServiceError::unknown_attribute(&type_def.name, attr_name))?;

    let writable = match mode {
        WriteMode::Create => attr_def.creatable,
        WriteMode::Update => attr_def.changeable,
    };
    if !writable {
        return Err(ServiceError::readonly_attribute(&type_def.name, attr_name));
    }

    if value.is_null() {
        if attr_def.nullable {
            return Ok(());
        }
        return Err(ServiceError::required_null_violation(&type_def.name, attr_name));
    }

    if !attr_def.kind.accepts(value) {
        return Err(ServiceError::invalid_attr_type(
            attr_name,
            attr_def.kind.name(),
            value_kind_name(value),
        ));
    }

    if let Value::String(text) = value {
        if let Some(pattern) = &attr_def.match_pattern {
            let matches = Regex::new(pattern).is_ok_and(|re| re.is_match(text));
            if !matches {
                return Err(ServiceError::pattern_mismatch(attr_name, pattern));
            }
        }
        validate_length(attr_name, text, attr_def.length_min, attr_def.length_max)?;
    }

    Ok(())
}

/// Validate a string length against optional bounds.
pub fn validate_length(
    attr_name: &str,
    text: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> ServiceResult<()> {
    if min.is_none() && max.is_none() {
        return Ok(());
    }
    let actual = text.chars().count();
    let min = min.unwrap_or(0);
    let max = max.unwrap_or(usize::MAX);
    if actual < min || actual > max {
        return Err(ServiceError::length_violation(attr_name, min, max, actual));
    }
    Ok(())
}

/// Check that all required attributes are present.
pub fn check_required_attributes(
    type_def: &TypeDef,
    attrs: &BTreeMap<String, Value>,
) -> ServiceResult<()> {
    for attr_def in type_def.attributes.values() {
        if attr_def.required && !attrs.contains_key(&attr_def.name) && attr_def.default.is_none() {
            return Err(ServiceError::missing_required(&type_def.name, &attr_def.name));
        }
    }
    Ok(())
}

/// Apply default values to missing attributes.
pub fn apply_defaults(type_def: &TypeDef, attrs: &mut BTreeMap<String, Value>) {
    for attr_def in type_def.attributes.values() {
        if let Some(default_value) = &attr_def.default {
            attrs
                .entry(attr_def.name.clone())
                .or_insert_with(|| default_value.clone());
        }
    }
}

/// Look up a relationship definition on a type.
pub fn relationship_def<'a>(
    type_def: &'a TypeDef,
    relationship: &str,
) -> ServiceResult<&'a RelationshipDef> {
    type_def
        .get_relationship(relationship)
        .ok_or_else(|| ServiceError::unknown_relationship(&type_def.name, relationship))
}

/// Validate a new relationship value: shape, target types and existence.
pub fn validate_relationship_input(
    registry: &Registry,
    txn: &Transaction,
    type_def: &TypeDef,
    relationship: &str,
    input: &RelationshipInput,
) -> ServiceResult<()> {
    let rel_def = relationship_def(type_def, relationship)?;
    if rel_def.is_to_many() != input.is_to_many() {
        return Err(ServiceError::cardinality_mismatch(relationship, rel_def.is_to_many()));
    }
    validate_targets(registry, txn, rel_def, input.targets())
}

/// Check that every target is of an acceptable type and exists.
pub fn validate_targets<'t>(
    registry: &Registry,
    txn: &Transaction,
    rel_def: &RelationshipDef,
    targets: impl IntoIterator<Item = &'t RowRef>,
) -> ServiceResult<()> {
    for target in targets {
        if !registry.is_subtype(&target.resource_type, &rel_def.target_type) {
            return Err(ServiceError::relationship_type_mismatch(
                &rel_def.name,
                &rel_def.target_type,
                &target.resource_type,
            ));
        }
        if !txn.contains(target) {
            return Err(ServiceError::related_not_found(
                &rel_def.name,
                &target.resource_type,
                &target.id,
            ));
        }
    }
    Ok(())
}
