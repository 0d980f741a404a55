//! The Registry - immutable resource metadata lookup.

use std::collections::HashMap;

use jolt_core::OperationKind;

use crate::{AttrDef, RelationshipDef, TypeDef};

/// The Registry provides runtime lookup of resource type definitions.
/// It is immutable after construction.
#[derive(Debug)]
pub struct Registry {
    /// Type definitions by public name.
    types: HashMap<String, TypeDef>,
    /// Ancestor chain per type, nearest first.
    ancestors: HashMap<String, Vec<String>>,
}

impl Registry {
    pub(crate) fn new(types: HashMap<String, TypeDef>, ancestors: HashMap<String, Vec<String>>) -> Self {
        Self { types, ancestors }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by public name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All type definitions, in no particular order.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ==================== Field Lookups ====================

    pub fn get_attr(&self, type_name: &str, attr_name: &str) -> Option<&AttrDef> {
        self.get_type(type_name)?.get_attr(attr_name)
    }

    pub fn get_relationship(&self, type_name: &str, rel_name: &str) -> Option<&RelationshipDef> {
        self.get_type(type_name)?.get_relationship(rel_name)
    }

    /// Whether `type_name` accepts operations of `kind`.
    pub fn allows(&self, type_name: &str, kind: OperationKind) -> bool {
        self.get_type(type_name).is_some_and(|t| t.allows(kind))
    }

    // ==================== Subtype Queries ====================

    /// Check if `sub` is `super_type` or one of its descendants.
    pub fn is_subtype(&self, sub: &str, super_type: &str) -> bool {
        sub == super_type
            || self
                .ancestors
                .get(sub)
                .is_some_and(|chain| chain.iter().any(|a| a == super_type))
    }
}
