//! RegistryBuilder for constructing an immutable Registry.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use jolt_core::{IdKind, OperationKind};
use thiserror::Error;

use crate::{AttrDef, Registry, RelationshipDef, TypeDef};

/// Errors that can occur during registry construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Unknown parent type: {0}")]
    UnknownParentType(String),

    #[error("Type {child} must use the id kind of its parent {parent}")]
    IdKindMismatch { child: String, parent: String },

    #[error("Field {field} is declared twice on type {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("Relationship {relationship} on type {type_name} targets unknown type {target}")]
    UnknownRelationshipTarget {
        type_name: String,
        relationship: String,
        target: String,
    },

    #[error("Invalid match pattern for attribute {attr}: {message}")]
    InvalidPattern { attr: String, message: String },
}

/// Builder for constructing an immutable Registry.
///
/// Parent types must be added before their children.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Types being built, by name.
    types: HashMap<String, TypeDef>,
    /// Declaration order, so inheritance resolves parents first.
    order: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource type definition.
    pub fn add_type(&mut self, name: impl Into<String>, id_kind: IdKind) -> TypeBuilder<'_> {
        TypeBuilder {
            builder: self,
            def: TypeDef::new(name, id_kind),
            fields: Vec::new(),
        }
    }

    /// Build the immutable Registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut resolved: HashMap<String, TypeDef> = HashMap::new();
        let mut ancestors: HashMap<String, Vec<String>> = HashMap::new();

        for name in &self.order {
            let Some(def) = self.types.get(name) else {
                continue;
            };
            let mut def = def.clone();
            let mut chain = Vec::new();

            if let Some(parent_name) = def.parent.clone() {
                // Parents precede children in `order`, so they are resolved.
                let parent = resolved
                    .get(&parent_name)
                    .ok_or_else(|| RegistryError::UnknownParentType(parent_name.clone()))?;
                inherit_fields(&mut def, parent)?;
                chain.extend(ancestors.get(&parent_name).cloned().unwrap_or_default());
                chain.insert(0, parent_name);
            }

            ancestors.insert(name.clone(), chain);
            resolved.insert(name.clone(), def);
        }

        for def in resolved.values() {
            for rel in def.relationships.values() {
                if !resolved.contains_key(&rel.target_type) {
                    return Err(RegistryError::UnknownRelationshipTarget {
                        type_name: def.name.clone(),
                        relationship: rel.name.clone(),
                        target: rel.target_type.clone(),
                    });
                }
            }
            for attr in def.attributes.values() {
                if let Some(pattern) = &attr.match_pattern {
                    regex_lite::Regex::new(pattern).map_err(|e| RegistryError::InvalidPattern {
                        attr: attr.name.clone(),
                        message: e.to_string(),
                    })?;
                }
            }
        }

        Ok(Registry::new(resolved, ancestors))
    }
}

/// Copy inherited attributes and relationships into `def`; own fields win
/// only if they do not collide.
fn inherit_fields(def: &mut TypeDef, parent: &TypeDef) -> Result<(), RegistryError> {
    if def.id_kind != parent.id_kind {
        return Err(RegistryError::IdKindMismatch {
            child: def.name.clone(),
            parent: parent.name.clone(),
        });
    }
    for (name, attr) in &parent.attributes {
        if def.attributes.contains_key(name) || def.relationships.contains_key(name) {
            return Err(duplicate_field(&def.name, name));
        }
        def.attributes.insert(name.clone(), attr.clone());
    }
    for (name, rel) in &parent.relationships {
        if def.attributes.contains_key(name) || def.relationships.contains_key(name) {
            return Err(duplicate_field(&def.name, name));
        }
        def.relationships.insert(name.clone(), rel.clone());
    }
    Ok(())
}

fn duplicate_field(type_name: &str, field: &str) -> RegistryError {
    RegistryError::DuplicateField {
        type_name: type_name.to_string(),
        field: field.to_string(),
    }
}

/// Builder for a resource type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    def: TypeDef,
    /// Every declared field name, to catch duplicates in `done`.
    fields: Vec<String>,
}

impl<'a> TypeBuilder<'a> {
    /// Set the base type by name.
    pub fn extends(mut self, parent_name: impl Into<String>) -> Self {
        self.def.parent = Some(parent_name.into());
        self
    }

    /// Add an attribute.
    pub fn attr(mut self, attr: AttrDef) -> Self {
        self.fields.push(attr.name.clone());
        self.def.attributes.insert(attr.name.clone(), attr);
        self
    }

    /// Add a relationship.
    pub fn relationship(mut self, rel: RelationshipDef) -> Self {
        self.fields.push(rel.name.clone());
        self.def.relationships.insert(rel.name.clone(), rel);
        self
    }

    pub fn to_one(self, name: impl Into<String>, target_type: impl Into<String>) -> Self {
        self.relationship(RelationshipDef::to_one(name, target_type))
    }

    pub fn to_many(self, name: impl Into<String>, target_type: impl Into<String>) -> Self {
        self.relationship(RelationshipDef::to_many(name, target_type))
    }

    /// Refuse operations of `kind` on this type.
    pub fn forbid(mut self, kind: OperationKind) -> Self {
        self.def.operations.remove(&kind);
        self
    }

    /// Accept only the listed operation kinds.
    pub fn only(mut self, kinds: impl IntoIterator<Item = OperationKind>) -> Self {
        self.def.operations = kinds.into_iter().collect::<BTreeSet<_>>();
        self
    }

    /// Mark as abstract: it can be referenced, but not created.
    pub fn abstract_type(mut self) -> Self {
        self.def.is_abstract = true;
        self.def.operations.remove(&OperationKind::CreateResource);
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<(), RegistryError> {
        let name = self.def.name.clone();
        if self.builder.types.contains_key(&name) {
            return Err(RegistryError::DuplicateTypeName(name));
        }

        let mut seen = BTreeMap::new();
        for field in &self.fields {
            if seen.insert(field.as_str(), ()).is_some() {
                return Err(duplicate_field(&name, field));
            }
        }

        if let Some(parent) = &self.def.parent {
            if !self.builder.types.contains_key(parent) {
                return Err(RegistryError::UnknownParentType(parent.clone()));
            }
        }

        self.builder.order.push(name.clone());
        self.builder.types.insert(name, self.def);
        Ok(())
    }
}
