//! Resource type definitions.

use std::collections::{BTreeMap, BTreeSet};

use jolt_core::{IdKind, OperationKind};
use serde_json::Value;

/// The JSON shape an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    String,
    Int,
    Float,
    Bool,
    /// Any JSON value, including objects and arrays.
    Any,
}

impl AttrKind {
    /// Check whether a non-null value has this shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            AttrKind::String => value.is_string(),
            AttrKind::Int => value.is_i64() || value.is_u64(),
            AttrKind::Float => value.is_number(),
            AttrKind::Bool => value.is_boolean(),
            AttrKind::Any => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttrKind::String => "String",
            AttrKind::Int => "Int",
            AttrKind::Float => "Float",
            AttrKind::Bool => "Bool",
            AttrKind::Any => "Any",
        }
    }
}

/// Name of the JSON shape of `value`, for error messages.
pub fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Bool",
        Value::Number(n) if n.is_f64() => "Float",
        Value::Number(_) => "Int",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

/// Attribute definition within a type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDef {
    /// Public attribute name.
    pub name: String,
    pub kind: AttrKind,
    /// Must be present on create (unless a default exists).
    pub required: bool,
    pub nullable: bool,
    pub default: Option<Value>,
    /// Included in built representations.
    pub viewable: bool,
    /// Accepted in create requests.
    pub creatable: bool,
    /// Accepted in update requests.
    pub changeable: bool,
    /// Regex a string value must match.
    pub match_pattern: Option<String>,
    pub length_min: Option<usize>,
    pub length_max: Option<usize>,
}

impl AttrDef {
    pub fn new(name: impl Into<String>, kind: AttrKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            nullable: true,
            default: None,
            viewable: true,
            creatable: true,
            changeable: true,
            match_pattern: None,
            length_min: None,
            length_max: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Hide the attribute from responses.
    pub fn hidden(mut self) -> Self {
        self.viewable = false;
        self
    }

    /// Accept the attribute on create only.
    pub fn immutable(mut self) -> Self {
        self.changeable = false;
        self
    }

    /// Never accept the attribute from clients.
    pub fn readonly(mut self) -> Self {
        self.creatable = false;
        self.changeable = false;
        self
    }

    pub fn with_match_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.match_pattern = Some(pattern.into());
        self
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.length_min = Some(min);
        self.length_max = Some(max);
        self
    }
}

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// Relationship definition within a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDef {
    /// Public relationship name.
    pub name: String,
    /// Public name of the related type. Subtypes are accepted as well.
    pub target_type: String,
    pub cardinality: Cardinality,
}

impl RelationshipDef {
    pub fn to_one(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            cardinality: Cardinality::ToOne,
        }
    }

    pub fn to_many(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            cardinality: Cardinality::ToMany,
        }
    }

    pub fn is_to_many(&self) -> bool {
        self.cardinality == Cardinality::ToMany
    }
}

/// Resource type definition.
///
/// Attributes and relationships include those inherited from ancestors once
/// the registry is built.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Public type name, as used in `type` members and links.
    pub name: String,
    pub id_kind: IdKind,
    /// Direct base type, if any.
    pub parent: Option<String>,
    pub attributes: BTreeMap<String, AttrDef>,
    pub relationships: BTreeMap<String, RelationshipDef>,
    /// Operation kinds this type accepts.
    pub operations: BTreeSet<OperationKind>,
    /// Whether this type is abstract (cannot be created directly).
    pub is_abstract: bool,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, id_kind: IdKind) -> Self {
        Self {
            name: name.into(),
            id_kind,
            parent: None,
            attributes: BTreeMap::new(),
            relationships: BTreeMap::new(),
            operations: OperationKind::ALL.into_iter().collect(),
            is_abstract: false,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&AttrDef> {
        self.attributes.get(name)
    }

    pub fn get_relationship(&self, name: &str) -> Option<&RelationshipDef> {
        self.relationships.get(name)
    }

    pub fn allows(&self, kind: OperationKind) -> bool {
        self.operations.contains(&kind)
    }

    /// Attributes included in responses, in name order.
    pub fn viewable_attrs(&self) -> impl Iterator<Item = &AttrDef> {
        self.attributes.values().filter(|a| a.viewable)
    }
}
