//! Typed resources and write drafts.

use std::collections::BTreeMap;

use jolt_core::ResourceKey;
use jolt_store::{RelationshipValue, Row, RowRef};
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};

/// A stored resource with a strongly-typed id.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<K: ResourceKey> {
    pub resource_type: String,
    pub id: K,
    pub attributes: BTreeMap<String, Value>,
    pub relationships: BTreeMap<String, RelationshipValue>,
}

impl<K: ResourceKey> Resource<K> {
    /// Read a row, parsing its id as `K`.
    pub fn from_row(row: &Row) -> ServiceResult<Self> {
        let id = K::parse_key(&row.id)
            .ok_or_else(|| ServiceError::invalid_id(&row.resource_type, &row.id))?;
        Ok(Self {
            resource_type: row.resource_type.clone(),
            id,
            attributes: row.attributes.clone(),
            relationships: row.relationships.clone(),
        })
    }

    /// The id in wire form.
    pub fn string_id(&self) -> String {
        self.id.to_key_string()
    }

    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn get_relationship(&self, name: &str) -> Option<&RelationshipValue> {
        self.relationships.get(name)
    }
}

/// New value for one relationship, with every id already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipInput {
    ToOne(Option<RowRef>),
    ToMany(Vec<RowRef>),
}

impl RelationshipInput {
    pub fn targets(&self) -> Vec<&RowRef> {
        match self {
            RelationshipInput::ToOne(target) => target.iter().collect(),
            RelationshipInput::ToMany(targets) => targets.iter().collect(),
        }
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self, RelationshipInput::ToMany(_))
    }

    pub(crate) fn into_value(self) -> RelationshipValue {
        match self {
            RelationshipInput::ToOne(target) => RelationshipValue::One(target),
            RelationshipInput::ToMany(targets) => RelationshipValue::Many(targets.into_iter().collect()),
        }
    }
}

/// The client-supplied part of a create or update.
///
/// Only the members present in the request are set; anything absent keeps
/// its stored (or default) value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDraft<K: ResourceKey> {
    pub resource_type: String,
    /// Client-supplied id, for creates that allow one.
    pub id: Option<K>,
    pub attributes: BTreeMap<String, Value>,
    pub relationships: BTreeMap<String, RelationshipInput>,
}

impl<K: ResourceKey> ResourceDraft<K> {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            attributes: BTreeMap::new(),
            relationships: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: K) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, input: RelationshipInput) -> Self {
        self.relationships.insert(name.into(), input);
        self
    }
}
