//! Rows and the relationship values they hold.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::Value;

/// Address of a row: its concrete resource type plus id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowRef {
    pub resource_type: String,
    pub id: String,
}

impl RowRef {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

/// The stored value of one relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipValue {
    One(Option<RowRef>),
    Many(BTreeSet<RowRef>),
}

impl RelationshipValue {
    /// Every row this value points at.
    pub fn targets(&self) -> Vec<&RowRef> {
        match self {
            RelationshipValue::One(target) => target.iter().collect(),
            RelationshipValue::Many(targets) => targets.iter().collect(),
        }
    }

    pub fn contains(&self, target: &RowRef) -> bool {
        match self {
            RelationshipValue::One(current) => current.as_ref() == Some(target),
            RelationshipValue::Many(targets) => targets.contains(target),
        }
    }

    /// Drop `target` from this value. Returns true if anything changed.
    pub fn forget(&mut self, target: &RowRef) -> bool {
        match self {
            RelationshipValue::One(current) if current.as_ref() == Some(target) => {
                *current = None;
                true
            }
            RelationshipValue::One(_) => false,
            RelationshipValue::Many(targets) => targets.remove(target),
        }
    }
}

/// A stored resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub resource_type: String,
    pub id: String,
    pub attributes: BTreeMap<String, Value>,
    pub relationships: BTreeMap<String, RelationshipValue>,
}

impl Row {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes: BTreeMap::new(),
            relationships: BTreeMap::new(),
        }
    }

    pub fn row_ref(&self) -> RowRef {
        RowRef::new(self.resource_type.clone(), self.id.clone())
    }

    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn get_relationship(&self, name: &str) -> Option<&RelationshipValue> {
        self.relationships.get(name)
    }

    /// Every (relationship name, target) pair of this row.
    pub fn references(&self) -> impl Iterator<Item = (&str, &RowRef)> + '_ {
        self.relationships
            .iter()
            .flat_map(|(name, value)| value.targets().into_iter().map(move |t| (name.as_str(), t)))
    }

    /// Remove every reference to `target`. Returns true if anything changed.
    pub fn forget(&mut self, target: &RowRef) -> bool {
        let mut changed = false;
        for value in self.relationships.values_mut() {
            changed |= value.forget(target);
        }
        changed
    }
}
