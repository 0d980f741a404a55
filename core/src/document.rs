//! Wire model for the atomic operations extension.
//!
//! These types map one-to-one onto the JSON members of a request or response
//! document. They carry no behavior beyond (de)serialization and a few
//! accessors; interpretation happens in the operations crate.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Member holding the request's ordered operations.
pub const OPERATIONS_MEMBER: &str = "atomic:operations";

/// Member holding the response's ordered results.
pub const RESULTS_MEMBER: &str = "atomic:results";

/// Top-level document of an atomic operations request or response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomicOperationsDocument {
    #[serde(
        rename = "atomic:operations",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub operations: Option<Vec<AtomicOperationObject>>,

    #[serde(
        rename = "atomic:results",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub results: Option<Vec<AtomicResultObject>>,
}

impl AtomicOperationsDocument {
    /// Build a request document.
    pub fn with_operations(operations: Vec<AtomicOperationObject>) -> Self {
        Self {
            operations: Some(operations),
            results: None,
        }
    }

    /// Build a response document.
    pub fn with_results(results: Vec<AtomicResultObject>) -> Self {
        Self {
            operations: None,
            results: Some(results),
        }
    }
}

/// The `op` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationCode {
    Add,
    Update,
    Remove,
}

impl std::fmt::Display for OperationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationCode::Add => "add",
            OperationCode::Update => "update",
            OperationCode::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// One entry of `atomic:operations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicOperationObject {
    pub op: OperationCode,

    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<AtomicReference>,

    #[serde(default, skip_serializing_if = "Data::is_absent")]
    pub data: Data<ResourceObject>,
}

/// The `ref` member: an existing resource, optionally narrowed to one of its
/// relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicReference {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// A resource object, as found in `data` of an add or update operation and
/// in results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, RelationshipObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ResourceLinks>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Default::default()
        }
    }

    /// The identifier part of this object.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            resource_type: self.resource_type.clone(),
            id: self.id.clone(),
            lid: self.lid.clone(),
        }
    }
}

/// A resource identifier object (`type` plus `id` or `lid`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lid: Option<String>,
}

impl ResourceIdentifier {
    pub fn with_id(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: Some(id.into()),
            lid: None,
        }
    }

    pub fn with_lid(resource_type: impl Into<String>, lid: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            lid: Some(lid.into()),
        }
    }
}

/// A relationship member of a resource object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
    #[serde(default, skip_serializing_if = "Data::is_absent")]
    pub data: Data<ResourceIdentifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// One entry of `atomic:results`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomicResultObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResourceObject>,
}

impl AtomicResultObject {
    /// A result without representable data.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_data(data: ResourceObject) -> Self {
        Self { data: Some(data) }
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

/// A `data` member, distinguishing an absent member from an explicit `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Data<T> {
    Absent,
    Null,
    One(T),
    Many(Vec<T>),
}

impl<T> Default for Data<T> {
    fn default() -> Self {
        Data::Absent
    }
}

impl<T> Data<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Data::Absent)
    }

    pub fn as_one(&self) -> Option<&T> {
        match self {
            Data::One(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[T]> {
        match self {
            Data::Many(items) => Some(items),
            _ => None,
        }
    }

    /// Iterate over every contained item regardless of shape.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Data::One(item) => std::slice::from_ref(item).iter(),
            Data::Many(items) => items.iter(),
            Data::Absent | Data::Null => [].iter(),
        }
    }
}

impl<T: Serialize> Serialize for Data<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Data::Absent | Data::Null => serializer.serialize_none(),
            Data::One(item) => item.serialize(serializer),
            Data::Many(items) => items.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Data<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Data::Null),
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<T>, _>>()
                .map(Data::Many)
                .map_err(D::Error::custom),
            other => serde_json::from_value(other)
                .map(Data::One)
                .map_err(D::Error::custom),
        }
    }
}
