//! Classification of wire operations.
//!
//! `classify` turns one `AtomicOperationObject` into a `ClassifiedOperation`:
//! its effective kind, its target and its payload with every identifier in
//! a checked shape. Nothing here looks at the registry or the store.

use std::collections::BTreeMap;

use jolt_core::{
    AtomicOperationObject, AtomicReference, Data, OperationKind, ResourceIdentifier, ResourceObject,
};
use serde_json::Value;

use crate::error::{OperationError, OperationResult};

/// An id slot: a server id or a local id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdRef {
    Id(String),
    Lid(String),
}

impl IdRef {
    /// Read an `id`/`lid` pair where exactly one must be present.
    fn exactly_one(id: Option<&String>, lid: Option<&String>, member: &str) -> OperationResult<Self> {
        match (id, lid) {
            (Some(_), Some(_)) => Err(OperationError::invalid_operation(
                member,
                "The 'id' and 'lid' elements are mutually exclusive.",
            )),
            (Some(id), None) => Ok(IdRef::Id(id.clone())),
            (None, Some(lid)) => Ok(IdRef::Lid(lid.clone())),
            (None, None) => Err(OperationError::invalid_operation(
                member,
                "The 'id' or 'lid' element is required.",
            )),
        }
    }

    /// Name of the member holding this slot.
    pub fn member_name(&self) -> &'static str {
        match self {
            IdRef::Id(_) => "id",
            IdRef::Lid(_) => "lid",
        }
    }
}

/// A resource identifier inside relationship data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub resource_type: String,
    pub id: IdRef,
    /// Pointer to the identifier object, relative to the operation.
    pub member: String,
}

impl Identifier {
    fn from_wire(identifier: &ResourceIdentifier, member: String) -> OperationResult<Self> {
        let id = IdRef::exactly_one(identifier.id.as_ref(), identifier.lid.as_ref(), &member)?;
        Ok(Self {
            resource_type: identifier.resource_type.clone(),
            id,
            member,
        })
    }

    /// Pointer to the `id` or `lid` member of this identifier.
    pub fn id_member(&self) -> String {
        format!("{}/{}", self.member, self.id.member_name())
    }

    pub fn type_member(&self) -> String {
        format!("{}/type", self.member)
    }
}

/// Relationship data, shaped by what the request sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipData {
    ToOne(Option<Identifier>),
    ToMany(Vec<Identifier>),
}

impl RelationshipData {
    fn from_wire(data: &Data<ResourceIdentifier>, member: &str) -> OperationResult<Self> {
        match data {
            Data::Absent => Err(OperationError::invalid_operation(
                member,
                "The 'data' element is required.",
            )),
            Data::Null => Ok(RelationshipData::ToOne(None)),
            Data::One(identifier) => Identifier::from_wire(identifier, format!("{member}/data"))
                .map(|identifier| RelationshipData::ToOne(Some(identifier))),
            Data::Many(identifiers) => identifiers
                .iter()
                .enumerate()
                .map(|(i, identifier)| Identifier::from_wire(identifier, format!("{member}/data[{i}]")))
                .collect::<OperationResult<Vec<_>>>()
                .map(RelationshipData::ToMany),
        }
    }

    pub fn identifiers(&self) -> Vec<&Identifier> {
        match self {
            RelationshipData::ToOne(identifier) => identifier.iter().collect(),
            RelationshipData::ToMany(identifiers) => identifiers.iter().collect(),
        }
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self, RelationshipData::ToMany(_))
    }
}

/// The resource object of a create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInput {
    pub resource_type: String,
    pub id: Option<String>,
    pub lid: Option<String>,
    pub attributes: BTreeMap<String, Value>,
    pub relationships: BTreeMap<String, RelationshipData>,
}

impl ResourceInput {
    fn from_wire(resource: &ResourceObject) -> OperationResult<Self> {
        let mut relationships = BTreeMap::new();
        for (name, relationship) in resource.relationships.iter().flatten() {
            let member = format!("/data/relationships/{name}");
            relationships.insert(name.clone(), RelationshipData::from_wire(&relationship.data, &member)?);
        }
        Ok(Self {
            resource_type: resource.resource_type.clone(),
            id: resource.id.clone(),
            lid: resource.lid.clone(),
            attributes: resource.attributes.clone().unwrap_or_default(),
            relationships,
        })
    }
}

/// A use of a local id somewhere in an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LidUse<'a> {
    pub lid: &'a str,
    pub resource_type: &'a str,
    pub member: String,
}

/// An operation after its shape has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedOperation {
    pub index: usize,
    pub kind: OperationKind,
    /// The type the operation is dispatched on.
    pub resource_type: String,
    /// Pointer to the member `resource_type` came from.
    pub type_member: &'static str,
    /// The existing resource the operation targets. Absent for creates.
    pub target: Option<IdRef>,
    /// Pointer to the object holding `target`, `/ref` or `/data`.
    pub target_member: &'static str,
    pub relationship: Option<String>,
    /// Payload of create and update.
    pub resource: Option<ResourceInput>,
    /// Payload of relationship operations.
    pub relationship_data: Option<RelationshipData>,
}

impl ClassifiedOperation {
    /// Pointer to the `id`/`lid` member of the target.
    pub fn target_id_member(&self) -> String {
        match &self.target {
            Some(target) => format!("{}/{}", self.target_member, target.member_name()),
            None => self.target_member.to_string(),
        }
    }

    /// The local id this operation declares, if it is a create with a lid.
    pub fn lid_declaration(&self) -> Option<LidUse<'_>> {
        if self.kind != OperationKind::CreateResource {
            return None;
        }
        let resource = self.resource.as_ref()?;
        resource.lid.as_deref().map(|lid| LidUse {
            lid,
            resource_type: &resource.resource_type,
            member: "/data/lid".to_string(),
        })
    }

    /// Every local id this operation reads, in document order.
    pub fn lid_references(&self) -> Vec<LidUse<'_>> {
        let mut uses = Vec::new();
        if let Some(IdRef::Lid(lid)) = &self.target {
            uses.push(LidUse {
                lid,
                resource_type: &self.resource_type,
                member: self.target_id_member(),
            });
        }
        let relationship_data = self
            .resource
            .iter()
            .flat_map(|resource| resource.relationships.values())
            .chain(self.relationship_data.iter());
        for data in relationship_data {
            for identifier in data.identifiers() {
                if let IdRef::Lid(lid) = &identifier.id {
                    uses.push(LidUse {
                        lid,
                        resource_type: &identifier.resource_type,
                        member: identifier.id_member(),
                    });
                }
            }
        }
        uses
    }

    /// Every resource type this operation names, with its member.
    pub fn referenced_types(&self) -> Vec<(&str, String)> {
        let mut types = vec![(self.resource_type.as_str(), self.type_member.to_string())];
        let relationship_data = self
            .resource
            .iter()
            .flat_map(|resource| resource.relationships.values())
            .chain(self.relationship_data.iter());
        for data in relationship_data {
            for identifier in data.identifiers() {
                types.push((identifier.resource_type.as_str(), identifier.type_member()));
            }
        }
        types
    }
}

/// Check the shape of `operation` and classify it.
pub fn classify(operation: &AtomicOperationObject, index: usize) -> OperationResult<ClassifiedOperation> {
    let relationship = operation
        .target
        .as_ref()
        .and_then(|target| target.relationship.clone());
    let kind = OperationKind::from_code(operation.op, relationship.is_some());

    let classified = match kind {
        OperationKind::CreateResource => classify_create(operation, index)?,
        OperationKind::UpdateResource => classify_update(operation, index)?,
        OperationKind::DeleteResource => classify_delete(operation, index)?,
        OperationKind::AddToRelationship
        | OperationKind::SetRelationship
        | OperationKind::RemoveFromRelationship => {
            classify_relationship(operation, index, kind, relationship)?
        }
    };
    if classified.resource_type.is_empty() {
        return Err(OperationError::invalid_operation(
            classified.type_member,
            "The 'type' element cannot be empty.",
        ));
    }
    Ok(classified)
}

fn single_resource(operation: &AtomicOperationObject) -> OperationResult<&ResourceObject> {
    operation.data.as_one().ok_or_else(|| {
        OperationError::invalid_operation(
            "/data",
            format!(
                "Expected a single resource object in 'data' for '{}' operations.",
                operation.op
            ),
        )
    })
}

fn target_of(target: &AtomicReference) -> OperationResult<IdRef> {
    IdRef::exactly_one(target.id.as_ref(), target.lid.as_ref(), "/ref")
}

fn classify_create(operation: &AtomicOperationObject, index: usize) -> OperationResult<ClassifiedOperation> {
    if operation.target.is_some() {
        return Err(OperationError::invalid_operation(
            "/ref",
            "The 'ref' element is not supported when creating a resource.",
        ));
    }
    let resource = ResourceInput::from_wire(single_resource(operation)?)?;
    Ok(ClassifiedOperation {
        index,
        kind: OperationKind::CreateResource,
        resource_type: resource.resource_type.clone(),
        type_member: "/data/type",
        target: None,
        target_member: "/data",
        relationship: None,
        resource: Some(resource),
        relationship_data: None,
    })
}

fn classify_update(operation: &AtomicOperationObject, index: usize) -> OperationResult<ClassifiedOperation> {
    let resource = ResourceInput::from_wire(single_resource(operation)?)?;
    let from_data = || IdRef::exactly_one(resource.id.as_ref(), resource.lid.as_ref(), "/data");

    let (target, target_member, type_member) = match &operation.target {
        Some(reference) => {
            if reference.resource_type != resource.resource_type {
                return Err(OperationError::resource_type_mismatch(
                    &reference.resource_type,
                    &resource.resource_type,
                ));
            }
            let target = target_of(reference)?;
            if resource.id.is_some() || resource.lid.is_some() {
                let in_data = from_data()?;
                if in_data != target {
                    return Err(id_mismatch(&target, &in_data));
                }
            }
            (target, "/ref", "/ref/type")
        }
        None => (from_data()?, "/data", "/data/type"),
    };

    Ok(ClassifiedOperation {
        index,
        kind: OperationKind::UpdateResource,
        resource_type: resource.resource_type.clone(),
        type_member,
        target: Some(target),
        target_member,
        relationship: None,
        resource: Some(resource),
        relationship_data: None,
    })
}

fn id_mismatch(in_ref: &IdRef, in_data: &IdRef) -> OperationError {
    let render = |slot: &IdRef| match slot {
        IdRef::Id(id) => id.clone(),
        IdRef::Lid(lid) => format!("lid:{lid}"),
    };
    OperationError::resource_id_mismatch(
        render(in_ref),
        render(in_data),
        format!("/data/{}", in_data.member_name()),
    )
}

fn classify_delete(operation: &AtomicOperationObject, index: usize) -> OperationResult<ClassifiedOperation> {
    let reference = operation.target.as_ref().ok_or_else(|| {
        OperationError::invalid_operation("", "The 'ref' element is required for 'remove' operations.")
    })?;
    if !operation.data.is_absent() {
        return Err(OperationError::invalid_operation(
            "/data",
            "The 'data' element is not supported when removing a resource.",
        ));
    }
    Ok(ClassifiedOperation {
        index,
        kind: OperationKind::DeleteResource,
        resource_type: reference.resource_type.clone(),
        type_member: "/ref/type",
        target: Some(target_of(reference)?),
        target_member: "/ref",
        relationship: None,
        resource: None,
        relationship_data: None,
    })
}

fn classify_relationship(
    operation: &AtomicOperationObject,
    index: usize,
    kind: OperationKind,
    relationship: Option<String>,
) -> OperationResult<ClassifiedOperation> {
    // Relationship kinds are only produced from a ref with a relationship.
    let reference = operation.target.as_ref().ok_or_else(|| {
        OperationError::invalid_operation("", "The 'ref' element is required.")
    })?;
    let wire: Data<ResourceIdentifier> = match &operation.data {
        Data::Absent => Data::Absent,
        Data::Null => Data::Null,
        Data::One(resource) => Data::One(resource.identifier()),
        Data::Many(resources) => Data::Many(resources.iter().map(ResourceObject::identifier).collect()),
    };

    if kind != OperationKind::SetRelationship && !matches!(wire, Data::Many(_)) {
        return Err(OperationError::invalid_operation(
            "/data",
            format!(
                "Expected an array of resource identifiers in 'data' for '{}' operations on a relationship.",
                operation.op
            ),
        ));
    }

    // Identifier members are relative to the operation: `/data` or `/data[i]`.
    let data = RelationshipData::from_wire(&wire, "")?;
    Ok(ClassifiedOperation {
        index,
        kind,
        resource_type: reference.resource_type.clone(),
        type_member: "/ref/type",
        target: Some(target_of(reference)?),
        target_member: "/ref",
        relationship,
        resource: None,
        relationship_data: Some(data),
    })
}
