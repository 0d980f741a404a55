//! The six effective operation kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::OperationCode;

/// An operation's effective kind: its `op` code combined with whether it
/// targets a primary resource or one of its relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    CreateResource,
    UpdateResource,
    DeleteResource,
    AddToRelationship,
    SetRelationship,
    RemoveFromRelationship,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::CreateResource,
        OperationKind::UpdateResource,
        OperationKind::DeleteResource,
        OperationKind::AddToRelationship,
        OperationKind::SetRelationship,
        OperationKind::RemoveFromRelationship,
    ];

    /// Classify an `op` code by whether the operation names a relationship.
    pub fn from_code(code: OperationCode, targets_relationship: bool) -> Self {
        match (code, targets_relationship) {
            (OperationCode::Add, false) => OperationKind::CreateResource,
            (OperationCode::Add, true) => OperationKind::AddToRelationship,
            (OperationCode::Update, false) => OperationKind::UpdateResource,
            (OperationCode::Update, true) => OperationKind::SetRelationship,
            (OperationCode::Remove, false) => OperationKind::DeleteResource,
            (OperationCode::Remove, true) => OperationKind::RemoveFromRelationship,
        }
    }

    pub fn code(&self) -> OperationCode {
        match self {
            OperationKind::CreateResource | OperationKind::AddToRelationship => OperationCode::Add,
            OperationKind::UpdateResource | OperationKind::SetRelationship => OperationCode::Update,
            OperationKind::DeleteResource | OperationKind::RemoveFromRelationship => {
                OperationCode::Remove
            }
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(
            self,
            OperationKind::AddToRelationship
                | OperationKind::SetRelationship
                | OperationKind::RemoveFromRelationship
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::CreateResource => "create-resource",
            OperationKind::UpdateResource => "update-resource",
            OperationKind::DeleteResource => "delete-resource",
            OperationKind::AddToRelationship => "add-to-relationship",
            OperationKind::SetRelationship => "set-relationship",
            OperationKind::RemoveFromRelationship => "remove-from-relationship",
        };
        f.write_str(name)
    }
}
