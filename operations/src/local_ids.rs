//! Local id tracking for one batch.

use std::collections::HashMap;

use thiserror::Error;

/// Tracker failures, before they are tied to an operation member.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocalIdError {
    #[error("Local ID '{lid}' of type '{resource_type}' is declared more than once.")]
    Duplicate { lid: String, resource_type: String },

    #[error("Local ID '{lid}' of type '{resource_type}' is not declared by an earlier operation.")]
    Unknown { lid: String, resource_type: String },

    #[error("Local ID '{lid}' of type '{resource_type}' has no server ID yet.")]
    NotYetAssigned { lid: String, resource_type: String },
}

impl LocalIdError {
    fn duplicate(lid: &str, resource_type: &str) -> Self {
        Self::Duplicate {
            lid: lid.to_string(),
            resource_type: resource_type.to_string(),
        }
    }

    fn unknown(lid: &str, resource_type: &str) -> Self {
        Self::Unknown {
            lid: lid.to_string(),
            resource_type: resource_type.to_string(),
        }
    }

    fn not_yet_assigned(lid: &str, resource_type: &str) -> Self {
        Self::NotYetAssigned {
            lid: lid.to_string(),
            resource_type: resource_type.to_string(),
        }
    }
}

/// Maps client-chosen local ids to server-assigned ids within one batch.
///
/// Keys are (local id, resource type) pairs. A key is first reserved during
/// validation and later assigned once its create operation has run.
#[derive(Debug, Clone, Default)]
pub struct LocalIdTracker {
    /// `None` while reserved, the server id once assigned.
    entries: HashMap<(String, String), Option<String>>,
}

impl LocalIdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a local id. Each (lid, type) pair may be declared once.
    pub fn reserve(&mut self, lid: &str, resource_type: &str) -> Result<(), LocalIdError> {
        let key = (lid.to_string(), resource_type.to_string());
        if self.entries.contains_key(&key) {
            return Err(LocalIdError::duplicate(lid, resource_type));
        }
        self.entries.insert(key, None);
        Ok(())
    }

    /// Record the server id for a reserved local id.
    pub fn assign(
        &mut self,
        lid: &str,
        resource_type: &str,
        server_id: impl Into<String>,
    ) -> Result<(), LocalIdError> {
        let slot = self
            .entries
            .get_mut(&(lid.to_string(), resource_type.to_string()))
            .ok_or_else(|| LocalIdError::unknown(lid, resource_type))?;
        *slot = Some(server_id.into());
        Ok(())
    }

    /// The server id assigned to a local id.
    pub fn resolve(&self, lid: &str, resource_type: &str) -> Result<String, LocalIdError> {
        match self.entries.get(&(lid.to_string(), resource_type.to_string())) {
            None => Err(LocalIdError::unknown(lid, resource_type)),
            Some(None) => Err(LocalIdError::not_yet_assigned(lid, resource_type)),
            Some(Some(server_id)) => Ok(server_id.clone()),
        }
    }

    pub fn is_reserved(&self, lid: &str, resource_type: &str) -> bool {
        self.entries
            .contains_key(&(lid.to_string(), resource_type.to_string()))
    }

    pub fn is_assigned(&self, lid: &str, resource_type: &str) -> bool {
        matches!(
            self.entries.get(&(lid.to_string(), resource_type.to_string())),
            Some(Some(_))
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
