//! Store-backed resource service.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use jolt_core::{CancellationToken, ResourceKey};
use jolt_registry::{Registry, TypeDef};
use jolt_store::RowRef;
use jolt_transaction::Transaction;

use crate::error::{ServiceError, ServiceResult};
use crate::ops;
use crate::resource::{RelationshipInput, Resource, ResourceDraft};
use crate::service::ResourceService;
use crate::tracking::ChangeTracking;

/// [`ResourceService`] over the tables of a jolt-store database.
///
/// One instance serves one resource type; the registry supplies its
/// attributes and relationships.
pub struct StoreResourceService<K: ResourceKey> {
    registry: Arc<Registry>,
    resource_type: String,
    tracking: ChangeTracking,
    _key: PhantomData<fn() -> K>,
}

impl<K: ResourceKey> StoreResourceService<K> {
    pub fn new(registry: Arc<Registry>, resource_type: impl Into<String>) -> Self {
        Self {
            registry,
            resource_type: resource_type.into(),
            tracking: ChangeTracking::default(),
            _key: PhantomData,
        }
    }

    pub fn with_change_tracking(mut self, tracking: ChangeTracking) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn change_tracking(&self) -> ChangeTracking {
        self.tracking
    }

    fn type_def(&self) -> ServiceResult<&TypeDef> {
        // Registration checks the type exists, so a miss means the row
        // cannot exist either.
        self.registry
            .get_type(&self.resource_type)
            .ok_or_else(|| ServiceError::not_found(&self.resource_type, ""))
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> ServiceResult<()> {
    if cancel.is_cancelled() {
        Err(ServiceError::Cancelled)
    } else {
        Ok(())
    }
}

#[async_trait]
impl<K: ResourceKey> ResourceService<K> for StoreResourceService<K> {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    async fn get(
        &self,
        txn: &mut Transaction,
        id: &K,
        cancel: &CancellationToken,
    ) -> ServiceResult<Resource<K>> {
        ensure_not_cancelled(cancel)?;
        let id = id.to_key_string();
        let row = txn
            .get(&self.resource_type, &id)
            .ok_or_else(|| ServiceError::not_found(&self.resource_type, &id))?;
        Resource::from_row(row)
    }

    async fn create(
        &self,
        txn: &mut Transaction,
        draft: ResourceDraft<K>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Option<Resource<K>>> {
        ensure_not_cancelled(cancel)?;
        ops::execute_create(&self.registry, self.type_def()?, txn, draft, self.tracking)
    }

    async fn update(
        &self,
        txn: &mut Transaction,
        id: &K,
        draft: ResourceDraft<K>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Option<Resource<K>>> {
        ensure_not_cancelled(cancel)?;
        ops::execute_update(&self.registry, self.type_def()?, txn, id, draft, self.tracking)
    }

    async fn delete(
        &self,
        txn: &mut Transaction,
        id: &K,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        ensure_not_cancelled(cancel)?;
        ops::execute_delete(self.type_def()?, txn, id)
    }

    async fn set_relationship(
        &self,
        txn: &mut Transaction,
        id: &K,
        relationship: &str,
        input: RelationshipInput,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        ensure_not_cancelled(cancel)?;
        ops::execute_set_relationship(&self.registry, self.type_def()?, txn, id, relationship, input)
    }

    async fn add_to_relationship(
        &self,
        txn: &mut Transaction,
        id: &K,
        relationship: &str,
        related: Vec<RowRef>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        ensure_not_cancelled(cancel)?;
        ops::execute_add_to_relationship(&self.registry, self.type_def()?, txn, id, relationship, related)
    }

    async fn remove_from_relationship(
        &self,
        txn: &mut Transaction,
        id: &K,
        relationship: &str,
        related: Vec<RowRef>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        ensure_not_cancelled(cancel)?;
        ops::execute_remove_from_relationship(
            &self.registry,
            self.type_def()?,
            txn,
            id,
            relationship,
            related,
        )
    }
}
