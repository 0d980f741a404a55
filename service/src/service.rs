//! The resource service contract.

use async_trait::async_trait;
use jolt_core::{CancellationToken, ResourceKey};
use jolt_store::RowRef;
use jolt_transaction::Transaction;

use crate::error::ServiceResult;
use crate::resource::{RelationshipInput, Resource, ResourceDraft};

/// Create, read, update and delete for one resource type, plus relationship
/// mutation, keyed by the type's id representation `K`.
///
/// Every call runs inside the caller's transaction and must fail with
/// [`ServiceError::Cancelled`](crate::ServiceError::Cancelled) once `cancel`
/// is set, before touching the store.
#[async_trait]
pub trait ResourceService<K: ResourceKey>: Send + Sync {
    /// Public name of the resource type this service manages.
    fn resource_type(&self) -> &str;

    async fn get(
        &self,
        txn: &mut Transaction,
        id: &K,
        cancel: &CancellationToken,
    ) -> ServiceResult<Resource<K>>;

    /// Create a resource. Returns the stored resource when it differs from
    /// what the client sent (such as a server-assigned id or defaults), or
    /// `None` when the client already knows everything about it.
    async fn create(
        &self,
        txn: &mut Transaction,
        draft: ResourceDraft<K>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Option<Resource<K>>>;

    /// Apply a partial update. Returns the stored resource when it changed
    /// beyond what the request asked for.
    async fn update(
        &self,
        txn: &mut Transaction,
        id: &K,
        draft: ResourceDraft<K>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Option<Resource<K>>>;

    async fn delete(
        &self,
        txn: &mut Transaction,
        id: &K,
        cancel: &CancellationToken,
    ) -> ServiceResult<()>;

    /// Replace a relationship's value.
    async fn set_relationship(
        &self,
        txn: &mut Transaction,
        id: &K,
        relationship: &str,
        input: RelationshipInput,
        cancel: &CancellationToken,
    ) -> ServiceResult<()>;

    async fn add_to_relationship(
        &self,
        txn: &mut Transaction,
        id: &K,
        relationship: &str,
        related: Vec<RowRef>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()>;

    async fn remove_from_relationship(
        &self,
        txn: &mut Transaction,
        id: &K,
        relationship: &str,
        related: Vec<RowRef>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()>;
}
