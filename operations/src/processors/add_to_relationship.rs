//! Add members to a to-many relationship.

use std::sync::Arc;

use async_trait::async_trait;
use jolt_core::{AtomicResultObject, DefaultKey, ResourceKey};
use jolt_service::ResourceService;

use super::{resolve_identifiers, resolve_target, target_relationship};
use crate::classify::{ClassifiedOperation, RelationshipData};
use crate::error::{OperationError, OperationResult};
use crate::processor::{OperationContext, OperationProcessor};

pub struct AddToRelationshipProcessor<K: ResourceKey> {
    service: Arc<dyn ResourceService<K>>,
}

pub type DefaultAddToRelationshipProcessor = AddToRelationshipProcessor<DefaultKey>;

impl<K: ResourceKey> AddToRelationshipProcessor<K> {
    pub fn new(service: Arc<dyn ResourceService<K>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<K: ResourceKey> OperationProcessor for AddToRelationshipProcessor<K> {
    async fn process(
        &self,
        operation: &ClassifiedOperation,
        ctx: &mut OperationContext<'_>,
    ) -> OperationResult<AtomicResultObject> {
        let id = resolve_target::<K>(operation, ctx)?;
        let rel_def = target_relationship(operation, ctx.registry)?;
        if !rel_def.is_to_many() {
            return Err(OperationError::relationship_not_to_many(&rel_def.name));
        }
        let identifiers = operation
            .relationship_data
            .iter()
            .flat_map(RelationshipData::identifiers);
        let related = resolve_identifiers(ctx, rel_def, identifiers)?;

        self.service
            .add_to_relationship(ctx.txn, &id, &rel_def.name, related, ctx.cancel)
            .await?;
        Ok(AtomicResultObject::empty())
    }
}
