//! Replace the value of a relationship.

use std::sync::Arc;

use async_trait::async_trait;
use jolt_core::{AtomicResultObject, DefaultKey, ResourceKey};
use jolt_service::ResourceService;

use super::{resolve_relationship_data, resolve_target, target_relationship};
use crate::classify::ClassifiedOperation;
use crate::error::{OperationError, OperationResult};
use crate::processor::{OperationContext, OperationProcessor};

pub struct SetRelationshipProcessor<K: ResourceKey> {
    service: Arc<dyn ResourceService<K>>,
}

pub type DefaultSetRelationshipProcessor = SetRelationshipProcessor<DefaultKey>;

impl<K: ResourceKey> SetRelationshipProcessor<K> {
    pub fn new(service: Arc<dyn ResourceService<K>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<K: ResourceKey> OperationProcessor for SetRelationshipProcessor<K> {
    async fn process(
        &self,
        operation: &ClassifiedOperation,
        ctx: &mut OperationContext<'_>,
    ) -> OperationResult<AtomicResultObject> {
        let id = resolve_target::<K>(operation, ctx)?;
        let rel_def = target_relationship(operation, ctx.registry)?;
        let data = operation.relationship_data.as_ref().ok_or_else(|| {
            OperationError::invalid_operation("/data", "The 'data' element is required.")
        })?;
        let input = resolve_relationship_data(ctx, rel_def, data, "/data")?;

        self.service
            .set_relationship(ctx.txn, &id, &rel_def.name, input, ctx.cancel)
            .await?;
        Ok(AtomicResultObject::empty())
    }
}
