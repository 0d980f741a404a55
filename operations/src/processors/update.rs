//! Update the attributes and relationships of an existing resource.

use std::sync::Arc;

use async_trait::async_trait;
use jolt_core::{AtomicResultObject, DefaultKey, ResourceKey};
use jolt_service::ResourceService;

use super::{build_draft, resolve_target};
use crate::classify::ClassifiedOperation;
use crate::error::{OperationError, OperationResult};
use crate::processor::{OperationContext, OperationProcessor};
use crate::representation::ResourceObjectBuilder;

pub struct UpdateProcessor<K: ResourceKey> {
    service: Arc<dyn ResourceService<K>>,
    builder: Arc<ResourceObjectBuilder>,
}

pub type DefaultUpdateProcessor = UpdateProcessor<DefaultKey>;

impl<K: ResourceKey> UpdateProcessor<K> {
    pub fn new(service: Arc<dyn ResourceService<K>>, builder: Arc<ResourceObjectBuilder>) -> Self {
        Self { service, builder }
    }
}

#[async_trait]
impl<K: ResourceKey> OperationProcessor for UpdateProcessor<K> {
    async fn process(
        &self,
        operation: &ClassifiedOperation,
        ctx: &mut OperationContext<'_>,
    ) -> OperationResult<AtomicResultObject> {
        let id = resolve_target::<K>(operation, ctx)?;
        let input = operation.resource.as_ref().ok_or_else(|| {
            OperationError::invalid_operation("/data", "The 'data' element is required.")
        })?;
        let draft = build_draft::<K>(ctx, &operation.resource_type, input)?;

        let updated = self.service.update(ctx.txn, &id, draft, ctx.cancel).await?;

        Ok(match updated {
            Some(resource) => AtomicResultObject::with_data(self.builder.build(ctx.registry, &resource)),
            None => AtomicResultObject::empty(),
        })
    }
}
