//! Delete a resource.

use std::sync::Arc;

use async_trait::async_trait;
use jolt_core::{AtomicResultObject, DefaultKey, ResourceKey};
use jolt_service::ResourceService;

use super::resolve_target;
use crate::classify::ClassifiedOperation;
use crate::error::OperationResult;
use crate::processor::{OperationContext, OperationProcessor};

pub struct DeleteProcessor<K: ResourceKey> {
    service: Arc<dyn ResourceService<K>>,
}

pub type DefaultDeleteProcessor = DeleteProcessor<DefaultKey>;

impl<K: ResourceKey> DeleteProcessor<K> {
    pub fn new(service: Arc<dyn ResourceService<K>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<K: ResourceKey> OperationProcessor for DeleteProcessor<K> {
    async fn process(
        &self,
        operation: &ClassifiedOperation,
        ctx: &mut OperationContext<'_>,
    ) -> OperationResult<AtomicResultObject> {
        let id = resolve_target::<K>(operation, ctx)?;
        self.service.delete(ctx.txn, &id, ctx.cancel).await?;
        Ok(AtomicResultObject::empty())
    }
}
