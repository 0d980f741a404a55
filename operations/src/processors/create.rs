//! Create a resource, optionally binding its local id.

use std::sync::Arc;

use async_trait::async_trait;
use jolt_core::{AtomicResultObject, DefaultKey, ResourceKey};
use jolt_service::ResourceService;
use tracing::{debug, warn};

use super::{build_draft, parse_key};
use crate::classify::ClassifiedOperation;
use crate::error::{OperationError, OperationResult};
use crate::processor::{OperationContext, OperationProcessor};
use crate::representation::ResourceObjectBuilder;

pub struct CreateProcessor<K: ResourceKey> {
    service: Arc<dyn ResourceService<K>>,
    builder: Arc<ResourceObjectBuilder>,
}

pub type DefaultCreateProcessor = CreateProcessor<DefaultKey>;

impl<K: ResourceKey> CreateProcessor<K> {
    pub fn new(service: Arc<dyn ResourceService<K>>, builder: Arc<ResourceObjectBuilder>) -> Self {
        Self { service, builder }
    }
}

#[async_trait]
impl<K: ResourceKey> OperationProcessor for CreateProcessor<K> {
    async fn process(
        &self,
        operation: &ClassifiedOperation,
        ctx: &mut OperationContext<'_>,
    ) -> OperationResult<AtomicResultObject> {
        let resource_type = operation.resource_type.as_str();
        let input = operation.resource.as_ref().ok_or_else(|| {
            OperationError::invalid_operation("/data", "The 'data' element is required.")
        })?;

        let mut draft = build_draft::<K>(ctx, resource_type, input)?;
        if let Some(id) = &input.id {
            if !ctx.options.allow_client_generated_ids {
                return Err(OperationError::client_id_not_allowed(resource_type));
            }
            draft.id = Some(parse_key(resource_type, id, "/data/id")?);
        }
        let client_id = draft.id.clone();

        let created = self.service.create(ctx.txn, draft, ctx.cancel).await?;

        if let Some(lid) = &input.lid {
            // Without a reported resource only a client id identifies the row.
            let server_id = match (&created, &client_id) {
                (Some(resource), _) => Some(resource.string_id()),
                (None, Some(id)) => Some(id.to_key_string()),
                (None, None) => None,
            };
            match server_id {
                Some(server_id) => {
                    debug!(index = ctx.index, lid = %lid, id = %server_id, "local id assigned");
                    ctx.local_ids
                        .assign(lid, resource_type, server_id)
                        .map_err(|error| OperationError::local_id(error, "/data/lid"))?;
                }
                None => warn!(
                    index = ctx.index,
                    lid = %lid,
                    resource_type,
                    "service reported no resource, local id stays unassigned"
                ),
            }
        }

        Ok(match created {
            Some(resource) => AtomicResultObject::with_data(self.builder.build(ctx.registry, &resource)),
            None => AtomicResultObject::empty(),
        })
    }
}
