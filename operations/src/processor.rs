//! The processor seam between the batch loop and the resource services.

use async_trait::async_trait;
use jolt_core::{AtomicOptions, AtomicResultObject, CancellationToken};
use jolt_registry::Registry;
use jolt_transaction::Transaction;

use crate::classify::ClassifiedOperation;
use crate::error::OperationResult;
use crate::local_ids::LocalIdTracker;

/// Everything a processor may touch while executing one operation.
pub struct OperationContext<'a> {
    /// Position of the operation in the batch.
    pub index: usize,
    pub txn: &'a mut Transaction,
    pub local_ids: &'a mut LocalIdTracker,
    pub cancel: &'a CancellationToken,
    pub registry: &'a Registry,
    pub options: &'a AtomicOptions,
}

/// Executes one kind of operation for one resource type.
#[async_trait]
pub trait OperationProcessor: Send + Sync {
    async fn process(
        &self,
        operation: &ClassifiedOperation,
        ctx: &mut OperationContext<'_>,
    ) -> OperationResult<AtomicResultObject>;
}
