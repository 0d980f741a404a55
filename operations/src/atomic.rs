//! The batch loop.
//!
//! A batch is validated as a whole before anything is written: shapes,
//! resource types, processor availability, client ids and every local id
//! declaration and reference. Only then is a transaction opened and the
//! operations executed in order. The first failure rolls everything back.

use std::sync::Arc;

use jolt_core::{AtomicOperationObject, AtomicOptions, AtomicResultObject, CancellationToken, OperationKind};
use jolt_registry::Registry;
use jolt_store::Database;
use jolt_transaction::Transaction;
use tracing::{debug, info, warn};

use crate::classify::{classify, ClassifiedOperation};
use crate::error::{BatchError, BatchResult, OperationError, OperationResult};
use crate::local_ids::LocalIdTracker;
use crate::processor::{OperationContext, OperationProcessor};
use crate::registry::ProcessorRegistry;

/// A validated operation with the processor that will execute it.
struct PlannedOperation {
    operation: ClassifiedOperation,
    processor: Arc<dyn OperationProcessor>,
}

/// Applies batches of atomic operations to a database.
pub struct AtomicOperationsProcessor {
    registry: Arc<Registry>,
    processors: Arc<ProcessorRegistry>,
    database: Database,
    options: AtomicOptions,
}

impl AtomicOperationsProcessor {
    pub fn new(
        registry: Arc<Registry>,
        processors: Arc<ProcessorRegistry>,
        database: Database,
        options: AtomicOptions,
    ) -> Self {
        Self {
            registry,
            processors,
            database,
            options,
        }
    }

    pub fn options(&self) -> &AtomicOptions {
        &self.options
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Apply `operations` as one unit and return one result per operation.
    pub async fn process(
        &self,
        operations: Vec<AtomicOperationObject>,
        cancel: &CancellationToken,
    ) -> BatchResult<Vec<AtomicResultObject>> {
        if operations.is_empty() {
            return Err(BatchError::NoOperations);
        }
        if let Some(max) = self.options.max_operations_per_request {
            if operations.len() > max {
                return Err(BatchError::TooManyOperations {
                    count: operations.len(),
                    max,
                });
            }
        }
        info!(operations = operations.len(), "processing atomic operations");

        let (plan, mut local_ids) = self.validate(&operations)?;

        let mut txn = Transaction::begin(&self.database).await;
        let mut results = Vec::with_capacity(plan.len());
        for planned in &plan {
            let index = planned.operation.index;
            match self.execute(planned, &mut txn, &mut local_ids, cancel).await {
                Ok(result) => results.push(result),
                Err(error) => {
                    warn!(txn = txn.id(), index, %error, "operation failed, rolling back batch");
                    if let Err(rollback_error) = txn.rollback() {
                        warn!(index, error = %rollback_error, "rollback incomplete");
                    }
                    return Err(BatchError::operation(index, error));
                }
            }
        }

        let txn_id = txn.id();
        txn.commit()?;
        info!(txn = txn_id, operations = results.len(), "atomic operations committed");
        Ok(results)
    }

    /// Check the whole batch without touching the store.
    fn validate(
        &self,
        operations: &[AtomicOperationObject],
    ) -> BatchResult<(Vec<PlannedOperation>, LocalIdTracker)> {
        let mut local_ids = LocalIdTracker::new();
        let mut plan = Vec::with_capacity(operations.len());

        for (index, wire) in operations.iter().enumerate() {
            let at = |error: OperationError| BatchError::operation(index, error);

            let operation = classify(wire, index).map_err(at)?;
            let processor = self.processors.resolve(&self.registry, &operation).map_err(at)?;

            for (resource_type, member) in operation.referenced_types() {
                if !self.registry.contains_type(resource_type) {
                    return Err(at(OperationError::unknown_resource_type(resource_type, member)));
                }
            }

            if operation.kind == OperationKind::CreateResource && !self.options.allow_client_generated_ids {
                let has_client_id = operation.resource.as_ref().is_some_and(|r| r.id.is_some());
                if has_client_id {
                    return Err(at(OperationError::client_id_not_allowed(&operation.resource_type)));
                }
            }

            if let Some(declaration) = operation.lid_declaration() {
                local_ids
                    .reserve(declaration.lid, declaration.resource_type)
                    .map_err(|error| at(OperationError::local_id(error, declaration.member.clone())))?;
            }

            for reference in operation.lid_references() {
                if !local_ids.is_reserved(reference.lid, reference.resource_type) {
                    return Err(at(OperationError::UnknownLocalId {
                        lid: reference.lid.to_string(),
                        resource_type: reference.resource_type.to_string(),
                        member: reference.member,
                    }));
                }
            }

            plan.push(PlannedOperation {
                operation,
                processor,
            });
        }

        Ok((plan, local_ids))
    }

    async fn execute(
        &self,
        planned: &PlannedOperation,
        txn: &mut Transaction,
        local_ids: &mut LocalIdTracker,
        cancel: &CancellationToken,
    ) -> OperationResult<AtomicResultObject> {
        let operation = &planned.operation;
        if cancel.is_cancelled() {
            return Err(OperationError::Cancelled);
        }
        debug!(
            index = operation.index,
            kind = %operation.kind,
            resource_type = %operation.resource_type,
            "dispatching operation"
        );

        let mut ctx = OperationContext {
            index: operation.index,
            txn,
            local_ids,
            cancel,
            registry: &self.registry,
            options: &self.options,
        };
        planned.processor.process(operation, &mut ctx).await
    }
}
