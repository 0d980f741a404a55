//! Processor lookup by resource type and operation kind.

use std::collections::HashMap;
use std::sync::Arc;

use jolt_core::{IdKind, OperationKind, ResourceKey};
use jolt_registry::Registry;
use jolt_service::ResourceService;
use thiserror::Error;

use crate::classify::ClassifiedOperation;
use crate::error::{OperationError, OperationResult};
use crate::processor::OperationProcessor;
use crate::processors::{
    AddToRelationshipProcessor, CreateProcessor, DeleteProcessor, RemoveFromRelationshipProcessor,
    SetRelationshipProcessor, UpdateProcessor,
};
use crate::representation::ResourceObjectBuilder;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessorRegistryError {
    #[error("Resource type '{0}' is not declared in the registry")]
    UnknownResourceType(String),

    #[error("Resource type '{resource_type}' declares {declared} ids but its service uses {service}")]
    IdKindMismatch {
        resource_type: String,
        declared: IdKind,
        service: IdKind,
    },

    #[error("Service for resource type '{expected}' reports type '{actual}'")]
    ServiceTypeMismatch { expected: String, actual: String },

    #[error("Resource type '{0}' is registered more than once")]
    DuplicateRegistration(String),
}

/// Processors keyed by (resource type, operation kind). Immutable once built.
pub struct ProcessorRegistry {
    processors: HashMap<(String, OperationKind), Arc<dyn OperationProcessor>>,
}

impl ProcessorRegistry {
    pub fn builder(registry: Arc<Registry>, builder: Arc<ResourceObjectBuilder>) -> ProcessorRegistryBuilder {
        ProcessorRegistryBuilder::new(registry, builder)
    }

    /// The processor for `operation`.
    pub fn resolve(
        &self,
        registry: &Registry,
        operation: &ClassifiedOperation,
    ) -> OperationResult<Arc<dyn OperationProcessor>> {
        if !registry.contains_type(&operation.resource_type) {
            return Err(OperationError::unknown_resource_type(
                &operation.resource_type,
                operation.type_member,
            ));
        }
        self.get(&operation.resource_type, operation.kind)
            .ok_or_else(|| OperationError::unsupported_operation(&operation.resource_type, operation.kind))
    }

    pub fn get(&self, resource_type: &str, kind: OperationKind) -> Option<Arc<dyn OperationProcessor>> {
        self.processors
            .get(&(resource_type.to_string(), kind))
            .cloned()
    }

    pub fn supports(&self, resource_type: &str, kind: OperationKind) -> bool {
        self.processors.contains_key(&(resource_type.to_string(), kind))
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

/// Builds a [`ProcessorRegistry`] from one service per resource type.
pub struct ProcessorRegistryBuilder {
    registry: Arc<Registry>,
    builder: Arc<ResourceObjectBuilder>,
    processors: HashMap<(String, OperationKind), Arc<dyn OperationProcessor>>,
}

impl ProcessorRegistryBuilder {
    pub fn new(registry: Arc<Registry>, builder: Arc<ResourceObjectBuilder>) -> Self {
        Self {
            registry,
            builder,
            processors: HashMap::new(),
        }
    }

    /// Register `service` for `resource_type`, with a processor for every
    /// operation kind the type allows.
    pub fn register<K: ResourceKey>(
        mut self,
        resource_type: &str,
        service: Arc<dyn ResourceService<K>>,
    ) -> Result<Self, ProcessorRegistryError> {
        let type_def = self
            .registry
            .get_type(resource_type)
            .ok_or_else(|| ProcessorRegistryError::UnknownResourceType(resource_type.to_string()))?;
        if type_def.id_kind != K::KIND {
            return Err(ProcessorRegistryError::IdKindMismatch {
                resource_type: resource_type.to_string(),
                declared: type_def.id_kind,
                service: K::KIND,
            });
        }
        if service.resource_type() != resource_type {
            return Err(ProcessorRegistryError::ServiceTypeMismatch {
                expected: resource_type.to_string(),
                actual: service.resource_type().to_string(),
            });
        }
        if OperationKind::ALL
            .iter()
            .any(|kind| self.processors.contains_key(&(resource_type.to_string(), *kind)))
        {
            return Err(ProcessorRegistryError::DuplicateRegistration(resource_type.to_string()));
        }

        let allowed: Vec<OperationKind> = type_def.operations.iter().copied().collect();
        for kind in allowed {
            let processor: Arc<dyn OperationProcessor> = match kind {
                OperationKind::CreateResource => Arc::new(CreateProcessor::new(
                    Arc::clone(&service),
                    Arc::clone(&self.builder),
                )),
                OperationKind::UpdateResource => Arc::new(UpdateProcessor::new(
                    Arc::clone(&service),
                    Arc::clone(&self.builder),
                )),
                OperationKind::DeleteResource => Arc::new(DeleteProcessor::new(Arc::clone(&service))),
                OperationKind::AddToRelationship => {
                    Arc::new(AddToRelationshipProcessor::new(Arc::clone(&service)))
                }
                OperationKind::SetRelationship => {
                    Arc::new(SetRelationshipProcessor::new(Arc::clone(&service)))
                }
                OperationKind::RemoveFromRelationship => {
                    Arc::new(RemoveFromRelationshipProcessor::new(Arc::clone(&service)))
                }
            };
            self.processors.insert((resource_type.to_string(), kind), processor);
        }
        Ok(self)
    }

    pub fn build(self) -> ProcessorRegistry {
        ProcessorRegistry {
            processors: self.processors,
        }
    }
}
