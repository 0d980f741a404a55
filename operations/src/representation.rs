//! Building wire resource objects from stored resources.

use std::collections::BTreeMap;

use jolt_core::{AtomicOptions, ResourceKey, ResourceLinks, ResourceObject, RelationshipLinks, RelationshipObject};
use jolt_registry::Registry;
use jolt_service::Resource;
use serde_json::Value;

/// Renders resources the way they appear in `atomic:results`.
///
/// Attributes are limited to viewable ones. Relationships carry links only,
/// never data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceObjectBuilder {
    prefix: String,
    include_relationship_links: bool,
}

impl ResourceObjectBuilder {
    pub fn new(options: &AtomicOptions) -> Self {
        Self {
            prefix: options.link_prefix(),
            include_relationship_links: options.include_relationship_links,
        }
    }

    pub fn build<K: ResourceKey>(&self, registry: &Registry, resource: &Resource<K>) -> ResourceObject {
        let id = resource.string_id();
        let resource_link = format!("{}/{}/{}", self.prefix, resource.resource_type, id);

        let mut object = ResourceObject::new(&resource.resource_type);
        object.id = Some(id);
        object.links = Some(ResourceLinks {
            self_link: Some(resource_link.clone()),
        });

        let Some(type_def) = registry.get_type(&resource.resource_type) else {
            return object;
        };

        let attributes: BTreeMap<String, Value> = type_def
            .viewable_attrs()
            .map(|attr| {
                let value = resource.get_attr(&attr.name).cloned().unwrap_or(Value::Null);
                (attr.name.clone(), value)
            })
            .collect();
        if !attributes.is_empty() {
            object.attributes = Some(attributes);
        }

        if self.include_relationship_links && !type_def.relationships.is_empty() {
            let relationships = type_def
                .relationships
                .keys()
                .map(|name| {
                    let links = RelationshipLinks {
                        self_link: Some(format!("{resource_link}/relationships/{name}")),
                        related: Some(format!("{resource_link}/{name}")),
                    };
                    let relationship = RelationshipObject {
                        links: Some(links),
                        ..Default::default()
                    };
                    (name.clone(), relationship)
                })
                .collect();
            object.relationships = Some(relationships);
        }

        object
    }
}
