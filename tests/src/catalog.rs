//! Resource catalogs and the fixture that wires one up.

use std::sync::Arc;

use jolt_core::{AtomicOptions, CancellationToken, IdKind, OperationKind, ResourceKey};
use jolt_operations::{
    AtomicOperationsController, AtomicOperationsProcessor, ProcessorRegistry,
    ProcessorRegistryBuilder, ResourceObjectBuilder, Response,
};
use jolt_registry::{AttrDef, AttrKind, Registry, RegistryBuilder, TypeDef};
use jolt_service::{ChangeTracking, ResourceService, StoreResourceService};
use jolt_store::Database;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ScenarioResult;

/// The domains scenarios run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Catalog {
    /// Tracks, lyrics, languages, record companies, performers and playlists.
    #[default]
    Music,
    /// Authors and books, people with subtypes, and an append-only audit log.
    Library,
}

impl Catalog {
    pub fn registry(&self) -> ScenarioResult<Registry> {
        let mut types = RegistryBuilder::new();
        match self {
            Catalog::Music => music(&mut types)?,
            Catalog::Library => library(&mut types)?,
        }
        Ok(types.build()?)
    }

    /// How the service for `resource_type` reports writes.
    pub fn change_tracking(&self, resource_type: &str) -> ChangeTracking {
        match (self, resource_type) {
            (Catalog::Music, "performers") => ChangeTracking::Always,
            _ => ChangeTracking::Detect,
        }
    }
}

fn music(types: &mut RegistryBuilder) -> ScenarioResult<()> {
    types
        .add_type("textLanguages", IdKind::Guid)
        .attr(AttrDef::new("isoCode", AttrKind::String).required().with_length(2, 3))
        .attr(AttrDef::new("isRightToLeft", AttrKind::Bool))
        .to_many("lyrics", "lyrics")
        .done()?;
    types
        .add_type("recordCompanies", IdKind::Int16)
        .attr(AttrDef::new("name", AttrKind::String).required())
        .attr(AttrDef::new("countryOfResidence", AttrKind::String))
        .to_many("tracks", "tracks")
        .to_one("parent", "recordCompanies")
        .done()?;
    types
        .add_type("performers", IdKind::Int32)
        .attr(AttrDef::new("artistName", AttrKind::String).required())
        .attr(AttrDef::new("bornAt", AttrKind::String).with_match_pattern(r"^\d{4}-\d{2}-\d{2}$"))
        .done()?;
    types
        .add_type("tracks", IdKind::Guid)
        .attr(AttrDef::new("title", AttrKind::String).required().not_null())
        .attr(AttrDef::new("lengthInSeconds", AttrKind::Float))
        .attr(AttrDef::new("genre", AttrKind::String).with_default(json!("unknown")))
        .to_one("lyric", "lyrics")
        .to_one("ownedBy", "recordCompanies")
        .to_many("performers", "performers")
        .to_many("occursIn", "playlists")
        .done()?;
    types
        .add_type("lyrics", IdKind::Int64)
        .attr(AttrDef::new("format", AttrKind::String).required())
        .attr(AttrDef::new("text", AttrKind::String).hidden())
        .attr(AttrDef::new("createdAt", AttrKind::String).readonly())
        .to_one("language", "textLanguages")
        .to_one("track", "tracks")
        .done()?;
    types
        .add_type("playlists", IdKind::Int64)
        .attr(AttrDef::new("name", AttrKind::String).required())
        .to_many("tracks", "tracks")
        .done()?;
    Ok(())
}

fn library(types: &mut RegistryBuilder) -> ScenarioResult<()> {
    types
        .add_type("authors", IdKind::Int32)
        .attr(AttrDef::new("name", AttrKind::String).required())
        .to_many("books", "books")
        .done()?;
    types
        .add_type("books", IdKind::Int32)
        .attr(AttrDef::new("title", AttrKind::String).required())
        .to_one("author", "authors")
        .done()?;
    types
        .add_type("people", IdKind::Int32)
        .attr(AttrDef::new("name", AttrKind::String).required())
        .abstract_type()
        .done()?;
    types
        .add_type("men", IdKind::Int32)
        .extends("people")
        .attr(AttrDef::new("hasBeard", AttrKind::Bool))
        .done()?;
    types
        .add_type("women", IdKind::Int32)
        .extends("people")
        .done()?;
    types
        .add_type("households", IdKind::Int32)
        .attr(AttrDef::new("street", AttrKind::String))
        .to_many("members", "people")
        .to_one("owner", "people")
        .done()?;
    types
        .add_type("auditEntries", IdKind::Text)
        .attr(AttrDef::new("message", AttrKind::String).required())
        .forbid(OperationKind::UpdateResource)
        .forbid(OperationKind::DeleteResource)
        .done()?;
    Ok(())
}

/// A catalog wired into a store, processors and a controller.
pub struct Fixture {
    catalog: Catalog,
    registry: Arc<Registry>,
    database: Database,
    processor: Arc<AtomicOperationsProcessor>,
    controller: AtomicOperationsController,
}

impl Fixture {
    pub fn new(catalog: Catalog, options: AtomicOptions) -> ScenarioResult<Self> {
        let registry = Arc::new(catalog.registry()?);
        let database = Database::with_tables(
            registry
                .all_types()
                .map(|t| (t.name.clone(), t.id_kind))
                .collect::<Vec<_>>(),
        );

        let builder = Arc::new(ResourceObjectBuilder::new(&options));
        let mut processors = ProcessorRegistry::builder(Arc::clone(&registry), builder);
        for type_def in registry.all_types() {
            processors = register(processors, catalog, &registry, type_def)?;
        }

        let processor = Arc::new(AtomicOperationsProcessor::new(
            Arc::clone(&registry),
            Arc::new(processors.build()),
            database.clone(),
            options,
        ));
        let controller = AtomicOperationsController::new(Arc::clone(&processor));
        Ok(Self {
            catalog,
            registry,
            database,
            processor,
            controller,
        })
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn processor(&self) -> &Arc<AtomicOperationsProcessor> {
        &self.processor
    }

    pub fn controller(&self) -> &AtomicOperationsController {
        &self.controller
    }

    /// Send `body` as a request that is never cancelled.
    pub async fn send(&self, body: &Value) -> Response {
        self.send_with(body, &CancellationToken::new()).await
    }

    pub async fn send_with(&self, body: &Value, cancel: &CancellationToken) -> Response {
        let body = body.to_string();
        self.controller.handle(Some(&body), cancel).await
    }
}

fn register(
    processors: ProcessorRegistryBuilder,
    catalog: Catalog,
    registry: &Arc<Registry>,
    type_def: &TypeDef,
) -> ScenarioResult<ProcessorRegistryBuilder> {
    let name = type_def.name.as_str();
    let tracking = catalog.change_tracking(name);
    let processors = match type_def.id_kind {
        IdKind::Int16 => processors.register::<i16>(name, service(registry, name, tracking)),
        IdKind::Int32 => processors.register::<i32>(name, service(registry, name, tracking)),
        IdKind::Int64 => processors.register::<i64>(name, service(registry, name, tracking)),
        IdKind::Guid => processors.register::<Uuid>(name, service(registry, name, tracking)),
        IdKind::Text => processors.register::<String>(name, service(registry, name, tracking)),
    }?;
    Ok(processors)
}

fn service<K: ResourceKey>(
    registry: &Arc<Registry>,
    resource_type: &str,
    tracking: ChangeTracking,
) -> Arc<dyn ResourceService<K>> {
    Arc::new(
        StoreResourceService::<K>::new(Arc::clone(registry), resource_type)
            .with_change_tracking(tracking),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_build() {
        for catalog in [Catalog::Music, Catalog::Library] {
            let fixture = Fixture::new(catalog, AtomicOptions::default()).unwrap();

            assert!(fixture.registry().type_count() > 0);
        }
    }

    #[test]
    fn test_library_inheritance() {
        let registry = Catalog::Library.registry().unwrap();

        assert!(registry.is_subtype("men", "people"));
        assert!(!registry.allows("people", OperationKind::CreateResource));
        assert!(!registry.allows("auditEntries", OperationKind::DeleteResource));
        assert!(registry.get_attr("women", "name").is_some());
    }
}
