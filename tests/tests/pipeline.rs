//! Pipeline behaviour that needs direct control over a request: cancellation,
//! abandoned requests, concurrent requests and options loading.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jolt_core::{AtomicOperationObject, IdKind};
use jolt_operations::{
    AtomicOperationsProcessor, BatchError, OperationError, ProcessorRegistry,
    ResourceObjectBuilder,
};
use jolt_registry::{AttrDef, AttrKind, RegistryBuilder};
use jolt_service::{
    RelationshipInput, Resource, ResourceDraft, ResourceService, RowRef, ServiceResult,
    StoreResourceService,
};
use jolt_store::Database;
use jolt_tests::prelude::*;
use jolt_transaction::Transaction;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tokio::sync::Notify;

/// What happens around a create.
enum Hook {
    /// Cancel the request once the resource is stored.
    CancelAfterCreate,
    /// Block until notified before storing anything.
    WaitBeforeCreate(Arc<Notify>),
    /// Store the resource but report nothing back.
    Unreported,
}

/// A store-backed service with a hook on create.
struct Hooked {
    inner: StoreResourceService<i32>,
    hook: Hook,
}

#[async_trait]
impl ResourceService<i32> for Hooked {
    fn resource_type(&self) -> &str {
        self.inner.resource_type()
    }

    async fn get(
        &self,
        txn: &mut Transaction,
        id: &i32,
        cancel: &CancellationToken,
    ) -> ServiceResult<Resource<i32>> {
        self.inner.get(txn, id, cancel).await
    }

    async fn create(
        &self,
        txn: &mut Transaction,
        draft: ResourceDraft<i32>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Option<Resource<i32>>> {
        match &self.hook {
            Hook::CancelAfterCreate => {
                let created = self.inner.create(txn, draft, cancel).await;
                cancel.cancel();
                created
            }
            Hook::WaitBeforeCreate(gate) => {
                gate.notified().await;
                self.inner.create(txn, draft, cancel).await
            }
            Hook::Unreported => {
                self.inner.create(txn, draft, cancel).await?;
                Ok(None)
            }
        }
    }

    async fn update(
        &self,
        txn: &mut Transaction,
        id: &i32,
        draft: ResourceDraft<i32>,
        cancel: &CancellationToken,
    ) -> ServiceResult<Option<Resource<i32>>> {
        self.inner.update(txn, id, draft, cancel).await
    }

    async fn delete(
        &self,
        txn: &mut Transaction,
        id: &i32,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        self.inner.delete(txn, id, cancel).await
    }

    async fn set_relationship(
        &self,
        txn: &mut Transaction,
        id: &i32,
        relationship: &str,
        input: RelationshipInput,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        self.inner
            .set_relationship(txn, id, relationship, input, cancel)
            .await
    }

    async fn add_to_relationship(
        &self,
        txn: &mut Transaction,
        id: &i32,
        relationship: &str,
        related: Vec<RowRef>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        self.inner
            .add_to_relationship(txn, id, relationship, related, cancel)
            .await
    }

    async fn remove_from_relationship(
        &self,
        txn: &mut Transaction,
        id: &i32,
        relationship: &str,
        related: Vec<RowRef>,
        cancel: &CancellationToken,
    ) -> ServiceResult<()> {
        self.inner
            .remove_from_relationship(txn, id, relationship, related, cancel)
            .await
    }
}

/// `tags` served normally and `notes` served through `hook`.
fn hooked_pipeline(hook: Hook) -> AtomicOperationsProcessor {
    let mut types = RegistryBuilder::new();
    types
        .add_type("tags", IdKind::Int32)
        .attr(AttrDef::new("label", AttrKind::String))
        .done()
        .unwrap();
    types
        .add_type("notes", IdKind::Int32)
        .attr(AttrDef::new("body", AttrKind::String))
        .to_many("tags", "tags")
        .done()
        .unwrap();
    let registry = Arc::new(types.build().unwrap());
    let database = Database::with_tables([("tags", IdKind::Int32), ("notes", IdKind::Int32)]);

    let options = AtomicOptions::default();
    let tags = StoreResourceService::<i32>::new(Arc::clone(&registry), "tags");
    let notes = Hooked {
        inner: StoreResourceService::new(Arc::clone(&registry), "notes"),
        hook,
    };
    let processors = ProcessorRegistry::builder(
        Arc::clone(&registry),
        Arc::new(ResourceObjectBuilder::new(&options)),
    )
    .register::<i32>("tags", Arc::new(tags))
    .unwrap()
    .register::<i32>("notes", Arc::new(notes))
    .unwrap()
    .build();

    AtomicOperationsProcessor::new(registry, Arc::new(processors), database, options)
}

fn operations(value: Value) -> Vec<AtomicOperationObject> {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_cancellation_between_operations_rolls_back() {
    // GIVEN
    init_tracing();
    let processor = hooked_pipeline(Hook::CancelAfterCreate);
    let cancel = CancellationToken::new();
    let batch = operations(json!([
        { "op": "add", "data": { "type": "notes", "attributes": { "body": "first" } } },
        { "op": "add", "data": { "type": "tags", "attributes": { "label": "second" } } }
    ]));

    // WHEN
    let result = processor.process(batch, &cancel).await;

    // THEN
    assert_eq!(result, Err(BatchError::operation(1, OperationError::Cancelled)));
    assert_eq!(result.unwrap_err().status(), 499);
    assert_eq!(processor.database().count("notes").await, 0);
    assert_eq!(processor.database().count("tags").await, 0);
}

#[tokio::test]
async fn test_abandoned_request_rolls_back() {
    // GIVEN
    init_tracing();
    let gate = Arc::new(Notify::new());
    let processor = hooked_pipeline(Hook::WaitBeforeCreate(Arc::clone(&gate)));
    let batch = operations(json!([
        { "op": "add", "data": { "type": "tags", "attributes": { "label": "written" } } },
        { "op": "add", "data": { "type": "notes", "attributes": { "body": "stuck" } } }
    ]));
    let cancel = CancellationToken::new();

    // WHEN
    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        processor.process(batch, &cancel),
    )
    .await;

    // THEN
    assert!(outcome.is_err());
    assert_eq!(processor.database().count("tags").await, 0);
    assert_eq!(processor.database().count("notes").await, 0);
}

#[tokio::test]
async fn test_unreported_create_leaves_local_id_unassigned() {
    // GIVEN
    init_tracing();
    let processor = hooked_pipeline(Hook::Unreported);
    let batch = operations(json!([
        { "op": "add", "data": { "type": "notes", "lid": "n1", "attributes": { "body": "quiet" } } },
        { "op": "remove", "ref": { "type": "notes", "lid": "n1" } }
    ]));

    // WHEN
    let result = processor.process(batch, &CancellationToken::new()).await;

    // THEN
    let error = result.unwrap_err();
    assert_eq!(error.index(), Some(1));
    assert_eq!(error.status(), 400);
    assert!(matches!(
        error,
        BatchError::Operation { error: OperationError::LocalIdNotYetAssigned { ref lid, .. }, .. }
            if lid == "n1"
    ));
    assert_eq!(processor.database().count("notes").await, 0);
}

#[tokio::test]
async fn test_results_follow_operation_order() {
    let fixture = Fixture::new(Catalog::Music, AtomicOptions::default()).unwrap();
    let batch = operations(json!([
        { "op": "add", "data": { "type": "performers", "attributes": { "artistName": "Prince" } } },
        { "op": "add", "data": { "type": "playlists", "lid": "p", "attributes": { "name": "Mix" } } },
        { "op": "add", "data": { "type": "recordCompanies", "attributes": { "name": "Warner" } } },
        { "op": "update", "data": { "type": "playlists", "lid": "p", "attributes": { "name": "Mix 2" } } },
        { "op": "add", "data": { "type": "textLanguages", "attributes": { "isoCode": "fr" } } }
    ]));

    let results = fixture
        .processor()
        .process(batch, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 5);
    let types: Vec<Option<&str>> = results
        .iter()
        .map(|r| r.data.as_ref().map(|d| d.resource_type.as_str()))
        .collect();
    assert_eq!(
        types,
        vec![
            Some("performers"),
            Some("playlists"),
            Some("recordCompanies"),
            None,
            Some("textLanguages"),
        ]
    );
    let playlist = fixture.database().get("playlists", "1").await.unwrap();
    assert_eq!(playlist.get_attr("name"), Some(&json!("Mix 2")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_requests_are_serialized() {
    let fixture = Arc::new(Fixture::new(Catalog::Music, AtomicOptions::default()).unwrap());
    let request = |name: &'static str| {
        let fixture = Arc::clone(&fixture);
        async move {
            fixture
                .send(&json!({
                    "atomic:operations": [
                        { "op": "add", "data": { "type": "performers", "attributes": { "artistName": name } } },
                        { "op": "add", "data": { "type": "playlists", "attributes": { "name": name } } }
                    ]
                }))
                .await
        }
    };

    let (first, second) = tokio::join!(
        tokio::spawn(request("first")),
        tokio::spawn(request("second"))
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!((first.status, second.status), (200, 200));
    let id = |response: &jolt_operations::Response| {
        response.body.as_ref().unwrap()["atomic:results"][0]["data"]["id"].clone()
    };
    assert_ne!(id(&first), id(&second));
    assert_eq!(fixture.database().count("performers").await, 2);
    assert_eq!(fixture.database().count("playlists").await, 2);
}

#[tokio::test]
async fn test_options_from_file_with_overrides() {
    // GIVEN
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
namespace = "api"
base_url = "https://music.example.com/"
max_operations_per_request = 1
"#
    )
    .unwrap();
    let mut options = AtomicOptions::load(file.path()).unwrap();
    options
        .apply_overrides(|name| (name == "JOLT_MAX_OPERATIONS").then(|| "0".to_string()))
        .unwrap();
    assert_eq!(options.max_operations_per_request, None);

    // WHEN
    let fixture = Fixture::new(Catalog::Music, options).unwrap();
    let response = fixture
        .send(&json!({
            "atomic:operations": [
                { "op": "add", "data": { "type": "textLanguages", "attributes": { "isoCode": "de" } } },
                { "op": "add", "data": { "type": "recordCompanies", "attributes": { "name": "BMG" } } }
            ]
        }))
        .await;

    // THEN
    assert_eq!(response.status, 200);
    let body = response.body.unwrap();
    let language = &body["atomic:results"][0]["data"];
    let self_link = language["links"]["self"].as_str().unwrap();
    let id = language["id"].as_str().unwrap();
    assert_eq!(self_link, format!("https://music.example.com/api/textLanguages/{id}"));
    assert_eq!(
        language["relationships"]["lyrics"]["links"],
        json!({
            "self": format!("{self_link}/relationships/lyrics"),
            "related": format!("{self_link}/lyrics"),
        })
    );
    assert_eq!(
        body["atomic:results"][1]["data"]["links"]["self"],
        json!("https://music.example.com/api/recordCompanies/1")
    );
}

#[tokio::test]
async fn test_relationship_links_can_be_disabled() {
    let options = AtomicOptions {
        include_relationship_links: false,
        ..AtomicOptions::default()
    };
    let fixture = Fixture::new(Catalog::Music, options).unwrap();

    let response = fixture
        .send(&json!({
            "atomic:operations": [
                { "op": "add", "data": { "type": "tracks", "attributes": { "title": "Sign o' the Times" } } }
            ]
        }))
        .await;

    let data = &response.body.unwrap()["atomic:results"][0]["data"];
    assert!(data.get("relationships").is_none());
    assert_eq!(data["attributes"]["title"], json!("Sign o' the Times"));
}

#[tokio::test]
async fn test_malformed_options_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_operations_per_request = \"many\"").unwrap();

    assert!(AtomicOptions::load(file.path()).is_err());
}
