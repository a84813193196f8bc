use super::*;

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{Entity, QueryFilter},
    error::FetchErrorKind,
};
use tokio::net::TcpListener;
use tokio_stream::StreamExt;

#[derive(Clone, Copy)]
enum CatalogBehavior {
    Bare,
    Wrapped,
    Unauthorized,
    ServerError,
    Garbage,
}

#[derive(Clone)]
struct CatalogServerState {
    behavior: CatalogBehavior,
    filters: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct EntitiesQuery {
    filter: Option<String>,
}

fn workflow_json(name: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "backstage.io/v1alpha1",
        "kind": "Resource",
        "metadata": {
            "name": name,
            "description": "Reusable GitHub Actions workflow",
            "tags": ["ci", "cd", "github-actions"],
            "links": [{
                "url": "https://docs.github.com/en/actions/learn-github-actions/reusing-workflows",
                "title": "Reusing Workflows in GitHub Actions",
                "icon": "github",
                "type": "documentation"
            }],
            "path": "workflows",
            "schema": { "title": "GitHub CI/CD Workflow Blocks", "type": "object" }
        },
        "spec": {
            "type": "github-workflow",
            "lifecycle": "production",
            "owner": "your-org"
        }
    })
}

async fn entities_handler(
    State(state): State<CatalogServerState>,
    Query(q): Query<EntitiesQuery>,
) -> Response {
    state
        .filters
        .lock()
        .expect("lock")
        .push(q.filter.unwrap_or_default());

    match state.behavior {
        CatalogBehavior::Bare => {
            Json(serde_json::json!([workflow_json("wf-a"), workflow_json("wf-b")])).into_response()
        }
        CatalogBehavior::Wrapped => {
            Json(serde_json::json!({ "items": [workflow_json("wf-c")] })).into_response()
        }
        CatalogBehavior::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        CatalogBehavior::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        CatalogBehavior::Garbage => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

async fn spawn_catalog_server(
    behavior: CatalogBehavior,
) -> anyhow::Result<(String, Arc<Mutex<Vec<String>>>)> {
    let filters = Arc::new(Mutex::new(Vec::new()));
    let state = CatalogServerState {
        behavior,
        filters: filters.clone(),
    };
    let app = Router::new()
        .route("/api/catalog/entities", get(entities_handler))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/api/catalog"), filters))
}

async fn spawn_blocks_server() -> anyhow::Result<String> {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(
            "/building-blocks",
            get(|| async { Json(vec!["block1", "block2", "block3"]) }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/api/catalog")
}

async fn query_error(behavior: CatalogBehavior) -> shared::error::FetchError {
    let (url, _filters) = spawn_catalog_server(behavior).await.expect("spawn server");
    let client = CatalogClient::new(&url).expect("client");
    client
        .query(&QueryFilter::github_workflows())
        .await
        .expect_err("should fail")
}

#[test]
fn entities_url_keeps_catalog_path_and_encodes_filter() {
    let client = CatalogClient::new("http://localhost:7007/api/catalog/").expect("client");
    let url = client.entities_url(&QueryFilter::github_workflows());
    assert_eq!(url.path(), "/api/catalog/entities");
    let filter: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        filter,
        vec![(
            "filter".to_string(),
            "kind=Resource,spec.type=github-workflow".to_string()
        )]
    );
}

#[test]
fn rejects_unparseable_catalog_url() {
    assert!(CatalogClient::new("not a url").is_err());
}

#[tokio::test]
async fn catalog_query_reads_bare_array_in_order() {
    let (url, filters) = spawn_catalog_server(CatalogBehavior::Bare)
        .await
        .expect("spawn server");
    let client = CatalogClient::new(&url).expect("client");

    let entities = client
        .query(&QueryFilter::github_workflows())
        .await
        .expect("entities");
    let names: Vec<&str> = entities.iter().map(Entity::name).collect();
    assert_eq!(names, vec!["wf-a", "wf-b"]);
    assert_eq!(entities[0].owner(), "your-org");
    assert_eq!(entities[0].tags().len(), 3);
    assert_eq!(
        entities[0].links()[0].label(),
        "Reusing Workflows in GitHub Actions"
    );
    assert_eq!(
        *filters.lock().expect("lock"),
        vec!["kind=Resource,spec.type=github-workflow"]
    );
}

#[tokio::test]
async fn catalog_query_reads_items_wrapper() {
    let (url, _filters) = spawn_catalog_server(CatalogBehavior::Wrapped)
        .await
        .expect("spawn server");
    let client = CatalogClient::new(&url).expect("client");
    let entities = client
        .query(&QueryFilter::github_workflows())
        .await
        .expect("entities");
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].name(), "wf-c");
}

#[tokio::test]
async fn catalog_errors_are_classified() {
    assert_eq!(
        query_error(CatalogBehavior::Unauthorized).await.kind(),
        FetchErrorKind::Unauthorized
    );

    let server_error = query_error(CatalogBehavior::ServerError).await;
    assert_eq!(server_error.kind(), FetchErrorKind::Unknown);
    assert!(server_error.message().contains("500"));

    assert_eq!(
        query_error(CatalogBehavior::Garbage).await.kind(),
        FetchErrorKind::MalformedResponse
    );
}

#[tokio::test]
async fn unreachable_catalog_is_a_network_failure() {
    let client = CatalogClient::new(&unused_local_url().await).expect("client");
    let err = client
        .query(&QueryFilter::github_workflows())
        .await
        .expect_err("should fail");
    assert_eq!(err.kind(), FetchErrorKind::NetworkFailure);
}

#[tokio::test]
async fn blocks_client_reads_health_and_blocks() {
    let server_url = spawn_blocks_server().await.expect("spawn server");
    let client = BlocksClient::new(format!("{server_url}/"));

    assert!(client.health().await.expect("health"));
    assert_eq!(
        client.building_blocks().await.expect("blocks"),
        vec!["block1", "block2", "block3"]
    );
}

#[tokio::test]
async fn controller_drives_catalog_client_end_to_end() {
    let (url, _filters) = spawn_catalog_server(CatalogBehavior::Bare)
        .await
        .expect("spawn server");
    let navigator = MemoryNavigator::new("/building-blocks/wf-b");
    let controller = ViewController::new(
        Arc::new(CatalogClient::new(&url).expect("client")),
        navigator.clone(),
        "/building-blocks",
    );
    controller.follow_location();

    let mut snapshots = controller.snapshots();
    let first = snapshots.next().await.expect("initial snapshot");
    assert!(first.view_state.is_loading());

    let _handle = controller.start(QueryFilter::github_workflows());
    let loaded = snapshots.next().await.expect("loaded snapshot");
    assert_eq!(loaded.view_state.entities().len(), 2);
    assert_eq!(loaded.selection.as_deref(), Some("wf-b"));

    controller.clear_selection();
    assert_eq!(navigator.current_path(), "/building-blocks");
    let cleared = snapshots.next().await.expect("cleared snapshot");
    assert_eq!(cleared.selection, None);
}
