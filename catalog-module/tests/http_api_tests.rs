use std::sync::Arc;

use axum::Router;
use catalog_ingest::provider::{FixtureEntityProvider, MessageResponse};
use catalog_module::{Dependencies, ModuleConfig};
use catalog_shared::EntityRef;
use serde_json::Value;

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_module() -> (Dependencies, String) {
    let deps = Dependencies::new(&ModuleConfig::default()).await.unwrap();
    let base = spawn_test_server(deps.router.clone()).await;
    (deps, base)
}

#[tokio::test]
async fn full_sync_returns_ok_and_queues_fixture_set() {
    let (deps, base) = spawn_module().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/catalog/full", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: MessageResponse = resp.json().await.unwrap();
    assert_eq!(body.message, "OK");

    let names: Vec<String> = deps
        .catalog
        .provider_entities("test-provider")
        .await
        .into_iter()
        .map(|d| d.entity.metadata.name)
        .collect();
    assert_eq!(
        names,
        vec!["group-1", "component-a", "component-b", "component-c"]
    );
    assert_eq!(deps.catalog.pending_count().await, 4);
}

#[tokio::test]
async fn delta_sync_after_full_rewires_component_a() {
    let (deps, base) = spawn_module().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/catalog/full", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    deps.engine.process_pending().await.unwrap();

    let resp = client
        .post(format!("{}/api/catalog/delta", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    deps.engine.process_pending().await.unwrap();

    let a = EntityRef::in_default("Component", "component-a");
    let targets: Vec<String> = deps
        .catalog
        .relations_of(&a)
        .await
        .into_iter()
        .filter(|r| r.relation_type == "testDependsOn")
        .map(|r| r.target.name)
        .collect();
    assert_eq!(targets, vec!["component-c"]);
}

#[tokio::test]
async fn sync_on_unconnected_provider_returns_500() {
    let provider = Arc::new(FixtureEntityProvider::new());
    let base = spawn_test_server(provider.router()).await;
    let client = reqwest::Client::new();

    for path in ["full", "delta"] {
        let resp = client
            .post(format!("{}/{}", base, path))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("not initialized"));
    }
}

#[tokio::test]
async fn get_on_sync_route_is_rejected() {
    let (_deps, base) = spawn_module().await;
    let resp = reqwest::get(format!("{}/api/catalog/full", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn routes_outside_plugin_namespace_return_404() {
    let (_deps, base) = spawn_module().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/full", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn health_reports_pending_entities() {
    let (_deps, base) = spawn_module().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/catalog/full", base))
        .send()
        .await
        .unwrap();

    let body: Value = reqwest::get(format!("{}/api/catalog/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["pendingEntities"], 4);
}
