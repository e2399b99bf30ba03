// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use digi::server::{router, AppState};
use digi_core::application::{IngestionPool, PoolHandle};
use digi_core::infrastructure::lake::InMemoryLake;
use digi_intent::application::RetrievalService;
use digi_intent::infrastructure::{HashingEncoder, HomeCatalog};

const HOMES: [(&str, &str, &[&str]); 5] = [
    ("home-1", "living-room", &["lamp", "tv"]),
    ("home-2", "kitchen", &["fridge", "lamp"]),
    ("home-3", "garage", &["door", "light"]),
    ("home-4", "bedroom", &["fan", "lamp"]),
    ("home-5", "porch", &["light"]),
];

fn write_catalog(dir: &Path) {
    for (i, (name, room, devices)) in HOMES.iter().enumerate() {
        let mut yaml = format!(
            "apiVersion: digi.dev/v1\nkind: Home\nmetadata:\n  name: {}\nspec:\n  mount:\n    digi.dev/v1/rooms:\n      default/{}:\n",
            name, room
        );
        for device in *devices {
            yaml.push_str(&format!(
                "        {}:\n          name: {}-{}\n",
                device, room, device
            ));
        }
        std::fs::write(dir.join(format!("home{}.yaml", i + 1)), yaml).unwrap();
    }
}

fn app(pool: PoolHandle, catalog_dir: &Path) -> Router {
    let state = AppState {
        pool,
        retrieval: RetrievalService::new(Arc::new(HashingEncoder::default())),
        catalog: HomeCatalog::new(catalog_dir, 5),
        default_branch: "main".to_string(),
        metrics: Some(PrometheusBuilder::new().build_recorder().handle()),
    };
    router(state, "/metrics")
}

fn memory_pool() -> (PoolHandle, Arc<InMemoryLake>) {
    let lake = Arc::new(InMemoryLake::new());
    let pool = IngestionPool::new("l1", lake.clone());
    (PoolHandle::new(Some(Arc::new(pool))), lake)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_index_banner() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(PoolHandle::disabled(), dir.path())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/query?search="));
}

#[tokio::test]
async fn test_query_returns_ranked_homes() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());

    let response = app(PoolHandle::disabled(), dir.path())
        .oneshot(
            Request::builder()
                .uri("/query?search=kitchen")
                .header(header::ORIGIN, "http://dashboard.local")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let body = body_json(response).await;
    let homes = body["homes"].as_array().unwrap();
    assert_eq!(homes.len(), 3);
    assert_eq!(homes[0]["metadata"]["name"], "home-2");
}

#[tokio::test]
async fn test_query_without_search_param() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());

    let response = app(PoolHandle::disabled(), dir.path())
        .oneshot(Request::builder().uri("/query").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["homes"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_query_missing_catalog_is_500() {
    let dir = tempfile::tempdir().unwrap();

    let response = app(PoolHandle::disabled(), dir.path())
        .oneshot(
            Request::builder()
                .uri("/query?search=kitchen")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("home1.yaml"));
}

#[tokio::test]
async fn test_events_are_stamped_and_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, lake) = memory_pool();

    let response = app(pool, dir.path())
        .oneshot(post_json(
            "/events",
            json!([{"event_ts": 100, "val": "a", "ts": "T"}, {"val": "b"}]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["accepted"], 2);

    let stored = lake.records("l1", "main");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["event_ts"], "T");
    assert_eq!(stored[0]["val"], "a");
    assert!(stored[0]["ts"].is_string());
    assert_eq!(stored[0]["ts"], stored[1]["ts"]);
    assert!(stored[1].get("event_ts").is_none());
}

#[tokio::test]
async fn test_events_branch_param() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, lake) = memory_pool();

    let response = app(pool, dir.path())
        .oneshot(post_json("/events?branch=staging", json!({"power": "on"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(lake.records("l1", "main").is_empty());
    assert_eq!(lake.records("l1", "staging").len(), 1);
}

#[tokio::test]
async fn test_events_write_failure_still_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, lake) = memory_pool();
    lake.fail_writes(true);

    let response = app(pool.clone(), dir.path())
        .oneshot(post_json("/events", json!([{"val": "a"}])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(pool.stats().unwrap().failed_loads, 1);
}

#[tokio::test]
async fn test_events_rejects_scalars() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, lake) = memory_pool();

    let response = app(pool, dir.path())
        .oneshot(post_json("/events", json!([1, 2])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(lake.records("l1", "main").is_empty());
}

#[tokio::test]
async fn test_pool_query() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, _lake) = memory_pool();
    pool.load(
        vec![
            json!({"power": "on"}).as_object().unwrap().clone(),
            json!({"power": "off"}).as_object().unwrap().clone(),
        ],
        "main",
    )
    .await;

    let response = app(pool, dir.path())
        .oneshot(post_json("/pool/query", json!({"query": "power==on"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await["records"].clone();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["power"], "on");
}

#[tokio::test]
async fn test_pool_query_lake_error_is_502() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, _lake) = memory_pool();

    let response = app(pool, dir.path())
        .oneshot(post_json("/pool/query", json!({"query": "from l1 | head 1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_disabled_pool_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(PoolHandle::disabled(), dir.path());

    let response = app
        .clone()
        .oneshot(post_json("/events", json!([{"val": "a"}])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .oneshot(post_json("/pool/query", json!({"query": "*"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["records"], json!([]));
}

#[tokio::test]
async fn test_health_reports_pool() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, _lake) = memory_pool();

    let response = app(pool, dir.path())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["pool"], "l1");
    assert_eq!(body["stats"]["loaded_batches"], 0);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let dir = tempfile::tempdir().unwrap();

    let response = app(PoolHandle::disabled(), dir.path())
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
