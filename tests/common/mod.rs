//! Shared helpers for Canopy integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use canopy::http::{create_router, AppState};
use canopy::{Node, OpenStore, SqliteStore, TreeApi};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// API over a fresh in-memory store
pub fn memory_api() -> TreeApi {
    TreeApi::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
}

/// API over a fresh on-disk store; keep the `TempDir` alive for the test
pub fn file_api() -> (TreeApi, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("trees.db")).unwrap();
    (TreeApi::new(Arc::new(store)), dir)
}

pub fn router(api: TreeApi) -> Router {
    create_router(AppState::new(api))
}

/// Send one request through the router and return the raw reply body
pub async fn send_raw(app: &Router, method: Method, path: &str, body: Option<&str>) -> (StatusCode, Bytes) {
    let mut builder = Request::builder().method(method).uri(path);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes)
}

/// Send one request through the router and decode the JSON reply
pub async fn send(app: &Router, method: Method, path: &str, body: Option<&str>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, path, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, Method::GET, path, None).await
}

pub async fn post(app: &Router, path: &str, body: &str) -> (StatusCode, Value) {
    send(app, Method::POST, path, Some(body)).await
}

/// Total nodes across a forest
pub fn count(forest: &[Node]) -> usize {
    forest.iter().map(Node::subtree_len).sum()
}
