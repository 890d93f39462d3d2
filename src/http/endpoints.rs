//! Tree endpoints
//!
//! - `GET /api/tree` - List the forest
//! - `POST /api/tree` - Create a node
//! - `GET /api/health` - Health check

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::Value;

use super::{AppState, HttpError};
use crate::api::{ApiResult, TreeApi};
use crate::forest::{json, Node, NodeId};

/// Parsed body of `POST /api/tree`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNodeRequest {
    /// Raw label; a missing or null label arrives as empty and fails validation
    pub label: String,
    pub parent_id: Option<NodeId>,
}

impl CreateNodeRequest {
    /// Parse a request body
    ///
    /// Accepts `parent_id` as an integer or as a string holding one.
    pub fn parse(body: &[u8]) -> Result<Self, HttpError> {
        if body.is_empty() {
            return Err(HttpError::bad_request("Request body is required"));
        }
        let payload: Value = serde_json::from_slice(body)
            .map_err(|_| HttpError::bad_request("Request body must be valid JSON"))?;
        let Value::Object(fields) = payload else {
            return Err(HttpError::bad_request("Request body must be a JSON object"));
        };

        let label = match fields.get("label") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(HttpError::bad_request("label must be a string")),
        };

        let parent_id = match fields.get("parent_id") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(n.as_i64().ok_or_else(parent_id_error)?),
            Some(Value::String(s)) => Some(s.trim().parse::<i64>().map_err(|_| parent_id_error())?),
            Some(_) => return Err(parent_id_error()),
        };

        Ok(Self {
            label,
            parent_id: parent_id.map(NodeId::new),
        })
    }
}

fn parent_id_error() -> HttpError {
    HttpError::bad_request("parent_id must be an integer")
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Run a store-backed call off the async workers
async fn blocking<T, F>(api: TreeApi, f: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&TreeApi) -> ApiResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&api))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "store task failed");
            HttpError::internal()
        })?
        .map_err(HttpError::from)
}

/// List every tree, roots and children ordered by id
///
/// The forest is encoded on the blocking thread; its depth is unbounded.
///
/// ```bash
/// curl http://127.0.0.1:9001/api/tree
/// ```
async fn list_trees(State(state): State<AppState>) -> Result<impl IntoResponse, HttpError> {
    let body = blocking(state.api, |api| Ok(json::forest_to_vec(&api.list_forest()?)))
        .await?
        .map_err(|e| {
            tracing::error!(error = %e, "failed to encode forest");
            HttpError::internal()
        })?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Create a node
///
/// ```bash
/// curl -X POST http://127.0.0.1:9001/api/tree \
///   -H "Content-Type: application/json" \
///   -d '{"label": "child", "parent_id": 1}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Node>), HttpError> {
    let request = CreateNodeRequest::parse(&body?)?;
    let node = blocking(state.api, move |api| {
        api.create_node(&request.label, request.parent_id)
    })
    .await?;

    tracing::debug!(id = %node.id, "created node via http");
    Ok((StatusCode::CREATED, Json(node)))
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub(super) async fn unknown_endpoint() -> HttpError {
    HttpError::not_found("Unknown endpoint")
}

async fn method_not_allowed() -> HttpError {
    HttpError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/tree",
            get(list_trees).post(create_node).fallback(method_not_allowed),
        )
        .route("/api/health", get(health_check).fallback(method_not_allowed))
        .with_state(state)
}
