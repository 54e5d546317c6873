//! `/resources` endpoints.
//!
//! GET    /resources?kind=K&scope=S&all=B   partition listing
//! GET    /resources?id=ID[&all=true]       single record
//! POST   /resources                        create
//! PUT    /resources                        partial update
//! DELETE /resources?id=ID                  hard delete
//! POST   /resources/move                   { id, direction }
//! POST   /resources/reorder                { kind, scope?, command }
//! POST   /resources/compact                { kind, scope? }
//!
//! Every body is the `{ success, data?, error? }` envelope.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::common::{ApiResponse, ResourceId};
use crate::domains::auth::Caller;
use crate::domains::resources::models::{NewResource, Partition, ResourceKind, ResourcePatch};
use crate::domains::resources::ordering::{Direction, ReorderCommand};
use crate::domains::resources::{ResourceError, ResourceResult};
use crate::server::app::AxumAppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    kind: Option<String>,
    scope: Option<String>,
    #[serde(default)]
    all: bool,
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    id: ResourceId,
    direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct PartitionRequest {
    kind: ResourceKind,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    kind: ResourceKind,
    #[serde(default)]
    scope: Option<String>,
    command: ReorderCommand,
}

fn parse_id(raw: Option<&str>) -> ResourceResult<ResourceId> {
    let raw = raw.ok_or_else(|| ResourceError::validation("id is required"))?;
    ResourceId::parse(raw).map_err(|e| ResourceError::Validation(format!("Invalid id: {}", e)))
}

/// List a partition or fetch one record.
///
/// `all=true` goes through the admin gateway; otherwise only active records
/// are visible and no token is needed.
pub async fn list_resources(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<Caller>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, ResourceError> {
    let Query(query) = query?;

    if query.id.is_some() {
        let id = parse_id(query.id.as_deref())?;
        let record = if query.all {
            state.gateway.hidden_reader(&caller)?.get(id).await?
        } else {
            state.public_reader.get(id).await?
        };
        return Ok(Json(ApiResponse::ok(record)).into_response());
    }

    let kind: ResourceKind = query
        .kind
        .as_deref()
        .ok_or_else(|| ResourceError::validation("kind is required"))?
        .parse()?;

    let records = if query.all {
        state
            .gateway
            .hidden_reader(&caller)?
            .read_all(kind, query.scope)
            .await?
    } else {
        state.public_reader.list(kind, query.scope).await?
    };
    Ok(Json(ApiResponse::ok(records)).into_response())
}

pub async fn create_resource(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<NewResource>, JsonRejection>,
) -> Result<Response, ResourceError> {
    let editor = state.gateway.editor(&caller)?;
    let Json(input) = body?;

    let record = editor.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))).into_response())
}

pub async fn update_resource(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<ResourcePatch>, JsonRejection>,
) -> Result<Response, ResourceError> {
    let editor = state.gateway.editor(&caller)?;
    let Json(patch) = body?;

    let record = editor.update(patch).await?;
    Ok(Json(ApiResponse::ok(record)).into_response())
}

pub async fn delete_resource(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<Caller>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ResourceError> {
    let editor = state.gateway.editor(&caller)?;
    let Query(query) = query?;
    let id = parse_id(query.id.as_deref())?;

    editor.delete(id).await?;
    Ok(Json(ApiResponse::done()).into_response())
}

pub async fn move_resource(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Response, ResourceError> {
    let editor = state.gateway.editor(&caller)?;
    let Json(request) = body?;

    let records = editor.move_adjacent(request.id, request.direction).await?;
    Ok(Json(ApiResponse::ok(records)).into_response())
}

pub async fn reorder_resources(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<Response, ResourceError> {
    let editor = state.gateway.editor(&caller)?;
    let Json(request) = body?;

    let partition = Partition::new(request.kind, request.scope);
    let records = editor.reorder(&partition, request.command).await?;
    Ok(Json(ApiResponse::ok(records)).into_response())
}

pub async fn compact_resources(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<PartitionRequest>, JsonRejection>,
) -> Result<Response, ResourceError> {
    let editor = state.gateway.editor(&caller)?;
    let Json(request) = body?;

    let partition = Partition::new(request.kind, request.scope);
    let records = editor.compact(&partition).await?;
    Ok(Json(ApiResponse::ok(records)).into_response())
}
