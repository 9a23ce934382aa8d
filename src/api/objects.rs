// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Object operations on the private/public namespace.
//!
//! These handlers run behind the policy gate: the session check and the
//! envelope decode have already happened, so bodies arriving here are
//! plaintext and responses of sealed routes are encrypted on the way out.

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    response::Response,
    Json,
};
use uuid::Uuid;

use crate::{
    api::stream::chunk_stream,
    crypto::Envelope,
    error::ApiError,
    models::{DeleteResponse, ListQuery, PartitionQuery, RenameRequest, ShareRequest, UploadQuery},
    state::AppState,
    storage::ObjectMeta,
};

/// Store a new object. The body is the envelope plaintext: the raw object
/// bytes. Fails 409 if the identifier is taken in the target partition.
#[utoipa::path(
    post,
    path = "/v1/objects",
    params(UploadQuery),
    request_body(content = Envelope, description = "Envelope sealing the raw object bytes"),
    tag = "Objects",
    responses(
        (status = 200, body = ObjectMeta),
        (status = 409, description = "Identifier already exists in the partition"),
        (status = 413, description = "Payload exceeds the envelope ceiling")
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<ObjectMeta>, ApiError> {
    let identifier = params
        .identifier
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut data: &[u8] = &body;
    let meta = state.objects.put(&identifier, params.partition, &mut data)?;

    tracing::info!(
        identifier = %meta.identifier,
        partition = %meta.partition.as_str(),
        size = meta.size,
        "object stored"
    );
    Ok(Json(meta))
}

/// List objects, filtered by partition. Sorted by identifier.
#[utoipa::path(
    get,
    path = "/v1/objects",
    params(ListQuery),
    tag = "Objects",
    responses((status = 200, body = [ObjectMeta]))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ObjectMeta>>, ApiError> {
    Ok(Json(state.objects.list(params.partition)?))
}

/// Download an object from either partition. The object bytes stream back
/// incrementally behind the session check.
#[utoipa::path(
    get,
    path = "/v1/objects/{identifier}",
    params(("identifier" = String, Path), PartitionQuery),
    tag = "Objects",
    responses(
        (status = 200, description = "Object bytes"),
        (status = 404, description = "No such object in the partition")
    )
)]
pub async fn download(
    Path(identifier): Path<String>,
    Query(params): Query<PartitionQuery>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let (meta, reader) = state.objects.open(&identifier, params.partition)?;

    Response::builder()
        .header(CONTENT_TYPE, "application/octet-stream")
        .header(CONTENT_LENGTH, meta.size)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{identifier}\""),
        )
        .body(Body::from_stream(chunk_stream(reader)))
        .map_err(|_| ApiError::backend_fault("Failed to build response"))
}

/// Metadata-only retrieval for HEAD checks; no body is transferred.
#[utoipa::path(
    head,
    path = "/v1/objects/{identifier}",
    params(("identifier" = String, Path), PartitionQuery),
    tag = "Objects",
    responses(
        (status = 200, description = "Object exists; size in Content-Length"),
        (status = 404, description = "No such object in the partition")
    )
)]
pub async fn stat(
    Path(identifier): Path<String>,
    Query(params): Query<PartitionQuery>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let meta = state.objects.stat(&identifier, params.partition)?;

    Response::builder()
        .header(CONTENT_LENGTH, meta.size)
        .header("x-object-partition", meta.partition.as_str())
        .body(Body::empty())
        .map_err(|_| ApiError::backend_fault("Failed to build response"))
}

/// Rename an object within its partition. 409 if the new identifier is
/// taken; renaming to the same name is a no-op success.
#[utoipa::path(
    post,
    path = "/v1/objects/{identifier}/rename",
    params(("identifier" = String, Path)),
    request_body = RenameRequest,
    tag = "Objects",
    responses(
        (status = 200, body = ObjectMeta),
        (status = 404, description = "No such object in the partition"),
        (status = 409, description = "New identifier already exists")
    )
)]
pub async fn rename(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<ObjectMeta>, ApiError> {
    let meta = state
        .objects
        .rename(&identifier, request.partition, &request.new_identifier)?;

    tracing::info!(
        from = %identifier,
        to = %meta.identifier,
        partition = %meta.partition.as_str(),
        "object renamed"
    );
    Ok(Json(meta))
}

/// Move an object to the other partition, preserving its identifier. 409 if
/// the destination partition already holds that identifier.
#[utoipa::path(
    post,
    path = "/v1/objects/{identifier}/share",
    params(("identifier" = String, Path)),
    request_body = ShareRequest,
    tag = "Objects",
    responses(
        (status = 200, body = ObjectMeta),
        (status = 404, description = "No such object in the source partition"),
        (status = 409, description = "Identifier exists in the destination partition")
    )
)]
pub async fn share(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ObjectMeta>, ApiError> {
    let meta = state.objects.share(&identifier, request.from_partition)?;

    tracing::info!(
        identifier = %meta.identifier,
        now_in = %meta.partition.as_str(),
        "object moved across partitions"
    );
    Ok(Json(meta))
}

/// Remove an object from a partition.
#[utoipa::path(
    delete,
    path = "/v1/objects/{identifier}",
    params(("identifier" = String, Path), PartitionQuery),
    tag = "Objects",
    responses(
        (status = 200, body = DeleteResponse),
        (status = 404, description = "No such object in the partition")
    )
)]
pub async fn delete(
    Path(identifier): Path<String>,
    Query(params): Query<PartitionQuery>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.objects.delete(&identifier, params.partition)?;

    tracing::info!(
        identifier = %identifier,
        partition = %params.partition.as_str(),
        "object deleted"
    );
    Ok(Json(DeleteResponse {
        message: format!("Object {identifier} deleted"),
    }))
}
