// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Unauthenticated download of public-partition objects.
//!
//! Public objects are served as an incremental stream: the reader runs on a
//! blocking task feeding bounded chunks through a channel, so a large
//! download never buffers whole nor blocks other in-flight requests.

use axum::{
    body::Body,
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    response::Response,
};
use crate::{api::stream::chunk_stream, error::ApiError, state::AppState, storage::Partition};

/// Stream an object from the public partition. No session required.
#[utoipa::path(
    get,
    path = "/public/{identifier}",
    params(("identifier" = String, Path)),
    tag = "Public",
    responses(
        (status = 200, description = "Object bytes"),
        (status = 404, description = "No such public object")
    )
)]
pub async fn download(
    Path(identifier): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let (meta, reader) = state.objects.open(&identifier, Partition::Public)?;

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
