// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    crypto::Envelope,
    middleware::policy_gate,
    models::{
        DeleteResponse, LoginRequest, LoginResponse, LogoutResponse, RenameRequest, ShareRequest,
        WhoAmI,
    },
    state::AppState,
    storage::{ObjectMeta, Partition, PartitionFilter},
};

pub mod auth;
pub mod health;
pub mod objects;
pub mod public;
pub(crate) mod stream;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/v1/objects", get(objects::list).post(objects::upload))
        .route(
            "/v1/objects/{identifier}",
            get(objects::download)
                .head(objects::stat)
                .delete(objects::delete),
        )
        .route("/v1/objects/{identifier}/rename", post(objects::rename))
        .route("/v1/objects/{identifier}/share", post(objects::share))
        .route("/public/{identifier}", get(public::download))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        // Every route above passes the policy gate; the table inside decides
        // which of them actually require a session or an envelope.
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            policy_gate,
        ))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::me,
        objects::upload,
        objects::list,
        objects::download,
        objects::stat,
        objects::rename,
        objects::share,
        objects::delete,
        public::download,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            WhoAmI,
            ObjectMeta,
            Partition,
            PartitionFilter,
            RenameRequest,
            ShareRequest,
            DeleteResponse,
            Envelope
        )
    ),
    tags(
        (name = "Authentication", description = "Session issuance and introspection"),
        (name = "Objects", description = "Private/public object namespace"),
        (name = "Public", description = "Unauthenticated public downloads"),
        (name = "Health", description = "Probes")
    )
)]
struct ApiDoc;
