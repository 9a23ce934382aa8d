// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! End-to-end scenarios against the full router.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so every layer is
//! exercised: the policy gate, the envelope codec, the handlers and the
//! filesystem store underneath.

use std::io::Read;
use std::path::Path;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tower::ServiceExt;

use vaultgate::{
    api::router,
    config::{GatewayConfig, DEFAULT_MAX_ENVELOPE_BYTES, DEFAULT_SESSION_TTL},
    crypto::EnvelopeCodec,
    state::AppState,
    storage::{
        FsBackend, ObjectKey, ObjectMeta, Partition, StoragePaths, StoreBackend, StoreError,
    },
};

const ENVELOPE_KEY: [u8; 32] = [0x42; 32];

fn gateway_config(data_dir: &Path, max_envelope_bytes: usize) -> GatewayConfig {
    GatewayConfig {
        username: "admin".to_string(),
        password_sha256: Sha256::digest(b"swordfish").into(),
        token_secret: b"integration-secret".to_vec(),
        session_ttl: DEFAULT_SESSION_TTL,
        envelope_key: ENVELOPE_KEY,
        max_envelope_bytes,
        data_dir: data_dir.to_path_buf(),
    }
}

/// Router plus the client-side codec sharing the pre-shared key.
fn gateway() -> (TempDir, Router, EnvelopeCodec) {
    let dir = TempDir::new().expect("tempdir");
    let backend = FsBackend::new(StoragePaths::new(dir.path()));
    backend.initialize().expect("initialize backend");

    let config = gateway_config(dir.path(), DEFAULT_MAX_ENVELOPE_BYTES);
    let app = router(AppState::new(config, Arc::new(backend)));
    let codec = EnvelopeCodec::new(ENVELOPE_KEY, DEFAULT_MAX_ENVELOPE_BYTES);
    (dir, app, codec)
}

fn sealed(codec: &EnvelopeCodec, plaintext: &[u8]) -> Body {
    Body::from(codec.encode_body(plaintext).expect("seal request body"))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, body.to_vec())
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).expect("json body")
}

async fn login(app: &Router) -> String {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"username":"admin","password":"swordfish"}"#,
        ))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    json(&body)["access_token"]
        .as_str()
        .expect("access_token")
        .to_string()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Decrypt a sealed response and parse the plaintext as JSON.
fn unseal_json(codec: &EnvelopeCodec, body: &[u8]) -> serde_json::Value {
    let plaintext = codec.decode_body(body).expect("unseal response");
    serde_json::from_slice(&plaintext).expect("plaintext json")
}

#[tokio::test]
async fn login_rejects_bad_credentials_with_a_generic_401() {
    let (_dir, app, _codec) = gateway();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"username":"admin","password":"wrong"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["error_code"], "unauthenticated");
}

#[tokio::test]
async fn session_routes_reject_missing_and_garbage_tokens() {
    let (_dir, app, _codec) = gateway();

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/v1/objects")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/v1/objects")
            .header(AUTHORIZATION, "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["error_code"], "malformed_token");
}

#[tokio::test]
async fn me_echoes_the_logged_in_principal() {
    let (_dir, app, _codec) = gateway();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/auth/me")
            .header(AUTHORIZATION, bearer(&token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["username"], "admin");
}

#[tokio::test]
async fn upload_share_and_public_retrieval_lifecycle() {
    let (_dir, app, codec) = gateway();
    let token = login(&app).await;

    // Upload "a" to the private partition through the sealed route.
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=a&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, b"alpha"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let meta = unseal_json(&codec, &body);
    assert_eq!(meta["identifier"], "a");
    assert_eq!(meta["partition"], "private");
    assert_eq!(meta["size"], 5);

    // A private object is not visible on the public route.
    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/public/a")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Share it to public.
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects/a/share")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, br#"{"from_partition":"private"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unseal_json(&codec, &body)["partition"], "public");

    // Now anyone can fetch it, no token, plaintext bytes.
    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/public/a")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"alpha");

    // The private slot is free again after the move.
    let (status, _) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=a&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, b"alpha v2"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // But re-uploading over an occupied identifier conflicts.
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=a&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, b"alpha v3"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json(&body)["error_code"], "conflict");
}

#[tokio::test]
async fn session_download_streams_the_object_back() {
    let (_dir, app, codec) = gateway();
    let token = login(&app).await;

    send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=report&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, b"quarterly numbers"))
            .unwrap(),
    )
    .await;

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/v1/objects/report?partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"quarterly numbers");

    // HEAD reports the size without a body.
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::HEAD)
            .uri("/v1/objects/report?partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn rename_moves_the_identifier_within_the_partition() {
    let (_dir, app, codec) = gateway();
    let token = login(&app).await;

    send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=draft&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, b"content"))
            .unwrap(),
    )
    .await;

    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects/draft/rename")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(
                &codec,
                br#"{"new_identifier":"final","partition":"private"}"#,
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unseal_json(&codec, &body)["identifier"], "final");

    // The old name is gone.
    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/v1/objects/draft?partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enveloped_requests_need_no_json_content_type_label() {
    let (_dir, app, codec) = gateway();
    let token = login(&app).await;

    send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=draft&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, b"content"))
            .unwrap(),
    )
    .await;

    // The client labels the outer envelope as raw bytes; the gate relabels
    // the decoded payload so the Json-consuming handler still accepts it.
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects/draft/rename")
            .header(AUTHORIZATION, bearer(&token))
            .header("content-type", "application/octet-stream")
            .body(sealed(
                &codec,
                br#"{"new_identifier":"final","partition":"private"}"#,
            ))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(unseal_json(&codec, &body)["identifier"], "final");
}

#[tokio::test]
async fn tampered_envelope_fails_with_decryption_failed() {
    let (_dir, app, codec) = gateway();
    let token = login(&app).await;

    let mut envelope: serde_json::Value =
        serde_json::from_slice(&codec.encode_body(b"payload").unwrap()).unwrap();
    // Corrupt the tag; the wire stays structurally valid.
    envelope["tag"] = serde_json::Value::String("AAAAAAAAAAAAAAAAAAAAAA==".to_string());

    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=x&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(Body::from(envelope.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error_code"], "decryption_failed");
}

#[tokio::test]
async fn oversized_envelope_is_rejected_with_413() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(StoragePaths::new(dir.path()));
    backend.initialize().unwrap();

    // Server ceiling of 16 bytes; the client codec is unconstrained.
    let config = gateway_config(dir.path(), 16);
    let app = router(AppState::new(config, Arc::new(backend)));
    let codec = EnvelopeCodec::new(ENVELOPE_KEY, DEFAULT_MAX_ENVELOPE_BYTES);
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=big&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(sealed(&codec, &[0u8; 100]))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json(&body)["error_code"], "too_large");
}

/// Backend wrapper counting every call, to show that failed gates never
/// reach the store.
struct RecordingBackend {
    inner: FsBackend,
    calls: Arc<AtomicUsize>,
}

impl StoreBackend for RecordingBackend {
    fn create(&self, key: &ObjectKey, data: &mut dyn Read) -> Result<u64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create(key, data)
    }

    fn open(&self, key: &ObjectKey) -> Result<Box<dyn Read + Send>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.open(key)
    }

    fn stat(&self, key: &ObjectKey) -> Result<ObjectMeta, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.stat(key)
    }

    fn link(&self, from: &ObjectKey, to: &ObjectKey) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.link(from, to)
    }

    fn delete(&self, key: &ObjectKey) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key)
    }

    fn list(&self, partition: Partition) -> Result<Vec<ObjectMeta>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list(partition)
    }
}

#[tokio::test]
async fn failed_gates_never_touch_the_store() {
    let dir = TempDir::new().unwrap();
    let inner = FsBackend::new(StoragePaths::new(dir.path()));
    inner.initialize().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = RecordingBackend {
        inner,
        calls: calls.clone(),
    };

    let config = gateway_config(dir.path(), DEFAULT_MAX_ENVELOPE_BYTES);
    let app = router(AppState::new(config, Arc::new(backend)));
    let token = login(&app).await;

    // No token at all.
    let (status, _) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=a&partition=private")
            .body(Body::from("raw bytes"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid token but no envelope on an envelope-required route.
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=a&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error_code"], "encryption_required");

    // Valid token, body that is not an envelope.
    let (status, body) = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/v1/objects?identifier=a&partition=private")
            .header(AUTHORIZATION, bearer(&token))
            .body(Body::from("just some bytes"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error_code"], "decryption_failed");

    assert_eq!(calls.load(Ordering::SeqCst), 0, "store was touched");
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (_dir, app, _codec) = gateway();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["checks"]["store"], "ok");

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/health/live")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
