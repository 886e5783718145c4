//! Integration tests for the maintenance routes.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use chrono::{Duration, Utc};
use tower::ServiceExt;

use pwyll_server::{Server, ServerConfig, SweepResponse};
use pwyll_session::{MemoryRecordStore, RecordStore, SessionRecord};

async fn seeded_store(expired: usize, live: usize) -> Arc<MemoryRecordStore> {
    let store = Arc::new(MemoryRecordStore::new());
    let now = Utc::now();

    for i in 0..expired {
        store
            .put(
                "Session",
                &format!("dead-{i}"),
                SessionRecord {
                    created_at: now - Duration::hours(2),
                    expires_at: Some(now - Duration::hours(1)),
                    payload: b"{}".to_vec(),
                },
            )
            .await
            .unwrap();
    }
    for i in 0..live {
        store
            .put(
                "Session",
                &format!("live-{i}"),
                SessionRecord {
                    created_at: now,
                    expires_at: Some(now + Duration::hours(1)),
                    payload: b"{}".to_vec(),
                },
            )
            .await
            .unwrap();
    }
    store
}

fn sweep_request(token: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method("POST")
        .uri("/internal/maintenance/expired-sessions");
    let builder = match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    };
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn sweep_requires_bearer_token() {
    let store = seeded_store(1, 0).await;
    let server = Server::new(store.clone(), ServerConfig::new(Some("secret".to_string())));

    let response = server.router().oneshot(sweep_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server
        .router()
        .oneshot(sweep_request(Some("wrong")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Nothing was deleted by the rejected calls.
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn sweep_removes_expired_and_reports_count() {
    let store = seeded_store(3, 2).await;
    let server = Server::new(store.clone(), ServerConfig::new(Some("secret".to_string())));

    let response = server
        .router()
        .oneshot(sweep_request(Some("secret")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let sweep: SweepResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(sweep.removed, 3);
    assert_eq!(store.len(), 2);

    // A second run finds nothing; overlapping or repeated sweeps are safe.
    let response = server
        .router()
        .oneshot(sweep_request(Some("secret")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let sweep: SweepResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(sweep.removed, 0);
}

#[tokio::test]
async fn sweep_without_configured_token_is_open() {
    let store = seeded_store(1, 0).await;
    let server = Server::new(store.clone(), ServerConfig::new(None));

    let response = server.router().oneshot(sweep_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.len(), 0);
}
