// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RoomSnap Server - room snapshot and anchor alignment service.
//!
//! This server provides a REST API around the snapshot pipeline. It supports:
//!
//! - Building snapshots from detected anchors and storing them on disk
//! - Reconstructing stored snapshots into local frames and meshes
//! - Aligning a stored snapshot with the live anchors of a room
//! - Forwarding live anchors to an optional persistence service
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/snapshots` - Build and store a snapshot
//! - `GET /api/v1/snapshots/:key` - Retrieve a stored snapshot
//! - `POST /api/v1/snapshots/:key/reconstruct` - Reconstruct a stored snapshot
//! - `PUT /api/v1/rooms/:room/live` - Report live anchors
//! - `POST /api/v1/rooms/:room/align` - Align a snapshot with a live room
//! - `POST /api/v1/rooms/:room/persist` - Persist live anchors

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::{DiskCache, HttpPersistence, RoomRegistry};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DiskCache>,
    pub rooms: Arc<RoomRegistry>,
    pub persistence: Option<Arc<HttpPersistence>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,roomsnap_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        cache_dir = %config.cache_dir,
        max_body_size_mb = config.max_body_size_mb,
        align_wait_secs = config.align_wait_secs,
        persistence = config.persist_url.is_some(),
        "Starting RoomSnap Server"
    );

    let state = AppState {
        cache: Arc::new(DiskCache::new(&config.cache_dir).await),
        rooms: Arc::new(RoomRegistry::new()),
        persistence: config
            .persist_url
            .as_deref()
            .map(|url| Arc::new(HttpPersistence::new(url))),
        config: Arc::new(config.clone()),
    };
    if let Some(persistence) = &state.persistence {
        tracing::info!(url = %persistence.url(), "Anchor persistence enabled");
    }

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Build the router with all routes and middleware.
fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Snapshot endpoints
        .route("/api/v1/snapshots", post(routes::snapshots::create_snapshot))
        .route("/api/v1/snapshots/:key", get(routes::snapshots::get_snapshot))
        .route(
            "/api/v1/snapshots/:key/reconstruct",
            post(routes::snapshots::reconstruct_snapshot),
        )
        // Live room endpoints
        .route("/api/v1/rooms/:room/live", put(routes::rooms::put_live))
        .route("/api/v1/rooms/:room/align", post(routes::rooms::align))
        .route("/api/v1/rooms/:room/persist", post(routes::rooms::persist))
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_body_size_mb * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_any() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_state(persist_url: Option<&str>) -> AppState {
        let cache_dir = std::env::temp_dir()
            .join(format!("roomsnap-server-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned();
        let config = Config {
            port: 0,
            cache_dir: cache_dir.clone(),
            max_body_size_mb: 16,
            request_timeout_secs: 60,
            align_wait_secs: 1,
            room_poll_interval_ms: 10,
            persist_url: persist_url.map(str::to_string),
            persist_timeout_ms: 100,
            cors_origins: vec!["*".into()],
        };
        AppState {
            cache: Arc::new(DiskCache::new(&cache_dir).await),
            rooms: Arc::new(RoomRegistry::new()),
            persistence: config
                .persist_url
                .as_deref()
                .map(|url| Arc::new(HttpPersistence::new(url))),
            config: Arc::new(config),
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn table_capture() -> Value {
        json!({
            "sceneId": "living-room",
            "anchors": [
                {
                    "id": "table-1",
                    "label": "TABLE",
                    "position": {"x": 0.0, "y": 0.0, "z": 0.0},
                    "geometry": {"kind": "box",
                                 "center": {"x": 0.0, "y": 0.0, "z": 0.0},
                                 "halfExtents": {"x": 0.5, "y": 0.02, "z": 0.4}}
                },
                {
                    "id": "floor-1",
                    "label": "FLOOR",
                    "position": {"x": 0.0, "y": -0.7, "z": 0.0}
                }
            ]
        })
    }

    #[tokio::test]
    async fn health_reports_service() {
        let app = app(test_state(None).await);
        let (status, body) = send(&app, "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "roomsnap-server");
    }

    #[tokio::test]
    async fn capture_store_and_reconstruct() {
        let app = app(test_state(None).await);

        let (status, created) = send(&app, "POST", "/api/v1/snapshots", Some(table_capture())).await;
        assert_eq!(status, StatusCode::CREATED);
        let key = created["cacheKey"].as_str().unwrap().to_string();
        assert_eq!(key.len(), 64);
        assert_eq!(created["snapshot"]["sceneId"], "living-room");
        assert_eq!(created["snapshot"]["tables"][0]["boundarySource"], "box");

        let (status, stored) = send(&app, "GET", &format!("/api/v1/snapshots/{key}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["floorReferenceY"], created["snapshot"]["floorReferenceY"]);

        let (status, rebuilt) = send(
            &app,
            "POST",
            &format!("/api/v1/snapshots/{key}/reconstruct"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rebuilt["stats"]["totalAnchors"], 2);
        assert_eq!(rebuilt["stats"]["totalTriangles"], 4);
    }

    #[tokio::test]
    async fn unknown_snapshot_is_404() {
        let app = app(test_state(None).await);
        let (status, body) = send(&app, "GET", "/api/v1/snapshots/deadbeef", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn align_with_reported_room() {
        let app = app(test_state(None).await);
        let (_, created) = send(&app, "POST", "/api/v1/snapshots", Some(table_capture())).await;
        let key = created["cacheKey"].as_str().unwrap().to_string();

        let live = json!({
            "anchors": [
                {"id": "TABLE-1", "label": "TABLE", "position": {"x": 1.0, "y": 0.0, "z": 0.0}}
            ]
        });
        let (status, reported) = send(&app, "PUT", "/api/v1/rooms/lab/live", Some(live)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reported["anchors"], 1);

        let (status, aligned) = send(
            &app,
            "POST",
            "/api/v1/rooms/lab/align",
            Some(json!({"snapshotKey": key, "priority": ["WALL_FACE", "TABLE"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(aligned["state"], "aligned");
        assert_eq!(aligned["anchorId"], "table-1");
        let tx = aligned["transform"]["translation"]["x"].as_f64().unwrap();
        approx::assert_relative_eq!(tx, 1.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn align_without_shared_id_fails() {
        let app = app(test_state(None).await);
        let (_, created) = send(&app, "POST", "/api/v1/snapshots", Some(table_capture())).await;
        let key = created["cacheKey"].as_str().unwrap().to_string();

        let live = json!({
            "anchors": [{"id": "chair", "label": "OTHER", "position": {"x": 0.0, "y": 0.0, "z": 0.0}}]
        });
        send(&app, "PUT", "/api/v1/rooms/lab/live", Some(live)).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/rooms/lab/align",
            Some(json!({"snapshotKey": key})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "failed");
        assert!(body.get("transform").is_none());
    }

    #[tokio::test]
    async fn align_skips_when_room_never_reported() {
        let app = app(test_state(None).await);
        let (_, created) = send(&app, "POST", "/api/v1/snapshots", Some(table_capture())).await;
        let key = created["cacheKey"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/rooms/empty/align",
            Some(json!({"snapshotKey": key})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "skipped");
    }

    #[tokio::test]
    async fn persist_without_service_is_503() {
        let app = app(test_state(None).await);
        let (status, body) = send(&app, "POST", "/api/v1/rooms/lab/persist", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "PERSISTENCE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn persist_unknown_room_is_404() {
        let app = app(test_state(Some("http://127.0.0.1:9/anchors")).await);
        let (status, body) = send(&app, "POST", "/api/v1/rooms/nowhere/persist", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ROOM_NOT_FOUND");
    }
}
