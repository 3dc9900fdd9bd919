// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot capture, retrieval and reconstruction endpoints.

use crate::error::ApiError;
use crate::types::{
    CreateSnapshotRequest, ReconstructResponse, ReconstructStats, ReconstructedAnchorData,
    SnapshotResponse,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use roomsnap_core::SnapshotDocument;
use roomsnap_processing::{build_snapshot, reconstruct, DetectedAnchor, SnapshotOptions};

/// Load and validate a stored snapshot.
pub(crate) async fn load_snapshot(
    state: &AppState,
    key: &str,
) -> Result<SnapshotDocument, ApiError> {
    match state.cache.get::<SnapshotDocument>(key).await? {
        Some(document) => {
            document.validate()?;
            Ok(document)
        }
        None => {
            tracing::debug!(key = %key, "Snapshot MISS");
            Err(ApiError::NotFound(format!("Snapshot not found: {}", key)))
        }
    }
}

/// POST /api/v1/snapshots - Build and store a snapshot.
pub async fn create_snapshot(
    State(state): State<AppState>,
    Json(request): Json<CreateSnapshotRequest>,
) -> Result<(StatusCode, Json<SnapshotResponse>), ApiError> {
    let detected: Vec<DetectedAnchor> = request.anchors.iter().map(|a| a.to_detected()).collect();
    let scene_mesh = request.scene_mesh.as_ref().map(|m| m.to_input());
    let options = SnapshotOptions {
        scene_id: request.scene_id.clone(),
        captured_at: None,
    };

    let document = tokio::task::spawn_blocking(move || {
        build_snapshot(&detected, scene_mesh.as_ref(), &options).to_document()
    })
    .await?;

    let cache_key = state.cache.put(&document).await?;
    tracing::info!(
        cache_key = %cache_key,
        scene_id = %document.scene_id,
        anchors = document.anchor_count(),
        "Snapshot stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(SnapshotResponse {
            cache_key,
            snapshot: document,
        }),
    ))
}

/// GET /api/v1/snapshots/:key - Retrieve a stored snapshot.
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SnapshotDocument>, ApiError> {
    let document = load_snapshot(&state, &key).await?;
    tracing::info!(key = %key, "Snapshot HIT");
    Ok(Json(document))
}

/// POST /api/v1/snapshots/:key/reconstruct - Rebuild local frames and meshes.
pub async fn reconstruct_snapshot(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ReconstructResponse>, ApiError> {
    let document = load_snapshot(&state, &key).await?;

    let scene = tokio::task::spawn_blocking(move || reconstruct(&document)).await??;

    let anchors: Vec<ReconstructedAnchorData> =
        scene.anchors().iter().map(ReconstructedAnchorData::from).collect();
    let stats = ReconstructStats {
        total_anchors: anchors.len(),
        total_meshes: anchors.iter().filter(|a| a.mesh.is_some()).count(),
        total_vertices: anchors
            .iter()
            .filter_map(|a| a.mesh.as_ref())
            .map(|m| m.vertex_count())
            .sum(),
        total_triangles: anchors
            .iter()
            .filter_map(|a| a.mesh.as_ref())
            .map(|m| m.triangle_count())
            .sum(),
    };

    Ok(Json(ReconstructResponse {
        scene_id: scene.scene_id().to_string(),
        anchors,
        stats,
    }))
}
