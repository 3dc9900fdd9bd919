// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live room, alignment and persistence endpoints.

use crate::error::ApiError;
use crate::routes::snapshots::load_snapshot;
use crate::services::{persist_all, wait_until, PersistSummary, ReadinessState};
use crate::types::{AlignRequest, AlignResponse, LiveRoomRequest, LiveRoomResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use roomsnap_processing::{reconstruct, RegistrationEngine, RegistrationOptions};

/// PUT /api/v1/rooms/:room/live - Report the live anchors of a room.
pub async fn put_live(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(request): Json<LiveRoomRequest>,
) -> Json<LiveRoomResponse> {
    let live = request.to_room();
    let anchors = live.len();
    let previous = state.rooms.replace(&room, live).await;

    tracing::info!(room = %room, anchors, replaced = previous.is_some(), "Live room reported");

    Json(LiveRoomResponse {
        room,
        anchors,
        replaced: previous.is_some(),
    })
}

/// POST /api/v1/rooms/:room/align - Align a stored snapshot with a live room.
///
/// Waits up to the configured time for the room to be reported; when it
/// never is, alignment is skipped rather than failed.
pub async fn align(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Json(request): Json<AlignRequest>,
) -> Result<Json<AlignResponse>, ApiError> {
    let document = load_snapshot(&state, &request.snapshot_key).await?;

    let rooms = state.rooms.clone();
    let readiness = wait_until(
        || {
            let rooms = rooms.clone();
            let room = room.clone();
            async move { rooms.is_ready(&room).await }
        },
        state.config.room_poll_interval(),
        state.config.align_wait(),
    )
    .await;

    let live = match (readiness, state.rooms.get(&room).await) {
        (ReadinessState::Ready, Some(live)) => live,
        _ => {
            tracing::warn!(
                room = %room,
                wait_secs = state.config.align_wait_secs,
                "Live room not reported in time, skipping alignment"
            );
            return Ok(Json(AlignResponse::skipped(format!(
                "live room `{}` not reported within {}s",
                room, state.config.align_wait_secs
            ))));
        }
    };

    let options = match request.priority {
        Some(label_priority) => RegistrationOptions { label_priority },
        None => RegistrationOptions::default(),
    };

    let response = tokio::task::spawn_blocking(move || -> Result<AlignResponse, ApiError> {
        let scene = reconstruct(&document)?;
        let mut engine = RegistrationEngine::new(options);
        Ok(AlignResponse::from(engine.align(&scene, &live)))
    })
    .await??;

    Ok(Json(response))
}

/// POST /api/v1/rooms/:room/persist - Save the live anchors of a room.
pub async fn persist(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<PersistSummary>, ApiError> {
    let persistence = state
        .persistence
        .as_ref()
        .ok_or(ApiError::PersistenceUnavailable)?;
    let live = state
        .rooms
        .get(&room)
        .await
        .ok_or_else(|| ApiError::RoomNotFound(room.clone()))?;

    let anchors: Vec<_> = live.iter().cloned().collect();
    let summary = persist_all(&**persistence, &anchors, state.config.persist_timeout()).await;

    Ok(Json(summary))
}
