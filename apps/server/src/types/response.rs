// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use super::MeshData;
use roomsnap_core::{AnchorLabel, BoundarySource, QuatJson, SnapshotDocument, Vec3Json};
use roomsnap_geometry::pose::vector_to_json;
use roomsnap_geometry::RigidTransform;
use roomsnap_processing::{AlignmentFailure, ReconstructedAnchor, RegistrationState};
use serde::Serialize;

/// Stored snapshot with its cache key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    /// Cache key for this snapshot (SHA256 of its JSON).
    pub cache_key: String,
    pub snapshot: SnapshotDocument,
}

/// One reconstructed anchor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructedAnchorData {
    pub id: String,
    pub name: String,
    pub label: AnchorLabel,
    /// Local frame origin in world space.
    pub position: Vec3Json,
    /// Local frame rotation.
    pub rotation: QuatJson,
    pub boundary_source: BoundarySource,
    pub mesh: Option<MeshData>,
}

impl From<&ReconstructedAnchor> for ReconstructedAnchorData {
    fn from(anchor: &ReconstructedAnchor) -> Self {
        Self {
            id: anchor.id.to_string(),
            name: anchor.name.clone(),
            label: anchor.label,
            position: anchor.local_pose.position_json(),
            rotation: anchor.local_pose.rotation_json(),
            boundary_source: anchor.boundary_source,
            mesh: anchor.mesh.as_ref().map(MeshData::from),
        }
    }
}

/// Reconstruction statistics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructStats {
    pub total_anchors: usize,
    pub total_meshes: usize,
    pub total_vertices: usize,
    pub total_triangles: usize,
}

/// Reconstructed snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructResponse {
    pub scene_id: String,
    pub anchors: Vec<ReconstructedAnchorData>,
    pub stats: ReconstructStats,
}

/// Rigid transform from snapshot to live coordinates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformData {
    pub rotation: QuatJson,
    pub translation: Vec3Json,
    /// Column-major homogeneous matrix.
    pub matrix: [f64; 16],
}

impl From<&RigidTransform> for TransformData {
    fn from(t: &RigidTransform) -> Self {
        let q = t.rotation.quaternion();
        let mut matrix = [0.0; 16];
        matrix.copy_from_slice(t.to_matrix().as_slice());
        Self {
            rotation: QuatJson::new(q.i, q.j, q.k, q.w),
            translation: vector_to_json(&t.translation),
            matrix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignState {
    Aligned,
    Failed,
    Skipped,
}

/// Outcome of an alignment request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignResponse {
    pub state: AlignState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<AnchorLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_tried: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AlignResponse {
    /// Alignment skipped because the live room never showed up
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            state: AlignState::Skipped,
            transform: None,
            anchor_id: None,
            label: None,
            candidates_tried: None,
            reason: Some(reason.into()),
        }
    }

    fn failed(failure: &AlignmentFailure) -> Self {
        let tried = match failure {
            AlignmentFailure::NoLiveMatch { tried } => Some(*tried),
            AlignmentFailure::NoIdentifiedAnchors => Some(0),
        };
        Self {
            state: AlignState::Failed,
            transform: None,
            anchor_id: None,
            label: None,
            candidates_tried: tried,
            reason: Some(failure.to_string()),
        }
    }
}

impl From<&RegistrationState> for AlignResponse {
    fn from(state: &RegistrationState) -> Self {
        match state {
            RegistrationState::Aligned(alignment) => Self {
                state: AlignState::Aligned,
                transform: Some(TransformData::from(&alignment.transform)),
                anchor_id: Some(alignment.anchor_id.to_string()),
                label: Some(alignment.label),
                candidates_tried: Some(alignment.candidates_tried),
                reason: None,
            },
            RegistrationState::Failed(failure) => Self::failed(failure),
            // align() always ends in a terminal state
            RegistrationState::Idle | RegistrationState::Searching => {
                Self::skipped("registration did not run")
            }
        }
    }
}

/// Result of replacing a live room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRoomResponse {
    pub room: String,
    pub anchors: usize,
    pub replaced: bool,
}
