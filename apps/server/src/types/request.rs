// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use roomsnap_core::{AnchorLabel, QuatJson, Vec3Json};
use roomsnap_geometry::pose::{point_from_json, vector_from_json};
use roomsnap_geometry::{AnchorGeometry, Pose};
use roomsnap_processing::{DetectedAnchor, LiveAnchor, LiveRoom, SceneMeshInput};
use serde::Deserialize;

/// Bounding geometry reported with a detected anchor (pose-local).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GeometryInput {
    #[serde(rename_all = "camelCase")]
    Box {
        center: Vec3Json,
        half_extents: Vec3Json,
    },
    Mesh { min: Vec3Json, max: Vec3Json },
}

impl From<&GeometryInput> for AnchorGeometry {
    fn from(input: &GeometryInput) -> Self {
        match input {
            GeometryInput::Box {
                center,
                half_extents,
            } => AnchorGeometry::OrientedBox {
                center: point_from_json(center),
                half_extents: vector_from_json(half_extents),
            },
            GeometryInput::Mesh { min, max } => AnchorGeometry::MeshBounds {
                min: point_from_json(min),
                max: point_from_json(max),
            },
        }
    }
}

/// One anchor of a capture request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedAnchorInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub label: AnchorLabel,
    pub position: Vec3Json,
    #[serde(default)]
    pub rotation: QuatJson,
    #[serde(default)]
    pub geometry: Option<GeometryInput>,
}

impl DetectedAnchorInput {
    pub fn to_detected(&self) -> DetectedAnchor {
        let mut detected = DetectedAnchor::new(
            self.id.as_str(),
            self.label,
            Pose::from_json(&self.position, &self.rotation),
        );
        detected.name = self.name.clone();
        if let Some(geometry) = &self.geometry {
            detected.geometry = geometry.into();
        }
        detected
    }
}

/// Room mesh sent with a capture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMeshRequest {
    pub vertices: Vec<Vec3Json>,
    #[serde(default)]
    pub relative_path: String,
}

impl SceneMeshRequest {
    pub fn to_input(&self) -> SceneMeshInput {
        SceneMeshInput {
            vertices: self.vertices.iter().map(point_from_json).collect(),
            relative_path: self.relative_path.clone(),
        }
    }
}

/// POST /api/v1/snapshots body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotRequest {
    pub anchors: Vec<DetectedAnchorInput>,
    #[serde(default)]
    pub scene_mesh: Option<SceneMeshRequest>,
    #[serde(default)]
    pub scene_id: Option<String>,
}

/// One live anchor as reported by a tracking client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAnchorInput {
    pub id: String,
    pub label: AnchorLabel,
    pub position: Vec3Json,
    #[serde(default)]
    pub rotation: QuatJson,
}

/// PUT /api/v1/rooms/:room/live body.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveRoomRequest {
    pub anchors: Vec<LiveAnchorInput>,
}

impl LiveRoomRequest {
    pub fn to_room(&self) -> LiveRoom {
        self.anchors
            .iter()
            .map(|a| {
                LiveAnchor::new(
                    a.id.as_str(),
                    a.label,
                    Pose::from_json(&a.position, &a.rotation),
                )
            })
            .collect()
    }
}

/// POST /api/v1/rooms/:room/align body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignRequest {
    pub snapshot_key: String,
    /// Overrides the default label priority
    #[serde(default)]
    pub priority: Option<Vec<AnchorLabel>>,
}
