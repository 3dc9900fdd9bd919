// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot building.
//!
//! Runs frame derivation and boundary extraction for every detected anchor,
//! computes the floor reference and groups the result by label. The output
//! is immutable; a new capture produces a new snapshot.

use roomsnap_core::{
    AnchorLabel, BoundarySource, LabelGroup, Result as FormatResult, SceneMeshInfo,
    SnapshotDocument,
};
use roomsnap_geometry::pose::point_to_json;
use roomsnap_geometry::{compute_basis, extract_boundary, Aabb, Point3};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::anchor::{Anchor, DetectedAnchor};

/// Combined room mesh captured alongside the anchors.
///
/// Only its metadata ends up in the snapshot; writing the mesh file itself
/// is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct SceneMeshInput {
    pub vertices: Vec<Point3<f64>>,
    pub relative_path: String,
}

/// Overrides for snapshot identity, mostly for reproducible tests
#[derive(Debug, Clone, Default)]
pub struct SnapshotOptions {
    pub scene_id: Option<String>,
    pub captured_at: Option<OffsetDateTime>,
}

/// Anchors sharing a label, in capture order
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorGroup {
    pub label: AnchorLabel,
    pub anchors: Vec<Anchor>,
}

/// Immutable capture of a room
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    scene_id: String,
    captured_at: OffsetDateTime,
    floor_reference_y: f64,
    groups: Vec<AnchorGroup>,
    scene_mesh: Option<SceneMeshInfo>,
}

impl SceneSnapshot {
    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    pub fn captured_at(&self) -> OffsetDateTime {
        self.captured_at
    }

    pub fn floor_reference_y(&self) -> f64 {
        self.floor_reference_y
    }

    /// Non-empty label groups in label declaration order
    pub fn anchors_by_label(&self) -> &[AnchorGroup] {
        &self.groups
    }

    /// Anchors carrying `label`; empty when there are none
    pub fn anchors_with_label(&self, label: AnchorLabel) -> &[Anchor] {
        self.groups
            .iter()
            .find(|g| g.label == label)
            .map(|g| g.anchors.as_slice())
            .unwrap_or(&[])
    }

    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> {
        self.groups.iter().flat_map(|g| g.anchors.iter())
    }

    pub fn anchor_count(&self) -> usize {
        self.groups.iter().map(|g| g.anchors.len()).sum()
    }

    /// Per-label anchor counts
    pub fn label_counts(&self) -> Vec<(AnchorLabel, usize)> {
        self.groups
            .iter()
            .map(|g| (g.label, g.anchors.len()))
            .collect()
    }

    pub fn scene_mesh(&self) -> Option<&SceneMeshInfo> {
        self.scene_mesh.as_ref()
    }

    /// Persisted form of the snapshot
    pub fn to_document(&self) -> SnapshotDocument {
        let groups = self
            .groups
            .iter()
            .map(|g| LabelGroup {
                label: g.label,
                anchors: g.anchors.iter().map(Anchor::to_record).collect(),
            })
            .collect();

        SnapshotDocument::assemble(
            self.scene_id.clone(),
            self.captured_at,
            self.floor_reference_y,
            groups,
            self.scene_mesh.clone(),
        )
    }

    pub fn to_json(&self) -> FormatResult<String> {
        self.to_document().to_json()
    }
}

/// Build a snapshot from the anchors of one room
pub fn build_snapshot(
    detected: &[DetectedAnchor],
    scene_mesh: Option<&SceneMeshInput>,
    options: &SnapshotOptions,
) -> SceneSnapshot {
    let mut name_counters = [0usize; AnchorLabel::ALL.len()];
    let mut anchors: Vec<Anchor> = Vec::with_capacity(detected.len());

    for d in detected {
        let basis = compute_basis(d.label, &d.pose);
        let boundary = extract_boundary(d.label, &d.pose, &basis, &d.geometry);

        if boundary.source == BoundarySource::Fallback {
            tracing::debug!(
                anchor = %d.id,
                label = %d.label,
                "No bounding geometry, using fallback square"
            );
        }

        let name = match &d.name {
            Some(name) => name.clone(),
            None => {
                let counter = &mut name_counters[label_index(d.label)];
                let name = format!("{}_{}", d.label, counter);
                *counter += 1;
                name
            }
        };

        anchors.push(Anchor {
            id: d.id.clone(),
            name,
            label: d.label,
            pose: d.pose,
            basis,
            boundary,
            height_above_floor: 0.0,
        });
    }

    let floor_reference_y = floor_reference(&anchors);
    for anchor in &mut anchors {
        anchor.height_above_floor = anchor.pose.position.y - floor_reference_y;
    }

    let groups: Vec<AnchorGroup> = AnchorLabel::ALL
        .iter()
        .map(|&label| AnchorGroup {
            label,
            anchors: anchors.iter().filter(|a| a.label == label).cloned().collect(),
        })
        .filter(|g| !g.anchors.is_empty())
        .collect();

    let snapshot = SceneSnapshot {
        scene_id: options
            .scene_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        captured_at: options
            .captured_at
            .unwrap_or_else(OffsetDateTime::now_utc),
        floor_reference_y,
        groups,
        scene_mesh: scene_mesh.map(scene_mesh_info),
    };

    tracing::info!(
        scene_id = %snapshot.scene_id,
        anchors = snapshot.anchor_count(),
        labels = snapshot.groups.len(),
        floor_reference_y = snapshot.floor_reference_y,
        "Snapshot built"
    );

    snapshot
}

/// Mean lower Y of all floor anchors, 0 without floors
fn floor_reference(anchors: &[Anchor]) -> f64 {
    let floors: Vec<f64> = anchors
        .iter()
        .filter(|a| a.label == AnchorLabel::Floor)
        .map(Anchor::lower_y)
        .collect();

    if floors.is_empty() {
        tracing::debug!("No floor anchors, floor reference defaults to 0");
        return 0.0;
    }
    floors.iter().sum::<f64>() / floors.len() as f64
}

fn scene_mesh_info(input: &SceneMeshInput) -> SceneMeshInfo {
    let bounds = Aabb::from_points(input.vertices.iter().copied());
    let (min, max) = if bounds.is_valid() {
        (bounds.min, bounds.max)
    } else {
        (Point3::origin(), Point3::origin())
    };
    SceneMeshInfo {
        vertex_count: input.vertices.len(),
        bounds_min: point_to_json(&min),
        bounds_max: point_to_json(&max),
        relative_path: input.relative_path.clone(),
    }
}

#[inline]
fn label_index(label: AnchorLabel) -> usize {
    AnchorLabel::ALL
        .iter()
        .position(|&l| l == label)
        .unwrap_or(AnchorLabel::ALL.len() - 1)
}
