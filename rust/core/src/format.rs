// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted snapshot format (version 1).
//!
//! A language-agnostic JSON document with camelCase keys. Anchors are stored
//! grouped by label in `anchorsByLabel`; the per-label convenience lists
//! (`floors`, `walls`, ...) and `labelStats` are derived from those groups
//! when a document is assembled and are ignored when it is read back.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::id::AnchorId;
use crate::label::AnchorLabel;

/// Current format version written by [`SnapshotDocument::assemble`].
pub const FORMAT_VERSION: u32 = 1;

/// `{x, y, z}` triple
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3Json {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3Json {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// `{x, y, z, w}` quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatJson {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl QuatJson {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Default for QuatJson {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// Which geometric source produced an anchor's boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundarySource {
    /// Oriented bounding box reported by the tracker
    Box,
    /// Projected axis-aligned bounds of the anchor's mesh
    Mesh,
    /// Fixed small square; low confidence
    Fallback,
}

fn plane_shape() -> String {
    "plane".to_string()
}

/// One anchor as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRecord {
    pub name: String,
    pub label: AnchorLabel,
    pub position: Vec3Json,
    pub rotation: QuatJson,
    pub normal: Vec3Json,
    pub tangent: Vec3Json,
    pub bitangent: Vec3Json,
    #[serde(default = "plane_shape")]
    pub shape: String,
    pub size: Vec3Json,
    pub height_above_floor: f64,
    #[serde(default)]
    pub boundary_world: Vec<Vec3Json>,
    pub boundary_source: BoundarySource,
    #[serde(default)]
    pub id: AnchorId,
    /// Placeholder for downstream semantic annotation; never produced here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_tag: Option<String>,
    /// Placeholder for downstream free-text description; never produced here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AnchorRecord {
    fn validate(&self) -> Result<()> {
        let non_finite = |field: &'static str| Error::NonFinite {
            anchor: self.name.clone(),
            field,
        };

        if !self.position.is_finite() {
            return Err(non_finite("position"));
        }
        if !self.rotation.is_finite() {
            return Err(non_finite("rotation"));
        }
        if !(self.normal.is_finite() && self.tangent.is_finite() && self.bitangent.is_finite()) {
            return Err(non_finite("basis"));
        }
        if !self.size.is_finite() {
            return Err(non_finite("size"));
        }
        if !self.height_above_floor.is_finite() {
            return Err(non_finite("heightAboveFloor"));
        }
        if !self.boundary_world.iter().all(Vec3Json::is_finite) {
            return Err(non_finite("boundaryWorld"));
        }
        Ok(())
    }
}

/// Anchor count for one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: AnchorLabel,
    pub count: usize,
}

/// All anchors sharing a label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelGroup {
    pub label: AnchorLabel,
    pub anchors: Vec<AnchorRecord>,
}

/// Metadata about the combined room mesh written next to the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMeshInfo {
    pub vertex_count: usize,
    pub bounds_min: Vec3Json,
    pub bounds_max: Vec3Json,
    /// Path of the mesh file relative to the snapshot document
    pub relative_path: String,
}

/// Top-level persisted snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub version: u32,
    pub scene_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    pub floor_reference_y: f64,
    #[serde(default)]
    pub label_stats: Vec<LabelCount>,
    pub anchors_by_label: Vec<LabelGroup>,
    #[serde(default)]
    pub floors: Vec<AnchorRecord>,
    #[serde(default)]
    pub ceilings: Vec<AnchorRecord>,
    #[serde(default)]
    pub walls: Vec<AnchorRecord>,
    #[serde(default)]
    pub tables: Vec<AnchorRecord>,
    #[serde(default)]
    pub door_frames: Vec<AnchorRecord>,
    #[serde(default)]
    pub window_frames: Vec<AnchorRecord>,
    #[serde(default)]
    pub other_anchors: Vec<AnchorRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_mesh: Option<SceneMeshInfo>,
}

impl SnapshotDocument {
    /// Assemble a document from label groups, deriving the label statistics
    /// and the convenience lists.
    ///
    /// Empty groups are dropped.
    pub fn assemble(
        scene_id: String,
        captured_at: OffsetDateTime,
        floor_reference_y: f64,
        groups: Vec<LabelGroup>,
        scene_mesh: Option<SceneMeshInfo>,
    ) -> Self {
        let groups: Vec<LabelGroup> = groups.into_iter().filter(|g| !g.anchors.is_empty()).collect();

        let mut doc = Self {
            version: FORMAT_VERSION,
            scene_id,
            captured_at,
            floor_reference_y,
            label_stats: Vec::with_capacity(groups.len()),
            anchors_by_label: Vec::new(),
            floors: Vec::new(),
            ceilings: Vec::new(),
            walls: Vec::new(),
            tables: Vec::new(),
            door_frames: Vec::new(),
            window_frames: Vec::new(),
            other_anchors: Vec::new(),
            scene_mesh,
        };

        for group in &groups {
            doc.label_stats.push(LabelCount {
                label: group.label,
                count: group.anchors.len(),
            });
            let list = match group.label {
                AnchorLabel::Floor => &mut doc.floors,
                AnchorLabel::Ceiling => &mut doc.ceilings,
                AnchorLabel::Wall => &mut doc.walls,
                AnchorLabel::Table => &mut doc.tables,
                AnchorLabel::DoorFrame => &mut doc.door_frames,
                AnchorLabel::WindowFrame => &mut doc.window_frames,
                _ => &mut doc.other_anchors,
            };
            list.extend(group.anchors.iter().cloned());
        }

        doc.anchors_by_label = groups;
        doc
    }

    /// Parse and validate a document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: SnapshotDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check version and numeric sanity.
    pub fn validate(&self) -> Result<()> {
        if self.version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: FORMAT_VERSION,
            });
        }
        if !self.floor_reference_y.is_finite() {
            return Err(Error::NonFinite {
                anchor: String::new(),
                field: "floorReferenceY",
            });
        }
        self.anchors().try_for_each(AnchorRecord::validate)
    }

    /// Every anchor, in group order
    pub fn anchors(&self) -> impl Iterator<Item = &AnchorRecord> {
        self.anchors_by_label.iter().flat_map(|g| g.anchors.iter())
    }

    /// Total number of anchors
    pub fn anchor_count(&self) -> usize {
        self.anchors_by_label.iter().map(|g| g.anchors.len()).sum()
    }
}
