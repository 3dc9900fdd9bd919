// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Captured anchors and their persisted records.

use roomsnap_core::{AnchorId, AnchorLabel, AnchorRecord, Vec3Json};
use roomsnap_geometry::pose::{point_to_json, vector_to_json};
use roomsnap_geometry::{AnchorGeometry, Basis, Boundary, Pose};

/// An anchor as reported by the tracking subsystem at capture time
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedAnchor {
    pub id: AnchorId,
    /// Display name; derived from the label when absent
    pub name: Option<String>,
    pub label: AnchorLabel,
    pub pose: Pose,
    pub geometry: AnchorGeometry,
}

impl DetectedAnchor {
    pub fn new(id: impl Into<AnchorId>, label: AnchorLabel, pose: Pose) -> Self {
        Self {
            id: id.into(),
            name: None,
            label,
            pose,
            geometry: AnchorGeometry::None,
        }
    }

    pub fn with_geometry(mut self, geometry: AnchorGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A fully derived anchor inside a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub id: AnchorId,
    pub name: String,
    pub label: AnchorLabel,
    pub pose: Pose,
    pub basis: Basis,
    pub boundary: Boundary,
    pub height_above_floor: f64,
}

impl Anchor {
    /// Lowest world Y over the boundary
    pub fn lower_y(&self) -> f64 {
        self.boundary
            .points
            .iter()
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn to_record(&self) -> AnchorRecord {
        AnchorRecord {
            name: self.name.clone(),
            label: self.label,
            position: self.pose.position_json(),
            rotation: self.pose.rotation_json(),
            normal: vector_to_json(&self.basis.normal),
            tangent: vector_to_json(&self.basis.tangent),
            bitangent: vector_to_json(&self.basis.bitangent),
            shape: "plane".to_string(),
            size: Vec3Json::new(self.boundary.size.x, self.boundary.size.y, 0.0),
            height_above_floor: self.height_above_floor,
            boundary_world: self.boundary.points.iter().map(point_to_json).collect(),
            boundary_source: self.boundary.source,
            id: self.id.clone(),
            semantic_tag: None,
            description: None,
        }
    }
}
