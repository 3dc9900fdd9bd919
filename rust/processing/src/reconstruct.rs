// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot reconstruction.
//!
//! Turns a persisted snapshot back into per-anchor local frames and planar
//! meshes. Each anchor's local frame is its recorded position with the
//! rotation of its stored basis; the boundary polygon is expressed in that
//! frame and fan-triangulated. Nothing beyond the recorded boundary is
//! invented: anchors without a usable polygon keep a pose-only entry.

use roomsnap_core::{AnchorId, AnchorLabel, AnchorRecord, BoundarySource, SnapshotDocument};
use roomsnap_geometry::pose::{point_from_json, vector_from_json};
use roomsnap_geometry::{compute_basis, triangulate_fan, Basis, Mesh, Point2, Point3, Pose, Vector3};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// One anchor rebuilt from a snapshot
#[derive(Debug, Clone)]
pub struct ReconstructedAnchor {
    pub id: AnchorId,
    pub name: String,
    pub label: AnchorLabel,
    /// Recorded tracking pose
    pub pose: Pose,
    /// Recorded position with the stored basis rotation
    pub local_pose: Pose,
    /// Planar mesh in `local_pose` space, `None` below 3 boundary points
    pub mesh: Option<Mesh>,
    pub boundary_source: BoundarySource,
}

impl ReconstructedAnchor {
    /// Mesh vertices mapped back into world space
    pub fn world_vertices(&self) -> Vec<Point3<f64>> {
        match &self.mesh {
            Some(mesh) => mesh
                .vertices()
                .map(|v| self.local_pose.transform_point(&v))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Reconstructed anchors with an id lookup
#[derive(Debug, Clone, Default)]
pub struct ReconstructedScene {
    scene_id: String,
    anchors: Vec<ReconstructedAnchor>,
    by_id: FxHashMap<AnchorId, usize>,
}

impl ReconstructedScene {
    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    /// Anchors in snapshot order
    pub fn anchors(&self) -> &[ReconstructedAnchor] {
        &self.anchors
    }

    /// Look up an anchor by id; the id is normalized first
    pub fn get(&self, id: &AnchorId) -> Option<&ReconstructedAnchor> {
        self.by_id.get(id).map(|&i| &self.anchors[i])
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Number of anchors that carry a mesh
    pub fn mesh_count(&self) -> usize {
        self.anchors.iter().filter(|a| a.mesh.is_some()).count()
    }
}

/// Parse and reconstruct a snapshot from JSON text
pub fn reconstruct_json(json: &str) -> Result<ReconstructedScene> {
    let document = SnapshotDocument::from_json(json)?;
    reconstruct(&document)
}

/// Reconstruct a parsed snapshot.
///
/// Fails on non-finite numbers, unsupported versions and duplicate
/// non-empty ids; no partial scene is returned.
pub fn reconstruct(document: &SnapshotDocument) -> Result<ReconstructedScene> {
    document.validate()?;

    let mut anchors = Vec::with_capacity(document.anchor_count());
    let mut by_id: FxHashMap<AnchorId, usize> = FxHashMap::default();

    for record in document.anchors() {
        if !record.id.is_empty() {
            if by_id.contains_key(&record.id) {
                return Err(Error::DuplicateAnchorId(record.id.clone()));
            }
            by_id.insert(record.id.clone(), anchors.len());
        }
        anchors.push(reconstruct_anchor(record));
    }

    let scene = ReconstructedScene {
        scene_id: document.scene_id.clone(),
        anchors,
        by_id,
    };

    tracing::info!(
        scene_id = %scene.scene_id,
        anchors = scene.len(),
        meshes = scene.mesh_count(),
        "Snapshot reconstructed"
    );

    Ok(scene)
}

fn reconstruct_anchor(record: &AnchorRecord) -> ReconstructedAnchor {
    let pose = Pose::from_json(&record.position, &record.rotation);
    let basis = Basis::from_stored(
        vector_from_json(&record.normal),
        vector_from_json(&record.tangent),
    )
    .unwrap_or_else(|| {
        tracing::warn!(anchor = %record.id, "Stored basis degenerate, recomputing from pose");
        compute_basis(record.label, &pose)
    });
    let local_pose = Pose::new(pose.position, basis.rotation());

    ReconstructedAnchor {
        id: record.id.clone(),
        name: record.name.clone(),
        label: record.label,
        pose,
        local_pose,
        mesh: boundary_mesh(record, &local_pose),
        boundary_source: record.boundary_source,
    }
}

/// Planar mesh of the recorded boundary in local space
fn boundary_mesh(record: &AnchorRecord, local_pose: &Pose) -> Option<Mesh> {
    if record.boundary_world.len() < 3 {
        return None;
    }

    let local: Vec<Point3<f64>> = record
        .boundary_world
        .iter()
        .map(|p| local_pose.inverse_transform_point(&point_from_json(p)))
        .collect();
    let flat: Vec<Point2<f64>> = local.iter().map(|p| Point2::new(p.x, p.y)).collect();

    let indices = match triangulate_fan(&flat) {
        Ok(indices) => indices,
        Err(e) => {
            tracing::debug!(anchor = %record.id, error = %e, "Boundary not triangulated");
            return None;
        }
    };

    let mut mesh = Mesh::with_capacity(local.len(), indices.len());
    for p in &local {
        mesh.add_vertex(*p, Vector3::z());
    }
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
    }
    Some(mesh)
}
