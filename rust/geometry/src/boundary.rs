// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary rectangles
//!
//! Every boundary point is built as `origin + u·tangent + v·bitangent` with
//! the origin on the anchor plane, so the four corners are coplanar by
//! construction. Corners run counter-clockwise in the `(tangent, bitangent)`
//! plane: `(−u,−v) (+u,−v) (+u,+v) (−u,+v)`.

use nalgebra::{Point3, Vector2, Vector3};
use roomsnap_core::{AnchorLabel, BoundarySource};

use crate::basis::Basis;
use crate::pose::Pose;

/// Half-extent of the square emitted when no geometry is available
pub const FALLBACK_HALF_EXTENT: f64 = 0.2;

/// Approximate bounding geometry reported alongside an anchor (pose-local)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorGeometry {
    /// Oriented box: center and half-extents in the anchor's local space
    OrientedBox {
        center: Point3<f64>,
        half_extents: Vector3<f64>,
    },
    /// Axis-aligned bounds of the anchor's mesh in local space
    MeshBounds { min: Point3<f64>, max: Point3<f64> },
    None,
}

/// Coplanar rectangle approximating an anchor's extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// World-space corners, counter-clockwise around the normal
    pub points: [Point3<f64>; 4],
    /// Extent along the tangent and bitangent
    pub size: Vector2<f64>,
    pub source: BoundarySource,
}

/// Compute the boundary rectangle of an anchor
pub fn extract_boundary(
    label: AnchorLabel,
    pose: &Pose,
    basis: &Basis,
    geometry: &AnchorGeometry,
) -> Boundary {
    match geometry {
        AnchorGeometry::OrientedBox {
            center,
            half_extents,
        } => box_boundary(label, pose, basis, center, half_extents),
        AnchorGeometry::MeshBounds { min, max } => mesh_boundary(pose, basis, min, max),
        AnchorGeometry::None => fallback_boundary(pose, basis),
    }
}

fn box_boundary(
    label: AnchorLabel,
    pose: &Pose,
    basis: &Basis,
    center: &Point3<f64>,
    half_extents: &Vector3<f64>,
) -> Boundary {
    let world_center = pose.transform_point(center);
    // Box centers of volumes sit below their top face; pull onto the plane
    let offset = (world_center - pose.position).dot(&basis.normal);
    let origin = world_center - basis.normal * offset;

    let extents = half_extents.abs();
    let size = if label.is_vertical() {
        Vector2::new(extents.x * 2.0, extents.y * 2.0)
    } else {
        Vector2::new(extents.x * 2.0, extents.z * 2.0)
    };

    let (hu, hv) = (size.x * 0.5, size.y * 0.5);
    Boundary {
        points: rectangle(&origin, basis, -hu, hu, -hv, hv),
        size,
        source: BoundarySource::Box,
    }
}

fn mesh_boundary(pose: &Pose, basis: &Basis, min: &Point3<f64>, max: &Point3<f64>) -> Boundary {
    let (lo, hi) = (min.inf(max), min.sup(max));

    let mut u_min = f64::MAX;
    let mut u_max = f64::MIN;
    let mut v_min = f64::MAX;
    let mut v_max = f64::MIN;

    for corner in box_corners(&lo, &hi) {
        let d = pose.transform_point(&corner) - pose.position;
        let (u, v) = (d.dot(&basis.tangent), d.dot(&basis.bitangent));
        u_min = u_min.min(u);
        u_max = u_max.max(u);
        v_min = v_min.min(v);
        v_max = v_max.max(v);
    }

    Boundary {
        points: rectangle(&pose.position, basis, u_min, u_max, v_min, v_max),
        size: Vector2::new(u_max - u_min, v_max - v_min),
        source: BoundarySource::Mesh,
    }
}

fn fallback_boundary(pose: &Pose, basis: &Basis) -> Boundary {
    let h = FALLBACK_HALF_EXTENT;
    Boundary {
        points: rectangle(&pose.position, basis, -h, h, -h, h),
        size: Vector2::new(h * 2.0, h * 2.0),
        source: BoundarySource::Fallback,
    }
}

/// The eight corners of an axis-aligned box
pub fn box_corners(min: &Point3<f64>, max: &Point3<f64>) -> [Point3<f64>; 8] {
    [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(min.x, max.y, max.z),
        Point3::new(max.x, max.y, max.z),
    ]
}

#[inline]
fn rectangle(
    origin: &Point3<f64>,
    basis: &Basis,
    u_min: f64,
    u_max: f64,
    v_min: f64,
    v_max: f64,
) -> [Point3<f64>; 4] {
    let at = |u: f64, v: f64| origin + basis.tangent * u + basis.bitangent * v;
    [
        at(u_min, v_min),
        at(u_max, v_min),
        at(u_max, v_max),
        at(u_min, v_max),
    ]
}
