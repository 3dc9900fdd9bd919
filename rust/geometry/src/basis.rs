// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Anchor frame derivation
//!
//! Derives an orthonormal `(normal, tangent, bitangent)` frame for an anchor
//! from nothing but its label and pose. Registration recomputes this frame on
//! both sides of an alignment, so [`compute_basis`] must stay pure and
//! deterministic: same label and pose, same bits out.

use nalgebra::{Rotation3, UnitQuaternion, Vector3};
use roomsnap_core::AnchorLabel;

use crate::pose::{Pose, GLOBAL_FORWARD, GLOBAL_RIGHT, GLOBAL_UP};

/// Squared length below which a direction is treated as degenerate
pub const DEGENERATE_EPSILON_SQ: f64 = 1e-6;

/// Orthonormal anchor frame. `bitangent = normal × tangent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub normal: Vector3<f64>,
    pub tangent: Vector3<f64>,
    pub bitangent: Vector3<f64>,
}

impl Basis {
    /// Complete a frame from a unit normal and a unit tangent orthogonal to it
    #[inline]
    pub fn from_normal_tangent(normal: Vector3<f64>, tangent: Vector3<f64>) -> Self {
        Self {
            normal,
            tangent,
            bitangent: normal.cross(&tangent),
        }
    }

    /// Rebuild a frame read back from storage.
    ///
    /// The normal is renormalized and the tangent re-orthogonalized so that
    /// rounding in the stored values cannot produce an improper rotation.
    /// Returns `None` when either stored vector is degenerate.
    pub fn from_stored(normal: Vector3<f64>, tangent: Vector3<f64>) -> Option<Self> {
        if normal.norm_squared() < DEGENERATE_EPSILON_SQ {
            return None;
        }
        let normal = normal.normalize();
        let projected = tangent - normal * tangent.dot(&normal);
        if projected.norm_squared() < DEGENERATE_EPSILON_SQ {
            return None;
        }
        Some(Self::from_normal_tangent(normal, projected.normalize()))
    }

    /// Rotation of the anchor's local frame.
    ///
    /// Local X is the tangent, local Y the bitangent and local Z the normal,
    /// which is a proper rotation because `tangent × bitangent = normal`.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        let matrix = Rotation3::from_basis_unchecked(&[self.tangent, self.bitangent, self.normal]);
        UnitQuaternion::from_rotation_matrix(&matrix)
    }

    /// Check unit lengths and mutual orthogonality
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let unit = |v: &Vector3<f64>| (v.norm() - 1.0).abs() <= tolerance;
        unit(&self.normal)
            && unit(&self.tangent)
            && unit(&self.bitangent)
            && self.normal.dot(&self.tangent).abs() <= tolerance
            && self.normal.dot(&self.bitangent).abs() <= tolerance
            && self.tangent.dot(&self.bitangent).abs() <= tolerance
    }
}

/// Derive the anchor frame for a label and pose.
///
/// Vertical surfaces (walls, frames) get a horizontal normal taken from the
/// pose's forward axis. Everything else gets a normal snapped to global
/// up/down and a horizontal tangent. Degenerate seeds fall back to global
/// axes, so the result is always orthonormal.
pub fn compute_basis(label: AnchorLabel, pose: &Pose) -> Basis {
    let mut seed_normal = if label.is_vertical() {
        pose.forward()
    } else if label.faces_down() {
        -pose.up()
    } else {
        pose.up()
    };
    if seed_normal.norm_squared() < DEGENERATE_EPSILON_SQ {
        seed_normal = GLOBAL_UP;
    }

    let seed_tangent = pose.right();

    if label.is_vertical() {
        let mut flat = Vector3::new(seed_normal.x, 0.0, seed_normal.z);
        if flat.norm_squared() < DEGENERATE_EPSILON_SQ {
            flat = GLOBAL_FORWARD;
        }
        let normal = flat.normalize();
        let tangent = orthonormal_tangent(&seed_tangent, &normal);
        Basis::from_normal_tangent(normal, tangent)
    } else {
        let normal = if seed_normal.dot(&GLOBAL_UP) >= 0.0 {
            GLOBAL_UP
        } else {
            -GLOBAL_UP
        };
        let flat = Vector3::new(seed_tangent.x, 0.0, seed_tangent.z);
        let tangent = orthonormal_tangent(&flat, &normal);
        Basis::from_normal_tangent(normal, tangent)
    }
}

/// Gram–Schmidt `seed` against a unit `normal`.
///
/// When the seed collapses, whichever of global right/forward is less
/// parallel to the normal is orthonormalized instead (ties pick right).
fn orthonormal_tangent(seed: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    let projected = seed - normal * seed.dot(normal);
    if projected.norm_squared() >= DEGENERATE_EPSILON_SQ {
        return projected.normalize();
    }

    let fallback = if GLOBAL_RIGHT.dot(normal).abs() <= GLOBAL_FORWARD.dot(normal).abs() {
        GLOBAL_RIGHT
    } else {
        GLOBAL_FORWARD
    };
    // |fallback·normal| <= 1/√2 here, so the projection cannot collapse
    (fallback - normal * fallback.dot(normal)).normalize()
}
