// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World poses reported by the tracking subsystem
//!
//! The world is Y-up. A pose's right/up/forward axes are its rotation applied
//! to the global X/Y/Z axes.

use nalgebra::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};
use roomsnap_core::{QuatJson, Vec3Json};

/// Global up axis
pub const GLOBAL_UP: Vector3<f64> = Vector3::new(0.0, 1.0, 0.0);
/// Global right axis
pub const GLOBAL_RIGHT: Vector3<f64> = Vector3::new(1.0, 0.0, 0.0);
/// Global forward axis
pub const GLOBAL_FORWARD: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// World position plus unit orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
}

impl Pose {
    #[inline]
    pub fn new(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Pose at the origin with identity rotation
    #[inline]
    pub fn identity() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }

    /// Pose at a position with identity rotation
    #[inline]
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    #[inline]
    pub fn right(&self) -> Vector3<f64> {
        self.rotation * GLOBAL_RIGHT
    }

    #[inline]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * GLOBAL_UP
    }

    #[inline]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * GLOBAL_FORWARD
    }

    /// Local-to-world point transform
    #[inline]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// World-to-local point transform
    #[inline]
    pub fn inverse_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse_transform_vector(&(world - self.position)))
    }

    #[inline]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.rotation)
    }

    /// Build from wire types.
    ///
    /// The quaternion is renormalized; a zero quaternion becomes identity.
    pub fn from_json(position: &Vec3Json, rotation: &QuatJson) -> Self {
        let q = Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z);
        let rotation = UnitQuaternion::try_new(q, 1e-12).unwrap_or_else(UnitQuaternion::identity);
        Self::new(point_from_json(position), rotation)
    }

    pub fn position_json(&self) -> Vec3Json {
        point_to_json(&self.position)
    }

    pub fn rotation_json(&self) -> QuatJson {
        let q = self.rotation.quaternion();
        QuatJson::new(q.i, q.j, q.k, q.w)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[inline]
pub fn point_from_json(v: &Vec3Json) -> Point3<f64> {
    Point3::new(v.x, v.y, v.z)
}

#[inline]
pub fn vector_from_json(v: &Vec3Json) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}

#[inline]
pub fn point_to_json(p: &Point3<f64>) -> Vec3Json {
    Vec3Json::new(p.x, p.y, p.z)
}

#[inline]
pub fn vector_to_json(v: &Vector3<f64>) -> Vec3Json {
    Vec3Json::new(v.x, v.y, v.z)
}
