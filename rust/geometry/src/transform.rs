// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid transforms between recorded and live coordinate frames

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};

use crate::pose::Pose;

/// Rotation followed by translation, mapping snapshot-frame coordinates into
/// live-frame coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Transform taking `snapshot` onto `live`: `live ∘ snapshot⁻¹`.
    ///
    /// rotation = R_live · R_snap⁻¹, translation = p_live − rotation · p_snap
    pub fn between(snapshot: &Pose, live: &Pose) -> Self {
        let rotation = live.rotation * snapshot.rotation.inverse();
        let translation = live.position.coords - rotation * snapshot.position.coords;
        Self {
            rotation,
            translation,
        }
    }

    #[inline]
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * p.coords + self.translation)
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }

    /// Homogeneous 4x4 matrix (column-major, for renderers)
    pub fn to_matrix(&self) -> Matrix4<f64> {
        self.to_isometry().to_homogeneous()
    }

    /// Rotation angle in radians
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn pure_translation() {
        let snapshot = Pose::identity();
        let live = Pose::at(Point3::new(1.0, 0.0, 0.0));
        let t = RigidTransform::between(&snapshot, &live);

        assert_relative_eq!(t.transform_point(&Point3::origin()), Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(t.angle(), 0.0);
    }

    #[test]
    fn maps_snapshot_pose_onto_live_pose() {
        let snapshot = Pose::new(
            Point3::new(2.0, 0.0, 1.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3),
        );
        let live = Pose::new(
            Point3::new(-1.0, 0.1, 4.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.2),
        );
        let t = RigidTransform::between(&snapshot, &live);

        assert_relative_eq!(t.transform_point(&snapshot.position), live.position, epsilon = 1e-12);
        assert_relative_eq!(t.rotation * snapshot.rotation, live.rotation, epsilon = 1e-12);
        assert_relative_eq!(t.angle(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn rotation_about_anchor() {
        // Anchor stays in place but turned a quarter: points around it swing
        let snapshot = Pose::at(Point3::new(1.0, 0.0, 0.0));
        let live = Pose::new(
            Point3::new(1.0, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        );
        let t = RigidTransform::between(&snapshot, &live);

        assert_relative_eq!(
            t.transform_point(&Point3::new(1.0, 0.0, 1.0)),
            Point3::new(2.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn isometry_agrees_with_point_transform() {
        let t = RigidTransform {
            rotation: UnitQuaternion::from_euler_angles(0.2, 0.4, -0.1),
            translation: Vector3::new(3.0, -2.0, 0.5),
        };
        let p = Point3::new(0.3, 0.7, -1.1);
        assert_relative_eq!(t.to_isometry() * p, t.transform_point(&p), epsilon = 1e-12);
    }

    #[test]
    fn matrix_carries_translation() {
        let t = RigidTransform {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::new(5.0, 10.0, 15.0),
        };
        let m = t.to_matrix();
        assert_relative_eq!(m[(0, 3)], 5.0);
        assert_relative_eq!(m[(1, 3)], 10.0);
        assert_relative_eq!(m[(2, 3)], 15.0);
    }
}
