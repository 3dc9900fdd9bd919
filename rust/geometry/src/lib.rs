// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RoomSnap Geometry
//!
//! Anchor frames, boundary rectangles, fan triangulation and rigid alignment
//! transforms, using nalgebra for all vector math.

pub mod basis;
pub mod boundary;
pub mod bounds;
pub mod error;
pub mod mesh;
pub mod pose;
pub mod transform;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, UnitQuaternion, Vector2, Vector3};

pub use basis::{compute_basis, Basis};
pub use boundary::{extract_boundary, AnchorGeometry, Boundary, FALLBACK_HALF_EXTENT};
pub use bounds::Aabb;
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use pose::Pose;
pub use transform::RigidTransform;
pub use triangulation::{project_to_2d_with_basis, signed_area, triangulate_fan};
