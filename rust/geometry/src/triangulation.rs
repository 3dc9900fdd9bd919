// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Anchor boundaries are convex rectangles, so a fan from vertex 0 is enough.
//! Winding is normalized first so every fan faces along the anchor normal.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Area below which a polygon is considered collapsed
const MIN_AREA: f64 = 1e-12;

/// Signed area of a 2D polygon (shoelace); positive when counter-clockwise
#[inline]
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        twice_area += p0.x * p1.y - p1.x * p0.y;
    }
    twice_area * 0.5
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

/// Fan-triangulate a polygon with counter-clockwise output winding.
///
/// Clockwise input is reversed before fanning. A polygon that encloses no
/// area keeps its input order, so its vertices still reach the mesh.
/// Returned indices point into the input slice.
pub fn triangulate_fan(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    let fan = fan_triangulate(n);
    if signed_area(points) > -MIN_AREA {
        Ok(fan)
    } else {
        Ok(fan.into_iter().map(|i| n - 1 - i).collect())
    }
}

/// Project 3D points onto the plane spanned by `u_axis`/`v_axis` at `origin`
#[inline]
pub fn project_to_2d_with_basis(
    points_3d: &[Point3<f64>],
    u_axis: &Vector3<f64>,
    v_axis: &Vector3<f64>,
    origin: &Point3<f64>,
) -> Vec<Point2<f64>> {
    points_3d
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(u_axis), v.dot(v_axis))
        })
        .collect()
}
