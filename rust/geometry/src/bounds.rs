// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounds in f64 precision

use nalgebra::Point3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point3<f64>,
    /// Maximum corner
    pub max: Point3<f64>,
    /// Number of points folded in
    pub sample_count: usize,
}

impl Aabb {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
            sample_count: 0,
        }
    }

    /// Bounds of a point set
    pub fn from_points<I: IntoIterator<Item = Point3<f64>>>(points: I) -> Self {
        let mut bounds = Self::new();
        for p in points {
            bounds.expand(&p);
        }
        bounds
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
        self.sample_count += 1;
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new()
    }
}
