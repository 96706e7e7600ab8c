//! Frustum extraction and box tests.
//!
//! Extracts clip planes from the view-projection matrix and tests
//! world-space bounding boxes against them.
//!
//! ```text
//!        top
//!    ┌─────────┐
//! l  │  clip   │  r      inside ⇔ every plane.distance(p) ≥ 0
//!    │  volume │
//!    └─────────┘
//!      bottom            near: w ≥ 0 (in front of the eye)
//! ```
//!
//! There is no far plane: the overlay annotates entities at any range.

use glam::{Mat4, Vec3, Vec4};
use vantage_shared::Aabb;

/// A plane in 3D space (`normal · p + d = 0`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the frustum.
    pub normal: Vec3,
    /// Signed offset from the origin.
    pub d: f32,
}

impl Plane {
    /// Creates a plane from packed `(a, b, c, d)` coefficients, normalized.
    #[must_use]
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                d: coefficients.w / len,
            }
        } else {
            Self {
                normal,
                d: coefficients.w,
            }
        }
    }

    /// Returns the signed distance from a point to the plane.
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

/// View frustum for culling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near planes.
    pub planes: [Plane; 5],
}

impl Frustum {
    /// Left plane index.
    pub const LEFT: usize = 0;
    /// Right plane index.
    pub const RIGHT: usize = 1;
    /// Bottom plane index.
    pub const BOTTOM: usize = 2;
    /// Top plane index.
    pub const TOP: usize = 3;
    /// Near plane index.
    pub const NEAR: usize = 4;

    /// Extracts frustum planes from a view-projection matrix.
    #[must_use]
    pub fn from_view_projection(m: &Mat4) -> Self {
        let (row0, row1, row3) = (m.row(0), m.row(1), m.row(3));

        let mut planes = [Plane::default(); 5];
        planes[Self::LEFT] = Plane::from_coefficients(row3 + row0);
        planes[Self::RIGHT] = Plane::from_coefficients(row3 - row0);
        planes[Self::BOTTOM] = Plane::from_coefficients(row3 + row1);
        planes[Self::TOP] = Plane::from_coefficients(row3 - row1);
        planes[Self::NEAR] = Plane::from_coefficients(row3);

        Self { planes }
    }

    /// Tests if a point lies inside the frustum.
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Tests if a world-space box intersects the frustum.
    #[must_use]
    pub fn test_aabb(&self, aabb: &Aabb) -> bool {
        let center = aabb.center();
        let half = aabb.half_extents();

        for plane in &self.planes {
            // Projection interval radius of the box onto the plane normal
            let r = half.dot(plane.normal.abs());
            if plane.distance_to_point(center) < -r {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Mat4 {
        let projection = Mat4::perspective_rh(90f32.to_radians(), 16.0 / 9.0, 1.0, 1000.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::X, Vec3::Z);
        projection * view
    }

    #[test]
    fn test_plane_normalization() {
        let plane = Plane::from_coefficients(Vec4::new(3.0, 4.0, 0.0, 10.0));

        // 3-4-5 triangle, so length is 5
        assert!((plane.normal.x - 0.6).abs() < 0.001);
        assert!((plane.normal.y - 0.8).abs() < 0.001);
        assert!((plane.d - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_box_in_front_is_visible() {
        let frustum = Frustum::from_view_projection(&camera());
        let ahead = Aabb::new(Vec3::new(100.0, -16.0, -36.0), Vec3::new(132.0, 16.0, 36.0));
        assert!(frustum.test_aabb(&ahead));
        assert!(frustum.contains_point(ahead.center()));
    }

    #[test]
    fn test_box_behind_is_culled() {
        let frustum = Frustum::from_view_projection(&camera());
        let behind = Aabb::new(Vec3::new(-132.0, -16.0, -36.0), Vec3::new(-100.0, 16.0, 36.0));
        assert!(!frustum.test_aabb(&behind));
    }

    #[test]
    fn test_box_far_to_the_side_is_culled() {
        let frustum = Frustum::from_view_projection(&camera());
        let side = Aabb::new(Vec3::new(10.0, 500.0, -4.0), Vec3::new(14.0, 504.0, 4.0));
        assert!(!frustum.test_aabb(&side));
    }

    #[test]
    fn test_box_straddling_edge_is_visible() {
        let frustum = Frustum::from_view_projection(&camera());
        // Crosses the right-hand plane at y = -x·tan(fov_x/2)
        let edge = Aabb::new(Vec3::new(50.0, -200.0, -4.0), Vec3::new(54.0, 0.0, 4.0));
        assert!(frustum.test_aabb(&edge));
    }
}
