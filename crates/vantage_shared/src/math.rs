//! Mathematical types shared between producer and consumer.
//!
//! Vectors and matrices come straight from [glam](https://docs.rs/glam);
//! this module only adds the handful of geometry records the cache stores.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub use glam::{Affine3A, Mat4, Vec2, Vec3, Vec4};

/// Axis-aligned box given by two corners.
///
/// Entity bounds arrive in entity-local space and are moved into world space
/// with [`Aabb::translated`]. Hitbox corners are transformed individually, so
/// `min` is not guaranteed to be component-wise below `max` for those; use
/// [`Aabb::normalized`] when that matters.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Degenerate box at the origin.
    pub const ZERO: Self = Self::new(Vec3::ZERO, Vec3::ZERO);

    /// Creates a new box.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Returns the box shifted by `offset`.
    #[inline]
    #[must_use]
    pub fn translated(self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Returns the box grown by `radius` on every side.
    #[inline]
    #[must_use]
    pub fn inflated(self, radius: f32) -> Self {
        Self::new(self.min - Vec3::splat(radius), self.max + Vec3::splat(radius))
    }

    /// Returns the box with its corners reordered so `min <= max` per axis.
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(self.min.min(self.max), self.min.max(self.max))
    }

    /// Returns the center of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents of the box.
    #[inline]
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min).abs() * 0.5
    }

    /// Returns the eight corners, bottom face first.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }
}

/// One drawable skeleton segment: a hitbox bone and its parent, world space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct BoneSegment {
    /// Origin of the bone itself.
    pub child: Vec3,
    /// Origin of the parent bone.
    pub parent: Vec3,
}

impl BoneSegment {
    /// Creates a new segment.
    #[must_use]
    pub const fn new(child: Vec3, parent: Vec3) -> Self {
        Self { child, parent }
    }

    /// Segment length in world units.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.child.distance(self.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_translate_and_inflate() {
        let local = Aabb::new(Vec3::new(-16.0, -16.0, 0.0), Vec3::new(16.0, 16.0, 72.0));
        let world = local.translated(Vec3::new(100.0, 0.0, 0.0)).inflated(1.0);

        assert_eq!(world.min, Vec3::new(83.0, -17.0, -1.0));
        assert_eq!(world.max, Vec3::new(117.0, 17.0, 73.0));
        assert_eq!(world.center(), Vec3::new(100.0, 0.0, 36.0));
    }

    #[test]
    fn test_aabb_normalized() {
        let flipped = Aabb::new(Vec3::new(1.0, -1.0, 5.0), Vec3::new(-1.0, 1.0, 2.0));
        let fixed = flipped.normalized();

        assert_eq!(fixed.min, Vec3::new(-1.0, -1.0, 2.0));
        assert_eq!(fixed.max, Vec3::new(1.0, 1.0, 5.0));
        assert_eq!(flipped.half_extents(), fixed.half_extents());
    }

    #[test]
    fn test_aabb_bytemuck() {
        let bytes: &[u8] = bytemuck::bytes_of(&Aabb::ZERO);
        assert_eq!(bytes.len(), 24);
    }
}
