//! Per-entity derived geometry.

use glam::{Affine3A, Vec3};
use vantage_shared::Aabb;

use crate::provider::SimEntity;

/// Geometry shared by every positioned record.
///
/// Recomputed from the live entity on every update, never interpolated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpatialSnapshot {
    /// Distance from the entity origin to the viewer origin.
    pub distance_to_viewer: f32,
    /// Entity-local bounds (zero-sized when the entity has none).
    pub bounds: Aabb,
    /// Entity-to-world transform.
    pub transform: Affine3A,
}

impl SpatialSnapshot {
    /// Captures the entity's current geometry.
    #[must_use]
    pub fn capture<E: SimEntity>(entity: &E, viewer_origin: Vec3) -> Self {
        Self {
            distance_to_viewer: entity.origin().distance(viewer_origin),
            bounds: entity.bounds().unwrap_or(Aabb::ZERO),
            transform: entity.transform(),
        }
    }

    /// World-space bounds, assuming the local bounds are axis-aligned at `origin`.
    #[must_use]
    pub fn world_bounds(&self, origin: Vec3) -> Aabb {
        self.bounds.translated(origin)
    }
}
