//! World-to-screen projection.

use glam::{Mat4, Vec2, Vec3};

/// Projects a world point into viewport pixels.
///
/// Returns `None` when the homogeneous divisor is not greater than
/// `epsilon` (the point is behind or on the eye plane) or is NaN.
/// The viewport center maps to `viewport / 2`, and y grows downward.
/// With `snap` the result is floored to whole pixels.
#[must_use]
pub fn world_to_screen(
    view_projection: &Mat4,
    point: Vec3,
    viewport: Vec2,
    epsilon: f32,
    snap: bool,
) -> Option<Vec2> {
    let p = point.extend(1.0);
    let w = view_projection.row(3).dot(p);
    if w.is_nan() || w <= epsilon {
        return None;
    }

    let ndc = Vec2::new(
        view_projection.row(0).dot(p) / w,
        view_projection.row(1).dot(p) / w,
    );
    let half = viewport * 0.5;
    let screen = Vec2::new(half.x * (1.0 + ndc.x), half.y * (1.0 - ndc.y));

    Some(if snap { screen.floor() } else { screen })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);

    fn camera() -> Mat4 {
        Mat4::perspective_rh(70f32.to_radians(), VIEWPORT.x / VIEWPORT.y, 1.0, 4096.0)
            * Mat4::look_at_rh(Vec3::ZERO, Vec3::X, Vec3::Z)
    }

    #[test]
    fn test_center_maps_to_viewport_center() {
        let screen = world_to_screen(&camera(), Vec3::new(250.0, 0.0, 0.0), VIEWPORT, 0.001, false).unwrap();
        assert!((screen - VIEWPORT * 0.5).length() < 0.01);
    }

    #[test]
    fn test_behind_viewer_is_rejected() {
        assert!(world_to_screen(&camera(), Vec3::new(-250.0, 0.0, 0.0), VIEWPORT, 0.001, false).is_none());
        assert!(world_to_screen(&camera(), Vec3::ZERO, VIEWPORT, 0.001, false).is_none());
    }

    #[test]
    fn test_y_is_flipped() {
        let above = world_to_screen(&camera(), Vec3::new(250.0, 0.0, 50.0), VIEWPORT, 0.001, false).unwrap();
        assert!(above.y < VIEWPORT.y * 0.5);

        // Right-handed, Z up, looking down +X: +Y is to the left
        let left = world_to_screen(&camera(), Vec3::new(250.0, 50.0, 0.0), VIEWPORT, 0.001, false).unwrap();
        assert!(left.x < VIEWPORT.x * 0.5);
    }

    #[test]
    fn test_snap_floors() {
        let raw = world_to_screen(&camera(), Vec3::new(250.0, 3.3, 1.7), VIEWPORT, 0.001, false).unwrap();
        let snapped = world_to_screen(&camera(), Vec3::new(250.0, 3.3, 1.7), VIEWPORT, 0.001, true).unwrap();
        assert_eq!(snapped, raw.floor());
    }

    #[test]
    fn test_nan_matrix_is_rejected() {
        let broken = Mat4::from_cols_array(&[f32::NAN; 16]);
        assert!(world_to_screen(&broken, Vec3::X, VIEWPORT, 0.001, false).is_none());
    }
}
