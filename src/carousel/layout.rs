//! Ring layout and scroll-driven group rotation
//!
//! Panels sit evenly on a circle in the XZ plane facing its centre. The whole
//! ring turns rigidly about Y as the page scrolls.

use std::f32::consts::TAU;

use glam::{Mat3, Mat4, Quat, Vec3};

/// Angular slot of panel `index` out of `count`
pub fn panel_angle(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (index as f32 / count as f32) * TAU
}

/// Position on the ring for a given angle
pub fn panel_position(angle: f32, radius: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// Orientation turning local +Z toward the origin with +Y kept up
pub fn look_at_origin(position: Vec3) -> Quat {
    let z = (-position).normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let x = Vec3::Y.cross(z).normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

/// Ring rotation for a scroll progress, always in `[0, 2π)`
pub fn rotation_angle(scroll_progress: f32, panel_count: usize, speed_factor: f32) -> f32 {
    let angle = (scroll_progress * panel_count as f32 * TAU * speed_factor).rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// Yaw actually applied to the group
pub fn group_yaw(rotation: f32, yaw_offset: f32) -> f32 {
    rotation + yaw_offset
}

/// Group transform for a yaw
pub fn group_matrix(yaw: f32) -> Mat4 {
    Mat4::from_rotation_y(yaw)
}

/// Where a panel ends up once the group is rotated
pub fn panel_world_position(local_position: Vec3, yaw: f32) -> Vec3 {
    Quat::from_rotation_y(yaw) * local_position
}

/// Index of the panel whose direction from `camera_position` is closest to
/// `camera_forward`
pub fn forward_panel_index(
    local_positions: &[Vec3],
    yaw: f32,
    camera_position: Vec3,
    camera_forward: Vec3,
) -> Option<usize> {
    local_positions
        .iter()
        .enumerate()
        .map(|(index, &local)| {
            let direction = panel_world_position(local, yaw) - camera_position;
            (index, direction.angle_between(camera_forward))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_panel_angles() {
        let degrees: Vec<f32> = (0..5).map(|i| panel_angle(i, 5).to_degrees()).collect();
        for (actual, expected) in degrees.iter().zip([0.0, 72.0, 144.0, 216.0, 288.0]) {
            assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
        }
    }

    #[test]
    fn test_panel_position() {
        let p = panel_position(std::f32::consts::FRAC_PI_2, 1200.0);
        assert!(p.x.abs() < 1e-3);
        assert_eq!(p.y, 0.0);
        assert!((p.z - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn test_look_at_origin_faces_centre() {
        for i in 0..5 {
            let position = panel_position(panel_angle(i, 5), 1200.0);
            let facing = look_at_origin(position) * Vec3::Z;
            let to_centre = (-position).normalize();
            assert!(facing.distance(to_centre) < 1e-5);
            let up = look_at_origin(position) * Vec3::Y;
            assert!(up.distance(Vec3::Y) < 1e-5);
        }
    }

    #[test]
    fn test_rotation_angle_range() {
        for step in -50..=200 {
            let progress = step as f32 * 0.037;
            let angle = rotation_angle(progress, 5, 0.5);
            assert!((0.0..TAU).contains(&angle), "angle {angle} out of range");
        }
        assert_eq!(rotation_angle(0.0, 5, 0.5), 0.0);
    }

    #[test]
    fn test_rotation_quarter_progress() {
        // 0.1 progress * 5 panels * 0.5 speed = quarter turn
        let angle = rotation_angle(0.1, 5, 0.5);
        assert!((angle - TAU * 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_group_rotation_matches_matrix() {
        let local = panel_position(panel_angle(1, 5), 1200.0);
        let yaw = 0.8;
        let via_quat = panel_world_position(local, yaw);
        let via_matrix = group_matrix(yaw).transform_point3(local);
        assert!(via_quat.distance(via_matrix) < 1e-3);
    }

    #[test]
    fn test_forward_panel_index() {
        let locals: Vec<Vec3> = (0..5)
            .map(|i| panel_position(panel_angle(i, 5), 1200.0))
            .collect();
        let forward = Vec3::NEG_Z;

        // Panel at 3π/2 world angle sits straight ahead; yaw = θ - 3π/2
        for i in 0..5 {
            let yaw = panel_angle(i, 5) - 1.5 * std::f32::consts::PI;
            assert_eq!(forward_panel_index(&locals, yaw, Vec3::ZERO, forward), Some(i));
        }
        assert_eq!(forward_panel_index(&[], 0.0, Vec3::ZERO, forward), None);
    }
}
