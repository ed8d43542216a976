//! One video panel: geometry, shader values, and the per-frame deformation

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::config::VideoEntry;
use crate::constants::panel::{ASPECT_RATIO, DEFAULT_ALPHA, DEFORMATION_SCALE, WIDTH_SCALE};
use crate::geometry::{plane_curve, PlaneGeometry};

use super::layout;

/// CPU-side copy of the values the panel shader reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelUniforms {
    /// Velocity-driven shift used by the RGB split and the vertex wave
    pub offset: Vec2,
    pub alpha: f32,
    /// 1.0 enables the vertex-shader sine deformation, 0.0 disables it
    pub wave: f32,
}

impl Default for PanelUniforms {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            alpha: DEFAULT_ALPHA,
            wave: 1.0,
        }
    }
}

/// Panel width for a viewport width
pub fn panel_width(viewport_width: f32) -> f32 {
    WIDTH_SCALE * viewport_width
}

/// Weight in `[0.5, 1]` from the panel's angle to the +Z axis
pub fn deformation_factor(local_position: Vec3) -> f32 {
    let angle = local_position.angle_between(Vec3::Z);
    if !angle.is_finite() {
        return 0.5;
    }
    angle.sin() * 0.5 + 0.5
}

/// Signed deformation from the scroll lag, opposite to the scroll direction
pub fn scroll_deformation(current: f32, target: f32, factor: f32) -> f32 {
    -(target - current) * DEFORMATION_SCALE * factor
}

#[derive(Debug, Clone)]
pub struct PanelData {
    pub index: usize,
    /// Slot on the ring, radians
    pub angular_position: f32,
    pub base_radius: f32,
    pub local_position: Vec3,
    pub orientation: Quat,
    pub geometry: PlaneGeometry,
    pub uniforms: PanelUniforms,
    pub video: VideoEntry,
    deformation_factor: f32,
}

impl PanelData {
    /// Build panel `index` of `count`, sized for `viewport_width` and
    /// pre-bent by `initial_curvature`
    pub fn new(
        index: usize,
        count: usize,
        radius: f32,
        viewport_width: f32,
        segments: u32,
        initial_curvature: f32,
        video: VideoEntry,
    ) -> Self {
        let width = panel_width(viewport_width);
        let height = width / ASPECT_RATIO;
        let mut geometry = PlaneGeometry::new(width, height, segments, segments);
        plane_curve(&mut geometry, initial_curvature);

        let angular_position = layout::panel_angle(index, count);
        let local_position = layout::panel_position(angular_position, radius);

        Self {
            index,
            angular_position,
            base_radius: radius,
            local_position,
            orientation: layout::look_at_origin(local_position),
            geometry,
            uniforms: PanelUniforms::default(),
            video,
            deformation_factor: deformation_factor(local_position),
        }
    }

    pub fn deformation_factor(&self) -> f32 {
        self.deformation_factor
    }

    /// Re-bend the panel for this frame's scroll lag and update the shader
    /// offset. Returns the apex height used.
    pub fn update(&mut self, current: f32, target: f32, base_curvature: f32) -> f32 {
        let deformation = scroll_deformation(current, target, self.deformation_factor);
        let apex = base_curvature + deformation;

        plane_curve(&mut self.geometry, apex);
        self.uniforms.offset = Vec2::new(deformation, 0.0);
        apex
    }

    /// Model matrix once the group is rotated by `group_yaw`
    pub fn model_matrix(&self, group_yaw: f32) -> Mat4 {
        layout::group_matrix(group_yaw)
            * Mat4::from_rotation_translation(self.orientation, self.local_position)
    }

    pub fn world_position(&self, group_yaw: f32) -> Vec3 {
        layout::panel_world_position(self.local_position, group_yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(index: usize) -> PanelData {
        PanelData::new(
            index,
            5,
            1200.0,
            1920.0,
            10,
            100.0,
            VideoEntry::new("clip.mp4", "Clip"),
        )
    }

    #[test]
    fn test_panel_dimensions() {
        let panel = panel(0);
        assert!((panel.geometry.width - 907.2).abs() < 1e-2);
        assert!((panel.geometry.height - 510.3).abs() < 1e-2);
        // Pre-bent: the midline is pushed back by the initial curvature
        let middle = panel.geometry.positions[5];
        assert!((middle[2] + 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_deformation_factor_range() {
        // Panel 0 sits on +X: perpendicular to +Z
        assert!((deformation_factor(Vec3::new(1200.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!((deformation_factor(Vec3::new(0.0, 0.0, 1200.0)) - 0.5).abs() < 1e-6);
        assert!((deformation_factor(Vec3::new(0.0, 0.0, -1200.0)) - 0.5).abs() < 1e-6);
        for i in 0..5 {
            let factor = panel(i).deformation_factor();
            assert!((0.0..=1.0).contains(&factor));
        }
    }

    #[test]
    fn test_scroll_deformation_sign() {
        // Scrolling down: target ahead of current pushes the curve negative
        assert_eq!(scroll_deformation(0.0, 100.0, 1.0), -50.0);
        assert_eq!(scroll_deformation(100.0, 0.0, 0.5), 25.0);
        assert_eq!(scroll_deformation(42.0, 42.0, 1.0), 0.0);
    }

    #[test]
    fn test_update_settles_to_base_curvature() {
        let mut panel = panel(0);
        let apex = panel.update(500.0, 500.0, 200.0);
        assert_eq!(apex, 200.0);
        assert_eq!(panel.uniforms.offset, Vec2::ZERO);
        let middle = panel.geometry.positions[5];
        assert!((middle[2] + 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_update_tracks_velocity() {
        let mut panel = panel(0);
        let apex = panel.update(0.0, 100.0, 200.0);
        assert!((apex - 150.0).abs() < 1e-4);
        assert!((panel.uniforms.offset.x + 50.0).abs() < 1e-4);
        assert_eq!(panel.uniforms.offset.y, 0.0);
        assert!(panel.geometry.positions_dirty);
    }

    #[test]
    fn test_model_matrix_places_panel() {
        let panel = panel(2);
        let origin = panel.model_matrix(0.3).transform_point3(Vec3::ZERO);
        assert!(origin.distance(panel.world_position(0.3)) < 1e-3);
        assert!((origin.length() - 1200.0).abs() < 1e-2);
    }
}
