use bytemuck::{Pod, Zeroable};

use crate::carousel::{PanelData, PanelFrame};

/// Per-panel uniform block, matching `PanelUniform` in panel.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PanelUniform {
    pub model: [[f32; 4]; 4],
    pub offset: [f32; 2],
    pub alpha: f32,
    pub wave: f32,
}

impl PanelUniform {
    /// Uniform values at creation, before the first frame runs
    pub fn initial(panel: &PanelData, group_yaw: f32) -> Self {
        Self {
            model: panel.model_matrix(group_yaw).to_cols_array_2d(),
            offset: panel.uniforms.offset.to_array(),
            alpha: panel.uniforms.alpha,
            wave: panel.uniforms.wave,
        }
    }

    pub fn from_frame(panel: &PanelData, frame: &PanelFrame) -> Self {
        Self {
            model: frame.model.to_cols_array_2d(),
            offset: frame.offset.to_array(),
            alpha: panel.uniforms.alpha,
            wave: panel.uniforms.wave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraUniform;
    use crate::config::VideoEntry;
    use glam::{Mat4, Vec2};

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        // mat4x4 + vec2 + f32 + f32, and mat4x4 + vec3 padded to 16
        assert_eq!(std::mem::size_of::<PanelUniform>(), 80);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_from_frame_uses_frame_values() {
        let panel = PanelData::new(0, 5, 1200.0, 1920.0, 2, 100.0, VideoEntry::new("a", "b"));
        let frame = PanelFrame {
            index: 0,
            apex: 180.0,
            offset: Vec2::new(-20.0, 0.0),
            model: Mat4::IDENTITY,
            in_view: true,
        };
        let uniform = PanelUniform::from_frame(&panel, &frame);
        assert_eq!(uniform.offset, [-20.0, 0.0]);
        assert_eq!(uniform.alpha, 1.0);
        assert_eq!(uniform.model, Mat4::IDENTITY.to_cols_array_2d());
    }
}
