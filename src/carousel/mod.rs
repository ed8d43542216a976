//! Carousel state and the pure per-frame update
//!
//! `CarouselState::advance` turns a scroll sample into a `FrameUpdate`: new
//! group rotation, re-bent panel geometry, shader values and visibility. Nothing
//! here touches the GPU or the page; the renderer applies the result.

pub mod layout;
pub mod panel;
pub mod playback;

use glam::{Mat4, Vec2, Vec3};

use crate::config::CarouselConfig;
use crate::scroll::{ScrollState, Viewport};

pub use layout::{
    forward_panel_index, group_yaw, look_at_origin, panel_angle, panel_position,
    panel_world_position, rotation_angle,
};
pub use panel::{deformation_factor, scroll_deformation, PanelData, PanelUniforms};
pub use playback::{
    is_angle_in_view, is_in_view, playback_command, view_angle, PlaybackCommand, PlaybackState,
};

/// Tunables the per-frame update needs, lifted out of the config once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselSettings {
    pub base_curvature: f32,
    pub rotation_speed_factor: f32,
    pub group_yaw_offset: f32,
    pub view_threshold: f32,
}

impl From<&CarouselConfig> for CarouselSettings {
    fn from(config: &CarouselConfig) -> Self {
        Self {
            base_curvature: config.base_curvature,
            rotation_speed_factor: config.rotation_speed_factor,
            group_yaw_offset: config.group_yaw_offset,
            view_threshold: config.view_threshold,
        }
    }
}

/// Per-panel result of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    pub index: usize,
    pub apex: f32,
    pub offset: Vec2,
    pub model: Mat4,
    pub in_view: bool,
}

/// Everything the apply stage needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    pub scroll: ScrollState,
    pub rotation_angle: f32,
    pub group_yaw: f32,
    pub panels: Vec<PanelFrame>,
}

#[derive(Debug, Clone)]
pub struct CarouselState {
    pub rotation_angle: f32,
    pub panels: Vec<PanelData>,
    settings: CarouselSettings,
}

impl CarouselState {
    /// Lay out one panel per configured video, sized for `viewport`
    pub fn new(config: &CarouselConfig, viewport: Viewport) -> Self {
        let count = config.videos.len();
        let wave = if config.vertex_wave { 1.0 } else { 0.0 };

        let panels = config
            .videos
            .iter()
            .enumerate()
            .map(|(index, video)| {
                let mut panel = PanelData::new(
                    index,
                    count,
                    config.circle_radius,
                    viewport.width,
                    config.plane_segments,
                    config.initial_curvature,
                    video.clone(),
                );
                panel.uniforms.wave = wave;
                panel
            })
            .collect();

        log::info!(
            "[carousel::CarouselState::new] {} panels on a radius of {}",
            count,
            config.circle_radius
        );

        Self {
            rotation_angle: 0.0,
            panels,
            settings: CarouselSettings::from(config),
        }
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Yaw applied to the group for the current rotation
    pub fn group_yaw(&self) -> f32 {
        layout::group_yaw(self.rotation_angle, self.settings.group_yaw_offset)
    }

    /// Recompute the ring rotation from scroll progress
    pub fn update_rotation(&mut self, scroll_progress: f32) -> f32 {
        self.rotation_angle = layout::rotation_angle(
            scroll_progress,
            self.panels.len(),
            self.settings.rotation_speed_factor,
        );
        self.rotation_angle
    }

    /// Run every panel's deformation update, returning the apex heights
    pub fn update_panels(&mut self, scroll: ScrollState) -> Vec<f32> {
        let base = self.settings.base_curvature;
        self.panels
            .iter_mut()
            .map(|panel| panel.update(scroll.current, scroll.target, base))
            .collect()
    }

    /// In-view flag per panel for the current rotation
    pub fn visibility(&self, camera_position: Vec3, camera_forward: Vec3) -> Vec<bool> {
        let yaw = self.group_yaw();
        self.panels
            .iter()
            .map(|panel| {
                is_in_view(
                    panel.world_position(yaw),
                    camera_position,
                    camera_forward,
                    self.settings.view_threshold,
                )
            })
            .collect()
    }

    /// Panel currently closest to straight ahead
    pub fn forward_panel(&self, camera_position: Vec3, camera_forward: Vec3) -> Option<usize> {
        let locals: Vec<Vec3> = self.panels.iter().map(|p| p.local_position).collect();
        layout::forward_panel_index(&locals, self.group_yaw(), camera_position, camera_forward)
    }

    /// Rotation, panel updates and visibility for one frame
    pub fn advance(
        &mut self,
        scroll: ScrollState,
        scroll_progress: f32,
        camera_position: Vec3,
        camera_forward: Vec3,
    ) -> FrameUpdate {
        self.update_rotation(scroll_progress);
        let apexes = self.update_panels(scroll);
        let visibility = self.visibility(camera_position, camera_forward);
        let yaw = self.group_yaw();

        let panels = self
            .panels
            .iter()
            .zip(apexes)
            .zip(visibility)
            .map(|((panel, apex), in_view)| PanelFrame {
                index: panel.index,
                apex,
                offset: panel.uniforms.offset,
                model: panel.model_matrix(yaw),
                in_view,
            })
            .collect();

        FrameUpdate {
            scroll,
            rotation_angle: self.rotation_angle,
            group_yaw: yaw,
            panels,
        }
    }
}
