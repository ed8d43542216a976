//! Per-frame orchestration
//!
//! One call to [`RenderLoop::frame`] per display refresh: read and smooth the
//! scroll, turn the ring, re-bend the panels, sync video playback with
//! visibility, and hand the resulting [`FrameUpdate`] to the renderer.

use glam::Vec3;

use crate::camera::{self, CameraData};
use crate::carousel::{playback_command, CarouselState, FrameUpdate};
use crate::config::CarouselConfig;
use crate::scroll::{scroll_progress, wrap_scroll, PageEnvironment, ScrollTracker, Viewport};
use crate::video::{apply_playback_command, VideoSource};

/// Frames between periodic debug summaries
const LOG_INTERVAL_FRAMES: u64 = 60;

pub struct RenderLoop {
    config: CarouselConfig,
    tracker: ScrollTracker,
    carousel: CarouselState,
    camera: CameraData,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new(config: CarouselConfig, viewport: Viewport) -> Self {
        let carousel = CarouselState::new(&config, viewport);
        let camera = camera::init_camera_with(viewport, config.perspective, config.znear, config.zfar);
        camera::log_camera_context(&camera, "RenderLoop::new");

        Self {
            tracker: ScrollTracker::new(config.ease),
            carousel,
            camera,
            config,
            frame_count: 0,
        }
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn carousel(&self) -> &CarouselState {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut CarouselState {
        &mut self.carousel
    }

    pub fn camera(&self) -> &CameraData {
        &self.camera
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Stretch the page's scrollable layer to the configured height
    pub fn prepare_page<P: PageEnvironment + ?Sized>(&self, page: &mut P) {
        page.set_scrollable_height(self.config.scrollable_height);
    }

    /// Window resized: new aspect ratio, scrollable height re-asserted
    pub fn resize<P: PageEnvironment + ?Sized>(&mut self, page: &mut P, viewport: Viewport) {
        self.camera = camera::update_aspect_ratio(&self.camera, viewport);
        self.prepare_page(page);
        log::info!(
            "[RenderLoop::resize] Viewport {}x{}, aspect {:.3}",
            viewport.width,
            viewport.height,
            self.camera.aspect_ratio
        );
    }

    /// Run the update half of one frame
    pub fn frame<P, V>(&mut self, page: &mut P, videos: &mut [V]) -> FrameUpdate
    where
        P: PageEnvironment + ?Sized,
        V: VideoSource,
    {
        // Scroll: wrap at the end of the page, then ease toward the raw offset
        if let Some(y) = wrap_scroll(page.scroll_y(), page.total_scrollable()) {
            log::debug!("[RenderLoop::frame] Wrapping scroll back to {}", y);
            page.scroll_to(y);
        }
        let current = self.tracker.tick(page.scroll_y());
        page.translate_content(-current);

        let scroll = self.tracker.state();
        let viewport = page.viewport();
        let progress = scroll_progress(scroll.current, page.page_height(), viewport.height);

        // Rotation, deformation and visibility
        let camera_position = Vec3::from(self.camera.position);
        let camera_forward = Vec3::from(camera::forward_array(&self.camera));
        let update = self
            .carousel
            .advance(scroll, progress, camera_position, camera_forward);

        // Playback follows visibility
        for (panel, video) in update.panels.iter().zip(videos.iter_mut()) {
            if let Some(command) = playback_command(panel.in_view, video.playback_state()) {
                apply_playback_command(video, command);
            }
        }

        self.frame_count += 1;
        if self.frame_count % LOG_INTERVAL_FRAMES == 0 {
            log::debug!(
                "[RenderLoop::frame] Frame {}: scroll {:.1} -> {:.1}, rotation {:.3} rad",
                self.frame_count,
                scroll.current,
                scroll.target,
                update.rotation_angle
            );
        }

        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::SimulatedVideo;

    struct TestPage {
        scroll_y: f32,
        height: f32,
        scrollable_height: f32,
        viewport: Viewport,
        translation: f32,
    }

    impl PageEnvironment for TestPage {
        fn scroll_y(&self) -> f32 {
            self.scroll_y
        }
        fn scroll_to(&mut self, y: f32) {
            self.scroll_y = y;
        }
        fn page_height(&self) -> f32 {
            self.height
        }
        fn viewport(&self) -> Viewport {
            self.viewport
        }
        fn translate_content(&mut self, offset_y: f32) {
            self.translation = offset_y;
        }
        fn set_scrollable_height(&mut self, height: f32) {
            self.scrollable_height = height;
        }
    }

    fn setup() -> (RenderLoop, TestPage, Vec<SimulatedVideo>) {
        let config = CarouselConfig {
            plane_segments: 4,
            group_yaw_offset: 0.0,
            ..CarouselConfig::default()
        };
        let viewport = Viewport::new(1920.0, 1080.0);
        let videos = config.videos.iter().map(|v| SimulatedVideo::new(&v.url)).collect();
        let render_loop = RenderLoop::new(config, viewport);
        let mut page = TestPage {
            scroll_y: 0.0,
            height: 10_000.0,
            scrollable_height: 0.0,
            viewport,
            translation: 0.0,
        };
        render_loop.prepare_page(&mut page);
        (render_loop, page, videos)
    }

    #[test]
    fn test_prepare_page_stretches_only_the_scrollable_layer() {
        let (_, page, _) = setup();
        assert_eq!(page.scrollable_height, crate::constants::scroll::SCROLLABLE_HEIGHT);
        assert_eq!(page.height, 10_000.0);
    }

    #[test]
    fn test_frame_smooths_and_translates() {
        let (mut render_loop, mut page, mut videos) = setup();
        page.scroll_y = 400.0;
        let update = render_loop.frame(&mut page, &mut videos);

        assert_eq!(update.scroll.target, 400.0);
        assert!((update.scroll.current - 30.0).abs() < 1e-3);
        assert!((page.translation + 30.0).abs() < 1e-3);
        assert_eq!(render_loop.frame_count(), 1);
    }

    #[test]
    fn test_frame_wraps_at_page_end() {
        let (mut render_loop, mut page, mut videos) = setup();
        page.scroll_y = 10_000.0 - 1080.0;
        let update = render_loop.frame(&mut page, &mut videos);
        assert_eq!(page.scroll_y, 1.0);
        assert_eq!(update.scroll.target, 1.0);
    }

    #[test]
    fn test_only_the_forward_video_plays() {
        let (mut render_loop, mut page, mut videos) = setup();
        // Settle at a quarter turn: progress 0.1 of 8920 scrollable pixels
        page.scroll_y = 892.0;
        for _ in 0..400 {
            render_loop.frame(&mut page, &mut videos);
        }

        let playing: Vec<bool> = videos.iter().map(|v| !v.is_paused()).collect();
        assert_eq!(playing, vec![true, false, false, false, false]);

        // Scroll on to the next slot: the first panel pauses, the second plays
        page.scroll_y = 892.0 * 1.8;
        for _ in 0..400 {
            render_loop.frame(&mut page, &mut videos);
        }
        let playing: Vec<bool> = videos.iter().map(|v| !v.is_paused()).collect();
        assert_eq!(playing, vec![false, true, false, false, false]);
    }

    #[test]
    fn test_resize_updates_aspect_only() {
        let (mut render_loop, mut page, _) = setup();
        let fov = render_loop.camera().fovy_radians;
        page.scrollable_height = 0.0;
        render_loop.resize(&mut page, Viewport::new(1000.0, 1000.0));
        assert_eq!(render_loop.camera().fovy_radians, fov);
        assert!((render_loop.camera().aspect_ratio - 1.0).abs() < 1e-6);
        assert_eq!(page.scrollable_height, crate::constants::scroll::SCROLLABLE_HEIGHT);
        assert_eq!(page.height, 10_000.0);
    }
}
