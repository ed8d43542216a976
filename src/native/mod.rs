//! Native window runner
//!
//! There is no document to scroll outside the browser, so the wheel drives a
//! `VirtualPage` and each panel plays a generated test card instead of a
//! decoded video.

use crate::scroll::{PageEnvironment, Viewport};

/// Pixels scrolled per wheel line, roughly what browsers use
pub const LINE_HEIGHT_PX: f32 = 100.0;

/// Test card resolution for simulated videos
pub const TEST_CARD_SIZE: (u32, u32) = (640, 360);

/// A scroll position over an artificial page, fed by mouse wheel events
///
/// Like a document whose scrollable layer outgrows its body: scrolling is
/// clamped to the stretched layer, while `page_height` stays the content height
/// that progress and the wrap are measured against.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualPage {
    scroll_y: f32,
    page_height: f32,
    scrollable_height: f32,
    viewport: Viewport,
    content_offset: f32,
}

impl VirtualPage {
    pub fn new(viewport: Viewport, page_height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            page_height,
            scrollable_height: page_height,
            viewport,
            content_offset: 0.0,
        }
    }

    /// Scroll by `delta` pixels, clamped to the document like a browser would
    pub fn scroll_by(&mut self, delta: f32) {
        let document_height = self.scrollable_height.max(self.page_height);
        let max = (document_height - self.viewport.height).max(0.0);
        self.scroll_y = (self.scroll_y + delta).clamp(0.0, max);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scroll_by(0.0);
    }

    /// Last offset handed to `translate_content`
    pub fn content_offset(&self) -> f32 {
        self.content_offset
    }
}

impl PageEnvironment for VirtualPage {
    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y;
    }

    fn page_height(&self) -> f32 {
        self.page_height
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn translate_content(&mut self, offset_y: f32) {
        self.content_offset = offset_y;
    }

    fn set_scrollable_height(&mut self, height: f32) {
        self.scrollable_height = height;
    }
}

/// Convert a winit wheel delta into page pixels (positive scrolls down)
pub fn wheel_pixels(delta: winit::event::MouseScrollDelta) -> f32 {
    match delta {
        winit::event::MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
        winit::event::MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}

#[cfg(feature = "native")]
pub use runner::run;

#[cfg(feature = "native")]
mod runner {
    use std::sync::Arc;

    use anyhow::Result;
    use winit::{
        dpi::LogicalSize,
        event::{ElementState, Event, KeyEvent, WindowEvent},
        event_loop::EventLoop,
        keyboard::{KeyCode, PhysicalKey},
        window::WindowBuilder,
    };

    use super::{wheel_pixels, VirtualPage, TEST_CARD_SIZE};
    use crate::config::CarouselConfig;
    use crate::render_loop::RenderLoop;
    use crate::renderer::{GpuState, PanelRenderer};
    use crate::scroll::{PageEnvironment, Viewport};
    use crate::video::{on_video_ready, test_card, SimulatedVideo, VideoSource};

    /// Open a window and run the carousel until it is closed
    pub fn run(config: CarouselConfig) -> Result<()> {
        config.validate()?;
        log::info!(
            "[native::run] Starting carousel with {} videos",
            config.videos.len()
        );

        let event_loop = EventLoop::new()?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&config.window_title)
                .with_inner_size(LogicalSize::new(config.window_width, config.window_height))
                .build(&event_loop)
                .map_err(|e| {
                    log::error!("[native::run] Window creation failed: {}", e);
                    e
                })?,
        );

        let mut gpu_state = pollster::block_on(GpuState::new(window.clone()))?;
        let size = gpu_state.size;
        let viewport = Viewport::new(size.width as f32, size.height as f32);

        let title = config.window_title.clone();
        let headings: Vec<String> = config.videos.iter().map(|v| v.heading.clone()).collect();
        let mut videos: Vec<SimulatedVideo> = config
            .videos
            .iter()
            .map(|entry| SimulatedVideo::new(&entry.url))
            .collect();

        let mut page = VirtualPage::new(viewport, config.page_height);
        let mut render_loop = RenderLoop::new(config, viewport);
        render_loop.prepare_page(&mut page);

        let camera = *render_loop.camera();
        let mut renderer = PanelRenderer::new(
            &gpu_state.device,
            gpu_state.format(),
            (gpu_state.config.width, gpu_state.config.height),
            render_loop.carousel_mut(),
            &camera,
            TEST_CARD_SIZE,
        );

        // Simulated sources are buffered immediately
        for (index, video) in videos.iter_mut().enumerate() {
            let card = test_card(TEST_CARD_SIZE.0, TEST_CARD_SIZE.1, index, 0);
            renderer.upload_rgba(&gpu_state.queue, index, &card)?;
            on_video_ready(video);
        }

        let mut shown_heading: Option<usize> = None;

        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, window_id } if window_id == gpu_state.window.id() => {
                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } => elwt.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } => {
                        let step = page.viewport().height;
                        match code {
                            KeyCode::PageDown | KeyCode::Space => page.scroll_by(step),
                            KeyCode::PageUp => page.scroll_by(-step),
                            KeyCode::ArrowDown => page.scroll_by(super::LINE_HEIGHT_PX),
                            KeyCode::ArrowUp => page.scroll_by(-super::LINE_HEIGHT_PX),
                            _ => {}
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        page.scroll_by(wheel_pixels(delta));
                    }
                    WindowEvent::Resized(physical_size) => {
                        gpu_state.resize(physical_size);
                        let viewport = Viewport::new(
                            gpu_state.size.width as f32,
                            gpu_state.size.height as f32,
                        );
                        page.set_viewport(viewport);
                        render_loop.resize(&mut page, viewport);
                        renderer.resize(&gpu_state.device, gpu_state.size.width, gpu_state.size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        let update = render_loop.frame(&mut page, &mut videos);

                        // Playing sources advance and re-upload their card
                        for (index, video) in videos.iter_mut().enumerate() {
                            if video.is_paused() {
                                continue;
                            }
                            video.advance();
                            let card = test_card(
                                TEST_CARD_SIZE.0,
                                TEST_CARD_SIZE.1,
                                index,
                                video.frames_played(),
                            );
                            if let Err(e) = renderer.upload_rgba(&gpu_state.queue, index, &card) {
                                log::warn!("[native::run] Frame upload failed: {}", e);
                            }
                        }

                        let forward = update.panels.iter().find(|p| p.in_view).map(|p| p.index);
                        if forward != shown_heading {
                            shown_heading = forward;
                            let heading = forward.and_then(|i| headings.get(i));
                            match heading {
                                Some(heading) => gpu_state.window.set_title(&format!("{title} - {heading}")),
                                None => gpu_state.window.set_title(&title),
                            }
                        }

                        let camera = *render_loop.camera();
                        renderer.apply(&gpu_state.queue, render_loop.carousel_mut(), &update, &camera);

                        match gpu_state.render(&renderer) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => gpu_state.resize(gpu_state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("[native::run] Out of GPU memory, exiting");
                                elwt.exit()
                            }
                            Err(e) => log::warn!("[native::run] Render error: {:?}", e),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => gpu_state.window.request_redraw(),
            _ => {}
        })?;

        Ok(())
    }
}
