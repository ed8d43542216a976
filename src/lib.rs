//! Scroll-driven 3D carousel of curved video panels
//!
//! Panels sit on a ring around a fixed camera. Page scroll turns the ring,
//! and the gap between the raw and smoothed scroll bends each panel and
//! shifts its colours. Only the panel straight ahead plays its video.
//!
//! The core (`scroll`, `geometry`, `carousel`, `render_loop`) is pure and
//! runs without a GPU or a browser; `renderer` applies its output with wgpu,
//! and `native` / `web` provide the page and the videos.

pub mod camera;
pub mod carousel;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod render_loop;
pub mod renderer;
pub mod scroll;
pub mod video;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

pub use carousel::{CarouselState, FrameUpdate, PanelFrame};
pub use config::{load_config, CarouselConfig, VideoEntry};
pub use error::{CarouselError, CarouselResult};
pub use render_loop::RenderLoop;
pub use scroll::{PageEnvironment, ScrollState, ScrollTracker, Viewport};
pub use video::{SimulatedVideo, VideoSource};
