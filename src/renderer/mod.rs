//! wgpu rendering of the carousel
//!
//! The renderer only consumes `FrameUpdate`s: it never computes layout or
//! deformation itself.

#[cfg(not(target_arch = "wasm32"))]
mod gpu_state;
mod panel_renderer;
mod uniforms;
mod vertex;

#[cfg(not(target_arch = "wasm32"))]
pub use gpu_state::GpuState;
pub use panel_renderer::{validate_texture_dimensions, PanelRenderer, DEPTH_FORMAT, VIDEO_FORMAT};
pub use uniforms::PanelUniform;
pub use vertex::PlaneBuffers;
