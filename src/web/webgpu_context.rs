use web_sys::HtmlCanvasElement;
use wgpu::{Adapter, Device, Queue, Surface, SurfaceConfiguration};

use crate::error::{gpu_operation_error, CarouselResult, ErrorContext};

/// Configuration for WebGPU initialization
#[derive(Debug, Clone)]
pub struct WebGpuConfig {
    pub power_preference: wgpu::PowerPreference,
    pub required_features: wgpu::Features,
    /// Base limits, raised to the adapter's texture resolution
    pub required_limits: wgpu::Limits,
}

impl Default for WebGpuConfig {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
        }
    }
}

/// WebGPU (or WebGL2 fallback) context for the page canvas
pub struct WebGpuContext {
    pub device: Device,
    pub queue: Queue,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub adapter: Adapter,
    canvas: HtmlCanvasElement,
}

impl WebGpuContext {
    pub async fn new(canvas: &HtmlCanvasElement) -> CarouselResult<Self> {
        Self::with_config(canvas, WebGpuConfig::default()).await
    }

    pub async fn with_config(
        canvas: &HtmlCanvasElement,
        config: WebGpuConfig,
    ) -> CarouselResult<Self> {
        log::info!("[WebGpuContext::with_config] Initializing WebGPU context");

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .gpu_context("create_surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or_else(|| gpu_operation_error("request_adapter", "no suitable adapter"))?;

        log::info!(
            "[WebGpuContext::with_config] Got adapter: {:?}",
            adapter.get_info()
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("WebGPU Device"),
                    required_features: config.required_features,
                    required_limits: config.required_limits.using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .gpu_context("request_device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| gpu_operation_error("configure_surface", "no surface formats"))?;

        // The page shows through transparent pixels when the browser allows it
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: canvas.width().max(1),
            height: canvas.height().max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "[WebGpuContext::with_config] Surface {:?} {}x{}",
            surface_format,
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            adapter,
            canvas: canvas.clone(),
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Resize the canvas backing store and the surface
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface.configure(&self.device, &self.surface_config);
        }
    }

    /// Reconfigure with the current size, after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub fn log_adapter_info(&self) {
        let info = self.adapter.get_info();
        log::info!("=== WebGPU Adapter ===");
        log::info!("Adapter: {}", info.name);
        log::info!("Backend: {:?}", info.backend);
        log::info!(
            "Max texture dimension 2D: {}",
            self.device.limits().max_texture_dimension_2d
        );
    }
}
