use std::sync::Arc;

use anyhow::Result;
use winit::window::Window;

use crate::renderer::PanelRenderer;

/// Clear colour behind the carousel in the native window
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Window surface, device and queue for the native runner
pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,
    frames_rendered: u64,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        log::info!("[GpuState::new] Starting GPU initialization");
        let init_start = std::time::Instant::now();

        let size = window.inner_size();
        log::debug!("[GpuState::new] Window size: {}x{}", size.width, size.height);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).map_err(|e| {
            log::error!("[GpuState::new] Failed to create surface: {}", e);
            anyhow::anyhow!("Surface creation failed: {}", e)
        })?;

        let mut adapter_options = wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        };

        let adapter = match instance.request_adapter(&adapter_options).await {
            Some(adapter) => adapter,
            None => {
                log::warn!("[GpuState::new] No high-performance adapter found, trying low power...");
                adapter_options.power_preference = wgpu::PowerPreference::LowPower;
                match instance.request_adapter(&adapter_options).await {
                    Some(adapter) => adapter,
                    None => {
                        log::warn!("[GpuState::new] No low-power adapter found, trying fallback...");
                        adapter_options.force_fallback_adapter = true;
                        instance
                            .request_adapter(&adapter_options)
                            .await
                            .ok_or_else(|| {
                                log::error!("[GpuState::new] No suitable GPU adapter found!");
                                anyhow::anyhow!("No GPU adapter available")
                            })?
                    }
                }
            }
        };

        let info = adapter.get_info();
        log::info!("[GpuState::new] Adapter: {} ({:?})", info.name, info.device_type);
        log::info!("[GpuState::new] Backend: {:?}", info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Carousel Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| {
                log::error!("[GpuState::new] Failed to create GPU device: {}", e);
                anyhow::anyhow!("Device creation failed: {}", e)
            })?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("[GPU] Uncaptured device error: {:?}", error);
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        if surface_caps.formats.is_empty() {
            log::error!("[GpuState::new] No surface formats available!");
            return Err(anyhow::anyhow!("No surface formats supported"));
        }
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "[GpuState::new] Surface configured as {:?}, initialization took {:?}",
            surface_format,
            init_start.elapsed()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            frames_rendered: 0,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let max_dimension = self.device.limits().max_texture_dimension_2d;
        let width = new_size.width.min(max_dimension);
        let height = new_size.height.min(max_dimension);
        if width != new_size.width || height != new_size.height {
            log::warn!(
                "[GpuState::resize] Window {}x{} exceeds GPU texture limit {}, clamping",
                new_size.width,
                new_size.height,
                max_dimension
            );
        }

        self.size = winit::dpi::PhysicalSize::new(width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, renderer: &PanelRenderer) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        renderer.render(&mut encoder, &view, CLEAR_COLOR);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frames_rendered += 1;
        if self.frames_rendered == 1 {
            log::info!("[GpuState::render] First frame presented");
        }
        Ok(())
    }
}
