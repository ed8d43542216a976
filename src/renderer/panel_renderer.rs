use wgpu::util::DeviceExt;

use crate::camera::{build_camera_uniform, CameraData};
use crate::carousel::{CarouselState, FrameUpdate};
use crate::error::{gpu_operation_error, CarouselResult};
use crate::renderer::uniforms::PanelUniform;
use crate::renderer::vertex::PlaneBuffers;

/// WGSL constants from build.rs followed by the panel shader body
const PANEL_SHADER: &str = concat!(
    include_str!(concat!(env!("OUT_DIR"), "/carousel_constants.wgsl")),
    "\n",
    include_str!("shaders/panel.wgsl"),
);

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub const VIDEO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// GPU side of one panel
struct PanelGpu {
    buffers: PlaneBuffers,
    uniform_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    texture_size: (u32, u32),
    bind_group: wgpu::BindGroup,
}

/// Draws every panel of the carousel in one pass
pub struct PanelRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    panel_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    panels: Vec<PanelGpu>,
    depth_view: wgpu::TextureView,
}

impl PanelRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        surface_size: (u32, u32),
        carousel: &mut CarouselState,
        camera: &CameraData,
        video_size: (u32, u32),
    ) -> Self {
        log::info!(
            "[PanelRenderer::new] Creating renderer for {} panels, video textures {}x{}",
            carousel.panel_count(),
            video_size.0,
            video_size.1
        );

        let camera_uniform = build_camera_uniform(camera);
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let panel_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Panel Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Video Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Panel Shader"),
            source: wgpu::ShaderSource::Wgsl(PANEL_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Panel Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &panel_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Panel Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &PlaneBuffers::desc(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let group_yaw = carousel.group_yaw();
        let panels = carousel
            .panels
            .iter_mut()
            .map(|panel| {
                let label = format!("Panel {}", panel.index);
                let buffers = PlaneBuffers::new(device, &panel.geometry, &label);
                // Freshly uploaded; nothing pending
                panel.geometry.take_dirty();

                let uniform = PanelUniform::initial(panel, group_yaw);
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} Uniform Buffer")),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });

                let texture = create_video_texture(device, video_size, &label);
                let bind_group =
                    create_panel_bind_group(device, &panel_layout, &uniform_buffer, &texture, &sampler, &label);

                PanelGpu {
                    buffers,
                    uniform_buffer,
                    texture,
                    texture_size: video_size,
                    bind_group,
                }
            })
            .collect();

        let depth_view = create_depth_texture(device, surface_size.0, surface_size.1);

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            panel_layout,
            sampler,
            panels,
            depth_view,
        }
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Push one frame's update to the GPU
    pub fn apply(
        &mut self,
        queue: &wgpu::Queue,
        carousel: &mut CarouselState,
        update: &FrameUpdate,
        camera: &CameraData,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[build_camera_uniform(camera)]),
        );

        for frame in &update.panels {
            let (Some(gpu), Some(panel)) =
                (self.panels.get(frame.index), carousel.panels.get_mut(frame.index))
            else {
                continue;
            };
            gpu.buffers.upload_positions(queue, &mut panel.geometry);
            let uniform = PanelUniform::from_frame(panel, frame);
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth_texture(device, width, height);
    }

    /// Recreate a panel's texture when its video turns out to have another size
    pub fn ensure_video_size(
        &mut self,
        device: &wgpu::Device,
        index: usize,
        size: (u32, u32),
    ) -> CarouselResult<bool> {
        let gpu = self
            .panels
            .get_mut(index)
            .ok_or_else(|| gpu_operation_error("ensure_video_size", format!("no panel {index}")))?;
        if gpu.texture_size == size || size.0 == 0 || size.1 == 0 {
            return Ok(false);
        }

        let label = format!("Panel {index}");
        log::debug!(
            "[PanelRenderer::ensure_video_size] {} texture {}x{} -> {}x{}",
            label,
            gpu.texture_size.0,
            gpu.texture_size.1,
            size.0,
            size.1
        );
        gpu.texture = create_video_texture(device, size, &label);
        gpu.texture_size = size;
        gpu.bind_group = create_panel_bind_group(
            device,
            &self.panel_layout,
            &gpu.uniform_buffer,
            &gpu.texture,
            &self.sampler,
            &label,
        );
        Ok(true)
    }

    /// Upload one decoded RGBA frame into a panel's texture
    pub fn upload_rgba(
        &self,
        queue: &wgpu::Queue,
        index: usize,
        frame: &image::RgbaImage,
    ) -> CarouselResult<()> {
        let gpu = self
            .panels
            .get(index)
            .ok_or_else(|| gpu_operation_error("upload_rgba", format!("no panel {index}")))?;
        let (width, height) = frame.dimensions();
        if (width, height) != gpu.texture_size {
            return Err(gpu_operation_error(
                "upload_rgba",
                format!(
                    "frame {}x{} does not match texture {}x{}",
                    width, height, gpu.texture_size.0, gpu.texture_size.1
                ),
            ));
        }

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &gpu.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    /// Copy the current frame of a playing `<video>` into a panel's texture
    #[cfg(target_arch = "wasm32")]
    pub fn upload_video_element(
        &self,
        queue: &wgpu::Queue,
        index: usize,
        video: &web_sys::HtmlVideoElement,
    ) -> CarouselResult<()> {
        let gpu = self
            .panels
            .get(index)
            .ok_or_else(|| gpu_operation_error("upload_video_element", format!("no panel {index}")))?;
        let (width, height) = gpu.texture_size;

        queue.copy_external_image_to_texture(
            &wgpu::ImageCopyExternalImage {
                source: wgpu::ExternalImageSource::HTMLVideoElement(video.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::ImageCopyTextureTagged {
                texture: &gpu.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    /// Record the panel pass into `encoder`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear: wgpu::Color) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Panel Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        for gpu in &self.panels {
            render_pass.set_bind_group(1, &gpu.bind_group, &[]);
            gpu.buffers.draw(&mut render_pass);
        }
    }
}

fn create_video_texture(device: &wgpu::Device, size: (u32, u32), label: &str) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("{label} Video Texture")),
        size: wgpu::Extent3d {
            width: size.0.max(1),
            height: size.1.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: VIDEO_FORMAT,
        // External image copies need RENDER_ATTACHMENT as well as COPY_DST
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST
            | wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}

fn create_panel_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    texture: &wgpu::Texture,
    sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} Bind Group")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Clamp requested texture dimensions to the device limit
/// Returns (width, height, was_clamped)
pub fn validate_texture_dimensions(
    requested_width: u32,
    requested_height: u32,
    max_dimension: u32,
) -> (u32, u32, bool) {
    let width = requested_width.clamp(1, max_dimension.max(1));
    let height = requested_height.clamp(1, max_dimension.max(1));
    let was_clamped = width != requested_width || height != requested_height;
    (width, height, was_clamped)
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let max_dimension = device.limits().max_texture_dimension_2d;
    let (width, height, was_clamped) = validate_texture_dimensions(width, height, max_dimension);
    if was_clamped {
        log::warn!(
            "[create_depth_texture] Depth texture clamped to {}x{} (device limit: {})",
            width,
            height,
            max_dimension
        );
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_texture_dimensions() {
        assert_eq!(validate_texture_dimensions(1920, 1080, 8192), (1920, 1080, false));
        assert_eq!(validate_texture_dimensions(10000, 1080, 8192), (8192, 1080, true));
        // A minimised window reports zero; textures need at least one texel
        assert_eq!(validate_texture_dimensions(0, 0, 8192), (1, 1, true));
    }

    #[test]
    fn test_shader_source_has_constants_prelude() {
        assert!(PANEL_SHADER.contains("const M_PI"));
        assert!(PANEL_SHADER.contains("const RGB_SHIFT_DIVISOR"));
        assert!(PANEL_SHADER.contains("fn vs_main"));
        assert!(PANEL_SHADER.contains("fn fs_main"));
    }
}
