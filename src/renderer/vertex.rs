use wgpu::util::DeviceExt;

use crate::geometry::PlaneGeometry;

/// Struct-of-Arrays vertex buffers for one plane
///
/// Positions are rewritten whenever the plane is re-bent; UVs and indices are
/// uploaded once.
pub struct PlaneBuffers {
    position_buffer: wgpu::Buffer,
    uv_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl PlaneBuffers {
    pub fn new(device: &wgpu::Device, geometry: &PlaneGeometry, label: &str) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Position Buffer")),
            contents: bytemuck::cast_slice(&geometry.positions),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let uv_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} UV Buffer")),
            contents: bytemuck::cast_slice(&geometry.uvs),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            position_buffer,
            uv_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }

    /// Re-upload positions if the geometry changed since the last upload
    pub fn upload_positions(&self, queue: &wgpu::Queue, geometry: &mut PlaneGeometry) -> bool {
        if !geometry.take_dirty() {
            return false;
        }
        queue.write_buffer(
            &self.position_buffer,
            0,
            bytemuck::cast_slice(&geometry.positions),
        );
        true
    }

    /// Bind buffers and draw
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.uv_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Vertex buffer layouts: positions at location 0, UVs at location 1
    pub fn desc<'a>() -> [wgpu::VertexBufferLayout<'a>; 2] {
        [
            // Position buffer
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            // UV buffer
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
        ]
    }
}
