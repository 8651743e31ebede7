//! Per-model GPU resources and draw calls.

use crate::buffer::{create_index_buffer, create_uniform_buffer, create_vertex_buffer};
use crate::error::{RenderError, RenderResult};
use crate::uniforms::ModelUniforms;

/// GPU buffers for one model's vertex set: three attribute buffers, the
/// index buffer and the per-model uniform bind group.
pub struct ModelRenderData {
    /// Position buffer.
    pub position_buffer: wgpu::Buffer,
    /// Normal buffer.
    pub normal_buffer: wgpu::Buffer,
    /// Colour buffer; the only buffer touched by colour-only updates.
    pub colour_buffer: wgpu::Buffer,
    /// Triangle index buffer.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Per-model uniform buffer.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group for the uniform buffer.
    pub bind_group: wgpu::BindGroup,
}

impl ModelRenderData {
    /// Uploads the CPU arrays with static-draw semantics.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        model_layout: &wgpu::BindGroupLayout,
        positions: &[f32],
        normals: &[f32],
        colors: &[f32],
        indices: &[u32],
    ) -> Self {
        let position_buffer = create_vertex_buffer(device, positions, Some("model positions"));
        let normal_buffer = create_vertex_buffer(device, normals, Some("model normals"));
        let colour_buffer = create_vertex_buffer(device, colors, Some("model colours"));
        let index_buffer = create_index_buffer(device, indices, Some("model indices"));
        let uniform_buffer =
            create_uniform_buffer(device, &ModelUniforms::default(), Some("model uniforms"));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model bind group"),
            layout: model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            position_buffer,
            normal_buffer,
            colour_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Re-uploads only the colour buffer. Valid only while the colour array
    /// size is unchanged.
    pub fn update_colours(&self, queue: &wgpu::Queue, colors: &[f32]) -> RenderResult<()> {
        let bytes = std::mem::size_of_val(colors) as u64;
        if bytes != self.colour_buffer.size() {
            return Err(RenderError::ColourSizeChanged {
                expected: self.colour_buffer.size(),
                actual: bytes,
            });
        }
        queue.write_buffer(&self.colour_buffer, 0, bytemuck::cast_slice(colors));
        Ok(())
    }

    /// Writes the per-model uniforms for this frame.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &ModelUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Binds buffers and issues the indexed draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        pass.set_vertex_buffer(1, self.normal_buffer.slice(..));
        pass.set_vertex_buffer(2, self.colour_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
