//! Text rendering resources: glyph texture cache and per-text GPU data.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::buffer::{create_index_buffer, create_uniform_buffer, create_vertex_buffer};
use crate::glyphs::{BuiltinFont, GlyphMetrics, GlyphSource};
use crate::uniforms::TextUniforms;

/// One textured glyph quad in a text model's local frame.
#[derive(Debug, Clone, Copy)]
pub struct GlyphQuad {
    /// Corner positions: bottom-left, bottom-right, top-right, top-left.
    pub corners: [Vec3; 4],
    /// Texture coordinates per corner.
    pub uv: [Vec2; 4],
    /// The codepoint this quad shows.
    pub glyph: char,
}

/// Caches one GPU texture (and bind group) per rasterized glyph.
///
/// Owned per scene; torn down after the scene's models so no model outlives
/// its glyph textures.
pub struct FontManager {
    source: Box<dyn GlyphSource + Send + Sync>,
    sampler: wgpu::Sampler,
    cache: HashMap<(char, u32), Arc<wgpu::BindGroup>>,
}

impl FontManager {
    /// A font manager over the built-in bitmap face.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        Self::with_source(device, Box::new(BuiltinFont))
    }

    /// A font manager over an external glyph source.
    #[must_use]
    pub fn with_source(device: &wgpu::Device, source: Box<dyn GlyphSource + Send + Sync>) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glyph sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..wgpu::SamplerDescriptor::default()
        });
        Self {
            source,
            sampler,
            cache: HashMap::new(),
        }
    }

    /// Metrics for a codepoint at the given resolution, without touching
    /// the GPU.
    #[must_use]
    pub fn metrics(&self, c: char, resolution: u32) -> Option<GlyphMetrics> {
        self.source.glyph(c, resolution).map(|g| g.metrics)
    }

    /// The cached texture bind group for a glyph, uploading on first use.
    pub fn glyph_bind_group(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        glyph_layout: &wgpu::BindGroupLayout,
        c: char,
        resolution: u32,
    ) -> Option<Arc<wgpu::BindGroup>> {
        if let Some(found) = self.cache.get(&(c, resolution)) {
            return Some(Arc::clone(found));
        }
        let bitmap = self.source.glyph(c, resolution)?;
        let size = wgpu::Extent3d {
            width: bitmap.width,
            height: bitmap.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glyph texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap.coverage,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bitmap.width),
                rows_per_image: Some(bitmap.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = Arc::new(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glyph bind group"),
            layout: glyph_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));
        self.cache.insert((c, resolution), Arc::clone(&bind_group));
        Some(bind_group)
    }
}

/// One glyph's draw resources.
pub struct GlyphDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    glyph_bind_group: Arc<wgpu::BindGroup>,
}

/// GPU resources for one text model: its uniform bind group plus one quad
/// per glyph.
pub struct TextRenderData {
    /// Per-text uniform buffer (view/model matrices, colour).
    pub uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    glyphs: Vec<GlyphDraw>,
}

impl TextRenderData {
    /// Uploads quads, resolving glyph textures through the font manager.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        text_layout: &wgpu::BindGroupLayout,
        glyph_layout: &wgpu::BindGroupLayout,
        fonts: &mut FontManager,
        quads: &[GlyphQuad],
        resolution: u32,
    ) -> Self {
        let uniform_buffer =
            create_uniform_buffer(device, &TextUniforms::default(), Some("text uniforms"));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text bind group"),
            layout: text_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut glyphs = Vec::with_capacity(quads.len());
        for quad in quads {
            let Some(glyph_bind_group) =
                fonts.glyph_bind_group(device, queue, glyph_layout, quad.glyph, resolution)
            else {
                continue;
            };
            let mut verts = [0.0f32; 20];
            for (i, (p, uv)) in quad.corners.iter().zip(quad.uv.iter()).enumerate() {
                verts[5 * i..5 * i + 3].copy_from_slice(&[p.x, p.y, p.z]);
                verts[5 * i + 3..5 * i + 5].copy_from_slice(&[uv.x, uv.y]);
            }
            let vertex_buffer = create_vertex_buffer(device, &verts, Some("glyph quad"));
            let index_buffer =
                create_index_buffer(device, &[0, 1, 2, 0, 2, 3], Some("glyph quad indices"));
            glyphs.push(GlyphDraw {
                vertex_buffer,
                index_buffer,
                glyph_bind_group,
            });
        }

        Self {
            uniform_buffer,
            bind_group,
            glyphs,
        }
    }

    /// Writes the per-text uniforms for this frame.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &TextUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Draws every glyph quad. The text pipeline must be bound.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        for glyph in &self.glyphs {
            pass.set_bind_group(2, glyph.glyph_bind_group.as_ref(), &[]);
            pass.set_vertex_buffer(0, glyph.vertex_buffer.slice(..));
            pass.set_index_buffer(glyph.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..6, 0, 0..1);
        }
    }
}
