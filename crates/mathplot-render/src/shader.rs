//! Shader program selection and pipeline construction.
//!
//! The scene renders with one graphics program at a time: the 2-D
//! projection program (perspective and orthographic) or the cylindrical
//! program. Switching projection kind drops the active pipeline and builds
//! the other. The text program is always resident.

use crate::uniforms::{FrameUniforms, ModelUniforms, TextUniforms};

/// Which graphics program is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramKind {
    /// Perspective/orthographic projection program.
    #[default]
    Projection,
    /// Cylindrical projection program.
    Cylindrical,
}

/// Bind group layouts shared by the pipelines.
pub struct PipelineLayouts {
    /// Per-frame uniforms (projection, lights, cylindrical camera).
    pub frame: wgpu::BindGroupLayout,
    /// Per-model uniforms (view, model matrices, alpha).
    pub model: wgpu::BindGroupLayout,
    /// Per-text uniforms (view, model matrices, text colour).
    pub text: wgpu::BindGroupLayout,
    /// Per-glyph texture and sampler.
    pub glyph: wgpu::BindGroupLayout,
}

fn uniform_layout_entry(binding: u32, size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size),
        },
        count: None,
    }
}

impl PipelineLayouts {
    /// Creates the shared bind group layouts.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame uniforms layout"),
            entries: &[uniform_layout_entry(
                0,
                std::mem::size_of::<FrameUniforms>() as u64,
            )],
        });
        let model = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model uniforms layout"),
            entries: &[uniform_layout_entry(
                0,
                std::mem::size_of::<ModelUniforms>() as u64,
            )],
        });
        let text = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("text uniforms layout"),
            entries: &[uniform_layout_entry(
                0,
                std::mem::size_of::<TextUniforms>() as u64,
            )],
        });
        let glyph = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glyph texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        Self {
            frame,
            model,
            text,
            glyph,
        }
    }
}

/// The three vertex buffers every model binds: positions, normals, colours.
fn mesh_vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    const POS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    const NRM: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
    const COL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];
    let stride = 3 * std::mem::size_of::<f32>() as u64;
    [
        wgpu::VertexBufferLayout {
            array_stride: stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POS,
        },
        wgpu::VertexBufferLayout {
            array_stride: stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &NRM,
        },
        wgpu::VertexBufferLayout {
            array_stride: stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COL,
        },
    ]
}

/// Interleaved position + uv layout for glyph quads.
fn text_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: 5 * std::mem::size_of::<f32>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

const ALPHA_BLEND: wgpu::BlendState = wgpu::BlendState::ALPHA_BLENDING;

/// Builds the graphics pipeline for the given program kind.
#[must_use]
pub fn create_graphics_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
    kind: ProgramKind,
    polygon_mode: wgpu::PolygonMode,
) -> wgpu::RenderPipeline {
    let source = match kind {
        ProgramKind::Projection => include_str!("shaders/mesh.wgsl"),
        ProgramKind::Cylindrical => include_str!("shaders/cylindrical.wgsl"),
    };
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("graphics shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("graphics pipeline layout"),
        bind_group_layouts: &[&layouts.frame, &layouts.model],
        push_constant_ranges: &[],
    });
    let vertex_layouts = mesh_vertex_layouts();
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("graphics pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &vertex_layouts,
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(ALPHA_BLEND),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Builds the text pipeline (alpha-masked textured quads).
#[must_use]
pub fn create_text_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("text shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("text pipeline layout"),
        bind_group_layouts: &[&layouts.frame, &layouts.text, &layouts.glyph],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("text pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[text_vertex_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(ALPHA_BLEND),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
