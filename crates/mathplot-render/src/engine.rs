//! The rendering engine: context lifecycle, program switching and frame
//! capture.

use std::sync::Arc;

use crate::buffer::create_uniform_buffer;
use crate::error::{RenderError, RenderResult};
use crate::shader::{
    create_graphics_pipeline, create_text_pipeline, PipelineLayouts, ProgramKind,
};
use crate::text_render::FontManager;
use crate::uniforms::FrameUniforms;

/// The wgpu-backed rendering engine.
///
/// Owns the GPU context, the shared bind group layouts, the active graphics
/// pipeline (swapped when the projection kind changes), the text pipeline
/// and the per-scene font manager. One engine serves one scene; a second
/// scene gets its own engine and context.
pub struct RenderEngine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// The render surface (None when headless).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration (also records the headless format).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Depth texture view.
    pub depth_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    /// Headless colour target, present only without a surface.
    headless_target: Option<wgpu::Texture>,
    /// Current viewport width in pixels.
    pub width: u32,
    /// Current viewport height in pixels.
    pub height: u32,
    /// Shared bind group layouts.
    pub layouts: PipelineLayouts,
    /// The active graphics program kind.
    pub program_kind: ProgramKind,
    /// The active graphics pipeline.
    pub graphics_pipeline: wgpu::RenderPipeline,
    /// Line-mode pipeline for bounding-box wireframes, when the adapter
    /// supports line polygon fill.
    pub wireframe_pipeline: Option<wgpu::RenderPipeline>,
    /// The text pipeline.
    pub text_pipeline: wgpu::RenderPipeline,
    /// Per-frame uniform buffer.
    pub frame_buffer: wgpu::Buffer,
    /// Bind group for the frame uniforms.
    pub frame_bind_group: wgpu::BindGroup,
    /// Glyph texture cache for this scene's text models.
    pub fonts: FontManager,
}

impl RenderEngine {
    /// Creates an engine rendering to a window surface.
    pub async fn new_windowed(window: Arc<winit::window::Window>) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::Surface(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::NoAdapter)?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        Self::from_parts(instance, adapter, Some(surface), surface_config, width, height).await
    }

    /// Creates an engine rendering to an offscreen target.
    pub async fn new_headless(width: u32, height: u32) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::NoAdapter)?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        Self::from_parts(instance, adapter, None, surface_config, width, height).await
    }

    async fn from_parts(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        surface: Option<wgpu::Surface<'static>>,
        surface_config: wgpu::SurfaceConfiguration,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        // Line polygon mode is used for bounding-box wireframes when the
        // adapter has it.
        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if wireframe_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("mathplot device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        if let Some(surface) = &surface {
            surface.configure(&device, &surface_config);
        }

        let (depth_texture, depth_view) = Self::create_depth_texture(&device, width, height);
        let headless_target = if surface.is_none() {
            Some(Self::create_offscreen_target(
                &device,
                surface_config.format,
                width,
                height,
            ))
        } else {
            None
        };

        let layouts = PipelineLayouts::new(&device);
        let program_kind = ProgramKind::Projection;
        let graphics_pipeline = create_graphics_pipeline(
            &device,
            &layouts,
            surface_config.format,
            program_kind,
            wgpu::PolygonMode::Fill,
        );
        let wireframe_pipeline = wireframe_supported.then(|| {
            create_graphics_pipeline(
                &device,
                &layouts,
                surface_config.format,
                ProgramKind::Projection,
                wgpu::PolygonMode::Line,
            )
        });
        let text_pipeline = create_text_pipeline(&device, &layouts, surface_config.format);

        let frame_buffer =
            create_uniform_buffer(&device, &FrameUniforms::default(), Some("frame uniforms"));
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame bind group"),
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let fonts = FontManager::new(&device);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            depth_texture,
            headless_target,
            width,
            height,
            layouts,
            program_kind,
            graphics_pipeline,
            wireframe_pipeline,
            text_pipeline,
            frame_buffer,
            frame_bind_group,
            fonts,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn create_offscreen_target(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Resizes the surface and depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.surface_config);
        } else {
            self.headless_target = Some(Self::create_offscreen_target(
                &self.device,
                self.surface_config.format,
                width,
                height,
            ));
        }
        let (texture, view) = Self::create_depth_texture(&self.device, width, height);
        self.depth_texture = texture;
        self.depth_view = view;
    }

    /// Ensures the graphics program matches the requested kind, dropping
    /// and rebuilding the pipeline on change.
    pub fn ensure_program(&mut self, kind: ProgramKind) {
        if self.program_kind == kind {
            return;
        }
        log::info!("switching graphics program to {kind:?}");
        self.graphics_pipeline = create_graphics_pipeline(
            &self.device,
            &self.layouts,
            self.surface_config.format,
            kind,
            wgpu::PolygonMode::Fill,
        );
        self.program_kind = kind;
    }

    /// Uploads the per-frame uniforms.
    pub fn write_frame_uniforms(&self, uniforms: &FrameUniforms) {
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// The headless colour target view, if this engine is headless.
    #[must_use]
    pub fn headless_view(&self) -> Option<wgpu::TextureView> {
        self.headless_target
            .as_ref()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    /// Current viewport dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bytes per row with the alignment wgpu requires for buffer copies.
    fn aligned_bytes_per_row(width: u32) -> u32 {
        let unaligned = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        unaligned.div_ceil(align) * align
    }

    /// Reads back an RGBA8 texture rendered at the current dimensions.
    ///
    /// The texture must carry `COPY_SRC`. Returns tightly packed RGBA
    /// top-down rows.
    pub fn read_back(&self, texture: &wgpu::Texture) -> RenderResult<Vec<u8>> {
        let bytes_per_row = Self::aligned_bytes_per_row(self.width);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::BufferMapFailed)?
            .map_err(|_| RenderError::BufferMapFailed)?;

        let data = slice.get_mapped_range();
        let row_bytes = (self.width * 4) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height {
            let start = (row * bytes_per_row) as usize;
            pixels.extend_from_slice(&data[start..start + row_bytes]);
        }
        drop(data);
        buffer.unmap();
        Ok(pixels)
    }

    /// Creates an offscreen snapshot target matching the current viewport
    /// and surface format (so the regular pipelines can render into it).
    #[must_use]
    pub fn create_snapshot_target(&self) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("snapshot texture"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.surface_config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Whether readback pixels arrive in BGRA order and need a swizzle
    /// before PNG encoding.
    #[must_use]
    pub fn readback_is_bgra(&self) -> bool {
        matches!(
            self.surface_config.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        )
    }
}
