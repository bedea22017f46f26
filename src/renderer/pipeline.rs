//! wgpu render pipeline setup and frame rendering

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::texture::Texture;
use super::vertex::SpriteVertex;
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::error::InitError;

/// The original game's pale pink canvas clear
const BACKDROP: wgpu::Color = wgpu::Color {
    r: 245.0 / 255.0,
    g: 180.0 / 255.0,
    b: 180.0 / 255.0,
    a: 1.0,
};

/// Opaque handle to a texture owned by the render state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle(u32);

/// One textured quad to draw this frame. `pos` is the top-left corner and
/// `size` the extent, both in logical window pixels.
#[derive(Debug, Clone, Copy)]
pub struct SpriteInstance {
    pub texture: TextureHandle,
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation: f32,
}

/// Main render state
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    vertex_buffer: wgpu::Buffer,
    textures: Vec<Texture>,
    /// Surface size in physical pixels
    pub size: (u32, u32),
}

impl RenderState {
    /// Acquire adapter, device, and surface for the window and build the
    /// sprite pipeline. Every failure here is a renderer-creation failure.
    pub fn new(window: &'static winit::window::Window) -> Result<Self, InitError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| InitError::Renderer(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| InitError::Renderer(e.to_string()))?;

        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("meteor-strike-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| InitError::Renderer(e.to_string()))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
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

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite-texture-layout"),
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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite-pipeline-layout"),
            bind_group_layouts: &[&texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SpriteVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Placeholder buffer; rebuilt with the real quads every frame
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite-vertices"),
            contents: bytemuck::cast_slice(&[SpriteVertex::new([0.0, 0.0], [0.0, 0.0])]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            texture_layout,
            vertex_buffer,
            textures: Vec::new(),
            size: (size.width, size.height),
        })
    }

    /// Load a texture from disk; the handle indexes this render state.
    pub fn load_texture(&mut self, path: &str) -> Result<TextureHandle, InitError> {
        let texture = Texture::from_path(&self.device, &self.queue, &self.texture_layout, path)?;
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(texture);
        Ok(handle)
    }

    /// Native pixel dimensions of a loaded texture.
    pub fn texture_size(&self, handle: TextureHandle) -> (u32, u32) {
        self.textures[handle.0 as usize].size
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Logical window pixels (origin top-left, y down) to NDC.
    fn pixel_to_ndc(&self, p: Vec2) -> [f32; 2] {
        let (w, h) = (WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32);
        [p.x / w * 2.0 - 1.0, 1.0 - p.y / h * 2.0]
    }

    /// Six vertices for one sprite quad, rotated about its center.
    fn push_quad(&self, out: &mut Vec<SpriteVertex>, sprite: &SpriteInstance) {
        let half = sprite.size * 0.5;
        let center = sprite.pos + half;
        let (sin, cos) = sprite.rotation.sin_cos();

        let corner = |dx: f32, dy: f32, u: f32, v: f32| {
            let local = Vec2::new(dx * half.x, dy * half.y);
            let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
            SpriteVertex::new(self.pixel_to_ndc(center + rotated), [u, v])
        };

        let tl = corner(-1.0, -1.0, 0.0, 0.0);
        let tr = corner(1.0, -1.0, 1.0, 0.0);
        let br = corner(1.0, 1.0, 1.0, 1.0);
        let bl = corner(-1.0, 1.0, 0.0, 1.0);
        out.extend_from_slice(&[tl, tr, br, tl, br, bl]);
    }

    /// Upload this frame's quads and render them in submission order,
    /// batching consecutive sprites that share a texture.
    pub fn render(&mut self, sprites: &[SpriteInstance]) -> Result<(), wgpu::SurfaceError> {
        let mut vertices = Vec::with_capacity(sprites.len() * 6);
        let mut batches: Vec<(TextureHandle, std::ops::Range<u32>)> = Vec::new();
        for sprite in sprites {
            let start = vertices.len() as u32;
            self.push_quad(&mut vertices, sprite);
            let end = vertices.len() as u32;
            match batches.last_mut() {
                Some((handle, range)) if *handle == sprite.texture => range.end = end,
                _ => batches.push((sprite.texture, start..end)),
            }
        }

        // Recreate the buffer each frame (simple approach; could optimize)
        if !vertices.is_empty() {
            self.vertex_buffer =
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("sprite-vertices"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render-encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKDROP),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for (handle, range) in &batches {
                let texture = &self.textures[handle.0 as usize];
                render_pass.set_bind_group(0, &texture.bind_group, &[]);
                render_pass.draw(range.clone(), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
