//! GPU-side consumer of the synchronized attribute buffers.
//!
//! Holds one vertex-buffer set per population (position/size/alpha, all
//! instance-stepped) and a single pipeline drawing each particle as a
//! 6-vertex quad with a round-sprite fragment. Uploads are gated on the
//! staging buffers' dirty flags: positions every frame, size/alpha only
//! after a range-change command rewrote them.

use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::buffers::VertexAttributes;
use crate::engine::Engine;
use crate::error::GpuError;
use crate::shader::{Uniforms, SHADER_SOURCE};

/// GPU buffers mirroring one population's staging attributes.
struct PopulationBuffers {
    positions: wgpu::Buffer,
    sizes: wgpu::Buffer,
    alphas: wgpu::Buffer,
    count: u32,
}

impl PopulationBuffers {
    /// Create the buffer set from the current staging contents, consuming
    /// their dirty flags (the init upload already carried the data).
    fn new(device: &wgpu::Device, attrs: &mut VertexAttributes, label: &str) -> Self {
        let make = |name: &str, data: &[f32]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} {name} Buffer")),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        };
        let positions = make("Position", attrs.positions.as_slice());
        let sizes = make("Size", attrs.sizes.as_slice());
        let alphas = make("Alpha", attrs.alphas.as_slice());
        attrs.positions.take_dirty();
        attrs.sizes.take_dirty();
        attrs.alphas.take_dirty();

        Self {
            positions,
            sizes,
            alphas,
            count: attrs.count() as u32,
        }
    }

    /// Write whatever staging arrays are dirty.
    fn upload(&self, queue: &wgpu::Queue, attrs: &mut VertexAttributes) {
        if attrs.positions.take_dirty() {
            queue.write_buffer(
                &self.positions,
                0,
                bytemuck::cast_slice(attrs.positions.as_slice()),
            );
        }
        if attrs.sizes.take_dirty() {
            queue.write_buffer(&self.sizes, 0, bytemuck::cast_slice(attrs.sizes.as_slice()));
        }
        if attrs.alphas.take_dirty() {
            queue.write_buffer(
                &self.alphas,
                0,
                bytemuck::cast_slice(attrs.alphas.as_slice()),
            );
        }
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        render_pass.set_vertex_buffer(0, self.positions.slice(..));
        render_pass.set_vertex_buffer(1, self.sizes.slice(..));
        render_pass.set_vertex_buffer(2, self.alphas.slice(..));
        render_pass.draw(0..6, 0..self.count);
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    anchored: Option<PopulationBuffers>,
    free: PopulationBuffers,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, engine: &mut Engine) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                ..Default::default()
            })
            .await?;

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
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniforms = Uniforms {
            view_proj: engine.viewport().view_proj().to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Render Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        // One attribute-parallel buffer per vertex attribute, all stepped
        // per instance.
        let vertex_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                }],
            },
        ];

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_layouts,
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
            // All particles live on the z = 0 plane; alpha blending without
            // a depth buffer avoids sorting artifacts between sprites.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let free = PopulationBuffers::new(&device, engine.free_mut().attributes_mut(), "Free");
        let anchored = engine
            .anchored_mut()
            .map(|pop| PopulationBuffers::new(&device, pop.attributes_mut(), "Anchored"));

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            uniform_buffer,
            uniform_bind_group,
            anchored,
            free,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Bring the GPU buffers in line with the engine's staging state:
    /// create the anchored set once the shape has loaded, rebuild the free
    /// set when its count changed, and upload whatever is dirty.
    pub fn sync(&mut self, engine: &mut Engine) {
        if let Some(pop) = engine.anchored_mut() {
            match &self.anchored {
                Some(buffers) if buffers.count as usize == pop.len() => {
                    buffers.upload(&self.queue, pop.attributes_mut());
                }
                _ => {
                    self.anchored = Some(PopulationBuffers::new(
                        &self.device,
                        pop.attributes_mut(),
                        "Anchored",
                    ));
                }
            }
        }

        let free = engine.free_mut();
        if self.free.count as usize != free.len() {
            self.free = PopulationBuffers::new(&self.device, free.attributes_mut(), "Free");
        } else {
            self.free.upload(&self.queue, free.attributes_mut());
        }
    }

    pub fn render(&mut self, view_proj: Mat4) -> Result<(), wgpu::SurfaceError> {
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            self.free.draw(&mut render_pass);
            if let Some(anchored) = &self.anchored {
                anchored.draw(&mut render_pass);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
