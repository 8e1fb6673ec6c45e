use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use wgpu::util::DeviceExt;

use crate::error::{Result, VizError};
use crate::renderer::camera::CameraUniform;
use crate::renderer::overlay::Overlay;
use crate::scene::graph::{NodeKind, SceneGraph};
use crate::scene::surface::{
    FrameUniforms, GeometryData, GeometryHandle, Material, MaterialHandle, RenderSurface,
    SurfaceSize, Topology,
};

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    color: [f32; 4],
    // x: lit flag
    params: [f32; 4],
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    normal_buffer: wgpu::Buffer,
    index_buffer: Option<(wgpu::Buffer, u32)>,
    vertex_count: u32,
    topology: Topology,
}

struct GpuMaterial {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct Pipelines {
    opaque: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
    line_strip: wgpu::RenderPipeline,
    line_list: wgpu::RenderPipeline,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DrawPass {
    Opaque,
    Lines,
    Transparent,
}

pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub overlay: Overlay,

    pipelines: Pipelines,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    depth_texture: wgpu::TextureView,

    geometries: HashMap<GeometryHandle, GpuGeometry>,
    materials: HashMap<MaterialHandle, GpuMaterial>,
    next_handle: u64,
}

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

fn normal_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    topology: wgpu::PrimitiveTopology,
    depth_write_enabled: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[position_layout(), normal_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl GpuState {
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(VizError::AdapterUnavailable)?;
        info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(VizError::AdapterUnavailable)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[uniform_entry(0)],
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[uniform_entry(0)],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let format = config.format;
        let pipelines = Pipelines {
            opaque: create_pipeline(&device, &layout, &shader, format, "Opaque Mesh Pipeline", wgpu::PrimitiveTopology::TriangleList, true),
            transparent: create_pipeline(&device, &layout, &shader, format, "Transparent Mesh Pipeline", wgpu::PrimitiveTopology::TriangleList, false),
            line_strip: create_pipeline(&device, &layout, &shader, format, "Line Strip Pipeline", wgpu::PrimitiveTopology::LineStrip, true),
            line_list: create_pipeline(&device, &layout, &shader, format, "Line List Pipeline", wgpu::PrimitiveTopology::LineList, true),
        };

        let depth_texture = Self::create_depth_texture(&device, &config);
        let overlay = Overlay::new(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            overlay,
            pipelines,
            camera_buffer,
            camera_bind_group,
            material_layout,
            depth_texture,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            next_handle: 0,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn next_id(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn live_resources(&self) -> (usize, usize) {
        (self.geometries.len(), self.materials.len())
    }

    fn pipeline_for(&self, topology: Topology, transparent: bool) -> &wgpu::RenderPipeline {
        match topology {
            Topology::Triangles if transparent => &self.pipelines.transparent,
            Topology::Triangles => &self.pipelines.opaque,
            Topology::LineStrip => &self.pipelines.line_strip,
            Topology::LineList => &self.pipelines.line_list,
        }
    }

    fn draw_scene(&self, scene: &SceneGraph, frame: &FrameUniforms, view: &wgpu::TextureView, encoder: &mut wgpu::CommandEncoder) {
        let [r, g, b, a] = frame.clear_color.map(f64::from);
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let vp = frame.viewport;
        let max_w = self.config.width as f32;
        let max_h = self.config.height as f32;
        let x = vp.x.clamp(0.0, max_w - 1.0);
        let y = vp.y.clamp(0.0, max_h - 1.0);
        render_pass.set_viewport(x, y, vp.width.min(max_w - x).max(1.0), vp.height.min(max_h - y).max(1.0), 0.0, 1.0);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        // Opaque first, then lines, then blended meshes without depth writes.
        for pass in [DrawPass::Opaque, DrawPass::Lines, DrawPass::Transparent] {
            for node in scene.nodes() {
                let NodeKind::Drawable {
                    geometry,
                    material,
                    topology,
                    transparent,
                } = node.kind
                else {
                    continue;
                };
                let node_pass = match topology {
                    Topology::Triangles if transparent => DrawPass::Transparent,
                    Topology::Triangles => DrawPass::Opaque,
                    Topology::LineStrip | Topology::LineList => DrawPass::Lines,
                };
                if node_pass != pass {
                    continue;
                }
                let (Some(geo), Some(mat)) = (self.geometries.get(&geometry), self.materials.get(&material)) else {
                    continue;
                };
                if geo.vertex_count == 0 {
                    continue;
                }

                render_pass.set_pipeline(self.pipeline_for(geo.topology, transparent));
                render_pass.set_bind_group(1, &mat.bind_group, &[]);
                render_pass.set_vertex_buffer(0, geo.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, geo.normal_buffer.slice(..));
                match &geo.index_buffer {
                    Some((buffer, count)) => {
                        render_pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    None => render_pass.draw(0..geo.vertex_count, 0..1),
                }
            }
        }
    }
}

impl RenderSurface for GpuState {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.config.width, self.config.height)
    }

    fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.size = winit::dpi::PhysicalSize::new(size.width, size.height);
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
    }

    fn create_geometry(&mut self, data: GeometryData<'_>) -> GeometryHandle {
        let handle = GeometryHandle(self.next_id());
        let zero_normals;
        let normals = if data.normals.len() == data.positions.len() {
            data.normals
        } else {
            zero_normals = vec![[0.0f32; 3]; data.positions.len()];
            &zero_normals[..]
        };

        // Buffers may not be empty; pad with one vertex that is never drawn.
        let pad = [[0.0f32; 3]];
        let positions = if data.positions.is_empty() { &pad[..] } else { data.positions };
        let normals = if normals.is_empty() { &pad[..] } else { normals };

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Vertex Buffer"),
            contents: bytemuck::cast_slice(positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let normal_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Normal Buffer"),
            contents: bytemuck::cast_slice(normals),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = (!data.indices.is_empty()).then(|| {
            let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Geometry Index Buffer"),
                contents: bytemuck::cast_slice(data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            (buffer, data.indices.len() as u32)
        });

        self.geometries.insert(
            handle,
            GpuGeometry {
                vertex_buffer,
                normal_buffer,
                index_buffer,
                vertex_count: data.positions.len() as u32,
                topology: data.topology,
            },
        );
        handle
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if let Some(geo) = self.geometries.remove(&handle) {
            geo.vertex_buffer.destroy();
            geo.normal_buffer.destroy();
            if let Some((buffer, _)) = geo.index_buffer {
                buffer.destroy();
            }
        }
    }

    fn create_material(&mut self, material: &Material) -> MaterialHandle {
        let handle = MaterialHandle(self.next_id());
        let uniform = MaterialUniform {
            color: material.color,
            params: [if material.lit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        };
        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        self.materials.insert(
            handle,
            GpuMaterial {
                uniform_buffer,
                bind_group,
            },
        );
        handle
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        if let Some(mat) = self.materials.remove(&handle) {
            mat.uniform_buffer.destroy();
        }
    }

    fn render(&mut self, scene: &SceneGraph, frame: &FrameUniforms) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(VizError::OutOfMemory);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("surface timeout, skipping frame");
                return Ok(());
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniform = CameraUniform::new(frame.view_proj, frame.light_dir);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        self.draw_scene(scene, frame, &view, &mut encoder);
        self.overlay.paint(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            [self.config.width, self.config.height],
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
