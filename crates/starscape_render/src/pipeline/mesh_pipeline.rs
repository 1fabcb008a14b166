//! Instanced mesh pipeline
//!
//! Draws a [`DrawList`] into the HDR scene target: opaque batches first with
//! depth writes, then transparent batches alpha-blended without depth writes.
//! The colour and depth targets belong to the post processor.
//! One mesh is uploaded per distinct shape and kept for the lifetime of the
//! pipeline.

use std::collections::HashMap;

use starscape_core::TextureData;
use wgpu::util::DeviceExt;

use super::types::{InstanceData, MeshVertex, SceneUniforms};
use crate::mesh::{MeshData, ShapeKey};
use crate::renderable::{DrawBatch, DrawList};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Initial instance capacity; the buffer doubles when exceeded
const INITIAL_INSTANCE_CAPACITY: usize = 256;

/// Mesh resident on the GPU
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// A batch resolved to its slice of the instance buffer
struct PreparedBatch {
    key: ShapeKey,
    first_instance: u32,
    instance_count: u32,
}

/// Render pipeline for entities and parts
pub struct MeshPipeline {
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    /// Keeps the bound surface texture alive
    _surface_texture: wgpu::Texture,
    meshes: HashMap<ShapeKey, GpuMesh>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    opaque: Vec<PreparedBatch>,
    transparent: Vec<PreparedBatch>,
}

impl MeshPipeline {
    /// Create the pipeline rendering into `target_format`
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, target_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
            entries: &[
                // Scene uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Surface texture
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader_source = include_str!("../shaders/mesh.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let opaque_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            target_format,
            None,
            true,
            "Opaque Mesh Pipeline",
        );
        let transparent_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            target_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
            "Transparent Mesh Pipeline",
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Surface Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // White until the surface texture resolves
        let surface_texture = upload_texture(device, queue, &TextureData::solid([255, 255, 255, 255]));
        let bind_group = Self::create_bind_group(device, &bind_group_layout, &uniform_buffer, &surface_texture, &sampler);

        let instance_buffer = create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY);

        Self {
            opaque_pipeline,
            transparent_pipeline,
            bind_group_layout,
            uniform_buffer,
            bind_group,
            sampler,
            _surface_texture: surface_texture,
            meshes: HashMap::new(),
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            opaque: Vec::new(),
            transparent: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        target_format: wgpu::TextureFormat,
        blend: Option<wgpu::BlendState>,
        depth_write_enabled: bool,
        label: &str,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::vertex_buffer_layout(), Self::instance_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Rings and panels are seen from both sides
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        texture: &wgpu::Texture,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
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

    /// Get the vertex buffer layout for MeshVertex
    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                // normal: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                // uv: vec2<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        }
    }

    /// Get the per-instance buffer layout for InstanceData
    fn instance_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // model matrix columns
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 3,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 4,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 32,
                    shader_location: 5,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 48,
                    shader_location: 6,
                },
                // color
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 64,
                    shader_location: 7,
                },
                // emissive + textured flag
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 80,
                    shader_location: 8,
                },
            ],
        }
    }

    /// Update uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Bind the surface texture sampled by textured materials
    pub fn set_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &TextureData) {
        let texture = upload_texture(device, queue, data);
        self.bind_group = Self::create_bind_group(
            device,
            &self.bind_group_layout,
            &self.uniform_buffer,
            &texture,
            &self.sampler,
        );
        self._surface_texture = texture;
        log::info!("Surface texture bound ({}x{})", data.width, data.height);
    }

    /// Upload missing meshes and this frame's instances
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, list: &DrawList) {
        for shape in list.shapes() {
            let key = ShapeKey::from(*shape);
            self.meshes.entry(key).or_insert_with(|| {
                let mesh = MeshData::for_shape(shape);
                log::debug!("Uploading mesh for {:?}: {} triangles", shape, mesh.triangle_count());
                upload_mesh(device, &mesh)
            });
        }

        let total = list.instance_count();
        if total > self.instance_capacity {
            self.instance_capacity = total.next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
        }

        let mut instances: Vec<InstanceData> = Vec::with_capacity(total);
        self.opaque = prepare_batches(&list.opaque, &mut instances);
        self.transparent = prepare_batches(&list.transparent, &mut instances);
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
    }

    /// Draw the prepared batches over whatever `view` already holds
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, depth_view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        render_pass.set_pipeline(&self.opaque_pipeline);
        self.draw_batches(&mut render_pass, &self.opaque);
        render_pass.set_pipeline(&self.transparent_pipeline);
        self.draw_batches(&mut render_pass, &self.transparent);
    }

    fn draw_batches(&self, render_pass: &mut wgpu::RenderPass<'_>, batches: &[PreparedBatch]) {
        for batch in batches {
            let Some(mesh) = self.meshes.get(&batch.key) else {
                continue;
            };
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            let instances = batch.first_instance..batch.first_instance + batch.instance_count;
            render_pass.draw_indexed(0..mesh.index_count, 0, instances);
        }
    }

    /// Number of distinct meshes uploaded so far
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

fn prepare_batches(batches: &[DrawBatch], instances: &mut Vec<InstanceData>) -> Vec<PreparedBatch> {
    batches
        .iter()
        .map(|batch| {
            let first_instance = instances.len() as u32;
            instances.extend_from_slice(&batch.instances);
            PreparedBatch {
                key: batch.key,
                first_instance,
                instance_count: batch.instances.len() as u32,
            }
        })
        .collect()
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Instance Buffer"),
        size: (capacity * std::mem::size_of::<InstanceData>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn upload_mesh(device: &wgpu::Device, mesh: &MeshData) -> GpuMesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Vertex Buffer"),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Index Buffer"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.index_count() as u32,
    }
}

fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, data: &TextureData) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: data.width.max(1),
        height: data.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Surface Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
        &data.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size.width),
            rows_per_image: Some(size.height),
        },
        size,
    );
    texture
}

#[cfg(test)]
mod tests {
    use super::*;
    use starscape_core::Shape;
    use starscape_math::mat4;

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layout = MeshPipeline::vertex_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<MeshVertex>() as u64);
    }

    #[test]
    fn test_instance_layout_covers_instance_data() {
        let layout = MeshPipeline::instance_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<InstanceData>() as u64);
        let last = layout.attributes.last().unwrap();
        assert_eq!(last.offset + 16, layout.array_stride);
    }

    #[test]
    fn test_prepare_batches_offsets() {
        let instance = InstanceData {
            model: mat4::IDENTITY,
            ..Default::default()
        };
        let batches = vec![
            DrawBatch {
                shape: Shape::sphere(1.0),
                key: ShapeKey::from(Shape::sphere(1.0)),
                instances: vec![instance; 3],
            },
            DrawBatch {
                shape: Shape::plane(1.0, 1.0),
                key: ShapeKey::from(Shape::plane(1.0, 1.0)),
                instances: vec![instance; 2],
            },
        ];
        let mut instances = vec![instance];
        let prepared = prepare_batches(&batches, &mut instances);
        assert_eq!(instances.len(), 6);
        assert_eq!(prepared[0].first_instance, 1);
        assert_eq!(prepared[1].first_instance, 4);
        assert_eq!(prepared[1].instance_count, 2);
    }
}
