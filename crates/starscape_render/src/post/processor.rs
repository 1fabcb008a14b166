//! GPU side of the post-processing chain
//!
//! Owns the HDR scene target, the depth buffer, two full-resolution
//! ping-pong targets and two half-resolution bloom targets. Bind groups are
//! rebuilt whenever the targets are resized.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::{PostChain, PostPass, PostUniforms};
use crate::pipeline::DEPTH_FORMAT;

/// Format of the scene and intermediate targets
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Image a pass reads from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Source {
    Scene,
    Ping,
    Pong,
    BloomA,
    BloomB,
}

/// Size-dependent textures and the bind groups that read them
struct Targets {
    size: (u32, u32),
    scene_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    ping_view: wgpu::TextureView,
    pong_view: wgpu::TextureView,
    bloom_a_view: wgpu::TextureView,
    bloom_b_view: wgpu::TextureView,
    bind_groups: HashMap<Source, wgpu::BindGroup>,
}

/// Runs a [`PostChain`] and presents the result
pub struct PostProcessor {
    chain: PostChain,
    pipelines: HashMap<PostPass, wgpu::RenderPipeline>,
    input_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    /// Stands in for the bloom image while the bloom targets are being written
    placeholder_view: wgpu::TextureView,
    targets: Option<Targets>,
}

impl PostProcessor {
    /// Create the processor for `chain`, presenting into `surface_format`
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, chain: PostChain) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let float_texture = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let input_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Input Layout"),
            entries: &[
                float_texture(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                float_texture(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Post Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &input_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Post Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/post.wgsl").into()),
        });

        let mut pipelines = HashMap::new();
        for pass in chain.plan() {
            let (entry_point, format) = match pass {
                PostPass::BloomExtract => ("fs_bloom_extract", HDR_FORMAT),
                PostPass::BloomBlurHorizontal => ("fs_blur_horizontal", HDR_FORMAT),
                PostPass::BloomBlurVertical => ("fs_blur_vertical", HDR_FORMAT),
                PostPass::BloomComposite => ("fs_bloom_composite", HDR_FORMAT),
                PostPass::Noise => ("fs_noise", HDR_FORMAT),
                PostPass::Vignette => ("fs_vignette", HDR_FORMAT),
                PostPass::DepthOfField => ("fs_depth_of_field", HDR_FORMAT),
                PostPass::Tonemap => ("fs_tonemap", surface_format),
            };
            let pipeline = create_fullscreen_pipeline(device, &pipeline_layout, &shader, entry_point, format);
            pipelines.insert(pass, pipeline);
        }

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Post Uniform Buffer"),
            contents: bytemuck::bytes_of(&PostUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Post Uniform Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let placeholder_view = create_target(device, "Post Placeholder", (1, 1), HDR_FORMAT, false);

        log::info!(
            "Post chain: {}",
            chain.effects().iter().map(|e| e.name()).collect::<Vec<_>>().join(" -> ")
        );

        Self {
            chain,
            pipelines,
            input_layout,
            uniform_buffer,
            uniform_bind_group,
            sampler,
            placeholder_view,
            targets: None,
        }
    }

    pub fn chain(&self) -> &PostChain {
        &self.chain
    }

    /// Ensure targets exist and match the surface size
    pub fn ensure_targets(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if self.targets.as_ref().is_some_and(|t| t.size == size) {
            return;
        }

        let half = ((size.0 / 2).max(1), (size.1 / 2).max(1));
        let scene_view = create_target(device, "HDR Scene Target", size, HDR_FORMAT, true);
        let depth_view = create_target(device, "Scene Depth", size, DEPTH_FORMAT, true);
        let ping_view = create_target(device, "Post Ping", size, HDR_FORMAT, true);
        let pong_view = create_target(device, "Post Pong", size, HDR_FORMAT, true);
        let bloom_a_view = create_target(device, "Bloom A", half, HDR_FORMAT, true);
        let bloom_b_view = create_target(device, "Bloom B", half, HDR_FORMAT, true);

        let mut bind_groups = HashMap::new();
        for (source, input, aux) in [
            (Source::Scene, &scene_view, &bloom_a_view),
            (Source::Ping, &ping_view, &bloom_a_view),
            (Source::Pong, &pong_view, &bloom_a_view),
            (Source::BloomA, &bloom_a_view, &self.placeholder_view),
            (Source::BloomB, &bloom_b_view, &self.placeholder_view),
        ] {
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Post Input Bind Group"),
                layout: &self.input_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(input),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(aux),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(&depth_view),
                    },
                ],
            });
            bind_groups.insert(source, bind_group);
        }

        log::debug!("Post targets resized to {}x{}", size.0, size.1);
        self.targets = Some(Targets {
            size,
            scene_view,
            depth_view,
            ping_view,
            pong_view,
            bloom_a_view,
            bloom_b_view,
            bind_groups,
        });
    }

    /// HDR colour and depth views the scene is drawn into
    pub fn scene_targets(&self) -> Option<(&wgpu::TextureView, &wgpu::TextureView)> {
        self.targets.as_ref().map(|t| (&t.scene_view, &t.depth_view))
    }

    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &PostUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Run every pass of the chain and tonemap into `output`
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        let Some(targets) = self.targets.as_ref() else {
            log::warn!("Post chain skipped: targets not created");
            return;
        };

        let mut current = Source::Scene;
        for pass in self.chain.plan() {
            let (source, target) = route(pass, current);
            let view = match target {
                Some(Source::Ping) => &targets.ping_view,
                Some(Source::Pong) => &targets.pong_view,
                Some(Source::BloomA) => &targets.bloom_a_view,
                Some(Source::BloomB) => &targets.bloom_b_view,
                Some(Source::Scene) => &targets.scene_view,
                None => output,
            };
            let (Some(pipeline), Some(bind_group)) = (self.pipelines.get(&pass), targets.bind_groups.get(&source)) else {
                continue;
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Post Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, bind_group, &[]);
            render_pass.draw(0..3, 0..1);
            drop(render_pass);

            if pass.writes_chain() {
                if let Some(target) = target {
                    current = target;
                }
            }
        }
    }
}

/// Input and output of `pass` given the image the chain currently holds;
/// `None` output means the presentation surface
fn route(pass: PostPass, current: Source) -> (Source, Option<Source>) {
    let next = if current == Source::Ping { Source::Pong } else { Source::Ping };
    match pass {
        PostPass::BloomExtract => (current, Some(Source::BloomA)),
        PostPass::BloomBlurHorizontal => (Source::BloomA, Some(Source::BloomB)),
        PostPass::BloomBlurVertical => (Source::BloomB, Some(Source::BloomA)),
        PostPass::BloomComposite | PostPass::Noise | PostPass::Vignette | PostPass::DepthOfField => {
            (current, Some(next))
        }
        PostPass::Tonemap => (current, None),
    }
}

fn create_target(
    device: &wgpu::Device,
    label: &str,
    size: (u32, u32),
    format: wgpu::TextureFormat,
    render_target: bool,
) -> wgpu::TextureView {
    let mut usage = wgpu::TextureUsages::TEXTURE_BINDING;
    if render_target {
        usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_fullscreen_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    entry_point: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(entry_point),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(entry_point),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostEffect;

    fn walk(chain: &PostChain) -> Vec<(Source, Option<Source>)> {
        let mut current = Source::Scene;
        let mut steps = Vec::new();
        for pass in chain.plan() {
            let step = route(pass, current);
            if pass.writes_chain() {
                if let Some(target) = step.1 {
                    current = target;
                }
            }
            steps.push(step);
        }
        steps
    }

    #[test]
    fn test_full_chain_routing() {
        let chain = PostChain::standard(
            PostEffect::Bloom { threshold: 0.2, smoothing: 0.9, intensity: 1.5 },
            PostEffect::Noise { opacity: 0.02 },
            PostEffect::Vignette { darkness: 1.1, offset: 0.1 },
            PostEffect::DepthOfField { focus_distance: 0.0, focal_length: 0.02, bokeh_scale: 2.0 },
        );
        assert_eq!(
            walk(&chain),
            vec![
                (Source::Scene, Some(Source::BloomA)),
                (Source::BloomA, Some(Source::BloomB)),
                (Source::BloomB, Some(Source::BloomA)),
                (Source::Scene, Some(Source::Ping)),
                (Source::Ping, Some(Source::Pong)),
                (Source::Pong, Some(Source::Ping)),
                (Source::Ping, Some(Source::Pong)),
                (Source::Pong, None),
            ]
        );
    }

    #[test]
    fn test_empty_chain_tonemaps_scene() {
        assert_eq!(walk(&PostChain::default()), vec![(Source::Scene, None)]);
    }

    #[test]
    fn test_each_stage_reads_previous_output() {
        let chain = PostChain::new([
            PostEffect::Noise { opacity: 0.1 },
            PostEffect::Vignette { darkness: 1.0, offset: 0.5 },
        ]);
        let steps = walk(&chain);
        for pair in steps.windows(2) {
            assert_eq!(pair[1].0, pair[0].1.unwrap());
        }
    }
}
