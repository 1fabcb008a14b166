//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Starfield and mesh passes into the HDR scene target
//! - The post-processing chain onto the surface

use std::sync::Arc;
use winit::window::Window;
use starscape_core::{ActiveScene, TextureData};
use starscape_render::{
    context::{ContextError, RenderContext},
    pipeline::{MeshPipeline, SceneUniforms, StarPipeline},
    post::{PostProcessor, HDR_FORMAT},
    Camera3D, DrawList, PostChain, TextureState,
};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(format!("{:?}", other)),
        }
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    stars: StarPipeline,
    meshes: MeshPipeline,
    post: PostProcessor,
    background: wgpu::Color,
    light_position: [f32; 3],
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(
        window: Arc<Window>,
        chain: PostChain,
        background: [f32; 3],
        vsync: bool,
    ) -> Result<Self, ContextError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let stars = StarPipeline::new(&context.device, HDR_FORMAT);
        let meshes = MeshPipeline::new(&context.device, &context.queue, HDR_FORMAT);
        log::info!(
            "Post chain: {}",
            chain.effects().iter().map(|e| e.name()).collect::<Vec<_>>().join(" -> ")
        );
        let mut post = PostProcessor::new(&context.device, context.config.format, chain);
        post.ensure_targets(&context.device, context.size.width, context.size.height);

        Ok(Self {
            context,
            stars,
            meshes,
            post,
            background: wgpu::Color {
                r: background[0] as f64,
                g: background[1] as f64,
                b: background[2] as f64,
                a: 1.0,
            },
            light_position: [0.0; 3],
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.post.ensure_targets(&self.context.device, width, height);
    }

    /// Reapply the surface configuration after it was lost
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Upload the star catalogue to GPU
    pub fn upload_starfield(&mut self, scene: &ActiveScene) {
        self.stars.upload(&self.context.device, &scene.starfield);
    }

    /// Upload the surface texture once it has loaded
    pub fn set_texture(&mut self, data: &TextureData) {
        self.meshes.set_texture(&self.context.device, &self.context.queue, data);
    }

    /// Render a single frame
    pub fn render_frame(
        &mut self,
        scene: &ActiveScene,
        camera: &Camera3D,
        texture: TextureState,
    ) -> Result<(), RenderError> {
        let aspect = self.context.aspect_ratio();
        let view_proj = camera.view_projection(aspect);
        let pose = camera.pose();
        let eye = camera.eye();

        // Update per-frame uniforms
        self.stars.update_uniforms(&self.context.queue, view_proj, scene.starfield.rotation, &pose);
        self.meshes.update_uniforms(
            &self.context.queue,
            &SceneUniforms {
                view_proj,
                camera_position: eye.to_array(),
                time: scene.elapsed(),
                light_position: self.light_position,
                ..SceneUniforms::default()
            },
        );
        let (width, height) = self.size();
        let post_uniforms = self.post.chain().uniforms(width, height, camera.near, camera.far, scene.elapsed());
        self.post.update_uniforms(&self.context.queue, &post_uniforms);

        // Build and upload instances
        let draw_list = DrawList::build(&scene.world, eye, texture);
        self.meshes.prepare(&self.context.device, &self.context.queue, &draw_list);

        // Get surface texture
        let output = self.context.surface.get_current_texture()?;

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Create command encoder
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (hdr_view, depth_view) = self
                .post
                .scene_targets()
                .ok_or_else(|| RenderError::Other("scene targets missing".to_string()))?;

            // Stars clear the scene, meshes draw over them
            self.stars.render(&mut encoder, hdr_view, self.background);
            self.meshes.render(&mut encoder, hdr_view, depth_view);
        }

        // Post chain onto the surface
        self.post.render(&mut encoder, &view);

        // Submit
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }

    /// Width over height of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }
}
