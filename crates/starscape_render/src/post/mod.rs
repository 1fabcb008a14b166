//! Post-processing chain
//!
//! The chain is a fixed ordered stack applied to the HDR scene image:
//! bloom, then noise, then vignette, then depth of field. Each stage reads
//! the previous stage's output. Effects may be left out, but the ones present
//! always run in that order, and the chain cannot change once built.

mod processor;

pub use processor::{PostProcessor, HDR_FORMAT};

use bytemuck::{Pod, Zeroable};

/// One configured effect
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PostEffect {
    /// Glow around pixels brighter than `threshold`
    Bloom {
        /// Luminance where bloom starts
        threshold: f32,
        /// Width of the soft ramp above the threshold
        smoothing: f32,
        intensity: f32,
    },
    /// Film grain
    Noise { opacity: f32 },
    /// Darkened corners
    Vignette { darkness: f32, offset: f32 },
    /// Blur by distance from the focal plane
    DepthOfField {
        /// Normalized view depth in focus, `0` at the near plane, `1` at the far plane
        focus_distance: f32,
        /// Normalized depth range that stays sharp
        focal_length: f32,
        /// Largest blur radius in pixels
        bokeh_scale: f32,
    },
}

impl PostEffect {
    /// Position in the fixed stack
    pub fn stage(&self) -> usize {
        match self {
            PostEffect::Bloom { .. } => 0,
            PostEffect::Noise { .. } => 1,
            PostEffect::Vignette { .. } => 2,
            PostEffect::DepthOfField { .. } => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PostEffect::Bloom { .. } => "bloom",
            PostEffect::Noise { .. } => "noise",
            PostEffect::Vignette { .. } => "vignette",
            PostEffect::DepthOfField { .. } => "depth of field",
        }
    }

    /// GPU passes this effect expands to
    fn passes(&self) -> &'static [PostPass] {
        match self {
            PostEffect::Bloom { .. } => &[
                PostPass::BloomExtract,
                PostPass::BloomBlurHorizontal,
                PostPass::BloomBlurVertical,
                PostPass::BloomComposite,
            ],
            PostEffect::Noise { .. } => &[PostPass::Noise],
            PostEffect::Vignette { .. } => &[PostPass::Vignette],
            PostEffect::DepthOfField { .. } => &[PostPass::DepthOfField],
        }
    }
}

/// A single fullscreen pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostPass {
    /// Scene to half-resolution bright pass
    BloomExtract,
    BloomBlurHorizontal,
    BloomBlurVertical,
    /// Adds the blurred bright pass onto the chain image
    BloomComposite,
    Noise,
    Vignette,
    DepthOfField,
    /// HDR to the display surface
    Tonemap,
}

impl PostPass {
    /// True if the pass advances the main chain image (ping-pong)
    pub fn writes_chain(&self) -> bool {
        !matches!(
            self,
            PostPass::BloomExtract | PostPass::BloomBlurHorizontal | PostPass::BloomBlurVertical | PostPass::Tonemap
        )
    }
}

/// Ordered, immutable effect stack
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostChain {
    effects: Vec<PostEffect>,
}

impl PostChain {
    /// Build a chain; effects are put into stack order and a repeated effect
    /// replaces the earlier one
    pub fn new(effects: impl IntoIterator<Item = PostEffect>) -> Self {
        let mut slots: [Option<PostEffect>; 4] = [None; 4];
        for effect in effects {
            if slots[effect.stage()].replace(effect).is_some() {
                log::warn!("Post effect '{}' configured twice; keeping the last", effect.name());
            }
        }
        Self {
            effects: slots.into_iter().flatten().collect(),
        }
    }

    /// The full stack with every effect present
    pub fn standard(bloom: PostEffect, noise: PostEffect, vignette: PostEffect, depth_of_field: PostEffect) -> Self {
        Self::new([bloom, noise, vignette, depth_of_field])
    }

    /// Effects in the order they run
    pub fn effects(&self) -> &[PostEffect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// GPU passes in execution order, ending with the tonemap to the surface
    pub fn plan(&self) -> Vec<PostPass> {
        let mut passes: Vec<PostPass> = self.effects.iter().flat_map(|e| e.passes().iter().copied()).collect();
        passes.push(PostPass::Tonemap);
        passes
    }

    /// Shader parameters for a frame
    pub fn uniforms(&self, width: u32, height: u32, near: f32, far: f32, time: f32) -> PostUniforms {
        let mut uniforms = PostUniforms {
            screen: [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32, near, far],
            ..Default::default()
        };
        uniforms.noise[1] = time;
        for effect in &self.effects {
            match *effect {
                PostEffect::Bloom { threshold, smoothing, intensity } => {
                    uniforms.bloom = [threshold, smoothing.max(1e-4), intensity, 0.0];
                }
                PostEffect::Noise { opacity } => {
                    uniforms.noise[0] = opacity.clamp(0.0, 1.0);
                }
                PostEffect::Vignette { darkness, offset } => {
                    uniforms.vignette = [darkness, offset, 0.0, 0.0];
                }
                PostEffect::DepthOfField { focus_distance, focal_length, bokeh_scale } => {
                    uniforms.depth_of_field = [focus_distance, focal_length.max(1e-4), bokeh_scale.max(0.0), 0.0];
                }
            }
        }
        uniforms
    }
}

/// GPU uniform for the post passes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PostUniforms {
    /// threshold, smoothing, intensity, unused
    pub bloom: [f32; 4],
    /// opacity, time, unused, unused
    pub noise: [f32; 4],
    /// darkness, offset, unused, unused
    pub vignette: [f32; 4],
    /// focus distance, focal length, bokeh scale, unused
    pub depth_of_field: [f32; 4],
    /// 1/width, 1/height, near, far
    pub screen: [f32; 4],
}
