//! Wormhole funnel: rings that stream away from the viewer while active

use serde::{Serialize, Deserialize};
use starscape_math::{lerp, wrap01};

/// Pose of a single funnel ring relative to its rest position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingPose {
    /// Offset along the funnel axis (negative = deeper)
    pub depth: f32,
    /// Uniform scale factor applied to the ring's own radius
    pub scale: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

/// Funnel animator for a group of rings
///
/// Ring `i` travels with speed `base_speed / (i + 1)`. While active its
/// progress is `p = (t · speed) mod 1`; depth, scale and opacity all move
/// linearly with `p`. While inactive every ring holds the rest pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Funnel {
    pub base_speed: f32,
    /// Maximum travel distance D
    pub depth: f32,
    /// Scale reached at the end of the travel
    pub min_scale: f32,
    /// Opacity at rest and at the start of the travel
    pub base_opacity: f32,
}

impl Default for Funnel {
    fn default() -> Self {
        Self {
            base_speed: 0.5,
            depth: 10.0,
            min_scale: 0.2,
            base_opacity: 0.8,
        }
    }
}

impl Funnel {
    /// Speed of ring `index`
    #[inline]
    pub fn ring_speed(&self, index: usize) -> f32 {
        self.base_speed / (index as f32 + 1.0)
    }

    /// Progress of ring `index` at time `t`, always in `[0, 1)`
    pub fn progress(&self, index: usize, t: f32) -> f32 {
        wrap01(t * self.ring_speed(index))
    }

    /// The static, non-animated pose held while inactive
    pub fn rest_pose(&self) -> RingPose {
        RingPose {
            depth: 0.0,
            scale: 1.0,
            opacity: self.base_opacity,
        }
    }

    /// Pose of ring `index` at time `t`
    pub fn ring_pose(&self, index: usize, t: f32, active: bool) -> RingPose {
        if !active {
            return self.rest_pose();
        }

        let p = self.progress(index, t);
        RingPose {
            depth: -self.depth * p,
            scale: lerp(1.0, self.min_scale, p),
            opacity: self.base_opacity * (1.0 - p),
        }
    }
}
