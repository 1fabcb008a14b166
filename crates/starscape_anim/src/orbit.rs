//! Circular orbits in the XZ plane

use serde::{Serialize, Deserialize};
use starscape_math::Vec3;

/// A circular orbit around `center`
///
/// Position at time `t` is `center + (sin(ωt+φ)·r, height, cos(ωt+φ)·r)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// Angular speed ω in radians per second
    pub speed: f32,
    /// Orbit radius r
    pub radius: f32,
    /// Phase offset φ in radians
    #[serde(default)]
    pub phase: f32,
    /// Constant height above the orbit plane
    #[serde(default)]
    pub height: f32,
    /// Centre of the orbit
    #[serde(default)]
    pub center: Vec3,
}

impl Orbit {
    /// Create an orbit around the origin
    pub fn new(speed: f32, radius: f32) -> Self {
        Self {
            speed,
            radius,
            phase: 0.0,
            height: 0.0,
            center: Vec3::ZERO,
        }
    }

    /// Builder: set the phase offset
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Builder: set the constant height
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Builder: set the orbit centre
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Orbit angle at time `t`
    #[inline]
    pub fn angle_at(&self, t: f32) -> f32 {
        self.speed * t + self.phase
    }

    /// Position at time `t`
    ///
    /// A zero radius collapses to the centre (at `height`).
    pub fn position_at(&self, t: f32) -> Vec3 {
        let (sin, cos) = self.angle_at(t).sin_cos();
        self.center + Vec3::new(sin * self.radius, self.height, cos * self.radius)
    }

    /// Time for one full revolution, `None` for a stationary orbit
    pub fn period(&self) -> Option<f32> {
        if self.speed == 0.0 {
            None
        } else {
            Some(std::f32::consts::TAU / self.speed.abs())
        }
    }
}
