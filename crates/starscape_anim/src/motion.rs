//! Simple time-driven motions: constant spin and vertical bobbing

use serde::{Serialize, Deserialize};
use starscape_math::Vec3;

/// Constant angular velocity about each axis (radians per second)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    pub rate: Vec3,
}

impl Spin {
    /// Spin about Y only
    pub fn about_y(rate: f32) -> Self {
        Self { rate: Vec3::new(0.0, rate, 0.0) }
    }

    /// Euler rotation at time `t`
    #[inline]
    pub fn rotation_at(&self, t: f32) -> Vec3 {
        self.rate * t
    }
}

/// Sinusoidal offset: `amplitude · sin(speed·t + phase)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    pub amplitude: f32,
    pub speed: f32,
    #[serde(default)]
    pub phase: f32,
}

impl Drift {
    pub fn new(amplitude: f32, speed: f32) -> Self {
        Self { amplitude, speed, phase: 0.0 }
    }

    #[inline]
    pub fn offset_at(&self, t: f32) -> f32 {
        self.amplitude * (self.speed * t + self.phase).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_linear_in_time() {
        let spin = Spin { rate: Vec3::new(0.1, 0.5, 0.0) };
        assert_eq!(spin.rotation_at(0.0), Vec3::ZERO);
        let r = spin.rotation_at(4.0);
        assert!((r.x - 0.4).abs() < 1e-6);
        assert!((r.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_drift_bounded() {
        let drift = Drift::new(0.5, 1.3);
        for i in 0..100 {
            assert!(drift.offset_at(i as f32 * 0.21).abs() <= 0.5 + 1e-6);
        }
        assert_eq!(drift.offset_at(0.0), 0.0);
    }
}
