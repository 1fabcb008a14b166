//! Background starfield: a fixed star catalogue that slowly rotates

use rand::Rng;
use starscape_math::Vec3;

use crate::procedural::range;

/// A single background star
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarPoint {
    pub position: Vec3,
    pub size: f32,
    /// Brightness in `[0, 1]`
    pub brightness: f32,
    pub color: [f32; 3],
}

/// Star catalogue on a spherical shell plus its accumulated rotation
#[derive(Clone, Debug)]
pub struct Starfield {
    pub stars: Vec<StarPoint>,
    /// Rotation about Y in radians, kept in `[0, 2π)`
    pub rotation: f32,
    /// Radians per second at speed 1.0
    pub base_rate: f32,
}

impl Starfield {
    /// Scatter `count` stars uniformly over the shell between `inner` and `outer`
    pub fn generate(rng: &mut impl Rng, count: usize, inner: f32, outer: f32) -> Self {
        let stars = (0..count)
            .map(|_| {
                let theta = rng.random::<f32>() * std::f32::consts::TAU;
                let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
                let radius = range(rng, inner, outer);
                let direction = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

                // Many dim stars, few bright ones
                let brightness = rng.random::<f32>().powf(3.0);
                let warmth = rng.random::<f32>();
                let color = [
                    0.8 + 0.2 * warmth,
                    0.85 + 0.1 * brightness,
                    1.0 - 0.25 * warmth,
                ];

                StarPoint {
                    position: direction * radius,
                    size: 0.05 + brightness * 0.15,
                    brightness,
                    color,
                }
            })
            .collect();

        Self {
            stars,
            rotation: 0.0,
            base_rate: 0.02,
        }
    }

    /// Accumulate one frame of rotation at the given speed multiplier
    pub fn advance(&mut self, dt: f32, speed: f32) {
        if dt <= 0.0 {
            return;
        }
        self.rotation = (self.rotation + speed * dt * self.base_rate).rem_euclid(std::f32::consts::TAU);
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
