//! Procedural placement for asteroid fields and ring layouts
//!
//! Everything is drawn once from a [`ChaCha8Rng`] at construction and held
//! immutably afterwards. Passing the same seed reproduces the same layout.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Serialize, Deserialize};
use starscape_math::Vec3;

use crate::Orbit;

/// Build the generator for a scene; `None` draws the seed from OS entropy
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Uniform sample in `[lo, hi)`; collapses to `lo` for an empty range
pub fn range(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// One rock of an asteroid field
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub orbit: Orbit,
    /// Uniform size of the rock
    pub size: f32,
    /// Tumble rate about each axis (radians per second)
    pub tumble: Vec3,
}

impl Asteroid {
    pub fn position_at(&self, t: f32) -> Vec3 {
        self.orbit.position_at(t)
    }

    pub fn rotation_at(&self, t: f32) -> Vec3 {
        self.tumble * t
    }
}

/// Shape of a generated asteroid belt
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidFieldParams {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Total vertical spread of the belt
    pub thickness: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for AsteroidFieldParams {
    fn default() -> Self {
        Self {
            count: 60,
            inner_radius: 14.0,
            outer_radius: 18.0,
            thickness: 1.2,
            min_size: 0.05,
            max_size: 0.25,
            min_speed: 0.02,
            max_speed: 0.08,
        }
    }
}

impl AsteroidFieldParams {
    /// Generate the belt; every rock gets its own radius, phase, height and speed
    pub fn generate(&self, rng: &mut impl Rng) -> Vec<Asteroid> {
        let half = self.thickness.max(0.0) * 0.5;
        (0..self.count)
            .map(|_| {
                let radius = range(rng, self.inner_radius, self.outer_radius);
                let speed = range(rng, self.min_speed, self.max_speed);
                let phase = range(rng, 0.0, std::f32::consts::TAU);
                let height = range(rng, -half, half);
                let size = range(rng, self.min_size, self.max_size);
                let tumble = Vec3::new(
                    range(rng, -1.0, 1.0),
                    range(rng, -1.0, 1.0),
                    range(rng, -1.0, 1.0),
                );
                Asteroid {
                    orbit: Orbit::new(speed, radius).with_phase(phase).with_height(height),
                    size,
                    tumble,
                }
            })
            .collect()
    }
}

/// Radii for `count` concentric rings: `base + i·step`, each jittered by up to `±jitter`
///
/// Radii never drop below zero.
pub fn ring_radii(count: usize, base: f32, step: f32, jitter: f32, rng: &mut impl Rng) -> Vec<f32> {
    let jitter = jitter.abs();
    (0..count)
        .map(|i| {
            let r = base + i as f32 * step + range(rng, -jitter, jitter);
            r.max(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let params = AsteroidFieldParams::default();
        let a = params.generate(&mut seeded_rng(Some(7)));
        let b = params.generate(&mut seeded_rng(Some(7)));
        assert_eq!(a, b);

        let c = params.generate(&mut seeded_rng(Some(8)));
        assert_ne!(a, c);
    }

    #[test]
    fn test_field_within_bounds() {
        let params = AsteroidFieldParams::default();
        let field = params.generate(&mut seeded_rng(Some(42)));
        assert_eq!(field.len(), params.count);

        for rock in &field {
            assert!(rock.orbit.radius >= params.inner_radius && rock.orbit.radius < params.outer_radius);
            assert!(rock.size >= params.min_size && rock.size < params.max_size);
            assert!(rock.orbit.height.abs() <= params.thickness * 0.5);

            // Every rock keeps its own radius over time
            let p = rock.position_at(37.0);
            let r2 = p.x * p.x + p.z * p.z;
            assert!((r2 - rock.orbit.radius * rock.orbit.radius).abs() < 1e-2);
        }
    }

    #[test]
    fn test_degenerate_ranges_collapse() {
        let params = AsteroidFieldParams {
            count: 5,
            inner_radius: 3.0,
            outer_radius: 3.0,
            thickness: 0.0,
            min_size: 0.1,
            max_size: 0.1,
            min_speed: 0.5,
            max_speed: 0.1,
        };
        for rock in params.generate(&mut seeded_rng(Some(1))) {
            assert_eq!(rock.orbit.radius, 3.0);
            assert_eq!(rock.orbit.height, 0.0);
            assert_eq!(rock.size, 0.1);
            assert_eq!(rock.orbit.speed, 0.5);
        }
    }

    #[test]
    fn test_ring_radii_increase_and_stay_positive() {
        let mut rng = seeded_rng(Some(3));
        let radii = ring_radii(8, 1.0, 0.5, 0.1, &mut rng);
        assert_eq!(radii.len(), 8);
        for (i, r) in radii.iter().enumerate() {
            let nominal = 1.0 + i as f32 * 0.5;
            assert!((r - nominal).abs() <= 0.1 + 1e-6);
        }

        let clamped = ring_radii(3, 0.0, 0.0, 1.0, &mut rng);
        assert!(clamped.iter().all(|r| *r >= 0.0));
    }

    #[test]
    fn test_unseeded_rng_generates() {
        let field = AsteroidFieldParams { count: 4, ..Default::default() }.generate(&mut seeded_rng(None));
        assert_eq!(field.len(), 4);
    }
}
