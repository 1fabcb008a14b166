//! Per-entity behaviours
//!
//! A [`Behavior`] turns elapsed time, the entity's own parameters and its own
//! interaction state into a transform (and, for groups, part transforms).

use serde::{Serialize, Deserialize};
use starscape_anim::{Asteroid, Drift, Funnel, Interaction, Orbit, PanelFollow, Pulse, Spin};
use starscape_math::Vec3;

use crate::entity::{Material, Part};
use crate::frame::FrameContext;
use crate::shapes::Shape;
use crate::Transform3D;

/// Custom per-frame hook for motion the built-in behaviours do not cover
pub trait Animator: Send {
    fn animate(&mut self, ctx: &FrameContext, interaction: &Interaction, transform: &mut Transform3D);
}

/// What an entity does each frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Transform never changes
    #[default]
    Static,
    /// Circles a fixed centre while spinning (moons, moon systems)
    Orbiter { orbit: Orbit, spin: Spin },
    /// Spins in place (planets, black hole core)
    Spinner { spin: Spin },
    /// Uniform scale pulsation; speeds up while hovered
    Pulsar { pulse: Pulse, base_scale: f32 },
    /// Parts are funnel rings that stream away while selected
    Wormhole { funnel: Funnel },
    /// Parts are rocks, each on its own orbit
    AsteroidField { asteroids: Vec<Asteroid> },
    /// Bobs around an anchor point while spinning (nebula clouds)
    Drifter { anchor: Vec3, drift: Drift, spin: Spin },
    /// Follows the camera; expands while selected
    Panel {
        follow: PanelFollow,
        /// Current uniform scale
        scale: f32,
    },
}

impl Behavior {
    /// Panel behaviour starting at the collapsed size
    pub fn panel(follow: PanelFollow) -> Self {
        Behavior::Panel {
            scale: follow.collapsed_scale,
            follow,
        }
    }

    /// Parts implied by the behaviour when a template lists none
    pub fn default_parts(&self, material: Material) -> Vec<Part> {
        match self {
            Behavior::AsteroidField { asteroids } => asteroids
                .iter()
                .map(|_| Part::new(Shape::sphere(1.0), Transform3D::identity(), material))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Behavior::Static => "static",
            Behavior::Orbiter { .. } => "orbiter",
            Behavior::Spinner { .. } => "spinner",
            Behavior::Pulsar { .. } => "pulsar",
            Behavior::Wormhole { .. } => "wormhole",
            Behavior::AsteroidField { .. } => "asteroid-field",
            Behavior::Drifter { .. } => "drifter",
            Behavior::Panel { .. } => "panel",
        }
    }

    /// Write this frame's transform (and part transforms) for the owning entity
    pub fn apply(
        &mut self,
        ctx: &FrameContext,
        interaction: &Interaction,
        transform: &mut Transform3D,
        parts: &mut [Part],
    ) {
        let t = ctx.elapsed;
        match self {
            Behavior::Static => {}
            Behavior::Orbiter { orbit, spin } => {
                transform.position = orbit.position_at(t);
                transform.rotation = spin.rotation_at(t);
            }
            Behavior::Spinner { spin } => {
                transform.rotation = spin.rotation_at(t);
            }
            Behavior::Pulsar { pulse, base_scale } => {
                let s = pulse.scale_at(t, interaction.is_hovered());
                transform.scale = Vec3::splat(*base_scale * s);
            }
            Behavior::Wormhole { funnel } => {
                let active = interaction.is_selected();
                for (i, ring) in parts.iter_mut().enumerate() {
                    let pose = funnel.ring_pose(i, t, active);
                    ring.transform.position = ring.rest.position + Vec3::Z * pose.depth;
                    ring.transform.scale = ring.rest.scale * pose.scale;
                    ring.material.base_color[3] = pose.opacity;
                }
            }
            Behavior::AsteroidField { asteroids } => {
                for (rock, part) in asteroids.iter().zip(parts.iter_mut()) {
                    part.transform.position = rock.position_at(t);
                    part.transform.rotation = rock.rotation_at(t);
                    part.transform.scale = Vec3::splat(rock.size);
                }
            }
            Behavior::Drifter { anchor, drift, spin } => {
                transform.position = *anchor + Vec3::Y * drift.offset_at(t);
                transform.rotation = spin.rotation_at(t);
            }
            Behavior::Panel { follow, scale } => {
                let (position, rotation) = follow.placement(&ctx.camera);
                *scale = follow.step_scale(*scale, interaction.is_selected(), ctx.dt);
                transform.position = position;
                transform.rotation = rotation;
                transform.scale = Vec3::splat(*scale);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starscape_anim::{CameraPose, PointerEvent};

    const EPSILON: f32 = 0.0001;

    fn ctx(elapsed: f32) -> FrameContext {
        FrameContext::new(elapsed, 1.0 / 60.0)
    }

    fn rings(n: usize) -> Vec<Part> {
        (0..n)
            .map(|i| {
                Part::new(
                    Shape::torus(1.0 + i as f32 * 0.5, 0.05),
                    Transform3D::identity(),
                    Material::WHITE.with_opacity(0.8),
                )
            })
            .collect()
    }

    #[test]
    fn test_orbiter_moon_scenario() {
        let mut behavior = Behavior::Orbiter {
            orbit: Orbit::new(0.5, 4.0).with_height(1.5),
            spin: Spin::default(),
        };
        let mut transform = Transform3D::identity();
        let interaction = Interaction::new();

        behavior.apply(&ctx(0.0), &interaction, &mut transform, &mut []);
        assert!((transform.position - Vec3::new(0.0, 1.5, 4.0)).length() < EPSILON);

        // Half a revolution: t = pi / omega
        behavior.apply(&ctx(std::f32::consts::TAU), &interaction, &mut transform, &mut []);
        assert!((transform.position - Vec3::new(0.0, 1.5, -4.0)).length() < 1e-3);

        // Full revolution: t = 2 pi / omega
        behavior.apply(&ctx(2.0 * std::f32::consts::TAU), &interaction, &mut transform, &mut []);
        assert!((transform.position - Vec3::new(0.0, 1.5, 4.0)).length() < 1e-3);
    }

    #[test]
    fn test_pulsar_hover_speed() {
        let mut behavior = Behavior::Pulsar { pulse: Pulse::default(), base_scale: 1.0 };
        let mut transform = Transform3D::identity();
        let mut interaction = Interaction::new();
        let t = 0.4;

        behavior.apply(&ctx(t), &interaction, &mut transform, &mut []);
        let idle = 1.0 + (2.0f32 * t).sin() * 0.2;
        assert!((transform.scale.x - idle).abs() < EPSILON);

        interaction.handle(PointerEvent::Enter);
        behavior.apply(&ctx(t), &interaction, &mut transform, &mut []);
        let hovered = 1.0 + (5.0f32 * t).sin() * 0.2;
        assert!((transform.scale.x - hovered).abs() < EPSILON);
    }

    #[test]
    fn test_wormhole_activation_and_reset() {
        let funnel = Funnel::default();
        let mut behavior = Behavior::Wormhole { funnel };
        let mut transform = Transform3D::identity();
        let mut parts = rings(5);
        let mut interaction = Interaction::new();

        behavior.apply(&ctx(1.3), &interaction, &mut transform, &mut parts);
        assert!(parts.iter().all(|p| p.transform.position.z == 0.0));

        interaction.handle(PointerEvent::Click);
        behavior.apply(&ctx(1.3), &interaction, &mut transform, &mut parts);
        assert!(parts.iter().all(|p| p.transform.position.z < 0.0));

        interaction.handle(PointerEvent::Click);
        behavior.apply(&ctx(2.0), &interaction, &mut transform, &mut parts);
        for part in &parts {
            assert_eq!(part.transform.position.z, 0.0);
            assert_eq!(part.transform.scale, Vec3::ONE);
            assert_eq!(part.material.opacity(), funnel.base_opacity);
        }

        // Staying inactive keeps the same pose
        let before = parts.clone();
        behavior.apply(&ctx(3.0), &interaction, &mut transform, &mut parts);
        assert_eq!(before, parts);
    }

    #[test]
    fn test_asteroid_field_moves_parts_only() {
        let asteroids = vec![
            Asteroid { orbit: Orbit::new(0.1, 10.0), size: 0.2, tumble: Vec3::ONE },
            Asteroid { orbit: Orbit::new(0.2, 12.0).with_phase(1.0), size: 0.1, tumble: Vec3::ZERO },
        ];
        let mut behavior = Behavior::AsteroidField { asteroids: asteroids.clone() };
        let mut parts = behavior.default_parts(Material::GRAY);
        assert_eq!(parts.len(), 2);

        let mut transform = Transform3D::identity();
        behavior.apply(&ctx(5.0), &Interaction::new(), &mut transform, &mut parts);
        assert_eq!(transform, Transform3D::identity());
        for (rock, part) in asteroids.iter().zip(&parts) {
            assert!((part.transform.position - rock.position_at(5.0)).length() < EPSILON);
            assert_eq!(part.transform.scale, Vec3::splat(rock.size));
        }
    }

    #[test]
    fn test_drifter_bobs_around_anchor() {
        let anchor = Vec3::new(-8.0, 2.0, -6.0);
        let mut behavior = Behavior::Drifter { anchor, drift: Drift::new(0.5, 0.3), spin: Spin::about_y(0.01) };
        let mut transform = Transform3D::identity();
        for i in 0..20 {
            behavior.apply(&ctx(i as f32), &Interaction::new(), &mut transform, &mut []);
            assert_eq!(transform.position.x, anchor.x);
            assert!((transform.position.y - anchor.y).abs() <= 0.5 + EPSILON);
        }
    }

    #[test]
    fn test_panel_expands_toward_target() {
        let follow = PanelFollow::default();
        let mut behavior = Behavior::panel(follow);
        let mut transform = Transform3D::identity();
        let mut interaction = Interaction::new();
        interaction.handle(PointerEvent::Click);

        let camera = CameraPose::look_at(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO);
        let frame = FrameContext::new(0.0, 1.0 / 60.0).with_camera(camera);
        let mut previous = follow.collapsed_scale;
        for _ in 0..120 {
            behavior.apply(&frame, &interaction, &mut transform, &mut []);
            assert!(transform.scale.x >= previous);
            assert!(transform.scale.x <= follow.expanded_scale + 1e-6);
            previous = transform.scale.x;
        }
        assert!(((transform.position - camera.position).length() - follow.offset.length()).abs() < 1e-3);
    }
}
