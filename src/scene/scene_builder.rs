//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for composing the space scene. Every `add_*` call
//! creates one independent entity; random layouts are drawn from the
//! builder's seeded generator once, at construction.

use rand_chacha::ChaCha8Rng;
use starscape_anim::procedural::{range, ring_radii, seeded_rng};
use starscape_anim::{AsteroidFieldParams, Drift, Funnel, Orbit, PanelFollow, Pulse, Spin};
use starscape_core::{
    ActiveScene, Behavior, Entity, Material, Mount, Part, PartMotion, RangeSlider, RangeSpec, Shape,
    StarfieldSettings, Transform3D, World,
};
use starscape_math::Vec3;

use crate::config::AppConfig;

/// Tag carried by the control panel
pub const PANEL_TAG: &str = "panel";

/// Builder for the animated space scene
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new("demo", Some(7))
///     .add_moon("moon", Orbit::new(0.5, 4.0), 0.5)
///     .add_pulsating_star("star", Vec3::new(6.0, 4.0, -3.0), 0.4, [1.0, 0.9, 0.6])
///     .add_control_panel()
///     .build();
/// ```
pub struct SceneBuilder {
    name: String,
    world: World,
    rng: ChaCha8Rng,
    starfield: StarfieldSettings,
    speed_control: RangeSpec,
    pulse_speeds: (f32, f32),
    panel_follow: PanelFollow,
}

impl SceneBuilder {
    /// Create a builder; `None` draws the layout seed from OS entropy
    pub fn new(name: impl Into<String>, seed: Option<u64>) -> Self {
        let pulse = Pulse::default();
        Self {
            name: name.into(),
            world: World::new(),
            rng: seeded_rng(seed),
            starfield: StarfieldSettings::default(),
            speed_control: RangeSpec::default(),
            pulse_speeds: (pulse.idle_speed, pulse.hover_speed),
            panel_follow: PanelFollow::default(),
        }
    }

    /// Create a builder carrying the configured seed, speeds and damping
    pub fn from_config(name: impl Into<String>, config: &AppConfig) -> Self {
        let animation = &config.animation;
        Self::new(name, config.scene.seed)
            .with_starfield(StarfieldSettings {
                count: config.scene.star_count,
                ..StarfieldSettings::default()
            })
            .with_speed_control(config.controls.speed_spec())
            .with_pulse_speeds(animation.pulse_idle_speed, animation.pulse_hover_speed)
            .with_panel_damping(animation.panel_damping, animation.frame_rate_independent_damping)
    }

    pub fn with_starfield(mut self, starfield: StarfieldSettings) -> Self {
        self.starfield = starfield;
        self
    }

    /// Range of the starfield speed control
    pub fn with_speed_control(mut self, spec: RangeSpec) -> Self {
        self.speed_control = spec;
        self
    }

    /// Pulse speeds used by stars added after this call
    pub fn with_pulse_speeds(mut self, idle: f32, hover: f32) -> Self {
        self.pulse_speeds = (idle, hover);
        self
    }

    /// Panel scale damping used by panels added after this call
    pub fn with_panel_damping(mut self, damping: f32, frame_rate_independent: bool) -> Self {
        self.panel_follow.damping = damping.clamp(0.0, 1.0);
        self.panel_follow.frame_rate_independent = frame_rate_independent;
        self
    }

    /// Add a textured moon on a circular orbit
    pub fn add_moon(mut self, name: &str, orbit: Orbit, radius: f32) -> Self {
        let surface = Material::from_rgb(0.85, 0.85, 0.8).with_texture();
        self.world.add_entity(
            Entity::new(Shape::sphere(radius))
                .with_name(name)
                .with_tag("moon")
                .with_material(surface)
                .with_transform(Transform3D::from_position(orbit.position_at(0.0)))
                .with_behavior(Behavior::Orbiter { orbit, spin: Spin::about_y(0.2) }),
        );
        self
    }

    /// Add a planet with `moon_count` satellites; the whole system orbits and turns as one
    pub fn add_moon_system(mut self, name: &str, orbit: Orbit, planet_radius: f32, moon_count: usize) -> Self {
        let planet = Part::new(
            Shape::sphere(planet_radius),
            Transform3D::identity(),
            Material::from_rgb(0.35, 0.55, 0.85),
        )
        .with_name("planet");

        let moons = (0..moon_count).map(|i| {
            let angle = i as f32 / moon_count as f32 * std::f32::consts::TAU;
            let distance = planet_radius * (2.0 + i as f32 * 0.6);
            let offset = Vec3::new(angle.sin() * distance, 0.0, angle.cos() * distance);
            Part::new(
                Shape::sphere(planet_radius * 0.25),
                Transform3D::from_position(offset),
                Material::from_rgb(0.7, 0.7, 0.72),
            )
            .with_motion(PartMotion::Spin(Spin::about_y(0.8)))
        });

        self.world.add_entity(
            Entity::group()
                .with_name(name)
                .with_tag("moon-system")
                .with_transform(Transform3D::from_position(orbit.position_at(0.0)))
                .with_behavior(Behavior::Orbiter { orbit, spin: Spin::about_y(0.3) })
                .with_part(planet)
                .with_parts(moons),
        );
        self
    }

    /// Add a black hole: a dark core and its glow pulsing together inside a
    /// turning accretion disk
    pub fn add_black_hole(mut self, position: Vec3, radius: f32) -> Self {
        let pulse = Pulse::new(0.08, 1.3).with_speeds(1.5, 1.5);

        let core = Part::new(Shape::sphere(radius), Transform3D::identity(), Material::BLACK)
            .with_name("core")
            .with_motion(PartMotion::Pulse(pulse));

        let halo = Part::new(
            Shape::sphere(radius),
            Transform3D::identity().with_uniform_scale(pulse.glow_multiplier),
            Material::from_rgb(0.4, 0.2, 0.6).with_emissive([0.5, 0.25, 0.8], 0.6).with_opacity(0.25),
        )
        .with_name("halo")
        .with_motion(PartMotion::Pulse(pulse));

        let disk = Part::new(
            Shape::torus(radius * 2.2, radius * 0.35),
            Transform3D::identity().with_rotation(Vec3::new(std::f32::consts::FRAC_PI_2 * 0.85, 0.0, 0.0)),
            Material::from_rgb(1.0, 0.55, 0.15).with_emissive([1.0, 0.45, 0.1], 2.5),
        )
        .with_name("accretion-disk")
        .with_motion(PartMotion::Spin(Spin { rate: Vec3::new(0.0, 0.0, 0.6) }));

        self.world.add_entity(
            Entity::group()
                .with_name("black-hole")
                .with_tag("black-hole")
                .with_transform(Transform3D::from_position(position))
                .with_behavior(Behavior::Spinner { spin: Spin::about_y(0.1) })
                .with_part(core)
                .with_part(halo)
                .with_part(disk),
        );
        self
    }

    /// Add a hoverable planet whose atmosphere shows only while selected
    pub fn add_planet(mut self, name: &str, position: Vec3, radius: f32, color: [f32; 3]) -> Self {
        let [r, g, b] = color;
        let idle = Material::from_rgb(r, g, b);
        let hovered = idle.with_emissive(color, 0.35);
        let selected = idle.with_emissive(color, 0.6);

        let atmosphere = Part::new(
            Shape::sphere(radius * 1.15),
            Transform3D::identity(),
            Material::from_rgb(0.55, 0.75, 1.0).with_emissive([0.3, 0.5, 1.0], 0.8).with_opacity(0.3),
        )
        .with_name("atmosphere")
        .with_mount(Mount::WhileSelected);

        self.world.add_entity(
            Entity::new(Shape::sphere(radius))
                .with_name(name)
                .with_tag("planet")
                .with_material(idle)
                .with_hover_material(hovered)
                .with_selected_material(selected)
                .with_transform(Transform3D::from_position(position))
                .with_behavior(Behavior::Spinner { spin: Spin::about_y(0.15) })
                .pickable(radius * 1.15)
                .with_part(atmosphere),
        );
        self
    }

    /// Add a wormhole of `ring_count` rings; clicking it streams the rings away
    pub fn add_wormhole(mut self, position: Vec3, ring_count: usize) -> Self {
        let funnel = Funnel::default();
        let radii = ring_radii(ring_count, 1.0, 0.35, 0.08, &mut self.rng);
        let outer = radii.iter().copied().fold(0.0f32, f32::max);

        let rings = radii.into_iter().enumerate().map(|(i, radius)| {
            let hue = i as f32 / ring_count.max(1) as f32;
            let color = [0.5 + 0.4 * hue, 0.3, 1.0 - 0.3 * hue];
            Part::new(
                Shape::torus(radius.max(0.05), 0.05),
                Transform3D::identity(),
                Material::from_rgb(color[0], color[1], color[2])
                    .with_emissive(color, 1.8)
                    .with_opacity(funnel.base_opacity),
            )
        });

        self.world.add_entity(
            Entity::group()
                .with_name("wormhole")
                .with_tag("wormhole")
                .with_transform(Transform3D::from_position(position))
                .with_behavior(Behavior::Wormhole { funnel })
                .pickable(outer + 0.1)
                .with_parts(rings),
        );
        self
    }

    /// Add a drifting nebula of a few overlapping translucent puffs
    pub fn add_nebula(mut self, anchor: Vec3, radius: f32, color: [f32; 3]) -> Self {
        let [r, g, b] = color;
        let puffs: Vec<Part> = (0..4)
            .map(|_| {
                let offset = Vec3::new(
                    range(&mut self.rng, -radius, radius),
                    range(&mut self.rng, -radius * 0.5, radius * 0.5),
                    range(&mut self.rng, -radius, radius),
                );
                let size = range(&mut self.rng, radius * 0.6, radius * 1.1);
                Part::new(
                    Shape::sphere(size),
                    Transform3D::from_position(offset),
                    Material::from_rgb(r, g, b).with_emissive(color, 0.9).with_opacity(0.12),
                )
            })
            .collect();
        let drift = Drift {
            phase: range(&mut self.rng, 0.0, std::f32::consts::TAU),
            ..Drift::new(0.5, 0.3)
        };

        self.world.add_entity(
            Entity::group()
                .with_name("nebula")
                .with_tag("nebula")
                .with_transform(Transform3D::from_position(anchor))
                .with_behavior(Behavior::Drifter { anchor, drift, spin: Spin::about_y(0.02) })
                .with_parts(puffs),
        );
        self
    }

    /// Add an asteroid belt; every rock gets its own randomised orbit
    pub fn add_asteroid_field(mut self, params: AsteroidFieldParams) -> Self {
        let asteroids = params.generate(&mut self.rng);
        let behavior = Behavior::AsteroidField { asteroids };
        let rocks = behavior.default_parts(Material::from_rgb(0.45, 0.42, 0.4));

        self.world.add_entity(
            Entity::group()
                .with_name("asteroid-field")
                .with_tag("asteroids")
                .with_behavior(behavior)
                .with_parts(rocks),
        );
        self
    }

    /// Add a star that pulses, faster while hovered; core and glow share the phase
    pub fn add_pulsating_star(mut self, name: &str, position: Vec3, radius: f32, color: [f32; 3]) -> Self {
        let (idle, hover) = self.pulse_speeds;
        let pulse = Pulse::new(0.2, 1.5).with_speeds(idle, hover);
        let [r, g, b] = color;

        let glow = Part::new(
            Shape::sphere(radius),
            Transform3D::identity().with_uniform_scale(pulse.glow_multiplier),
            Material::from_rgb(r, g, b).with_emissive(color, 1.2).with_opacity(0.3),
        )
        .with_name("glow");

        self.world.add_entity(
            Entity::new(Shape::sphere(radius))
                .with_name(name)
                .with_tag("star")
                .with_material(Material::from_rgb(r, g, b).with_emissive(color, 3.0))
                .with_hover_material(Material::from_rgb(r, g, b).with_emissive(color, 4.5))
                .with_transform(Transform3D::from_position(position))
                .with_behavior(Behavior::Pulsar { pulse, base_scale: 1.0 })
                .pickable(radius * pulse.glow_multiplier)
                .with_part(glow),
        );
        self
    }

    /// Add the camera-following control panel; its sub-panels show while expanded
    pub fn add_control_panel(mut self) -> Self {
        let frame = Material::from_rgb(0.1, 0.12, 0.2).with_emissive([0.2, 0.35, 0.7], 0.4).with_opacity(0.8);
        let sub_panel = |name: &str, offset: Vec3, width: f32, height: f32, glow: [f32; 3]| {
            Part::new(
                Shape::plane(width, height),
                Transform3D::from_position(offset),
                Material::from_rgb(glow[0], glow[1], glow[2]).with_emissive(glow, 0.8).with_opacity(0.9),
            )
            .with_name(name)
            .with_mount(Mount::WhileSelected)
        };

        self.world.add_entity(
            Entity::new(Shape::plane(1.6, 1.0))
                .with_name("control-panel")
                .with_tag(PANEL_TAG)
                .with_material(frame)
                .with_hover_material(frame.with_emissive([0.3, 0.5, 0.9], 0.7))
                .with_behavior(Behavior::panel(self.panel_follow))
                .pickable(0.9)
                .with_part(sub_panel("info", Vec3::new(0.0, 0.2, 0.01), 1.4, 0.4, [0.3, 0.6, 1.0]))
                .with_part(sub_panel("speed", Vec3::new(0.0, -0.3, 0.01), 1.4, 0.12, [1.0, 0.8, 0.3])),
        );
        self
    }

    /// Add a custom entity to the scene
    ///
    /// For entities that don't fit the standard patterns.
    pub fn add_entity(mut self, entity: Entity) -> Self {
        self.world.add_entity(entity);
        self
    }

    /// Build the running scene: starfield, speed control and world
    pub fn build(mut self) -> ActiveScene {
        let mut scene = ActiveScene::new(self.name, self.starfield, &mut self.rng);
        scene.starfield_speed = RangeSlider::new(self.speed_control);
        scene.world = self.world;
        log::info!(
            "Built scene '{}' with {} entities and {} stars",
            scene.name,
            scene.world.entity_count(),
            scene.starfield.len()
        );
        scene
    }
}
