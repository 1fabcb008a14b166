//! Frame-driver scenarios
//!
//! Whole-frame behaviour: pointer in, clock advanced, entities updated.

use std::f32::consts::TAU;

use starscape::scene::{SceneBuilder, PANEL_TAG};
use starscape::systems::SimulationSystem;
use starscape_anim::{Orbit, Pulse};
use starscape_core::{ActiveScene, Animator, Behavior, Entity, FrameContext, Interaction, Shape, StarfieldSettings, Transform3D};
use starscape_input::{OrbitController, PointerState};
use starscape_math::Vec3;
use starscape_render::{Camera3D, DrawList, TextureState};

const EPSILON: f32 = 0.001;

fn builder() -> SceneBuilder {
    SceneBuilder::new("scenario", Some(11)).with_starfield(StarfieldSettings {
        count: 16,
        ..StarfieldSettings::default()
    })
}

struct Harness {
    scene: ActiveScene,
    sim: SimulationSystem,
    camera: Camera3D,
    controller: OrbitController,
}

impl Harness {
    fn new(scene: ActiveScene) -> Self {
        Self {
            scene,
            sim: SimulationSystem::new(0.25),
            camera: Camera3D::default(),
            controller: OrbitController::new(),
        }
    }

    fn frame(&mut self, pointer: PointerState, dt: f32) {
        self.sim.advance(&mut self.scene, &mut self.camera, &mut self.controller, pointer, 1.0, dt);
    }

    fn entity(&self, name: &str) -> &Entity {
        let handle = self.scene.world.find_by_name(name).unwrap();
        self.scene.world.get_entity(handle).unwrap()
    }
}

fn centre(clicked: bool) -> PointerState {
    PointerState { ndc: Some((0.0, 0.0)), clicked, dragging: false }
}

fn away() -> PointerState {
    PointerState { ndc: None, clicked: false, dragging: false }
}

#[test]
fn test_moon_returns_after_one_period() {
    let orbit = Orbit::new(0.5, 4.0).with_height(1.5);
    let mut h = Harness::new(builder().add_moon("moon", orbit, 0.5).build());
    assert!((h.entity("moon").transform.position - Vec3::new(0.0, 1.5, 4.0)).length() < EPSILON);

    let period = TAU / 0.5;
    let steps = 100;
    for _ in 0..steps {
        h.frame(away(), period / steps as f32);
        let p = h.entity("moon").transform.position;
        assert!((p.x * p.x + p.z * p.z - 16.0).abs() < 0.01);
    }
    assert!((h.scene.elapsed() - period).abs() < EPSILON);
    assert!((h.entity("moon").transform.position - Vec3::new(0.0, 1.5, 4.0)).length() < 0.01);
}

#[test]
fn test_wormhole_click_streams_and_resets_rings() {
    let mut h = Harness::new(builder().add_wormhole(Vec3::ZERO, 5).build());

    h.frame(centre(true), 0.1);
    let wormhole = h.entity("wormhole");
    assert!(wormhole.interaction.is_selected());
    assert!(wormhole.parts.iter().all(|ring| ring.transform.position.z < 0.0));

    h.frame(centre(true), 0.1);
    let wormhole = h.entity("wormhole");
    assert!(!wormhole.interaction.is_selected());
    assert!(wormhole.parts.iter().all(|ring| ring.transform.position.z == 0.0));
    assert!(wormhole.parts.iter().all(|ring| ring.transform.scale == ring.rest.scale));
}

#[test]
fn test_hover_speeds_up_pulse_next_frame() {
    let mut h = Harness::new(builder().add_pulsating_star("star", Vec3::ZERO, 0.4, [1.0, 0.9, 0.5]).build());
    let pulse = Pulse::default();

    h.frame(away(), 0.2);
    let t = h.scene.elapsed();
    assert!((h.entity("star").transform.scale.x - pulse.scale_at(t, false)).abs() < EPSILON);

    h.frame(centre(false), 0.2);
    let t = h.scene.elapsed();
    assert!(h.entity("star").interaction.is_hovered());
    assert!((h.entity("star").transform.scale.x - (1.0 + (5.0 * t).sin() * 0.2)).abs() < EPSILON);

    h.frame(away(), 0.2);
    let t = h.scene.elapsed();
    assert!((h.entity("star").transform.scale.x - (1.0 + (2.0 * t).sin() * 0.2)).abs() < EPSILON);
}

#[test]
fn test_panel_expands_monotonically_without_overshoot() {
    let mut h = Harness::new(builder().add_control_panel().build());
    let handle = h.scene.world.find_by_tag(PANEL_TAG).next().unwrap();
    h.scene.world.get_entity_mut(handle).unwrap().set_selected(true);

    let expanded = match &h.scene.world.get_entity(handle).unwrap().behavior {
        Behavior::Panel { follow, .. } => follow.expanded_scale,
        other => panic!("unexpected behaviour {}", other.kind()),
    };

    let mut previous = 0.0;
    for i in 0..200 {
        // Uneven frame times
        let dt = if i % 3 == 0 { 0.05 } else { 1.0 / 144.0 };
        h.frame(away(), dt);
        let scale = h.scene.world.get_entity(handle).unwrap().transform.scale.x;
        assert!(scale >= previous);
        assert!(scale <= expanded + 1e-6);
        previous = scale;
    }
    assert!((previous - expanded).abs() < 0.01);
    assert_eq!(h.scene.world.get_entity(handle).unwrap().mounted_parts().count(), 2);
}

#[test]
fn test_starfield_speed_clamped_and_drives_rotation() {
    let mut h = Harness::new(builder().build());
    assert!((h.scene.starfield_speed.set(5.0) - 2.0).abs() < EPSILON);
    assert!((h.scene.starfield_speed.set(-1.0) - 0.1).abs() < EPSILON);

    let speed = h.scene.starfield_speed.set(1.0);
    let before = h.scene.starfield.rotation;
    h.frame(away(), 0.25);
    let expected = speed * 0.25 * h.scene.starfield.base_rate;
    assert!((h.scene.starfield.rotation - before - expected).abs() < 1e-5);
}

struct Faulty;

impl Animator for Faulty {
    fn animate(&mut self, _ctx: &FrameContext, _interaction: &Interaction, _transform: &mut Transform3D) {
        panic!("broken animator");
    }
}

#[test]
fn test_panicking_entity_is_isolated() {
    let scene = builder()
        .add_entity(Entity::new(Shape::sphere(1.0)).with_name("faulty").with_animator(Faulty))
        .add_moon("moon", Orbit::new(0.5, 4.0), 0.5)
        .build();
    let mut h = Harness::new(scene);
    let start = h.entity("moon").transform.position;

    let result = h.sim.advance(&mut h.scene, &mut h.camera, &mut h.controller, away(), 1.0, 0.5);
    assert_eq!(result.report.failures.len(), 1);
    assert_eq!(result.report.failures[0].name, "faulty");
    assert_eq!(result.report.updated, 1);
    assert!((h.entity("moon").transform.position - start).length() > EPSILON);
}

#[test]
fn test_textured_moon_waits_for_texture() {
    let scene = builder().add_moon("moon", Orbit::new(0.5, 4.0), 0.5).build();
    let eye = Vec3::new(0.0, 0.0, 10.0);

    let pending = DrawList::build(&scene.world, eye, TextureState::Pending);
    assert_eq!(pending.deferred, 1);
    assert!(pending.is_empty());

    let failed = DrawList::build(&scene.world, eye, TextureState::Failed);
    assert_eq!(failed.deferred, 0);
    assert_eq!(failed.instance_count(), 1);
}
