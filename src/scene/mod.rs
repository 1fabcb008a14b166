//! Scene construction utilities
//!
//! The built-in scene is composed with [`SceneBuilder`]; a RON template named
//! in the config replaces it.

mod scene_builder;

pub use scene_builder::{SceneBuilder, PANEL_TAG};

use starscape_anim::procedural::seeded_rng;
use starscape_anim::{AsteroidFieldParams, Orbit};
use starscape_core::{ActiveScene, Scene, SceneError};
use starscape_math::Vec3;

use crate::config::AppConfig;

/// The full decorative scene
pub fn default_scene(config: &AppConfig) -> ActiveScene {
    let mut scene = SceneBuilder::from_config("Starscape", config)
        .add_black_hole(Vec3::ZERO, 1.0)
        .add_moon("moon", Orbit::new(0.5, 4.0), 0.5)
        .add_moon("far-moon", Orbit::new(0.25, 6.5).with_phase(2.0).with_height(0.8), 0.35)
        .add_moon_system("moon-system", Orbit::new(0.08, 10.0).with_phase(4.0).with_height(-1.0), 0.8, 3)
        .add_planet("red-planet", Vec3::new(-9.0, 1.5, -6.0), 1.4, [0.8, 0.35, 0.2])
        .add_planet("ice-planet", Vec3::new(8.0, -2.0, 4.0), 0.9, [0.6, 0.8, 0.95])
        .add_wormhole(Vec3::new(10.0, 1.0, -10.0), config.scene.wormhole_ring_count)
        .add_nebula(Vec3::new(-16.0, 6.0, -24.0), 5.0, [0.6, 0.2, 0.8])
        .add_nebula(Vec3::new(18.0, -5.0, -28.0), 6.0, [0.2, 0.5, 0.9])
        .add_asteroid_field(AsteroidFieldParams {
            count: config.scene.asteroid_count,
            ..AsteroidFieldParams::default()
        })
        .add_pulsating_star("yellow-star", Vec3::new(6.0, 4.5, -3.0), 0.4, [1.0, 0.85, 0.4])
        .add_pulsating_star("blue-star", Vec3::new(-5.0, -3.5, 2.0), 0.3, [0.5, 0.7, 1.0])
        .add_control_panel()
        .build();

    if config.controls.panel_expanded {
        let handle = scene.world.find_by_tag(PANEL_TAG).next();
        if let Some(panel) = handle.and_then(|h| scene.world.get_entity_mut(h)) {
            panel.set_selected(true);
        }
    }
    scene
}

/// The scene named by `scene.path`, or the built-in one
pub fn load_scene(config: &AppConfig) -> Result<ActiveScene, SceneError> {
    match &config.scene.path {
        Some(path) => {
            log::info!("Loading scene template {}", path.display());
            let template = Scene::load(path)?;
            let mut rng = seeded_rng(config.scene.seed);
            ActiveScene::from_template(&template, &mut rng)
        }
        None => Ok(default_scene(config)),
    }
}
