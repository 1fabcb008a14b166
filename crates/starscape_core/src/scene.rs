//! Scene templates and the running scene
//!
//! A [`Scene`] is a serializable template (RON) of entity templates plus the
//! starfield and control settings. An [`ActiveScene`] is the live instance:
//! one world, one clock, the starfield and the speed control.

use serde::{Serialize, Deserialize};
use std::fs;
use std::io;
use std::path::Path;

use rand::Rng;
use starscape_anim::{CameraPose, Starfield};

use crate::controls::{RangeSlider, RangeSpec};
use crate::entity::EntityTemplate;
use crate::frame::{FrameContext, FrameReport};
use crate::scene_validator::{SceneValidator, ValidationError};
use crate::{Clock, World};

/// Star catalogue settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarfieldSettings {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Radians per second at speed 1.0
    pub base_rate: f32,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            count: 5000,
            inner_radius: 100.0,
            outer_radius: 300.0,
            base_rate: 0.02,
        }
    }
}

/// A serializable scene containing entity templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Entity templates in this scene
    pub entities: Vec<EntityTemplate>,
    #[serde(default)]
    pub starfield: StarfieldSettings,
    /// Starfield speed control
    #[serde(default)]
    pub speed_control: RangeSpec,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
            starfield: StarfieldSettings::default(),
            speed_control: RangeSpec::default(),
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a scene from RON text
    pub fn from_ron(contents: &str) -> Result<Self, SceneLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Add an entity template to this scene
    pub fn add_entity(&mut self, entity: EntityTemplate) {
        self.entities.push(entity);
    }

    pub fn with_starfield(mut self, starfield: StarfieldSettings) -> Self {
        self.starfield = starfield;
        self
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Error building a running scene
#[derive(Debug)]
pub enum SceneError {
    /// The template could not be read
    Load(SceneLoadError),
    /// The template failed validation
    Invalid(Vec<ValidationError>),
}

impl From<SceneLoadError> for SceneError {
    fn from(e: SceneLoadError) -> Self {
        SceneError::Load(e)
    }
}

impl From<Vec<ValidationError>> for SceneError {
    fn from(errors: Vec<ValidationError>) -> Self {
        SceneError::Invalid(errors)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Load(e) => write!(f, "Scene load failed: {}", e),
            SceneError::Invalid(errors) => {
                write!(f, "Scene is invalid:")?;
                for error in errors {
                    write!(f, " {};", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// A running scene
///
/// Owns the only clock of the scene. Each call to [`update`](Self::update) is
/// one frame: advance the clock, rotate the starfield, update every entity.
pub struct ActiveScene {
    pub name: String,
    pub world: World,
    pub clock: Clock,
    pub starfield: Starfield,
    /// Starfield speed multiplier
    pub starfield_speed: RangeSlider,
}

impl ActiveScene {
    /// Create an empty scene with a starfield drawn from `rng`
    pub fn new(name: impl Into<String>, starfield: StarfieldSettings, rng: &mut impl Rng) -> Self {
        let mut stars = Starfield::generate(rng, starfield.count, starfield.inner_radius, starfield.outer_radius);
        stars.base_rate = starfield.base_rate;
        Self {
            name: name.into(),
            world: World::new(),
            clock: Clock::new(),
            starfield: stars,
            starfield_speed: RangeSlider::default(),
        }
    }

    /// Instantiate a validated template
    pub fn from_template(template: &Scene, rng: &mut impl Rng) -> Result<Self, SceneError> {
        SceneValidator::validate_or_error(template)?;

        let mut scene = Self::new(template.name.clone(), template.starfield, rng);
        scene.starfield_speed = RangeSlider::new(template.speed_control);
        for entity_template in &template.entities {
            scene.world.add_entity(entity_template.to_entity());
        }
        log::info!(
            "Instantiated scene '{}' with {} entities",
            scene.name,
            scene.world.entity_count()
        );
        Ok(scene)
    }

    /// Run one frame of `dt` seconds seen from `camera`
    pub fn update(&mut self, dt: f32, camera: CameraPose) -> FrameReport {
        let step = self.clock.advance(dt);
        let elapsed = self.clock.elapsed();

        self.starfield.advance(step, self.starfield_speed.value());
        let ctx = FrameContext::new(elapsed, step).with_camera(camera);
        self.world.update(&ctx)
    }

    /// Seconds since the scene started
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use crate::entity::Material;
    use crate::shapes::Shape;
    use crate::Transform3D;
    use starscape_anim::{seeded_rng, Orbit, Spin};

    const SCENE_RON: &str = r#"
Scene(
    name: "Test Space",
    entities: [
        (
            name: Some("moon"),
            shape: Some((type: "Sphere", radius: 0.5)),
            materials: (idle: (base_color: (0.8, 0.8, 0.8, 1.0), textured: true)),
            behavior: Orbiter(
                orbit: (speed: 0.5, radius: 4.0, height: 1.0),
                spin: (rate: (x: 0.0, y: 0.2, z: 0.0)),
            ),
            pick_radius: Some(0.5),
        ),
        (
            name: Some("sun"),
            shape: Some((type: "Sphere", radius: 2.0)),
            materials: (idle: (base_color: (1.0, 0.8, 0.3, 1.0), emissive: (1.0, 0.7, 0.2), emissive_intensity: 3.0)),
        ),
    ],
    starfield: (count: 10, inner_radius: 50.0, outer_radius: 60.0, base_rate: 0.02),
)
"#;

    #[test]
    fn test_parse_ron_scene() {
        let scene = Scene::from_ron(SCENE_RON).unwrap();
        assert_eq!(scene.name, "Test Space");
        assert_eq!(scene.entities.len(), 2);
        assert_eq!(scene.starfield.count, 10);
        assert_eq!(scene.speed_control, RangeSpec::default());
        assert!(scene.entities[0].materials.idle.textured);
    }

    #[test]
    fn test_parse_error() {
        let err = Scene::from_ron("Scene(name: ").unwrap_err();
        assert!(matches!(err, SceneLoadError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scene::load("/nonexistent/scene.ron").unwrap_err();
        assert!(matches!(err, SceneLoadError::Io(_)));
    }

    #[test]
    fn test_from_template_and_update() {
        let template = Scene::from_ron(SCENE_RON).unwrap();
        let mut scene = ActiveScene::from_template(&template, &mut seeded_rng(Some(1))).unwrap();
        assert_eq!(scene.world.entity_count(), 2);
        assert_eq!(scene.starfield.len(), 10);

        let report = scene.update(0.5, CameraPose::default());
        assert!(report.is_clean());
        assert!((scene.elapsed() - 0.5).abs() < 1e-6);

        let moon = scene.world.find_by_name("moon").unwrap();
        let p = scene.world.get_entity(moon).unwrap().transform.position;
        assert!(((p.x * p.x + p.z * p.z) - 16.0).abs() < 1e-3);
        assert_eq!(p.y, 1.0);
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut template = Scene::new("Broken");
        template.add_entity(
            EntityTemplate::new(Some(Shape::sphere(-1.0)), Transform3D::identity(), Material::WHITE)
                .with_name("bad"),
        );
        let result = ActiveScene::from_template(&template, &mut seeded_rng(Some(1)));
        assert!(matches!(result, Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_clock_never_rewinds_and_starfield_uses_speed() {
        let mut scene = ActiveScene::new("s", StarfieldSettings { count: 0, ..Default::default() }, &mut seeded_rng(Some(2)));
        scene.world.add_entity(
            crate::Entity::new(Shape::sphere(1.0)).with_behavior(Behavior::Orbiter {
                orbit: Orbit::new(1.0, 2.0),
                spin: Spin::default(),
            }),
        );
        scene.starfield_speed.set(2.0);
        scene.update(1.0, CameraPose::default());
        scene.update(-5.0, CameraPose::default());
        assert!((scene.elapsed() - 1.0).abs() < 1e-6);
        assert!((scene.starfield.rotation - 2.0 * 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_starfield_steps_evenly_after_long_run() {
        let mut scene = ActiveScene::new("s", StarfieldSettings { count: 0, ..Default::default() }, &mut seeded_rng(Some(2)));
        scene.starfield.base_rate = 1.0;
        scene.update(130_000.0, CameraPose::default());

        let mut previous = scene.starfield.rotation;
        for _ in 0..5 {
            scene.update(0.016, CameraPose::default());
            let step = (scene.starfield.rotation - previous).rem_euclid(std::f32::consts::TAU);
            assert!((step - 0.5 * 0.016).abs() < 1e-4, "step={}", step);
            previous = scene.starfield.rotation;
        }
    }
}
