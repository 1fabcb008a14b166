//! Scene validation
//!
//! Checks scene templates for mistakes that would otherwise show up as
//! invisible or degenerate objects at runtime.

use std::collections::HashSet;

use crate::behavior::Behavior;
use crate::scene::Scene;

/// Validation error found in a scene
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Scene has no entities
    EmptyScene,
    /// Duplicate entity name found
    DuplicateName(String),
    /// Entity or part shape has a non-positive or non-finite dimension
    InvalidShape(String),
    /// Wormhole without any rings to animate
    EmptyWormhole(String),
    /// Starfield shell with inner radius beyond outer radius
    InvalidStarfield { inner: f32, outer: f32 },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyScene => write!(f, "Scene has no entities"),
            ValidationError::DuplicateName(name) => write!(f, "Duplicate entity name: '{}'", name),
            ValidationError::InvalidShape(name) => write!(f, "Entity '{}' has an invalid shape", name),
            ValidationError::EmptyWormhole(name) => write!(f, "Wormhole '{}' has no rings", name),
            ValidationError::InvalidStarfield { inner, outer } => {
                write!(f, "Starfield inner radius {} exceeds outer radius {}", inner, outer)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Scene validator that checks for common errors
pub struct SceneValidator;

impl SceneValidator {
    /// Validate a scene, returning all errors found
    pub fn validate(scene: &Scene) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if scene.entities.is_empty() {
            errors.push(ValidationError::EmptyScene);
        }

        let mut seen_names = HashSet::new();
        for (index, entity) in scene.entities.iter().enumerate() {
            let label = entity.name.clone().unwrap_or_else(|| format!("#{}", index));

            if let Some(ref name) = entity.name {
                if !seen_names.insert(name.clone()) {
                    errors.push(ValidationError::DuplicateName(name.clone()));
                }
            }

            let shape_ok = entity.shape.map_or(true, |s| s.is_valid());
            let parts_ok = entity.parts.iter().all(|p| p.shape.is_valid());
            if !shape_ok || !parts_ok {
                errors.push(ValidationError::InvalidShape(label.clone()));
            }

            if matches!(entity.behavior, Behavior::Wormhole { .. }) && entity.parts.is_empty() {
                errors.push(ValidationError::EmptyWormhole(label));
            }
        }

        let starfield = scene.starfield;
        if starfield.inner_radius > starfield.outer_radius {
            errors.push(ValidationError::InvalidStarfield {
                inner: starfield.inner_radius,
                outer: starfield.outer_radius,
            });
        }

        errors
    }

    /// Validate and return Result (Ok if no errors, Err with all errors)
    pub fn validate_or_error(scene: &Scene) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(scene);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityTemplate, Material};
    use crate::scene::StarfieldSettings;
    use crate::shapes::Shape;
    use crate::Transform3D;
    use starscape_anim::Funnel;

    fn sphere(name: &str) -> EntityTemplate {
        EntityTemplate::new(Some(Shape::sphere(1.0)), Transform3D::identity(), Material::WHITE).with_name(name)
    }

    #[test]
    fn test_valid_scene_returns_no_errors() {
        let mut scene = Scene::new("Valid");
        scene.add_entity(sphere("sun"));
        assert!(SceneValidator::validate_or_error(&scene).is_ok());
    }

    #[test]
    fn test_empty_scene_error() {
        let errors = SceneValidator::validate(&Scene::new("Empty"));
        assert!(errors.contains(&ValidationError::EmptyScene));
    }

    #[test]
    fn test_duplicate_names_detected() {
        let mut scene = Scene::new("Dupes");
        scene.add_entity(sphere("moon"));
        scene.add_entity(sphere("moon"));
        let errors = SceneValidator::validate(&scene);
        assert!(errors.contains(&ValidationError::DuplicateName("moon".to_string())));
    }

    #[test]
    fn test_invalid_shape_and_empty_wormhole() {
        let mut scene = Scene::new("Broken");
        scene.add_entity(
            EntityTemplate::new(Some(Shape::torus(1.0, 0.0)), Transform3D::identity(), Material::WHITE),
        );
        scene.add_entity(
            EntityTemplate::new(None, Transform3D::identity(), Material::WHITE)
                .with_name("wormhole")
                .with_behavior(Behavior::Wormhole { funnel: Funnel::default() }),
        );
        let errors = SceneValidator::validate(&scene);
        assert!(errors.contains(&ValidationError::InvalidShape("#0".to_string())));
        assert!(errors.contains(&ValidationError::EmptyWormhole("wormhole".to_string())));
    }

    #[test]
    fn test_inverted_starfield() {
        let mut scene = Scene::new("Stars").with_starfield(StarfieldSettings {
            inner_radius: 10.0,
            outer_radius: 5.0,
            ..Default::default()
        });
        scene.add_entity(sphere("sun"));
        let errors = SceneValidator::validate(&scene);
        assert_eq!(errors, vec![ValidationError::InvalidStarfield { inner: 10.0, outer: 5.0 }]);
    }
}
