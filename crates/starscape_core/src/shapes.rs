//! Serializable shape descriptions
//!
//! Shapes are described in **local space**, centred at the origin. The
//! renderer turns each variant into a mesh once and instances it.

use serde::{Serialize, Deserialize};

/// Geometry of an entity or part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    /// UV sphere
    Sphere {
        radius: f32,
    },
    /// Torus in the local XY plane, facing +Z
    Torus {
        /// Distance from the centre to the middle of the tube
        radius: f32,
        /// Tube radius
        tube: f32,
    },
    /// Flat quad in the local XY plane, facing +Z
    Plane {
        width: f32,
        height: f32,
    },
}

impl Shape {
    /// Create a sphere
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// Create a torus
    pub fn torus(radius: f32, tube: f32) -> Self {
        Shape::Torus { radius, tube }
    }

    /// Create a plane
    pub fn plane(width: f32, height: f32) -> Self {
        Shape::Plane { width, height }
    }

    /// Radius of a sphere around the origin that encloses the shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Shape::Sphere { radius } => radius.abs(),
            Shape::Torus { radius, tube } => radius.abs() + tube.abs(),
            Shape::Plane { width, height } => 0.5 * (width * width + height * height).sqrt(),
        }
    }

    /// True if every dimension is finite and positive
    pub fn is_valid(&self) -> bool {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            Shape::Sphere { radius } => ok(radius),
            Shape::Torus { radius, tube } => ok(radius) && ok(tube),
            Shape::Plane { width, height } => ok(width) && ok(height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_radius() {
        assert_eq!(Shape::sphere(2.0).bounding_radius(), 2.0);
        assert_eq!(Shape::torus(3.0, 0.5).bounding_radius(), 3.5);
        assert!((Shape::plane(6.0, 8.0).bounding_radius() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_validity() {
        assert!(Shape::sphere(1.0).is_valid());
        assert!(!Shape::sphere(0.0).is_valid());
        assert!(!Shape::torus(1.0, f32::NAN).is_valid());
    }

    #[test]
    fn test_ron_tagged_format() {
        let shape: Shape = ron::from_str("(type: \"Torus\", radius: 2.0, tube: 0.1)").unwrap();
        assert_eq!(shape, Shape::torus(2.0, 0.1));
    }
}
