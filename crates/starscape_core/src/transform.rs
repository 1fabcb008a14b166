//! 3D Transform (position, rotation, scale)
//!
//! A Transform3D places an entity or one of its parts in the scene.

use serde::{Serialize, Deserialize};
use starscape_math::{Vec3, Mat4, mat4};

/// A 3D transform with position, XYZ Euler rotation and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Position in world (or parent) space
    pub position: Vec3,
    /// Euler angles in radians, applied Z then Y then X
    #[serde(default)]
    pub rotation: Vec3,
    /// Scale along each local axis
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Builder: set the Euler rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set a uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Builder: set a per-axis scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn to_matrix(&self) -> Mat4 {
        mat4::from_trs(self.position, self.rotation, self.scale)
    }

    /// Transform a point from local space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        mat4::transform_point(self.to_matrix(), p)
    }

    /// Largest absolute scale component, used for bounding spheres
    #[inline]
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
    }

    /// World matrix of a child whose transform is relative to this one
    pub fn compose(&self, child: &Transform3D) -> Mat4 {
        mat4::mul(self.to_matrix(), child.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform3D::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(t.transform_point(p), p));
    }

    #[test]
    fn test_transform_order() {
        // Scale 2, rotate 90 degrees about Y, translate +X
        let t = Transform3D::from_position(Vec3::new(1.0, 0.0, 0.0))
            .with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0))
            .with_uniform_scale(2.0);
        // (0,0,1) -> (0,0,2) -> (2,0,0) -> (3,0,0)
        let p = t.transform_point(Vec3::Z);
        assert!(vec_approx_eq(p, Vec3::new(3.0, 0.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_max_scale() {
        let t = Transform3D::identity().with_scale(Vec3::new(0.5, -3.0, 2.0));
        assert_eq!(t.max_scale(), 3.0);
    }

    #[test]
    fn test_compose_applies_parent_after_child() {
        let parent = Transform3D::from_position(Vec3::new(0.0, 5.0, 0.0)).with_uniform_scale(2.0);
        let child = Transform3D::from_position(Vec3::new(1.0, 0.0, 0.0));
        let m = parent.compose(&child);
        let p = mat4::transform_point(m, Vec3::ZERO);
        assert!(vec_approx_eq(p, Vec3::new(2.0, 5.0, 0.0)));
    }

    #[test]
    fn test_ron_defaults() {
        let t: Transform3D = ron::from_str("(position: (x: 1.0, y: 2.0, z: 3.0))").unwrap();
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }
}
