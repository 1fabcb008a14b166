//! Mesh generation for the shape descriptions
//!
//! Each distinct [`Shape`] is tessellated once and drawn instanced.

use std::f32::consts::{PI, TAU};

use starscape_core::Shape;

use crate::pipeline::MeshVertex;

const SPHERE_SEGMENTS: u32 = 48;
const SPHERE_RINGS: u32 = 32;
const TORUS_RADIAL: u32 = 64;
const TORUS_TUBULAR: u32 = 16;

/// Hashable identity of a shape, used to share meshes between instances
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeKey {
    kind: u8,
    a: u32,
    b: u32,
}

impl From<Shape> for ShapeKey {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Sphere { radius } => Self { kind: 0, a: radius.to_bits(), b: 0 },
            Shape::Torus { radius, tube } => Self { kind: 1, a: radius.to_bits(), b: tube.to_bits() },
            Shape::Plane { width, height } => Self { kind: 2, a: width.to_bits(), b: height.to_bits() },
        }
    }
}

/// Indexed triangle list
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Tessellate a shape
    pub fn for_shape(shape: &Shape) -> Self {
        match *shape {
            Shape::Sphere { radius } => uv_sphere(radius, SPHERE_SEGMENTS, SPHERE_RINGS),
            Shape::Torus { radius, tube } => torus(radius, tube, TORUS_RADIAL, TORUS_TUBULAR),
            Shape::Plane { width, height } => quad(width, height),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Emit the two triangles of a grid cell
    fn push_grid(&mut self, columns: u32, rows: u32) {
        let stride = columns + 1;
        for row in 0..rows {
            for col in 0..columns {
                let a = row * stride + col;
                let b = a + stride;
                self.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
    }
}

/// Sphere with `segments` around the equator and `rings` from pole to pole
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = MeshData::default();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let (sin_t, cos_t) = (v * PI).sin_cos();
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let (sin_p, cos_p) = (u * TAU).sin_cos();
            let normal = [sin_t * cos_p, cos_t, sin_t * sin_p];
            let position = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
            mesh.vertices.push(MeshVertex::new(position, normal, [u, v]));
        }
    }
    mesh.push_grid(segments, rings);
    mesh
}

/// Torus in the XY plane around the Z axis
pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> MeshData {
    let radial = radial.max(3);
    let tubular = tubular.max(3);
    let mut mesh = MeshData::default();

    for i in 0..=radial {
        let u = i as f32 / radial as f32;
        let (sin_u, cos_u) = (u * TAU).sin_cos();
        for j in 0..=tubular {
            let v = j as f32 / tubular as f32;
            let (sin_v, cos_v) = (v * TAU).sin_cos();
            let ring = radius + tube * cos_v;
            let position = [ring * cos_u, ring * sin_u, tube * sin_v];
            let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];
            mesh.vertices.push(MeshVertex::new(position, normal, [u, v]));
        }
    }
    mesh.push_grid(tubular, radial);
    mesh
}

/// Quad in the XY plane facing +Z
pub fn quad(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let normal = [0.0, 0.0, 1.0];
    MeshData {
        vertices: vec![
            MeshVertex::new([-hw, -hh, 0.0], normal, [0.0, 1.0]),
            MeshVertex::new([hw, -hh, 0.0], normal, [1.0, 1.0]),
            MeshVertex::new([hw, hh, 0.0], normal, [1.0, 0.0]),
            MeshVertex::new([-hw, hh, 0.0], normal, [0.0, 0.0]),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    fn indices_in_bounds(mesh: &MeshData) -> bool {
        mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len())
    }

    #[test]
    fn test_sphere_counts_and_radius() {
        let mesh = uv_sphere(2.0, 8, 4);
        assert_eq!(mesh.vertex_count(), 9 * 5);
        assert_eq!(mesh.triangle_count(), 8 * 4 * 2);
        assert!(indices_in_bounds(&mesh));
        for v in &mesh.vertices {
            assert!((length(v.position) - 2.0).abs() < EPSILON);
            assert!((length(v.normal) - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_torus_points_lie_on_tube() {
        let mesh = torus(3.0, 0.5, 12, 6);
        assert!(indices_in_bounds(&mesh));
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let ring = (x * x + y * y).sqrt() - 3.0;
            assert!(((ring * ring + z * z).sqrt() - 0.5).abs() < 1e-3);
        }
    }

    #[test]
    fn test_quad_faces_positive_z() {
        let mesh = quad(4.0, 2.0);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert_eq!(mesh.vertices[2].position, [2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_degenerate_tessellation_is_raised() {
        let mesh = uv_sphere(1.0, 0, 0);
        assert_eq!(mesh.vertex_count(), 4 * 3);
    }

    #[test]
    fn test_shape_key_distinguishes_dimensions() {
        assert_eq!(ShapeKey::from(Shape::sphere(1.0)), ShapeKey::from(Shape::sphere(1.0)));
        assert_ne!(ShapeKey::from(Shape::sphere(1.0)), ShapeKey::from(Shape::sphere(2.0)));
        assert_ne!(ShapeKey::from(Shape::torus(1.0, 0.1)), ShapeKey::from(Shape::plane(1.0, 0.1)));
    }

    #[test]
    fn test_for_shape_dispatch() {
        assert_eq!(MeshData::for_shape(&Shape::plane(1.0, 1.0)).vertex_count(), 4);
        assert!(MeshData::for_shape(&Shape::torus(1.0, 0.2)).triangle_count() > 0);
    }
}
