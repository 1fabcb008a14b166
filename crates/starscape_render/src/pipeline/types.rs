//! GPU-compatible data types for the scene pipelines
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use starscape_math::mat4::{self, Mat4};

/// A mesh vertex in local space
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

/// Per-instance data for one drawn entity or part
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// World matrix (column-major)
    pub model: Mat4,
    /// Linear RGBA; alpha is the opacity
    pub color: [f32; 4],
    /// Emissive RGB premultiplied by intensity; `w` is 1.0 when the surface texture applies
    pub emissive: [f32; 4],
}

impl Default for InstanceData {
    fn default() -> Self {
        Self {
            model: mat4::IDENTITY,
            color: [1.0; 4],
            emissive: [0.0; 4],
        }
    }
}

/// Uniforms shared by every mesh draw in a frame
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: Mat4,
    pub camera_position: [f32; 3],
    pub time: f32,
    /// Point light position (the star at the centre of the system)
    pub light_position: [f32; 3],
    pub ambient: f32,
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
            camera_position: [0.0, 0.0, 10.0],
            time: 0.0,
            light_position: [0.0; 3],
            ambient: 0.15,
        }
    }
}

/// One background star, drawn as a camera-facing quad
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

/// Uniforms for the starfield pass
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct StarUniforms {
    pub view_proj: Mat4,
    /// Rotation of the whole shell about Y
    pub rotation: Mat4,
    /// Camera right axis (w unused)
    pub camera_right: [f32; 4],
    /// Camera up axis (w unused)
    pub camera_up: [f32; 4],
}

impl Default for StarUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
            rotation: mat4::IDENTITY,
            camera_right: [1.0, 0.0, 0.0, 0.0],
            camera_up: [0.0, 1.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_vertex_size() {
        // 3 + 3 + 2 floats
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn test_instance_data_size() {
        // mat4 (64) + color (16) + emissive (16)
        assert_eq!(std::mem::size_of::<InstanceData>(), 96);
    }

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 96);
        assert_eq!(std::mem::size_of::<StarUniforms>(), 160);
        assert_eq!(std::mem::size_of::<StarUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<StarInstance>(), 32);
    }
}
