//! Rendering pipeline components
//!
//! The starfield pass clears the HDR target, the mesh pass draws entities
//! and parts over it; the post chain then takes the image to the surface.

pub mod types;
pub mod mesh_pipeline;
pub mod star_pipeline;

// Re-export types
pub use types::{InstanceData, MeshVertex, SceneUniforms, StarInstance, StarUniforms};

// Re-export pipelines
pub use mesh_pipeline::{MeshPipeline, DEPTH_FORMAT};
pub use star_pipeline::StarPipeline;
