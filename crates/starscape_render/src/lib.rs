//! Starscape rendering library
//!
//! This crate provides the wgpu-based renderer for the scene.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::Camera3D`] - Orbit camera with picking rays
//! - [`mesh`] - Tessellation of the shape descriptions
//! - [`renderable::DrawList`] - Converts the world into instanced batches
//! - [`pipeline::StarPipeline`] / [`pipeline::MeshPipeline`] - Scene passes
//! - [`post::PostChain`] / [`post::PostProcessor`] - Ordered post-processing stack

pub mod context;
pub mod camera;
pub mod mesh;
pub mod pipeline;
pub mod post;
pub mod renderable;

// Re-export core types for convenience
pub use starscape_core::{World, Entity, Transform3D, Material, Shape};

pub use camera::Camera3D;
pub use renderable::{DrawBatch, DrawList, TextureState};
pub use post::{PostChain, PostEffect};
