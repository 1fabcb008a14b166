//! Math Library
//!
//! This crate provides the small set of vector, matrix and scalar helpers
//! the Starscape scene needs.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix for model, view and projection transforms
//!
//! ## Helpers
//!
//! - [`scalar`] - interpolation, damping and wrapping of scalar values

mod vec3;
pub mod mat4;
pub mod scalar;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use scalar::{lerp, damp_factor, wrap01};
