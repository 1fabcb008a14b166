//! Starscape - an animated, interactive space scene
//!
//! The binary wires these modules to a `winit` event loop:
//!
//! - [`config`] - Layered TOML + environment configuration
//! - [`scene`] - Composition of the space scene
//! - [`systems`] - Frame driver, pointer dispatch, window and renderer
//! - [`input`] - Keyboard actions

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
