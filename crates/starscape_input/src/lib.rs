//! Input Handling
//!
//! This crate turns raw window input into what the scene needs: a pointer
//! position in normalized device coordinates with click/drag detection, and
//! orbit/zoom control for the camera.

mod orbit_controller;
mod pointer;

pub use orbit_controller::{OrbitController, CameraControl};
pub use pointer::{PointerTracker, PointerState};
