//! Per-frame inputs and outputs of the world update

use std::fmt;
use starscape_anim::CameraPose;

use crate::world::EntityHandle;

/// Everything an entity may read while updating
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Seconds since the scene started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub dt: f32,
    /// Camera pose for camera-relative objects
    pub camera: CameraPose,
}

impl FrameContext {
    pub fn new(elapsed: f32, dt: f32) -> Self {
        Self {
            elapsed,
            dt,
            camera: CameraPose::default(),
        }
    }

    pub fn with_camera(mut self, camera: CameraPose) -> Self {
        self.camera = camera;
        self
    }
}

/// An entity's update panicked; it was skipped for this frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrameError {
    pub entity: EntityHandle,
    pub name: String,
    pub message: String,
}

impl fmt::Display for AnimationFrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Animation update failed for entity '{}' (#{}): {}",
            self.name,
            self.entity.index(),
            self.message
        )
    }
}

impl std::error::Error for AnimationFrameError {}

/// Outcome of one world update
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Entities updated successfully
    pub updated: usize,
    /// Entities skipped because their update panicked
    pub failures: Vec<AnimationFrameError>,
}

impl FrameReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
