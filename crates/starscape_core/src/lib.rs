//! Core types for Starscape
//!
//! This crate provides the retained scene the animation runs on:
//!
//! - [`Transform3D`] - Position, rotation, and scale
//! - [`Entity`] - An animated object with shape, materials, behaviour and parts
//! - [`Behavior`] - What an entity does each frame
//! - [`World`] - Container for all entities; frame update, picking, pointer dispatch
//! - [`Clock`] - The single monotone scene clock
//! - [`Scene`] / [`ActiveScene`] - RON scene templates and the running scene
//! - [`RangeSlider`] - The clamped starfield speed control
//! - [`TextureLoader`] / [`AssetSlot`] - Background texture loading and its boundary

mod transform;
mod entity;
mod behavior;
mod shapes;
mod frame;
mod clock;
mod picking;
mod world;
mod controls;
mod scene;
mod scene_validator;
mod asset_error;
mod texture_loader;

pub use transform::Transform3D;
pub use entity::{DirtyFlags, Entity, EntityTemplate, Material, MaterialStates, Mount, Part, PartMotion};
pub use behavior::{Animator, Behavior};
pub use shapes::Shape;
pub use frame::{AnimationFrameError, FrameContext, FrameReport};
pub use clock::Clock;
pub use picking::Ray;
pub use world::{EntityHandle, PickHit, World};
pub use controls::{RangeSlider, RangeSpec};
pub use scene::{ActiveScene, Scene, SceneError, SceneLoadError, StarfieldSettings};
pub use scene_validator::{SceneValidator, ValidationError};
pub use asset_error::AssetError;
pub use texture_loader::{load_texture, AssetSlot, TextureData, TextureLoadResult, TextureLoader};

// Re-export commonly used types for convenience
pub use starscape_math::{Vec3, Mat4};
pub use starscape_anim::{CameraPose, Interaction, InteractionState, PointerEvent};
