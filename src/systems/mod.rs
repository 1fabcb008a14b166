//! Application systems
//!
//! The frame driver, pointer dispatch, window and renderer, kept out of
//! main.rs so they can be tested on their own.

mod interaction;
mod render;
mod simulation;
mod window;

pub use interaction::InteractionSystem;
pub use render::{RenderError, RenderSystem};
pub use simulation::{SimulationResult, SimulationSystem};
pub use window::{format_title, TitleStatus, WindowError, WindowSystem};
