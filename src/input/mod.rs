//! Input handling module
//!
//! Maps raw keyboard events to scene actions. Pointer and orbit input go
//! straight to `starscape_input`.

mod input_mapper;

pub use input_mapper::{InputMapper, InputAction};
