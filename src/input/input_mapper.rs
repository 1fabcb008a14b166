//! Input mapping from raw events to semantic actions
//!
//! The keyboard stands in for the on-screen controls: arrow keys and `+`/`-`
//! step the starfield speed, `P` opens or closes the control panel.
//! Mouse input is NOT mapped here; it goes to the pointer tracker and the
//! orbit controller.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Starfield speed up one step (Up, `=`, numpad `+`)
    SpeedUp,
    /// Starfield speed down one step (Down, `-`, numpad `-`)
    SpeedDown,
    /// Starfield speed back to its default (Backspace)
    SpeedReset,
    /// Reset camera to starting position (R key)
    ResetCamera,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Expand or collapse the control panel (P key)
    TogglePanel,
    /// Toggle orbit input smoothing (G key)
    ToggleSmoothing,
    /// Exit application (Escape)
    Exit,
}

/// Maps raw key events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `None` for releases and unmapped keys
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::ArrowUp | KeyCode::Equal | KeyCode::NumpadAdd => Some(InputAction::SpeedUp),
            KeyCode::ArrowDown | KeyCode::Minus | KeyCode::NumpadSubtract => Some(InputAction::SpeedDown),
            KeyCode::Backspace => Some(InputAction::SpeedReset),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyP => Some(InputAction::TogglePanel),
            KeyCode::KeyG => Some(InputAction::ToggleSmoothing),
            KeyCode::Escape => Some(InputAction::Exit),
            _ => None,
        }
    }
}
