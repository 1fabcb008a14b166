//! Pointer tracking
//!
//! Converts cursor pixels into normalized device coordinates and tells clicks
//! apart from drags: a press that travels farther than the drag threshold
//! before release is a drag, anything else is a click.

use winit::event::{ElementState, MouseButton};

/// Pointer snapshot for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Cursor in NDC (x right, y up, both in `[-1, 1]`); `None` when outside
    pub ndc: Option<(f32, f32)>,
    /// A click completed since the last snapshot
    pub clicked: bool,
    /// The left button is held and has moved past the drag threshold
    pub dragging: bool,
}

/// Tracks cursor position and left-button clicks
#[derive(Debug)]
pub struct PointerTracker {
    cursor: Option<(f64, f64)>,
    viewport: (u32, u32),
    press_origin: Option<(f64, f64)>,
    dragging: bool,
    click_pending: bool,
    /// Pixels the cursor may travel during a click
    pub drag_threshold: f64,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl PointerTracker {
    pub fn new(drag_threshold: f64) -> Self {
        Self {
            cursor: None,
            viewport: (1, 1),
            press_origin: None,
            dragging: false,
            click_pending: false,
            drag_threshold: drag_threshold.max(0.0),
        }
    }

    /// Set the window size in physical pixels
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
        if let Some((ox, oy)) = self.press_origin {
            let (dx, dy) = (x - ox, y - oy);
            if (dx * dx + dy * dy).sqrt() > self.drag_threshold {
                self.dragging = true;
            }
        }
    }

    /// The cursor left the window; nothing is under it any more
    pub fn cursor_left(&mut self) {
        self.cursor = None;
        self.press_origin = None;
        self.dragging = false;
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.press_origin = self.cursor;
                self.dragging = false;
            }
            ElementState::Released => {
                if self.press_origin.is_some() && !self.dragging {
                    self.click_pending = true;
                }
                self.press_origin = None;
                self.dragging = false;
            }
        }
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Cursor position in normalized device coordinates
    pub fn ndc(&self) -> Option<(f32, f32)> {
        let (x, y) = self.cursor?;
        let (w, h) = self.viewport;
        if w == 0 || h == 0 {
            return None;
        }
        let nx = (2.0 * x / w as f64 - 1.0) as f32;
        let ny = (1.0 - 2.0 * y / h as f64) as f32;
        if nx.abs() > 1.0 || ny.abs() > 1.0 {
            return None;
        }
        Some((nx, ny))
    }

    /// Snapshot for this frame; clears the pending click
    pub fn take_state(&mut self) -> PointerState {
        let state = PointerState {
            ndc: self.ndc(),
            clicked: self.click_pending,
            dragging: self.dragging,
        };
        self.click_pending = false;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn tracker() -> PointerTracker {
        let mut t = PointerTracker::new(4.0);
        t.set_viewport(800, 600);
        t
    }

    #[test]
    fn test_ndc_mapping() {
        let mut t = tracker();
        assert_eq!(t.ndc(), None);

        t.cursor_moved(400.0, 300.0);
        let (x, y) = t.ndc().unwrap();
        assert!(x.abs() < EPSILON && y.abs() < EPSILON);

        t.cursor_moved(0.0, 0.0);
        let (x, y) = t.ndc().unwrap();
        assert!((x + 1.0).abs() < EPSILON && (y - 1.0).abs() < EPSILON);

        t.cursor_moved(900.0, 10.0);
        assert_eq!(t.ndc(), None);
    }

    #[test]
    fn test_click_is_reported_once() {
        let mut t = tracker();
        t.cursor_moved(100.0, 100.0);
        t.mouse_button(MouseButton::Left, ElementState::Pressed);
        t.cursor_moved(102.0, 101.0);
        t.mouse_button(MouseButton::Left, ElementState::Released);

        assert!(t.take_state().clicked);
        assert!(!t.take_state().clicked);
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut t = tracker();
        t.cursor_moved(100.0, 100.0);
        t.mouse_button(MouseButton::Left, ElementState::Pressed);
        t.cursor_moved(140.0, 100.0);
        assert!(t.is_dragging());
        assert!(t.take_state().dragging);
        t.mouse_button(MouseButton::Left, ElementState::Released);

        let state = t.take_state();
        assert!(!state.clicked);
        assert!(!state.dragging);
    }

    #[test]
    fn test_leaving_window_clears_pointer() {
        let mut t = tracker();
        t.cursor_moved(100.0, 100.0);
        t.mouse_button(MouseButton::Left, ElementState::Pressed);
        t.cursor_left();
        t.mouse_button(MouseButton::Left, ElementState::Released);
        let state = t.take_state();
        assert_eq!(state.ndc, None);
        assert!(!state.clicked);
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut t = tracker();
        t.cursor_moved(10.0, 10.0);
        t.mouse_button(MouseButton::Right, ElementState::Pressed);
        t.mouse_button(MouseButton::Right, ElementState::Released);
        assert!(!t.take_state().clicked);
    }
}
