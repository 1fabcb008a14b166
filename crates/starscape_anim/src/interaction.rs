//! Per-object pointer interaction state
//!
//! States: idle, hovered, selected.
//! - pointer-enter -> hovered
//! - pointer-leave -> idle, unless selected
//! - click -> toggles selected, independent of hover

/// Pointer events delivered to a single object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Click,
}

/// Observable interaction state of an object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Hovered,
    Selected,
}

/// Interaction flags owned by one object
///
/// Hover and selection are tracked separately so that leaving a selected
/// object keeps it selected, and re-entering it is still visible to
/// hover-driven animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
    hovered: bool,
    selected: bool,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a pointer event, returning true if any flag changed
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        let before = *self;
        match event {
            PointerEvent::Enter => self.hovered = true,
            PointerEvent::Leave => self.hovered = false,
            PointerEvent::Click => self.selected = !self.selected,
        }
        *self != before
    }

    /// Current state; selection takes precedence over hover
    pub fn state(&self) -> InteractionState {
        if self.selected {
            InteractionState::Selected
        } else if self.hovered {
            InteractionState::Hovered
        } else {
            InteractionState::Idle
        }
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set the selected flag directly (e.g. from a keyboard shortcut)
    ///
    /// Setting the current value again is a no-op. Returns true on change.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        let changed = self.selected != selected;
        self.selected = selected;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        assert_eq!(Interaction::new().state(), InteractionState::Idle);
    }

    #[test]
    fn test_enter_leave() {
        let mut i = Interaction::new();
        assert!(i.handle(PointerEvent::Enter));
        assert_eq!(i.state(), InteractionState::Hovered);
        assert!(i.handle(PointerEvent::Leave));
        assert_eq!(i.state(), InteractionState::Idle);
    }

    #[test]
    fn test_leave_keeps_selection() {
        let mut i = Interaction::new();
        i.handle(PointerEvent::Enter);
        i.handle(PointerEvent::Click);
        assert_eq!(i.state(), InteractionState::Selected);
        i.handle(PointerEvent::Leave);
        assert_eq!(i.state(), InteractionState::Selected);
        assert!(!i.is_hovered());
    }

    #[test]
    fn test_click_toggles_without_hover() {
        let mut i = Interaction::new();
        i.handle(PointerEvent::Click);
        assert!(i.is_selected());
        i.handle(PointerEvent::Click);
        assert!(!i.is_selected());
        assert_eq!(i.state(), InteractionState::Idle);
    }

    #[test]
    fn test_repeated_enter_reports_no_change() {
        let mut i = Interaction::new();
        assert!(i.handle(PointerEvent::Enter));
        assert!(!i.handle(PointerEvent::Enter));
    }

    #[test]
    fn test_set_selected_idempotent() {
        let mut i = Interaction::new();
        assert!(!i.set_selected(false));
        assert!(i.set_selected(true));
        assert!(!i.set_selected(true));
    }
}
