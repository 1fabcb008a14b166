//! Pointer interaction dispatch
//!
//! Each frame the entity under the pointer is compared with last frame's:
//! the old one gets `Leave`, the new one `Enter`. A completed click goes to
//! whatever is under the pointer. Events only change interaction state; the
//! animators read that state on the next update.

use starscape_core::{EntityHandle, PointerEvent, Ray, World};
use starscape_input::PointerState;

/// Tracks which entity the pointer is over
#[derive(Debug, Default)]
pub struct InteractionSystem {
    hovered: Option<EntityHandle>,
}

impl InteractionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity currently under the pointer
    pub fn hovered(&self) -> Option<EntityHandle> {
        self.hovered
    }

    /// Deliver this frame's pointer events; `ray` is `None` when the cursor is outside the window
    ///
    /// Returns the events in delivery order.
    pub fn process(
        &mut self,
        world: &mut World,
        ray: Option<Ray>,
        pointer: &PointerState,
    ) -> Vec<(EntityHandle, PointerEvent)> {
        let mut events = Vec::new();

        // Hover stays put while the camera is being dragged
        let hit = if pointer.dragging {
            self.hovered
        } else {
            ray.and_then(|ray| world.pick(&ray)).map(|hit| hit.handle)
        };

        if hit != self.hovered {
            if let Some(previous) = self.hovered {
                events.push((previous, PointerEvent::Leave));
            }
            if let Some(current) = hit {
                events.push((current, PointerEvent::Enter));
            }
            self.hovered = hit;
        }

        if pointer.clicked {
            if let Some(current) = hit {
                events.push((current, PointerEvent::Click));
            }
        }

        for &(handle, event) in &events {
            world.dispatch(handle, event);
        }
        events
    }

    /// Forget the hovered entity, sending it `Leave`
    pub fn clear(&mut self, world: &mut World) {
        if let Some(previous) = self.hovered.take() {
            world.dispatch(previous, PointerEvent::Leave);
        }
    }
}
