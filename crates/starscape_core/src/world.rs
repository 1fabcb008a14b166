//! World container for entities
//!
//! The World owns every animated object of a scene, updates them once per
//! frame and routes pointer events to them.

use std::cell::Cell;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use starscape_anim::PointerEvent;

use crate::frame::{AnimationFrameError, FrameContext, FrameReport};
use crate::picking::Ray;
use crate::Entity;

thread_local! {
    /// Set while an entity update runs; its panics are reported through the log
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Wrap the process panic hook so entity update panics stay off stderr
fn install_quiet_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(|quiet| quiet.get()) {
                previous(info);
            }
        }));
    });
}

/// A handle to an entity in the world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle(usize);

impl EntityHandle {
    /// Get the raw index of this handle
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Nearest entity under a picking ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub handle: EntityHandle,
    pub distance: f32,
}

/// Container for all entities of a scene
///
/// Entities are never removed individually; the whole world is dropped on
/// scene teardown.
pub struct World {
    entities: Vec<Entity>,
    /// Entities whose update has panicked at least once
    faulted: HashSet<usize>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            faulted: HashSet::new(),
        }
    }

    /// Create a world with pre-allocated capacity for entities
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            faulted: HashSet::new(),
        }
    }

    /// Add an entity to the world, returning its handle
    pub fn add_entity(&mut self, entity: Entity) -> EntityHandle {
        let handle = EntityHandle(self.entities.len());
        self.entities.push(entity);
        handle
    }

    /// Get a reference to an entity by handle
    pub fn get_entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle.0)
    }

    /// Get a mutable reference to an entity by handle
    pub fn get_entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle.0)
    }

    /// Find the first entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<EntityHandle> {
        self.entities
            .iter()
            .position(|e| e.name.as_deref() == Some(name))
            .map(EntityHandle)
    }

    /// Handles of all entities carrying `tag`
    pub fn find_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = EntityHandle> + 'a {
        self.iter_with_handles()
            .filter(move |(_, e)| e.has_tag(tag))
            .map(|(h, _)| h)
    }

    /// Get all entities as a slice
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Get the number of entities
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Check if the world is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Update every entity for one frame
    ///
    /// Entities are independent, so order does not matter. An entity whose
    /// update panics is rolled back to its state before the frame and is
    /// reported in the returned [`FrameReport`]; the others still update.
    pub fn update(&mut self, ctx: &FrameContext) -> FrameReport {
        let mut report = FrameReport::default();

        install_quiet_panic_hook();

        for (index, entity) in self.entities.iter_mut().enumerate() {
            let previous = entity.snapshot();
            QUIET_PANICS.with(|quiet| quiet.set(true));
            let result = panic::catch_unwind(AssertUnwindSafe(|| entity.update(ctx)));
            QUIET_PANICS.with(|quiet| quiet.set(false));
            match result {
                Ok(()) => report.updated += 1,
                Err(payload) => {
                    entity.restore(previous);
                    let error = AnimationFrameError {
                        entity: EntityHandle(index),
                        name: entity.label().to_string(),
                        message: panic_message(payload.as_ref()),
                    };
                    if self.faulted.insert(index) {
                        log::warn!("{}; skipping it this frame", error);
                    } else {
                        log::debug!("{}", error);
                    }
                    report.failures.push(error);
                }
            }
        }

        report
    }

    /// Nearest pickable entity hit by `ray`
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.iter_with_handles()
            .filter_map(|(handle, entity)| {
                let (center, radius) = entity.bounding_sphere()?;
                ray.intersect_sphere(center, radius)
                    .map(|distance| PickHit { handle, distance })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Deliver a pointer event to one entity; returns true if its state changed
    pub fn dispatch(&mut self, handle: EntityHandle, event: PointerEvent) -> bool {
        let Some(entity) = self.entities.get_mut(handle.0) else {
            return false;
        };
        let changed = entity.handle_pointer(event);
        if changed {
            log::debug!(
                "{:?} on '{}' -> {:?}",
                event,
                entity.label(),
                entity.interaction.state()
            );
        }
        changed
    }

    /// Clear all entities from the world
    pub fn clear(&mut self) {
        self.entities.clear();
        self.faulted.clear();
    }

    /// Iterate over all entities
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over handles and entities
    pub fn iter_with_handles(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityHandle(i), e))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
