//! Frame driver
//!
//! Runs one frame of the scene:
//! - Delta time calculation
//! - Camera orbit input
//! - Pointer picking and interaction dispatch
//! - Clock advance and entity updates

use std::time::Instant;
use starscape_core::{ActiveScene, EntityHandle, FrameReport, PointerEvent};
use starscape_input::{OrbitController, PointerState};
use starscape_render::Camera3D;

use super::InteractionSystem;

/// Result of a simulation update
pub struct SimulationResult {
    /// Seconds the scene clock advanced
    pub dt: f32,
    /// Pointer events delivered this frame
    pub events: Vec<(EntityHandle, PointerEvent)>,
    /// Entities updated and entities skipped
    pub report: FrameReport,
}

/// Drives the scene once per redraw
pub struct SimulationSystem {
    last_frame: Instant,
    max_dt: f32,
    interaction: InteractionSystem,
}

impl SimulationSystem {
    /// Create a frame driver; frame steps longer than `max_dt` are cut to it
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            max_dt: max_dt.max(0.0),
            interaction: InteractionSystem::new(),
        }
    }

    /// Seconds since the previous frame at `now`, capped
    fn step_to(&mut self, now: Instant) -> f32 {
        let raw_dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        // Cap dt so a stall (first frame, window drag) does not jump the animation
        raw_dt.min(self.max_dt)
    }

    /// Run one frame
    ///
    /// # Arguments
    /// * `scene` - The running scene
    /// * `camera` - Orbit camera, moved by `controller`
    /// * `controller` - Accumulated drag and scroll input
    /// * `pointer` - Pointer snapshot for this frame
    /// * `aspect` - Surface width over height, for picking rays
    pub fn update(
        &mut self,
        scene: &mut ActiveScene,
        camera: &mut Camera3D,
        controller: &mut OrbitController,
        pointer: PointerState,
        aspect: f32,
    ) -> SimulationResult {
        let dt = self.step_to(Instant::now());
        self.advance(scene, camera, controller, pointer, aspect, dt)
    }

    /// Run one frame of a given length
    pub fn advance(
        &mut self,
        scene: &mut ActiveScene,
        camera: &mut Camera3D,
        controller: &mut OrbitController,
        pointer: PointerState,
        aspect: f32,
        dt: f32,
    ) -> SimulationResult {
        let dt = dt.clamp(0.0, self.max_dt);

        // 1. Camera input
        controller.update(camera, dt);

        // 2. Pointer events feed this frame's update
        let ray = pointer.ndc.map(|ndc| camera.ray_through(ndc, aspect));
        let events = self.interaction.process(&mut scene.world, ray, &pointer);

        // 3. Advance the clock and every entity
        let report = scene.update(dt, camera.pose());

        SimulationResult { dt, events, report }
    }

    /// Entity currently under the pointer
    pub fn hovered(&self) -> Option<EntityHandle> {
        self.interaction.hovered()
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use starscape_core::{Entity, Shape, Transform3D, World};
    use starscape_anim::seeded_rng;
    use starscape_core::StarfieldSettings;
    use starscape_math::Vec3;

    fn scene() -> ActiveScene {
        let settings = StarfieldSettings { count: 8, ..StarfieldSettings::default() };
        let mut scene = ActiveScene::new("test", settings, &mut seeded_rng(Some(1)));
        let mut world = World::new();
        world.add_entity(
            Entity::new(Shape::sphere(1.0))
                .with_name("target")
                .with_transform(Transform3D::from_position(Vec3::ZERO))
                .pickable(1.0),
        );
        scene.world = world;
        scene
    }

    #[test]
    fn test_delta_time_capped() {
        let mut sim = SimulationSystem::new(0.25);
        let start = sim.last_frame;
        assert!((sim.step_to(start + Duration::from_millis(100)) - 0.1).abs() < 1e-4);
        // A long stall is cut to the cap
        assert_eq!(sim.step_to(start + Duration::from_secs(5)), 0.25);
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut sim = SimulationSystem::default();
        let start = sim.last_frame;
        sim.step_to(start + Duration::from_secs(1));
        assert_eq!(sim.step_to(start), 0.0);
    }

    #[test]
    fn test_advance_moves_clock_and_picks() {
        let mut sim = SimulationSystem::default();
        let mut scene = scene();
        let mut camera = Camera3D::default();
        let mut controller = OrbitController::new();
        let pointer = PointerState { ndc: Some((0.0, 0.0)), clicked: true, dragging: false };

        let result = sim.advance(&mut scene, &mut camera, &mut controller, pointer, 1.0, 0.1);
        assert_eq!(result.dt, 0.1);
        assert!(result.report.is_clean());
        assert_eq!(result.events.len(), 2);
        assert!((scene.elapsed() - 0.1).abs() < 1e-6);

        let handle = scene.world.find_by_name("target").unwrap();
        assert_eq!(sim.hovered(), Some(handle));
        assert!(scene.world.get_entity(handle).unwrap().interaction.is_selected());
    }
}
