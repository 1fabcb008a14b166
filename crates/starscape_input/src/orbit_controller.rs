//! Orbit camera controller
//!
//! Controls:
//! - Left drag: orbit around the target (yaw/pitch)
//! - Scroll: zoom in/out
//! - Idle: optional slow auto-rotation

use starscape_math::Vec3;
use winit::event::{ElementState, MouseButton};

/// Camera controller for orbit-style input
pub struct OrbitController {
    // Mouse state
    mouse_pressed: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,

    // Input smoothing state
    smooth_yaw: f32,
    smooth_pitch: f32,

    // Configuration
    pub orbit_sensitivity: f32,
    pub zoom_sensitivity: f32,
    /// Radians per second of yaw applied while not dragging
    pub auto_rotate_speed: f32,
    pub smoothing_half_life: f32,  // Exponential smoothing half-life in seconds
    pub smoothing_enabled: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            mouse_pressed: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,

            smooth_yaw: 0.0,
            smooth_pitch: 0.0,

            orbit_sensitivity: 0.005,
            zoom_sensitivity: 1.0,
            auto_rotate_speed: 0.0,
            smoothing_half_life: 0.05,
            smoothing_enabled: false,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.mouse_pressed = state == ElementState::Pressed;
        }
    }

    /// Process mouse movement; only accumulates while the left button is held
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.mouse_pressed {
            self.pending_yaw += delta_x as f32;
            self.pending_pitch += delta_y as f32;
        }
    }

    /// Process scroll input in lines; positive scrolls toward the target
    pub fn process_scroll(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    /// Apply accumulated input to the camera; returns the camera position
    pub fn update<C: CameraControl>(&mut self, camera: &mut C, dt: f32) -> Vec3 {
        let (yaw_input, pitch_input) = if self.smoothing_enabled && dt > 0.0 {
            // factor = 2^(-dt / half_life), so smaller half_life = faster response
            let smooth_factor = 2.0f32.powf(-dt / self.smoothing_half_life);
            self.smooth_yaw = self.smooth_yaw * smooth_factor + self.pending_yaw * (1.0 - smooth_factor);
            self.smooth_pitch = self.smooth_pitch * smooth_factor + self.pending_pitch * (1.0 - smooth_factor);
            (self.smooth_yaw, self.smooth_pitch)
        } else {
            (self.pending_yaw, self.pending_pitch)
        };

        // Dragging right swings the camera left around the target
        let mut yaw = -yaw_input * self.orbit_sensitivity;
        let pitch = pitch_input * self.orbit_sensitivity;
        if !self.mouse_pressed && dt > 0.0 {
            yaw += self.auto_rotate_speed * dt;
        }
        if yaw != 0.0 || pitch != 0.0 {
            camera.orbit(yaw, pitch);
        }

        if self.pending_zoom != 0.0 {
            camera.zoom(-self.pending_zoom * self.zoom_sensitivity);
        }

        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_zoom = 0.0;

        camera.position()
    }

    /// True while the orbit button is held
    pub fn is_dragging(&self) -> bool {
        self.mouse_pressed
    }

    /// Toggle input smoothing on/off
    pub fn toggle_smoothing(&mut self) -> bool {
        self.smoothing_enabled = !self.smoothing_enabled;
        self.smooth_yaw = 0.0;
        self.smooth_pitch = 0.0;
        self.smoothing_enabled
    }

    /// Builder: set orbit sensitivity (radians per pixel)
    pub fn with_orbit_sensitivity(mut self, sensitivity: f32) -> Self {
        self.orbit_sensitivity = sensitivity;
        self
    }

    /// Builder: set zoom distance per scroll line
    pub fn with_zoom_sensitivity(mut self, sensitivity: f32) -> Self {
        self.zoom_sensitivity = sensitivity;
        self
    }

    /// Builder: set idle auto-rotation speed
    pub fn with_auto_rotate(mut self, speed: f32) -> Self {
        self.auto_rotate_speed = speed;
        self
    }

    /// Builder: enable or disable smoothing
    pub fn with_smoothing(mut self, enabled: bool) -> Self {
        self.smoothing_enabled = enabled;
        self
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait CameraControl {
    /// Rotate around the target by yaw (about world Y) and pitch
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32);
    /// Change the distance to the target; positive moves away
    fn zoom(&mut self, delta: f32);
    fn position(&self) -> Vec3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockCamera {
        yaw: f32,
        pitch: f32,
        distance: f32,
        orbit_calls: usize,
    }

    impl CameraControl for MockCamera {
        fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
            self.yaw += delta_yaw;
            self.pitch += delta_pitch;
            self.orbit_calls += 1;
        }

        fn zoom(&mut self, delta: f32) {
            self.distance += delta;
        }

        fn position(&self) -> Vec3 {
            Vec3::new(self.yaw, self.pitch, self.distance)
        }
    }

    #[test]
    fn test_motion_ignored_without_drag() {
        let mut controller = OrbitController::new();
        let mut camera = MockCamera::default();
        controller.process_mouse_motion(100.0, 50.0);
        controller.update(&mut camera, 0.016);
        assert_eq!(camera.orbit_calls, 0);
    }

    #[test]
    fn test_drag_orbits() {
        let mut controller = OrbitController::new().with_orbit_sensitivity(0.01);
        let mut camera = MockCamera::default();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_motion(10.0, -20.0);
        controller.update(&mut camera, 0.016);
        assert!((camera.yaw + 0.1).abs() < 1e-6);
        assert!((camera.pitch + 0.2).abs() < 1e-6);

        // Pending input is consumed
        controller.update(&mut camera, 0.016);
        assert_eq!(camera.orbit_calls, 1);
    }

    #[test]
    fn test_scroll_zooms_in() {
        let mut controller = OrbitController::new().with_zoom_sensitivity(2.0);
        let mut camera = MockCamera::default();
        controller.process_scroll(1.5);
        controller.update(&mut camera, 0.016);
        assert!((camera.distance + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_auto_rotate_only_when_idle() {
        let mut controller = OrbitController::new().with_auto_rotate(0.5);
        let mut camera = MockCamera::default();
        controller.update(&mut camera, 2.0);
        assert!((camera.yaw - 1.0).abs() < 1e-6);

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.update(&mut camera, 2.0);
        assert!((camera.yaw - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_smoothing() {
        let mut controller = OrbitController::new();
        assert!(controller.toggle_smoothing());
        assert!(!controller.toggle_smoothing());
    }
}
