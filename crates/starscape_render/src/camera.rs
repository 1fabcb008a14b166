//! Orbit camera
//!
//! The camera sits on a sphere around a target point. Yaw turns about world
//! Y, pitch tilts toward the poles (clamped short of them so the view never
//! flips). Distance is clamped to the zoom limits.

use std::f32::consts::FRAC_PI_2;

use starscape_core::{CameraPose, Ray};
use starscape_input::CameraControl;
use starscape_math::{mat4, Mat4, Vec3};

/// Pitch stops this far short of straight up or down
const PITCH_MARGIN: f32 = 0.05;

/// Perspective camera orbiting a target
#[derive(Clone, Debug)]
pub struct Camera3D {
    pub target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }
}

impl Camera3D {
    /// Place the camera at `position` looking at `target`
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            target,
            distance: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            min_distance: 0.5,
            max_distance: 500.0,
        };
        camera.set_position(position);
        camera
    }

    /// Builder: projection parameters (fov in degrees)
    pub fn with_projection(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self.near = near;
        self.far = far;
        self
    }

    /// Builder: zoom limits; the current distance is clamped into them
    pub fn with_zoom_limits(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance.max(0.01);
        self.max_distance = max_distance.max(self.min_distance);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Move the camera to `position`, keeping the target
    pub fn set_position(&mut self, position: Vec3) {
        let offset = position - self.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            self.distance = self.min_distance;
            self.yaw = 0.0;
            self.pitch = 0.0;
            return;
        }
        self.distance = distance;
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        self.pitch = clamp_pitch(self.pitch);
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World position of the eye
    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    /// Basis of the camera in world space
    pub fn pose(&self) -> CameraPose {
        CameraPose::look_at(self.eye(), self.target)
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        mat4::perspective(self.fov, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        mat4::mul(self.projection_matrix(aspect), self.view_matrix())
    }

    /// World ray through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: (f32, f32), aspect: f32) -> Ray {
        let pose = self.pose();
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * aspect;
        let direction = pose.forward + pose.right * (ndc.0 * half_width) + pose.up * (ndc.1 * half_height);
        Ray::new(pose.position, direction)
    }
}

fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-FRAC_PI_2 + PITCH_MARGIN, FRAC_PI_2 - PITCH_MARGIN)
}

impl CameraControl for Camera3D {
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = clamp_pitch(self.pitch + delta_pitch);
    }

    fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(self.min_distance, self.max_distance);
    }

    fn position(&self) -> Vec3 {
        self.eye()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_default_camera_on_positive_z() {
        let camera = Camera3D::default();
        assert!(approx_eq(camera.eye(), Vec3::new(0.0, 0.0, 10.0)));
        assert!((camera.distance() - 10.0).abs() < EPSILON);
        assert!(approx_eq(camera.pose().forward, -Vec3::Z));
    }

    #[test]
    fn test_set_position_round_trips() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let position = Vec3::new(4.0, 5.0, -2.0);
        let camera = Camera3D::new(position, target);
        assert!(approx_eq(camera.eye(), position));
    }

    #[test]
    fn test_orbit_keeps_distance_and_clamps_pitch() {
        let mut camera = Camera3D::default();
        camera.orbit(1.0, 10.0);
        assert!((camera.eye().length() - 10.0).abs() < 1e-3);
        assert!(camera.pitch() < FRAC_PI_2);
        camera.orbit(0.0, -20.0);
        assert!(camera.pitch() > -FRAC_PI_2);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera3D::default().with_zoom_limits(2.0, 20.0);
        camera.zoom(-100.0);
        assert!((camera.distance() - 2.0).abs() < EPSILON);
        camera.zoom(100.0);
        assert!((camera.distance() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = Camera3D::default();
        let ray = camera.ray_through((0.0, 0.0), 16.0 / 9.0);
        assert!(approx_eq(ray.direction, -Vec3::Z));
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_some());
    }

    #[test]
    fn test_corner_ray_spreads_with_fov() {
        let camera = Camera3D::default().with_projection(90.0, 0.1, 100.0);
        let ray = camera.ray_through((0.0, 1.0), 1.0);
        // tan(45deg) = 1, so the top edge is 45 degrees above forward
        let expected = Vec3::new(0.0, 1.0, -1.0).normalized();
        assert!(approx_eq(ray.direction, expected));
    }

    #[test]
    fn test_view_projection_maps_target_to_center() {
        let camera = Camera3D::default();
        let vp = camera.view_projection(1.0);
        let clip = [
            vp[0][0] * 0.0 + vp[3][0],
            vp[0][1] * 0.0 + vp[3][1],
            vp[3][2],
            vp[3][3],
        ];
        assert!((clip[0] / clip[3]).abs() < EPSILON);
        assert!((clip[1] / clip[3]).abs() < EPSILON);
        let depth = clip[2] / clip[3];
        assert!(depth > 0.0 && depth < 1.0);
    }
}
