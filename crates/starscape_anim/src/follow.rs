//! Camera-relative placement for in-scene UI panels

use serde::{Serialize, Deserialize};
use starscape_math::{Vec3, lerp, damp_factor};
use starscape_math::mat4::look_rotation;

/// Frame rate the per-frame damping constant was tuned for
const REFERENCE_FPS: f32 = 60.0;

/// Position and basis of the viewing camera for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Unit view direction
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }
}

impl CameraPose {
    /// Camera at `position` looking at `target` with +Y up
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let forward = (target - position).normalized();
        let mut right = forward.cross(Vec3::Y).normalized();
        if right.length_squared() == 0.0 {
            right = Vec3::X;
        }
        let up = right.cross(forward);
        Self { position, forward, right, up }
    }
}

/// Keeps a panel at a fixed offset in front of the camera, facing it, and eases
/// its scale toward the expanded or collapsed size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelFollow {
    /// Offset in camera space: x along right, y along up, z along forward
    pub offset: Vec3,
    pub collapsed_scale: f32,
    pub expanded_scale: f32,
    /// Fraction of the remaining scale difference closed per frame at 60 fps
    pub damping: f32,
    /// Scale the damping by elapsed time instead of applying it once per frame
    #[serde(default = "default_true")]
    pub frame_rate_independent: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PanelFollow {
    fn default() -> Self {
        Self {
            offset: Vec3::new(-2.2, -1.3, 5.0),
            collapsed_scale: 0.6,
            expanded_scale: 1.0,
            damping: 0.1,
            frame_rate_independent: true,
        }
    }
}

impl PanelFollow {
    /// World position and Euler rotation that keep the panel in front of `camera`
    pub fn placement(&self, camera: &CameraPose) -> (Vec3, Vec3) {
        let position = camera.position
            + camera.right * self.offset.x
            + camera.up * self.offset.y
            + camera.forward * self.offset.z;
        let rotation = look_rotation(camera.position - position);
        (position, rotation)
    }

    /// Scale the panel is easing toward
    pub fn target_scale(&self, expanded: bool) -> f32 {
        if expanded {
            self.expanded_scale
        } else {
            self.collapsed_scale
        }
    }

    /// Interpolation factor for one frame of length `dt`, in `[0, 1]`
    pub fn step_factor(&self, dt: f32) -> f32 {
        if self.frame_rate_independent {
            damp_factor(self.damping, dt, REFERENCE_FPS)
        } else {
            self.damping.clamp(0.0, 1.0)
        }
    }

    /// Next scale after one frame; moves toward the target without overshooting
    pub fn step_scale(&self, current: f32, expanded: bool, dt: f32) -> f32 {
        lerp(current, self.target_scale(expanded), self.step_factor(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_scale_monotonic_without_overshoot() {
        let follow = PanelFollow::default();
        let mut scale = follow.collapsed_scale;
        let mut previous = scale;
        for _ in 0..300 {
            scale = follow.step_scale(scale, true, 1.0 / 60.0);
            assert!(scale >= previous, "scale went backwards");
            assert!(scale <= follow.expanded_scale + 1e-6, "overshoot: {}", scale);
            previous = scale;
        }
        assert!((scale - follow.expanded_scale).abs() < 1e-3);
    }

    #[test]
    fn test_scale_shrinks_toward_collapsed() {
        let follow = PanelFollow::default();
        let mut scale = follow.expanded_scale;
        for _ in 0..10 {
            let next = follow.step_scale(scale, false, 1.0 / 30.0);
            assert!(next <= scale && next >= follow.collapsed_scale);
            scale = next;
        }
    }

    #[test]
    fn test_large_dt_never_overshoots() {
        let follow = PanelFollow::default();
        let scale = follow.step_scale(0.6, true, 10.0);
        assert!(scale <= 1.0 + 1e-6);
    }

    #[test]
    fn test_legacy_per_frame_damping() {
        let follow = PanelFollow { frame_rate_independent: false, ..PanelFollow::default() };
        // Same step regardless of dt
        let a = follow.step_scale(0.6, true, 1.0 / 30.0);
        let b = follow.step_scale(0.6, true, 1.0 / 144.0);
        assert_eq!(a, b);
        assert!((a - 0.64).abs() < EPSILON);
    }

    #[test]
    fn test_placement_in_front_and_facing_camera() {
        let camera = CameraPose::look_at(Vec3::new(0.0, 3.0, 12.0), Vec3::ZERO);
        let follow = PanelFollow { offset: Vec3::new(0.0, 0.0, 5.0), ..PanelFollow::default() };
        let (position, rotation) = follow.placement(&camera);

        assert!(((position - camera.position).length() - 5.0).abs() < EPSILON);
        assert!((position - camera.position).normalized().dot(camera.forward) > 0.999);

        let facing = starscape_math::mat4::transform_direction(
            starscape_math::mat4::rotation_euler(rotation),
            Vec3::Z,
        );
        let to_camera = (camera.position - position).normalized();
        assert!((facing - to_camera).length() < EPSILON);
    }

    #[test]
    fn test_camera_pose_basis_orthonormal() {
        let pose = CameraPose::look_at(Vec3::new(4.0, 2.0, -3.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(pose.forward.dot(pose.right).abs() < EPSILON);
        assert!(pose.forward.dot(pose.up).abs() < EPSILON);
        assert!((pose.up.length() - 1.0).abs() < EPSILON);
    }
}
