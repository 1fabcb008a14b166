//! Scalar interpolation helpers

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert a per-frame damping factor into one scaled by elapsed time
///
/// `per_frame` is the fraction of the remaining distance covered in one frame
/// at `reference_fps`. The returned factor covers the same fraction per unit
/// of real time regardless of the actual frame rate. Always in `[0, 1]`.
pub fn damp_factor(per_frame: f32, dt: f32, reference_fps: f32) -> f32 {
    let per_frame = per_frame.clamp(0.0, 1.0);
    if dt <= 0.0 {
        return 0.0;
    }
    (1.0 - (1.0 - per_frame).powf(dt * reference_fps)).clamp(0.0, 1.0)
}

/// Wrap a value into `[0, 1)`
///
/// Unlike a bare `rem_euclid`, the upper bound is never returned even when
/// rounding pushes a tiny negative input up to exactly 1.0.
#[inline]
pub fn wrap01(x: f32) -> f32 {
    let r = x.rem_euclid(1.0);
    if r >= 1.0 {
        0.0
    } else {
        r
    }
}
