//! The scene clock

/// Elapsed scene time, advanced once per frame
///
/// The clock never runs backwards: negative, zero and non-finite deltas
/// leave the elapsed time unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    elapsed: f64,
    frames: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds and return the step actually applied
    ///
    /// The step is exact even when the elapsed time has grown too large for
    /// `f32` to resolve a single frame.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let step = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += step as f64;
        self.frames += 1;
        step
    }

    /// Seconds since the scene started
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Number of frames the clock has been advanced
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
