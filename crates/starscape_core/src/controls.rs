//! User-adjustable scene controls

use serde::{Serialize, Deserialize};

/// Bounds and step of a range control
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl Default for RangeSpec {
    /// The starfield speed control
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 2.0,
            step: 0.1,
            default: 0.5,
        }
    }
}

/// A clamped, stepped scalar control
///
/// Every write clamps to `[min, max]` and snaps to the nearest step from
/// `min`. Out-of-range or non-finite input never errors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSlider {
    spec: RangeSpec,
    value: f32,
}

impl Default for RangeSlider {
    fn default() -> Self {
        Self::new(RangeSpec::default())
    }
}

impl RangeSlider {
    /// Create a slider at its default value
    ///
    /// Swapped bounds are reordered; a non-positive step disables snapping.
    pub fn new(spec: RangeSpec) -> Self {
        let (min, max) = if spec.min <= spec.max {
            (spec.min, spec.max)
        } else {
            (spec.max, spec.min)
        };
        let spec = RangeSpec { min, max, ..spec };
        let mut slider = Self { spec, value: min };
        slider.value = slider.sanitize(spec.default, min);
        slider
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn spec(&self) -> RangeSpec {
        self.spec
    }

    /// Set the value; returns the stored (clamped and snapped) value
    pub fn set(&mut self, value: f32) -> f32 {
        self.value = self.sanitize(value, self.value);
        self.value
    }

    /// Move up one step
    pub fn increment(&mut self) -> f32 {
        self.set(self.value + self.spec.step)
    }

    /// Move down one step
    pub fn decrement(&mut self) -> f32 {
        self.set(self.value - self.spec.step)
    }

    /// Return to the default value
    pub fn reset(&mut self) -> f32 {
        self.set(self.spec.default)
    }

    fn sanitize(&self, value: f32, fallback: f32) -> f32 {
        let RangeSpec { min, max, step, .. } = self.spec;
        if !value.is_finite() {
            return fallback;
        }
        let clamped = value.clamp(min, max);
        if step > 0.0 {
            let steps = ((clamped - min) / step).round();
            (min + steps * step).clamp(min, max)
        } else {
            clamped
        }
    }
}
