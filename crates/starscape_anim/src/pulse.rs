//! Sinusoidal scale pulsation

use serde::{Serialize, Deserialize};

/// Pulse speed while idle
pub const IDLE_PULSE_SPEED: f32 = 2.0;
/// Pulse speed while the pointer is over the object
pub const HOVER_PULSE_SPEED: f32 = 5.0;

/// Uniform scale pulsation: `1 + sin(s·t)·amplitude`
///
/// The speed `s` switches between `idle_speed` and `hover_speed` immediately,
/// without easing, so a hover takes effect on the next evaluated frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub idle_speed: f32,
    pub hover_speed: f32,
    pub amplitude: f32,
    /// Base scale of the glow shell relative to the core
    pub glow_multiplier: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            idle_speed: IDLE_PULSE_SPEED,
            hover_speed: HOVER_PULSE_SPEED,
            amplitude: 0.2,
            glow_multiplier: 1.5,
        }
    }
}

impl Pulse {
    /// Create a pulse with the default speeds
    pub fn new(amplitude: f32, glow_multiplier: f32) -> Self {
        Self {
            amplitude,
            glow_multiplier,
            ..Self::default()
        }
    }

    /// Builder: set idle and hover speeds
    pub fn with_speeds(mut self, idle: f32, hover: f32) -> Self {
        self.idle_speed = idle;
        self.hover_speed = hover;
        self
    }

    /// Current pulse speed
    #[inline]
    pub fn speed(&self, hovered: bool) -> f32 {
        if hovered {
            self.hover_speed
        } else {
            self.idle_speed
        }
    }

    /// Core scale factor at time `t`
    pub fn scale_at(&self, t: f32, hovered: bool) -> f32 {
        1.0 + (self.speed(hovered) * t).sin() * self.amplitude
    }

    /// Glow scale factor at time `t`, in phase with the core
    pub fn glow_scale_at(&self, t: f32, hovered: bool) -> f32 {
        self.scale_at(t, hovered) * self.glow_multiplier
    }

    /// Period of the pulsation, `None` when the speed is zero
    pub fn period(&self, hovered: bool) -> Option<f32> {
        let s = self.speed(hovered);
        if s == 0.0 {
            None
        } else {
            Some(std::f32::consts::TAU / s.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded() {
        let pulse = Pulse::new(0.3, 1.5);
        for i in 0..500 {
            let t = i as f32 * 0.013;
            for hovered in [false, true] {
                let s = pulse.scale_at(t, hovered);
                assert!(s >= 0.7 - 1e-6 && s <= 1.3 + 1e-6, "t={} s={}", t, s);
            }
        }
    }

    #[test]
    fn test_periodic() {
        let pulse = Pulse::new(0.25, 1.5);
        let period = pulse.period(false).unwrap();
        for i in 0..20 {
            let t = i as f32 * 0.11;
            let a = pulse.scale_at(t, false);
            let b = pulse.scale_at(t + period, false);
            assert!((a - b).abs() < 1e-4, "t={} a={} b={}", t, a, b);
        }
    }

    #[test]
    fn test_hover_switches_speed_immediately() {
        let pulse = Pulse::default();
        assert_eq!(pulse.speed(false), 2.0);
        assert_eq!(pulse.speed(true), 5.0);

        let t = 0.3;
        let expected = 1.0 + (5.0f32 * t).sin() * pulse.amplitude;
        assert!((pulse.scale_at(t, true) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_glow_in_lockstep() {
        let pulse = Pulse::new(0.2, 1.8);
        for i in 0..50 {
            let t = i as f32 * 0.07;
            let ratio = pulse.glow_scale_at(t, false) / pulse.scale_at(t, false);
            assert!((ratio - 1.8).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_speed_has_no_period() {
        let pulse = Pulse::default().with_speeds(0.0, 5.0);
        assert_eq!(pulse.period(false), None);
        assert_eq!(pulse.scale_at(12.0, false), 1.0);
    }
}
