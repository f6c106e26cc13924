// ─────────────────────────────────────────────────────────────────────
// Wavefield — Simulation Parameters
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Clamp a value to [0, 1], mapping NaN to 0 and Inf to the nearest bound.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_unit: NaN detected, clamping to 0");
        return 0.0;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { 1.0 } else { 0.0 };
        log::warn!("clamp_unit: Inf detected, clamping to {boundary:.1}");
        return boundary;
    }
    value.clamp(0.0, 1.0)
}

/// One consistent set of simulation parameters.
///
/// The engine owns a live copy behind a lock; every frame works on a
/// by-value snapshot of this struct so the parallel evaluator never
/// reads mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Spatial frequency k of every landmark wave. Larger values give
    /// sharper localisation. Negative values are accepted as-is.
    pub wave_number: f64,
    /// Amplitude attenuation per unit of absolute residual.
    pub decay_factor: f64,
    /// Weight α given to the previous frame, always in [0, 1].
    pub feedback_strength: f64,
    /// Seconds of simulated time, advanced once per frame.
    pub elapsed_time: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            wave_number: 80.0,
            decay_factor: 5.0,
            feedback_strength: 0.9,
            elapsed_time: 0.0,
        }
    }
}

impl SimulationParameters {
    /// Build a parameter set at `elapsed_time = 0`; `feedback_strength`
    /// is clamped to [0, 1].
    pub fn new(wave_number: f64, decay_factor: f64, feedback_strength: f64) -> Self {
        Self {
            wave_number,
            decay_factor,
            feedback_strength: clamp_unit(feedback_strength),
            elapsed_time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_pos_inf() {
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_clamp_neg_inf() {
        assert_eq!(clamp_unit(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_clamp_in_range() {
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(-0.3), 0.0);
    }

    #[test]
    fn test_new_clamps_feedback() {
        let p = SimulationParameters::new(20.0, 2.0, 3.0);
        assert_eq!(p.feedback_strength, 1.0);
        assert_eq!(p.elapsed_time, 0.0);
    }

    #[test]
    fn test_new_keeps_negative_wave_number() {
        let p = SimulationParameters::new(-4.0, 0.0, 0.5);
        assert_eq!(p.wave_number, -4.0);
    }
}
