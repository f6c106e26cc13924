// ─────────────────────────────────────────────────────────────────────
// Wavefield — Point Probe
// ─────────────────────────────────────────────────────────────────────
//! Single-point probability queries without a grid or feedback.
//!
//! Landmarks are placed at full confidence with zero phase; `observe`
//! fills their ranges from a true agent position. Decay is fixed at
//! `PROBE_DECAY_FACTOR`.

use wavefield_physics::probability_at;
use wavefield_types::{Landmark, LandmarkSet, SimulationParameters};

pub const PROBE_DECAY_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct WaveProbe {
    wave_number: f64,
    landmarks: LandmarkSet,
}

impl WaveProbe {
    pub fn new(wave_number: f64) -> Self {
        Self {
            wave_number,
            landmarks: LandmarkSet::new(),
        }
    }

    pub fn wave_number(&self) -> f64 {
        self.wave_number
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    /// Place a landmark with unknown range (observed distance 0).
    pub fn add_landmark(&mut self, x: f64, y: f64) {
        self.landmarks.push(Landmark::at(x, y));
    }

    /// Refresh every range from the agent's true position.
    pub fn observe(&mut self, agent: [f64; 2]) {
        self.landmarks.observe_from(agent);
    }

    pub fn probability_at(&self, x: f64, y: f64) -> f64 {
        let params = SimulationParameters::new(self.wave_number, PROBE_DECAY_FACTOR, 0.0);
        probability_at([x, y], self.landmarks.as_slice(), &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_probe_is_zero() {
        let probe = WaveProbe::new(10.0);
        assert_eq!(probe.probability_at(0.3, -0.2), 0.0);
    }

    #[test]
    fn test_true_position_beats_offset() {
        let mut probe = WaveProbe::new(10.0);
        probe.add_landmark(0.0, 10.0);
        probe.add_landmark(-10.0, -10.0);
        probe.add_landmark(10.0, -10.0);
        probe.observe([0.0, 0.0]);
        assert!((probe.probability_at(0.0, 0.0) - 9.0).abs() < 1e-9);
        assert!(probe.probability_at(0.0, 0.0) > probe.probability_at(5.0, 5.0));
    }

    #[test]
    fn test_higher_wave_number_sharpens_peak() {
        let drop = |k: f64| {
            let mut probe = WaveProbe::new(k);
            probe.add_landmark(10.0, 0.0);
            probe.add_landmark(-10.0, 0.0);
            probe.observe([0.0, 0.0]);
            probe.probability_at(0.0, 0.0) - probe.probability_at(0.1, 0.0)
        };
        assert!(drop(50.0) > drop(1.0));
    }

    #[test]
    fn test_unobserved_landmarks_peak_on_themselves() {
        let mut probe = WaveProbe::new(5.0);
        probe.add_landmark(0.25, 0.25);
        assert!((probe.probability_at(0.25, 0.25) - 1.0).abs() < 1e-12);
        assert_eq!(probe.landmarks().len(), 1);
    }
}
