// ─────────────────────────────────────────────────────────────────────
// Wavefield — Orbit Demo Scenario
// ─────────────────────────────────────────────────────────────────────
//! Synthetic observation source: a fixed triangle of landmarks and an
//! agent on a Lissajous orbit. At time `t` each landmark reports its
//! exact range to the agent and every wave shares the phase jitter
//! `phase_amplitude · sin(phase_rate · t)`.

use serde::{Deserialize, Serialize};

use wavefield_types::{Landmark, LandmarkSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitScenario {
    /// Landmark positions; ranges and phases are filled per frame.
    pub anchors: Vec<[f64; 2]>,
    /// Orbit semi-axes `[ax, ay]`.
    pub amplitude: [f64; 2],
    /// Angular rates `[ωx, ωy]`; x follows sin, y follows cos.
    pub rates: [f64; 2],
    pub phase_amplitude: f64,
    pub phase_rate: f64,
    /// Landmark confidence applied to every anchor.
    pub confidence: f64,
}

impl Default for OrbitScenario {
    fn default() -> Self {
        Self {
            anchors: vec![[0.0, 0.5], [0.5, -0.5], [-0.5, -0.5]],
            amplitude: [0.5, 0.5],
            rates: [0.5, 0.3],
            phase_amplitude: 0.5,
            phase_rate: 2.0,
            confidence: 1.0,
        }
    }
}

impl OrbitScenario {
    /// True agent position at time `t`.
    pub fn agent_position(&self, t: f64) -> [f64; 2] {
        [
            self.amplitude[0] * (self.rates[0] * t).sin(),
            self.amplitude[1] * (self.rates[1] * t).cos(),
        ]
    }

    /// Shared phase offset at time `t`.
    pub fn phase_offset(&self, t: f64) -> f64 {
        self.phase_amplitude * (self.phase_rate * t).sin()
    }

    /// Landmark set a perfect sensor would report at time `t`.
    pub fn observations(&self, t: f64) -> LandmarkSet {
        let mut set: LandmarkSet = self
            .anchors
            .iter()
            .map(|&p| Landmark::new(p, 0.0, self.confidence, 0.0))
            .collect();
        set.observe_from(self.agent_position(t));
        set.set_phase_offset(self.phase_offset(t));
        set
    }
}
