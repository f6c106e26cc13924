// ─────────────────────────────────────────────────────────────────────
// Wavefield — Engine Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{WavefieldError, WavefieldResult};
use crate::params::SimulationParameters;

/// Channel gains for the RGBA presentation of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Red channel: instantaneous probability × this gain.
    pub noise_gain: f64,
    /// Green channel: mixed probability × this gain.
    pub signal_gain: f64,
    /// Peak of the periodic term added to the blue channel.
    pub pulse_amplitude: f64,
    /// Angular rate (rad/s) of the blue pulse.
    pub pulse_rate: f64,
    /// Radius (world units) of the ground-truth marker disk.
    pub marker_radius: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            noise_gain: 0.3,
            signal_gain: 1.0,
            pulse_amplitude: 0.2,
            pulse_rate: 1.0,
            marker_radius: 0.03,
        }
    }
}

/// Runtime configuration for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid and output width in cells.
    pub width: u32,
    /// Grid and output height in cells.
    pub height: u32,
    /// Worker threads for the per-cell evaluator. 0 = pool default.
    pub worker_threads: usize,
    /// Seconds added to `elapsed_time` per frame.
    pub time_step: f64,
    /// Initial wave number k.
    pub wave_number: f64,
    /// Initial decay factor.
    pub decay_factor: f64,
    /// Initial feedback strength α.
    pub feedback_strength: f64,
    /// World coordinate shown at the grid centre.
    pub view_center: [f64; 2],
    /// Half of the world-space height covered by the grid. The horizontal
    /// half-extent is this times the aspect ratio.
    pub view_half_height: f64,
    pub render: RenderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            worker_threads: 0,
            time_step: 1.0 / 60.0,
            wave_number: 80.0,
            decay_factor: 5.0,
            feedback_strength: 0.9,
            view_center: [0.0, 0.0],
            view_half_height: 1.0,
            render: RenderConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration at the given resolution.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parameters the engine starts from.
    pub fn initial_parameters(&self) -> SimulationParameters {
        SimulationParameters::new(self.wave_number, self.decay_factor, self.feedback_strength)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> WavefieldResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WavefieldError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if !self.time_step.is_finite() || self.time_step < 0.0 {
            return Err(WavefieldError::Config(format!(
                "time_step must be finite and >= 0, got {}",
                self.time_step
            )));
        }
        if !(0.0..=1.0).contains(&self.feedback_strength) {
            return Err(WavefieldError::Config(format!(
                "feedback_strength must be in [0, 1], got {}",
                self.feedback_strength
            )));
        }
        if !self.wave_number.is_finite() || !self.decay_factor.is_finite() {
            return Err(WavefieldError::Config(format!(
                "wave_number and decay_factor must be finite, got {} and {}",
                self.wave_number, self.decay_factor
            )));
        }
        if self.view_center.iter().any(|c| !c.is_finite()) {
            return Err(WavefieldError::Config(format!(
                "view_center must be finite, got {:?}",
                self.view_center
            )));
        }
        if !(self.view_half_height.is_finite() && self.view_half_height > 0.0) {
            return Err(WavefieldError::Config(format!(
                "view_half_height must be > 0, got {}",
                self.view_half_height
            )));
        }
        let r = &self.render;
        if [r.noise_gain, r.signal_gain, r.pulse_amplitude, r.pulse_rate]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(WavefieldError::Config(
                "render gains must be finite".to_string(),
            ));
        }
        if !(r.marker_radius.is_finite() && r.marker_radius >= 0.0) {
            return Err(WavefieldError::Config(format!(
                "marker_radius must be >= 0, got {}",
                r.marker_radius
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> WavefieldResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| WavefieldError::Config(format!("JSON parse error: {e}")))
    }
}
