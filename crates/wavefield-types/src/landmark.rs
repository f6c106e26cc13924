// ─────────────────────────────────────────────────────────────────────
// Wavefield — Landmark Observations
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// One range observation: a stationary reference point and the noisy
/// distance measured from the agent to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LandmarkRecord")]
pub struct Landmark {
    /// World position of the landmark.
    pub position: [f64; 2],
    /// Measured range from the agent, >= 0.
    pub observed_distance: f64,
    /// Wave amplitude weight, >= 0.
    pub confidence: f64,
    /// Constant phase shift in radians.
    pub phase_offset: f64,
}

/// Wire form of a landmark; decoding goes through `Landmark::new`.
#[derive(Deserialize)]
struct LandmarkRecord {
    position: [f64; 2],
    observed_distance: f64,
    confidence: f64,
    phase_offset: f64,
}

impl From<LandmarkRecord> for Landmark {
    fn from(r: LandmarkRecord) -> Self {
        Self::new(r.position, r.observed_distance, r.confidence, r.phase_offset)
    }
}

impl Landmark {
    /// Negative (or NaN) confidence is raised to 0.
    pub fn new(
        position: [f64; 2],
        observed_distance: f64,
        confidence: f64,
        phase_offset: f64,
    ) -> Self {
        Self {
            position,
            observed_distance,
            confidence: confidence.max(0.0),
            phase_offset,
        }
    }

    /// Landmark at `(x, y)` with unit confidence, no phase offset and no
    /// observation yet.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new([x, y], 0.0, 1.0, 0.0)
    }

    /// Euclidean distance from `point` to this landmark.
    #[inline]
    pub fn distance_to(&self, point: [f64; 2]) -> f64 {
        let dx = point[0] - self.position[0];
        let dy = point[1] - self.position[1];
        dx.hypot(dy)
    }
}

/// The observations in effect for one frame.
///
/// Order carries no meaning: the field is a sum over the set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, landmark: Landmark) {
        self.landmarks.push(landmark);
    }

    pub fn clear(&mut self) {
        self.landmarks.clear();
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.landmarks.iter()
    }

    /// Set every landmark's observed distance to its true range from
    /// `agent`, i.e. a noiseless sensor sweep.
    pub fn observe_from(&mut self, agent: [f64; 2]) {
        for lm in &mut self.landmarks {
            lm.observed_distance = lm.distance_to(agent);
        }
    }

    /// Apply one phase offset to every landmark.
    pub fn set_phase_offset(&mut self, phase_offset: f64) {
        for lm in &mut self.landmarks {
            lm.phase_offset = phase_offset;
        }
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self {
            landmarks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.landmarks.iter()
    }
}
