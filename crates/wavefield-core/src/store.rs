// ─────────────────────────────────────────────────────────────────────
// Wavefield — Parameter Store + Landmark Feed
// ─────────────────────────────────────────────────────────────────────
//! Live, thread-safe holders for the two caller-driven inputs.
//!
//! Setters may run on any thread at any time. A frame never reads
//! these holders directly: it takes a by-value parameter snapshot and
//! an `Arc` of the landmark set at its start, so a concurrent setter
//! only affects the following frame.

use std::sync::Arc;

use parking_lot::RwLock;

use wavefield_types::params::clamp_unit;
use wavefield_types::{Landmark, LandmarkSet, SimulationParameters};

/// Mutable simulation parameters behind a `parking_lot::RwLock`.
#[derive(Debug, Default)]
pub struct ParameterStore {
    inner: RwLock<SimulationParameters>,
}

impl ParameterStore {
    pub fn new(params: SimulationParameters) -> Self {
        Self {
            inner: RwLock::new(SimulationParameters {
                feedback_strength: clamp_unit(params.feedback_strength),
                ..params
            }),
        }
    }

    /// Consistent copy of all four parameters.
    pub fn snapshot(&self) -> SimulationParameters {
        *self.inner.read()
    }

    /// Negative or otherwise unusual values are accepted unchanged.
    pub fn set_wave_number(&self, value: f64) {
        self.inner.write().wave_number = value;
        log::debug!("wave_number set to {value}");
    }

    /// Clamped to [0, 1]; an out-of-range input is corrected, not rejected.
    pub fn set_feedback_strength(&self, value: f64) {
        let clamped = clamp_unit(value);
        if clamped != value && !value.is_nan() {
            log::warn!("feedback_strength {value} outside [0, 1], clamped to {clamped}");
        }
        self.inner.write().feedback_strength = clamped;
        log::debug!("feedback_strength set to {clamped}");
    }

    pub fn set_decay_factor(&self, value: f64) {
        self.inner.write().decay_factor = value;
        log::debug!("decay_factor set to {value}");
    }

    /// Start a frame: return the current parameters, then advance
    /// `elapsed_time` by `time_step`. Both happen under one write lock.
    pub fn begin_frame(&self, time_step: f64) -> SimulationParameters {
        let mut guard = self.inner.write();
        let snapshot = *guard;
        guard.elapsed_time += time_step;
        snapshot
    }
}

/// Landmark set for upcoming frames, swapped copy-on-write.
///
/// `snapshot` hands out an `Arc`; writers replace or clone the set, so a
/// frame holding an older `Arc` keeps seeing exactly what it started with.
#[derive(Debug, Default)]
pub struct LandmarkFeed {
    current: RwLock<Arc<LandmarkSet>>,
}

impl LandmarkFeed {
    pub fn new(set: LandmarkSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(set)),
        }
    }

    pub fn snapshot(&self) -> Arc<LandmarkSet> {
        self.current.read().clone()
    }

    pub fn replace(&self, set: impl Into<LandmarkSet>) {
        let set = set.into();
        log::debug!("landmark set replaced ({} landmarks)", set.len());
        *self.current.write() = Arc::new(set);
    }

    pub fn add(&self, landmark: Landmark) {
        let mut guard = self.current.write();
        Arc::make_mut(&mut *guard).push(landmark);
    }

    pub fn clear(&self) {
        *self.current.write() = Arc::new(LandmarkSet::new());
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}
