// ─────────────────────────────────────────────────────────────────────
// Wavefield — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied; PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the wavefield engine.
//!
//! Exposes `EngineConfig`, `WaveFieldCore` (single-point queries) and
//! `WaveFieldEngine` (full frames as RGBA bytes) via PyO3.
//!
//! # FFI Safety
//!
//! - Frame evaluation runs with the GIL released (`allow_threads`).
//! - Engine errors map to `ValueError` (bad resolution / config) or
//!   `RuntimeError` (backend, allocation).
//! - Image bytes are copied into a fresh `bytes` object; no Rust buffer
//!   is lent to Python.
//!
//! Install: `pip install -e crates/wavefield-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from wavefield import WaveFieldEngine
//!
//! engine = WaveFieldEngine(256, 256)
//! engine.replace_landmarks([(-0.5, 0.0, 0.5, 1.0, 0.0), (0.5, 0.0, 0.5, 1.0, 0.0)])
//! engine.update()
//! rgba = engine.render()   # 256 * 256 * 4 bytes
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};

use wavefield_core::{Engine, FrameReport, OrbitScenario, WaveProbe};
use wavefield_types::{EngineConfig, Landmark, WavefieldError};

fn to_py_err(e: WavefieldError) -> PyErr {
    match e {
        WavefieldError::InvalidResolution { .. } | WavefieldError::Config(_) => {
            PyValueError::new_err(e.to_string())
        }
        WavefieldError::BackendUnavailable(_) | WavefieldError::Allocation { .. } => {
            PyRuntimeError::new_err(e.to_string())
        }
    }
}

fn report_dict<'py>(py: Python<'py>, report: &FrameReport) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("frame", report.frame)?;
    dict.set_item("elapsed_time", report.elapsed_time)?;
    dict.set_item("landmark_count", report.landmark_count)?;
    dict.set_item("feedback_strength", report.feedback_strength)?;
    dict.set_item("peak_probability", report.peak_probability)?;
    dict.set_item("peak_position", report.peak_position.map(|p| (p[0], p[1])))?;
    dict.set_item("mean_probability", report.mean_probability)?;
    Ok(dict)
}

// ─── PyEngineConfig ─────────────────────────────────────────────────

/// Python-visible engine configuration.
#[pyclass(name = "EngineConfig")]
#[derive(Clone)]
struct PyEngineConfig {
    inner: EngineConfig,
}

#[pymethods]
impl PyEngineConfig {
    #[new]
    #[pyo3(signature = (
        width = 512,
        height = 512,
        worker_threads = 0,
        time_step = 1.0 / 60.0,
        wave_number = 80.0,
        decay_factor = 5.0,
        feedback_strength = 0.9,
        view_half_height = 1.0,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        width: u32,
        height: u32,
        worker_threads: usize,
        time_step: f64,
        wave_number: f64,
        decay_factor: f64,
        feedback_strength: f64,
        view_half_height: f64,
    ) -> PyResult<Self> {
        let config = EngineConfig {
            width,
            height,
            worker_threads,
            time_step,
            wave_number,
            decay_factor,
            feedback_strength,
            view_half_height,
            ..EngineConfig::default()
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string; missing fields take their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = EngineConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn width(&self) -> u32 {
        self.inner.width
    }

    #[getter]
    fn height(&self) -> u32 {
        self.inner.height
    }

    fn __repr__(&self) -> String {
        format!(
            "EngineConfig({}x{}, k={}, decay={}, feedback={})",
            self.inner.width,
            self.inner.height,
            self.inner.wave_number,
            self.inner.decay_factor,
            self.inner.feedback_strength
        )
    }
}

// ─── WaveFieldCore ──────────────────────────────────────────────────

/// Point-query probability field without grid or feedback.
#[pyclass(name = "WaveFieldCore")]
struct PyWaveFieldCore {
    inner: WaveProbe,
}

#[pymethods]
impl PyWaveFieldCore {
    #[new]
    fn new(wave_number: f64) -> Self {
        Self {
            inner: WaveProbe::new(wave_number),
        }
    }

    fn add_landmark(&mut self, x: f64, y: f64) {
        self.inner.add_landmark(x, y);
    }

    /// Refresh all landmark ranges from the true camera position.
    fn update_observation(&mut self, cam_x: f64, cam_y: f64) {
        self.inner.observe([cam_x, cam_y]);
    }

    fn get_probability(&self, x: f64, y: f64) -> f64 {
        self.inner.probability_at(x, y)
    }

    fn landmark_count(&self) -> usize {
        self.inner.landmarks().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "WaveFieldCore(wave_number={}, landmarks={})",
            self.inner.wave_number(),
            self.inner.landmarks().len()
        )
    }
}

// ─── WaveFieldEngine ────────────────────────────────────────────────

/// Full-frame engine: parameters, landmark feed, RGBA output.
#[pyclass(name = "WaveFieldEngine")]
struct PyWaveFieldEngine {
    inner: Engine,
    scenario: OrbitScenario,
}

#[pymethods]
impl PyWaveFieldEngine {
    /// `config` overrides everything, including `width` and `height`.
    #[new]
    #[pyo3(signature = (width = 512, height = 512, config = None))]
    fn new(width: u32, height: u32, config: Option<PyEngineConfig>) -> PyResult<Self> {
        let config = config
            .map(|c| c.inner)
            .unwrap_or_else(|| EngineConfig::with_size(width, height));
        Ok(Self {
            inner: Engine::with_config(config).map_err(to_py_err)?,
            scenario: OrbitScenario::default(),
        })
    }

    #[getter]
    fn width(&self) -> u32 {
        self.inner.width()
    }

    #[getter]
    fn height(&self) -> u32 {
        self.inner.height()
    }

    #[getter]
    fn frame_count(&self) -> u64 {
        self.inner.frame_count()
    }

    fn set_wave_number(&self, value: f64) {
        self.inner.set_wave_number(value);
    }

    /// Clamped to [0, 1].
    fn set_feedback_strength(&self, value: f64) {
        self.inner.set_feedback_strength(value);
    }

    fn set_decay_factor(&self, value: f64) {
        self.inner.set_decay_factor(value);
    }

    fn parameters<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let p = self.inner.parameters();
        let dict = PyDict::new(py);
        dict.set_item("wave_number", p.wave_number)?;
        dict.set_item("decay_factor", p.decay_factor)?;
        dict.set_item("feedback_strength", p.feedback_strength)?;
        dict.set_item("elapsed_time", p.elapsed_time)?;
        Ok(dict)
    }

    /// Replace the landmark set.
    ///
    /// Args:
    ///     landmarks: list of (x, y, observed_distance, confidence, phase_offset).
    fn replace_landmarks(&self, landmarks: Vec<(f64, f64, f64, f64, f64)>) {
        let set: Vec<Landmark> = landmarks
            .into_iter()
            .map(|(x, y, d, c, phi)| Landmark::new([x, y], d, c, phi))
            .collect();
        self.inner.replace_landmarks(set);
    }

    #[pyo3(signature = (x, y, observed_distance = 0.0, confidence = 1.0, phase_offset = 0.0))]
    fn add_landmark(
        &self,
        x: f64,
        y: f64,
        observed_distance: f64,
        confidence: f64,
        phase_offset: f64,
    ) {
        self.inner
            .add_landmark(Landmark::new([x, y], observed_distance, confidence, phase_offset));
    }

    fn clear_landmarks(&self) {
        self.inner.clear_landmarks();
    }

    fn landmark_count(&self) -> usize {
        self.inner.landmarks().len()
    }

    #[pyo3(signature = (position = None))]
    fn set_ground_truth(&mut self, position: Option<(f64, f64)>) {
        self.inner.set_ground_truth(position.map(|(x, y)| [x, y]));
    }

    /// Advance time and take the next frame's parameter snapshot.
    fn update(&mut self) {
        self.inner.update();
    }

    /// Run one frame and return its RGBA pixels, row-major.
    fn render<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyBytes> {
        let inner = &mut self.inner;
        let raw = py.allow_threads(|| inner.render().as_raw().clone());
        PyBytes::new(py, &raw)
    }

    /// `update()` + `render()`; returns the frame report.
    fn step<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let inner = &mut self.inner;
        let report = py.allow_threads(|| inner.step());
        report_dict(py, &report)
    }

    /// One frame of the built-in orbit demo; returns the frame report.
    fn drive_orbit<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let Self { inner, scenario } = self;
        let report = py.allow_threads(|| inner.drive(scenario));
        report_dict(py, &report)
    }

    /// RGBA pixels of the most recent frame without running a new one.
    fn image<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new(py, self.inner.image().as_raw())
    }

    /// Mixed probabilities of the most recent frame, row-major.
    fn field(&self) -> Vec<f64> {
        self.inner.field().mixed.clone()
    }

    fn report<'py>(&self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyDict>>> {
        self.inner
            .last_report()
            .map(|r| report_dict(py, r))
            .transpose()
    }

    fn resize(&mut self, width: u32, height: u32) -> PyResult<()> {
        self.inner.resize(width, height).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "WaveFieldEngine({}x{}, frames={}, landmarks={})",
            self.inner.width(),
            self.inner.height(),
            self.inner.frame_count(),
            self.inner.landmarks().len()
        )
    }
}

// ─── Module Registration ────────────────────────────────────────────

/// Wavefield: wave-interference localisation engine.
///
/// - `EngineConfig`: configuration
/// - `WaveFieldCore`: single-point probability queries
/// - `WaveFieldEngine`: full frames with temporal feedback
#[pymodule]
fn wavefield(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEngineConfig>()?;
    m.add_class::<PyWaveFieldCore>()?;
    m.add_class::<PyWaveFieldEngine>()?;
    Ok(())
}
