// ─────────────────────────────────────────────────────────────────────
// Wavefield — Engine (caller-facing orchestrator)
// ─────────────────────────────────────────────────────────────────────
//! Owns the live parameter store, the landmark feed and the frame
//! scheduler. The usual loop is:
//!
//!   engine.update();          // advance time, take the parameter snapshot
//!   let img = engine.render(); // evaluate, mix, swap, paint
//!
//! Setters and landmark replacement may come from other threads through
//! `parameter_store()` / `landmark_feed()`; `resize` takes `&mut self`
//! and is therefore serialised against frames.

use std::sync::Arc;

use image::RgbaImage;

use wavefield_physics::{EvaluationStrategy, GridMapping};
use wavefield_types::{
    EngineConfig, Landmark, LandmarkSet, SimulationParameters, WavefieldResult,
};

use crate::backend::ComputeBackend;
use crate::feedback::ProbabilityField;
use crate::scenario::OrbitScenario;
use crate::scheduler::{FrameReport, FrameScheduler};
use crate::store::{LandmarkFeed, ParameterStore};

/// Wave-interference localisation engine.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    store: Arc<ParameterStore>,
    feed: Arc<LandmarkFeed>,
    scheduler: FrameScheduler,
    /// Snapshot taken by `update()` and consumed by the next `render()`.
    pending: Option<SimulationParameters>,
    ground_truth: Option<[f64; 2]>,
    last_report: Option<FrameReport>,
}

impl Engine {
    /// Engine with default configuration at `width × height`.
    pub fn create(width: u32, height: u32) -> WavefieldResult<Self> {
        Self::with_config(EngineConfig::with_size(width, height))
    }

    /// Validate `config`, acquire the compute backend and allocate the
    /// feedback buffers and output image.
    pub fn with_config(config: EngineConfig) -> WavefieldResult<Self> {
        config.validate()?;
        let backend = ComputeBackend::acquire(config.worker_threads)?;
        let mapping = GridMapping::from_config(&config);
        let scheduler = FrameScheduler::new(mapping, backend, config.render.clone())?;
        log::info!(
            "wavefield engine created: {}x{}, {} workers, k={} decay={} feedback={}",
            config.width,
            config.height,
            scheduler.backend().threads(),
            config.wave_number,
            config.decay_factor,
            config.feedback_strength
        );
        Ok(Self {
            store: Arc::new(ParameterStore::new(config.initial_parameters())),
            feed: Arc::new(LandmarkFeed::default()),
            scheduler,
            pending: None,
            ground_truth: None,
            last_report: None,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn mapping(&self) -> &GridMapping {
        self.scheduler.mapping()
    }

    pub fn worker_threads(&self) -> usize {
        self.scheduler.backend().threads()
    }

    // ── Parameters ──────────────────────────────────────────────────

    /// Current live parameters (not a frame snapshot).
    pub fn parameters(&self) -> SimulationParameters {
        self.store.snapshot()
    }

    /// Shared handle for setting parameters from another thread.
    pub fn parameter_store(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.store)
    }

    pub fn set_wave_number(&self, value: f64) {
        self.store.set_wave_number(value);
    }

    /// Clamped to [0, 1].
    pub fn set_feedback_strength(&self, value: f64) {
        self.store.set_feedback_strength(value);
    }

    pub fn set_decay_factor(&self, value: f64) {
        self.store.set_decay_factor(value);
    }

    // ── Landmarks ───────────────────────────────────────────────────

    /// Shared handle for feeding landmarks from another thread.
    pub fn landmark_feed(&self) -> Arc<LandmarkFeed> {
        Arc::clone(&self.feed)
    }

    /// The set in effect when `render()` starts is used for that frame.
    pub fn replace_landmarks(&self, landmarks: impl Into<LandmarkSet>) {
        self.feed.replace(landmarks);
    }

    pub fn add_landmark(&self, landmark: Landmark) {
        self.feed.add(landmark);
    }

    pub fn clear_landmarks(&self) {
        self.feed.clear();
    }

    pub fn landmarks(&self) -> Arc<LandmarkSet> {
        self.feed.snapshot()
    }

    /// Debug marker position painted into subsequent frames.
    pub fn set_ground_truth(&mut self, position: Option<[f64; 2]>) {
        self.ground_truth = position;
    }

    pub fn ground_truth(&self) -> Option<[f64; 2]> {
        self.ground_truth
    }

    pub fn strategy(&self) -> EvaluationStrategy {
        self.scheduler.strategy()
    }

    pub fn set_strategy(&mut self, strategy: EvaluationStrategy) {
        self.scheduler.set_strategy(strategy);
    }

    // ── Frames ──────────────────────────────────────────────────────

    /// Take the snapshot for the next frame and advance `elapsed_time`
    /// by one time step. A second `update()` before `render()` replaces
    /// the pending snapshot.
    pub fn update(&mut self) -> SimulationParameters {
        let params = self.store.begin_frame(self.config.time_step);
        self.pending = Some(params);
        params
    }

    /// Run one frame and return the painted image. Without a preceding
    /// `update()` the frame takes its own snapshot.
    pub fn render(&mut self) -> &RgbaImage {
        self.run_frame();
        self.scheduler.image()
    }

    /// `update()` followed by `render()`.
    pub fn step(&mut self) -> FrameReport {
        self.update();
        self.run_frame()
    }

    /// One frame of `scenario` at the current time: its observations
    /// replace the landmark set and the agent becomes the ground truth.
    pub fn drive(&mut self, scenario: &OrbitScenario) -> FrameReport {
        let t = self.update().elapsed_time;
        self.feed.replace(scenario.observations(t));
        self.ground_truth = Some(scenario.agent_position(t));
        self.run_frame()
    }

    fn run_frame(&mut self) -> FrameReport {
        let params = match self.pending.take() {
            Some(params) => params,
            None => self.store.begin_frame(self.config.time_step),
        };
        let landmarks = self.feed.snapshot();
        let report = self
            .scheduler
            .run_frame(params, &landmarks, self.ground_truth);
        self.last_report = Some(report.clone());
        report
    }

    /// Reallocate for a new resolution. Feedback history and the frame
    /// counter reset; parameters, landmarks and time carry over.
    pub fn resize(&mut self, width: u32, height: u32) -> WavefieldResult<()> {
        self.scheduler.resize(width, height)?;
        self.config.width = width;
        self.config.height = height;
        self.last_report = None;
        log::info!("wavefield engine resized to {width}x{height}, history reset");
        Ok(())
    }

    /// Most recently painted frame.
    pub fn image(&self) -> &RgbaImage {
        self.scheduler.image()
    }

    /// Field written by the most recent frame.
    pub fn field(&self) -> &ProbabilityField {
        self.scheduler.field()
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    pub fn frame_count(&self) -> u64 {
        self.scheduler.frame_count()
    }
}
