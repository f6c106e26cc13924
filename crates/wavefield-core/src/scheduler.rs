// ─────────────────────────────────────────────────────────────────────
// Wavefield — Frame Scheduler
// ─────────────────────────────────────────────────────────────────────
//! One frame, in order:
//!   1. Take the parameter snapshot and landmark set (caller-supplied)
//!   2. Bind them into a read-only `FieldKernel`
//!   3. Evaluate every cell on the backend pool, reading `previous`
//!   4. Write instantaneous + mixed probability into `next`
//!   5. Swap buffer roles (the pool join is the write barrier)
//!   6. Paint the RGBA frame and summarise it in a `FrameReport`

use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use wavefield_physics::{mix, EvaluationStrategy, FieldKernel, GridMapping};
use wavefield_types::{LandmarkSet, RenderConfig, SimulationParameters, WavefieldResult};

use crate::backend::ComputeBackend;
use crate::feedback::{ProbabilityField, TemporalFeedbackBuffer};
use crate::palette::{allocate_image, paint};

/// Summary of one completed frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Zero-based index of the frame.
    pub frame: u64,
    /// `elapsed_time` of the parameter snapshot the frame used.
    pub elapsed_time: f64,
    pub landmark_count: usize,
    pub feedback_strength: f64,
    /// Largest mixed probability in the field.
    pub peak_probability: f64,
    /// World position of the peak cell; `None` when the field is all zero.
    pub peak_position: Option<[f64; 2]>,
    pub mean_probability: f64,
}

/// Owns the ping-pong buffers and output image and drives frames.
#[derive(Debug)]
pub struct FrameScheduler {
    mapping: GridMapping,
    buffers: TemporalFeedbackBuffer,
    image: RgbaImage,
    backend: ComputeBackend,
    strategy: EvaluationStrategy,
    render: RenderConfig,
    frame: u64,
}

impl FrameScheduler {
    pub fn new(
        mapping: GridMapping,
        backend: ComputeBackend,
        render: RenderConfig,
    ) -> WavefieldResult<Self> {
        Ok(Self {
            buffers: TemporalFeedbackBuffer::for_mapping(&mapping)?,
            image: allocate_image(mapping.width, mapping.height)?,
            mapping,
            backend,
            strategy: EvaluationStrategy::Parallel,
            render,
            frame: 0,
        })
    }

    pub fn mapping(&self) -> &GridMapping {
        &self.mapping
    }

    pub fn backend(&self) -> &ComputeBackend {
        &self.backend
    }

    pub fn strategy(&self) -> EvaluationStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: EvaluationStrategy) {
        self.strategy = strategy;
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// Frames completed since creation or the last resize.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Field written by the most recent frame.
    pub fn field(&self) -> &ProbabilityField {
        self.buffers.previous()
    }

    pub fn buffers(&self) -> &TemporalFeedbackBuffer {
        &self.buffers
    }

    /// Most recently painted frame.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Reallocate buffers and image for a new resolution; history and
    /// frame count reset. On error nothing changes.
    pub fn resize(&mut self, width: u32, height: u32) -> WavefieldResult<()> {
        let image = allocate_image(width, height)?;
        self.buffers.reallocate(width, height)?;
        self.image = image;
        self.mapping = self.mapping.resized(width, height);
        self.frame = 0;
        Ok(())
    }

    /// Execute one frame on the given snapshot.
    pub fn run_frame(
        &mut self,
        params: SimulationParameters,
        landmarks: &LandmarkSet,
        ground_truth: Option<[f64; 2]>,
    ) -> FrameReport {
        let kernel = FieldKernel::new(self.mapping, landmarks.as_slice(), params);
        let strategy = self.strategy;
        let alpha = params.feedback_strength;

        let (previous, next) = self.buffers.split();
        self.backend
            .install(|| evaluate_and_mix(&kernel, strategy, alpha, previous, next));
        self.buffers.swap();

        let field = self.buffers.previous();
        let (image, mapping, render) = (&mut self.image, &self.mapping, &self.render);
        self.backend.install(|| {
            paint(image, field, mapping, render, params.elapsed_time, ground_truth)
        });

        let report = summarise(
            field,
            mapping,
            &self.backend,
            self.frame,
            &params,
            landmarks.len(),
        );
        self.frame += 1;
        log::trace!(
            "frame {} t={:.3} landmarks={} peak={:.4} at {:?}",
            report.frame,
            report.elapsed_time,
            report.landmark_count,
            report.peak_probability,
            report.peak_position
        );
        report
    }
}

/// Steps 3–4: per-cell |ψ|² and the temporal mix into `next`.
fn evaluate_and_mix(
    kernel: &FieldKernel<'_>,
    strategy: EvaluationStrategy,
    alpha: f64,
    previous: &ProbabilityField,
    next: &mut ProbabilityField,
) {
    let width = kernel.mapping.width as usize;
    let (instantaneous, mixed) = (&mut next.instantaneous, &mut next.mixed);

    let row_task = |row: usize, inst: &mut [f64], out: &mut [f64], prev: &[f64]| {
        kernel.fill_row(row as u32, inst);
        for ((m, &i), &p) in out.iter_mut().zip(inst.iter()).zip(prev) {
            *m = mix(i, p, alpha);
        }
    };

    match strategy {
        EvaluationStrategy::Sequential => {
            instantaneous
                .chunks_mut(width)
                .zip(mixed.chunks_mut(width))
                .zip(previous.mixed.chunks(width))
                .enumerate()
                .for_each(|(row, ((inst, out), prev))| row_task(row, inst, out, prev));
        }
        EvaluationStrategy::Parallel => {
            instantaneous
                .par_chunks_mut(width)
                .zip(mixed.par_chunks_mut(width))
                .zip(previous.mixed.par_chunks(width))
                .enumerate()
                .for_each(|(row, ((inst, out), prev))| row_task(row, inst, out, prev));
        }
    }
}

/// Peak and mean of the mixed field. Ties resolve to the lowest index.
fn summarise(
    field: &ProbabilityField,
    mapping: &GridMapping,
    backend: &ComputeBackend,
    frame: u64,
    params: &SimulationParameters,
    landmark_count: usize,
) -> FrameReport {
    let (peak_index, peak_probability, total) = backend.install(|| {
        let (idx, peak) = field
            .mixed
            .par_iter()
            .copied()
            .enumerate()
            .reduce(
                || (usize::MAX, f64::NEG_INFINITY),
                |a, b| {
                    if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
                        b
                    } else {
                        a
                    }
                },
            );
        let total: f64 = field.mixed.par_iter().sum();
        (idx, peak, total)
    });

    let peak_position = (peak_probability > 0.0).then(|| {
        let (col, row) = mapping.cell_of(peak_index);
        mapping.cell_to_world(col, row)
    });

    FrameReport {
        frame,
        elapsed_time: params.elapsed_time,
        landmark_count,
        feedback_strength: params.feedback_strength,
        peak_probability: peak_probability.max(0.0),
        peak_position,
        mean_probability: total / field.cells().max(1) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavefield_types::Landmark;

    fn scheduler(width: u32, height: u32) -> FrameScheduler {
        FrameScheduler::new(
            GridMapping::new(width, height, [0.0, 0.0], 1.0),
            ComputeBackend::acquire(2).unwrap(),
            RenderConfig::default(),
        )
        .unwrap()
    }

    fn pair() -> LandmarkSet {
        vec![
            Landmark::new([-0.5, 0.0], 0.5, 1.0, 0.0),
            Landmark::new([0.5, 0.0], 0.5, 1.0, 0.0),
        ]
        .into()
    }

    fn params(alpha: f64) -> SimulationParameters {
        SimulationParameters::new(20.0, 2.0, alpha)
    }

    #[test]
    fn test_zero_landmarks_zero_field() {
        let mut s = scheduler(16, 12);
        let report = s.run_frame(params(0.7), &LandmarkSet::new(), None);
        assert!(s.field().is_zero());
        assert_eq!(report.peak_probability, 0.0);
        assert_eq!(report.peak_position, None);
        assert_eq!(report.mean_probability, 0.0);
    }

    #[test]
    fn test_no_feedback_mixed_equals_instantaneous() {
        let mut s = scheduler(24, 24);
        for frame in 0..3 {
            let mut lms = pair();
            lms.observe_from([0.1 * frame as f64, 0.0]);
            s.run_frame(params(0.0), &lms, None);
            assert_eq!(s.field().mixed, s.field().instantaneous, "frame {frame}");
        }
    }

    #[test]
    fn test_first_frame_mixes_against_zero() {
        let mut s = scheduler(10, 10);
        s.run_frame(params(0.25), &pair(), None);
        let f = s.field();
        for (m, i) in f.mixed.iter().zip(&f.instantaneous) {
            assert_eq!(*m, i * 0.75);
        }
    }

    #[test]
    fn test_second_frame_blends_history() {
        let mut s = scheduler(8, 8);
        s.run_frame(params(0.5), &pair(), None);
        let first = s.field().mixed.clone();
        s.run_frame(params(0.5), &LandmarkSet::new(), None);
        for (m, p) in s.field().mixed.iter().zip(&first) {
            assert_eq!(*m, p * 0.5);
        }
    }

    #[test]
    fn test_full_feedback_freezes_field() {
        let mut s = scheduler(12, 12);
        s.run_frame(params(0.5), &pair(), None);
        s.run_frame(params(0.5), &pair(), None);
        let frozen = s.field().mixed.clone();
        assert!(frozen.iter().any(|&v| v > 0.0));

        let mut moved: LandmarkSet = vec![Landmark::new([0.3, 0.3], 0.2, 2.0, 1.0)].into();
        for step in 0..4 {
            s.run_frame(params(1.0), &moved, None);
            assert_eq!(s.field().mixed, frozen, "field drifted at step {step}");
            moved.observe_from([step as f64 * 0.1, -0.2]);
        }
    }

    #[test]
    fn test_overflowing_frame_does_not_poison_history() {
        let huge: LandmarkSet = vec![Landmark::new([0.0, 0.0], 0.3, 1e200, 0.0)].into();
        let mut s = scheduler(8, 8);

        s.run_frame(params(0.0), &huge, None);
        assert!(s.field().instantaneous.iter().any(|v| v.is_infinite()));
        assert_eq!(s.field().mixed, s.field().instantaneous);

        s.run_frame(params(0.0), &pair(), None);
        assert_eq!(s.field().mixed, s.field().instantaneous);
        assert!(s.field().mixed.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_frozen_field_survives_overflowing_frame() {
        let mut s = scheduler(8, 8);
        s.run_frame(params(0.5), &pair(), None);
        s.run_frame(params(0.5), &pair(), None);
        let frozen = s.field().mixed.clone();

        let huge: LandmarkSet = vec![Landmark::new([0.0, 0.0], 0.3, 1e200, 0.0)].into();
        s.run_frame(params(1.0), &huge, None);
        assert_eq!(s.field().mixed, frozen);
    }

    #[test]
    fn test_sequential_and_parallel_frames_agree() {
        let mut lms = pair();
        lms.push(Landmark::new([0.0, 0.7], 0.6, 0.8, 0.4));

        let mut par = scheduler(33, 21);
        let mut seq = scheduler(33, 21);
        seq.set_strategy(EvaluationStrategy::Sequential);

        for _ in 0..3 {
            par.run_frame(params(0.6), &lms, None);
            seq.run_frame(params(0.6), &lms, None);
        }
        for (a, b) in par.field().mixed.iter().zip(&seq.field().mixed) {
            assert!((a - b).abs() <= 1e-4 * a.abs().max(1e-12), "{a} vs {b}");
        }
        assert_eq!(par.image().as_raw(), seq.image().as_raw());
    }

    #[test]
    fn test_report_peak_near_midpoint() {
        let mut s = scheduler(41, 41);
        let report = s.run_frame(params(0.0), &pair(), None);
        let peak = report.peak_position.unwrap();
        let cell = s.mapping().cell_size();
        assert!(peak[0].abs() <= cell && peak[1].abs() <= cell, "peak at {peak:?}");
        assert!((report.peak_probability - 4.0).abs() < 1e-9);
        assert_eq!(report.landmark_count, 2);
        assert_eq!(report.frame, 0);
        assert_eq!(s.frame_count(), 1);
    }

    #[test]
    fn test_resize_resets_history() {
        let mut s = scheduler(8, 8);
        s.run_frame(params(0.9), &pair(), None);
        assert!(!s.field().is_zero());

        s.resize(12, 6).unwrap();
        assert_eq!(s.image().dimensions(), (12, 6));
        assert!(s.field().is_zero());
        assert_eq!(s.frame_count(), 0);

        s.run_frame(params(0.9), &LandmarkSet::new(), None);
        assert!(s.field().is_zero());
    }

    #[test]
    fn test_resize_to_zero_fails_cleanly() {
        let mut s = scheduler(8, 8);
        assert!(s.resize(0, 8).is_err());
        assert_eq!(s.image().dimensions(), (8, 8));
        assert_eq!(s.mapping().width, 8);
    }
}
