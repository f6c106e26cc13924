// ─────────────────────────────────────────────────────────────────────
// Wavefield — Field Evaluator (sequential reference + rayon grid)
// ─────────────────────────────────────────────────────────────────────
//! Instantaneous probability P(p) = |ψ(p)|² over a cell grid.
//!
//! `FieldKernel` binds one frame's read-only inputs (grid mapping,
//! landmark slice, parameter snapshot). Both strategies call the same
//! per-cell kernel, so they differ only in scheduling: the sequential
//! form walks cells in order, the parallel form hands one row per rayon
//! task. Cells never read each other, so no synchronisation is needed
//! inside a frame.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use wavefield_types::{Landmark, SimulationParameters};

use crate::grid::GridMapping;
use crate::wave::superpose;

/// Probability density |ψ(p)|² at a single point.
#[inline]
pub fn probability_at(point: [f64; 2], landmarks: &[Landmark], params: &SimulationParameters) -> f64 {
    superpose(point, landmarks, params).norm_sqr()
}

/// Temporal mixing law: `x·(1-α) + y·α` with x = instantaneous,
/// y = previous mixed value, α = feedback strength.
///
/// α = 0 returns `instantaneous` and α = 1 returns `previous`
/// bit-for-bit, including non-finite values on the other side.
#[inline]
pub fn mix(instantaneous: f64, previous: f64, feedback_strength: f64) -> f64 {
    if feedback_strength == 0.0 {
        return instantaneous;
    }
    if feedback_strength == 1.0 {
        return previous;
    }
    instantaneous * (1.0 - feedback_strength) + previous * feedback_strength
}

/// How a full grid is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationStrategy {
    /// Cell by cell on the calling thread. Reference for verification.
    Sequential,
    /// One rayon task per row on the current pool.
    #[default]
    Parallel,
}

/// Read-only inputs of one frame's evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FieldKernel<'a> {
    pub mapping: GridMapping,
    pub landmarks: &'a [Landmark],
    pub params: SimulationParameters,
}

impl<'a> FieldKernel<'a> {
    pub fn new(mapping: GridMapping, landmarks: &'a [Landmark], params: SimulationParameters) -> Self {
        Self {
            mapping,
            landmarks,
            params,
        }
    }

    /// Instantaneous probability of cell `(col, row)`.
    #[inline]
    pub fn cell(&self, col: u32, row: u32) -> f64 {
        if self.landmarks.is_empty() {
            return 0.0;
        }
        let point = self.mapping.cell_to_world(col, row);
        probability_at(point, self.landmarks, &self.params)
    }

    /// Fill one row of instantaneous probabilities.
    #[inline]
    pub fn fill_row(&self, row: u32, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.mapping.width as usize);
        for (col, value) in out.iter_mut().enumerate() {
            *value = self.cell(col as u32, row);
        }
    }

    /// Sequential reference evaluation into `out` (row-major, `cells()` long).
    pub fn evaluate_sequential(&self, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.mapping.cells());
        let width = self.mapping.width as usize;
        for (row, chunk) in out.chunks_mut(width).enumerate() {
            self.fill_row(row as u32, chunk);
        }
    }

    /// Data-parallel evaluation into `out` on the current rayon pool.
    pub fn evaluate_parallel(&self, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.mapping.cells());
        let width = self.mapping.width as usize;
        out.par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, chunk)| self.fill_row(row as u32, chunk));
    }

    /// Evaluate with the given strategy.
    pub fn evaluate(&self, strategy: EvaluationStrategy, out: &mut [f64]) {
        match strategy {
            EvaluationStrategy::Sequential => self.evaluate_sequential(out),
            EvaluationStrategy::Parallel => self.evaluate_parallel(out),
        }
    }

    /// Allocate and return the reference field.
    pub fn sample_reference(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.mapping.cells()];
        self.evaluate_sequential(&mut out);
        out
    }
}
