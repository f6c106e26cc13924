// ─────────────────────────────────────────────────────────────────────
// Wavefield — Interference Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Landmark wave model and probability-field evaluators.
//!
//! Every landmark emits a damped complex wave centred on its observed
//! range ring; the probability density at a point is the squared
//! magnitude of the superposition:
//!
//!   ψ(p) = Σ_L c_L · e^{-γ|r_L|} · e^{i(k·r_L + φ_L)},   r_L = |p - x_L| - d_L
//!   P(p) = |ψ(p)|²
//!
//! The same per-point kernel backs both the sequential reference
//! evaluator and the rayon grid evaluator.

pub mod evaluator;
pub mod grid;
pub mod wave;

pub use evaluator::{mix, probability_at, EvaluationStrategy, FieldKernel};
pub use grid::GridMapping;
pub use wave::{landmark_wave, superpose};
