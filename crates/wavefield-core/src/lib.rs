// ─────────────────────────────────────────────────────────────────────
// Wavefield — Frame Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Temporal feedback buffers, frame scheduling and the caller-facing
//! engine for wave-interference localisation.
//!
//! # Frame Invariants
//!
//! 1. **One snapshot per frame**: every cell of a frame sees the same
//!    `SimulationParameters` value and the same `Arc<LandmarkSet>`.
//!    Setters running concurrently only affect later frames.
//!
//! 2. **No read-write overlap**: a frame reads only the `previous`
//!    buffer and writes only `next`. The borrow split in
//!    `TemporalFeedbackBuffer::split` makes this a compile-time fact;
//!    the rayon join before `swap` is the write barrier.
//!
//! 3. **Feedback stays in [0, 1]**: out-of-range inputs are clamped
//!    (NaN to 0) and logged, never surfaced as errors.
//!
//! 4. **Resize discards history**: both buffers are reallocated and
//!    zeroed; nothing is resampled.

pub mod backend;
pub mod engine;
pub mod feedback;
pub mod palette;
pub mod probe;
pub mod scenario;
pub mod scheduler;
pub mod store;

pub use backend::ComputeBackend;
pub use engine::Engine;
pub use feedback::{BufferSlot, ProbabilityField, TemporalFeedbackBuffer};
pub use probe::WaveProbe;
pub use scenario::OrbitScenario;
pub use scheduler::{FrameReport, FrameScheduler};
pub use store::{LandmarkFeed, ParameterStore};
