// ─────────────────────────────────────────────────────────────────────
// Wavefield — Core Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! wavefield localiser: landmark observations, simulation parameters
//! and engine configuration.

pub mod config;
pub mod error;
pub mod landmark;
pub mod params;

pub use config::{EngineConfig, RenderConfig};
pub use error::{WavefieldError, WavefieldResult};
pub use landmark::{Landmark, LandmarkSet};
pub use params::{clamp_unit, SimulationParameters};
