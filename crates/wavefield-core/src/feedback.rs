// ─────────────────────────────────────────────────────────────────────
// Wavefield — Temporal Feedback Buffer (ping-pong pair)
// ─────────────────────────────────────────────────────────────────────
//! Two pre-allocated probability fields, slots A and B.
//!
//! During a frame one slot is `previous` (read-only, last frame's mixed
//! result) and the other is `next` (write-only). `swap` flips the roles
//! at the frame boundary, so no buffer is ever read and written in the
//! same frame:
//!
//!   P_t = (1 - α)·|ψ_t|² + α·P_{t-1}

use wavefield_physics::GridMapping;
use wavefield_types::{WavefieldError, WavefieldResult};

/// One grid of per-cell probabilities, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityField {
    width: u32,
    height: u32,
    /// |ψ|² of the frame that wrote this field, before mixing.
    pub instantaneous: Vec<f64>,
    /// Temporally blended probability.
    pub mixed: Vec<f64>,
}

/// Row-major cell count, rejecting empty or overflowing grids.
pub fn cell_count(width: u32, height: u32) -> WavefieldResult<usize> {
    if width == 0 || height == 0 {
        return Err(WavefieldError::InvalidResolution { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(WavefieldError::InvalidResolution { width, height })
}

/// `cells` zeros, reporting allocation failure instead of aborting.
pub(crate) fn try_zeroed<T: Clone + Default>(cells: usize) -> WavefieldResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(cells)
        .map_err(|e| WavefieldError::Allocation {
            cells,
            reason: e.to_string(),
        })?;
    v.resize(cells, T::default());
    Ok(v)
}

impl ProbabilityField {
    /// All-zero field of the given size.
    pub fn zeroed(width: u32, height: u32) -> WavefieldResult<Self> {
        let cells = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            instantaneous: try_zeroed(cells)?,
            mixed: try_zeroed(cells)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> usize {
        self.mixed.len()
    }

    #[inline]
    pub fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    pub fn mixed_at(&self, col: u32, row: u32) -> f64 {
        self.mixed[self.index(col, row)]
    }

    pub fn instantaneous_at(&self, col: u32, row: u32) -> f64 {
        self.instantaneous[self.index(col, row)]
    }

    pub fn fill_zero(&mut self) {
        self.instantaneous.fill(0.0);
        self.mixed.fill(0.0);
    }

    pub fn is_zero(&self) -> bool {
        self.instantaneous.iter().all(|&v| v == 0.0) && self.mixed.iter().all(|&v| v == 0.0)
    }
}

/// Name of a buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSlot {
    A,
    B,
}

impl BufferSlot {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Ping-pong pair of probability fields.
#[derive(Debug, Clone)]
pub struct TemporalFeedbackBuffer {
    a: ProbabilityField,
    b: ProbabilityField,
    previous: BufferSlot,
}

impl TemporalFeedbackBuffer {
    /// Allocate both slots, all cells zero. Slot A starts as `previous`.
    pub fn new(width: u32, height: u32) -> WavefieldResult<Self> {
        Ok(Self {
            a: ProbabilityField::zeroed(width, height)?,
            b: ProbabilityField::zeroed(width, height)?,
            previous: BufferSlot::A,
        })
    }

    pub fn for_mapping(mapping: &GridMapping) -> WavefieldResult<Self> {
        Self::new(mapping.width, mapping.height)
    }

    pub fn width(&self) -> u32 {
        self.a.width
    }

    pub fn height(&self) -> u32 {
        self.a.height
    }

    /// Slot currently read as last frame's result.
    pub fn previous_slot(&self) -> BufferSlot {
        self.previous
    }

    /// Slot currently written by the running frame.
    pub fn next_slot(&self) -> BufferSlot {
        self.previous.other()
    }

    /// Last completed frame's field.
    pub fn previous(&self) -> &ProbabilityField {
        match self.previous {
            BufferSlot::A => &self.a,
            BufferSlot::B => &self.b,
        }
    }

    /// Borrow `(previous, next)` for one frame: shared read of the old
    /// result, exclusive write of the new one.
    pub fn split(&mut self) -> (&ProbabilityField, &mut ProbabilityField) {
        match self.previous {
            BufferSlot::A => (&self.a, &mut self.b),
            BufferSlot::B => (&self.b, &mut self.a),
        }
    }

    /// Frame boundary: `next` becomes `previous`.
    pub fn swap(&mut self) {
        self.previous = self.previous.other();
    }

    /// Zero both slots and make A `previous` again.
    pub fn reset(&mut self) {
        self.a.fill_zero();
        self.b.fill_zero();
        self.previous = BufferSlot::A;
    }

    /// Replace both slots with zeroed fields of the new size. History is
    /// discarded, not resampled. On error `self` is left untouched.
    pub fn reallocate(&mut self, width: u32, height: u32) -> WavefieldResult<()> {
        if width == self.width() && height == self.height() {
            self.reset();
            return Ok(());
        }
        *self = Self::new(width, height)?;
        Ok(())
    }
}
