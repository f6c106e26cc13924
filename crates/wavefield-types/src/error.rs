// ─────────────────────────────────────────────────────────────────────
// Wavefield — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all engine failures.
///
/// Per-cell evaluation is pure arithmetic and never fails; everything
/// here comes from construction, reallocation or configuration.
#[derive(Error, Debug)]
pub enum WavefieldError {
    /// No compute backend could be acquired for the requested surface.
    #[error("compute backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Field buffer allocation failed on create or resize.
    #[error("allocation failure: could not reserve {cells} field cells: {reason}")]
    Allocation { cells: usize, reason: String },

    /// Grid dimensions are zero or overflow the addressable cell count.
    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type WavefieldResult<T> = Result<T, WavefieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WavefieldError::InvalidResolution { width: 0, height: 4 };
        assert_eq!(err.to_string(), "invalid resolution 0x4");

        let err = WavefieldError::Allocation {
            cells: 16,
            reason: "capacity overflow".into(),
        };
        assert!(err.to_string().contains("16 field cells"));
    }
}
