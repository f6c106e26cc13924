// ─────────────────────────────────────────────────────────────────────
// Wavefield — Landmark Observation Model
// ─────────────────────────────────────────────────────────────────────
//! Complex wave contributed by a single landmark at a query point:
//!
//!   r = |p - x_L| - d_L
//!   ψ_L(p) = c_L · exp(-γ|r|) · (cos(k·r + φ_L), sin(k·r + φ_L))
//!
//! Amplitude decays symmetrically in the residual, so over- and
//! under-estimated ranges are penalised alike.

use num_complex::Complex64;

use wavefield_types::{Landmark, SimulationParameters};

/// Wave contributed by `landmark` at `point`.
#[inline]
pub fn landmark_wave(point: [f64; 2], landmark: &Landmark, params: &SimulationParameters) -> Complex64 {
    // Zero confidence must stay exactly zero even where exp() overflows.
    if landmark.confidence == 0.0 {
        return Complex64::new(0.0, 0.0);
    }
    let residual = landmark.distance_to(point) - landmark.observed_distance;
    let phase = params.wave_number * residual + landmark.phase_offset;
    let amplitude = landmark.confidence * (-params.decay_factor * residual.abs()).exp();
    Complex64::from_polar(amplitude, phase)
}

/// Superposition ψ(p) of every landmark wave.
#[inline]
pub fn superpose(point: [f64; 2], landmarks: &[Landmark], params: &SimulationParameters) -> Complex64 {
    landmarks
        .iter()
        .map(|lm| landmark_wave(point, lm, params))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(k: f64, decay: f64) -> SimulationParameters {
        SimulationParameters::new(k, decay, 0.0)
    }

    #[test]
    fn test_zero_confidence_contributes_nothing() {
        let lm = Landmark::new([0.3, -0.2], 0.4, 0.0, 1.1);
        for &point in &[[0.0, 0.0], [0.3, -0.2], [5.0, 5.0]] {
            let w = landmark_wave(point, &lm, &params(20.0, 2.0));
            assert_eq!(w.re, 0.0);
            assert_eq!(w.im, 0.0);
        }
        // Negative decay would overflow exp() far away; still exactly zero.
        let w = landmark_wave([1e6, 0.0], &lm, &params(20.0, -5.0));
        assert_eq!(w.norm_sqr(), 0.0);
    }

    #[test]
    fn test_on_ring_amplitude_is_confidence() {
        // Point exactly on the observed range ring: residual = 0.
        let lm = Landmark::new([0.0, 0.0], 1.0, 0.7, 0.0);
        let w = landmark_wave([1.0, 0.0], &lm, &params(50.0, 3.0));
        assert!((w.norm() - 0.7).abs() < 1e-12);
        assert!(w.im.abs() < 1e-12);
    }

    #[test]
    fn test_phase_follows_residual() {
        let lm = Landmark::new([0.0, 0.0], 1.0, 1.0, 0.25);
        let k = 3.0;
        let w = landmark_wave([1.5, 0.0], &lm, &params(k, 0.0));
        let expected = k * 0.5 + 0.25;
        assert!((w.arg() - expected).abs() < 1e-12, "arg={} expected={expected}", w.arg());
    }

    #[test]
    fn test_decay_symmetric_in_residual() {
        let lm = Landmark::new([0.0, 0.0], 1.0, 1.0, 0.0);
        let p = params(10.0, 2.0);
        let inside = landmark_wave([0.7, 0.0], &lm, &p).norm();
        let outside = landmark_wave([1.3, 0.0], &lm, &p).norm();
        assert!((inside - outside).abs() < 1e-12);
        assert!((inside - (-0.6f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_point_is_regular() {
        // Query exactly at the landmark: residual = -observed_distance.
        let lm = Landmark::new([0.2, 0.2], 0.5, 1.0, 0.0);
        let w = landmark_wave([0.2, 0.2], &lm, &params(4.0, 1.0));
        assert!(w.re.is_finite() && w.im.is_finite());
        assert!((w.norm() - (-0.5f64).exp()).abs() < 1e-12);
        assert!((w.arg() - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_superpose_empty_is_zero() {
        let psi = superpose([0.1, 0.1], &[], &params(10.0, 1.0));
        assert_eq!(psi.norm_sqr(), 0.0);
    }

    #[test]
    fn test_superpose_in_phase_adds_amplitudes() {
        let lms = [
            Landmark::new([-0.5, 0.0], 0.5, 1.0, 0.0),
            Landmark::new([0.5, 0.0], 0.5, 1.0, 0.0),
        ];
        let psi = superpose([0.0, 0.0], &lms, &params(20.0, 2.0));
        assert!((psi.re - 2.0).abs() < 1e-12);
        assert!(psi.im.abs() < 1e-12);
    }
}
