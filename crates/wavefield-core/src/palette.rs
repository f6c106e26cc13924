// ─────────────────────────────────────────────────────────────────────
// Wavefield — Presentation Channel Mapping
// ─────────────────────────────────────────────────────────────────────
//! RGBA encoding of a finished frame:
//!
//!   R = g_noise  · P_inst                      (instantaneous noise)
//!   G = g_signal · P_mixed                     (localisation signal)
//!   B = g_signal · P_mixed + A·½(1 + sin(ωt))  (slow visual pulse)
//!
//! Channels saturate at 1. Cells within `marker_radius` of the supplied
//! ground truth are painted solid white.

use image::RgbaImage;
use rayon::prelude::*;

use wavefield_physics::GridMapping;
use wavefield_types::{RenderConfig, WavefieldError, WavefieldResult};

use crate::feedback::{cell_count, try_zeroed, ProbabilityField};

pub const MARKER_COLOR: [u8; 4] = [255, 255, 255, 255];

#[inline]
fn to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Blue-channel pulse at time `t`, in [0, pulse_amplitude].
#[inline]
pub fn pulse(render: &RenderConfig, t: f64) -> f64 {
    render.pulse_amplitude * 0.5 * (1.0 + (render.pulse_rate * t).sin())
}

/// Colour of one cell.
#[inline]
pub fn shade(render: &RenderConfig, instantaneous: f64, mixed: f64, pulse: f64) -> [u8; 4] {
    let signal = render.signal_gain * mixed;
    [
        to_channel(render.noise_gain * instantaneous),
        to_channel(signal),
        to_channel(signal + pulse),
        255,
    ]
}

/// Zeroed RGBA image, reporting allocation failure.
pub fn allocate_image(width: u32, height: u32) -> WavefieldResult<RgbaImage> {
    let bytes = cell_count(width, height)?
        .checked_mul(4)
        .ok_or(WavefieldError::InvalidResolution { width, height })?;
    let raw: Vec<u8> = try_zeroed(bytes)?;
    RgbaImage::from_raw(width, height, raw).ok_or(WavefieldError::InvalidResolution { width, height })
}

/// Paint `field` into `image` row-parallel on the current rayon pool.
pub fn paint(
    image: &mut RgbaImage,
    field: &ProbabilityField,
    mapping: &GridMapping,
    render: &RenderConfig,
    elapsed_time: f64,
    ground_truth: Option<[f64; 2]>,
) {
    debug_assert_eq!(image.dimensions(), (field.width(), field.height()));
    let width = field.width() as usize;
    let pulse = pulse(render, elapsed_time);
    let radius_sq = render.marker_radius * render.marker_radius;

    let raw: &mut [u8] = image;
    raw.par_chunks_mut(width * 4)
        .zip(field.instantaneous.par_chunks(width))
        .zip(field.mixed.par_chunks(width))
        .enumerate()
        .for_each(|(row, ((pixels, inst), mixed))| {
            for (col, px) in pixels.chunks_exact_mut(4).enumerate() {
                let on_marker = ground_truth.is_some_and(|truth| {
                    let p = mapping.cell_to_world(col as u32, row as u32);
                    let (dx, dy) = (p[0] - truth[0], p[1] - truth[1]);
                    dx * dx + dy * dy <= radius_sq
                });
                let rgba = if on_marker {
                    MARKER_COLOR
                } else {
                    shade(render, inst[col], mixed[col], pulse)
                };
                px.copy_from_slice(&rgba);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_2x1(inst: [f64; 2], mixed: [f64; 2]) -> ProbabilityField {
        let mut f = ProbabilityField::zeroed(2, 1).unwrap();
        f.instantaneous.copy_from_slice(&inst);
        f.mixed.copy_from_slice(&mixed);
        f
    }

    #[test]
    fn test_shade_channels() {
        let render = RenderConfig {
            noise_gain: 0.5,
            signal_gain: 1.0,
            pulse_amplitude: 0.0,
            ..RenderConfig::default()
        };
        assert_eq!(shade(&render, 1.0, 0.2, 0.0), [128, 51, 51, 255]);
        assert_eq!(shade(&render, 10.0, 4.0, 0.0), [255, 255, 255, 255]);
        assert_eq!(shade(&render, 0.0, 0.0, 0.0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_pulse_bounds() {
        let render = RenderConfig::default();
        for i in 0..50 {
            let p = pulse(&render, i as f64 * 0.37);
            assert!(p >= 0.0 && p <= render.pulse_amplitude + 1e-12);
        }
        // sin(0) = 0: half amplitude.
        assert!((pulse(&render, 0.0) - 0.5 * render.pulse_amplitude).abs() < 1e-12);
    }

    #[test]
    fn test_allocate_image() {
        let img = allocate_image(3, 2).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert!(img.as_raw().iter().all(|&b| b == 0));
        assert!(allocate_image(0, 2).is_err());
    }

    #[test]
    fn test_paint_maps_channels() {
        let render = RenderConfig {
            noise_gain: 1.0,
            signal_gain: 1.0,
            pulse_amplitude: 0.0,
            ..RenderConfig::default()
        };
        let mapping = GridMapping::new(2, 1, [0.0, 0.0], 1.0);
        let field = field_2x1([0.0, 1.0], [1.0, 0.0]);
        let mut img = allocate_image(2, 1).unwrap();
        paint(&mut img, &field, &mapping, &render, 0.0, None);
        assert_eq!(img.get_pixel(0, 0).0, [0, 255, 255, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_paint_marker_disk() {
        let render = RenderConfig {
            pulse_amplitude: 0.0,
            marker_radius: 0.1,
            ..RenderConfig::default()
        };
        let mapping = GridMapping::new(20, 20, [0.0, 0.0], 1.0);
        let field = ProbabilityField::zeroed(20, 20).unwrap();
        let mut img = allocate_image(20, 20).unwrap();
        let truth = mapping.cell_to_world(4, 15);
        paint(&mut img, &field, &mapping, &render, 0.0, Some(truth));
        assert_eq!(img.get_pixel(4, 15).0, MARKER_COLOR);
        assert_eq!(img.get_pixel(10, 10).0, [0, 0, 0, 255]);
    }
}
