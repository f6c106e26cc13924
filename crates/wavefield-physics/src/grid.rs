// ─────────────────────────────────────────────────────────────────────
// Wavefield — Grid ↔ World Mapping
// ─────────────────────────────────────────────────────────────────────
//! Row-major cell grid laid over a rectangular world window.
//!
//! Row 0 is the top of the image, so world y grows upward while the
//! row index grows downward. Each cell is sampled at its centre.

use serde::{Deserialize, Serialize};

use wavefield_types::EngineConfig;

/// Maps grid cells to world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMapping {
    pub width: u32,
    pub height: u32,
    /// World point at the grid centre.
    pub center: [f64; 2],
    /// Half of the world-space height covered by the grid.
    pub half_height: f64,
}

impl GridMapping {
    pub fn new(width: u32, height: u32, center: [f64; 2], half_height: f64) -> Self {
        Self {
            width,
            height,
            center,
            half_height,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.width,
            config.height,
            config.view_center,
            config.view_half_height,
        )
    }

    /// Same window, new resolution.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..*self
        }
    }

    /// Total number of cells.
    #[inline]
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }

    /// Half of the world-space width covered by the grid.
    #[inline]
    pub fn half_width(&self) -> f64 {
        self.half_height * self.aspect()
    }

    /// World-space edge length of one cell.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        2.0 * self.half_height / self.height.max(1) as f64
    }

    /// Row-major index of `(col, row)`.
    #[inline]
    pub fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// `(col, row)` of a row-major index.
    #[inline]
    pub fn cell_of(&self, index: usize) -> (u32, u32) {
        let w = self.width.max(1) as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// World coordinate of the centre of cell `(col, row)`.
    #[inline]
    pub fn cell_to_world(&self, col: u32, row: u32) -> [f64; 2] {
        let u = (col as f64 + 0.5) / self.width as f64 * 2.0 - 1.0;
        let v = (row as f64 + 0.5) / self.height as f64 * 2.0 - 1.0;
        [
            self.center[0] + u * self.half_width(),
            self.center[1] - v * self.half_height,
        ]
    }

    /// Cell containing `point`, or `None` if it lies outside the window.
    pub fn world_to_cell(&self, point: [f64; 2]) -> Option<(u32, u32)> {
        let u = (point[0] - self.center[0]) / self.half_width();
        let v = (self.center[1] - point[1]) / self.half_height;
        let col = ((u + 1.0) * 0.5 * self.width as f64).floor();
        let row = ((v + 1.0) * 0.5 * self.height as f64).floor();
        if !(col >= 0.0 && row >= 0.0) || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some((col as u32, row as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_grid_corners() {
        let g = GridMapping::new(4, 4, [0.0, 0.0], 1.0);
        let top_left = g.cell_to_world(0, 0);
        assert!((top_left[0] + 0.75).abs() < 1e-12);
        assert!((top_left[1] - 0.75).abs() < 1e-12);
        let bottom_right = g.cell_to_world(3, 3);
        assert!((bottom_right[0] - 0.75).abs() < 1e-12);
        assert!((bottom_right[1] + 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_aspect_correction() {
        let g = GridMapping::new(200, 100, [0.0, 0.0], 1.0);
        assert!((g.half_width() - 2.0).abs() < 1e-12);
        let right = g.cell_to_world(199, 50);
        assert!(right[0] > 1.9 && right[0] < 2.0);
    }

    #[test]
    fn test_center_offset() {
        let g = GridMapping::new(2, 2, [3.0, -1.0], 0.5);
        let p = g.cell_to_world(1, 1);
        assert!((p[0] - 3.25).abs() < 1e-12);
        assert!((p[1] + 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_world_to_cell_inverts_cell_to_world() {
        let g = GridMapping::new(37, 23, [0.1, -0.2], 1.3);
        for row in [0u32, 5, 22] {
            for col in [0u32, 17, 36] {
                let p = g.cell_to_world(col, row);
                assert_eq!(g.world_to_cell(p), Some((col, row)));
            }
        }
    }

    #[test]
    fn test_world_to_cell_outside() {
        let g = GridMapping::new(8, 8, [0.0, 0.0], 1.0);
        assert_eq!(g.world_to_cell([2.0, 0.0]), None);
        assert_eq!(g.world_to_cell([0.0, -1.5]), None);
        assert_eq!(g.world_to_cell([f64::NAN, 0.0]), None);
    }

    #[test]
    fn test_index_roundtrip() {
        let g = GridMapping::new(7, 3, [0.0, 0.0], 1.0);
        assert_eq!(g.cells(), 21);
        assert_eq!(g.index(4, 2), 18);
        assert_eq!(g.cell_of(18), (4, 2));
    }

    #[test]
    fn test_resized_keeps_window() {
        let g = GridMapping::new(8, 8, [1.0, 2.0], 0.5).resized(16, 4);
        assert_eq!((g.width, g.height), (16, 4));
        assert_eq!(g.center, [1.0, 2.0]);
        assert_eq!(g.half_height, 0.5);
    }
}
