//! Grid snapping

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Snaps positions to a grid
pub trait GridSnap {
    fn snap(&self, position: Vec3) -> Vec3;
}

/// Uniform cubic grid
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub origin: Vec3,
    pub cell_size: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            cell_size: 1.0,
        }
    }
}

impl Grid {
    pub fn new(origin: Vec3, cell_size: f32) -> Self {
        Self { origin, cell_size }
    }
}

impl GridSnap for Grid {
    /// Nearest grid point. A non-positive cell size disables snapping.
    fn snap(&self, position: Vec3) -> Vec3 {
        if self.cell_size <= 0.0 {
            return position;
        }
        self.origin + ((position - self.origin) / self.cell_size).round() * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap() {
        let grid = Grid::new(Vec3::ZERO, 0.5);
        assert_eq!(grid.snap(Vec3::new(0.26, -0.74, 1.1)), Vec3::new(0.5, -0.5, 1.0));
    }

    #[test]
    fn test_snap_with_origin() {
        let grid = Grid::new(Vec3::splat(0.1), 1.0);
        assert!((grid.snap(Vec3::new(0.9, 0.0, 0.0)) - Vec3::new(1.1, 0.1, 0.1)).length() < 1e-6);
    }

    #[test]
    fn test_disabled_grid() {
        let grid = Grid::new(Vec3::ZERO, 0.0);
        let p = Vec3::new(0.3, 0.4, 0.5);
        assert_eq!(grid.snap(p), p);
    }
}
