//! Fixed grid geometry
//!
//! All gameplay happens in whole cells. Pixel geometry is only needed by the
//! presentation layer, which supplies its own cell size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Grid dimensions (columns x rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
}

impl GridSpec {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    #[inline]
    pub fn contains_col(&self, col: i32) -> bool {
        col >= 0 && (col as i64) < self.cols as i64
    }

    #[inline]
    pub fn contains_row(&self, row: i32) -> bool {
        row >= 0 && (row as i64) < self.rows as i64
    }

    #[inline]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        self.contains_col(col) && self.contains_row(row)
    }

    /// Clamp a column into [0, cols)
    #[inline]
    pub fn clamp_col(&self, col: i32) -> i32 {
        col.clamp(0, self.last_col())
    }

    #[inline]
    pub fn last_col(&self) -> i32 {
        self.cols as i32 - 1
    }

    /// Pixel center of a cell, given the presentation's cell size
    pub fn cell_center(&self, col: i32, row: i32, cell_width: f32, cell_height: f32) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * cell_width,
            (row as f32 + 0.5) * cell_height,
        )
    }
}
