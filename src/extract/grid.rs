use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result, check_finite};

/// Grid coordinate: `x` is the column, `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Row-major 2D scalar field
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Build from a flat row-major buffer of exactly `width * height` finite
    /// values
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != width * height {
            return Err(ClusterError::DimensionMismatch {
                expected: width * height,
                found: values.len(),
            });
        }
        for (y, row) in values.chunks(width.max(1)).enumerate() {
            check_finite(y, row)?;
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Grid of the given size filled with zeros
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Build from `field[y][x]` rows. Ragged rows and non-finite values are
    /// rejected.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        let mut values = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ClusterError::DimensionMismatch {
                    expected: width,
                    found: row.len(),
                });
            }
            check_finite(y, row)?;
            values.extend_from_slice(row);
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.index(x, y).map(|i| self.values[i])
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) -> Result<()> {
        let i = self.index(x, y).ok_or(ClusterError::IndexOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        if !value.is_finite() {
            return Err(ClusterError::NonFinite { row: y, col: x });
        }
        self.values[i] = value;
        Ok(())
    }

    /// Set every cell in `[x0, x1) × [y0, y1)` to `value`, clipped to the grid
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ClusterError::NonFinite { row: y0, col: x0 });
        }
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.values[y * self.width + x] = value;
            }
        }
        Ok(())
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

/// Boolean mask with the same shape as the grid it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        if cells.len() != width * height {
            return Err(ClusterError::DimensionMismatch {
                expected: width * height,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `false` outside the mask
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Mask of cells where `grid >= threshold`
pub fn threshold_field(grid: &Grid, threshold: f64) -> Mask {
    Mask {
        width: grid.width,
        height: grid.height,
        cells: grid.values.iter().map(|&v| v >= threshold).collect(),
    }
}
