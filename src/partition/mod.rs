//! # Partitioning
//!
//! Splits a map's grid into non-overlapping rectangular [`Region`]s so each
//! part can be reduced under its own share of the cell budget, and computes
//! equal-window sums for the hierarchical-clustering encoding.

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::map::{IntensityMap, MapShape};

mod error;


pub use error::PartitionError;

/// Rectangle of a map grid, `rows × cols` cells starting at `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// First row
    pub row: usize,
    /// First column
    pub col: usize,
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Region {
    /// Create a region
    pub fn new(row: usize, col: usize, rows: usize, cols: usize) -> Self {
        Self {
            row,
            col,
            rows,
            cols,
        }
    }

    /// Region covering a whole grid
    pub fn whole(shape: MapShape) -> Self {
        Self::new(0, 0, shape.rows, shape.cols)
    }

    /// Extent of the region
    pub fn shape(&self) -> MapShape {
        MapShape::new(self.rows, self.cols)
    }

    /// True when the absolute cell `(row, col)` lies in the region
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row - self.row < self.rows && col >= self.col && col - self.col < self.cols
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}]",
            self.row,
            self.row + self.rows,
            self.col,
            self.col + self.cols
        )
    }
}

/// How a grid is cut into regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PartitionStrategy {
    /// A single region spanning the grid
    Whole,
    /// `row_parts × col_parts` slices of `ceil(dim / parts)` cells
    Uniform {
        /// Slices along the rows
        row_parts: usize,
        /// Slices along the columns
        col_parts: usize,
    },
    /// Slices of a fixed size
    FixedSize {
        /// Rows per slice
        part_rows: usize,
        /// Columns per slice
        part_cols: usize,
    },
}

impl fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionStrategy::Whole => write!(f, "whole"),
            PartitionStrategy::Uniform {
                row_parts,
                col_parts,
            } => write!(f, "uniform {row_parts}x{col_parts} parts"),
            PartitionStrategy::FixedSize {
                part_rows,
                part_cols,
            } => write!(f, "parts of {part_rows}x{part_cols} cells"),
        }
    }
}

/// Ordered, non-overlapping regions covering a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    shape: MapShape,
    regions: Vec<Region>,
}

impl Partition {
    /// Cut `shape` per `strategy`; regions come out in row-major order and the
    /// last slice on each axis is truncated at the border
    pub fn generate(shape: MapShape, strategy: PartitionStrategy) -> Result<Self, PartitionError> {
        if shape.rows == 0 || shape.cols == 0 {
            return Err(PartitionError::InvalidPartition(format!(
                "cannot partition an empty {shape} grid"
            )));
        }

        let (step_row, step_col) = match strategy {
            PartitionStrategy::Whole => (shape.rows, shape.cols),
            PartitionStrategy::Uniform {
                row_parts,
                col_parts,
            } => {
                if row_parts == 0 || col_parts == 0 {
                    return Err(PartitionError::InvalidPartition(format!(
                        "part counts must be positive, got {row_parts}x{col_parts}"
                    )));
                }
                (shape.rows.div_ceil(row_parts), shape.cols.div_ceil(col_parts))
            }
            PartitionStrategy::FixedSize {
                part_rows,
                part_cols,
            } => {
                if part_rows == 0 || part_cols == 0 {
                    return Err(PartitionError::InvalidPartition(format!(
                        "part sizes must be positive, got {part_rows}x{part_cols}"
                    )));
                }
                (part_rows, part_cols)
            }
        };

        let mut regions = Vec::new();
        for row in (0..shape.rows).step_by(step_row) {
            for col in (0..shape.cols).step_by(step_col) {
                regions.push(Region::new(
                    row,
                    col,
                    step_row.min(shape.rows - row),
                    step_col.min(shape.cols - col),
                ));
            }
        }

        info!(
            "Partitioned a {} grid into {} regions ({})",
            shape,
            regions.len(),
            strategy
        );
        Ok(Self { shape, regions })
    }

    /// Grid the partition covers
    pub fn shape(&self) -> MapShape {
        self.shape
    }

    /// Regions in row-major order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Never true for a generated partition
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterate over regions
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// Square windows of equal side laid over a map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGrid {
    side: usize,
}

impl WindowGrid {
    /// Windows of `side × side` cells
    pub fn new(side: usize) -> Result<Self, PartitionError> {
        if side == 0 {
            return Err(PartitionError::InvalidPartition(
                "window side must be positive".to_string(),
            ));
        }
        Ok(Self { side })
    }

    /// Window side in cells
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of windows covering `shape`; both sides must be multiples of the window side
    pub fn window_count(&self, shape: MapShape) -> Result<usize, PartitionError> {
        if shape.rows % self.side != 0 || shape.cols % self.side != 0 {
            return Err(PartitionError::InvalidPartition(format!(
                "{} grid is not divisible into {}x{} windows",
                shape, self.side, self.side
            )));
        }
        Ok((shape.rows / self.side) * (shape.cols / self.side))
    }

    /// Sum of cell values per window, indexed `row_window * col_windows + col_window`.
    ///
    /// Windows without occupied cells are included as zeros.
    pub fn window_sums(&self, map: &IntensityMap) -> Result<Vec<f64>, PartitionError> {
        let mut sums = vec![0.0; self.window_count(map.shape())?];
        let col_windows = map.width() / self.side;
        for cell in map.cells() {
            let idx = (cell.row / self.side) * col_windows + cell.col / self.side;
            sums[idx] += cell.value;
        }
        Ok(sums)
    }
}
