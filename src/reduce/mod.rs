//! # Multiresolution reduction
//!
//! Collapses a map into non-overlapping windows aligned on the origin. Window
//! `(i, j)` covers rows `[i*h, i*h + h)` and columns `[j*w, j*w + w)`; trailing
//! windows cover whatever cells remain. Every window with at least one occupied
//! cell becomes a single cell of the reduced map, whose shape is
//! `(ceil(rows / h), ceil(cols / w))`.
//!
//! The reduction repeats until both the minimum iteration count and the cell
//! budget are satisfied.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::map::{IntensityMap, MapBuilder, MapKind, MapShape};

mod error;


pub use error::ReductionError;

/// Cell budget of one encoded sample (token limit of a NEXUS matrix row)
pub const DEFAULT_MAX_CELLS: usize = 99_990;

/// Window size; `width` spans m/z columns, `height` spans retention-time rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// Columns per window
    pub width: usize,
    /// Rows per window
    pub height: usize,
}

impl Window {
    /// Create a window
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Shape a map of `shape` has after one reduction
    pub fn reduced_shape(&self, shape: MapShape) -> MapShape {
        MapShape::new(shape.rows.div_ceil(self.height), shape.cols.div_ceil(self.width))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} (w x h)", self.width, self.height)
    }
}

/// Denominator used by the threshold rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdNormalization {
    /// Cells actually covered by the window (`rows × cols`)
    #[default]
    WindowArea,
    /// Square of the covered row count, kept for output compatibility with
    /// matrices produced by older pipelines
    RowCountSquared,
}

impl ThresholdNormalization {
    fn denominator(self, rows: usize, cols: usize) -> f64 {
        match self {
            ThresholdNormalization::WindowArea => (rows * cols) as f64,
            ThresholdNormalization::RowCountSquared => (rows * rows) as f64,
        }
    }
}

/// Aggregation applied to every window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReductionRule {
    /// Presence iff `occupied / denominator >= fraction`
    Threshold {
        /// Required occupied fraction in `[0, 1]`
        fraction: f64,
        /// Denominator of the fraction
        normalization: ThresholdNormalization,
    },
    /// Mean of the occupied cells, rounded half to even
    RoundedMean,
}

impl ReductionRule {
    /// Threshold rule with the default normalization
    pub fn threshold(fraction: f64) -> Self {
        ReductionRule::Threshold {
            fraction,
            normalization: ThresholdNormalization::default(),
        }
    }
}

/// Parameters of a reduction run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionConfig {
    /// Window applied at every iteration
    pub window: Window,
    /// Per-window aggregation
    pub rule: ReductionRule,
    /// Iterations performed at least
    pub min_iterations: usize,
    /// Keep reducing while the map has more cells than this
    pub max_cells: Option<usize>,
}

impl ReductionConfig {
    /// Configuration with no iteration floor and no budget
    pub fn new(window: Window, rule: ReductionRule) -> Self {
        Self {
            window,
            rule,
            min_iterations: 0,
            max_cells: None,
        }
    }

    /// Set the minimum number of iterations
    pub fn with_min_iterations(mut self, min_iterations: usize) -> Self {
        self.min_iterations = min_iterations;
        self
    }

    /// Set the cell budget
    pub fn with_max_cells(mut self, max_cells: Option<usize>) -> Self {
        self.max_cells = max_cells;
        self
    }
}

/// Statistics from a reduction run
#[derive(Debug, Clone, Default)]
pub struct ReductionStats {
    /// Iterations performed
    pub iterations: usize,
    /// Shape before reduction
    pub initial_shape: Option<MapShape>,
    /// Shape after reduction
    pub final_shape: Option<MapShape>,
    /// Occupied cells after reduction
    pub final_nonzero: usize,
}

impl fmt::Display for ReductionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |s: Option<MapShape>| s.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} iterations, {} -> {}, {} occupied cells",
            self.iterations,
            show(self.initial_shape),
            show(self.final_shape),
            self.final_nonzero
        )
    }
}

/// Applies a [`ReductionConfig`] to maps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowedReducer {
    config: ReductionConfig,
}

impl WindowedReducer {
    /// Validate the window and rule and create a reducer
    pub fn new(config: ReductionConfig) -> Result<Self, ReductionError> {
        let Window { width, height } = config.window;
        if width == 0 || height == 0 || (width == 1 && height == 1) {
            return Err(ReductionError::DegenerateWindow(config.window));
        }
        if let ReductionRule::Threshold { fraction, .. } = config.rule {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ReductionError::InvalidThreshold(fraction));
            }
        }
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Same reducer with another cell budget
    pub fn with_max_cells(&self, max_cells: Option<usize>) -> Self {
        Self {
            config: self.config.with_max_cells(max_cells),
        }
    }

    /// Reduce until at least `min_iterations` passes ran and the map fits the budget
    pub fn reduce(&self, map: &IntensityMap) -> Result<IntensityMap, ReductionError> {
        self.reduce_with_stats(map).map(|(m, _)| m)
    }

    /// Like [`reduce`](Self::reduce), also reporting what happened
    pub fn reduce_with_stats(
        &self,
        map: &IntensityMap,
    ) -> Result<(IntensityMap, ReductionStats), ReductionError> {
        let mut stats = ReductionStats {
            initial_shape: Some(map.shape()),
            ..Default::default()
        };
        let over_budget = |m: &IntensityMap| {
            self.config
                .max_cells
                .is_some_and(|max| m.shape().cell_count() > max)
        };

        let mut current = map.clone();
        while stats.iterations < self.config.min_iterations || over_budget(&current) {
            current = self.reduce_once(&current)?;
            stats.iterations += 1;
            debug!(
                "{}: iteration {} -> {} grid, {} occupied cells",
                current.name(),
                stats.iterations,
                current.shape(),
                current.nonzero_count()
            );
        }

        stats.final_shape = Some(current.shape());
        stats.final_nonzero = current.nonzero_count();
        Ok((current, stats))
    }

    /// One pass of window aggregation
    pub fn reduce_once(&self, map: &IntensityMap) -> Result<IntensityMap, ReductionError> {
        let window = self.config.window;
        let shape = map.shape();
        if window.width >= shape.cols || window.height >= shape.rows {
            return Err(ReductionError::WindowTooLarge { window, shape });
        }

        // (window row, window col) -> (occupied cells, value sum)
        let mut windows: BTreeMap<(usize, usize), (usize, f64)> = BTreeMap::new();
        for cell in map.cells() {
            let entry = windows
                .entry((cell.row / window.height, cell.col / window.width))
                .or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += cell.value;
        }

        let kind = match self.config.rule {
            ReductionRule::Threshold { .. } => MapKind::Binary,
            ReductionRule::RoundedMean => map.kind(),
        };
        let mut builder = MapBuilder::new(window.reduced_shape(shape), kind).with_name(map.name());
        builder.reserve(windows.len());

        for ((wr, wc), (occupied, sum)) in windows {
            let value = match self.config.rule {
                ReductionRule::Threshold {
                    fraction,
                    normalization,
                } => {
                    let rows = window.height.min(shape.rows - wr * window.height);
                    let cols = window.width.min(shape.cols - wc * window.width);
                    let ratio = occupied as f64 / normalization.denominator(rows, cols);
                    if ratio >= fraction {
                        1.0
                    } else {
                        0.0
                    }
                }
                ReductionRule::RoundedMean => (sum / occupied as f64).round_ties_even(),
            };
            builder.push(wr, wc, value)?;
        }

        Ok(builder.build())
    }
}
