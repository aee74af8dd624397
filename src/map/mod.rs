//! # Ion intensity maps
//!
//! An [`IntensityMap`] is an immutable sparse matrix over the quantized
//! `(retention time, m/z)` grid of one sample: **rows are retention-time bins,
//! columns are m/z bins**. Only nonzero cells are stored, sorted row-major.
//!
//! Every transform (slicing, padding, reduction, set algebra) returns a new map.
//!
//! ## Cell values
//!
//! | [`CellMode`]  | value of an occupied cell          | coincident features |
//! |---------------|------------------------------------|---------------------|
//! | `Binary`      | `1`                                | kept once           |
//! | `Quartile(_)` | class `1..=4` by quartile cut point| highest class       |
//! | `Intensity`   | raw `AREA`                         | summed              |

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::feature::{Feature, FeatureList, Quartiles, RunBounds};
use crate::partition::Region;
use crate::quantize::GridQuantizer;

mod builder;
mod error;


pub use builder::{MapBuilder, MergePolicy};
pub use error::MapError;

/// Rows × columns of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapShape {
    /// Retention-time bins
    pub rows: usize,
    /// m/z bins
    pub cols: usize,
}

impl MapShape {
    /// Create a shape
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Component-wise maximum of two shapes
    pub fn max(self, other: MapShape) -> MapShape {
        MapShape::new(self.rows.max(other.rows), self.cols.max(other.cols))
    }

    /// Total number of cells, dense
    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// True when `(row, col)` lies inside the shape
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// True when both sides are at least as large as `other`'s
    pub fn covers(&self, other: &MapShape) -> bool {
        self.rows >= other.rows && self.cols >= other.cols
    }
}

impl fmt::Display for MapShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// One stored (nonzero) cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Row (retention-time bin)
    pub row: usize,
    /// Column (m/z bin)
    pub col: usize,
    /// Cell value
    pub value: f64,
}

/// What the values of a map mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    /// Presence (`1`) / absence
    Binary,
    /// Small ordinal classes such as quartiles
    Classes,
    /// Raw or aggregated intensities
    Intensity,
}

/// Which quartile cut points classify a sample's intensities
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuartileReference {
    /// Quartiles of the sample's own intensities
    SampleLocal,
    /// Corpus-wide quartiles computed beforehand
    Global(Quartiles),
}

/// How features become cell values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellMode {
    /// Presence map
    Binary,
    /// Quartile class of the feature intensity
    Quartile(QuartileReference),
    /// Raw intensity
    Intensity,
}

impl CellMode {
    /// Kind of map this mode produces
    pub fn kind(&self) -> MapKind {
        match self {
            CellMode::Binary => MapKind::Binary,
            CellMode::Quartile(_) => MapKind::Classes,
            CellMode::Intensity => MapKind::Intensity,
        }
    }
}

/// Order in which a map is walked when flattened to a dense sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Row by row (all m/z bins of one retention-time bin first)
    RowMajor,
    /// Column by column
    ColumnMajor,
}

/// Sparse ion intensity map of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityMap {
    name: String,
    shape: MapShape,
    kind: MapKind,
    cells: Vec<Cell>,
}

impl IntensityMap {
    /// Map with no occupied cells
    pub fn empty(name: impl Into<String>, shape: MapShape, kind: MapKind) -> Self {
        Self {
            name: name.into(),
            shape,
            kind,
            cells: Vec::new(),
        }
    }

    /// Invariant: `cells` sorted by `(row, col)`, unique, nonzero, inside `shape`
    pub(crate) fn from_sorted_cells(
        name: String,
        shape: MapShape,
        kind: MapKind,
        cells: Vec<Cell>,
    ) -> Self {
        Self {
            name,
            shape,
            kind,
            cells,
        }
    }

    /// Quantize `features` against `bounds` and fill a map per `mode`.
    ///
    /// The grid precision is the largest precision found in `features`.
    pub fn build(
        name: impl Into<String>,
        features: &[Feature],
        bounds: &RunBounds,
        mode: CellMode,
    ) -> Result<Self, MapError> {
        let name = name.into();
        let quantizer = GridQuantizer::for_features(bounds, features)?;

        let quartiles = match mode {
            CellMode::Quartile(QuartileReference::Global(q)) => Some(q),
            CellMode::Quartile(QuartileReference::SampleLocal) if !features.is_empty() => {
                let values: Vec<f64> = features.iter().map(|f| f.intensity).collect();
                Some(Quartiles::from_values(&values)?)
            }
            _ => None,
        };

        let mut builder = MapBuilder::new(quantizer.shape(), mode.kind()).with_name(name);
        builder.reserve(features.len());
        for feature in features {
            let (row, col) = quantizer.quantize(feature)?;
            let value = match (mode, quartiles) {
                (CellMode::Binary, _) => 1.0,
                (CellMode::Intensity, _) => feature.intensity,
                (CellMode::Quartile(_), Some(q)) => f64::from(q.class_of(feature.intensity)),
                (CellMode::Quartile(_), None) => 0.0,
            };
            builder.push(row, col, value)?;
        }

        let map = builder.build();
        debug!(
            "{}: {} features -> {} nonzero cells on a {} grid",
            map.name,
            features.len(),
            map.nonzero_count(),
            map.shape
        );
        Ok(map)
    }

    /// Build the map of a whole feature list
    pub fn from_feature_list(list: &FeatureList, mode: CellMode) -> Result<Self, MapError> {
        Self::build(list.name.as_str(), &list.features, &list.bounds, mode)
    }

    /// Sample name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rows × columns
    pub fn shape(&self) -> MapShape {
        self.shape
    }

    /// Number of columns (m/z bins)
    pub fn width(&self) -> usize {
        self.shape.cols
    }

    /// Number of rows (retention-time bins)
    pub fn height(&self) -> usize {
        self.shape.rows
    }

    /// What the cell values mean
    pub fn kind(&self) -> MapKind {
        self.kind
    }

    /// Number of occupied cells
    pub fn nonzero_count(&self) -> usize {
        self.cells.len()
    }

    /// Occupied cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Sum of all cell values
    pub fn total(&self) -> f64 {
        self.cells.iter().map(|c| c.value).sum()
    }

    /// Value at `(row, col)`, zero for empty cells
    pub fn get(&self, row: usize, col: usize) -> Result<f64, MapError> {
        if !self.shape.contains(row, col) {
            return Err(MapError::OutOfBounds {
                row,
                col,
                shape: self.shape,
            });
        }
        Ok(self
            .cells
            .binary_search_by_key(&(row, col), |c| (c.row, c.col))
            .map(|i| self.cells[i].value)
            .unwrap_or(0.0))
    }

    /// Same map under another name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Dense cell values in the requested order
    pub fn flatten(&self, order: TraversalOrder) -> Vec<f64> {
        let MapShape { rows, cols } = self.shape;
        let mut dense = vec![0.0; self.shape.cell_count()];
        for cell in &self.cells {
            let idx = match order {
                TraversalOrder::RowMajor => cell.row * cols + cell.col,
                TraversalOrder::ColumnMajor => cell.col * rows + cell.row,
            };
            dense[idx] = cell.value;
        }
        dense
    }

    /// Sub-map covering `region`, re-indexed from its top-left corner
    pub fn region(&self, region: &Region) -> Result<Self, MapError> {
        let end_row = region.row.checked_add(region.rows);
        let end_col = region.col.checked_add(region.cols);
        match (end_row, end_col) {
            (Some(r), Some(c)) if r <= self.shape.rows && c <= self.shape.cols => {}
            _ => {
                return Err(MapError::Shape(format!(
                    "region {} does not fit in a {} map",
                    region, self.shape
                )))
            }
        }

        let cells = self
            .cells
            .iter()
            .filter(|c| region.contains(c.row, c.col))
            .map(|c| Cell {
                row: c.row - region.row,
                col: c.col - region.col,
                value: c.value,
            })
            .collect();
        Ok(Self::from_sorted_cells(
            self.name.clone(),
            region.shape(),
            self.kind,
            cells,
        ))
    }

    /// Same cells inside a larger zero-filled grid
    pub fn padded(&self, shape: MapShape) -> Result<Self, MapError> {
        if !shape.covers(&self.shape) {
            return Err(MapError::Shape(format!(
                "cannot pad a {} map to {}",
                self.shape, shape
            )));
        }
        Ok(Self {
            shape,
            ..self.clone()
        })
    }
}
