//! # Character encoding
//!
//! Turns reduced maps into a taxon × character matrix of digit states, the
//! input of a NEXUS DATA block.
//!
//! Two encodings are provided:
//!
//! - [`encode_maps`]: pad every map to the corpus' common grid, partition it,
//!   reduce each region under an equal share of the cell budget, flatten in
//!   the caller's traversal order and discretize.
//! - [`encode_window_sums`]: sum intensities over equal square windows and
//!   discretize the sums (hierarchical-clustering encoding).

use std::collections::BTreeSet;

use log::info;

use crate::feature::Quartiles;
use crate::map::{IntensityMap, MapShape, TraversalOrder};
use crate::partition::{Partition, PartitionStrategy, WindowGrid};
use crate::reduce::WindowedReducer;

mod error;


pub use error::EncodingError;

/// Maps a cell value onto a character state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discretizer {
    /// `1` for any nonzero value
    Binary,
    /// Values that already are small ordinal classes
    Classes,
    /// `0` for zero, else the quartile class `1..=4`
    Quartile(Quartiles),
}

impl Discretizer {
    /// Character state of one value
    pub fn discretize_number(&self, value: f64) -> Result<u8, EncodingError> {
        if !value.is_finite() || value < 0.0 {
            return Err(EncodingError::InvalidValue(value));
        }
        match self {
            Discretizer::Binary => Ok(u8::from(value != 0.0)),
            Discretizer::Classes => {
                if value.fract() != 0.0 || value > 9.0 {
                    return Err(EncodingError::NotAClass(value));
                }
                Ok(value as u8)
            }
            Discretizer::Quartile(q) => Ok(if value == 0.0 { 0 } else { q.class_of(value) }),
        }
    }

    /// Character states of a sequence of values
    pub fn discretize(&self, values: &[f64]) -> Result<Vec<u8>, EncodingError> {
        values.iter().map(|&v| self.discretize_number(v)).collect()
    }
}

/// Taxon × character matrix, taxa sorted by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMatrix {
    taxa: Vec<String>,
    rows: Vec<Vec<u8>>,
}

impl CharacterMatrix {
    /// Build a matrix; every row must have the same length
    pub fn new(rows: Vec<(String, Vec<u8>)>) -> Result<Self, EncodingError> {
        let mut rows = rows;
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(EncodingError::DuplicateTaxon(pair[0].0.clone()));
        }
        if let Some((_, first)) = rows.first() {
            let expected = first.len();
            if let Some((taxon, row)) = rows.iter().find(|(_, r)| r.len() != expected) {
                return Err(EncodingError::RaggedRows {
                    taxon: taxon.clone(),
                    expected,
                    found: row.len(),
                });
            }
        }

        let (taxa, rows) = rows.into_iter().unzip();
        Ok(Self { taxa, rows })
    }

    /// Number of taxa
    pub fn ntax(&self) -> usize {
        self.taxa.len()
    }

    /// Number of characters per taxon
    pub fn nchar(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// True for a matrix without taxa
    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Taxon names in matrix order
    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    /// States of taxon `i`
    pub fn row(&self, i: usize) -> Option<&[u8]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    /// States of taxon `i` as a digit string
    pub fn row_string(&self, i: usize) -> Option<String> {
        self.row(i)
            .map(|r| r.iter().map(|&s| char::from(b'0' + s.min(9))).collect())
    }

    /// Distinct states used anywhere in the matrix, ascending
    pub fn symbols(&self) -> Vec<u8> {
        let used: BTreeSet<u8> = self.rows.iter().flatten().copied().collect();
        used.into_iter().collect()
    }

    /// Matrix without the columns whose state is equal across every taxon
    pub fn strip_constant_columns(&self) -> Self {
        let Some(first) = self.rows.first() else {
            return self.clone();
        };
        let keep: Vec<usize> = (0..first.len())
            .filter(|&c| self.rows.iter().any(|r| r[c] != first[c]))
            .collect();

        info!(
            "Stripped {} constant columns, {} remain",
            first.len() - keep.len(),
            keep.len()
        );
        Self {
            taxa: self.taxa.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| keep.iter().map(|&c| r[c]).collect())
                .collect(),
        }
    }
}

/// Component-wise maximum shape of a set of maps
pub fn common_shape(maps: &[IntensityMap]) -> MapShape {
    maps.iter()
        .map(IntensityMap::shape)
        .fold(MapShape::new(0, 0), MapShape::max)
}

/// Partition, reduce, flatten and discretize every map.
///
/// Each region gets `max_cells / region_count` of the reducer's cell budget.
pub fn encode_maps(
    maps: &[IntensityMap],
    strategy: PartitionStrategy,
    reducer: &WindowedReducer,
    order: TraversalOrder,
    discretizer: &Discretizer,
) -> Result<CharacterMatrix, EncodingError> {
    if maps.is_empty() {
        return CharacterMatrix::new(Vec::new());
    }
    let shape = common_shape(maps);
    let partition = Partition::generate(shape, strategy)?;
    let budget = reducer
        .config()
        .max_cells
        .map(|max| max / partition.len());
    let region_reducer = reducer.with_max_cells(budget);

    let mut rows = Vec::with_capacity(maps.len());
    for map in maps {
        let padded = map.padded(shape)?;
        let mut states = Vec::new();
        for region in &partition {
            let reduced = region_reducer.reduce(&padded.region(region)?)?;
            states.extend(discretizer.discretize(&reduced.flatten(order))?);
        }
        rows.push((map.name().to_string(), states));
    }

    let matrix = CharacterMatrix::new(rows)?;
    info!(
        "Encoded {} taxa x {} characters over {} regions",
        matrix.ntax(),
        matrix.nchar(),
        partition.len()
    );
    Ok(matrix)
}

/// Discretized equal-window sums of every map, padded to the common grid
pub fn encode_window_sums(
    maps: &[IntensityMap],
    grid: &WindowGrid,
    discretizer: &Discretizer,
) -> Result<CharacterMatrix, EncodingError> {
    let shape = common_shape(maps);
    let mut rows = Vec::with_capacity(maps.len());
    for map in maps {
        let sums = grid.window_sums(&map.padded(shape)?)?;
        rows.push((map.name().to_string(), discretizer.discretize(&sums)?));
    }
    CharacterMatrix::new(rows)
}
