//! # Set algebra over maps
//!
//! Element-wise operations between maps of possibly different shapes. Both
//! operands are first padded to the component-wise maximum shape, so no
//! occupied cell is ever truncated away.
//!
//! The symmetric difference is the sum of two independently computed one-sided
//! differences `max(a - b, 0) + max(b - a, 0)`, i.e. `|a - b|` per cell. For
//! presence maps this is XOR.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::map::{Cell, IntensityMap, MapKind};

mod error;


pub use error::AlgebraError;

/// Pad both maps to their common shape
pub fn reconcile(a: &IntensityMap, b: &IntensityMap) -> (IntensityMap, IntensityMap) {
    let shape = a.shape().max(b.shape());
    // padding to a covering shape cannot fail
    let pad = |m: &IntensityMap| m.padded(shape).unwrap_or_else(|_| m.clone());
    (pad(a), pad(b))
}

/// Element-wise product; only cells occupied in both maps survive
pub fn intersection(a: &IntensityMap, b: &IntensityMap) -> IntensityMap {
    combine(a, b, format!("{}&{}", a.name(), b.name()), |x, y| x * y)
}

/// One-sided difference `max(a - b, 0)`
pub fn difference(a: &IntensityMap, b: &IntensityMap) -> IntensityMap {
    combine(a, b, format!("{}-{}", a.name(), b.name()), |x, y| (x - y).max(0.0))
}

/// `difference(a, b) + difference(b, a)`
pub fn symmetric_difference(a: &IntensityMap, b: &IntensityMap) -> IntensityMap {
    let forward = difference(a, b);
    let backward = difference(b, a);
    combine(
        &forward,
        &backward,
        format!("{}^{}", a.name(), b.name()),
        |x, y| x + y,
    )
}

/// Number of cells where the two maps disagree
pub fn distance(a: &IntensityMap, b: &IntensityMap) -> usize {
    symmetric_difference(a, b).nonzero_count()
}

/// Cells shared by every map (the core of a corpus), `None` for no maps
pub fn intersection_all(maps: &[IntensityMap]) -> Option<IntensityMap> {
    let (first, rest) = maps.split_first()?;
    let core = rest
        .iter()
        .fold(first.clone(), |acc, m| intersection(&acc, m))
        .with_name("core");
    info!(
        "Core of {} maps has {} occupied cells",
        maps.len(),
        core.nonzero_count()
    );
    Some(core)
}

fn result_kind(a: &IntensityMap, b: &IntensityMap) -> MapKind {
    match (a.kind(), b.kind()) {
        (MapKind::Binary, MapKind::Binary) => MapKind::Binary,
        (MapKind::Intensity, _) | (_, MapKind::Intensity) => MapKind::Intensity,
        _ => MapKind::Classes,
    }
}

/// Merge-join of two sorted cell lists over their padded common shape
fn combine(
    a: &IntensityMap,
    b: &IntensityMap,
    name: String,
    op: impl Fn(f64, f64) -> f64,
) -> IntensityMap {
    let shape = a.shape().max(b.shape());
    let (xs, ys) = (a.cells(), b.cells());
    let mut out = Vec::with_capacity(xs.len().max(ys.len()));
    let (mut i, mut j) = (0, 0);

    let mut emit = |row: usize, col: usize, value: f64| {
        if value != 0.0 {
            out.push(Cell { row, col, value });
        }
    };

    while i < xs.len() || j < ys.len() {
        let key_a = xs.get(i).map(|c| (c.row, c.col));
        let key_b = ys.get(j).map(|c| (c.row, c.col));
        match (key_a, key_b) {
            (Some(ka), Some(kb)) if ka == kb => {
                emit(ka.0, ka.1, op(xs[i].value, ys[j].value));
                i += 1;
                j += 1;
            }
            (Some(ka), Some(kb)) if ka < kb => {
                emit(ka.0, ka.1, op(xs[i].value, 0.0));
                i += 1;
            }
            (Some(ka), None) => {
                emit(ka.0, ka.1, op(xs[i].value, 0.0));
                i += 1;
            }
            (_, Some(kb)) => {
                emit(kb.0, kb.1, op(0.0, ys[j].value));
                j += 1;
            }
            (None, None) => break,
        }
    }

    IntensityMap::from_sorted_cells(name, shape, result_kind(a, b), out)
}

/// Symmetric all-pairs distance matrix with a zero diagonal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    labels: Vec<String>,
    values: Vec<usize>,
    comparisons: usize,
}

impl DistanceMatrix {
    /// Distances between every pair of maps, labelled by map name.
    ///
    /// Only the upper triangle is computed; the lower one is mirrored.
    pub fn compute(maps: &[IntensityMap]) -> Self {
        let n = maps.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();

        #[cfg(feature = "parallel")]
        let distances: Vec<usize> = pairs
            .par_iter()
            .map(|&(i, j)| distance(&maps[i], &maps[j]))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let distances: Vec<usize> = pairs
            .iter()
            .map(|&(i, j)| distance(&maps[i], &maps[j]))
            .collect();

        let mut values = vec![0; n * n];
        for (&(i, j), &d) in pairs.iter().zip(&distances) {
            values[i * n + j] = d;
            values[j * n + i] = d;
        }

        info!("Computed {} pairwise distances for {} maps", pairs.len(), n);
        Self {
            labels: maps.iter().map(|m| m.name().to_string()).collect(),
            values,
            comparisons: pairs.len(),
        }
    }

    /// Distance between maps `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        let n = self.len();
        (i < n && j < n).then(|| self.values[i * n + j])
    }

    /// Distances from map `i` to every map
    pub fn row(&self, i: usize) -> Option<&[usize]> {
        let n = self.len();
        (i < n).then(|| &self.values[i * n..(i + 1) * n])
    }

    /// Number of maps
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True for a matrix over no maps
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Map names in matrix order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of pairwise distances that were computed
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// True when the matrix is symmetric with a zero diagonal
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            self.values[i * n + i] == 0
                && (i + 1..n).all(|j| self.values[i * n + j] == self.values[j * n + i])
        })
    }

    /// Write as CSV: header `sample,<names...>`, then one row per map
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AlgebraError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(
            std::iter::once("sample").chain(self.labels.iter().map(String::as_str)),
        )?;
        for (label, row) in self.labels.iter().zip(self.values.chunks(self.len().max(1))) {
            let mut record = vec![label.clone()];
            record.extend(row.iter().map(|d| d.to_string()));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write as CSV to a file
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), AlgebraError> {
        let file = File::create(path)?;
        self.write_csv(file)
    }
}
