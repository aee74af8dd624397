//! # mite - Ion Intensity Maps for Phyloproteomics
//!
//! `mite` turns LC-MS feature lists into sparse two-dimensional ion intensity
//! maps (MITEs), reduces them to a cell budget with windowed aggregation,
//! compares them with set algebra and encodes them as discrete character
//! matrices for phylogenetic inference.
//!
//! ## Pipeline
//!
//! ```text
//! APML / CSV ──► FeatureList ──► GridQuantizer ──► IntensityMap
//!                                                     │
//!                       ┌─────────────────────────────┤
//!                       ▼                             ▼
//!            WindowedReducer + Partition        set algebra
//!                       │                             │
//!                       ▼                             ▼
//!              CharacterMatrix ──► NEXUS      DistanceMatrix ──► CSV
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mite::prelude::*;
//!
//! let corpus = Corpus::load("samples/")?;
//! let maps = corpus.build_maps(MapMode::Binary)?;
//!
//! let reducer = WindowedReducer::new(
//!     ReductionConfig::new(Window::new(2, 2), ReductionRule::threshold(0.5))
//!         .with_max_cells(Some(DEFAULT_MAX_CELLS)),
//! )?;
//! let matrix = encode_maps(
//!     &maps,
//!     PartitionStrategy::Whole,
//!     &reducer,
//!     TraversalOrder::RowMajor,
//!     &Discretizer::Binary,
//! )?;
//! NexusWriter::new().write_file(&matrix.strip_constant_columns(), "out.nex")?;
//! # Ok::<(), mite::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`feature`]: APML and CSV feature list readers, intensity quartiles
//! - [`quantize`]: exact decimal binning of retention time and m/z
//! - [`map`]: sparse intensity maps and their builder
//! - [`reduce`]: windowed multiresolution reduction
//! - [`algebra`]: intersection, difference and distance between maps
//! - [`partition`]: region partitions and equal-window grids
//! - [`encode`]: discretization into character matrices
//! - [`nexus`]: NEXUS output
//! - [`corpus`]: loading a directory of samples
//! - [`sweep`]: scoring a range of partitions
//!
//! Rows are always retention time and columns always m/z.

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod algebra;
pub mod corpus;
pub mod encode;
pub mod error;
pub mod feature;
pub mod map;
pub mod nexus;
pub mod partition;
pub mod quantize;
pub mod reduce;
pub mod sweep;

pub use error::{Error, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::algebra::{
        difference, distance, intersection, intersection_all, reconcile, symmetric_difference,
        DistanceMatrix,
    };
    pub use crate::corpus::{Corpus, MapMode, QuartileScope};
    pub use crate::encode::{
        common_shape, encode_maps, encode_window_sums, CharacterMatrix, Discretizer,
    };
    pub use crate::feature::{Feature, FeatureList, Quartiles, RunBounds, SourceFormat};
    pub use crate::map::{
        Cell, CellMode, IntensityMap, MapBuilder, MapKind, MapShape, QuartileReference,
        TraversalOrder,
    };
    pub use crate::nexus::NexusWriter;
    pub use crate::partition::{Partition, PartitionStrategy, Region, WindowGrid};
    pub use crate::quantize::{Decimal, GridQuantizer};
    pub use crate::reduce::{
        ReductionConfig, ReductionRule, ThresholdNormalization, Window, WindowedReducer,
        DEFAULT_MAX_CELLS,
    };
    pub use crate::sweep::{PartitionSweep, Scorer, SweepKind, SweepOutcome};
    pub use crate::Error;
}
