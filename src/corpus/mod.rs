//! # Corpus
//!
//! All samples of one analysis, loaded once. The corpus-wide quartiles are
//! computed from the already-loaded feature lists on first use and cached, so
//! building every sample's map does not rescan the directory.
//!
//! With the `parallel` feature, samples are read and maps are built on the
//! rayon thread pool. Output order is always by sample name.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::feature::{scan, FeatureError, FeatureList, Quartiles};
use crate::map::{CellMode, IntensityMap, QuartileReference};

mod error;

#[cfg(test)]
mod tests;

pub use error::CorpusError;

/// Where quartile cut points come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuartileScope {
    /// Each sample's own intensities
    Local,
    /// Intensities of the whole corpus
    #[default]
    Global,
}

/// Cell mode chosen for a whole corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    /// Presence maps
    Binary,
    /// Quartile classes
    Quartile(QuartileScope),
    /// Raw intensities
    Intensity,
}

/// Feature lists of every sample, sorted by name
#[derive(Debug, Default)]
pub struct Corpus {
    samples: Vec<FeatureList>,
    global_quartiles: OnceLock<Quartiles>,
}

impl Corpus {
    /// Wrap already-loaded feature lists
    pub fn from_lists(mut samples: Vec<FeatureList>) -> Self {
        samples.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            samples,
            global_quartiles: OnceLock::new(),
        }
    }

    /// Load every non-hidden file of `dir` as a feature list.
    ///
    /// Stops at the first sibling that is not a readable `.xml` or `.csv`
    /// feature list.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, CorpusError> {
        let dir = dir.as_ref();
        let files = scan::sample_files(dir)?;
        debug!("Found {} sample files in {}", files.len(), dir.display());
        if files.is_empty() {
            return Err(CorpusError::Empty(dir.to_path_buf()));
        }

        let read = |p: &std::path::PathBuf| {
            FeatureList::from_path(p).map_err(|e| FeatureError::in_file(p, e))
        };
        #[cfg(feature = "parallel")]
        let samples: Result<Vec<FeatureList>, FeatureError> = files.par_iter().map(read).collect();
        #[cfg(not(feature = "parallel"))]
        let samples: Result<Vec<FeatureList>, FeatureError> = files.iter().map(read).collect();

        let corpus = Self::from_lists(samples?);
        info!(
            "Loaded {} samples ({} features) from {}",
            corpus.len(),
            corpus.feature_count(),
            dir.display()
        );
        Ok(corpus)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a corpus without samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in name order
    pub fn samples(&self) -> &[FeatureList] {
        &self.samples
    }

    /// Sample names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.name.as_str())
    }

    /// Total number of features across samples
    pub fn feature_count(&self) -> usize {
        self.samples.iter().map(FeatureList::len).sum()
    }

    /// Quartiles over every intensity of the corpus, computed once
    pub fn global_quartiles(&self) -> Result<Quartiles, CorpusError> {
        if let Some(q) = self.global_quartiles.get() {
            return Ok(*q);
        }
        let values: Vec<f64> = self.samples.iter().flat_map(|s| s.intensities()).collect();
        let q = Quartiles::from_values(&values)
            .map_err(|_| FeatureError::EmptyCorpus(format!("corpus of {} samples", self.len())))?;
        info!("Global intensity quartiles: {}", q);
        Ok(*self.global_quartiles.get_or_init(|| q))
    }

    /// Cell mode for a corpus-wide map mode
    pub fn cell_mode(&self, mode: MapMode) -> Result<CellMode, CorpusError> {
        Ok(match mode {
            MapMode::Binary => CellMode::Binary,
            MapMode::Intensity => CellMode::Intensity,
            MapMode::Quartile(QuartileScope::Local) => {
                CellMode::Quartile(QuartileReference::SampleLocal)
            }
            MapMode::Quartile(QuartileScope::Global) => {
                CellMode::Quartile(QuartileReference::Global(self.global_quartiles()?))
            }
        })
    }

    /// One map per sample, in name order
    pub fn build_maps(&self, mode: MapMode) -> Result<Vec<IntensityMap>, CorpusError> {
        let cell_mode = self.cell_mode(mode)?;
        let build = |list: &FeatureList| {
            IntensityMap::from_feature_list(list, cell_mode).map_err(|source| CorpusError::Map {
                sample: list.name.clone(),
                source,
            })
        };

        #[cfg(feature = "parallel")]
        let maps = self.samples.par_iter().map(build).collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let maps = self.samples.iter().map(build).collect::<Result<Vec<_>, _>>()?;

        info!("Built {} maps ({})", maps.len(), mode);
        Ok(maps)
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapMode::Binary => write!(f, "binary"),
            MapMode::Quartile(QuartileScope::Local) => write!(f, "local quartiles"),
            MapMode::Quartile(QuartileScope::Global) => write!(f, "global quartiles"),
            MapMode::Intensity => write!(f, "intensity"),
        }
    }
}
