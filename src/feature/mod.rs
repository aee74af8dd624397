//! # Feature lists
//!
//! Readers for the per-sample feature lists that ion intensity maps are built
//! from, plus the corpus-wide intensity statistics used for quartile
//! discretization.
//!
//! ## Supported inputs
//!
//! - **APML XML** (`.xml`): SuperHirn-style `LC_MS_RUN` documents, see [`apml`]
//! - **CSV** (`.csv`): `#, m/z, Retention Time (min)` feature tables, see [`table`]
//!
//! Coordinates are kept as exact [`Decimal`] values so that their written
//! precision survives into the quantizer.

use std::path::Path;

use crate::quantize::{Decimal, QuantizeError};

pub mod apml;
mod error;
mod quartiles;
pub mod scan;
pub mod table;

#[cfg(test)]
mod tests;

pub use error::FeatureError;
pub use quartiles::Quartiles;

/// One detected ion
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Elution time as written in the source
    pub retention_time: Decimal,
    /// Mass-to-charge ratio as written in the source
    pub mz: Decimal,
    /// Integrated intensity (`AREA`)
    pub intensity: f64,
}

impl Feature {
    /// Create a feature from parsed coordinates
    pub fn new(retention_time: Decimal, mz: Decimal, intensity: f64) -> Self {
        Self {
            retention_time,
            mz,
            intensity,
        }
    }

    /// Create a feature from coordinate text
    pub fn parse(retention_time: &str, mz: &str, intensity: f64) -> Result<Self, QuantizeError> {
        Ok(Self::new(retention_time.parse()?, mz.parse()?, intensity))
    }
}

/// Declared value ranges of one LC-MS run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBounds {
    /// Lowest retention time
    pub tr_min: Decimal,
    /// Highest retention time
    pub tr_max: Decimal,
    /// Lowest m/z
    pub mz_min: Decimal,
    /// Highest m/z
    pub mz_max: Decimal,
}

impl RunBounds {
    /// Create bounds from explicit values
    pub fn new(tr_min: Decimal, tr_max: Decimal, mz_min: Decimal, mz_max: Decimal) -> Self {
        Self {
            tr_min,
            tr_max,
            mz_min,
            mz_max,
        }
    }

    /// Tightest bounds containing every feature, `None` for an empty slice
    pub fn enclosing(features: &[Feature]) -> Option<Self> {
        let first = features.first()?;
        let mut bounds = Self::new(
            first.retention_time,
            first.retention_time,
            first.mz,
            first.mz,
        );
        for f in &features[1..] {
            bounds.tr_min = bounds.tr_min.min(f.retention_time);
            bounds.tr_max = bounds.tr_max.max(f.retention_time);
            bounds.mz_min = bounds.mz_min.min(f.mz);
            bounds.mz_max = bounds.mz_max.max(f.mz);
        }
        Some(bounds)
    }
}

/// Source format of a feature list, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// APML XML document
    Apml,
    /// CSV feature table
    Csv,
}

impl SourceFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, FeatureError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => Ok(SourceFormat::Apml),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(SourceFormat::Csv),
            _ => Err(FeatureError::Format(format!(
                "{} is not an XML or CSV feature list",
                path.display()
            ))),
        }
    }
}

/// All features of one sample plus its run bounds
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureList {
    /// Sample name (file stem)
    pub name: String,
    /// Declared or derived value ranges
    pub bounds: RunBounds,
    /// Features in document order
    pub features: Vec<Feature>,
    /// `number_of_features` from the header, when the format declares one
    pub declared_count: Option<usize>,
    /// Where the list came from
    pub format: SourceFormat,
}

impl FeatureList {
    /// Read a feature list, choosing the parser from the file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        match SourceFormat::from_path(path)? {
            SourceFormat::Apml => apml::read_apml(path),
            SourceFormat::Csv => table::read_csv(path),
        }
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the list holds no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Intensities in document order
    pub fn intensities(&self) -> impl Iterator<Item = f64> + '_ {
        self.features.iter().map(|f| f.intensity)
    }

    /// Quartiles of this sample's own intensities
    pub fn local_quartiles(&self) -> Result<Quartiles, FeatureError> {
        let values: Vec<f64> = self.intensities().collect();
        Quartiles::from_values(&values).map_err(|e| match e {
            FeatureError::EmptyCorpus(_) => FeatureError::EmptyCorpus(self.name.clone()),
            other => other,
        })
    }
}

/// Sample name derived from a path (file stem)
pub(crate) fn sample_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
