use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{scan, FeatureError};

/// 25th, 50th and 75th percentile of a set of intensities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    /// First quartile
    pub q1: f64,
    /// Median
    pub q2: f64,
    /// Third quartile
    pub q3: f64,
}

impl Quartiles {
    /// Create quartiles from explicit cut points
    pub fn new(q1: f64, q2: f64, q3: f64) -> Self {
        Self { q1, q2, q3 }
    }

    /// Quartiles with linear interpolation between closest ranks.
    ///
    /// For sorted values `v` the `p`-quantile sits at position `p * (n - 1)`.
    pub fn from_values(values: &[f64]) -> Result<Self, FeatureError> {
        if values.is_empty() {
            return Err(FeatureError::EmptyCorpus("value list".to_string()));
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Ok(Self {
            q1: quantile(&sorted, 0.25),
            q2: quantile(&sorted, 0.50),
            q3: quantile(&sorted, 0.75),
        })
    }

    /// Quartiles over the intensities of every feature list in `dir`
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self, FeatureError> {
        let dir = dir.as_ref();
        let values = scan::directory_intensities(dir)?;
        Self::from_values(&values).map_err(|e| match e {
            FeatureError::EmptyCorpus(_) => FeatureError::EmptyCorpus(dir.display().to_string()),
            other => other,
        })
    }

    /// Quartile class of an intensity: 1 below `q1`, 2 below `q2`,
    /// 3 below `q3`, 4 otherwise
    pub fn class_of(&self, intensity: f64) -> u8 {
        if intensity < self.q1 {
            1
        } else if intensity < self.q2 {
            2
        } else if intensity < self.q3 {
            3
        } else {
            4
        }
    }
}

impl fmt::Display for Quartiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q1={} q2={} q3={}", self.q1, self.q2, self.q3)
    }
}

fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
