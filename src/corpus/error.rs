use std::path::PathBuf;

use crate::feature::FeatureError;
use crate::map::MapError;

/// Errors that can occur while loading a corpus or building its maps
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// A sample could not be read
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    /// A sample map could not be built
    #[error("Map error in sample {sample}: {source}")]
    Map {
        /// Sample name
        sample: String,
        /// Underlying error
        #[source]
        source: MapError,
    },

    /// Directory holds no non-hidden files
    #[error("No sample files in {}", .0.display())]
    Empty(PathBuf),
}
