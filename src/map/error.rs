use super::MapShape;
use crate::feature::FeatureError;
use crate::quantize::QuantizeError;

/// Errors that can occur while building or transforming intensity maps
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Operation needs a different shape than the map has
    #[error("Shape error: {0}")]
    Shape(String),

    /// Cell coordinate lies outside the map
    #[error("Cell ({row}, {col}) outside map of shape {shape}")]
    OutOfBounds {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Shape of the map
        shape: MapShape,
    },

    /// Cell values must be finite and non-negative
    #[error("Invalid cell value {value} at ({row}, {col})")]
    InvalidValue {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Offending value
        value: f64,
    },

    /// Coordinate could not be placed on the grid
    #[error("Quantization error: {0}")]
    Quantize(#[from] QuantizeError),

    /// Feature statistics could not be computed
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),
}
