use super::Axis;

/// Errors that can occur while parsing decimals or binning coordinates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantizeError {
    /// Text is not a finite decimal literal
    #[error("Invalid decimal literal: {0:?}")]
    InvalidDecimal(String),

    /// Decimal has too many significant digits or too large an exponent
    #[error("Decimal literal out of supported range: {0:?}")]
    Overflow(String),

    /// Declared maximum is below the declared minimum
    #[error("Negative extent on {axis} axis: max {max} < min {min}")]
    NegativeExtent {
        /// Axis with the inverted bounds
        axis: Axis,
        /// Declared minimum
        min: String,
        /// Declared maximum
        max: String,
    },

    /// Coordinate falls outside the declared run bounds
    #[error("{axis} value {value} outside run bounds [{min}, {max}]")]
    OutOfBounds {
        /// Axis of the offending coordinate
        axis: Axis,
        /// The coordinate as read
        value: String,
        /// Declared minimum
        min: String,
        /// Declared maximum
        max: String,
    },
}
