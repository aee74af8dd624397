use crate::map::MapError;
use crate::partition::PartitionError;
use crate::reduce::ReductionError;

/// Errors that can occur while encoding maps into character matrices
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// A taxon's character row differs in length from the others
    #[error("Taxon {taxon} has {found} characters, expected {expected}")]
    RaggedRows {
        /// Offending taxon
        taxon: String,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        found: usize,
    },

    /// Two rows carry the same taxon name
    #[error("Duplicate taxon {0}")]
    DuplicateTaxon(String),

    /// Value cannot be discretized (negative or not finite)
    #[error("Cannot discretize value {0}")]
    InvalidValue(f64),

    /// Value is not an ordinal class `0..=9`
    #[error("Value {0} is not a character state 0-9")]
    NotAClass(f64),

    /// Partition of the common grid failed
    #[error("Partition error: {0}")]
    Partition(#[from] PartitionError),

    /// Reduction of a region failed
    #[error("Reduction error: {0}")]
    Reduction(#[from] ReductionError),

    /// Padding or slicing failed
    #[error("Map error: {0}")]
    Map(#[from] MapError),
}
