//! Crate-level error type

use crate::algebra::AlgebraError;
use crate::corpus::CorpusError;
use crate::encode::EncodingError;
use crate::feature::FeatureError;
use crate::map::MapError;
use crate::nexus::NexusError;
use crate::partition::PartitionError;
use crate::quantize::QuantizeError;
use crate::reduce::ReductionError;
use crate::sweep::SweepError;

/// Any error raised by the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or parsing a feature list failed
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// Quantizing a coordinate failed
    #[error(transparent)]
    Quantize(#[from] QuantizeError),

    /// A map operation failed
    #[error(transparent)]
    Map(#[from] MapError),

    /// Reduction parameters were rejected
    #[error(transparent)]
    Reduction(#[from] ReductionError),

    /// Writing a distance matrix failed
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    /// Partition parameters were rejected
    #[error(transparent)]
    Partition(#[from] PartitionError),

    /// Building a character matrix failed
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Writing a NEXUS file failed
    #[error(transparent)]
    Nexus(#[from] NexusError),

    /// Loading a corpus failed
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// A partition sweep failed
    #[error(transparent)]
    Sweep(#[from] SweepError),
}

/// Result alias using the crate-level [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
