use crate::partition::PartitionError;

use super::ScoreError;

/// Errors that can occur during a partition sweep
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// Sweep parameters produced an invalid partition
    #[error("Partition error: {0}")]
    Partition(#[from] PartitionError),

    /// The scorer failed
    #[error("Scoring failed at step {step}: {source}")]
    Scorer {
        /// Step that failed (1-based)
        step: usize,
        /// Scorer error
        source: ScoreError,
    },
}
