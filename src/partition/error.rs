/// Errors that can occur while partitioning a grid
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    /// Part counts, sizes or window sides do not fit the grid
    #[error("Invalid partition: {0}")]
    InvalidPartition(String),
}
