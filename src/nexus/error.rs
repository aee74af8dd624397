/// Errors that can occur while writing NEXUS files
#[derive(Debug, thiserror::Error)]
pub enum NexusError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Nothing to write
    #[error("Character matrix has no taxa")]
    EmptyMatrix,
}
