/// Errors that can occur while writing comparison results
#[derive(Debug, thiserror::Error)]
pub enum AlgebraError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
