use std::path::PathBuf;

/// Errors that can occur while reading feature lists
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// UTF-8 encoding error in attribute values
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// File extension or document structure is not a supported feature list
    #[error("Unsupported feature list format: {0}")]
    Format(String),

    /// Required attribute or column is missing
    #[error("Missing required attribute: {0}")]
    MissingAttribute(String),

    /// Attribute or cell is present but not a valid number
    #[error("Invalid numeric value for {field}: {value:?}")]
    Parse {
        /// Attribute or column name
        field: String,
        /// Text as found in the file
        value: String,
    },

    /// No intensities were available to compute quartiles from
    #[error("No intensities found in {0}")]
    EmptyCorpus(String),

    /// Error raised while reading one file of a directory scan
    #[error("{}: {source}", path.display())]
    InFile {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: Box<FeatureError>,
    },
}

impl FeatureError {
    pub(crate) fn parse(field: impl Into<String>, value: impl Into<String>) -> Self {
        FeatureError::Parse {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn in_file(path: impl Into<PathBuf>, source: FeatureError) -> Self {
        FeatureError::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
