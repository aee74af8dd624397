//! # NEXUS output
//!
//! Writes a [`CharacterMatrix`] as the DATA block of a NEXUS file:
//!
//! ```text
//! #NEXUS
//! [Written by mite 0.1.0 on 2024-01-01T00:00:00+00:00]
//!
//! BEGIN DATA;
//!     DIMENSIONS NTAX=2 NCHAR=4;
//!     FORMAT DATATYPE=STANDARD MISSING=? GAP=- SYMBOLS="01";
//!     MATRIX
//!     sample_a  0101
//!     sample_b  1100
//!     ;
//! END;
//! ```

use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use tempfile::NamedTempFile;

use crate::encode::CharacterMatrix;

mod error;


pub use error::NexusError;

/// Serializes character matrices as NEXUS DATA blocks
#[derive(Debug, Clone, Default)]
pub struct NexusWriter {
    timestamp: Option<DateTime<Utc>>,
}

impl NexusWriter {
    /// Writer stamping files with the current time
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed timestamp in the header comment
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Write `matrix` to `writer`
    pub fn write<W: Write>(&self, matrix: &CharacterMatrix, writer: W) -> Result<(), NexusError> {
        if matrix.is_empty() {
            return Err(NexusError::EmptyMatrix);
        }
        let mut out = BufWriter::new(writer);
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);

        writeln!(out, "#NEXUS")?;
        writeln!(
            out,
            "[Written by mite {} on {}]",
            env!("CARGO_PKG_VERSION"),
            timestamp.to_rfc3339()
        )?;
        writeln!(out)?;
        writeln!(out, "BEGIN DATA;")?;
        writeln!(
            out,
            "    DIMENSIONS NTAX={} NCHAR={};",
            matrix.ntax(),
            matrix.nchar()
        )?;
        let symbols: String = matrix
            .symbols()
            .iter()
            .map(|&s| char::from(b'0' + s.min(9)))
            .collect();
        writeln!(
            out,
            "    FORMAT DATATYPE=STANDARD MISSING=? GAP=- SYMBOLS=\"{symbols}\";"
        )?;
        writeln!(out, "    MATRIX")?;

        let labels: Vec<String> = matrix.taxa().iter().map(|t| quote_label(t)).collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0);
        for (i, label) in labels.iter().enumerate() {
            let states = matrix.row_string(i).unwrap_or_default();
            writeln!(out, "    {label:<width$}  {states}")?;
        }
        writeln!(out, "    ;")?;
        writeln!(out, "END;")?;
        out.flush()?;
        Ok(())
    }

    /// Write `matrix` to `path`, replacing it atomically
    pub fn write_file<P: AsRef<Path>>(&self, matrix: &CharacterMatrix, path: P) -> Result<(), NexusError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(dir)?;
        self.write(matrix, temp_file.as_file_mut())?;
        temp_file.persist(path).map_err(|e| NexusError::IoError(e.error))?;

        info!(
            "Wrote NEXUS matrix ({} taxa x {} characters) to {}",
            matrix.ntax(),
            matrix.nchar(),
            path.display()
        );
        Ok(())
    }
}

/// Single-quote labels that are not plain NEXUS words
fn quote_label(label: &str) -> String {
    let plain = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if plain {
        label.to_string()
    } else {
        format!("'{}'", label.replace('\'', "''"))
    }
}
