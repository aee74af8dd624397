//! CSV feature tables.
//!
//! Columns are located by header name (case-insensitive): `m/z` and
//! `Retention Time (min)` are required, the leading `#` index column is
//! ignored. A fourth column, if present, holds the intensity; without one every
//! feature weighs `1.0`. Empty cells read as `0`.
//!
//! A table has no run header, so bounds are the observed extremes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::{sample_name, Feature, FeatureError, FeatureList, RunBounds, SourceFormat};
use crate::quantize::Decimal;

const MZ_COLUMN: &str = "m/z";
const RT_COLUMN: &str = "retention time (min)";
const INTENSITY_POSITION: usize = 3;

/// Read a CSV feature table; the sample name is the file stem
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<FeatureList, FeatureError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    from_reader(BufReader::new(file), &sample_name(path))
}

/// Parse a CSV feature table from any reader
pub fn from_reader<R: Read>(reader: R, name: &str) -> Result<FeatureList, FeatureError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let column = |wanted: &str| {
        headers
            .iter()
            .position(|h| h == wanted)
            .ok_or_else(|| FeatureError::MissingAttribute(format!("column {wanted:?}")))
    };
    let mz_idx = column(MZ_COLUMN)?;
    let rt_idx = column(RT_COLUMN)?;
    let intensity_idx = (headers.len() > INTENSITY_POSITION).then_some(INTENSITY_POSITION);

    let mut features = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let cell = |idx: usize| match record.get(idx) {
            Some(v) if !v.is_empty() => v,
            _ => "0",
        };

        let mz: Decimal = cell(mz_idx)
            .parse()
            .map_err(|_| FeatureError::parse(MZ_COLUMN, cell(mz_idx)))?;
        let retention_time: Decimal = cell(rt_idx)
            .parse()
            .map_err(|_| FeatureError::parse(RT_COLUMN, cell(rt_idx)))?;
        let intensity = match intensity_idx {
            Some(idx) => parse_intensity(&headers[idx], cell(idx))?,
            None => 1.0,
        };

        features.push(Feature::new(retention_time, mz, intensity));
    }

    let bounds = RunBounds::enclosing(&features).unwrap_or_else(|| {
        RunBounds::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    });
    debug!("{}: read {} features from CSV", name, features.len());

    Ok(FeatureList {
        name: name.to_string(),
        bounds,
        features,
        declared_count: None,
        format: SourceFormat::Csv,
    })
}

fn parse_intensity(header: &str, text: &str) -> Result<f64, FeatureError> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(FeatureError::parse(header, text)),
    }
}
