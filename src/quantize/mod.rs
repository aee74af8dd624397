//! # Grid quantization
//!
//! Maps decimal `(retention time, m/z)` coordinates onto the integer grid of an
//! ion intensity map.
//!
//! For every axis the bin of a value `v` is `floor((v - min) * 10^p)`, where
//! `min` is the run's declared lower bound and `p` is the largest number of
//! fractional digits written for that axis anywhere in the sample. Two samples
//! may therefore use different grid resolutions.
//!
//! The arithmetic is exact: coordinates are kept as [`Decimal`] values parsed
//! from the source text, never recovered from `f64`.
//!
//! The axis extent is `bin(max) + 1` cells, so a coordinate equal to the
//! declared maximum still lands inside the map.

use std::fmt;

use crate::feature::{Feature, RunBounds};
use crate::map::MapShape;

mod decimal;
mod error;


pub use decimal::{Decimal, MAX_SCALE};
pub use error::QuantizeError;

use decimal::pow10;

/// Map axis a coordinate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Chromatographic elution time (map rows)
    RetentionTime,
    /// Mass-to-charge ratio (map columns)
    Mz,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::RetentionTime => write!(f, "retention time"),
            Axis::Mz => write!(f, "m/z"),
        }
    }
}

/// One quantized axis: declared bounds plus the resolution in decimal digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisGrid {
    axis: Axis,
    min: Decimal,
    max: Decimal,
    precision: u32,
    len: usize,
}

impl AxisGrid {
    /// Create a grid covering `[min, max]` at `precision` fractional digits
    pub fn new(axis: Axis, min: Decimal, max: Decimal, precision: u32) -> Result<Self, QuantizeError> {
        if max < min {
            return Err(QuantizeError::NegativeExtent {
                axis,
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        let last = floor_bin(&max, &min, precision)
            .ok_or_else(|| QuantizeError::Overflow(max.to_string()))?;
        let len = usize::try_from(last)
            .ok()
            .and_then(|l| l.checked_add(1))
            .ok_or_else(|| QuantizeError::Overflow(max.to_string()))?;

        Ok(Self {
            axis,
            min,
            max,
            precision,
            len,
        })
    }

    /// Bin index of `value`; values outside `[min, max]` are rejected
    pub fn bin(&self, value: &Decimal) -> Result<usize, QuantizeError> {
        if *value < self.min || *value > self.max {
            return Err(self.out_of_bounds(value));
        }
        let bin = floor_bin(value, &self.min, self.precision)
            .ok_or_else(|| QuantizeError::Overflow(value.to_string()))?;
        usize::try_from(bin)
            .ok()
            .filter(|b| *b < self.len)
            .ok_or_else(|| self.out_of_bounds(value))
    }

    /// Number of cells along this axis
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a grid covers at least the minimum bound
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decimal digits of resolution
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Declared lower bound
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Declared upper bound
    pub fn max(&self) -> Decimal {
        self.max
    }

    /// Axis this grid quantizes
    pub fn axis(&self) -> Axis {
        self.axis
    }

    fn out_of_bounds(&self, value: &Decimal) -> QuantizeError {
        QuantizeError::OutOfBounds {
            axis: self.axis,
            value: value.to_string(),
            min: self.min.to_string(),
            max: self.max.to_string(),
        }
    }
}

/// `floor((value - min) * 10^precision)` computed exactly
fn floor_bin(value: &Decimal, min: &Decimal, precision: u32) -> Option<i128> {
    let scale = precision.max(value.precision()).max(min.precision());
    let diff = value
        .rescaled(scale)?
        .mantissa()
        .checked_sub(min.rescaled(scale)?.mantissa())?;
    Some(diff.div_euclid(pow10(scale - precision)?))
}

/// Quantizer for one sample: retention time on rows, m/z on columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridQuantizer {
    rt: AxisGrid,
    mz: AxisGrid,
}

impl GridQuantizer {
    /// Build a quantizer with explicit per-axis precision
    pub fn new(bounds: &RunBounds, rt_precision: u32, mz_precision: u32) -> Result<Self, QuantizeError> {
        Ok(Self {
            rt: AxisGrid::new(Axis::RetentionTime, bounds.tr_min, bounds.tr_max, rt_precision)?,
            mz: AxisGrid::new(Axis::Mz, bounds.mz_min, bounds.mz_max, mz_precision)?,
        })
    }

    /// Build a quantizer whose precision is the largest observed in `features`
    pub fn for_features(bounds: &RunBounds, features: &[Feature]) -> Result<Self, QuantizeError> {
        let rt_precision = features
            .iter()
            .map(|f| f.retention_time.precision())
            .max()
            .unwrap_or(0);
        let mz_precision = features
            .iter()
            .map(|f| f.mz.precision())
            .max()
            .unwrap_or(0);
        Self::new(bounds, rt_precision, mz_precision)
    }

    /// `(row, col)` cell of a feature
    pub fn quantize(&self, feature: &Feature) -> Result<(usize, usize), QuantizeError> {
        Ok((self.rt.bin(&feature.retention_time)?, self.mz.bin(&feature.mz)?))
    }

    /// Shape of the map this quantizer fills
    pub fn shape(&self) -> MapShape {
        MapShape::new(self.rt.len(), self.mz.len())
    }

    /// Row axis
    pub fn retention_time_axis(&self) -> &AxisGrid {
        &self.rt
    }

    /// Column axis
    pub fn mz_axis(&self) -> &AxisGrid {
        &self.mz
    }
}
