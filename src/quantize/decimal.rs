use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::QuantizeError;

/// Largest number of fractional digits a coordinate may carry.
///
/// Keeps every rescale inside `i128` for coordinates up to ~10^8.
pub const MAX_SCALE: u32 = 24;

/// Exact fixed-point decimal read from its textual representation.
///
/// Feature coordinates are binned from this value rather than from `f64`:
/// `(12.34 - 10.0) * 100.0` is `233.99999999999997` in binary floating point,
/// which would truncate into the wrong cell. The scale is the number of digits
/// after the decimal point exactly as written (`"500.10"` has scale 2).
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// Zero with no fractional digits
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    /// Build a decimal equal to `mantissa * 10^-scale`
    pub fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// Parse a decimal literal such as `"12.34"`, `"-0.5"` or `"1.25e-3"`.
    ///
    /// Exponents shift the scale; a positive exponent that would make the
    /// scale negative yields an integer with scale 0.
    pub fn parse(text: &str) -> Result<Self, QuantizeError> {
        let invalid = || QuantizeError::InvalidDecimal(text.to_string());
        let overflow = || QuantizeError::Overflow(text.to_string());

        let s = text.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (number, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exp: i64 = body[pos + 1..].parse().map_err(|_| invalid())?;
                (&body[..pos], exp)
            }
            None => (body, 0),
        };

        let (int_part, frac_part) = match number.split_once('.') {
            Some((i, f)) => (i, f),
            None => (number, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or_else(overflow)?;
        }

        let scale = frac_part.len() as i64 - exponent;
        let (mantissa, scale) = if scale < 0 {
            let shift = u32::try_from(-scale).map_err(|_| overflow())?;
            let factor = pow10(shift).ok_or_else(overflow)?;
            (mantissa.checked_mul(factor).ok_or_else(overflow)?, 0)
        } else {
            let scale = u32::try_from(scale).map_err(|_| overflow())?;
            if scale > MAX_SCALE {
                return Err(overflow());
            }
            (mantissa, scale)
        };

        Ok(Self {
            mantissa: if negative { -mantissa } else { mantissa },
            scale,
        })
    }

    /// Digits after the decimal point as written
    pub fn precision(&self) -> u32 {
        self.scale
    }

    /// Unscaled integer value
    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// Nearest `f64`
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    /// Same value with `scale` fractional digits; `None` when narrowing or on overflow
    pub fn rescaled(&self, scale: u32) -> Option<Decimal> {
        if scale < self.scale {
            return None;
        }
        let factor = pow10(scale - self.scale)?;
        Some(Decimal {
            mantissa: self.mantissa.checked_mul(factor)?,
            scale,
        })
    }

    /// Smallest decimal with scale 0 that is `>=` self (used for CSV-derived bounds)
    pub fn ceil(&self) -> Decimal {
        let Some(div) = pow10(self.scale) else {
            return *self;
        };
        let q = self.mantissa.div_euclid(div);
        let r = self.mantissa.rem_euclid(div);
        Decimal::new(if r == 0 { q } else { q + 1 }, 0)
    }

    /// Largest decimal with scale 0 that is `<=` self
    pub fn floor(&self) -> Decimal {
        let Some(div) = pow10(self.scale) else {
            return *self;
        };
        Decimal::new(self.mantissa.div_euclid(div), 0)
    }
}

/// `10^n` in `i128`, `None` on overflow
pub(crate) fn pow10(n: u32) -> Option<i128> {
    10i128.checked_pow(n)
}

impl FromStr for Decimal {
    type Err = QuantizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescaled(scale), other.rescaled(scale)) {
            (Some(a), Some(b)) => a.mantissa.cmp(&b.mantissa),
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        if self.scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let scale = self.scale as usize;
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}
