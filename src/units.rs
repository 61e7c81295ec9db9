//! Conversion between byte, sample-frame and time positions.
//!
//! Buffer stamping and the position query both run through [`convert`], so
//! every figure the element reports downstream is derived from the same byte
//! counter with the same rounding.

use crate::error::{Result, SidDecError};
use crate::format::NegotiatedFormat;

/// Ticks per second of the time domain (nanoseconds).
pub const TIME_UNIT: i64 = 1_000_000_000;

/// Position domains understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Byte offset into the produced stream.
    Bytes,
    /// Interleaved sample-frame offset.
    Samples,
    /// Stream time in [`TIME_UNIT`] ticks.
    Time,
}

/// `value * num / denom` without intermediate truncation or overflow.
///
/// The multiply runs in 128 bits; results outside the `i64` range saturate.
fn scale(value: i64, num: i64, denom: i64) -> Result<i64> {
    if denom == 0 {
        return Err(SidDecError::DivisionByZero);
    }
    let wide = i128::from(value) * i128::from(num) / i128::from(denom);
    Ok(wide.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}

/// Convert `value` from one position domain to another.
///
/// Same-domain conversion is the identity. Fails with
/// [`SidDecError::DivisionByZero`] when the format's rate or channel count
/// leaves a zero denominator; a successfully negotiated format never does.
pub fn convert(value: i64, from: Domain, to: Domain, format: &NegotiatedFormat) -> Result<i64> {
    if from == to {
        return Ok(value);
    }

    let bytes_per_frame = i64::from(format.bytes_per_frame());
    let rate = i64::from(format.rate);

    match (from, to) {
        (Domain::Bytes, Domain::Samples) => {
            if bytes_per_frame == 0 {
                return Err(SidDecError::DivisionByZero);
            }
            Ok(value / bytes_per_frame)
        }
        (Domain::Bytes, Domain::Time) => scale(value, TIME_UNIT, bytes_per_frame * rate),
        (Domain::Samples, Domain::Bytes) => scale(value, bytes_per_frame, 1),
        (Domain::Samples, Domain::Time) => scale(value, TIME_UNIT, rate),
        (Domain::Time, Domain::Bytes) => scale(value, rate * bytes_per_frame, TIME_UNIT),
        (Domain::Time, Domain::Samples) => scale(value, rate, TIME_UNIT),
        _ => unreachable!("same-domain handled above"),
    }
}
