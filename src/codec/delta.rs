//! Binary delta codec: per-axis magnitude byte runs with a parallel sign
//! array.

use crate::angle::{Angle, Latitude, Longitude};
use crate::error::{CodecError, Result};
use crate::location::Location;
use crate::shape::PolyLine;

/// A polyline compressed as coordinate deltas.
///
/// Each location contributes two entries, latitude first: the magnitude of
/// its dm7 delta against the previous location (the first against 0,0) as a
/// minimal big-endian byte run, with leading zero bytes trimmed and a zero
/// delta stored as an empty run. The sign of each delta lives in the
/// parallel `signs` array, `true` for negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaEncodedPolyLine {
    values: Vec<Vec<u8>>,
    signs: Vec<bool>,
}

impl DeltaEncodedPolyLine {
    /// Compresses `polyline` into delta form.
    #[must_use]
    pub fn encode(polyline: &PolyLine) -> Self {
        let mut values = Vec::with_capacity(polyline.len() * 2);
        let mut signs = Vec::with_capacity(polyline.len() * 2);
        let mut previous_latitude = 0;
        let mut previous_longitude = 0;
        for location in polyline {
            let delta_latitude = location.latitude().as_dm7() - previous_latitude;
            let delta_longitude = location.longitude().as_dm7() - previous_longitude;
            values.push(minimal_bytes(delta_latitude.unsigned_abs()));
            signs.push(delta_latitude < 0);
            values.push(minimal_bytes(delta_longitude.unsigned_abs()));
            signs.push(delta_longitude < 0);
            previous_latitude = location.latitude().as_dm7();
            previous_longitude = location.longitude().as_dm7();
        }
        Self { values, signs }
    }

    /// Decompresses back into a polyline.
    ///
    /// # Errors
    ///
    /// Returns an error when the value and sign arrays disagree in length,
    /// the entry count is odd or zero, a byte run is longer than a 64-bit
    /// magnitude, or an accumulated coordinate falls outside its valid
    /// range.
    pub fn decode(&self) -> Result<PolyLine> {
        if self.values.len() != self.signs.len() {
            return Err(CodecError::Malformed(format!(
                "{} values but {} signs",
                self.values.len(),
                self.signs.len()
            ))
            .into());
        }
        if self.values.is_empty() || self.values.len() % 2 != 0 {
            return Err(CodecError::Malformed(format!(
                "expected a positive even entry count, got {}",
                self.values.len()
            ))
            .into());
        }

        let mut points = Vec::with_capacity(self.values.len() / 2);
        let mut latitude = 0;
        let mut longitude = 0;
        for (pair, signs) in self.values.chunks_exact(2).zip(self.signs.chunks_exact(2)) {
            latitude += read_delta(&pair[0], signs[0])?;
            longitude += read_delta(&pair[1], signs[1])?;
            points.push(Location::new(
                Latitude::from_dm7(latitude)?,
                Longitude::from_dm7(longitude)?,
            ));
        }
        PolyLine::new(points)
    }

    /// The per-axis magnitude byte runs, latitude before longitude for each
    /// point.
    #[must_use]
    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    /// The per-axis delta signs parallel to [`Self::values`], `true` for
    /// negative.
    #[must_use]
    pub fn signs(&self) -> &[bool] {
        &self.signs
    }
}

/// Big-endian bytes of `magnitude` with leading zeros trimmed; empty for
/// zero.
fn minimal_bytes(magnitude: u64) -> Vec<u8> {
    let bytes = magnitude.to_be_bytes();
    let first = bytes.iter().position(|&byte| byte != 0);
    match first {
        Some(index) => bytes[index..].to_vec(),
        None => Vec::new(),
    }
}

#[allow(clippy::cast_possible_wrap)]
fn read_delta(run: &[u8], negative: bool) -> Result<i64> {
    if run.len() > 8 {
        return Err(CodecError::Malformed(format!(
            "magnitude run of {} bytes exceeds 64 bits",
            run.len()
        ))
        .into());
    }
    let mut magnitude: u64 = 0;
    for &byte in run {
        magnitude = (magnitude << 8) | u64::from(byte);
    }
    let magnitude = magnitude as i64;
    Ok(if negative { -magnitude } else { magnitude })
}
