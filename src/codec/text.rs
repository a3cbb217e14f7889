//! Text variable-length codec: zig-zag dm7 deltas in printable 5-bit
//! groups, in the style of encoded-polyline strings.

use crate::angle::{Angle, Latitude, Longitude};
use crate::error::{CodecError, Result};
use crate::location::Location;
use crate::shape::PolyLine;

/// Largest per-step longitude delta the format can carry, 180° in dm7.
///
/// Encoding a larger delta would silently lose precision, so it is rejected
/// with a distinct error instead.
pub const MAXIMUM_DELTA_LONGITUDE: i64 = 1_800_000_000;

/// Set on every 5-bit group of a value except the last.
const CONTINUATION_BIT: u32 = 0x20;

/// Added to each group so the output stays printable.
const CHARACTER_OFFSET: u32 = 63;

/// Compresses `polyline` into the text format.
///
/// # Errors
///
/// Returns [`CodecError::DeltaExceedsMaximum`] when a per-step longitude
/// delta exceeds [`MAXIMUM_DELTA_LONGITUDE`], which happens for polylines
/// that jump across the antimeridian.
pub fn encode(polyline: &PolyLine) -> Result<String> {
    let mut output = String::new();
    let mut previous_latitude = 0;
    let mut previous_longitude = 0;
    for location in polyline {
        let delta_latitude = location.latitude().as_dm7() - previous_latitude;
        let delta_longitude = location.longitude().as_dm7() - previous_longitude;
        if delta_longitude.abs() > MAXIMUM_DELTA_LONGITUDE {
            return Err(CodecError::DeltaExceedsMaximum {
                delta: delta_longitude,
                max: MAXIMUM_DELTA_LONGITUDE,
            }
            .into());
        }
        write_value(&mut output, delta_latitude);
        write_value(&mut output, delta_longitude);
        previous_latitude = location.latitude().as_dm7();
        previous_longitude = location.longitude().as_dm7();
    }
    Ok(output)
}

/// Decompresses a text-format string back into a polyline.
///
/// # Errors
///
/// Returns an error on characters outside the printable group range, on
/// input that ends in the middle of a value, or when an accumulated
/// coordinate falls outside its valid range.
pub fn decode(encoded: &str) -> Result<PolyLine> {
    let mut characters = encoded.chars();
    let mut points = Vec::new();
    let mut latitude = 0;
    let mut longitude = 0;
    loop {
        let Some(delta_latitude) = read_value(&mut characters)? else {
            break;
        };
        let delta_longitude = read_value(&mut characters)?.ok_or(CodecError::Truncated)?;
        latitude += delta_latitude;
        longitude += delta_longitude;
        points.push(Location::new(
            Latitude::from_dm7(latitude)?,
            Longitude::from_dm7(longitude)?,
        ));
    }
    PolyLine::new(points)
}

/// Zig-zag encodes `value` and appends its 5-bit groups, low group first.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn write_value(output: &mut String, value: i64) {
    // Shift left one bit and complement for negatives, so small magnitudes
    // of either sign stay short.
    let mut zig_zag = if value < 0 {
        !((value as u64) << 1)
    } else {
        (value as u64) << 1
    };
    loop {
        let mut group = (zig_zag & 0x1f) as u32;
        zig_zag >>= 5;
        if zig_zag != 0 {
            group |= CONTINUATION_BIT;
        }
        // Group values stay below 0x40, so the offset character is always
        // valid.
        if let Some(character) = char::from_u32(group + CHARACTER_OFFSET) {
            output.push(character);
        }
        if zig_zag == 0 {
            break;
        }
    }
}

/// Reads one zig-zag value; `Ok(None)` at a clean end of input.
#[allow(clippy::cast_possible_wrap)]
fn read_value(characters: &mut std::str::Chars<'_>) -> Result<Option<i64>> {
    let mut zig_zag: u64 = 0;
    let mut shift = 0;
    loop {
        let Some(character) = characters.next() else {
            if shift == 0 {
                return Ok(None);
            }
            return Err(CodecError::Truncated.into());
        };
        let code = u32::from(character);
        if !(CHARACTER_OFFSET..128).contains(&code) {
            return Err(CodecError::InvalidCharacter { character }.into());
        }
        let group = code - CHARACTER_OFFSET;
        zig_zag |= u64::from(group & 0x1f) << shift;
        shift += 5;
        if group & CONTINUATION_BIT == 0 {
            break;
        }
        // 13 groups already cover a 64-bit zig-zag value; another
        // continuation bit means the stream is corrupt, not just long.
        if shift >= 64 {
            return Err(
                CodecError::Malformed("value runs past 64 bits".to_owned()).into()
            );
        }
    }
    let value = if zig_zag & 1 == 0 {
        (zig_zag >> 1) as i64
    } else {
        !(zig_zag >> 1) as i64
    };
    Ok(Some(value))
}
