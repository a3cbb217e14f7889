pub mod heading;
pub mod latitude;
pub mod longitude;

use crate::error::{CoordinateError, Result};

pub use heading::Heading;
pub use latitude::Latitude;
pub use longitude::Longitude;

/// Number of dm7 units (degrees scaled by 10^7) in one degree.
pub const DM7_PER_DEGREE: i64 = 10_000_000;

/// A full revolution (360°) in dm7 units.
pub const REVOLUTION_DM7: i64 = 3_600_000_000;

/// Half a revolution (180°) in dm7 units.
pub const HALF_REVOLUTION_DM7: i64 = 1_800_000_000;

/// A fixed-point angular value stored in dm7 units.
///
/// Implemented independently by [`Latitude`], [`Longitude`] and [`Heading`];
/// there is no common storage, only a common unit.
pub trait Angle: Copy {
    /// Raw fixed-point value in dm7 units.
    fn as_dm7(self) -> i64;

    /// Value in floating-point degrees.
    #[allow(clippy::cast_precision_loss)]
    fn as_degrees(self) -> f64 {
        self.as_dm7() as f64 / DM7_PER_DEGREE as f64
    }

    /// Value in radians.
    fn as_radians(self) -> f64 {
        self.as_degrees().to_radians()
    }

    /// Unsigned angular gap to `other`, in dm7 units.
    fn difference(self, other: Self) -> i64 {
        (self.as_dm7() - other.as_dm7()).abs()
    }
}

/// Rounds floating-point degrees to the nearest dm7 unit.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn degrees_to_dm7(degrees: f64) -> i64 {
    (degrees * DM7_PER_DEGREE as f64).round() as i64
}

/// Validating front of [`degrees_to_dm7`] for the construction paths.
///
/// NaN and infinity would otherwise round to 0 and slip through range
/// validation as a plausible coordinate.
pub(crate) fn finite_degrees_to_dm7(expected: &'static str, degrees: f64) -> Result<i64> {
    if !degrees.is_finite() {
        return Err(CoordinateError::Parse {
            text: degrees.to_string(),
            expected,
        }
        .into());
    }
    Ok(degrees_to_dm7(degrees))
}
