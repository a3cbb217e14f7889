use std::fmt;

use crate::error::{CoordinateError, Result};

use super::{finite_degrees_to_dm7, Angle};

/// A geodetic latitude, a fixed-point angle in [-90°, 90°].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Latitude {
    dm7: i32,
}

impl Latitude {
    /// Smallest valid dm7 value (-90°).
    pub const MINIMUM_DM7: i64 = -900_000_000;

    /// Largest valid dm7 value (90°).
    pub const MAXIMUM_DM7: i64 = 900_000_000;

    /// The south pole.
    pub const MINIMUM: Latitude = Latitude { dm7: -900_000_000 };

    /// The north pole.
    pub const MAXIMUM: Latitude = Latitude { dm7: 900_000_000 };

    /// The equator.
    pub const ZERO: Latitude = Latitude { dm7: 0 };

    /// Creates a latitude from a dm7 value.
    ///
    /// # Errors
    ///
    /// Returns an error if `dm7` is outside [-900_000_000, 900_000_000].
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_dm7(dm7: i64) -> Result<Self> {
        if !(Self::MINIMUM_DM7..=Self::MAXIMUM_DM7).contains(&dm7) {
            return Err(CoordinateError::OutOfRange {
                coordinate: "latitude",
                value: dm7,
                min: Self::MINIMUM_DM7,
                max: Self::MAXIMUM_DM7,
            }
            .into());
        }
        Ok(Self { dm7: dm7 as i32 })
    }

    /// Creates a latitude from floating-point degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is non-finite or outside [-90°, 90°].
    pub fn from_degrees(degrees: f64) -> Result<Self> {
        Self::from_dm7(finite_degrees_to_dm7("a finite latitude in degrees", degrees)?)
    }

    /// Creates a latitude from radians.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside [-π/2, π/2].
    pub fn from_radians(radians: f64) -> Result<Self> {
        Self::from_degrees(radians.to_degrees())
    }

    /// Clamps an arbitrary dm7 value onto the valid range.
    ///
    /// Used by great-circle shifts that may step over a pole: such results
    /// are pinned to the boundary rather than wrapped.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn clamped_dm7(dm7: i64) -> Self {
        Self {
            dm7: dm7.clamp(Self::MINIMUM_DM7, Self::MAXIMUM_DM7) as i32,
        }
    }
}

impl Angle for Latitude {
    fn as_dm7(self) -> i64 {
        self.dm7.into()
    }
}

impl fmt::Display for Latitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_degrees())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dm7_round_trip() {
        for dm7 in [
            Latitude::MINIMUM_DM7,
            -373_353_100,
            0,
            373_353_100,
            Latitude::MAXIMUM_DM7,
        ] {
            assert_eq!(Latitude::from_dm7(dm7).unwrap().as_dm7(), dm7);
        }
    }

    #[test]
    fn out_of_range_fails() {
        assert!(Latitude::from_dm7(900_000_001).is_err());
        assert!(Latitude::from_dm7(-900_000_001).is_err());
        assert!(Latitude::from_degrees(90.1).is_err());
        assert!(Latitude::from_degrees(-90.1).is_err());
    }

    #[test]
    fn non_finite_degrees_fail() {
        assert!(Latitude::from_degrees(f64::NAN).is_err());
        assert!(Latitude::from_degrees(f64::INFINITY).is_err());
        assert!(Latitude::from_degrees(f64::NEG_INFINITY).is_err());
        assert!(Latitude::from_radians(f64::NAN).is_err());
    }

    #[test]
    fn poles_are_valid() {
        assert_eq!(
            Latitude::from_degrees(90.0).unwrap(),
            Latitude::MAXIMUM
        );
        assert_eq!(
            Latitude::from_degrees(-90.0).unwrap(),
            Latitude::MINIMUM
        );
    }

    #[test]
    fn ordering_follows_dm7() {
        let south = Latitude::from_degrees(-45.0).unwrap();
        let north = Latitude::from_degrees(45.0).unwrap();
        assert!(south < north);
        assert_eq!(south.difference(north), 900_000_000);
    }

    #[test]
    fn clamping_pins_to_poles() {
        assert_eq!(Latitude::clamped_dm7(950_000_000), Latitude::MAXIMUM);
        assert_eq!(Latitude::clamped_dm7(-950_000_000), Latitude::MINIMUM);
        assert_eq!(Latitude::clamped_dm7(100), Latitude::from_dm7(100).unwrap());
    }
}
