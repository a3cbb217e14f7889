use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{CoordinateError, Result};

use super::{finite_degrees_to_dm7, Angle, HALF_REVOLUTION_DM7};

/// A geodetic longitude, a fixed-point angle in [-180°, 180°].
///
/// +180° and -180° name the same meridian and compare equal, but the raw
/// dm7 value keeps the original sign so round-trips reproduce their input.
#[derive(Debug, Clone, Copy)]
pub struct Longitude {
    dm7: i32,
}

impl Longitude {
    /// Smallest valid dm7 value (-180°).
    pub const MINIMUM_DM7: i64 = -1_800_000_000;

    /// Largest valid dm7 value (180°).
    pub const MAXIMUM_DM7: i64 = 1_800_000_000;

    /// The antimeridian, approached from the west (-180°).
    pub const ANTIMERIDIAN_WEST: Longitude = Longitude {
        dm7: -1_800_000_000,
    };

    /// The antimeridian, approached from the east (+180°).
    pub const ANTIMERIDIAN_EAST: Longitude = Longitude { dm7: 1_800_000_000 };

    /// The prime meridian.
    pub const ZERO: Longitude = Longitude { dm7: 0 };

    /// Creates a longitude from a dm7 value.
    ///
    /// # Errors
    ///
    /// Returns an error if `dm7` is outside [-1_800_000_000, 1_800_000_000].
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_dm7(dm7: i64) -> Result<Self> {
        if !(Self::MINIMUM_DM7..=Self::MAXIMUM_DM7).contains(&dm7) {
            return Err(CoordinateError::OutOfRange {
                coordinate: "longitude",
                value: dm7,
                min: Self::MINIMUM_DM7,
                max: Self::MAXIMUM_DM7,
            }
            .into());
        }
        Ok(Self { dm7: dm7 as i32 })
    }

    /// Creates a longitude from floating-point degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is non-finite or outside [-180°, 180°].
    pub fn from_degrees(degrees: f64) -> Result<Self> {
        Self::from_dm7(finite_degrees_to_dm7(
            "a finite longitude in degrees",
            degrees,
        )?)
    }

    /// Creates a longitude from radians.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside [-π, π].
    pub fn from_radians(radians: f64) -> Result<Self> {
        Self::from_degrees(radians.to_degrees())
    }

    /// Clamps an arbitrary dm7 value onto the valid range.
    ///
    /// Used by great-circle shifts that may step over the antimeridian:
    /// such results are pinned to the boundary rather than wrapped.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn clamped_dm7(dm7: i64) -> Self {
        Self {
            dm7: dm7.clamp(Self::MINIMUM_DM7, Self::MAXIMUM_DM7) as i32,
        }
    }

    /// True for both ±180° representations.
    #[must_use]
    pub fn is_on_antimeridian(self) -> bool {
        self.as_dm7().abs() == Self::MAXIMUM_DM7
    }

    /// True when the short way to `other` crosses the antimeridian.
    ///
    /// This is the dispatch test for the distance formulas: the cheap
    /// equirectangular approximation is wrong across the ±180° seam, so
    /// callers switch to haversine when this returns true. Near exactly
    /// half a revolution apart the answer may flip between nearly
    /// identical inputs; both formulas remain valid there.
    #[must_use]
    pub fn is_closer_via_antimeridian_to(self, other: Longitude) -> bool {
        (self.as_dm7() - other.as_dm7()).abs() > HALF_REVOLUTION_DM7
    }

    /// The comparison key: +180° folds onto -180°.
    fn canonical_dm7(self) -> i64 {
        if i64::from(self.dm7) == Self::MAXIMUM_DM7 {
            Self::MINIMUM_DM7
        } else {
            self.dm7.into()
        }
    }
}

impl Angle for Longitude {
    fn as_dm7(self) -> i64 {
        self.dm7.into()
    }
}

impl PartialEq for Longitude {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_dm7() == other.canonical_dm7()
    }
}

impl Eq for Longitude {}

impl Hash for Longitude {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_dm7().hash(state);
    }
}

impl PartialOrd for Longitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Longitude {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_dm7().cmp(&other.canonical_dm7())
    }
}

impl fmt::Display for Longitude {
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
            Longitude::MINIMUM_DM7,
            -1_220_095_660,
            0,
            1_220_095_660,
            Longitude::MAXIMUM_DM7,
        ] {
            assert_eq!(Longitude::from_dm7(dm7).unwrap().as_dm7(), dm7);
        }
    }

    #[test]
    fn out_of_range_fails() {
        assert!(Longitude::from_dm7(1_800_000_001).is_err());
        assert!(Longitude::from_dm7(-1_800_000_001).is_err());
        assert!(Longitude::from_degrees(180.1).is_err());
    }

    #[test]
    fn non_finite_degrees_fail() {
        assert!(Longitude::from_degrees(f64::NAN).is_err());
        assert!(Longitude::from_degrees(f64::INFINITY).is_err());
        assert!(Longitude::from_radians(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn antimeridian_signs_compare_equal() {
        let east = Longitude::from_degrees(180.0).unwrap();
        let west = Longitude::from_degrees(-180.0).unwrap();
        assert_eq!(east, west);
        // The raw value still distinguishes the two for round-trips.
        assert_eq!(east.as_dm7(), 1_800_000_000);
        assert_eq!(west.as_dm7(), -1_800_000_000);
    }

    #[test]
    fn antimeridian_proximity() {
        let near_east = Longitude::from_degrees(179.0).unwrap();
        let near_west = Longitude::from_degrees(-179.0).unwrap();
        assert!(near_east.is_closer_via_antimeridian_to(near_west));
        assert!(near_west.is_closer_via_antimeridian_to(near_east));

        let london = Longitude::from_degrees(-0.1).unwrap();
        let paris = Longitude::from_degrees(2.35).unwrap();
        assert!(!london.is_closer_via_antimeridian_to(paris));
    }

    #[test]
    fn antimeridian_detection() {
        assert!(Longitude::ANTIMERIDIAN_EAST.is_on_antimeridian());
        assert!(Longitude::ANTIMERIDIAN_WEST.is_on_antimeridian());
        assert!(!Longitude::ZERO.is_on_antimeridian());
    }
}
