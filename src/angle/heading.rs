use std::fmt;

use crate::error::Result;

use super::{finite_degrees_to_dm7, Angle, HALF_REVOLUTION_DM7, REVOLUTION_DM7};

/// A compass heading in [0°, 360°).
///
/// The value is stored shifted by 180° onto the signed circle [-180°, 180°),
/// so comparisons and differences across the 0°/360° wraparound stay plain
/// integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Heading {
    shifted_dm7: i32,
}

impl Heading {
    /// 0°.
    pub const NORTH: Heading = Heading {
        shifted_dm7: -1_800_000_000,
    };

    /// 90°.
    pub const EAST: Heading = Heading {
        shifted_dm7: -900_000_000,
    };

    /// 180°.
    pub const SOUTH: Heading = Heading { shifted_dm7: 0 };

    /// 270°.
    pub const WEST: Heading = Heading {
        shifted_dm7: 900_000_000,
    };

    /// Normalizes any dm7 value into [0°, 360°).
    ///
    /// The input is reduced into [0°, 360°) with a Euclidean remainder
    /// before the storage shift, so any input magnitude or sign, the
    /// extremes of i64 included, yields the canonical representative.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_dm7(dm7: i64) -> Self {
        let shifted = dm7.rem_euclid(REVOLUTION_DM7) - HALF_REVOLUTION_DM7;
        Self {
            shifted_dm7: shifted as i32,
        }
    }

    /// Creates a heading from floating-point degrees, normalizing into
    /// [0°, 360°).
    ///
    /// # Errors
    ///
    /// Returns an error for NaN or infinite input.
    pub fn from_degrees(degrees: f64) -> Result<Self> {
        Ok(Self::from_dm7(finite_degrees_to_dm7(
            "a finite heading in degrees",
            degrees,
        )?))
    }

    /// Creates a heading from radians, normalizing into [0°, 360°).
    ///
    /// # Errors
    ///
    /// Returns an error for NaN or infinite input.
    pub fn from_radians(radians: f64) -> Result<Self> {
        Self::from_degrees(radians.to_degrees())
    }

    /// Turns this heading by a signed dm7 amount, wrapping around.
    #[must_use]
    pub fn add(self, dm7: i64) -> Self {
        Self::from_dm7(self.as_dm7() + dm7)
    }

    /// Turns this heading by a negated signed dm7 amount, wrapping around.
    #[must_use]
    pub fn subtract(self, dm7: i64) -> Self {
        Self::from_dm7(self.as_dm7() - dm7)
    }
}

impl Angle for Heading {
    fn as_dm7(self) -> i64 {
        i64::from(self.shifted_dm7) + HALF_REVOLUTION_DM7
    }

    /// Unsigned gap measured the short way around the compass.
    fn difference(self, other: Self) -> i64 {
        let gap = (self.as_dm7() - other.as_dm7()).abs();
        gap.min(REVOLUTION_DM7 - gap)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_degrees())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn heading(degrees: f64) -> Heading {
        Heading::from_degrees(degrees).unwrap()
    }

    #[test]
    fn cardinal_constants() {
        assert_eq!(Heading::NORTH.as_dm7(), 0);
        assert_eq!(Heading::EAST.as_dm7(), 900_000_000);
        assert_eq!(Heading::SOUTH.as_dm7(), 1_800_000_000);
        assert_eq!(Heading::WEST.as_dm7(), 2_700_000_000);
    }

    #[test]
    fn wraparound_identities() {
        assert_eq!(heading(0.0), Heading::NORTH);
        assert_eq!(heading(360.0), heading(0.0));
        assert_eq!(heading(-90.0), heading(270.0));
        assert_eq!(heading(720.0), Heading::NORTH);
        assert_eq!(heading(-450.0), Heading::WEST);
    }

    #[test]
    fn non_finite_degrees_fail() {
        assert!(Heading::from_degrees(f64::NAN).is_err());
        assert!(Heading::from_degrees(f64::INFINITY).is_err());
        assert!(Heading::from_radians(f64::NAN).is_err());
    }

    #[test]
    fn normalized_range() {
        for dm7 in [
            i64::MIN,
            i64::from(i32::MIN),
            -3_600_000_000,
            -1,
            0,
            3_599_999_999,
            3_600_000_000,
            i64::from(i32::MAX) * 4,
            i64::MAX,
        ] {
            let normalized = Heading::from_dm7(dm7).as_dm7();
            assert!(
                (0..REVOLUTION_DM7).contains(&normalized),
                "dm7={dm7} normalized={normalized}"
            );
        }
    }

    #[test]
    fn difference_across_wraparound() {
        let before = heading(350.0);
        let after = heading(10.0);
        assert_eq!(before.difference(after), 200_000_000);
        assert_eq!(after.difference(before), 200_000_000);
    }

    #[test]
    fn add_and_subtract_wrap() {
        assert_eq!(Heading::WEST.add(1_800_000_000), Heading::EAST);
        assert_eq!(Heading::NORTH.subtract(900_000_000), Heading::WEST);
    }
}
