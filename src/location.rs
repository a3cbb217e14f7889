use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use nalgebra::Vector3;

use crate::angle::{degrees_to_dm7, Angle, Heading, Latitude, Longitude};
use crate::error::{CoordinateError, GeoCoreError, GeometryError, Result};
use crate::shape::Rectangle;

/// Mean Earth radius in meters, used by all spherical formulas.
pub const EARTH_MEAN_RADIUS_METERS: f64 = 6_371_000.0;

/// A physical distance, stored in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance {
    meters: f64,
}

impl Distance {
    /// Zero distance.
    pub const ZERO: Distance = Distance { meters: 0.0 };

    /// Creates a distance from meters.
    #[must_use]
    pub fn from_meters(meters: f64) -> Self {
        Self { meters }
    }

    /// Creates a distance from kilometers.
    #[must_use]
    pub fn from_kilometers(kilometers: f64) -> Self {
        Self {
            meters: kilometers * 1_000.0,
        }
    }

    /// The distance in meters.
    #[must_use]
    pub fn as_meters(self) -> f64 {
        self.meters
    }

    /// The distance in kilometers.
    #[must_use]
    pub fn as_kilometers(self) -> f64 {
        self.meters / 1_000.0
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        Distance {
            meters: self.meters + rhs.meters,
        }
    }
}

impl Sub for Distance {
    type Output = Distance;

    fn sub(self, rhs: Distance) -> Distance {
        Distance {
            meters: self.meters - rhs.meters,
        }
    }
}

/// A geodetic point: an immutable latitude / longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    latitude: Latitude,
    longitude: Longitude,
}

impl Location {
    /// Creates a location from its two coordinates.
    #[must_use]
    pub const fn new(latitude: Latitude, longitude: Longitude) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a location from floating-point degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is out of range.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            latitude: Latitude::from_degrees(latitude)?,
            longitude: Longitude::from_degrees(longitude)?,
        })
    }

    /// Creates a location from dm7 coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is out of range.
    pub fn from_dm7(latitude: i64, longitude: i64) -> Result<Self> {
        Ok(Self {
            latitude: Latitude::from_dm7(latitude)?,
            longitude: Longitude::from_dm7(longitude)?,
        })
    }

    /// Unpacks a location from its 64-bit representation: latitude dm7 in
    /// the high 32 bits, longitude dm7 in the low 32 bits, two's complement
    /// per half.
    ///
    /// # Errors
    ///
    /// Returns an error if either unpacked coordinate is out of range.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_packed(packed: i64) -> Result<Self> {
        let latitude = (packed >> 32) as i32;
        let longitude = packed as i32;
        Self::from_dm7(latitude.into(), longitude.into())
    }

    /// Packs this location into a single 64-bit integer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_packed(&self) -> i64 {
        (self.latitude.as_dm7() << 32) | i64::from(self.longitude.as_dm7() as u32)
    }

    /// The latitude of this location.
    #[must_use]
    pub fn latitude(&self) -> Latitude {
        self.latitude
    }

    /// The longitude of this location.
    #[must_use]
    pub fn longitude(&self) -> Longitude {
        self.longitude
    }

    /// Great-circle or flat-earth distance to `other`, whichever formula is
    /// safe: the cheap equirectangular approximation is used unless the two
    /// points are closer via the antimeridian, where it would measure the
    /// long way around.
    #[must_use]
    pub fn distance_to(&self, other: &Location) -> Distance {
        if self
            .longitude
            .is_closer_via_antimeridian_to(other.longitude)
        {
            self.haversine_distance_to(other)
        } else {
            self.equirectangular_distance_to(other)
        }
    }

    /// Great-circle distance to `other` using the haversine formula.
    #[must_use]
    pub fn haversine_distance_to(&self, other: &Location) -> Distance {
        let phi1 = self.latitude.as_radians();
        let phi2 = other.latitude.as_radians();
        let delta_phi = phi2 - phi1;
        let delta_lambda = other.longitude.as_radians() - self.longitude.as_radians();

        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        Distance::from_meters(EARTH_MEAN_RADIUS_METERS * c)
    }

    /// Flat-earth approximation of the distance to `other`, scaled by the
    /// mean Earth radius. Cheaper than haversine but wrong across the
    /// antimeridian; [`Location::distance_to`] dispatches accordingly.
    #[must_use]
    pub fn equirectangular_distance_to(&self, other: &Location) -> Distance {
        let phi1 = self.latitude.as_radians();
        let phi2 = other.latitude.as_radians();
        let x = (other.longitude.as_radians() - self.longitude.as_radians())
            * ((phi1 + phi2) / 2.0).cos();
        let y = phi2 - phi1;
        Distance::from_meters(EARTH_MEAN_RADIUS_METERS * x.hypot(y))
    }

    /// Initial bearing of the great circle from this location to `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two locations are identical, where the
    /// bearing is undefined.
    pub fn heading_to(&self, other: &Location) -> Result<Heading> {
        if self == other {
            return Err(GeometryError::UndefinedHeading {
                location: self.to_string(),
            }
            .into());
        }
        let phi1 = self.latitude.as_radians();
        let phi2 = other.latitude.as_radians();
        let delta_lambda = other.longitude.as_radians() - self.longitude.as_radians();

        let y = delta_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
        Heading::from_radians(y.atan2(x))
    }

    /// Solves the direct geodetic problem: the location reached by
    /// following `heading` for `distance` along a great circle.
    ///
    /// Results that would step over a pole or the antimeridian are clamped
    /// to the boundary rather than wrapped.
    #[must_use]
    pub fn shift_along_great_circle(&self, heading: Heading, distance: Distance) -> Self {
        if distance.as_meters() == 0.0 {
            return *self;
        }
        let phi1 = self.latitude.as_radians();
        let lambda1 = self.longitude.as_radians();
        let theta = heading.as_radians();
        let sigma = distance.as_meters() / EARTH_MEAN_RADIUS_METERS;

        let phi2 = (phi1.sin() * sigma.cos() + phi1.cos() * sigma.sin() * theta.cos()).asin();
        let lambda2 = lambda1
            + (theta.sin() * sigma.sin() * phi1.cos())
                .atan2(sigma.cos() - phi1.sin() * phi2.sin());

        Self {
            latitude: Latitude::clamped_dm7(degrees_to_dm7(phi2.to_degrees())),
            longitude: Longitude::clamped_dm7(degrees_to_dm7(lambda2.to_degrees())),
        }
    }

    /// Great-circle midpoint between this location and `other`, computed by
    /// averaging the two Cartesian unit vectors.
    ///
    /// The longitude is normalized into (-180°, 180°], except that two
    /// inputs sitting exactly on the antimeridian keep their boundary
    /// longitude instead of picking up a floating-point sign flip.
    #[must_use]
    pub fn mid_point(&self, other: &Location) -> Self {
        let sum = self.unit_vector() + other.unit_vector();
        let latitude = sum.z.atan2(sum.x.hypot(sum.y));

        let longitude = if self.longitude.is_on_antimeridian() && other.longitude.is_on_antimeridian()
        {
            self.longitude
        } else {
            Longitude::clamped_dm7(degrees_to_dm7(sum.y.atan2(sum.x).to_degrees()))
        };

        Self {
            latitude: Latitude::clamped_dm7(degrees_to_dm7(latitude.to_degrees())),
            longitude,
        }
    }

    /// Rhumb-line midpoint between this location and `other`, computed on
    /// Mercator-projected latitudes.
    ///
    /// When the log-ratio in the formula is non-finite (the locations share
    /// a latitude, or floating error collapses it) or the longitudes are
    /// equal, the longitude falls back to the arithmetic mean. Otherwise
    /// the result is normalized into (-180°, 180°).
    #[must_use]
    pub fn loxodromic_mid_point(&self, other: &Location) -> Self {
        use std::f64::consts::PI;

        let phi1 = self.latitude.as_radians();
        let phi2 = other.latitude.as_radians();
        let lambda1 = self.longitude.as_radians();
        let lambda2 = other.longitude.as_radians();

        let phi_mid = (phi1 + phi2) / 2.0;
        let f1 = (PI / 4.0 + phi1 / 2.0).tan();
        let f2 = (PI / 4.0 + phi2 / 2.0).tan();
        let f_mid = (PI / 4.0 + phi_mid / 2.0).tan();

        let ratio = (f2 / f1).ln();
        let lambda_mid = ((lambda2 - lambda1) * f_mid.ln() + lambda1 * f2.ln()
            - lambda2 * f1.ln())
            / ratio;

        let longitude = if !lambda_mid.is_finite() || self.longitude == other.longitude {
            (lambda1 + lambda2) / 2.0
        } else {
            // Added-then-modulo normalization into [-π, π).
            (lambda_mid + 3.0 * PI).rem_euclid(2.0 * PI) - PI
        };

        Self {
            latitude: Latitude::clamped_dm7(degrees_to_dm7(phi_mid.to_degrees())),
            longitude: Longitude::clamped_dm7(degrees_to_dm7(longitude.to_degrees())),
        }
    }

    /// Bounding rectangle of the four points `distance` away in the
    /// cardinal directions.
    #[must_use]
    pub fn box_around(&self, distance: Distance) -> Rectangle {
        let north = self.shift_along_great_circle(Heading::NORTH, distance);
        let south = self.shift_along_great_circle(Heading::SOUTH, distance);
        let east = self.shift_along_great_circle(Heading::EAST, distance);
        let west = self.shift_along_great_circle(Heading::WEST, distance);
        Rectangle::spanning(&[north, south, east, west, *self])
    }

    /// Unit vector on the sphere, x toward 0°/0°, z toward the north pole.
    fn unit_vector(&self) -> Vector3<f64> {
        let phi = self.latitude.as_radians();
        let lambda = self.longitude.as_radians();
        Vector3::new(phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Location {
    type Err = GeoCoreError;

    /// Parses the compact `"<latDegrees>,<lonDegrees>"` form.
    fn from_str(s: &str) -> Result<Self> {
        let parse = || -> Option<Result<Self>> {
            let (latitude, longitude) = s.split_once(',')?;
            let latitude: f64 = latitude.trim().parse().ok()?;
            let longitude: f64 = longitude.trim().parse().ok()?;
            Some(Self::from_degrees(latitude, longitude))
        };
        parse().ok_or_else(|| {
            GeoCoreError::from(CoordinateError::Parse {
                text: s.to_owned(),
                expected: "a `lat,lon` location",
            })
        })?
    }
}
