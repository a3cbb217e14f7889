pub mod multipolygon;
pub mod polygon;
pub mod polyline;
pub mod rectangle;
pub mod segment;

pub use multipolygon::{MultiPolygon, MultiPolygonMember};
pub use polygon::{Polygon, Shape};
pub use polyline::PolyLine;
pub use rectangle::Rectangle;
pub use segment::Segment;

use crate::angle::Angle;
use crate::location::{Location, EARTH_MEAN_RADIUS_METERS};

/// An area in squared dm7 units.
///
/// Exact for planar (shoelace) computations on dm7-aligned vertices; the
/// metric conversions are spherical-earth approximations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Surface {
    dm7_squared: u64,
}

impl Surface {
    /// Zero area.
    pub const ZERO: Surface = Surface { dm7_squared: 0 };

    /// Creates a surface from a squared dm7 value.
    #[must_use]
    pub const fn from_dm7_squared(dm7_squared: u64) -> Self {
        Self { dm7_squared }
    }

    /// The raw squared dm7 value.
    #[must_use]
    pub const fn as_dm7_squared(self) -> u64 {
        self.dm7_squared
    }

    /// The area in squared degrees.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_square_degrees(self) -> f64 {
        self.dm7_squared as f64 / 1e14
    }

    /// Approximate area in square meters, scaling each degree of arc by the
    /// mean Earth radius.
    #[must_use]
    pub fn as_square_meters(self) -> f64 {
        let meters_per_degree = EARTH_MEAN_RADIUS_METERS * std::f64::consts::PI / 180.0;
        self.as_square_degrees() * meters_per_degree * meters_per_degree
    }
}

/// Conversion to the planar-geometry engine's coordinate type, x = longitude
/// degrees, y = latitude degrees.
pub(crate) fn geo_coord(location: &Location) -> geo::Coord<f64> {
    geo::Coord {
        x: location.longitude().as_degrees(),
        y: location.latitude().as_degrees(),
    }
}

pub(crate) fn geo_line_string(polyline: &PolyLine) -> geo::LineString<f64> {
    geo::LineString::new(polyline.iter().map(geo_coord).collect())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn square_degree_conversion() {
        let one_square_degree = Surface::from_dm7_squared(100_000_000_000_000);
        assert_relative_eq!(one_square_degree.as_square_degrees(), 1.0);
        // One square degree of arc is roughly 111.19 km on a side.
        let side_meters = one_square_degree.as_square_meters().sqrt();
        assert!((side_meters - 111_194.9).abs() < 1.0, "side={side_meters}");
    }
}
