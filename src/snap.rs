//! Nearest-point projection of a location onto segments, polylines,
//! polygons, and multipolygons.

use std::cmp::Ordering;
use std::ops::Deref;

use crate::angle::{Angle, Latitude, Longitude};
use crate::location::{Distance, Location};
use crate::shape::{MultiPolygon, PolyLine, Polygon, Segment};

/// The result of snapping an origin location onto a shape: the nearest
/// point on the shape, the origin it was computed from, and the distance
/// between the two.
///
/// Ordered by distance, so the best of several candidates is `min()`.
/// Dereferences to the snapped [`Location`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedLocation {
    location: Location,
    origin: Location,
    distance: Distance,
}

impl SnappedLocation {
    /// The nearest point on the target shape.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// The location that was snapped.
    #[must_use]
    pub fn origin(&self) -> Location {
        self.origin
    }

    /// Distance from the origin to the snapped point.
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.distance
    }
}

impl Deref for SnappedLocation {
    type Target = Location;

    fn deref(&self) -> &Location {
        &self.location
    }
}

impl PartialOrd for SnappedLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.distance
                .as_meters()
                .total_cmp(&other.distance.as_meters()),
        )
    }
}

/// Projects `origin` onto `segment` and clamps to its extent.
///
/// The scalar projection of the vector start→origin onto start→end is
/// computed as an exact 128-bit integer dot product on dm7 deltas; only the
/// final interpolation parameter goes through floating point. Out-of-range
/// projections return the nearer endpoint.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn snap_to_segment(origin: &Location, segment: &Segment) -> SnappedLocation {
    let start = segment.start();
    let end = segment.end();

    let dx = end.longitude().as_dm7() - start.longitude().as_dm7();
    let dy = end.latitude().as_dm7() - start.latitude().as_dm7();
    let wx = origin.longitude().as_dm7() - start.longitude().as_dm7();
    let wy = origin.latitude().as_dm7() - start.latitude().as_dm7();

    let dot = i128::from(dx) * i128::from(wx) + i128::from(dy) * i128::from(wy);
    let length_squared = i128::from(dx) * i128::from(dx) + i128::from(dy) * i128::from(dy);

    let snapped = if length_squared == 0 || dot <= 0 {
        start
    } else if dot >= length_squared {
        end
    } else {
        let t = dot as f64 / length_squared as f64;
        interpolate(&start, dy, dx, t)
    };
    snapped_at(snapped, *origin)
}

/// Nearest point on `polyline`: the minimum-distance candidate over every
/// segment.
#[must_use]
pub fn snap_to_polyline(origin: &Location, polyline: &PolyLine) -> SnappedLocation {
    // segments() is non-empty for every valid polyline.
    best_candidate(origin, polyline.segments()).unwrap_or_else(|| snapped_at(*origin, *origin))
}

/// Nearest point on the closed outline of `polygon`, the implicit closing
/// segment included.
#[must_use]
pub fn snap_to_polygon(origin: &Location, polygon: &Polygon) -> SnappedLocation {
    best_candidate(origin, polygon.closed_segments())
        .unwrap_or_else(|| snapped_at(*origin, *origin))
}

/// Nearest point on any ring of `multipolygon`, outer and inner rings
/// alike.
#[must_use]
pub fn snap_to_multipolygon(origin: &Location, multipolygon: &MultiPolygon) -> SnappedLocation {
    let segments = multipolygon.members().iter().flat_map(|member| {
        member
            .outer()
            .closed_segments()
            .into_iter()
            .chain(member.inners().iter().flat_map(Polygon::closed_segments))
    });
    // A multipolygon holds at least one member, so a candidate exists.
    best_candidate(origin, segments).unwrap_or_else(|| snapped_at(*origin, *origin))
}

fn best_candidate<I>(origin: &Location, segments: I) -> Option<SnappedLocation>
where
    I: IntoIterator<Item = Segment>,
{
    segments
        .into_iter()
        .map(|segment| snap_to_segment(origin, &segment))
        .min_by(|a, b| {
            a.distance
                .as_meters()
                .total_cmp(&b.distance.as_meters())
        })
}

fn snapped_at(location: Location, origin: Location) -> SnappedLocation {
    SnappedLocation {
        location,
        origin,
        distance: origin.distance_to(&location),
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn interpolate(start: &Location, dy: i64, dx: i64, t: f64) -> Location {
    let lat = start.latitude().as_dm7() + (dy as f64 * t).round() as i64;
    let lon = start.longitude().as_dm7() + (dx as f64 * t).round() as i64;
    // Interpolated values lie between the endpoints; clamping only guards
    // against rounding at the boundary.
    Location::new(Latitude::clamped_dm7(lat), Longitude::clamped_dm7(lon))
}
