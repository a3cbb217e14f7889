use std::fmt;
use std::sync::{Arc, OnceLock};

use geo::Relate;

use crate::angle::Angle;
use crate::error::Result;
use crate::location::Location;

use super::{geo_coord, geo_line_string, MultiPolygon, PolyLine, Rectangle, Segment, Surface};

/// A tagged geometric argument for containment and overlap queries,
/// resolved at compile time instead of by runtime type dispatch.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Location(&'a Location),
    PolyLine(&'a PolyLine),
    Polygon(&'a Polygon),
    MultiPolygon(&'a MultiPolygon),
}

impl Shape<'_> {
    /// Relates the prepared form of `polygon` to this shape in the planar
    /// engine, returning the DE-9IM matrix verbatim.
    pub(crate) fn relate_to(self, polygon: &Polygon) -> geo::relate::IntersectionMatrix {
        let prepared = polygon.prepared();
        match self {
            Shape::Location(location) => prepared.relate(&geo::Point::from(geo_coord(location))),
            Shape::PolyLine(polyline) => prepared.relate(&geo_line_string(polyline)),
            Shape::Polygon(other) => prepared.relate(other.prepared()),
            Shape::MultiPolygon(multipolygon) => prepared.relate(&multipolygon.to_geo()),
        }
    }
}

/// A polyline whose topology implicitly closes: computing segments appends
/// a closing segment from the last location back to the first.
///
/// Self-intersecting polygons are representable, but the area and
/// orientation operations are only defined for simple ones; that
/// precondition is a caller contract, not runtime-checked.
#[derive(Debug, Clone)]
pub struct Polygon {
    outline: PolyLine,
    // Prepared planar-engine form, a pure function of the outline. Computed
    // lazily; racing threads recompute the same value.
    prepared: Arc<OnceLock<geo::Polygon<f64>>>,
}

impl Polygon {
    /// Creates a polygon from its outline vertices. The closing segment is
    /// implicit and must not be repeated in `points`.
    ///
    /// # Errors
    ///
    /// Returns an error if `points` is empty.
    pub fn new(points: Vec<Location>) -> Result<Self> {
        Ok(Self::from_outline(PolyLine::new(points)?))
    }

    /// Wraps an existing polyline as a closed polygon.
    #[must_use]
    pub fn from_outline(outline: PolyLine) -> Self {
        Self {
            outline,
            prepared: Arc::new(OnceLock::new()),
        }
    }

    /// The open outline, without the implicit closing segment.
    #[must_use]
    pub fn outline(&self) -> &PolyLine {
        &self.outline
    }

    /// The outline segments plus the implicit closing segment.
    #[must_use]
    pub fn closed_segments(&self) -> Vec<Segment> {
        let mut segments = self.outline.segments();
        if self.outline.len() > 1 {
            segments.push(Segment::new(self.outline.last(), self.outline.first()));
        }
        segments
    }

    /// Axis-aligned bounding rectangle of the outline.
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        self.outline.bounds()
    }

    /// True when any two non-adjacent closed-loop segments intersect. The
    /// first/last wraparound pair shares an endpoint and is skipped.
    #[must_use]
    pub fn self_intersects(&self) -> bool {
        self.outline.self_intersects_impl(true)
    }

    /// All points where non-adjacent closed-loop segments cross.
    #[must_use]
    pub fn self_intersections(&self) -> Vec<Location> {
        self.outline.self_intersections_impl(true)
    }

    /// Planar (shoelace) area, accumulated exactly on raw dm7 integers.
    ///
    /// Only defined for simple polygons.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn surface(&self) -> Surface {
        let mut sum: i128 = 0;
        for segment in self.closed_segments() {
            let lon1 = segment.start().longitude().as_dm7();
            let lon2 = segment.end().longitude().as_dm7();
            let lat1 = segment.start().latitude().as_dm7();
            let lat2 = segment.end().latitude().as_dm7();
            sum += i128::from(lon1 + lon2) * i128::from(lat1 - lat2);
        }
        Surface::from_dm7_squared((sum / 2).unsigned_abs() as u64)
    }

    /// Approximate area on the sphere, accumulating
    /// `Δλ · (2 + sin φ1 + sin φ2)` around the closed loop.
    ///
    /// Only valid for simple, non-overlapping polygons; malformed input
    /// silently yields a wrong area.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn surface_on_sphere(&self) -> Surface {
        let radians_squared = self.spherical_excess_sum().abs() / 2.0;
        let dm7_per_radian = 1e7 * 180.0 / std::f64::consts::PI;
        Surface::from_dm7_squared((radians_squared * dm7_per_radian * dm7_per_radian).round()
            as u64)
    }

    /// Orientation from the sign of the spherical-excess sum over the
    /// closed loop (each vertex pair forms a triple with the pole); a
    /// non-positive sum means clockwise.
    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        self.spherical_excess_sum() <= 0.0
    }

    /// Walks the closed-loop headings and counts a side each time the
    /// heading change between consecutive non-degenerate segments exceeds
    /// `threshold_degrees`. True only when exactly `n - 1` changes are
    /// observed.
    #[must_use]
    pub fn is_approximately_n_sided(&self, n: usize, threshold_degrees: f64) -> bool {
        if n == 0 {
            return false;
        }
        let threshold_dm7 = crate::angle::degrees_to_dm7(threshold_degrees);
        let headings: Vec<_> = self
            .closed_segments()
            .into_iter()
            .filter(|segment| !segment.is_point())
            .filter_map(|segment| segment.heading().ok())
            .collect();
        let changes = headings
            .windows(2)
            .filter(|pair| pair[0].difference(pair[1]) > threshold_dm7)
            .count();
        changes == n - 1
    }

    /// Boundary-inclusive full containment of `shape`, answered by the
    /// planar-geometry engine's covers predicate on the prepared form of
    /// this polygon.
    #[must_use]
    pub fn fully_geometrically_encloses(&self, shape: Shape<'_>) -> bool {
        shape.relate_to(self).is_covers()
    }

    /// True when this polygon and `shape` share any point, boundaries
    /// included; answered by the planar-geometry engine.
    #[must_use]
    pub fn overlaps(&self, shape: Shape<'_>) -> bool {
        shape.relate_to(self).is_intersects()
    }

    /// The planar engine's native form of this polygon, in degrees.
    #[must_use]
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        geo::Polygon::new(geo_line_string(&self.outline), Vec::new())
    }

    pub(crate) fn prepared(&self) -> &geo::Polygon<f64> {
        self.prepared.get_or_init(|| self.to_geo())
    }

    /// Signed `Σ (λ1 - λ2) · (2 + sin φ1 + sin φ2)` over the closed loop,
    /// in radians; positive counter-clockwise.
    fn spherical_excess_sum(&self) -> f64 {
        let mut sum = 0.0;
        for segment in self.closed_segments() {
            let lambda1 = segment.start().longitude().as_radians();
            let lambda2 = segment.end().longitude().as_radians();
            let phi1 = segment.start().latitude().as_radians();
            let phi2 = segment.end().latitude().as_radians();
            sum += (lambda1 - lambda2) * (2.0 + phi1.sin() + phi2.sin());
        }
        sum
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.outline == other.outline
    }
}

impl Eq for Polygon {}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.outline.fmt(f)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn polygon(coordinates: &[(f64, f64)]) -> Polygon {
        Polygon::new(
            coordinates
                .iter()
                .map(|&(lat, lon)| Location::from_degrees(lat, lon).unwrap())
                .collect(),
        )
        .unwrap()
    }

    /// Counter-clockwise unit square on the equator.
    fn unit_square() -> Polygon {
        polygon(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn closed_segments_append_the_closing_edge() {
        let square = unit_square();
        let segments = square.closed_segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].start(), square.outline().last());
        assert_eq!(segments[3].end(), square.outline().first());
    }

    // ── area tests ──

    #[test]
    fn shoelace_surface_is_exact() {
        // One square degree: (10^7 dm7)^2.
        assert_eq!(
            unit_square().surface(),
            Surface::from_dm7_squared(100_000_000_000_000)
        );
    }

    #[test]
    fn shoelace_is_direction_insensitive() {
        let square = unit_square();
        let reversed = Polygon::from_outline(square.outline().reversed());
        assert_eq!(square.surface(), reversed.surface());
    }

    #[test]
    fn spherical_surface_close_to_planar_near_equator() {
        let planar = unit_square().surface().as_square_degrees();
        let spherical = unit_square().surface_on_sphere().as_square_degrees();
        assert!(
            (planar - spherical).abs() / planar < 0.01,
            "planar={planar} spherical={spherical}"
        );
    }

    // ── orientation tests ──

    #[test]
    fn counter_clockwise_square_is_not_clockwise() {
        assert!(!unit_square().is_clockwise());
    }

    #[test]
    fn reversed_square_is_clockwise() {
        let reversed = Polygon::from_outline(unit_square().outline().reversed());
        assert!(reversed.is_clockwise());
    }

    // ── self-intersection tests ──

    #[test]
    fn convex_quadrilateral_is_simple() {
        assert!(!unit_square().self_intersects());
    }

    #[test]
    fn bowtie_self_intersects() {
        // A figure-eight: the closing topology makes two edges cross.
        let bowtie = polygon(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(bowtie.self_intersects());
        assert_eq!(bowtie.self_intersections().len(), 1);
    }

    // ── n-sidedness tests ──

    #[test]
    fn square_is_approximately_four_sided() {
        assert!(unit_square().is_approximately_n_sided(4, 30.0));
        assert!(!unit_square().is_approximately_n_sided(3, 30.0));
        assert!(!unit_square().is_approximately_n_sided(5, 30.0));
    }

    #[test]
    fn gentle_bends_below_threshold_are_not_sides() {
        // A near-straight fan of shallow turns reads as one side.
        let sliver = polygon(&[
            (0.0, 0.0),
            (0.01, 1.0),
            (0.03, 2.0),
            (0.06, 3.0),
        ]);
        assert!(!sliver.is_approximately_n_sided(4, 30.0));
    }

    // ── engine-backed containment tests ──

    #[test]
    fn covers_interior_and_boundary_points() {
        let square = unit_square();
        let interior = Location::from_degrees(0.5, 0.5).unwrap();
        let boundary = Location::from_degrees(0.0, 0.5).unwrap();
        let outside = Location::from_degrees(2.0, 2.0).unwrap();
        assert!(square.fully_geometrically_encloses(Shape::Location(&interior)));
        assert!(square.fully_geometrically_encloses(Shape::Location(&boundary)));
        assert!(!square.fully_geometrically_encloses(Shape::Location(&outside)));
    }

    #[test]
    fn covers_contained_polygon() {
        let outer = polygon(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let inner = polygon(&[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)]);
        assert!(outer.fully_geometrically_encloses(Shape::Polygon(&inner)));
        assert!(!inner.fully_geometrically_encloses(Shape::Polygon(&outer)));
    }

    #[test]
    fn intersects_crossing_polyline() {
        let square = unit_square();
        let crossing = PolyLine::new(vec![
            Location::from_degrees(0.5, -1.0).unwrap(),
            Location::from_degrees(0.5, 2.0).unwrap(),
        ])
        .unwrap();
        let distant = PolyLine::new(vec![
            Location::from_degrees(5.0, 5.0).unwrap(),
            Location::from_degrees(6.0, 6.0).unwrap(),
        ])
        .unwrap();
        assert!(square.overlaps(Shape::PolyLine(&crossing)));
        assert!(!square.fully_geometrically_encloses(Shape::PolyLine(&crossing)));
        assert!(!square.overlaps(Shape::PolyLine(&distant)));
    }

    #[test]
    fn overlapping_polygons_intersect_without_covering() {
        let a = polygon(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let b = polygon(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)]);
        assert!(a.overlaps(Shape::Polygon(&b)));
        assert!(!a.fully_geometrically_encloses(Shape::Polygon(&b)));
    }
}
