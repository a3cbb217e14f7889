use std::fmt;

use crate::angle::{Angle, Heading};
use crate::error::Result;
use crate::location::{Distance, Location};

/// A two-point primitive: the shortest polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    start: Location,
    end: Location,
}

impl Segment {
    /// Creates a segment between two locations. A zero-length segment
    /// (identical endpoints) is representable; it never intersects
    /// anything.
    #[must_use]
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// The first endpoint.
    #[must_use]
    pub fn start(&self) -> Location {
        self.start
    }

    /// The second endpoint.
    #[must_use]
    pub fn end(&self) -> Location {
        self.end
    }

    /// True when both endpoints coincide.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Physical length of this segment.
    #[must_use]
    pub fn length(&self) -> Distance {
        self.start.distance_to(&self.end)
    }

    /// Initial bearing from start to end.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-length segment, where the bearing is
    /// undefined.
    pub fn heading(&self) -> Result<Heading> {
        self.start.heading_to(&self.end)
    }

    /// Great-circle midpoint of this segment.
    #[must_use]
    pub fn mid_point(&self) -> Location {
        self.start.mid_point(&self.end)
    }

    /// The same segment walked in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Segment {
        Segment {
            start: self.end,
            end: self.start,
        }
    }

    /// Direction-insensitive identity, for undirected segment-set
    /// comparisons: a segment equals its reverse.
    pub(crate) fn undirected_key(&self) -> (i64, i64) {
        let a = self.start.as_packed();
        let b = self.end.as_packed();
        (a.min(b), a.max(b))
    }

    /// Exact boolean intersection test on dm7 integers.
    ///
    /// A Franklin-Antonio style test: the parametric numerators and
    /// denominator are signed-area cross products of dm7 deltas, so the
    /// answer carries no floating-point error. Parallel segments are
    /// classified by collinearity, and collinear segments by axis-aligned
    /// projection overlap. Should any intermediate product overflow 64
    /// bits, the test silently degrades to an equivalent double-precision
    /// version; overflow never surfaces to the caller.
    ///
    /// Zero-length segments never intersect, by definition.
    #[must_use]
    pub fn intersects(&self, other: &Segment) -> bool {
        if self.is_point() || other.is_point() {
            return false;
        }
        self.intersects_exact(other)
            .unwrap_or_else(|| self.intersects_approximate(other))
    }

    /// Exact intersection point of two segments, when a point value rather
    /// than a boolean is needed.
    ///
    /// Solves the parametric line-line system in floating degrees; returns
    /// `None` when the segments are parallel or either parameter falls
    /// outside [0, 1].
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> Option<Location> {
        let (ax, ay) = degree_pair(&self.start);
        let (bx, by) = degree_pair(&self.end);
        let (cx, cy) = degree_pair(&other.start);
        let (dx, dy) = degree_pair(&other.end);

        let dax = bx - ax;
        let day = by - ay;
        let dbx = dx - cx;
        let dby = dy - cy;

        let cross = dax * dby - day * dbx;
        if cross.abs() < 1e-18 {
            return None;
        }

        let t = ((cx - ax) * dby - (cy - ay) * dbx) / cross;
        let u = ((cx - ax) * day - (cy - ay) * dax) / cross;

        // A small epsilon keeps endpoint touches included.
        let eps = 1e-12;
        if t < -eps || t > 1.0 + eps || u < -eps || u > 1.0 + eps {
            return None;
        }
        let t = t.clamp(0.0, 1.0);
        Location::from_degrees(ay + day * t, ax + dax * t).ok()
    }

    /// Integer test; `None` means an intermediate product overflowed.
    fn intersects_exact(&self, other: &Segment) -> Option<bool> {
        let (x1, y1) = dm7_pair(&self.start);
        let (x2, y2) = dm7_pair(&self.end);
        let (x3, y3) = dm7_pair(&other.start);
        let (x4, y4) = dm7_pair(&other.end);

        // Deltas always fit i64; the cross products may not.
        let ax = x2 - x1;
        let ay = y2 - y1;
        let bx = x3 - x4;
        let by = y3 - y4;
        let cx = x1 - x3;
        let cy = y1 - y3;

        let denominator = ay.checked_mul(bx)?.checked_sub(ax.checked_mul(by)?)?;
        let alpha = by.checked_mul(cx)?.checked_sub(bx.checked_mul(cy)?)?;
        let beta = ax.checked_mul(cy)?.checked_sub(ay.checked_mul(cx)?)?;

        if denominator == 0 {
            if alpha != 0 || beta != 0 {
                // Parallel, on distinct lines.
                return Some(false);
            }
            // Collinear: the segments touch iff their projections overlap
            // on both axes.
            return Some(
                ranges_overlap(x1, x2, x3, x4) && ranges_overlap(y1, y2, y3, y4),
            );
        }
        if denominator > 0 {
            Some((0..=denominator).contains(&alpha) && (0..=denominator).contains(&beta))
        } else {
            Some((denominator..=0).contains(&alpha) && (denominator..=0).contains(&beta))
        }
    }

    /// Double-precision rendition of the exact test, used only when the
    /// integer products overflow. Correctness degrades gracefully here.
    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    fn intersects_approximate(&self, other: &Segment) -> bool {
        let (x1, y1) = dm7_pair(&self.start);
        let (x2, y2) = dm7_pair(&self.end);
        let (x3, y3) = dm7_pair(&other.start);
        let (x4, y4) = dm7_pair(&other.end);

        let ax = (x2 - x1) as f64;
        let ay = (y2 - y1) as f64;
        let bx = (x3 - x4) as f64;
        let by = (y3 - y4) as f64;
        let cx = (x1 - x3) as f64;
        let cy = (y1 - y3) as f64;

        let denominator = ay * bx - ax * by;
        let alpha = by * cx - bx * cy;
        let beta = ax * cy - ay * cx;

        if denominator == 0.0 {
            if alpha != 0.0 || beta != 0.0 {
                return false;
            }
            return ranges_overlap(x1, x2, x3, x4) && ranges_overlap(y1, y2, y3, y4);
        }
        if denominator > 0.0 {
            (0.0..=denominator).contains(&alpha) && (0.0..=denominator).contains(&beta)
        } else {
            (denominator..=0.0).contains(&alpha) && (denominator..=0.0).contains(&beta)
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

fn dm7_pair(location: &Location) -> (i64, i64) {
    (
        location.longitude().as_dm7(),
        location.latitude().as_dm7(),
    )
}

fn degree_pair(location: &Location) -> (f64, f64) {
    (
        location.longitude().as_degrees(),
        location.latitude().as_degrees(),
    )
}

/// One-dimensional interval overlap, endpoints included.
fn ranges_overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> bool {
    a1.min(a2).max(b1.min(b2)) <= a1.max(a2).min(b1.max(b2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn segment(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Segment {
        Segment::new(
            Location::from_degrees(lat1, lon1).unwrap(),
            Location::from_degrees(lat2, lon2).unwrap(),
        )
    }

    // ── boolean intersection tests ──

    #[test]
    fn crossing_segments_intersect() {
        let horizontal = segment(0.0, 0.0, 0.0, 10.0);
        let vertical = segment(-5.0, 5.0, 5.0, 5.0);
        assert!(horizontal.intersects(&vertical));
        assert!(vertical.intersects(&horizontal));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let lower = segment(0.0, 0.0, 0.0, 10.0);
        let upper = segment(1.0, 0.0, 1.0, 10.0);
        assert!(!lower.intersects(&upper));
        assert!(!upper.intersects(&lower));
    }

    #[test]
    fn endpoint_touch_intersects() {
        let a = segment(0.0, 0.0, 1.0, 1.0);
        let b = segment(1.0, 1.0, 0.0, 2.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn collinear_overlapping_intersect() {
        let long = segment(0.0, 0.0, 0.0, 10.0);
        let inner = segment(0.0, 4.0, 0.0, 6.0);
        assert!(long.intersects(&inner));
    }

    #[test]
    fn collinear_disjoint_do_not_intersect() {
        let west = segment(0.0, 0.0, 0.0, 1.0);
        let east = segment(0.0, 2.0, 0.0, 3.0);
        assert!(!west.intersects(&east));
    }

    #[test]
    fn zero_length_never_intersects() {
        let point = segment(0.0, 5.0, 0.0, 5.0);
        let through = segment(0.0, 0.0, 0.0, 10.0);
        assert!(!point.intersects(&through));
        assert!(!through.intersects(&point));
        assert!(!point.intersects(&point));
    }

    #[test]
    fn near_miss_does_not_intersect() {
        // Passes one dm7 unit away.
        let horizontal = Segment::new(
            Location::from_dm7(0, 0).unwrap(),
            Location::from_dm7(0, 100).unwrap(),
        );
        let above = Segment::new(
            Location::from_dm7(1, 0).unwrap(),
            Location::from_dm7(1, 100).unwrap(),
        );
        assert!(!horizontal.intersects(&above));
    }

    #[test]
    fn antimeridian_spanning_coordinates_stay_exact() {
        // Deltas close to a full revolution stress the 64-bit products;
        // these still fit and must stay on the exact path.
        let west_to_east = segment(-80.0, -179.9999999, 80.0, 179.9999999);
        let equator = segment(0.0, -179.9999999, 0.0, 179.9999999);
        assert!(west_to_east.intersects(&equator));
    }

    // ── intersection point tests ──

    #[test]
    fn crossing_point_is_computed() {
        let horizontal = segment(0.0, 0.0, 0.0, 10.0);
        let vertical = segment(-5.0, 5.0, 5.0, 5.0);
        let point = horizontal.intersection(&vertical).unwrap();
        assert_eq!(point.latitude().as_dm7(), 0);
        assert_eq!(point.longitude().as_dm7(), 50_000_000);
    }

    #[test]
    fn parallel_have_no_intersection_point() {
        let lower = segment(0.0, 0.0, 0.0, 10.0);
        let upper = segment(1.0, 0.0, 1.0, 10.0);
        assert!(lower.intersection(&upper).is_none());
    }

    #[test]
    fn disjoint_have_no_intersection_point() {
        let a = segment(0.0, 0.0, 0.0, 1.0);
        let b = segment(1.0, 5.0, 2.0, 5.0);
        assert!(a.intersection(&b).is_none());
    }

    // ── derived values ──

    #[test]
    fn reversal_preserves_undirected_key() {
        let forward = segment(1.0, 2.0, 3.0, 4.0);
        assert_eq!(forward.undirected_key(), forward.reversed().undirected_key());
        assert_ne!(forward, forward.reversed());
    }

    #[test]
    fn heading_of_degenerate_segment_fails() {
        let point = segment(1.0, 1.0, 1.0, 1.0);
        assert!(point.heading().is_err());
        assert!(point.is_point());
    }
}
