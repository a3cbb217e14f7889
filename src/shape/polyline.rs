use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{GeoCoreError, GeometryError, Result};
use crate::location::{Distance, Location};

use super::{Rectangle, Segment};

/// An immutable ordered sequence of at least one location.
///
/// Equality is order-sensitive sequence equality; see
/// [`PolyLine::equals_shape`] for direction-insensitive comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolyLine {
    points: Vec<Location>,
}

impl PolyLine {
    /// Creates a polyline from an ordered sequence of locations.
    ///
    /// # Errors
    ///
    /// Returns an error if `points` is empty.
    pub fn new(points: Vec<Location>) -> Result<Self> {
        if points.is_empty() {
            return Err(GeometryError::EmptyLocationSequence.into());
        }
        Ok(Self { points })
    }

    /// Internal constructor for call sites that can guarantee a non-empty
    /// sequence.
    pub(crate) fn from_nonempty(points: Vec<Location>) -> Self {
        debug_assert!(!points.is_empty());
        Self { points }
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: the one-location minimum is a construction invariant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The underlying locations, in order. This ordered iteration is the
    /// boundary contract for external WKT/WKB serializers.
    #[must_use]
    pub fn points(&self) -> &[Location] {
        &self.points
    }

    /// Iterates the locations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.points.iter()
    }

    /// The first location.
    #[must_use]
    pub fn first(&self) -> Location {
        self.points[0]
    }

    /// The last location.
    #[must_use]
    pub fn last(&self) -> Location {
        self.points[self.points.len() - 1]
    }

    /// The location at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of bounds.
    pub fn at(&self, index: usize) -> Result<Location> {
        self.points.get(index).copied().ok_or_else(|| {
            GeometryError::IndexOutOfBounds {
                index,
                len: self.points.len(),
            }
            .into()
        })
    }

    /// One segment per consecutive location pair. A single-location
    /// polyline yields one degenerate same-point segment.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        if self.points.len() == 1 {
            return vec![Segment::new(self.points[0], self.points[0])];
        }
        self.points
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect()
    }

    /// Total physical length, segment by segment.
    #[must_use]
    pub fn length(&self) -> Distance {
        let meters = self
            .points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]).as_meters())
            .sum();
        Distance::from_meters(meters)
    }

    /// Axis-aligned bounding rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        Rectangle::spanning(&self.points)
    }

    /// The polyline walked in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> PolyLine {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// True when any two non-adjacent segments intersect.
    #[must_use]
    pub fn self_intersects(&self) -> bool {
        self.self_intersects_impl(false)
    }

    /// All points where non-adjacent segments cross, deduplicated.
    #[must_use]
    pub fn self_intersections(&self) -> Vec<Location> {
        self.self_intersections_impl(false)
    }

    /// Shape equality: each polyline's undirected segment set is a
    /// superset of the other's, so reversed copies compare equal.
    #[must_use]
    pub fn equals_shape(&self, other: &PolyLine) -> bool {
        let ours = self.undirected_segment_keys();
        let theirs = other.undirected_segment_keys();
        ours.is_superset(&theirs) && theirs.is_superset(&ours)
    }

    /// True when either polyline's undirected segment set contains the
    /// other's, so direction reversal and trailing-segment differences
    /// still compare as overlapping.
    #[must_use]
    pub fn overlaps_shape_of(&self, other: &PolyLine) -> bool {
        let ours = self.undirected_segment_keys();
        let theirs = other.undirected_segment_keys();
        ours.is_superset(&theirs) || theirs.is_superset(&ours)
    }

    /// Concatenates `other` after this polyline.
    ///
    /// # Errors
    ///
    /// Returns an error unless this polyline's last location equals
    /// `other`'s first.
    pub fn append(&self, other: &PolyLine) -> Result<PolyLine> {
        if self.last() != other.first() {
            return Err(GeometryError::MismatchedEndpoints {
                expected: self.last().to_string(),
                found: other.first().to_string(),
            }
            .into());
        }
        let mut points = self.points.clone();
        points.extend_from_slice(&other.points[1..]);
        Ok(Self { points })
    }

    /// Concatenates `other` before this polyline.
    ///
    /// # Errors
    ///
    /// Returns an error unless `other`'s last location equals this
    /// polyline's first.
    pub fn prepend(&self, other: &PolyLine) -> Result<PolyLine> {
        other.append(self)
    }

    /// The location a fraction `ratio` of the total length from the start,
    /// walking accumulated segment lengths and interpolating along the
    /// containing segment's great circle.
    ///
    /// # Errors
    ///
    /// Returns an error if `ratio` is outside [0, 1].
    pub fn offset_from_start(&self, ratio: f64) -> Result<Location> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(GeometryError::OffsetOutOfRange { ratio }.into());
        }
        let total = self.length().as_meters();
        if total == 0.0 {
            return Ok(self.first());
        }
        let mut remaining = total * ratio;
        for segment in self.segments() {
            let length = segment.length().as_meters();
            if length == 0.0 {
                continue;
            }
            if remaining <= length {
                let heading = segment.heading()?;
                return Ok(segment
                    .start()
                    .shift_along_great_circle(heading, Distance::from_meters(remaining)));
            }
            remaining -= length;
        }
        // Floating-point slack walked past the final segment.
        Ok(self.last())
    }

    /// Drops `from_start` leading and `from_end` trailing locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the truncation would remove every location.
    pub fn truncate(&self, from_start: usize, from_end: usize) -> Result<PolyLine> {
        let len = self.points.len();
        if from_start.saturating_add(from_end) >= len {
            return Err(GeometryError::InvalidTruncation {
                from_start,
                from_end,
                len,
            }
            .into());
        }
        Ok(Self {
            points: self.points[from_start..len - from_end].to_vec(),
        })
    }

    fn undirected_segment_keys(&self) -> HashSet<(i64, i64)> {
        self.segments()
            .iter()
            .map(Segment::undirected_key)
            .collect()
    }

    /// Scans non-adjacent segment pairs. Consecutive segments share an
    /// endpoint by construction, as does the first/last pair when the
    /// polyline is logically closed (a polygon outline); those pairs are
    /// skipped since a shared endpoint is not a self-intersection.
    pub(crate) fn self_intersects_impl(&self, closed: bool) -> bool {
        let segments = self.scan_segments(closed);
        for (i, a) in segments.iter().enumerate() {
            for (j, b) in segments.iter().enumerate().skip(i + 1) {
                if Self::adjacent(i, j, segments.len(), closed) {
                    continue;
                }
                if a.intersects(b) {
                    return true;
                }
            }
        }
        false
    }

    pub(crate) fn self_intersections_impl(&self, closed: bool) -> Vec<Location> {
        let segments = self.scan_segments(closed);
        let mut crossings = BTreeSet::new();
        for (i, a) in segments.iter().enumerate() {
            for (j, b) in segments.iter().enumerate().skip(i + 1) {
                if Self::adjacent(i, j, segments.len(), closed) {
                    continue;
                }
                if let Some(location) = a.intersection(b) {
                    crossings.insert(location);
                }
            }
        }
        crossings.into_iter().collect()
    }

    fn scan_segments(&self, closed: bool) -> Vec<Segment> {
        let mut segments = self.segments();
        if closed && self.points.len() > 2 {
            segments.push(Segment::new(self.last(), self.first()));
        }
        segments
    }

    fn adjacent(i: usize, j: usize, count: usize, closed: bool) -> bool {
        j == i + 1 || (closed && i == 0 && j == count - 1)
    }
}

impl<'a> IntoIterator for &'a PolyLine {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl fmt::Display for PolyLine {
    /// Colon-joined compact locations.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for point in &self.points {
            if !first {
                write!(f, ":")?;
            }
            write!(f, "{point}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for PolyLine {
    type Err = GeoCoreError;

    fn from_str(s: &str) -> Result<Self> {
        let points = s
            .split(':')
            .map(str::parse)
            .collect::<Result<Vec<Location>>>()?;
        Self::new(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::angle::Angle;

    use super::*;

    fn polyline(coordinates: &[(f64, f64)]) -> PolyLine {
        PolyLine::new(
            coordinates
                .iter()
                .map(|&(lat, lon)| Location::from_degrees(lat, lon).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_sequence() {
        assert!(PolyLine::new(Vec::new()).is_err());
    }

    #[test]
    fn single_point_has_one_degenerate_segment() {
        let point = polyline(&[(1.0, 2.0)]);
        let segments = point.segments();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_point());
        assert_eq!(point.length().as_meters(), 0.0);
    }

    #[test]
    fn segments_follow_consecutive_pairs() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let segments = line.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].end(), segments[1].start());
    }

    #[test]
    fn indexing_is_checked() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        assert!(line.at(1).is_ok());
        assert!(line.at(2).is_err());
    }

    // ── self-intersection tests ──

    #[test]
    fn straight_line_does_not_self_intersect() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (1.0, 2.0)]);
        assert!(!line.self_intersects());
        assert!(line.self_intersections().is_empty());
    }

    #[test]
    fn crossing_line_self_intersects() {
        // Doubles back over its first segment.
        let line = polyline(&[(0.0, 0.0), (0.0, 2.0), (1.0, 1.0), (-1.0, 1.0)]);
        assert!(line.self_intersects());
        let crossings = line.self_intersections();
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].latitude().as_dm7(), 0);
        assert_eq!(crossings[0].longitude().as_dm7(), 10_000_000);
    }

    // ── shape comparison tests ──

    #[test]
    fn reversed_polylines_are_shape_equal() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let reversed = line.reversed();
        assert_ne!(line, reversed);
        assert!(line.equals_shape(&reversed));
        assert!(line.overlaps_shape_of(&reversed));
    }

    #[test]
    fn trailing_segment_overlaps_but_is_not_equal() {
        let short = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        let long = polyline(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        assert!(long.overlaps_shape_of(&short));
        assert!(!long.equals_shape(&short));
    }

    #[test]
    fn disjoint_polylines_do_not_overlap_shapes() {
        let a = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        let b = polyline(&[(5.0, 5.0), (5.0, 6.0)]);
        assert!(!a.overlaps_shape_of(&b));
    }

    // ── append / prepend tests ──

    #[test]
    fn append_requires_matching_endpoints() {
        let head = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        let tail = polyline(&[(0.0, 1.0), (1.0, 1.0)]);
        let joined = head.append(&tail).unwrap();
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.first(), head.first());
        assert_eq!(joined.last(), tail.last());

        let disjoint = polyline(&[(5.0, 5.0), (6.0, 6.0)]);
        assert!(head.append(&disjoint).is_err());
    }

    #[test]
    fn prepend_requires_matching_endpoints() {
        let tail = polyline(&[(0.0, 1.0), (1.0, 1.0)]);
        let head = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        let joined = tail.prepend(&head).unwrap();
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.first(), head.first());

        assert!(head.prepend(&tail).is_err());
    }

    // ── offset / truncate tests ──

    #[test]
    fn offset_walks_the_length() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        let start = line.offset_from_start(0.0).unwrap();
        assert_eq!(start, line.first());

        let halfway = line.offset_from_start(0.5).unwrap();
        assert!((halfway.longitude().as_degrees() - 0.5).abs() < 1e-6);
        assert!(halfway.latitude().as_degrees().abs() < 1e-6);

        let end = line.offset_from_start(1.0).unwrap();
        assert!((end.longitude().as_degrees() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn offset_rejects_out_of_range_ratio() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        assert!(line.offset_from_start(-0.1).is_err());
        assert!(line.offset_from_start(1.1).is_err());
    }

    #[test]
    fn truncate_drops_both_ends() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (0.0, 3.0)]);
        let truncated = line.truncate(1, 1).unwrap();
        assert_eq!(truncated.len(), 2);
        assert_eq!(truncated.first(), line.at(1).unwrap());
        assert_eq!(truncated.last(), line.at(2).unwrap());
    }

    #[test]
    fn truncate_cannot_empty_the_line() {
        let line = polyline(&[(0.0, 0.0), (0.0, 1.0)]);
        assert!(line.truncate(1, 1).is_err());
        assert!(line.truncate(3, 0).is_err());
        assert!(line.truncate(0, 0).is_ok());
    }

    // ── string round-trip ──

    #[test]
    fn compact_string_round_trips() {
        let line = polyline(&[(0.0, 0.0), (0.5, 1.25), (1.0, 2.5)]);
        let reparsed: PolyLine = line.to_string().parse().unwrap();
        assert_eq!(line, reparsed);
    }

    #[test]
    fn bounds_cover_all_points() {
        let line = polyline(&[(0.0, 0.0), (2.0, -1.0), (1.0, 3.0)]);
        let bounds = line.bounds();
        assert_eq!(bounds.lower_left().latitude().as_dm7(), 0);
        assert_eq!(bounds.lower_left().longitude().as_dm7(), -10_000_000);
        assert_eq!(bounds.upper_right().latitude().as_dm7(), 20_000_000);
        assert_eq!(bounds.upper_right().longitude().as_dm7(), 30_000_000);
    }
}
