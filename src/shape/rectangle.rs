use std::fmt;
use std::str::FromStr;

use crate::angle::{Angle, Heading, Latitude, Longitude};
use crate::error::{CoordinateError, GeoCoreError, GeometryError, Result};
use crate::location::{Distance, Location};

use super::{PolyLine, Polygon, Segment, Surface};

/// An axis-aligned bounding box stored as two corners.
///
/// Invariants: the lower-left longitude never exceeds the upper-right
/// longitude, so a rectangle never spans the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    lower_left: Location,
    upper_right: Location,
}

impl Rectangle {
    /// Creates a rectangle from its lower-left and upper-right corners.
    ///
    /// # Errors
    ///
    /// Returns an error if `lower_left` is north of or east of
    /// `upper_right`.
    pub fn for_corners(lower_left: Location, upper_right: Location) -> Result<Self> {
        if lower_left.latitude().as_dm7() > upper_right.latitude().as_dm7()
            || lower_left.longitude().as_dm7() > upper_right.longitude().as_dm7()
        {
            return Err(GeometryError::InvertedCorners {
                lower_left: lower_left.to_string(),
                upper_right: upper_right.to_string(),
            }
            .into());
        }
        Ok(Self {
            lower_left,
            upper_right,
        })
    }

    /// Smallest rectangle covering every location in `locations`.
    ///
    /// # Errors
    ///
    /// Returns an error if `locations` is empty.
    pub fn from_locations<I>(locations: I) -> Result<Self>
    where
        I: IntoIterator<Item = Location>,
    {
        let locations: Vec<Location> = locations.into_iter().collect();
        if locations.is_empty() {
            return Err(GeometryError::EmptyLocationSequence.into());
        }
        Ok(Self::spanning(&locations))
    }

    /// Bounding box of a non-empty slice; min/max accumulation on raw dm7.
    pub(crate) fn spanning(locations: &[Location]) -> Self {
        let mut south = Latitude::MAXIMUM_DM7;
        let mut north = Latitude::MINIMUM_DM7;
        let mut west = Longitude::MAXIMUM_DM7;
        let mut east = Longitude::MINIMUM_DM7;
        for location in locations {
            south = south.min(location.latitude().as_dm7());
            north = north.max(location.latitude().as_dm7());
            west = west.min(location.longitude().as_dm7());
            east = east.max(location.longitude().as_dm7());
        }
        Self {
            lower_left: Location::new(
                Latitude::clamped_dm7(south),
                Longitude::clamped_dm7(west),
            ),
            upper_right: Location::new(
                Latitude::clamped_dm7(north),
                Longitude::clamped_dm7(east),
            ),
        }
    }

    /// The south-west corner.
    #[must_use]
    pub fn lower_left(&self) -> Location {
        self.lower_left
    }

    /// The north-east corner.
    #[must_use]
    pub fn upper_right(&self) -> Location {
        self.upper_right
    }

    /// The north-west corner, derived on demand.
    #[must_use]
    pub fn upper_left(&self) -> Location {
        Location::new(self.upper_right.latitude(), self.lower_left.longitude())
    }

    /// The south-east corner, derived on demand.
    #[must_use]
    pub fn lower_right(&self) -> Location {
        Location::new(self.lower_left.latitude(), self.upper_right.longitude())
    }

    /// Angular width in dm7.
    #[must_use]
    pub fn width(&self) -> i64 {
        self.upper_right.longitude().as_dm7() - self.lower_left.longitude().as_dm7()
    }

    /// Angular height in dm7.
    #[must_use]
    pub fn height(&self) -> i64 {
        self.upper_right.latitude().as_dm7() - self.lower_left.latitude().as_dm7()
    }

    /// Exact angular area: width times height, no floating point involved.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn surface(&self) -> Surface {
        Surface::from_dm7_squared(self.width() as u64 * self.height() as u64)
    }

    /// True when `location` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        let lat = location.latitude().as_dm7();
        let lon = location.longitude().as_dm7();
        lat >= self.lower_left.latitude().as_dm7()
            && lat <= self.upper_right.latitude().as_dm7()
            && lon >= self.lower_left.longitude().as_dm7()
            && lon <= self.upper_right.longitude().as_dm7()
    }

    /// Boundary-inclusive full containment of `other`.
    #[must_use]
    pub fn fully_geometrically_encloses(&self, other: &Rectangle) -> bool {
        self.contains(&other.lower_left) && self.contains(&other.upper_right)
    }

    /// True when the two rectangles share any point, boundaries included.
    #[must_use]
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        self.lower_left.latitude().as_dm7() <= other.upper_right.latitude().as_dm7()
            && other.lower_left.latitude().as_dm7() <= self.upper_right.latitude().as_dm7()
            && self.lower_left.longitude().as_dm7() <= other.upper_right.longitude().as_dm7()
            && other.lower_left.longitude().as_dm7() <= self.upper_right.longitude().as_dm7()
    }

    /// True when `polyline` has a vertex inside this rectangle or an edge
    /// crossing its boundary.
    #[must_use]
    pub fn intersects(&self, polyline: &PolyLine) -> bool {
        if polyline.iter().any(|location| self.contains(location)) {
            return true;
        }
        let outline = self.outline_segments();
        polyline
            .segments()
            .iter()
            .any(|segment| outline.iter().any(|edge| edge.intersects(segment)))
    }

    /// Overlap of two rectangles, through a degenerate-case ladder:
    /// identical rectangles return either operand, containment returns the
    /// contained one, and partial overlap takes the minimal rectangle
    /// enclosing the boundary intersection points together with the
    /// corners each rectangle contributes inside the other.
    #[must_use]
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        if self == other || other.fully_geometrically_encloses(self) {
            return Some(*self);
        }
        if self.fully_geometrically_encloses(other) {
            return Some(*other);
        }
        if !self.overlaps(other) {
            return None;
        }

        let mut witnesses: Vec<Location> = Vec::new();
        for ours in &self.outline_segments() {
            for theirs in &other.outline_segments() {
                if let Some(crossing) = ours.intersection(theirs) {
                    if !witnesses.contains(&crossing) {
                        witnesses.push(crossing);
                    }
                }
            }
        }
        for corner in self.corners() {
            if other.contains(&corner) && !witnesses.contains(&corner) {
                witnesses.push(corner);
            }
        }
        for corner in other.corners() {
            if self.contains(&corner) && !witnesses.contains(&corner) {
                witnesses.push(corner);
            }
        }
        if witnesses.is_empty() {
            return None;
        }
        Some(Self::spanning(&witnesses))
    }

    /// Shifts each side outward along the great circle by `distance`,
    /// clamped at the poles and the antimeridian.
    #[must_use]
    pub fn expand(&self, distance: Distance) -> Rectangle {
        let lower_left = self
            .lower_left
            .shift_along_great_circle(Heading::SOUTH, distance)
            .shift_along_great_circle(Heading::WEST, distance);
        let upper_right = self
            .upper_right
            .shift_along_great_circle(Heading::NORTH, distance)
            .shift_along_great_circle(Heading::EAST, distance);
        Self::spanning(&[lower_left, upper_right])
    }

    /// Shifts each side inward by `distance`. A dimension whose opposing
    /// sides would cross collapses to the rectangle's center line; if both
    /// collapse the result is a single point.
    #[must_use]
    pub fn contract(&self, distance: Distance) -> Rectangle {
        let lower_left = self
            .lower_left
            .shift_along_great_circle(Heading::NORTH, distance)
            .shift_along_great_circle(Heading::EAST, distance);
        let upper_right = self
            .upper_right
            .shift_along_great_circle(Heading::SOUTH, distance)
            .shift_along_great_circle(Heading::WEST, distance);

        let (south, north) = if lower_left.latitude().as_dm7() > upper_right.latitude().as_dm7() {
            let middle =
                (self.lower_left.latitude().as_dm7() + self.upper_right.latitude().as_dm7()) / 2;
            (middle, middle)
        } else {
            (
                lower_left.latitude().as_dm7(),
                upper_right.latitude().as_dm7(),
            )
        };
        let (west, east) = if lower_left.longitude().as_dm7() > upper_right.longitude().as_dm7() {
            let middle =
                (self.lower_left.longitude().as_dm7() + self.upper_right.longitude().as_dm7()) / 2;
            (middle, middle)
        } else {
            (
                lower_left.longitude().as_dm7(),
                upper_right.longitude().as_dm7(),
            )
        };
        Self {
            lower_left: Location::new(Latitude::clamped_dm7(south), Longitude::clamped_dm7(west)),
            upper_right: Location::new(Latitude::clamped_dm7(north), Longitude::clamped_dm7(east)),
        }
    }

    /// This rectangle as a four-vertex polygon, counter-clockwise from the
    /// lower-left corner.
    #[must_use]
    pub fn as_polygon(&self) -> Polygon {
        Polygon::from_outline(PolyLine::from_nonempty(self.corners().to_vec()))
    }

    fn corners(&self) -> [Location; 4] {
        [
            self.lower_left,
            self.lower_right(),
            self.upper_right,
            self.upper_left(),
        ]
    }

    fn outline_segments(&self) -> [Segment; 4] {
        let [ll, lr, ur, ul] = self.corners();
        [
            Segment::new(ll, lr),
            Segment::new(lr, ur),
            Segment::new(ur, ul),
            Segment::new(ul, ll),
        ]
    }
}

impl fmt::Display for Rectangle {
    /// `"<lowerLeft>:<upperRight>"` in compact location form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower_left, self.upper_right)
    }
}

impl FromStr for Rectangle {
    type Err = GeoCoreError;

    fn from_str(s: &str) -> Result<Self> {
        let (lower_left, upper_right) = s.split_once(':').ok_or_else(|| {
            GeoCoreError::from(CoordinateError::Parse {
                text: s.to_owned(),
                expected: "a `lowerLeft:upperRight` rectangle",
            })
        })?;
        Self::for_corners(lower_left.parse()?, upper_right.parse()?)
    }
}
