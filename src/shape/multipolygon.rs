use std::fmt;
use std::sync::{Arc, OnceLock};

use geo::Relate;

use crate::error::{GeometryError, Result};
use crate::location::Location;

use super::{geo_line_string, Polygon, Rectangle, Shape};

/// One member of a multipolygon: an outer ring and its holes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPolygonMember {
    outer: Polygon,
    inners: Vec<Polygon>,
}

impl MultiPolygonMember {
    /// Creates a member from an outer ring and zero or more inner rings.
    /// Inner rings are expected to lie inside the outer ring; that is a
    /// caller contract, not runtime-checked.
    #[must_use]
    pub fn new(outer: Polygon, inners: Vec<Polygon>) -> Self {
        Self { outer, inners }
    }

    /// A member without holes.
    #[must_use]
    pub fn solid(outer: Polygon) -> Self {
        Self {
            outer,
            inners: Vec::new(),
        }
    }

    /// The outer ring.
    #[must_use]
    pub fn outer(&self) -> &Polygon {
        &self.outer
    }

    /// The inner rings (holes).
    #[must_use]
    pub fn inners(&self) -> &[Polygon] {
        &self.inners
    }

    fn to_geo(&self) -> geo::Polygon<f64> {
        geo::Polygon::new(
            geo_line_string(self.outer.outline()),
            self.inners
                .iter()
                .map(|inner| geo_line_string(inner.outline()))
                .collect(),
        )
    }
}

/// A collection of one or more polygons with holes.
#[derive(Debug, Clone)]
pub struct MultiPolygon {
    members: Vec<MultiPolygonMember>,
    // Bounding rectangle, a pure function of the members. Computed lazily;
    // racing threads recompute the same value.
    bounds: Arc<OnceLock<Rectangle>>,
}

impl MultiPolygon {
    /// Creates a multipolygon from its members.
    ///
    /// # Errors
    ///
    /// Returns an error if `members` is empty.
    pub fn new(members: Vec<MultiPolygonMember>) -> Result<Self> {
        if members.is_empty() {
            return Err(GeometryError::EmptyMultiPolygon.into());
        }
        Ok(Self {
            members,
            bounds: Arc::new(OnceLock::new()),
        })
    }

    /// The members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[MultiPolygonMember] {
        &self.members
    }

    /// Bounding rectangle over every outer ring, memoized.
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        *self.bounds.get_or_init(|| {
            let vertices: Vec<Location> = self
                .members
                .iter()
                .flat_map(|member| member.outer.outline().iter().copied())
                .collect();
            // Non-empty by construction: members exist and each outline
            // holds at least one location.
            Rectangle::spanning(&vertices)
        })
    }

    /// Boundary-inclusive full containment of `shape`, answered by the
    /// planar-geometry engine's covers predicate.
    #[must_use]
    pub fn fully_geometrically_encloses(&self, shape: Shape<'_>) -> bool {
        self.relate(shape).is_covers()
    }

    /// True when this multipolygon and `shape` share any point, boundaries
    /// included.
    #[must_use]
    pub fn overlaps(&self, shape: Shape<'_>) -> bool {
        self.relate(shape).is_intersects()
    }

    /// The planar engine's native form, holes included, in degrees.
    #[must_use]
    pub fn to_geo(&self) -> geo::MultiPolygon<f64> {
        geo::MultiPolygon::new(self.members.iter().map(MultiPolygonMember::to_geo).collect())
    }

    fn relate(&self, shape: Shape<'_>) -> geo::relate::IntersectionMatrix {
        let own = self.to_geo();
        match shape {
            Shape::Location(location) => {
                own.relate(&geo::Point::from(super::geo_coord(location)))
            }
            Shape::PolyLine(polyline) => own.relate(&geo_line_string(polyline)),
            Shape::Polygon(polygon) => own.relate(polygon.prepared()),
            Shape::MultiPolygon(multipolygon) => own.relate(&multipolygon.to_geo()),
        }
    }
}

impl PartialEq for MultiPolygon {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for MultiPolygon {}

impl fmt::Display for MultiPolygon {
    /// Semicolon-joined outer rings; holes are omitted from the compact
    /// form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, member) in self.members.iter().enumerate() {
            if index > 0 {
                write!(f, ";")?;
            }
            write!(f, "{}", member.outer)?;
        }
        Ok(())
    }
}
