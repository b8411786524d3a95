//! The adaptive pixel-finding state shared by the hierarchical
//! pixelizations.
//!
//! Each pixelization walks its pixel tree top-down, calling
//! [`PixelFinder::classify`] on every candidate pixel (a convex
//! spherical polygon given by its vertices) and [`PixelFinder::insert`]
//! for accepted ones. When a range budget is set, inserts coarsen the
//! result until it fits: envelopes are simplified by expanding ranges
//! outward, interiors by shrinking them inward (simplifying on the
//! complement).

use crate::circle::Circle;
use crate::lonlat_box::LonLatBox;
use crate::polygon::{self, ConvexPolygon};
use crate::rangeset::RangeSet;
use crate::region::Region;
use crate::relationship::{DISJOINT, Relationship, WITHIN};
use crate::vector::UnitVector3d;

// The search region, pre-resolved so that pixel relations skip the
// generic dispatch in the common cases. An ellipse is replaced by its
// bounding circle for envelopes and by its inscribed circle for
// interiors; both substitutions keep the result conservative.
enum FinderRegion<'a> {
    Circle(Circle),
    Box(&'a LonLatBox),
    Polygon(&'a ConvexPolygon),
    Generic(&'a Region),
}

impl FinderRegion<'_> {
    fn relate(&self, verts: &[UnitVector3d]) -> Relationship {
        match self {
            FinderRegion::Circle(c) => polygon::relate_vertices_circle(verts, c),
            FinderRegion::Box(b) => polygon::relate_vertices_box(verts, b),
            FinderRegion::Polygon(p) => {
                polygon::relate_vertices_vertices(verts, p.vertices())
            }
            FinderRegion::Generic(r) => {
                let pixel = ConvexPolygon::from_vertices_unchecked(verts.to_vec());
                Region::Polygon(pixel).relate(r)
            }
        }
    }
}

pub(crate) enum Action {
    Skip,
    Insert,
    Subdivide,
}

pub(crate) struct PixelFinder<'a> {
    region: FinderRegion<'a>,
    ranges: RangeSet,
    level: i32,
    desired_level: i32,
    max_ranges: usize,
    interior_only: bool,
}

impl<'a> PixelFinder<'a> {
    pub(crate) fn new(
        region: &'a Region,
        level: u32,
        max_ranges: usize,
        interior_only: bool,
    ) -> Self {
        let region = match region {
            Region::Circle(c) => FinderRegion::Circle(*c),
            Region::Box(b) => FinderRegion::Box(b),
            Region::Polygon(p) => FinderRegion::Polygon(p),
            Region::Ellipse(e) => FinderRegion::Circle(if interior_only {
                e.inscribed_circle()
            } else {
                e.bounding_circle()
            }),
            other => FinderRegion::Generic(other),
        };
        PixelFinder {
            region,
            ranges: RangeSet::new(),
            level: level as i32,
            desired_level: level as i32,
            max_ranges: if max_ranges == 0 {
                usize::MAX
            } else {
                max_ranges
            },
            interior_only,
        }
    }

    /// Decides what to do with the pixel at tree depth `depth` whose
    /// boundary is the polygon with the given vertices.
    pub(crate) fn classify(&self, verts: &[UnitVector3d], depth: u32) -> Action {
        if (depth as i32) > self.level {
            // The subdivision level has been reduced, or a pixel that
            // completely contains the search region was found.
            return Action::Skip;
        }
        let r = self.region.relate(verts);
        if r.contains(DISJOINT) {
            return Action::Skip;
        }
        if r.contains(WITHIN) {
            // The pixel is entirely inside the search region.
            return Action::Insert;
        }
        if depth as i32 == self.level {
            // A leaf that intersects the search region boundary.
            if self.interior_only {
                return Action::Skip;
            }
            return Action::Insert;
        }
        Action::Subdivide
    }

    /// Records the pixel with the given index and depth, together with
    /// all of its descendants at the target level, then coarsens until
    /// the range budget is met.
    pub(crate) fn insert(&mut self, index: u64, depth: u32) {
        let shift = 2 * (self.desired_level - depth as i32) as u32;
        self.ranges
            .insert(index << shift, (index + 1) << shift);
        while self.ranges.len() > self.max_ranges {
            self.level -= 1;
            let shift = (2 * (self.desired_level - self.level)).clamp(0, 64) as u32;
            if self.interior_only {
                // Simplifying the complement makes coarsening shrink the
                // interior instead of growing it.
                self.ranges.complement();
                self.ranges.simplify(shift);
                self.ranges.complement();
            } else {
                self.ranges.simplify(shift);
            }
        }
    }

    pub(crate) fn into_ranges(self) -> RangeSet {
        self.ranges
    }
}
