//! The hierarchical triangular mesh (HTM) pixelization.
//!
//! HTM starts from the 8 spherical triangles (trixels) over the
//! octants and subdivides each trixel into 4 children through its edge
//! midpoints. An index consists of 4 leading bits identifying the root
//! trixel (values 8–15) followed by 2 bits per level selecting a child.
//!
//! The scheme follows "Indexing the Sphere with the Hierarchical
//! Triangular Mesh" (Szalay et al., 2007).

use super::Pixelization;
use super::finder::{Action, PixelFinder};
use crate::curve::log2_u64;
use crate::error::ValidationError;
use crate::orientation::orientation;
use crate::polygon::ConvexPolygon;
use crate::rangeset::RangeSet;
use crate::region::Region;
use crate::vector::UnitVector3d;

// Root trixel vertices, stored as raw coordinates.
const ROOT_VERTEX: [[[f64; 3]; 3]; 8] = [
    [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]],
    [[0.0, 1.0, 0.0], [0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]],
    [[-1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, -1.0, 0.0]],
    [[0.0, -1.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]],
    [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]],
    [[0.0, -1.0, 0.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]],
    [[-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
    [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
];

fn root_vertex(r: usize, i: usize) -> UnitVector3d {
    let v = ROOT_VERTEX[r][i];
    UnitVector3d::from_normalized(v[0], v[1], v[2])
}

// The root trixel containing v, determined by octant sign tests. Points
// on shared boundaries are assigned to exactly one root.
fn root_triangle(v: &UnitVector3d) -> u64 {
    if v.z() < 0.0 {
        // Southern hemisphere: root triangle 0, 1, 2 or 3.
        if v.y() > 0.0 {
            if v.x() > 0.0 { 0 } else { 1 }
        } else if v.y() == 0.0 {
            if v.x() >= 0.0 { 0 } else { 2 }
        } else if v.x() < 0.0 {
            2
        } else {
            3
        }
    } else {
        // Northern hemisphere: root triangle 4, 5, 6 or 7.
        if v.y() > 0.0 {
            if v.x() > 0.0 { 7 } else { 6 }
        } else if v.y() == 0.0 {
            if v.x() >= 0.0 { 7 } else { 5 }
        } else if v.x() < 0.0 {
            5
        } else {
            4
        }
    }
}

/// `HtmPixelization` provides HTM indexing of points and regions.
///
/// Instances are immutable and very cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmPixelization {
    level: u32,
}

impl HtmPixelization {
    /// The maximum supported HTM subdivision level.
    pub const MAX_LEVEL: u32 = 24;

    /// Creates an HTM pixelization of the sphere with the given
    /// subdivision level.
    pub fn new(level: u32) -> Result<Self, ValidationError> {
        if level > Self::MAX_LEVEL {
            return Err(ValidationError::InvalidSubdivisionLevel {
                level: level as i32,
                max: Self::MAX_LEVEL as i32,
            });
        }
        Ok(HtmPixelization { level })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// `level_of` returns the subdivision level of the given HTM index,
    /// or −1 if the index is invalid at every level.
    pub fn level_of(i: u64) -> i32 {
        // An HTM index has 4 bits identifying the root trixel (8–15)
        // followed by 2 bits per subdivision level, so the index j of
        // its most significant bit must be an odd integer greater
        // than 1.
        let j = log2_u64(i) as i32;
        if (j & 1) == 0 || j == 1 {
            return -1;
        }
        (j - 3) >> 1
    }

    /// `triangle` returns the trixel with the given index.
    ///
    /// The returned polygon contains every point v with
    /// `HtmPixelization::new(level)?.index(&v) == i`; points on its
    /// edges may also lie in the polygons of adjacent trixels.
    pub fn triangle(i: u64) -> Result<ConvexPolygon, ValidationError> {
        let level = Self::level_of(i);
        if level < 0 || level > Self::MAX_LEVEL as i32 {
            return Err(ValidationError::InvalidPixelIndex(i));
        }
        let mut shift = 2 * level;
        let r = ((i >> shift) & 7) as usize;
        let mut v0 = root_vertex(r, 0);
        let mut v1 = root_vertex(r, 1);
        let mut v2 = root_vertex(r, 2);
        while shift >= 2 {
            shift -= 2;
            let child = (i >> shift) & 3;
            let m12 = UnitVector3d::from_vector(&(v1 + v2));
            let m20 = UnitVector3d::from_vector(&(v2 + v0));
            let m01 = UnitVector3d::from_vector(&(v0 + v1));
            match child {
                0 => {
                    v1 = m01;
                    v2 = m20;
                }
                1 => {
                    v0 = v1;
                    v1 = m12;
                    v2 = m01;
                }
                2 => {
                    v0 = v2;
                    v1 = m20;
                    v2 = m12;
                }
                _ => {
                    v0 = m12;
                    v1 = m20;
                    v2 = m01;
                }
            }
        }
        Ok(ConvexPolygon::from_vertices_unchecked(vec![v0, v1, v2]))
    }

    fn check_index(&self, i: u64) -> Result<(), ValidationError> {
        if Self::level_of(i) == self.level as i32 {
            Ok(())
        } else {
            Err(ValidationError::InvalidPixelIndex(i))
        }
    }
}

impl Pixelization for HtmPixelization {
    fn universe(&self) -> RangeSet {
        RangeSet::range(8 << (2 * self.level), 16 << (2 * self.level))
    }

    fn pixel(&self, i: u64) -> Result<Region, ValidationError> {
        self.check_index(i)?;
        Ok(Region::Polygon(Self::triangle(i)?))
    }

    fn index(&self, v: &UnitVector3d) -> u64 {
        let r = root_triangle(v);
        let mut v0 = root_vertex(r as usize, 0);
        let mut v1 = root_vertex(r as usize, 1);
        let mut v2 = root_vertex(r as usize, 2);
        let mut i = r + 8;
        for _ in 0..self.level {
            let m01 = UnitVector3d::from_vector(&(v0 + v1));
            let m20 = UnitVector3d::from_vector(&(v2 + v0));
            i <<= 2;
            if orientation(v, &m01, &m20) >= 0 {
                v1 = m01;
                v2 = m20;
                continue;
            }
            let m12 = UnitVector3d::from_vector(&(v1 + v2));
            if orientation(v, &m12, &m01) >= 0 {
                v0 = v1;
                v1 = m12;
                v2 = m01;
                i += 1;
            } else if orientation(v, &m20, &m12) >= 0 {
                v0 = v2;
                v1 = m20;
                v2 = m12;
                i += 2;
            } else {
                v0 = m12;
                v1 = m20;
                v2 = m01;
                i += 3;
            }
        }
        i
    }

    fn index_to_string(&self, i: u64) -> Result<String, ValidationError> {
        self.check_index(i)?;
        let mut i = i;
        let mut digits = Vec::with_capacity(self.level as usize + 2);
        for _ in 0..=self.level {
            digits.push(b'0' + (i & 3) as u8);
            i >>= 2;
        }
        // The remaining bit distinguishes the hemispheres.
        digits.push(if i & 1 == 0 { b'S' } else { b'N' });
        digits.reverse();
        Ok(String::from_utf8(digits).expect("digits are ASCII"))
    }

    fn envelope(&self, r: &Region, max_ranges: usize) -> RangeSet {
        let mut finder = PixelFinder::new(r, self.level, max_ranges, false);
        for root in 0..8u64 {
            let verts = [
                root_vertex(root as usize, 0),
                root_vertex(root as usize, 1),
                root_vertex(root as usize, 2),
            ];
            visit(&mut finder, &verts, root + 8, 0);
        }
        finder.into_ranges()
    }

    fn interior(&self, r: &Region, max_ranges: usize) -> RangeSet {
        let mut finder = PixelFinder::new(r, self.level, max_ranges, true);
        for root in 0..8u64 {
            let verts = [
                root_vertex(root as usize, 0),
                root_vertex(root as usize, 1),
                root_vertex(root as usize, 2),
            ];
            visit(&mut finder, &verts, root + 8, 0);
        }
        finder.into_ranges()
    }
}

// Recursive top-down traversal; children are visited in ascending index
// order to keep range insertion cheap.
fn visit(finder: &mut PixelFinder, verts: &[UnitVector3d; 3], index: u64, depth: u32) {
    match finder.classify(verts, depth) {
        Action::Skip => {}
        Action::Insert => finder.insert(index, depth),
        Action::Subdivide => {
            let m12 = UnitVector3d::from_vector(&(verts[1] + verts[2]));
            let m20 = UnitVector3d::from_vector(&(verts[2] + verts[0]));
            let m01 = UnitVector3d::from_vector(&(verts[0] + verts[1]));
            let index = index * 4;
            let depth = depth + 1;
            visit(finder, &[verts[0], m01, m20], index, depth);
            visit(finder, &[verts[1], m12, m01], index + 1, depth);
            visit(finder, &[verts[2], m20, m12], index + 2, depth);
            visit(finder, &[m12, m20, m01], index + 3, depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use crate::circle::Circle;
    use crate::lonlat::LonLat;

    // Trixel labels at level 1, in the numbering of the original HTM
    // papers: S00 = 32 through N33 = 63.
    fn tri(name: &str) -> u64 {
        let hemi = if name.as_bytes()[0] == b'S' { 0 } else { 1 };
        let root = (name.as_bytes()[1] - b'0') as u64;
        let child = (name.as_bytes()[2] - b'0') as u64;
        (8 + 4 * hemi + root) * 4 + child
    }

    #[test]
    fn level_of_indexes() {
        let mut level = 0;
        let mut index = 8u64;
        while index != 0 {
            assert_eq!(HtmPixelization::level_of(index), level);
            level += 1;
            index = index.wrapping_mul(4);
        }
        let mut index = 4u64;
        while index != 0 {
            assert!(HtmPixelization::level_of(index) < 0);
            index <<= 2;
        }
        for index in 0..8u64 {
            assert_eq!(HtmPixelization::level_of(index), -1);
        }
        assert_eq!(HtmPixelization::level_of(8), 0);
        assert_eq!(HtmPixelization::level_of(32), 1);
        assert_eq!(HtmPixelization::level_of(4), -1);
    }

    #[test]
    fn invalid_indexes_and_levels() {
        assert!(HtmPixelization::new(HtmPixelization::MAX_LEVEL + 1).is_err());
        for index in 0..8u64 {
            assert!(HtmPixelization::triangle(index).is_err());
        }
        assert!(HtmPixelization::triangle(4).is_err());
        let p = HtmPixelization::new(1).unwrap();
        assert!(p.pixel(8).is_err()); // level-0 index
        assert!(p.pixel(32).is_ok());
    }

    #[test]
    fn index_of_cardinal_points() {
        let cases: [(UnitVector3d, &str); 26] = [
            (UnitVector3d::x_axis(), "N32"),
            (UnitVector3d::y_axis(), "N22"),
            (UnitVector3d::z_axis(), "N31"),
            (-UnitVector3d::x_axis(), "N12"),
            (-UnitVector3d::y_axis(), "N02"),
            (-UnitVector3d::z_axis(), "S01"),
            (UnitVector3d::new(1.0, 1.0, 0.0), "N30"),
            (UnitVector3d::new(-1.0, 1.0, 0.0), "N20"),
            (UnitVector3d::new(-1.0, -1.0, 0.0), "N10"),
            (UnitVector3d::new(1.0, -1.0, 0.0), "N00"),
            (UnitVector3d::new(1.0, 0.0, 1.0), "N31"),
            (UnitVector3d::new(0.0, 1.0, 1.0), "N21"),
            (UnitVector3d::new(-1.0, 0.0, 1.0), "N11"),
            (UnitVector3d::new(0.0, -1.0, 1.0), "N01"),
            (UnitVector3d::new(1.0, 0.0, -1.0), "S00"),
            (UnitVector3d::new(0.0, 1.0, -1.0), "S10"),
            (UnitVector3d::new(-1.0, 0.0, -1.0), "S20"),
            (UnitVector3d::new(0.0, -1.0, -1.0), "S30"),
            (UnitVector3d::new(1.0, 1.0, 1.0), "N33"),
            (UnitVector3d::new(-1.0, 1.0, 1.0), "N23"),
            (UnitVector3d::new(-1.0, -1.0, 1.0), "N13"),
            (UnitVector3d::new(1.0, -1.0, 1.0), "N03"),
            (UnitVector3d::new(1.0, 1.0, -1.0), "S03"),
            (UnitVector3d::new(-1.0, 1.0, -1.0), "S13"),
            (UnitVector3d::new(-1.0, -1.0, -1.0), "S23"),
            (UnitVector3d::new(1.0, -1.0, -1.0), "S33"),
        ];
        let p0 = HtmPixelization::new(0).unwrap();
        let p1 = HtmPixelization::new(1).unwrap();
        for (v, name) in cases {
            let index = tri(name);
            assert_eq!(p0.index(&v), index >> 2, "level 0 index of {v}");
            assert_eq!(p1.index(&v), index, "level 1 index of {v}");
            assert!(
                HtmPixelization::triangle(index).unwrap().contains(&v),
                "triangle({index}) does not contain {v}"
            );
        }
    }

    #[test]
    fn trixel_center_indexes() {
        let c = 0.2928932188134525; // 1/(2 + √2)
        let cases: [(UnitVector3d, &str); 6] = [
            (UnitVector3d::new(c, c, 1.0), "N31"),
            (UnitVector3d::new(1.0, c, c), "N32"),
            (UnitVector3d::new(c, 1.0, c), "N30"),
            (UnitVector3d::new(-c, c, 1.0), "N21"),
            (UnitVector3d::new(-c, 1.0, c), "N22"),
            (UnitVector3d::new(-1.0, c, c), "N20"),
        ];
        let p1 = HtmPixelization::new(1).unwrap();
        let p2 = HtmPixelization::new(2).unwrap();
        for (v, name) in cases {
            let index = tri(name);
            assert_eq!(p1.index(&v), index);
            // Each point is the center of child 3 one level down.
            let index = index * 4 + 3;
            assert_eq!(p2.index(&v), index);
            assert_eq!(
                p2.envelope(&Region::Circle(Circle::new(v, Angle::from_radians(1.0e-8))), 0),
                RangeSet::single(index)
            );
        }
    }

    #[test]
    fn known_level_20_index() {
        let p = HtmPixelization::new(20).unwrap();
        let v = UnitVector3d::from_lonlat(&LonLat::from_degrees(1.0, 1.0).unwrap());
        assert_eq!(p.index(&v), 17043491373057);
    }

    #[test]
    fn tiny_circle_envelopes_at_axis_corners() {
        let p = HtmPixelization::new(13).unwrap();
        let tiny = |v: UnitVector3d| Region::Circle(Circle::new(v, Angle::from_radians(1.0e-16)));
        let s = p.envelope(&tiny(-UnitVector3d::z_axis()), 0);
        let expected: RangeSet = [553648128u64, 620756992, 687865856, 754974720]
            .into_iter()
            .collect();
        assert_eq!(s, expected);
        let s = p.envelope(&tiny(UnitVector3d::z_axis()), 0);
        let expected: RangeSet = [822083584u64, 889192448, 956301312, 1023410176]
            .into_iter()
            .collect();
        assert_eq!(s, expected);
        let s = p.envelope(&tiny(UnitVector3d::x_axis()), 0);
        let expected: RangeSet = [536870912u64, 771751936, 805306368, 1040187392]
            .into_iter()
            .collect();
        assert_eq!(s, expected);
        let s = p.envelope(&tiny(UnitVector3d::y_axis()), 0);
        let expected: RangeSet = [570425344u64, 603979776, 973078528, 1006632960]
            .into_iter()
            .collect();
        assert_eq!(s, expected);
    }

    #[test]
    fn index_to_string_names() {
        let p = HtmPixelization::new(1).unwrap();
        assert_eq!(p.index_to_string(tri("N32")).unwrap(), "N32");
        assert_eq!(p.index_to_string(tri("S01")).unwrap(), "S01");
        let p0 = HtmPixelization::new(0).unwrap();
        assert_eq!(p0.index_to_string(8).unwrap(), "S0");
        assert_eq!(p0.index_to_string(15).unwrap(), "N3");
        assert!(p0.index_to_string(7).is_err());
    }

    #[test]
    fn index_round_trip_through_pixel() {
        let p = HtmPixelization::new(6).unwrap();
        for (lon, lat) in [
            (0.0, 0.0),
            (1.0, 1.0),
            (123.4, -56.7),
            (359.9, 89.9),
            (180.0, -89.9),
            (271.3, 0.1),
        ] {
            let v = UnitVector3d::from_lonlat(&LonLat::from_degrees(lon, lat).unwrap());
            let i = p.index(&v);
            assert!(p.universe().contains(i));
            match p.pixel(i).unwrap() {
                Region::Polygon(t) => assert!(t.contains(&v), "({lon}, {lat})"),
                other => panic!("unexpected pixel region {other:?}"),
            }
        }
    }

    #[test]
    fn envelope_and_interior_are_adaptive() {
        let center = UnitVector3d::new(1.0, 1.0, 1.0);
        for level in 0..=10 {
            let p = HtmPixelization::new(level).unwrap();
            let c0 = Region::Circle(Circle::new(center, Angle::from_degrees(0.001)));
            let c1 = Region::Circle(Circle::new(center, Angle::from_degrees(0.1)));
            let c2 = Region::Circle(Circle::new(center, Angle::from_degrees(1.0)));
            let mut a0 = p.envelope(&c0, 0);
            let mut a1 = p.envelope(&c1, 0);
            let mut a2 = p.envelope(&c2, 0);
            assert!(a2.contains_set(&a1));
            assert!(a1.contains_set(&a0));
            let mut max_ranges = 64;
            while max_ranges != 0 {
                let s = p.envelope(&c0, max_ranges);
                assert!(s.len() <= max_ranges);
                assert!(s.contains_set(&a0));
                a0 = s;
                let s = p.envelope(&c1, max_ranges);
                assert!(s.contains_set(&a1));
                a1 = s;
                let s = p.envelope(&c2, max_ranges);
                assert!(s.contains_set(&a2));
                a2 = s;
                assert!(a2.contains_set(&a1));
                assert!(a1.contains_set(&a0));
                max_ranges /= 2;
            }
            // The interior shrinks as the budget tightens and is always
            // inside the unrestricted envelope.
            let i0 = p.interior(&c2, 0);
            let i1 = p.interior(&c2, 4);
            assert!(i0.contains_set(&i1));
            assert!(p.envelope(&c2, 0).contains_set(&i0));
        }
    }

    #[test]
    fn interior_pixels_are_inside_the_region() {
        let p = HtmPixelization::new(7).unwrap();
        let c = Circle::new(UnitVector3d::new(1.0, 0.5, 0.25), Angle::from_degrees(10.0));
        let interior = p.interior(&Region::Circle(c), 0);
        for (b, e) in interior.iter() {
            for i in b..e {
                match p.pixel(i).unwrap() {
                    Region::Polygon(t) => {
                        for v in t.vertices() {
                            assert!(c.contains(v), "vertex of pixel {i} outside circle");
                        }
                    }
                    other => panic!("unexpected pixel region {other:?}"),
                }
            }
        }
    }
}
