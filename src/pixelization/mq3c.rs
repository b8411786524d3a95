//! The modified-Q3C pixelization.
//!
//! The sphere is projected onto the six faces of a cube, and each face
//! carries a uniform 2^L × 2^L grid whose cells are labeled along a
//! Hilbert curve. An index has 4 leading bits identifying the cube face
//! (values 10–15) followed by 2 bits per level. Face numbering and
//! orientation are arranged so that opposite faces differ by 3 and the
//! Hilbert curve alternates handedness from face to face.
//!
//! The scheme modifies the Q3C indexing concept of Koposov & Bartunov
//! (2006), which uses a Morton curve over the same cube-face grids.

use super::Pixelization;
use super::finder::{Action, PixelFinder};
use crate::curve::{hilbert_to_morton, log2_u64, morton_index, morton_index_inverse, morton_to_hilbert};
use crate::error::ValidationError;
use crate::polygon::ConvexPolygon;
use crate::rangeset::RangeSet;
use crate::region::Region;
use crate::vector::UnitVector3d;

// Cube faces, numbered internally 0–5 (externally 10–15) in the order
// −Z, +X, +Y, +Z, −X, −Y. For each face, FACE_COMP lists the vector
// component indexes supplying the face coordinates u and v and the
// component with maximum magnitude; FACE_CONST holds the corresponding
// signs.
const FACE_COMP: [[usize; 3]; 6] = [
    [0, 1, 2],
    [1, 2, 0],
    [2, 0, 1],
    [0, 1, 2],
    [1, 2, 0],
    [2, 0, 1],
];

const FACE_CONST: [[f64; 3]; 6] = [
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

const FACE_NORM: [[u8; 2]; 6] = [
    [b'-', b'Z'],
    [b'+', b'X'],
    [b'+', b'Y'],
    [b'+', b'Z'],
    [b'-', b'X'],
    [b'-', b'Y'],
];

// The amount by which pixel boundaries are dilated in u and v before
// being mapped to unit vectors, slightly more than the maximum error of
// the face-coordinate round trip. It guarantees that the polygonal
// representation of a pixel contains every point that indexes to it.
const DILATION: f64 = 1.0e-15;

// The face with the largest-magnitude component of v; boundary ties are
// broken deterministically.
fn face_number(v: &UnitVector3d) -> usize {
    let (ax, ay, az) = (v.x().abs(), v.y().abs(), v.z().abs());
    if ax > ay {
        if ax > az {
            if v.x() > 0.0 { 1 } else { 4 }
        } else if v.z() > 0.0 {
            3
        } else {
            0
        }
    } else if ay > az {
        if v.y() > 0.0 { 2 } else { 5 }
    } else if v.z() > 0.0 {
        3
    } else {
        0
    }
}

// Maps face coordinates (u, v) ∈ [−1, 1]² (or slightly beyond, for
// neighbor probes) back to the unit sphere.
fn face_to_sphere(face: usize, u: f64, v: f64) -> UnitVector3d {
    let n = (1.0 + u * u + v * v).sqrt();
    let mut p = [0.0; 3];
    p[FACE_COMP[face][0]] = (u * FACE_CONST[face][0]) / n;
    p[FACE_COMP[face][1]] = (v * FACE_CONST[face][1]) / n;
    p[FACE_COMP[face][2]] = FACE_CONST[face][2] / n;
    UnitVector3d::from_normalized(p[0], p[1], p[2])
}

fn face_to_grid(level: u32, u: f64, v: f64) -> (u32, u32) {
    let grid_scale = 0.5 * (1u64 << level) as f64;
    let st_max = ((1u64 << level) - 1) as f64;
    let s = (u * grid_scale + grid_scale).clamp(0.0, st_max);
    let t = (v * grid_scale + grid_scale).clamp(0.0, st_max);
    (s as u32, t as u32)
}

fn grid_to_face(level: u32, s: u32, t: u32) -> (f64, f64) {
    let face_scale = 2.0 / (1u64 << level) as f64;
    (s as f64 * face_scale - 1.0, t as f64 * face_scale - 1.0)
}

// The four cell corners in counter-clockwise order as seen from outside
// the sphere. Faces alternate between right- and left-handed (u, v)
// frames, so the winding flips with the face parity.
fn make_quad(i: u64, level: u32) -> [UnitVector3d; 4] {
    let face = (i >> (2 * level)) as usize - 10;
    let mask = (1u64 << (2 * level)) - 1;
    let (s, t) = morton_index_inverse(hilbert_to_morton(i & mask, level));
    let face_scale = 2.0 / (1u64 << level) as f64;
    let (u0, v0) = grid_to_face(level, s, t);
    let u1 = (u0 + face_scale) + DILATION;
    let v1 = (v0 + face_scale) + DILATION;
    let u0 = u0 - DILATION;
    let v0 = v0 - DILATION;
    if face % 2 == 1 {
        [
            face_to_sphere(face, u0, v0),
            face_to_sphere(face, u1, v0),
            face_to_sphere(face, u1, v1),
            face_to_sphere(face, u0, v1),
        ]
    } else {
        [
            face_to_sphere(face, u0, v0),
            face_to_sphere(face, u0, v1),
            face_to_sphere(face, u1, v1),
            face_to_sphere(face, u1, v0),
        ]
    }
}

/// `Mq3cPixelization` provides modified-Q3C indexing of points and
/// regions.
///
/// Instances are immutable and very cheap to copy.
///
/// Setting the `max_ranges` argument of `envelope` or `interior` to a
/// non-zero value below 4 can produce very coarse pixelizations
/// regardless of region size: with `max_ranges` of 1, a non-empty
/// circle centered on an axis is approximated by an entire cube face
/// even as its radius tends to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mq3cPixelization {
    level: u32,
}

impl Mq3cPixelization {
    /// The maximum supported cube-face grid resolution is 2^30 × 2^30.
    pub const MAX_LEVEL: u32 = 30;

    /// Creates a modified-Q3C pixelization of the sphere with the given
    /// subdivision level.
    pub fn new(level: u32) -> Result<Self, ValidationError> {
        if level > Self::MAX_LEVEL {
            return Err(ValidationError::InvalidSubdivisionLevel {
                level: level as i32,
                max: Self::MAX_LEVEL as i32,
            });
        }
        Ok(Mq3cPixelization { level })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// `level_of` returns the subdivision level of the given
    /// modified-Q3C index, or −1 if the index is invalid at every
    /// level.
    pub fn level_of(i: u64) -> i32 {
        // A modified-Q3C index has 4 bits identifying the cube face
        // (10–15) followed by 2 bits per level, so the most significant
        // bit must sit at an odd position ≥ 3, and the face field must
        // be at least 10.
        let j = log2_u64(i) as i32;
        if (j & 1) == 0 || j < 3 {
            return -1;
        }
        let level = (j - 3) >> 1;
        if level > Self::MAX_LEVEL as i32 || (i >> (j - 3)) < 10 {
            return -1;
        }
        level
    }

    /// `quad` returns the quadrilateral of the modified-Q3C pixel with
    /// index i.
    pub fn quad(i: u64) -> Result<ConvexPolygon, ValidationError> {
        let level = Self::level_of(i);
        if level < 0 {
            return Err(ValidationError::InvalidPixelIndex(i));
        }
        let verts = make_quad(i, level as u32);
        Ok(ConvexPolygon::from_vertices_unchecked(verts.to_vec()))
    }

    /// `neighborhood` returns the sorted indexes of all pixels sharing
    /// a vertex with pixel i, including i itself. A pixel has 8 − k
    /// adjacent pixels, where k of its vertices are also cube-face
    /// vertices (0, 1 or 4).
    pub fn neighborhood(i: u64) -> Result<Vec<u64>, ValidationError> {
        let level = Self::level_of(i);
        if level < 0 {
            return Err(ValidationError::InvalidPixelIndex(i));
        }
        let level = level as u32;
        let pixelization = Mq3cPixelization { level };
        let face = (i >> (2 * level)) as usize - 10;
        let mask = (1u64 << (2 * level)) - 1;
        let (s, t) = morton_index_inverse(hilbert_to_morton(i & mask, level));
        let face_scale = 2.0 / (1u64 << level) as f64;
        let mut result = Vec::with_capacity(9);
        // Probe the center of each adjacent grid cell; probes past the
        // face boundary land on the neighboring face when re-indexed.
        for ds in -1i64..=1 {
            for dt in -1i64..=1 {
                let u = ((s as i64 + ds) as f64 + 0.5) * face_scale - 1.0;
                let v = ((t as i64 + dt) as f64 + 0.5) * face_scale - 1.0;
                let p = face_to_sphere(face, u, v);
                result.push(pixelization.index(&p));
            }
        }
        result.sort_unstable();
        result.dedup();
        Ok(result)
    }

    fn check_index(&self, i: u64) -> Result<(), ValidationError> {
        if Self::level_of(i) == self.level as i32 {
            Ok(())
        } else {
            Err(ValidationError::InvalidPixelIndex(i))
        }
    }
}

impl Pixelization for Mq3cPixelization {
    fn universe(&self) -> RangeSet {
        RangeSet::range(10 << (2 * self.level), 16u64.wrapping_shl(2 * self.level))
    }

    fn pixel(&self, i: u64) -> Result<Region, ValidationError> {
        self.check_index(i)?;
        Ok(Region::Polygon(Self::quad(i)?))
    }

    fn index(&self, v: &UnitVector3d) -> u64 {
        let face = face_number(v);
        let w = v.component(FACE_COMP[face][2]).abs();
        let u = (v.component(FACE_COMP[face][0]) / w) * FACE_CONST[face][0];
        let uv = (v.component(FACE_COMP[face][1]) / w) * FACE_CONST[face][1];
        let (s, t) = face_to_grid(self.level, u, uv);
        let h = morton_to_hilbert(morton_index(s, t), self.level);
        ((face as u64 + 10) << (2 * self.level)) | h
    }

    fn index_to_string(&self, i: u64) -> Result<String, ValidationError> {
        self.check_index(i)?;
        let mut i = i;
        let mut digits = Vec::with_capacity(self.level as usize + 2);
        for _ in 0..self.level {
            digits.push(b'0' + (i & 3) as u8);
            i >>= 2;
        }
        let face = i as usize - 10;
        digits.push(FACE_NORM[face][1]);
        digits.push(FACE_NORM[face][0]);
        digits.reverse();
        Ok(String::from_utf8(digits).expect("digits are ASCII"))
    }

    fn envelope(&self, r: &Region, max_ranges: usize) -> RangeSet {
        let mut finder = PixelFinder::new(r, self.level, max_ranges, false);
        for face in 10..16u64 {
            let verts = make_quad(face, 0);
            visit(&mut finder, &verts, face, 0);
        }
        finder.into_ranges()
    }

    fn interior(&self, r: &Region, max_ranges: usize) -> RangeSet {
        let mut finder = PixelFinder::new(r, self.level, max_ranges, true);
        for face in 10..16u64 {
            let verts = make_quad(face, 0);
            visit(&mut finder, &verts, face, 0);
        }
        finder.into_ranges()
    }
}

// Recursive top-down traversal in ascending index order. The four
// children of a Hilbert cell are index-contiguous, so each child quad
// is rebuilt from its own index.
fn visit(finder: &mut PixelFinder, verts: &[UnitVector3d; 4], index: u64, depth: u32) {
    match finder.classify(verts, depth) {
        Action::Skip => {}
        Action::Insert => finder.insert(index, depth),
        Action::Subdivide => {
            let depth = depth + 1;
            for child in (index * 4)..(index * 4 + 4) {
                let verts = make_quad(child, depth);
                visit(finder, &verts, child, depth);
            }
        }
    }
}
