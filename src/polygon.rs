use std::fmt::{self, Display, Formatter};

use crate::angle::Angle;
use crate::box3d::Box3d;
use crate::circle::Circle;
use crate::codec;
use crate::error::{DecodeError, ValidationError};
use crate::interval::{AngleInterval, Interval1d};
use crate::lonlat::LonLat;
use crate::lonlat_box::LonLatBox;
use crate::orientation::{orientation, orientation_x, orientation_y, orientation_z};
use crate::relationship::{CONTAINS, DISJOINT, INTERSECTS, Relationship, WITHIN};
use crate::utils::{MAX_SQUARED_CHORD_LENGTH_ERROR, max_squared_chord_length, min_squared_chord_length};
use crate::vector::{UnitVector3d, Vector3d};

const HALF_PI: f64 = 0.5 * std::f64::consts::PI;

/// `ConvexPolygon` is a convex polygon on the unit sphere with at least
/// three vertices, stored in counter-clockwise order as seen from
/// outside the sphere.
///
/// Each edge is the shorter great-circle arc between its endpoints, no
/// three consecutive vertices are coplanar with the origin, and the
/// polygon covers strictly less than a hemisphere.
#[derive(Debug, Clone)]
pub struct ConvexPolygon {
    vertices: Vec<UnitVector3d>,
}

impl ConvexPolygon {
    pub const TYPE_CODE: u8 = b'p';

    /// Creates the convex hull of the given points.
    ///
    /// Fails when fewer than three distinct, non-coplanar points are
    /// supplied, when two points are antipodal, or when the hull would
    /// cover a hemisphere or more.
    pub fn new(points: &[UnitVector3d]) -> Result<Self, ValidationError> {
        let vertices = compute_hull(points.to_vec())?;
        Ok(ConvexPolygon { vertices })
    }

    /// Wraps vertices that the caller guarantees to satisfy the polygon
    /// invariants, skipping hull construction.
    pub(crate) fn from_vertices_unchecked(vertices: Vec<UnitVector3d>) -> Self {
        ConvexPolygon { vertices }
    }

    pub fn vertices(&self) -> &[UnitVector3d] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// `centroid` returns the center of mass of this polygon, projected
    /// onto the sphere.
    pub fn centroid(&self) -> UnitVector3d {
        vertices_centroid(&self.vertices)
    }

    pub fn contains(&self, v: &UnitVector3d) -> bool {
        vertices_contain(&self.vertices, v)
    }

    pub fn relate_box(&self, b: &LonLatBox) -> Relationship {
        relate_vertices_box(&self.vertices, b)
    }

    pub fn relate_circle(&self, c: &Circle) -> Relationship {
        relate_vertices_circle(&self.vertices, c)
    }

    pub fn relate_polygon(&self, p: &ConvexPolygon) -> Relationship {
        relate_vertices_vertices(&self.vertices, &p.vertices)
    }

    pub fn bounding_box(&self) -> LonLatBox {
        vertices_bounding_box(&self.vertices)
    }

    pub fn bounding_box3d(&self) -> Box3d {
        vertices_bounding_box3d(&self.vertices)
    }

    pub fn bounding_circle(&self) -> Circle {
        vertices_bounding_circle(&self.vertices)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(1 + 24 * self.vertices.len());
        buffer.push(Self::TYPE_CODE);
        for v in &self.vertices {
            codec::encode_f64(v.x(), &mut buffer);
            codec::encode_f64(v.y(), &mut buffer);
            codec::encode_f64(v.z(), &mut buffer);
        }
        buffer
    }

    pub fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        if buffer.first() != Some(&Self::TYPE_CODE) {
            return Err(DecodeError::UnknownTypeCode(
                buffer.first().copied().unwrap_or(0),
            ));
        }
        if buffer.len() < 1 + 24 * 3 || (buffer.len() - 1) % 24 != 0 {
            return Err(DecodeError::LengthMismatch {
                expected: 1 + 24 * 3,
                actual: buffer.len(),
            });
        }
        let n = (buffer.len() - 1) / 24;
        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            let at = 1 + 24 * i;
            // The stored triples are already normalized; renormalizing
            // would drift decoded vertices away from the encoded ones.
            vertices.push(UnitVector3d::from_normalized(
                codec::decode_f64(&buffer[at..]),
                codec::decode_f64(&buffer[at + 8..]),
                codec::decode_f64(&buffer[at + 16..]),
            ));
        }
        Ok(ConvexPolygon::from_vertices_unchecked(vertices))
    }
}

impl PartialEq for ConvexPolygon {
    /// Two polygons are equal when their vertex sequences are equal up
    /// to rotation.
    fn eq(&self, p: &ConvexPolygon) -> bool {
        if self.vertices.len() != p.vertices.len() {
            return false;
        }
        let n = self.vertices.len();
        match p.vertices.iter().position(|v| *v == self.vertices[0]) {
            None => false,
            Some(f) => (1..n).all(|i| self.vertices[i] == p.vertices[(f + i) % n]),
        }
    }
}

impl Display for ConvexPolygon {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{{\"ConvexPolygon\": [")?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]}}")
    }
}

/// `vertices_contain` returns true if the convex polygon with the given
/// counter-clockwise vertices contains v: v must be on or to the left
/// of every edge plane.
pub(crate) fn vertices_contain(verts: &[UnitVector3d], v: &UnitVector3d) -> bool {
    let mut i = verts.len() - 1;
    for j in 0..verts.len() {
        if orientation(v, &verts[i], &verts[j]) < 0 {
            return false;
        }
        i = j;
    }
    true
}

pub(crate) fn vertices_centroid(verts: &[UnitVector3d]) -> UnitVector3d {
    // Per-edge center of mass contributions, generalized from the
    // spherical triangle formula in:
    //
    //     The centroid and inertia tensor for a spherical triangle,
    //     John E. Brock, 1974, Naval Postgraduate School.
    let mut cm = Vector3d::default();
    let mut i = verts.len() - 1;
    for j in 0..verts.len() {
        let v = verts[i].robust_cross(&verts[j]);
        let norm = v.norm();
        let s = 0.5 * norm;
        let c = verts[i].dot(&verts[j]);
        let a = if s == 0.0 && c == 0.0 { 0.0 } else { s.atan2(c) };
        if norm != 0.0 {
            cm = cm + v * (a / norm);
        }
        i = j;
    }
    UnitVector3d::from_vector(&cm)
}

pub(crate) fn vertices_bounding_circle(verts: &[UnitVector3d]) -> Circle {
    let c = vertices_centroid(verts);
    let mut cl2 = 0.0_f64;
    for v in verts {
        cl2 = cl2.max((*v - c).squared_norm());
    }
    // Doubling the squared-chord-length error bound makes the circle
    // reliably contain the polygon.
    Circle::from_squared_chord_length(c, cl2 + 2.0 * MAX_SQUARED_CHORD_LENGTH_ERROR)
}

pub(crate) fn vertices_bounding_box(verts: &[UnitVector3d]) -> LonLatBox {
    let eps = Angle::from_radians(5.0e-10); // ~ 0.1 milliarcsec
    let mut bbox = LonLatBox::empty();
    let mut have_cw = false;
    let mut have_ccw = false;
    let mut i = verts.len() - 1;
    for j in 0..verts.len() {
        // Convert each vertex to a small box covering the rounding error
        // of the vector-to-spherical transformation, and take the union.
        let p = LonLat::from_vector(verts[j].as_vector());
        bbox.expand_to_box(&LonLatBox::from_center(&p, eps, eps));
        if !have_cw || !have_ccw {
            let o = orientation_z(&verts[i], &verts[j]);
            have_ccw = have_ccw || o > 0;
            have_cw = have_cw || o < 0;
        }
        // The latitude range of an edge exceeds that of its endpoints
        // when the maximum (or minimum) latitude point of its great
        // circle lies in the edge interior. That point is the direction
        // v below, built from the edge plane normal.
        let n = verts[i].robust_cross(&verts[j]);
        let v = Vector3d::new(
            -n.x * n.z,
            -n.y * n.z,
            n.x * n.x + n.y * n.y,
        );
        if !v.is_zero() {
            // The plane spanned by ẑ and n has normal (−n.y, n.x, 0);
            // the edge crosses it when the endpoints lie on opposite
            // sides.
            let zni = verts[i].y() * n.x - verts[i].x() * n.y;
            let znj = verts[j].y() * n.x - verts[j].x() * n.y;
            if zni > 0.0 && znj < 0.0 {
                let lat = bbox
                    .lat()
                    .expanded_to(LonLat::latitude_of(&v) + eps);
                bbox = LonLatBox::new(*bbox.lon(), lat);
            } else if zni < 0.0 && znj > 0.0 {
                let lat = bbox
                    .lat()
                    .expanded_to(LonLat::latitude_of(&-v) - eps);
                bbox = LonLatBox::new(*bbox.lon(), lat);
            }
        }
        i = j;
    }
    // A polygon containing a pole spans all longitudes.
    if !have_cw {
        let north = LonLatBox::new(
            LonLatBox::all_longitudes(),
            AngleInterval::point(Angle::from_radians(HALF_PI)),
        );
        bbox.expand_to_box(&north);
    } else if !have_ccw {
        let south = LonLatBox::new(
            LonLatBox::all_longitudes(),
            AngleInterval::point(Angle::from_radians(-HALF_PI)),
        );
        bbox.expand_to_box(&south);
    }
    bbox
}

pub(crate) fn vertices_bounding_box3d(verts: &[UnitVector3d]) -> Box3d {
    const MAX_ERROR: f64 = 1.0e-14;
    // Extrema of the vertex coordinates.
    let mut emin = [verts[0].x(), verts[0].y(), verts[0].z()];
    let mut emax = emin;
    for v in &verts[1..] {
        for i in 0..3 {
            emin[i] = emin[i].min(v.component(i));
            emax[i] = emax[i].max(v.component(i));
        }
    }
    // Extrema of the edges. The great circle with unit normal n has its
    // x extrema at (∓√(1 − n₀²), ±n₁n₀/√(1 − n₀²), ±n₂n₀/√(1 − n₀²)),
    // and similarly for y and z. Compute those directions per edge and
    // use them when they fall inside the edge.
    let mut j = verts.len() - 1;
    for k in 0..verts.len() {
        let n = UnitVector3d::from_vector(&verts[j].robust_cross(&verts[k]));
        for i in 0..3 {
            let ni = n.component(i);
            let d = (1.0 - ni * ni).abs();
            if d > 0.0 {
                let e = Vector3d::new(
                    if i == 0 { -d } else { n.x() * ni },
                    if i == 1 { -d } else { n.y() * ni },
                    if i == 2 { -d } else { n.z() * ni },
                );
                // e (or −e) is an extremum of the edge when it lies in
                // the lune between the half great circles through n and
                // each endpoint.
                let v = e.cross(n.as_vector());
                let vdj = v.dot(verts[j].as_vector());
                let vdk = v.dot(verts[k].as_vector());
                if vdj >= 0.0 && vdk <= 0.0 {
                    emin[i] = emin[i].min(-d.sqrt());
                }
                if vdj <= 0.0 && vdk >= 0.0 {
                    emax[i] = emax[i].max(d.sqrt());
                }
            }
        }
        j = k;
    }
    // Check the standard basis vectors and their antipodes for polygon
    // membership: b[i] holds for eᵢ inside every edge half space, a[i]
    // for −eᵢ (using orientation(−eᵢ, u, v) = −orientation(eᵢ, u, v)).
    let mut a = [true; 3];
    let mut b = [true; 3];
    let mut j = verts.len() - 1;
    for k in 0..verts.len() {
        let ox = orientation_x(&verts[j], &verts[k]);
        a[0] = a[0] && ox <= 0;
        b[0] = b[0] && ox >= 0;
        let oy = orientation_y(&verts[j], &verts[k]);
        a[1] = a[1] && oy <= 0;
        b[1] = b[1] && oy >= 0;
        let oz = orientation_z(&verts[j], &verts[k]);
        a[2] = a[2] && oz <= 0;
        b[2] = b[2] && oz >= 0;
        j = k;
    }
    let mut e = [Interval1d::empty(); 3];
    for i in 0..3 {
        let lo = if a[i] {
            -1.0
        } else {
            (emin[i] - MAX_ERROR).max(-1.0)
        };
        let hi = if b[i] {
            1.0
        } else {
            (emax[i] + MAX_ERROR).min(1.0)
        };
        e[i] = Interval1d::new(lo, hi);
    }
    Box3d::new(e[0], e[1], e[2])
}

pub(crate) fn relate_vertices_box(verts: &[UnitVector3d], b: &LonLatBox) -> Relationship {
    // Box relations go through the polygon's bounding box, which can
    // prove disjointness and enclosure but never containment.
    vertices_bounding_box(verts).relate_box(b) & (DISJOINT | WITHIN)
}

pub(crate) fn relate_vertices_circle(verts: &[UnitVector3d], c: &Circle) -> Relationship {
    if c.is_empty() {
        return CONTAINS | DISJOINT;
    }
    if c.is_full() {
        return WITHIN;
    }
    // If the polygon vertices are not all inside or all outside of c,
    // the boundaries cross.
    let mut inside = false;
    for (k, v) in verts.iter().enumerate() {
        let d = (*v - *c.center()).squared_norm();
        if (d - c.squared_chord_length()).abs() < MAX_SQUARED_CHORD_LENGTH_ERROR {
            // A polygon vertex is close to the circle boundary.
            return INTERSECTS;
        }
        let b = d < c.squared_chord_length();
        if k == 0 {
            inside = b;
        } else if inside != b {
            return INTERSECTS;
        }
    }
    if inside {
        // All vertices are inside c; look for edge interior points that
        // are outside.
        let mut a = verts.len() - 1;
        for b in 0..verts.len() {
            let n = verts[a].robust_cross(&verts[b]);
            let d = max_squared_chord_length(c.center().as_vector(), &verts[a], &verts[b], &n);
            if d > c.squared_chord_length() - MAX_SQUARED_CHORD_LENGTH_ERROR {
                return INTERSECTS;
            }
            a = b;
        }
        // The polygon boundary is conclusively inside c. The circle can
        // still punch a hole through the polygon; that happens exactly
        // when the polygon contains the anti-center of c.
        if vertices_contain(verts, &-*c.center()) {
            return INTERSECTS;
        }
        return WITHIN;
    }
    // All vertices are outside c; look for edge interior points that
    // are inside.
    let mut a = verts.len() - 1;
    for b in 0..verts.len() {
        let n = verts[a].robust_cross(&verts[b]);
        let d = min_squared_chord_length(c.center().as_vector(), &verts[a], &verts[b], &n);
        if d < c.squared_chord_length() + MAX_SQUARED_CHORD_LENGTH_ERROR {
            return INTERSECTS;
        }
        a = b;
    }
    // The boundary is conclusively outside of c: the polygon either
    // contains the whole circle or misses it.
    if vertices_contain(verts, c.center()) {
        return CONTAINS;
    }
    DISJOINT
}

pub(crate) fn relate_vertices_vertices(
    verts1: &[UnitVector3d],
    verts2: &[UnitVector3d],
) -> Relationship {
    let mut all1 = true;
    let mut any1 = false;
    let mut all2 = true;
    let mut any2 = false;
    for v in verts1 {
        let b = vertices_contain(verts2, v);
        all1 = b && all1;
        any1 = b || any1;
    }
    for v in verts2 {
        let b = vertices_contain(verts1, v);
        all2 = b && all2;
        any2 = b || any2;
    }
    if all1 || all2 {
        // All vertices of one polygon are inside the other.
        return (if all1 { WITHIN } else { INTERSECTS })
            | (if all2 { CONTAINS } else { INTERSECTS });
    }
    if any1 || any2 {
        return INTERSECTS;
    }
    // No vertex of either polygon is inside the other; look for an edge
    // crossing across all edge pairs.
    let mut a = verts1.len() - 1;
    for b in 0..verts1.len() {
        let mut c = verts2.len() - 1;
        for d in 0..verts2.len() {
            let acd = orientation(&verts1[a], &verts2[c], &verts2[d]);
            let bdc = orientation(&verts1[b], &verts2[d], &verts2[c]);
            if acd == bdc && acd != 0 {
                let cba = orientation(&verts2[c], &verts1[b], &verts1[a]);
                let dab = orientation(&verts2[d], &verts1[a], &verts1[b]);
                if cba == dab && cba == acd {
                    // A non-degenerate edge crossing.
                    return INTERSECTS;
                }
            }
            c = d;
        }
        a = b;
    }
    DISJOINT
}

// Rearranges `points` so that the first two entries are distinct,
// returning the index of the first unconsumed point.
fn find_plane(points: &mut [UnitVector3d]) -> Result<usize, ValidationError> {
    if points.is_empty() {
        return Err(ValidationError::NotEnoughPoints);
    }
    let v0 = points[0];
    let mut i = 1;
    while i < points.len() {
        if points[i] == -v0 {
            return Err(ValidationError::AntipodalPoints);
        }
        if points[i] != v0 {
            break;
        }
        i += 1;
    }
    if i == points.len() {
        return Err(ValidationError::NotEnoughPoints);
    }
    points[1] = points[i];
    Ok(i + 1)
}

// Rearranges `points` so that the first three entries form a
// counter-clockwise triangle, returning the index of the first
// unconsumed point.
fn find_triangle(points: &mut [UnitVector3d]) -> Result<usize, ValidationError> {
    let mut i = find_plane(points)?;
    // robust_cross is non-zero for distinct, non-antipodal inputs, and
    // normalization never maps a non-zero vector to zero.
    let mut n = UnitVector3d::from_vector(&points[0].robust_cross(&points[1]));
    while i < points.len() {
        let v = points[i];
        let ccw = orientation(&points[0], &points[1], &v);
        if ccw > 0 {
            break;
        } else if ccw < 0 {
            // A clockwise triangle: swap the first two vertices to flip
            // its orientation.
            points.swap(0, 1);
            break;
        }
        // v is coplanar with the first two vertices.
        if v == points[0] || v == points[1] {
            i += 1;
            continue;
        }
        if v == -points[0] || v == -points[1] {
            return Err(ValidationError::AntipodalPoints);
        }
        // All three are distinct and non-antipodal. Keep the two
        // endpoints of the longest great-circle segment through them;
        // if no pair works, the segment spans more than π radians and
        // must contain antipodal points.
        let v0v = orientation(&n, &points[0], &v);
        let vv1 = orientation(&n, &v, &points[1]);
        if v0v == vv1 {
            // v lies between the current endpoints.
            i += 1;
            continue;
        }
        let v0v1 = orientation(&n, &points[0], &points[1]);
        if v0v1 == -vv1 {
            points[1] = v;
        } else if -v0v == v0v1 {
            points[0] = v;
        } else {
            return Err(ValidationError::AntipodalPoints);
        }
        n = UnitVector3d::from_vector(&points[0].robust_cross(&points[1]));
        i += 1;
    }
    if i == points.len() {
        return Err(ValidationError::NotEnoughPoints);
    }
    points[2] = points[i];
    Ok(i + 1)
}

// Computes the convex hull of a point set by insertion, starting from a
// seed triangle.
fn compute_hull(mut points: Vec<UnitVector3d>) -> Result<Vec<UnitVector3d>, ValidationError> {
    let rest = find_triangle(&mut points)?;
    let mut hull: Vec<UnitVector3d> = points[0..3].to_vec();
    for idx in rest..points.len() {
        let v = points[idx];
        let n = hull.len();
        // Classify each hull edge by its orientation with respect to v.
        let ccw: Vec<bool> = (0..n)
            .map(|k| orientation(&v, &hull[k], &hull[(k + 1) % n]) > 0)
            .collect();
        if ccw.iter().all(|&c| c) {
            // v is inside the current hull.
            continue;
        }
        if !ccw.iter().any(|&c| c) {
            // −v is inside the current hull, so the hull of v and the
            // current hull is not a convex polygon.
            return Err(ValidationError::AntipodalPoints);
        }
        // The edges not counter-clockwise with respect to v form one
        // contiguous run. Replace the vertices interior to that run
        // with v.
        let k1 = (0..n)
            .find(|&k| !ccw[k] && ccw[(k + n - 1) % n])
            .expect("mixed orientations imply a transition");
        let mut k2 = k1;
        while !ccw[(k2 + 1) % n] {
            k2 = (k2 + 1) % n;
        }
        let mut new_hull = Vec::with_capacity(n + 1);
        let mut k = (k2 + 1) % n;
        loop {
            new_hull.push(hull[k]);
            if k == k1 {
                break;
            }
            k = (k + 1) % n;
        }
        new_hull.push(v);
        hull = new_hull;
    }
    Ok(hull)
}
