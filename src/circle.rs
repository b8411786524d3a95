use std::fmt::{self, Display, Formatter};

use crate::angle::{Angle, NormalizedAngle};
use crate::box3d::Box3d;
use crate::codec;
use crate::error::DecodeError;
use crate::interval::Interval1d;
use crate::lonlat::LonLat;
use crate::lonlat_box::LonLatBox;
use crate::relationship::{CONTAINS, DISJOINT, INTERSECTS, Relationship, WITHIN};
use crate::utils::{MAX_ASIN_ERROR, MAX_BOUNDARY_ERROR};
use crate::vector::UnitVector3d;

const PI: f64 = std::f64::consts::PI;

/// `Circle` is a circular region on the unit sphere that contains its
/// boundary.
///
/// Internally the circle is represented by its center and the squared
/// length of chords between the center and boundary points. This gives
/// a fast point-in-circle test and, unlike a representation through the
/// cosine of the opening angle, stays accurate for very small circles.
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    center: UnitVector3d,
    squared_chord_length: f64,
    opening_angle: Angle,
}

impl Default for Circle {
    fn default() -> Self {
        Self::empty()
    }
}

impl Circle {
    pub const TYPE_CODE: u8 = b'c';

    pub fn empty() -> Self {
        Circle {
            center: UnitVector3d::z_axis(),
            squared_chord_length: -1.0,
            opening_angle: Angle::from_radians(-1.0),
        }
    }

    pub fn full() -> Self {
        Circle::from_squared_chord_length(UnitVector3d::z_axis(), 4.0)
    }

    /// Creates the circle with center c and opening angle zero.
    ///
    /// Because of rounding, `(v − c)·(v − c) == 0` does not imply
    /// `v == c`, so `contains` may accept unit vectors distinct from c.
    pub fn point(c: UnitVector3d) -> Self {
        Circle {
            center: c,
            squared_chord_length: 0.0,
            opening_angle: Angle::from_radians(0.0),
        }
    }

    /// Creates a circle with center c and opening angle a. A negative
    /// or NaN angle gives an empty circle; an angle of at least π gives
    /// the full sphere.
    pub fn new(c: UnitVector3d, a: Angle) -> Self {
        Circle {
            center: c,
            squared_chord_length: Self::squared_chord_length_for(a),
            opening_angle: a,
        }
    }

    /// Creates a circle with center c and squared chord length cl2. A
    /// negative or NaN value gives an empty circle; a value of at least
    /// 4 gives the full sphere.
    pub fn from_squared_chord_length(c: UnitVector3d, cl2: f64) -> Self {
        Circle {
            center: c,
            squared_chord_length: cl2,
            opening_angle: Self::opening_angle_for(cl2),
        }
    }

    /// `squared_chord_length_for` returns the squared chord length l²
    /// between points separated by angle θ, where l² = 4·sin²(θ/2).
    pub fn squared_chord_length_for(a: Angle) -> f64 {
        if a.as_radians() < 0.0 {
            return -1.0;
        }
        if a.as_radians() >= PI {
            return 4.0;
        }
        let s = (0.5 * a.as_radians()).sin();
        4.0 * s * s
    }

    /// `opening_angle_for` returns the angular separation corresponding
    /// to the given squared chord length.
    pub fn opening_angle_for(cl2: f64) -> Angle {
        // The maximum error in this and in the circle bounding box width
        // is about 2 * MAX_ASIN_ERROR.
        if cl2 < 0.0 {
            return Angle::from_radians(-1.0);
        }
        if cl2 >= 4.0 {
            return Angle::from_radians(PI);
        }
        Angle::from_radians(2.0 * (0.5 * cl2.sqrt()).asin())
    }

    pub fn center(&self) -> &UnitVector3d {
        &self.center
    }

    pub fn squared_chord_length(&self) -> f64 {
        self.squared_chord_length
    }

    pub fn opening_angle(&self) -> Angle {
        self.opening_angle
    }

    pub fn is_empty(&self) -> bool {
        // NaN squared chord lengths are empty as well.
        !(self.squared_chord_length >= 0.0)
    }

    pub fn is_full(&self) -> bool {
        self.squared_chord_length >= 4.0
    }

    /// `area` returns the area of this circle in steradians.
    pub fn area(&self) -> f64 {
        PI * self.squared_chord_length.clamp(0.0, 4.0)
    }

    pub fn contains(&self, v: &UnitVector3d) -> bool {
        self.is_full()
            || (*v - self.center).squared_norm() <= self.squared_chord_length
    }

    /// `contains_circle` returns true if the intersection of this circle
    /// and x equals x.
    pub fn contains_circle(&self, x: &Circle) -> bool {
        if self.is_full() || x.is_empty() {
            return true;
        }
        if self.is_empty() || x.is_full() {
            return false;
        }
        if self == x {
            return true;
        }
        let cc = NormalizedAngle::separation(&self.center, &x.center);
        self.opening_angle
            > cc.angle() + x.opening_angle + Angle::from_radians(4.0 * MAX_ASIN_ERROR)
    }

    pub fn is_disjoint_from(&self, x: &UnitVector3d) -> bool {
        !self.contains(x)
    }

    pub fn is_disjoint_from_circle(&self, x: &Circle) -> bool {
        if self.is_empty() || x.is_empty() {
            return true;
        }
        if self.is_full() || x.is_full() {
            return false;
        }
        let cc = NormalizedAngle::separation(&self.center, &x.center);
        cc.angle()
            > self.opening_angle + x.opening_angle + Angle::from_radians(4.0 * MAX_ASIN_ERROR)
    }

    pub fn intersects(&self, x: &UnitVector3d) -> bool {
        self.contains(x)
    }

    pub fn intersects_circle(&self, x: &Circle) -> bool {
        !self.is_disjoint_from_circle(x)
    }

    pub fn is_within(&self, x: &Circle) -> bool {
        x.contains_circle(self)
    }

    /// `clip_to` sets this circle to a bounding circle of the
    /// intersection of itself and x.
    pub fn clip_to(&mut self, x: &Circle) -> &mut Self {
        if self.is_empty() || x.is_full() {
            return self;
        }
        if self.is_full() || x.is_empty() {
            *self = *x;
            return self;
        }
        let a = self.opening_angle;
        let b = x.opening_angle;
        let cc = NormalizedAngle::separation(&self.center, &x.center);
        if cc.angle() > a + b + Angle::from_radians(4.0 * MAX_ASIN_ERROR) {
            *self = Circle::empty();
            return self;
        }
        // The circles nearly intersect or one contains the other; the
        // smaller operand is a valid (non-minimal) bound on the
        // intersection.
        if b < a {
            *self = *x;
        }
        self
    }

    pub fn clipped_to(&self, x: &Circle) -> Circle {
        let mut c = *self;
        c.clip_to(x);
        c
    }

    pub fn clip_to_point(&mut self, x: &UnitVector3d) -> &mut Self {
        *self = if self.contains(x) {
            Circle::point(*x)
        } else {
            Circle::empty()
        };
        self
    }

    /// `expand_to` minimally expands this circle to contain x.
    pub fn expand_to(&mut self, x: &UnitVector3d) -> &mut Self {
        if self.is_empty() {
            *self = Circle::point(*x);
        } else if !self.contains(x) {
            // The minimal bounding circle spans the boundary point
            // opposite x to x itself; its center is the midpoint of that
            // arc, obtained by rotating this circle's center around the
            // normal of the plane through both centers (Rodrigues'
            // formula, simplified because the rotation axis is
            // orthogonal to the rotated vector).
            let n = UnitVector3d::orthogonal_to_pair(&self.center, x);
            let cx = NormalizedAngle::separation(&self.center, x);
            let o = 0.5 * (cx.angle() + self.opening_angle);
            let r = 0.5 * (cx.angle() - self.opening_angle);
            let c = self.center * r.cos() + n.cross(&self.center) * r.sin();
            let a = o + Angle::from_radians(MAX_ASIN_ERROR);
            self.center = UnitVector3d::from_vector(&c);
            self.squared_chord_length = Self::squared_chord_length_for(a);
            self.opening_angle = a;
        }
        self
    }

    pub fn expanded_to(&self, x: &UnitVector3d) -> Circle {
        let mut c = *self;
        c.expand_to(x);
        c
    }

    /// `expand_to_circle` minimally expands this circle to contain x,
    /// with a guard of a few MAX_ASIN_ERROR so the result reliably
    /// contains both operands.
    pub fn expand_to_circle(&mut self, x: &Circle) -> &mut Self {
        if self.is_empty() || x.is_full() {
            *self = *x;
            return self;
        }
        if x.is_empty() || self.is_full() {
            return self;
        }
        let cc = NormalizedAngle::separation(&self.center, &x.center);
        let pad = Angle::from_radians(4.0 * MAX_ASIN_ERROR);
        if cc.angle() + x.opening_angle + pad <= self.opening_angle {
            // This circle contains x.
            return self;
        }
        if cc.angle() + self.opening_angle + pad <= x.opening_angle {
            // x contains this circle.
            *self = *x;
            return self;
        }
        let o = 0.5 * (cc.angle() + self.opening_angle + x.opening_angle);
        if o + Angle::from_radians(2.0 * MAX_ASIN_ERROR) >= Angle::from_radians(PI) {
            *self = Circle::full();
            return self;
        }
        let n = UnitVector3d::orthogonal_to_pair(&self.center, &x.center);
        let r = o - self.opening_angle;
        let c = self.center * r.cos() + n.cross(&self.center) * r.sin();
        let a = o + Angle::from_radians(MAX_ASIN_ERROR);
        self.center = UnitVector3d::from_vector(&c);
        self.squared_chord_length = Self::squared_chord_length_for(a);
        self.opening_angle = a;
        self
    }

    pub fn expanded_to_circle(&self, x: &Circle) -> Circle {
        let mut c = *self;
        c.expand_to_circle(x);
        c
    }

    /// If r is positive, `dilate_by` grows the opening angle of this
    /// circle by r; if negative, it shrinks it. Empty and full circles,
    /// and zero or NaN r, are left unchanged.
    pub fn dilate_by(&mut self, r: Angle) -> &mut Self {
        if !self.is_empty() && !self.is_full() && (r.as_radians() != 0.0 && !r.is_nan()) {
            let o = self.opening_angle + r;
            self.squared_chord_length = Self::squared_chord_length_for(o);
            self.opening_angle = o;
        }
        self
    }

    pub fn dilated_by(&self, r: Angle) -> Circle {
        let mut c = *self;
        c.dilate_by(r);
        c
    }

    pub fn erode_by(&mut self, r: Angle) -> &mut Self {
        self.dilate_by(-r)
    }

    pub fn eroded_by(&self, r: Angle) -> Circle {
        self.dilated_by(-r)
    }

    /// `complement` sets this circle to the closure of its complement.
    ///
    /// Both the empty circle and single-point circles map to the full
    /// circle, so complementing twice does not always reproduce the
    /// original.
    pub fn complement(&mut self) -> &mut Self {
        if self.is_empty() {
            self.squared_chord_length = 4.0;
            self.opening_angle = Angle::from_radians(PI);
        } else if self.is_full() {
            self.squared_chord_length = -1.0;
            self.opening_angle = Angle::from_radians(-1.0);
        } else {
            self.center = -self.center;
            self.squared_chord_length = 4.0 - self.squared_chord_length;
            self.opening_angle = Angle::from_radians(PI) - self.opening_angle;
        }
        self
    }

    pub fn complemented(&self) -> Circle {
        let mut c = *self;
        c.complement();
        c
    }

    pub fn relate_point(&self, v: &UnitVector3d) -> Relationship {
        if self.contains(v) {
            CONTAINS
        } else if self.is_empty() {
            DISJOINT | WITHIN
        } else {
            DISJOINT
        }
    }

    pub fn relate_circle(&self, c: &Circle) -> Relationship {
        if self.is_empty() {
            if c.is_empty() {
                return CONTAINS | DISJOINT | WITHIN;
            }
            return DISJOINT | WITHIN;
        } else if c.is_empty() {
            return CONTAINS | DISJOINT;
        }
        if self.is_full() {
            if c.is_full() {
                return CONTAINS | WITHIN;
            }
            return CONTAINS;
        } else if c.is_full() {
            return WITHIN;
        }
        // Equality can be missed by the threshold logic below due to
        // round-off, so special-case it.
        if self == c {
            return CONTAINS | WITHIN;
        }
        let cc = NormalizedAngle::separation(&self.center, &c.center);
        let pad = Angle::from_radians(4.0 * MAX_ASIN_ERROR);
        if cc.angle() > self.opening_angle + c.opening_angle + pad {
            return DISJOINT;
        }
        if cc.angle() + c.opening_angle + pad <= self.opening_angle {
            return CONTAINS;
        } else if cc.angle() + self.opening_angle + pad <= c.opening_angle {
            return WITHIN;
        }
        INTERSECTS
    }

    pub fn bounding_box(&self) -> LonLatBox {
        let c = LonLat::from_vector(self.center.as_vector());
        let h = self.opening_angle + Angle::from_radians(2.0 * MAX_ASIN_ERROR);
        let w = LonLatBox::half_width_for_circle(h, c.lat()).angle()
            + Angle::from_radians(MAX_ASIN_ERROR);
        LonLatBox::from_center(&c, w, h)
    }

    pub fn bounding_box3d(&self) -> Box3d {
        if self.is_empty() {
            return Box3d::empty();
        }
        if self.is_full() {
            return Box3d::around_unit_sphere();
        }
        // For circle center c and standard basis vector eᵢ, ±eᵢ lies in
        // the circle iff 2 ∓ 2cᵢ ≤ s. Along axis i, the circle boundary
        // extends over sin(asin(cᵢ) ± θ), which expands to the code
        // below via the usual identities.
        let s = self.opening_angle.sin();
        let c = self.opening_angle.cos();
        let mut e = [Interval1d::empty(); 3];
        for (i, interval) in e.iter_mut().enumerate() {
            let ci = self.center.component(i);
            let di = (1.0 - ci * ci).max(0.0).sqrt();
            let mut bmin: f64 = 1.0;
            let mut bmax: f64 = -1.0;
            if 2.0 - 2.0 * ci <= self.squared_chord_length {
                bmax = 1.0;
            }
            if 2.0 + 2.0 * ci <= self.squared_chord_length {
                bmin = -1.0;
            }
            let b0 = ci * c + di * s;
            bmax = bmax.max(b0 + MAX_BOUNDARY_ERROR);
            bmin = bmin.min(b0 - MAX_BOUNDARY_ERROR);
            let b1 = ci * c - di * s;
            bmax = bmax.max(b1 + MAX_BOUNDARY_ERROR);
            bmin = bmin.min(b1 - MAX_BOUNDARY_ERROR);
            *interval = Interval1d::new(bmin.max(-1.0), bmax.min(1.0));
        }
        Box3d::new(e[0], e[1], e[2])
    }

    pub fn bounding_circle(&self) -> Circle {
        *self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(codec::CIRCLE_ENCODED_SIZE);
        buffer.push(Self::TYPE_CODE);
        codec::encode_f64(self.center.x(), &mut buffer);
        codec::encode_f64(self.center.y(), &mut buffer);
        codec::encode_f64(self.center.z(), &mut buffer);
        codec::encode_f64(self.squared_chord_length, &mut buffer);
        codec::encode_f64(self.opening_angle.as_radians(), &mut buffer);
        buffer
    }

    pub fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        codec::check_fixed_size(buffer, Self::TYPE_CODE, codec::CIRCLE_ENCODED_SIZE)?;
        let x = codec::decode_f64(&buffer[1..]);
        let y = codec::decode_f64(&buffer[9..]);
        let z = codec::decode_f64(&buffer[17..]);
        let cl2 = codec::decode_f64(&buffer[25..]);
        let a = codec::decode_f64(&buffer[33..]);
        Ok(Circle {
            center: UnitVector3d::from_normalized(x, y, z),
            squared_chord_length: cl2,
            opening_angle: Angle::from_radians(a),
        })
    }
}

impl PartialEq for Circle {
    fn eq(&self, c: &Circle) -> bool {
        (self.is_empty() && c.is_empty())
            || (self.is_full() && c.is_full())
            || (self.center == c.center
                && self.squared_chord_length == c.squared_chord_length
                && self.opening_angle == c.opening_angle)
    }
}

impl Display for Circle {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{{\"Circle\": [{}, {}]}}",
            self.center, self.squared_chord_length
        )
    }
}
