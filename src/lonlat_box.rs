use std::fmt::{self, Display, Formatter};

use crate::angle::{Angle, NormalizedAngle};
use crate::box3d::Box3d;
use crate::circle::Circle;
use crate::codec;
use crate::error::{DecodeError, ValidationError};
use crate::interval::{AngleInterval, Interval1d, NormalizedAngleInterval};
use crate::lonlat::LonLat;
use crate::relationship::{CONTAINS, DISJOINT, INTERSECTS, Relationship, WITHIN};
use crate::utils::{EPSILON, MAX_ASIN_ERROR, MAX_SQUARED_CHORD_LENGTH_ERROR};
use crate::vector::UnitVector3d;

const PI: f64 = std::f64::consts::PI;
const HALF_PI: f64 = 0.5 * PI;

/// `LonLatBox` is a rectangle in spherical coordinate space that
/// contains its boundary.
///
/// A box can be empty or full, may contain a single point, and can also
/// represent polar caps and annuli (when it spans all longitudes). The
/// longitude interval may wrap through the 0 ≡ 2π seam; the latitude
/// interval is always a subset of [−π/2, π/2], and is empty exactly
/// when the longitude interval is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LonLatBox {
    lon: NormalizedAngleInterval,
    lat: AngleInterval,
}

impl LonLatBox {
    pub const TYPE_CODE: u8 = b'b';

    pub fn empty() -> Self {
        LonLatBox::default()
    }

    pub fn full() -> Self {
        LonLatBox::new(Self::all_longitudes(), Self::all_latitudes())
    }

    pub fn from_degrees(
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
    ) -> Result<Self, ValidationError> {
        Ok(LonLatBox::new(
            NormalizedAngleInterval::from_degrees(lon1, lon2)?,
            AngleInterval::from_degrees(lat1, lat2),
        ))
    }

    pub fn from_radians(
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
    ) -> Result<Self, ValidationError> {
        Ok(LonLatBox::new(
            NormalizedAngleInterval::from_radians(lon1, lon2)?,
            AngleInterval::from_radians(lat1, lat2),
        ))
    }

    pub fn new(lon: NormalizedAngleInterval, lat: AngleInterval) -> Self {
        let mut b = LonLatBox { lon, lat };
        b.enforce_invariants();
        b
    }

    pub fn from_point(p: &LonLat) -> Self {
        LonLatBox::new(
            NormalizedAngleInterval::point(p.lon()),
            AngleInterval::point(p.lat()),
        )
    }

    /// Creates the box spanning the longitude interval
    /// [p1.lon(), p2.lon()] and latitude interval [p1.lat(), p2.lat()].
    pub fn from_points(p1: &LonLat, p2: &LonLat) -> Self {
        LonLatBox::new(
            NormalizedAngleInterval::new(p1.lon(), p2.lon()),
            AngleInterval::new(p1.lat(), p2.lat()),
        )
    }

    /// Creates the box with center p, half-width w and half-height h.
    pub fn from_center(p: &LonLat, w: Angle, h: Angle) -> Self {
        LonLatBox::new(
            NormalizedAngleInterval::point(p.lon()).dilated_by(w),
            AngleInterval::point(p.lat()).dilated_by(h),
        )
    }

    /// `all_longitudes` returns the normalized angle interval containing
    /// every valid longitude.
    pub fn all_longitudes() -> NormalizedAngleInterval {
        NormalizedAngleInterval::full()
    }

    /// `all_latitudes` returns the angle interval containing every valid
    /// latitude.
    pub fn all_latitudes() -> AngleInterval {
        AngleInterval::from_radians(-HALF_PI, HALF_PI)
    }

    /// `half_width_for_circle` returns the longitude half-width of the
    /// bounding box of a circle of opening angle r centered at the given
    /// latitude. Non-positive r gives zero; a circle that reaches a pole
    /// gives π.
    pub fn half_width_for_circle(r: Angle, lat: Angle) -> NormalizedAngle {
        if r.as_radians() <= 0.0 {
            return NormalizedAngle::from_radians_unchecked(0.0);
        }
        if lat.abs() + r >= Angle::from_radians(HALF_PI) {
            return NormalizedAngle::from_radians_unchecked(PI);
        }
        // Consider the circle of opening r centered at (0, δ) with
        // r < π/2 and |δ| ≠ π/2. The plane of the bounding meridian at
        // longitude α is tangent to the circle, and the arc between the
        // circle center and that plane's normal has length π/2 + r, so
        //
        //    (cos δ, 0, sin δ) · (−sin α, cos α, 0) = cos(π/2 + r)
        //
        // which solves to α = arcsin(sin r / cos δ).
        let s = (r.sin() / lat.cos()).abs();
        if s >= 1.0 {
            return NormalizedAngle::from_radians_unchecked(HALF_PI);
        }
        NormalizedAngle::from_radians_unchecked(s.asin())
    }

    pub fn lon(&self) -> &NormalizedAngleInterval {
        &self.lon
    }

    pub fn lat(&self) -> &AngleInterval {
        &self.lat
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lon.is_full() && self.lat == Self::all_latitudes()
    }

    /// `center` is NaN for empty boxes and arbitrary for full ones.
    pub fn center(&self) -> LonLat {
        LonLat::new_unchecked(self.lon.center(), self.lat.center())
    }

    /// `width` is NaN for empty boxes.
    pub fn width(&self) -> Angle {
        self.lon.size()
    }

    /// `height` is negative or NaN for empty boxes.
    pub fn height(&self) -> Angle {
        self.lat.size()
    }

    /// `area` returns the area of this box in steradians.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        // sin is not correctly rounded, so guard against a slightly
        // negative product.
        let dz = self.lat.b().sin() - self.lat.a().sin();
        (self.lon.size().as_radians() * dz).abs()
    }

    pub fn contains(&self, p: &LonLat) -> bool {
        self.lat.contains(p.lat()) && self.lon.contains(p.lon())
    }

    pub fn contains_point(&self, v: &UnitVector3d) -> bool {
        self.contains(&LonLat::from_vector(v.as_vector()))
    }

    pub fn contains_box(&self, b: &LonLatBox) -> bool {
        self.lat.contains_interval(&b.lat) && self.lon.contains_interval(&b.lon)
    }

    pub fn intersects(&self, b: &LonLatBox) -> bool {
        self.lat.intersects_interval(&b.lat) && self.lon.intersects_interval(&b.lon)
    }

    pub fn is_disjoint_from(&self, b: &LonLatBox) -> bool {
        !self.intersects(b)
    }

    pub fn is_within(&self, b: &LonLatBox) -> bool {
        b.contains_box(self)
    }

    /// `clip_to` sets this box to the smallest box containing the
    /// intersection of itself and b. The result is not always unique and
    /// `x.clip_to(y)` need not equal `y.clip_to(x)`.
    pub fn clip_to(&mut self, b: &LonLatBox) -> &mut Self {
        self.lon.clip_to(&b.lon);
        self.lat.clip_to(&b.lat);
        self.enforce_invariants();
        self
    }

    pub fn clipped_to(&self, b: &LonLatBox) -> LonLatBox {
        let mut r = *self;
        r.clip_to(b);
        r
    }

    /// `expand_to` minimally expands this box to contain x. The result
    /// is not always unique when longitude unions tie.
    pub fn expand_to(&mut self, p: &LonLat) -> &mut Self {
        self.lon.expand_to(p.lon());
        self.lat.expand_to(p.lat());
        self.enforce_invariants();
        self
    }

    pub fn expand_to_box(&mut self, b: &LonLatBox) -> &mut Self {
        self.lon.expand_to_interval(&b.lon);
        self.lat.expand_to_interval(&b.lat);
        self.enforce_invariants();
        self
    }

    pub fn expanded_to(&self, p: &LonLat) -> LonLatBox {
        let mut r = *self;
        r.expand_to(p);
        r
    }

    pub fn expanded_to_box(&self, b: &LonLatBox) -> LonLatBox {
        let mut r = *self;
        r.expand_to_box(b);
        r
    }

    /// `dilate_by` minimally grows this box to include every point
    /// within angular separation r of it. Empty and full boxes, and
    /// non-positive r, are left unchanged.
    pub fn dilate_by(&mut self, r: Angle) -> &mut Self {
        // The result is the union of the bounding boxes of all circles
        // of opening r centered inside this box. Bounding box width for
        // fixed r grows monotonically with |center latitude|, so the
        // extreme width occurs at the box's latitude boundary.
        if self.is_empty() || self.is_full() || r.as_radians() <= 0.0 {
            return self;
        }
        let max_abs_lat = self.lat.a().abs().max(self.lat.b().abs());
        let w = Self::half_width_for_circle(r, max_abs_lat);
        self.dilate_by_wh(w.angle(), r)
    }

    /// `dilate_by_wh` dilates (or, for negative values, erodes) the
    /// longitude interval by w and the latitude interval by h. A box
    /// touching a pole has no latitude boundary there, so it is not
    /// dilated past it.
    pub fn dilate_by_wh(&mut self, w: Angle, h: Angle) -> &mut Self {
        if self.is_empty() || self.is_full() {
            return self;
        }
        self.lon.dilate_by(w);
        if !h.is_nan() {
            let a = if self.lat.a() > Angle::from_radians(-HALF_PI) {
                self.lat.a() - h
            } else {
                self.lat.a()
            };
            let b = if self.lat.b() < Angle::from_radians(HALF_PI) {
                self.lat.b() + h
            } else {
                self.lat.b()
            };
            self.lat = AngleInterval::new(a, b);
        }
        self.enforce_invariants();
        self
    }

    pub fn dilated_by(&self, r: Angle) -> LonLatBox {
        let mut b = *self;
        b.dilate_by(r);
        b
    }

    pub fn dilated_by_wh(&self, w: Angle, h: Angle) -> LonLatBox {
        let mut b = *self;
        b.dilate_by_wh(w, h);
        b
    }

    pub fn erode_by(&mut self, w: Angle, h: Angle) -> &mut Self {
        self.dilate_by_wh(-w, -h)
    }

    pub fn eroded_by(&self, w: Angle, h: Angle) -> LonLatBox {
        self.dilated_by_wh(-w, -h)
    }

    pub fn relate_box(&self, b: &LonLatBox) -> Relationship {
        let r1 = self.lon.relate_interval(&b.lon);
        let r2 = self.lat.relate_interval(&b.lat);
        // Disjointness on either axis separates the boxes; the other
        // relationships must hold on both.
        ((r1 & r2) & (CONTAINS | WITHIN)) | ((r1 | r2) & DISJOINT)
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
        // Neither region is empty or full; decide whether the box and
        // circle boundaries intersect. If the box vertices are not all
        // inside or all outside c, they cross.
        let vert_lonlat = [
            LonLat::new_unchecked(self.lon.a(), self.lat.a()),
            LonLat::new_unchecked(self.lon.a(), self.lat.b()),
            LonLat::new_unchecked(self.lon.b(), self.lat.a()),
            LonLat::new_unchecked(self.lon.b(), self.lat.b()),
        ];
        let mut verts = [UnitVector3d::x_axis(); 4];
        let mut inside = false;
        for i in 0..4 {
            verts[i] = UnitVector3d::from_lonlat(&vert_lonlat[i]);
            let d = (verts[i] - *c.center()).squared_norm();
            if (d - c.squared_chord_length()).abs() < MAX_SQUARED_CHORD_LENGTH_ERROR {
                // A box vertex is close to the circle boundary.
                return INTERSECTS;
            }
            let b = d < c.squared_chord_length();
            if i == 0 {
                inside = b;
            } else if inside != b {
                // There are box vertices both inside and outside of c.
                return INTERSECTS;
            }
        }
        let norms = [
            UnitVector3d::orthogonal_to_meridian(self.lon.a().angle()),
            UnitVector3d::orthogonal_to_meridian(self.lon.b().angle()),
        ];
        if inside {
            // All box vertices are inside c. Look for points in the box
            // edge interiors that are outside c.
            for i in 0..2 {
                let d = crate::utils::max_squared_chord_length(
                    c.center().as_vector(),
                    &verts[2 * i + 1],
                    &verts[2 * i],
                    norms[i].as_vector(),
                );
                if d > c.squared_chord_length() - MAX_SQUARED_CHORD_LENGTH_ERROR {
                    return INTERSECTS;
                }
            }
            let cc = LonLat::from_vector((-*c.center()).as_vector());
            if self.lon.contains(cc.lon()) {
                // The points farthest from the circle center on the
                // constant-latitude box edges lie in the edge interiors.
                let a = (cc.lat() - self.lat.a())
                    .abs()
                    .min((cc.lat() - self.lat.b()).abs());
                let d = Circle::squared_chord_length_for(Angle::from_radians(PI) - a);
                if d > c.squared_chord_length() - MAX_SQUARED_CHORD_LENGTH_ERROR {
                    return INTERSECTS;
                }
            }
            // The box boundary is completely inside c. The box is still
            // not necessarily within c: if the box contains the
            // complement of a nearly-full c, each boundary is inside the
            // other region yet neither region contains the other. Since
            // the boundaries are disjoint, that happens exactly when the
            // box contains the center of the complement of c.
            if self.contains(&cc) {
                return INTERSECTS;
            }
            return WITHIN;
        }
        // All box vertices are outside c. Look for points in the box
        // edge interiors that are inside c.
        for i in 0..2 {
            let d = crate::utils::min_squared_chord_length(
                c.center().as_vector(),
                &verts[2 * i + 1],
                &verts[2 * i],
                norms[i].as_vector(),
            );
            if d < c.squared_chord_length() + MAX_SQUARED_CHORD_LENGTH_ERROR {
                return INTERSECTS;
            }
        }
        let cc = LonLat::from_vector(c.center().as_vector());
        if self.lon.contains(cc.lon()) {
            let a = (cc.lat() - self.lat.a())
                .abs()
                .min((cc.lat() - self.lat.b()).abs());
            let d = Circle::squared_chord_length_for(a);
            if d < c.squared_chord_length() + MAX_SQUARED_CHORD_LENGTH_ERROR {
                return INTERSECTS;
            }
        }
        // The box boundary is completely outside of c: the box either
        // contains the whole circle or misses it entirely.
        if self.contains(&cc) {
            return CONTAINS;
        }
        DISJOINT
    }

    pub fn bounding_box(&self) -> LonLatBox {
        *self
    }

    pub fn bounding_box3d(&self) -> Box3d {
        if self.is_empty() {
            return Box3d::empty();
        }
        if self.is_full() {
            return Box3d::around_unit_sphere();
        }
        let (slata, clata) = (self.lat.a().sin(), self.lat.a().cos());
        let (slatb, clatb) = (self.lat.b().sin(), self.lat.b().cos());
        let (slona, clona) = (self.lon.a().angle().sin(), self.lon.a().angle().cos());
        let (slonb, clonb) = (self.lon.b().angle().sin(), self.lon.b().angle().cos());
        // Extrema of the x and y coordinates of the box vertices.
        let mut xmin = (clona * clata)
            .min(clonb * clata)
            .min(clona * clatb)
            .min(clonb * clatb)
            - 2.5 * EPSILON;
        let mut xmax = (clona * clata)
            .max(clonb * clata)
            .max(clona * clatb)
            .max(clonb * clatb)
            + 2.5 * EPSILON;
        let mut ymin = (slona * clata)
            .min(slonb * clata)
            .min(slona * clatb)
            .min(slonb * clatb)
            - 2.5 * EPSILON;
        let mut ymax = (slona * clata)
            .max(slonb * clata)
            .max(slona * clatb)
            .max(slonb * clatb)
            + 2.5 * EPSILON;
        // Maximum latitude cosine of points in the box.
        let mlc;
        if self.lat.contains(Angle::from_radians(0.0)) {
            mlc = 1.0;
            // The box crosses the equator; the x and y extrema can lie
            // on the intersections of the edge meridians with it.
            xmin = xmin.min(clona.min(clonb) - EPSILON);
            xmax = xmax.max(clona.max(clonb) + EPSILON);
            ymin = ymin.min(slona.min(slonb) - EPSILON);
            ymax = ymax.max(slona.max(slonb) + EPSILON);
        } else {
            // clata and clatb are both positive here.
            mlc = clata.max(clatb) + EPSILON;
        }
        // Extrema on the box edges parallel to the equator.
        if self.lon.contains(NormalizedAngle::from_radians_unchecked(0.0)) {
            xmax = xmax.max(mlc);
        }
        if self
            .lon
            .contains(NormalizedAngle::from_radians_unchecked(HALF_PI))
        {
            ymax = ymax.max(mlc);
        }
        if self.lon.contains(NormalizedAngle::from_radians_unchecked(PI)) {
            xmin = xmin.min(-mlc);
        }
        if self
            .lon
            .contains(NormalizedAngle::from_radians_unchecked(1.5 * PI))
        {
            ymin = ymin.min(-mlc);
        }
        let zmin = (slata - EPSILON).max(-1.0);
        let zmax = (slatb + EPSILON).min(1.0);
        Box3d::new(
            Interval1d::new(xmin.max(-1.0), xmax.min(1.0)),
            Interval1d::new(ymin.max(-1.0), ymax.min(1.0)),
            Interval1d::new(zmin, zmax),
        )
    }

    pub fn bounding_circle(&self) -> Circle {
        if self.is_empty() {
            return Circle::empty();
        }
        if self.is_full() {
            return Circle::full();
        }
        let w = self.width();
        if w.as_radians() <= PI {
            // The minimal bounding circle center lies on the meridian
            // bisecting this box, at a latitude φ minimizing the maximum
            // angular separation to the box vertices. With the bisecting
            // meridian fixed at longitude zero, the vertices sit at
            // (±w/2, δ₁) and (±w/2, δ₂), and the candidate latitudes are
            //
            //    tan φ₁ = sec(w/2) tan δ₁   (closest to the δ₁ pair)
            //    tan φ₂ = sec(w/2) tan δ₂   (closest to the δ₂ pair)
            //    tan φ₃ = cos(w/2) tan((δ₁ + δ₂)/2)   (equidistant)
            //
            // The maximum separation is minimized at φ₃ when it lies
            // between φ₁ and φ₂, and at the better of φ₁, φ₂ otherwise.
            let box_verts = [
                UnitVector3d::from_lon_lat(self.lon.a().angle(), self.lat.a()),
                UnitVector3d::from_lon_lat(self.lon.a().angle(), self.lat.b()),
                UnitVector3d::from_lon_lat(self.lon.b().angle(), self.lat.a()),
                UnitVector3d::from_lon_lat(self.lon.b().angle(), self.lat.b()),
            ];
            let c = (0.5 * w.as_radians()).cos();
            let (phi1, phi2, phi3) = if c == 0.0 {
                // Unreachable unless cos is broken.
                (
                    HALF_PI.copysign(self.lat.a().as_radians()),
                    HALF_PI.copysign(self.lat.b().as_radians()),
                    0.0,
                )
            } else {
                (
                    (self.lat.a().tan() / c).atan(),
                    (self.lat.b().tan() / c).atan(),
                    (c * self.lat.center().tan()).atan(),
                )
            };
            let center_lon = self.lon.center().angle();
            let p = if phi1 <= phi3 && phi3 <= phi2 {
                UnitVector3d::from_lon_lat(center_lon, Angle::from_radians(phi3))
            } else {
                let p1 = UnitVector3d::from_lon_lat(center_lon, Angle::from_radians(phi1));
                let p2 = UnitVector3d::from_lon_lat(center_lon, Angle::from_radians(phi2));
                if p1.dot(&box_verts[0]) > p2.dot(&box_verts[1]) {
                    p2
                } else {
                    p1
                }
            };
            // The maximum squared chord length to the vertices, plus
            // twice its error bound, guarantees containment of the box.
            let mut cl2 = (p - box_verts[0]).squared_norm();
            for v in &box_verts[1..] {
                cl2 = cl2.max((p - *v).squared_norm());
            }
            return Circle::from_squared_chord_length(
                p,
                cl2 + 2.0 * MAX_SQUARED_CHORD_LENGTH_ERROR,
            );
        }
        // The box spans more than π radians in longitude. Pick the
        // smaller of the polar caps covering it.
        let mut r;
        let mut v;
        if self.lat.a().abs() <= self.lat.b().abs() {
            v = UnitVector3d::z_axis();
            r = Angle::from_radians(HALF_PI) - self.lat.a();
        } else {
            v = -UnitVector3d::z_axis();
            r = self.lat.b() + Angle::from_radians(HALF_PI);
        }
        // Unless the box spans all longitudes, also consider the
        // equatorial cap centered on the box's central meridian.
        if !self.lon.is_full() && 0.5 * w.as_radians() < r.as_radians() {
            r = 0.5 * w;
            v = UnitVector3d::from_lon_lat(self.lon.center().angle(), Angle::from_radians(0.0));
        }
        Circle::new(v, r + Angle::from_radians(4.0 * MAX_ASIN_ERROR))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(codec::BOX_ENCODED_SIZE);
        buffer.push(Self::TYPE_CODE);
        codec::encode_f64(self.lon.a().as_radians(), &mut buffer);
        codec::encode_f64(self.lon.b().as_radians(), &mut buffer);
        codec::encode_f64(self.lat.a().as_radians(), &mut buffer);
        codec::encode_f64(self.lat.b().as_radians(), &mut buffer);
        buffer
    }

    pub fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        codec::check_fixed_size(buffer, Self::TYPE_CODE, codec::BOX_ENCODED_SIZE)?;
        let lon_a = codec::decode_f64(&buffer[1..]);
        let lon_b = codec::decode_f64(&buffer[9..]);
        let lat_a = codec::decode_f64(&buffer[17..]);
        let lat_b = codec::decode_f64(&buffer[25..]);
        let lon = NormalizedAngleInterval::from_radians(lon_a, lon_b)
            .map_err(|_| DecodeError::InvalidField("longitude interval"))?;
        Ok(LonLatBox::new(lon, AngleInterval::from_radians(lat_a, lat_b)))
    }

    fn enforce_invariants(&mut self) {
        // Clamp latitudes to [-π/2, π/2], and keep the longitude and
        // latitude intervals either both empty or both non-empty.
        self.lat.clip_to(&Self::all_latitudes());
        if self.lat.is_empty() {
            self.lon = NormalizedAngleInterval::empty();
        } else if self.lon.is_empty() {
            self.lat = AngleInterval::empty();
        }
    }
}

impl Display for LonLatBox {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{{\"Box\": [{}, {}]}}", self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_deg(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> LonLatBox {
        LonLatBox::from_degrees(lon1, lat1, lon2, lat2).unwrap()
    }

    #[test]
    fn empty_and_full() {
        let e = LonLatBox::empty();
        assert!(e.is_empty() && !e.is_full());
        assert!(e.lon().is_empty() && e.lat().is_empty());
        let f = LonLatBox::full();
        assert!(f.is_full());
        assert!(f.contains(&LonLat::from_degrees(123.0, -45.0).unwrap()));
        assert!(f.bounding_circle().is_full());
        assert!(e.bounding_circle().is_empty());
    }

    #[test]
    fn half_width_for_circle() {
        assert_eq!(
            LonLatBox::half_width_for_circle(Angle::from_radians(-1.0), Angle::from_radians(0.0))
                .as_radians(),
            0.0
        );
        assert_eq!(
            LonLatBox::half_width_for_circle(Angle::from_radians(1.0), Angle::from_radians(1.0))
                .as_radians(),
            PI
        );
        let w = LonLatBox::half_width_for_circle(
            Angle::from_radians(1.0),
            Angle::from_radians(0.0),
        );
        assert!((w.as_radians() - 1.0).abs() < 4.0 * EPSILON);
        let w = LonLatBox::half_width_for_circle(
            Angle::from_radians(PI / 6.0),
            Angle::from_radians(PI / 4.0),
        );
        assert!((w.as_radians() - PI / 4.0).abs() < 4.0 * EPSILON);
    }

    #[test]
    fn invariants_couple_the_intervals() {
        // An empty latitude interval empties the longitude interval.
        let b = LonLatBox::new(
            NormalizedAngleInterval::from_radians(1.0, 2.0).unwrap(),
            AngleInterval::empty(),
        );
        assert!(b.is_empty() && b.lon().is_empty());
        // Latitudes are clamped.
        let b = LonLatBox::new(
            NormalizedAngleInterval::from_radians(1.0, 2.0).unwrap(),
            AngleInterval::from_radians(-2.0, 2.0),
        );
        assert_eq!(b.lat(), &LonLatBox::all_latitudes());
    }

    #[test]
    fn point_relations() {
        let b = box_deg(170.0, -10.0, 190.0, 10.0);
        assert!(b.lon().wraps());
        assert!(b.contains(&LonLat::from_degrees(180.0, 0.0).unwrap()));
        assert!(!b.contains(&LonLat::from_degrees(200.0, 0.0).unwrap()));
        assert!(!b.contains(&LonLat::from_degrees(0.0, 0.0).unwrap()));
        assert!(!b.contains(&LonLat::from_degrees(180.0, 45.0).unwrap()));
    }

    #[test]
    fn box_box_relations() {
        let b = box_deg(10.0, -10.0, 30.0, 10.0);
        assert_eq!(b.relate_box(&b), CONTAINS | WITHIN);
        assert_eq!(b.relate_box(&box_deg(15.0, -5.0, 25.0, 5.0)), CONTAINS);
        assert_eq!(b.relate_box(&box_deg(0.0, -20.0, 40.0, 20.0)), WITHIN);
        assert_eq!(b.relate_box(&box_deg(50.0, -10.0, 60.0, 10.0)), DISJOINT);
        assert_eq!(b.relate_box(&box_deg(20.0, -5.0, 50.0, 5.0)), INTERSECTS);
        // Disjoint in latitude only.
        assert_eq!(b.relate_box(&box_deg(10.0, 50.0, 30.0, 60.0)), DISJOINT);
    }

    #[test]
    fn box_circle_relations() {
        let x = UnitVector3d::x_axis();
        assert_eq!(
            LonLatBox::empty().relate_circle(&Circle::empty()),
            CONTAINS | DISJOINT | WITHIN
        );
        assert_eq!(
            LonLatBox::empty().relate_circle(&Circle::full()),
            DISJOINT | WITHIN
        );
        assert_eq!(
            LonLatBox::full().relate_circle(&Circle::empty()),
            CONTAINS | DISJOINT
        );
        assert_eq!(
            LonLatBox::full().relate_circle(&Circle::full()),
            CONTAINS | WITHIN
        );
        assert_eq!(
            LonLatBox::full().relate_circle(&Circle::new(x, Angle::from_radians(1.0))),
            CONTAINS
        );
        assert_eq!(
            box_deg(0.0, 0.0, 0.0, 0.0).relate_circle(&Circle::full()),
            WITHIN
        );
        // A small circle on the far side of the sphere.
        assert_eq!(
            box_deg(-10.0, -10.0, 10.0, 10.0)
                .relate_circle(&Circle::new(-x, Angle::from_radians(1.0))),
            DISJOINT
        );
        assert_eq!(
            LonLatBox::from_radians(-3.0, -1.0, 3.0, 1.0)
                .unwrap()
                .relate_circle(&Circle::new(-x, Angle::from_radians(0.1))),
            DISJOINT
        );
        // A large box against a nearly-full circle centered behind it.
        assert_eq!(
            LonLatBox::from_radians(-1.0, -1.0, 1.0, 1.0)
                .unwrap()
                .relate_circle(&Circle::new(-x, Angle::from_radians(PI - 0.5))),
            INTERSECTS
        );
        assert_eq!(
            LonLatBox::from_radians(-1.0, -1.0, 1.0, 1.0)
                .unwrap()
                .relate_circle(&Circle::new(
                    UnitVector3d::from_lon_lat(
                        Angle::from_radians(1.0),
                        Angle::from_radians(0.0)
                    ),
                    Angle::from_radians(0.5)
                )),
            INTERSECTS
        );
        assert_eq!(
            LonLatBox::from_radians(-1.0, -1.0, 1.0, 1.0)
                .unwrap()
                .relate_circle(&Circle::new(
                    UnitVector3d::from_lon_lat(
                        Angle::from_radians(-1.5),
                        Angle::from_radians(0.0)
                    ),
                    Angle::from_radians(1.0)
                )),
            INTERSECTS
        );
        assert_eq!(
            LonLatBox::from_radians(-1.0, -1.0, 1.0, 1.0)
                .unwrap()
                .relate_circle(&Circle::new(x, Angle::from_radians(0.5))),
            CONTAINS
        );
        assert_eq!(
            LonLatBox::from_radians(-0.5, -0.5, 0.5, 0.5)
                .unwrap()
                .relate_circle(&Circle::new(x, Angle::from_radians(1.0))),
            WITHIN
        );
    }

    #[test]
    fn dilation() {
        let b = box_deg(10.0, -10.0, 30.0, 10.0);
        let d = b.dilated_by(Angle::from_degrees(5.0));
        assert!(d.contains_box(&b));
        assert!(d.contains(&LonLat::from_degrees(10.0, 14.0).unwrap()));
        assert!(d.contains(&LonLat::from_degrees(6.0, 0.0).unwrap()));
        // A box touching the north pole is not dilated past it in
        // latitude, but can still grow southward.
        let polar = box_deg(0.0, 80.0, 360.0, 90.0);
        let d = polar.dilated_by_wh(Angle::from_degrees(0.0), Angle::from_degrees(5.0));
        assert!((d.lat().b().as_degrees() - 90.0).abs() < 1.0e-12);
        assert!((d.lat().a().as_degrees() - 75.0).abs() < 1.0e-12);
        // Erosion shrinks.
        let e = b.eroded_by(Angle::from_degrees(2.0), Angle::from_degrees(2.0));
        assert!(b.contains_box(&e));
    }

    #[test]
    fn bounding_circle_contains_box() {
        for b in [
            box_deg(10.0, -10.0, 30.0, 10.0),
            box_deg(350.0, 20.0, 20.0, 40.0),
            box_deg(0.0, 60.0, 120.0, 80.0),
            box_deg(0.0, -30.0, 270.0, 30.0),
            box_deg(0.0, 40.0, 359.0, 90.0),
        ] {
            let c = b.bounding_circle();
            for (lon, lat) in [
                (b.lon().a().as_degrees(), b.lat().a().as_degrees()),
                (b.lon().a().as_degrees(), b.lat().b().as_degrees()),
                (b.lon().b().as_degrees(), b.lat().a().as_degrees()),
                (b.lon().b().as_degrees(), b.lat().b().as_degrees()),
                (b.center().lon().as_degrees(), b.center().lat().as_degrees()),
            ] {
                let v = UnitVector3d::from_lon_lat(
                    Angle::from_degrees(lon),
                    Angle::from_degrees(lat),
                );
                assert!(c.contains(&v), "({lon}, {lat}) escaped {b}");
            }
        }
    }

    #[test]
    fn bounding_box3d_contains_vertices() {
        let b = box_deg(20.0, -35.0, 80.0, 10.0);
        let bb = b.bounding_box3d();
        for (lon, lat) in [
            (20.0, -35.0),
            (20.0, 10.0),
            (80.0, -35.0),
            (80.0, 10.0),
            (50.0, 0.0),
            (45.0, -20.0),
        ] {
            let v = UnitVector3d::from_lon_lat(
                Angle::from_degrees(lon),
                Angle::from_degrees(lat),
            );
            assert!(bb.contains(v.as_vector()));
        }
        assert_eq!(LonLatBox::empty().bounding_box3d(), Box3d::empty());
        assert_eq!(LonLatBox::full().bounding_box3d(), Box3d::around_unit_sphere());
    }

    #[test]
    fn area() {
        assert_eq!(LonLatBox::empty().area(), 0.0);
        assert!((LonLatBox::full().area() - 4.0 * PI).abs() < 1.0e-14);
        let band = box_deg(0.0, -90.0, 360.0, 90.0);
        assert!((band.area() - 4.0 * PI).abs() < 1.0e-14);
    }

    #[test]
    fn codec_round_trip() {
        for b in [
            box_deg(10.0, -10.0, 30.0, 10.0),
            box_deg(350.0, 20.0, 20.0, 40.0),
            LonLatBox::empty(),
            LonLatBox::full(),
        ] {
            let bytes = b.encode();
            assert_eq!(bytes.len(), 33);
            assert_eq!(bytes[0], b'b');
            assert_eq!(LonLatBox::decode(&bytes).unwrap(), b);
        }
        assert!(LonLatBox::decode(&[b'b', 0, 0]).is_err());
    }
}
