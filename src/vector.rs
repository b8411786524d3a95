use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Index, Mul, Neg, Sub};

use crate::angle::Angle;
use crate::lonlat::LonLat;

/// `Vector3d` is a vector in ℝ³ with no normalization requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3d { x, y, z }
    }

    pub fn dot(&self, v: &Vector3d) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn cross(&self, v: &Vector3d) -> Vector3d {
        Vector3d::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    /// `cwise_product` multiplies the corresponding components of two
    /// vectors.
    pub fn cwise_product(&self, v: &Vector3d) -> Vector3d {
        Vector3d::new(self.x * v.x, self.y * v.y, self.z * v.z)
    }

    pub fn squared_norm(&self) -> f64 {
        self.dot(self)
    }

    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// `rotated_around` returns this vector rotated around the given axis
    /// by the given angle, following Rodrigues' rotation formula.
    pub fn rotated_around(&self, k: &UnitVector3d, a: Angle) -> Vector3d {
        let s = a.sin();
        let c = a.cos();
        let kv = k.as_vector();
        let kxv = kv.cross(self);
        let kdv = kv.dot(self);
        *self * c + kxv * s + *kv * (kdv * (1.0 - c))
    }
}

impl Add for Vector3d {
    type Output = Vector3d;

    fn add(self, v: Vector3d) -> Vector3d {
        Vector3d::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl Sub for Vector3d {
    type Output = Vector3d;

    fn sub(self, v: Vector3d) -> Vector3d {
        Vector3d::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Neg for Vector3d {
    type Output = Vector3d;

    fn neg(self) -> Vector3d {
        Vector3d::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3d {
    type Output = Vector3d;

    fn mul(self, s: f64) -> Vector3d {
        Vector3d::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Index<usize> for Vector3d {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3d component index out of range: {i}"),
        }
    }
}

impl Display for Vector3d {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// `UnitVector3d` is a point on the unit sphere S².
///
/// Constructors normalize their input unless they are explicitly documented
/// not to. Arithmetic that can produce non-unit results yields `Vector3d`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitVector3d(Vector3d);

impl UnitVector3d {
    pub fn x_axis() -> Self {
        UnitVector3d(Vector3d::new(1.0, 0.0, 0.0))
    }

    pub fn y_axis() -> Self {
        UnitVector3d(Vector3d::new(0.0, 1.0, 0.0))
    }

    pub fn z_axis() -> Self {
        UnitVector3d(Vector3d::new(0.0, 0.0, 1.0))
    }

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_vector(&Vector3d::new(x, y, z))
    }

    pub fn from_vector(v: &Vector3d) -> Self {
        let n = v.norm();
        UnitVector3d(Vector3d::new(v.x / n, v.y / n, v.z / n))
    }

    /// `from_normalized` wraps components that are already normalized,
    /// skipping renormalization. Decoded vertices use this so that
    /// round-tripping a region through the codec does not drift them.
    pub fn from_normalized(x: f64, y: f64, z: f64) -> Self {
        UnitVector3d(Vector3d::new(x, y, z))
    }

    pub fn from_lonlat(p: &LonLat) -> Self {
        Self::from_lon_lat(p.lon().angle(), p.lat())
    }

    pub fn from_lon_lat(lon: Angle, lat: Angle) -> Self {
        let (sin_lon, cos_lon) = (lon.sin(), lon.cos());
        let (sin_lat, cos_lat) = (lat.sin(), lat.cos());
        UnitVector3d(Vector3d::new(
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        ))
    }

    /// `orthogonal_to` returns an arbitrary unit vector that is
    /// perpendicular to v.
    pub fn orthogonal_to(v: &UnitVector3d) -> Self {
        if v.y().abs() > f64::EPSILON || v.x().abs() > f64::EPSILON {
            Self::new(-v.y(), v.x(), 0.0)
        } else {
            Self::new(-v.z(), 0.0, v.x())
        }
    }

    /// `orthogonal_to_pair` returns a unit vector perpendicular to the
    /// plane through v1, v2 and the origin.
    pub fn orthogonal_to_pair(v1: &UnitVector3d, v2: &UnitVector3d) -> Self {
        Self::from_vector(&v1.robust_cross(v2))
    }

    /// `orthogonal_to_meridian` returns the unit normal of the plane
    /// spanned by the z axis and the meridian at the given longitude.
    pub fn orthogonal_to_meridian(lon: Angle) -> Self {
        UnitVector3d(Vector3d::new(-lon.sin(), lon.cos(), 0.0))
    }

    /// `north_from` returns the unit tangent at v pointing towards +z.
    pub fn north_from(v: &UnitVector3d) -> Self {
        let n = Vector3d::new(
            -v.x() * v.z(),
            -v.y() * v.z(),
            v.x() * v.x() + v.y() * v.y(),
        );
        if n.is_zero() {
            // v is a pole.
            UnitVector3d(Vector3d::new(-1.0_f64.copysign(v.z()), 0.0, 0.0))
        } else {
            Self::from_vector(&n)
        }
    }

    pub fn as_vector(&self) -> &Vector3d {
        &self.0
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn component(&self, i: usize) -> f64 {
        self.0[i]
    }

    pub fn dot(&self, v: &UnitVector3d) -> f64 {
        self.0.dot(&v.0)
    }

    pub fn cross(&self, v: &UnitVector3d) -> Vector3d {
        self.0.cross(&v.0)
    }

    /// `robust_cross` computes twice the cross product of this vector
    /// and v as (v + self) × (v − self).
    ///
    /// The result is non-zero for distinct, non-antipodal unit vectors
    /// even when they are nearly identical, a case where the direct cross
    /// product loses all significant digits to cancellation. Only the
    /// direction of the result is meaningful.
    pub fn robust_cross(&self, v: &UnitVector3d) -> Vector3d {
        (v.0 + self.0).cross(&(v.0 - self.0))
    }

    pub fn rotated_around(&self, k: &UnitVector3d, a: Angle) -> UnitVector3d {
        Self::from_vector(&self.0.rotated_around(k, a))
    }
}

impl Neg for UnitVector3d {
    type Output = UnitVector3d;

    fn neg(self) -> UnitVector3d {
        UnitVector3d(-self.0)
    }
}

impl Add for UnitVector3d {
    type Output = Vector3d;

    fn add(self, v: UnitVector3d) -> Vector3d {
        self.0 + v.0
    }
}

impl Sub for UnitVector3d {
    type Output = Vector3d;

    fn sub(self, v: UnitVector3d) -> Vector3d {
        self.0 - v.0
    }
}

impl Mul<f64> for UnitVector3d {
    type Output = Vector3d;

    fn mul(self, s: f64) -> Vector3d {
        self.0 * s
    }
}

impl From<UnitVector3d> for Vector3d {
    fn from(v: UnitVector3d) -> Vector3d {
        v.0
    }
}

impl Display for UnitVector3d {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `Matrix3d` is a 3×3 matrix stored as three row vectors. It provides
/// just enough linear algebra for the ellipse's canonical frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3d {
    rows: [Vector3d; 3],
}

impl Matrix3d {
    pub fn from_rows(r0: Vector3d, r1: Vector3d, r2: Vector3d) -> Self {
        Matrix3d { rows: [r0, r1, r2] }
    }

    pub fn identity() -> Self {
        Matrix3d::from_rows(
            Vector3d::new(1.0, 0.0, 0.0),
            Vector3d::new(0.0, 1.0, 0.0),
            Vector3d::new(0.0, 0.0, 1.0),
        )
    }

    pub fn row(&self, i: usize) -> &Vector3d {
        &self.rows[i]
    }

    pub fn transpose(&self) -> Matrix3d {
        Matrix3d::from_rows(
            Vector3d::new(self.rows[0].x, self.rows[1].x, self.rows[2].x),
            Vector3d::new(self.rows[0].y, self.rows[1].y, self.rows[2].y),
            Vector3d::new(self.rows[0].z, self.rows[1].z, self.rows[2].z),
        )
    }

    pub fn mul_vector(&self, v: &Vector3d) -> Vector3d {
        Vector3d::new(
            self.rows[0].dot(v),
            self.rows[1].dot(v),
            self.rows[2].dot(v),
        )
    }
}
