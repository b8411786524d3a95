use std::fmt::{self, Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::vector::UnitVector3d;

pub(crate) const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// `Angle` is a finite-or-NaN angle in radians.
///
/// Arithmetic follows IEEE 754 double-precision semantics, so NaN inputs
/// propagate and comparisons involving NaN are false.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub fn nan() -> Self {
        Angle(f64::NAN)
    }

    pub fn from_degrees(a: f64) -> Self {
        Angle(a.to_radians())
    }

    pub fn from_radians(a: f64) -> Self {
        Angle(a)
    }

    pub fn as_degrees(&self) -> f64 {
        self.0.to_degrees()
    }

    pub fn as_radians(&self) -> f64 {
        self.0
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    /// `is_normalized` returns true if this angle lies in [0, 2π).
    pub fn is_normalized(&self) -> bool {
        self.0 >= 0.0 && self.0 < TWO_PI
    }

    pub fn abs(&self) -> Self {
        Angle(self.0.abs())
    }

    pub fn min(self, other: Angle) -> Angle {
        Angle(self.0.min(other.0))
    }

    pub fn max(self, other: Angle) -> Angle {
        Angle(self.0.max(other.0))
    }

    pub fn sin(&self) -> f64 {
        self.0.sin()
    }

    pub fn cos(&self) -> f64 {
        self.0.cos()
    }

    pub fn tan(&self) -> f64 {
        self.0.tan()
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Angle) {
        self.0 += rhs.0;
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Angle) {
        self.0 -= rhs.0;
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;

    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl Mul<Angle> for f64 {
    type Output = Angle;

    fn mul(self, rhs: Angle) -> Angle {
        Angle(self * rhs.0)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;

    fn div(self, rhs: f64) -> Angle {
        Angle(self.0 / rhs)
    }
}

impl Div<Angle> for Angle {
    type Output = f64;

    fn div(self, rhs: Angle) -> f64 {
        self.0 / rhs.0
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `NormalizedAngle` is an angle that lies in [0, 2π) when finite.
///
/// Normalization maps x to x − 2π·⌊x / 2π⌋, with the upper endpoint of
/// the range mapped back to zero. NaN is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct NormalizedAngle(Angle);

impl NormalizedAngle {
    pub fn nan() -> Self {
        NormalizedAngle(Angle::nan())
    }

    pub fn from_degrees(a: f64) -> Self {
        Self::new(Angle::from_degrees(a))
    }

    pub fn from_radians(a: f64) -> Self {
        Self::new(Angle::from_radians(a))
    }

    pub fn new(a: Angle) -> Self {
        let x = a.as_radians();
        if a.is_normalized() || x.is_nan() {
            return NormalizedAngle(a);
        }
        let mut r = x - TWO_PI * (x / TWO_PI).floor();
        if !r.is_finite() {
            return Self::nan();
        }
        // Rounding in the subtraction above can land exactly on 2π.
        if r >= TWO_PI {
            r = 0.0;
        }
        NormalizedAngle(Angle::from_radians(r))
    }

    /// Wraps an angle that the caller guarantees to be in [0, 2π], without
    /// renormalizing. Only the full normalized-angle interval stores the
    /// upper endpoint 2π.
    pub(crate) fn from_radians_unchecked(a: f64) -> Self {
        NormalizedAngle(Angle::from_radians(a))
    }

    /// `separation` computes the angle between two unit vectors.
    ///
    /// The chord-length formulation 2·asin(‖a − b‖ / 2) stays accurate
    /// for nearly identical and nearly antipodal inputs alike.
    pub fn separation(a: &UnitVector3d, b: &UnitVector3d) -> Self {
        let chord = (*a - *b).norm();
        NormalizedAngle(Angle::from_radians(2.0 * (0.5 * chord).min(1.0).asin()))
    }

    pub fn angle(&self) -> Angle {
        self.0
    }

    pub fn as_degrees(&self) -> f64 {
        self.0.as_degrees()
    }

    pub fn as_radians(&self) -> f64 {
        self.0.as_radians()
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }
}

impl From<NormalizedAngle> for Angle {
    fn from(a: NormalizedAngle) -> Angle {
        a.0
    }
}

impl Add for NormalizedAngle {
    type Output = Angle;

    fn add(self, rhs: NormalizedAngle) -> Angle {
        self.0 + rhs.0
    }
}

impl Sub for NormalizedAngle {
    type Output = Angle;

    fn sub(self, rhs: NormalizedAngle) -> Angle {
        self.0 - rhs.0
    }
}

impl PartialEq<Angle> for NormalizedAngle {
    fn eq(&self, other: &Angle) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<Angle> for NormalizedAngle {
    fn partial_cmp(&self, other: &Angle) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl Display for NormalizedAngle {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
