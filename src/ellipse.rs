use std::fmt::{self, Display, Formatter};

use crate::angle::{Angle, NormalizedAngle};
use crate::box3d::Box3d;
use crate::circle::Circle;
use crate::codec;
use crate::error::{DecodeError, ValidationError};
use crate::lonlat_box::LonLatBox;
use crate::utils::MAX_ASIN_ERROR;
use crate::vector::{Matrix3d, UnitVector3d, Vector3d};

const PI: f64 = std::f64::consts::PI;
const HALF_PI: f64 = 0.5 * PI;

/// `Ellipse` is an elliptical region on the unit sphere: the set of
/// points whose angular distances to two focal points f1 and f2 sum to
/// at most 2α.
///
/// It is represented by a transform from world coordinates to a
/// canonical frame in which the ellipse center is +z and the foci lie
/// along a coordinate axis, together with the opening angles α (first
/// axis), β (second axis) and the focal half-separation γ. In the
/// canonical frame, membership reduces to
///
///     x² cot²α + y² cot²β ≤ z²
///
/// on the appropriate side of the equatorial plane. Both openings must
/// lie on the same side of π/2; when both equal π/2 the ellipse is a
/// hemisphere bounded by a great circle.
#[derive(Debug, Clone, Copy)]
pub struct Ellipse {
    transform: Matrix3d,
    alpha: Angle,
    beta: Angle,
    gamma: Angle,
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::empty()
    }
}

impl Ellipse {
    pub const TYPE_CODE: u8 = b'e';

    pub fn empty() -> Self {
        Ellipse {
            transform: Matrix3d::identity(),
            alpha: Angle::from_radians(-1.0),
            beta: Angle::from_radians(-1.0),
            gamma: Angle::from_radians(0.0),
        }
    }

    pub fn full() -> Self {
        Ellipse {
            transform: Matrix3d::identity(),
            alpha: Angle::from_radians(PI + 1.0),
            beta: Angle::from_radians(PI + 1.0),
            gamma: Angle::from_radians(0.0),
        }
    }

    /// Creates the circular ellipse with center f and opening angle a.
    pub fn new(f: &UnitVector3d, a: Angle) -> Result<Self, ValidationError> {
        Self::from_foci(f, f, a)
    }

    /// Creates the ellipse with foci f1 and f2, containing the points
    /// whose angular distances to the foci sum to at most 2·a.
    pub fn from_foci(
        f1: &UnitVector3d,
        f2: &UnitVector3d,
        a: Angle,
    ) -> Result<Self, ValidationError> {
        if a.is_nan() {
            return Err(ValidationError::InvalidEllipseAngles);
        }
        if *f1 == -*f2 {
            return Err(ValidationError::AntipodalPoints);
        }
        if a.as_radians() < 0.0 {
            return Ok(Self::empty());
        }
        if a.as_radians() >= PI {
            return Ok(Self::full());
        }
        let gamma = 0.5 * NormalizedAngle::separation(f1, f2).angle();
        let center = if f1 == f2 {
            *f1
        } else {
            UnitVector3d::from_vector(&(*f1 + *f2))
        };
        let beta = if gamma.as_radians() == 0.0 {
            a
        } else {
            // cos β = cos α / cos γ; in the planar limit this is the
            // familiar b² = a² − c².
            Angle::from_radians((a.cos() / gamma.cos()).clamp(-1.0, 1.0).acos())
        };
        let e_y = if f1 == f2 {
            UnitVector3d::north_from(&center)
        } else {
            UnitVector3d::orthogonal_to_pair(f1, f2)
        };
        let e_x = UnitVector3d::from_vector(&e_y.cross(&center));
        let transform = Matrix3d::from_rows(
            *e_x.as_vector(),
            *e_y.as_vector(),
            *center.as_vector(),
        );
        Ok(Ellipse {
            transform,
            alpha: a,
            beta,
            gamma,
        })
    }

    /// Creates the ellipse with the given center, opening angle `a`
    /// along the first axis, opening angle `b` along the second, and
    /// the first axis rotated by `orientation` east of north.
    pub fn with_orientation(
        center: &UnitVector3d,
        a: Angle,
        b: Angle,
        orientation: Angle,
    ) -> Result<Self, ValidationError> {
        if a.is_nan() || b.is_nan() || !orientation.as_radians().is_finite() {
            return Err(ValidationError::InvalidEllipseAngles);
        }
        if a.as_radians() < 0.0 || b.as_radians() < 0.0 {
            return Ok(Self::empty());
        }
        if a.as_radians() >= PI && b.as_radians() >= PI {
            return Ok(Self::full());
        }
        // Both openings must lie on the same side of π/2: the canonical
        // quadric cannot mix an over-hemisphere axis with an
        // under-hemisphere one.
        let side = |x: Angle| x.as_radians().partial_cmp(&HALF_PI).unwrap();
        if side(a) != side(b) {
            return Err(ValidationError::InvalidEllipseAngles);
        }
        let e_x = UnitVector3d::north_from(center).rotated_around(center, -orientation);
        let e_y = UnitVector3d::from_vector(&center.cross(&e_x));
        let transform = Matrix3d::from_rows(
            *e_x.as_vector(),
            *e_y.as_vector(),
            *center.as_vector(),
        );
        // The focal separation follows from the acute-equivalent pair of
        // openings; it is shared with the complement.
        let acute = |x: Angle| {
            if x.as_radians() <= HALF_PI {
                x.as_radians()
            } else {
                PI - x.as_radians()
            }
        };
        let (major, minor) = if acute(a) >= acute(b) {
            (acute(a), acute(b))
        } else {
            (acute(b), acute(a))
        };
        let gamma = if minor.cos() == 0.0 {
            Angle::from_radians(0.0)
        } else {
            Angle::from_radians((major.cos() / minor.cos()).clamp(-1.0, 1.0).acos())
        };
        Ok(Ellipse {
            transform,
            alpha: a,
            beta: b,
            gamma,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.as_radians() < 0.0 || self.beta.as_radians() < 0.0
    }

    pub fn is_full(&self) -> bool {
        self.alpha.as_radians() >= PI && self.beta.as_radians() >= PI
    }

    /// `is_great_circle` returns true if the boundary of this ellipse
    /// is a great circle.
    pub fn is_great_circle(&self) -> bool {
        self.alpha.as_radians() == HALF_PI && self.beta.as_radians() == HALF_PI
    }

    /// `is_circle` returns true if this ellipse is a circle.
    pub fn is_circle(&self) -> bool {
        self.alpha == self.beta
    }

    /// `transform_matrix` returns the world-to-canonical-frame
    /// transform.
    pub fn transform_matrix(&self) -> &Matrix3d {
        &self.transform
    }

    pub fn alpha(&self) -> Angle {
        self.alpha
    }

    pub fn beta(&self) -> Angle {
        self.beta
    }

    pub fn gamma(&self) -> Angle {
        self.gamma
    }

    pub fn center(&self) -> UnitVector3d {
        let r = self.transform.row(2);
        UnitVector3d::from_normalized(r.x, r.y, r.z)
    }

    pub fn f1(&self) -> UnitVector3d {
        let c = self.canonical_focus();
        UnitVector3d::from_vector(
            &self
                .transform
                .transpose()
                .mul_vector(&Vector3d::new(-c.0, -c.1, c.2)),
        )
    }

    pub fn f2(&self) -> UnitVector3d {
        let c = self.canonical_focus();
        UnitVector3d::from_vector(
            &self
                .transform
                .transpose()
                .mul_vector(&Vector3d::new(c.0, c.1, c.2)),
        )
    }

    // True when the foci lie along the first canonical axis. The focal
    // axis is the one whose opening is farther from π/2 towards its own
    // side, which is preserved under complementation.
    fn focal_axis_is_x(&self) -> bool {
        let acute = |x: Angle| {
            if x.as_radians() <= HALF_PI {
                x.as_radians()
            } else {
                PI - x.as_radians()
            }
        };
        acute(self.alpha) >= acute(self.beta)
    }

    // Canonical-frame coordinates of the second focus.
    fn canonical_focus(&self) -> (f64, f64, f64) {
        let (s, c) = (self.gamma.sin(), self.gamma.cos());
        if self.focal_axis_is_x() {
            (s, 0.0, c)
        } else {
            (0.0, s, c)
        }
    }

    pub fn contains(&self, v: &UnitVector3d) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_full() {
            return true;
        }
        let p = self.transform.mul_vector(v.as_vector());
        if self.is_great_circle() {
            return p.z >= 0.0;
        }
        let ta = (self.alpha - Angle::from_radians(HALF_PI)).tan();
        let tb = (self.beta - Angle::from_radians(HALF_PI)).tan();
        let x = p.x * ta;
        let y = p.y * tb;
        let q = x * x + y * y;
        if self.alpha.as_radians() < HALF_PI {
            p.z >= 0.0 && q <= p.z * p.z
        } else {
            p.z >= 0.0 || q >= p.z * p.z
        }
    }

    /// `complement` maps this ellipse to the closure of its complement:
    /// the foci are negated and the opening angles α, β become π − α,
    /// π − β.
    pub fn complement(&mut self) -> &mut Self {
        // Negating the first and third axes is a proper rotation that
        // maps the center to its antipode and each focus to the antipode
        // of its partner's label.
        let r0 = -*self.transform.row(0);
        let r1 = *self.transform.row(1);
        let r2 = -*self.transform.row(2);
        self.transform = Matrix3d::from_rows(r0, r1, r2);
        self.alpha = Angle::from_radians(PI) - self.alpha;
        self.beta = Angle::from_radians(PI) - self.beta;
        self
    }

    pub fn complemented(&self) -> Ellipse {
        let mut e = *self;
        e.complement();
        e
    }

    pub fn bounding_box(&self) -> LonLatBox {
        self.bounding_circle().bounding_box()
    }

    pub fn bounding_box3d(&self) -> Box3d {
        self.bounding_circle().bounding_box3d()
    }

    pub fn bounding_circle(&self) -> Circle {
        if self.is_empty() {
            return Circle::empty();
        }
        if self.is_full() {
            return Circle::full();
        }
        let r = if self.alpha >= self.beta {
            self.alpha
        } else {
            self.beta
        };
        Circle::new(self.center(), r + Angle::from_radians(MAX_ASIN_ERROR))
    }

    /// `inscribed_circle` returns a circle contained by this ellipse,
    /// centered on it with the smaller of the two openings.
    pub(crate) fn inscribed_circle(&self) -> Circle {
        if self.is_empty() {
            return Circle::empty();
        }
        if self.is_full() {
            return Circle::full();
        }
        let r = if self.alpha <= self.beta {
            self.alpha
        } else {
            self.beta
        };
        Circle::new(self.center(), r - Angle::from_radians(MAX_ASIN_ERROR))
    }

    pub fn encode(&self) -> Vec<u8> {
        let f1 = self.f1();
        let f2 = self.f2();
        // The opening along the focal axis; this is the half-sum of
        // focal distances that defines the ellipse as a locus.
        let opening = if self.focal_axis_is_x() {
            self.alpha
        } else {
            self.beta
        };
        let mut buffer = Vec::with_capacity(codec::ELLIPSE_ENCODED_SIZE);
        buffer.push(Self::TYPE_CODE);
        codec::encode_f64(f1.x(), &mut buffer);
        codec::encode_f64(f1.y(), &mut buffer);
        codec::encode_f64(f1.z(), &mut buffer);
        codec::encode_f64(f2.x(), &mut buffer);
        codec::encode_f64(f2.y(), &mut buffer);
        codec::encode_f64(f2.z(), &mut buffer);
        codec::encode_f64(opening.as_radians(), &mut buffer);
        buffer
    }

    pub fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        codec::check_fixed_size(buffer, Self::TYPE_CODE, codec::ELLIPSE_ENCODED_SIZE)?;
        let f1 = UnitVector3d::from_normalized(
            codec::decode_f64(&buffer[1..]),
            codec::decode_f64(&buffer[9..]),
            codec::decode_f64(&buffer[17..]),
        );
        let f2 = UnitVector3d::from_normalized(
            codec::decode_f64(&buffer[25..]),
            codec::decode_f64(&buffer[33..]),
            codec::decode_f64(&buffer[41..]),
        );
        let a = Angle::from_radians(codec::decode_f64(&buffer[49..]));
        Ellipse::from_foci(&f1, &f2, a)
            .map_err(|_| DecodeError::InvalidField("ellipse foci or opening angle"))
    }
}

impl PartialEq for Ellipse {
    fn eq(&self, e: &Ellipse) -> bool {
        (self.is_empty() && e.is_empty())
            || (self.is_full() && e.is_full())
            || (self.transform == e.transform
                && self.alpha == e.alpha
                && self.beta == e.beta)
    }
}

impl Display for Ellipse {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{{\"Ellipse\": [{}, {}, {}, {}, {}]}}",
            self.transform.row(0),
            self.transform.row(1),
            self.transform.row(2),
            self.alpha,
            self.beta
        )
    }
}
