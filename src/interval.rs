use std::fmt::{self, Display, Formatter};

use crate::angle::{Angle, NormalizedAngle, TWO_PI};
use crate::error::ValidationError;
use crate::relationship::{CONTAINS, DISJOINT, Relationship, WITHIN};

/// Generates the shared implementation for closed intervals over a
/// totally-ordered scalar. An interval is empty when `a ≤ b` does not
/// hold, which includes any NaN endpoint.
macro_rules! closed_interval_impl {
    ($interval:ident, $scalar:ty) => {
        impl $interval {
            /// Creates the closed interval [x, y]. The interval is empty
            /// when x > y or either endpoint is NaN.
            pub fn new(x: $scalar, y: $scalar) -> Self {
                $interval { a: x, b: y }
            }

            /// Creates the interval containing only x.
            pub fn point(x: $scalar) -> Self {
                $interval { a: x, b: x }
            }

            /// `a` returns the lower endpoint; arbitrary for empty
            /// intervals.
            pub fn a(&self) -> $scalar {
                self.a
            }

            /// `b` returns the upper endpoint; arbitrary for empty
            /// intervals.
            pub fn b(&self) -> $scalar {
                self.b
            }

            pub fn is_empty(&self) -> bool {
                !(self.a <= self.b)
            }

            /// `center` is arbitrary for empty intervals.
            pub fn center(&self) -> $scalar {
                (self.a + self.b) * 0.5
            }

            /// `size` is zero for single points and NaN or negative for
            /// empty intervals.
            pub fn size(&self) -> $scalar {
                self.b - self.a
            }

            pub fn contains(&self, x: $scalar) -> bool {
                (self.a <= x && x <= self.b) || x.is_nan()
            }

            pub fn contains_interval(&self, x: &Self) -> bool {
                if x.is_empty() {
                    true
                } else if self.is_empty() {
                    false
                } else {
                    self.a <= x.a && self.b >= x.b
                }
            }

            pub fn intersects(&self, x: $scalar) -> bool {
                self.a <= x && x <= self.b
            }

            pub fn intersects_interval(&self, x: &Self) -> bool {
                !self.is_disjoint_from_interval(x)
            }

            pub fn is_disjoint_from(&self, x: $scalar) -> bool {
                !self.intersects(x)
            }

            pub fn is_disjoint_from_interval(&self, x: &Self) -> bool {
                if self.is_empty() || x.is_empty() {
                    true
                } else {
                    self.a > x.b || self.b < x.a
                }
            }

            pub fn is_within(&self, x: $scalar) -> bool {
                (self.a == x && self.b == x) || self.is_empty()
            }

            pub fn is_within_interval(&self, x: &Self) -> bool {
                x.contains_interval(self)
            }

            pub fn relate(&self, x: $scalar) -> Relationship {
                if self.is_empty() {
                    if x.is_nan() {
                        return CONTAINS | DISJOINT | WITHIN;
                    }
                    return DISJOINT | WITHIN;
                }
                if x.is_nan() {
                    return CONTAINS | DISJOINT;
                }
                if self.a == x && self.b == x {
                    return CONTAINS | WITHIN;
                }
                if self.intersects(x) {
                    return CONTAINS;
                }
                DISJOINT
            }

            pub fn relate_interval(&self, x: &Self) -> Relationship {
                if self.is_empty() {
                    if x.is_empty() {
                        return CONTAINS | DISJOINT | WITHIN;
                    }
                    return DISJOINT | WITHIN;
                }
                if x.is_empty() {
                    return CONTAINS | DISJOINT;
                }
                if self.a == x.a && self.b == x.b {
                    return CONTAINS | WITHIN;
                }
                if self.a > x.b || self.b < x.a {
                    return DISJOINT;
                }
                if self.a <= x.a && self.b >= x.b {
                    return CONTAINS;
                }
                if x.a <= self.a && x.b >= self.b {
                    return WITHIN;
                }
                crate::relationship::INTERSECTS
            }

            /// `clip_to` shrinks this interval to the intersection of
            /// itself and x.
            pub fn clip_to(&mut self, x: &Self) -> &mut Self {
                if x.is_empty() {
                    *self = *x;
                } else if !self.is_empty() {
                    if x.a > self.a {
                        self.a = x.a;
                    }
                    if x.b < self.b {
                        self.b = x.b;
                    }
                }
                self
            }

            pub fn clipped_to(&self, x: &Self) -> Self {
                let mut i = *self;
                i.clip_to(x);
                i
            }

            /// `expand_to` minimally grows this interval to contain x.
            pub fn expand_to(&mut self, x: $scalar) -> &mut Self {
                if self.is_empty() {
                    self.a = x;
                    self.b = x;
                } else if x < self.a {
                    self.a = x;
                } else if x > self.b {
                    self.b = x;
                }
                self
            }

            pub fn expand_to_interval(&mut self, x: &Self) -> &mut Self {
                if self.is_empty() {
                    *self = *x;
                } else if !x.is_empty() {
                    if x.a < self.a {
                        self.a = x.a;
                    }
                    if x.b > self.b {
                        self.b = x.b;
                    }
                }
                self
            }

            pub fn expanded_to(&self, x: $scalar) -> Self {
                let mut i = *self;
                i.expand_to(x);
                i
            }

            pub fn expanded_to_interval(&self, x: &Self) -> Self {
                let mut i = *self;
                i.expand_to_interval(x);
                i
            }

            /// For positive x, `dilate_by` grows both endpoints outward
            /// by x; for negative x it shrinks them inward. NaN x and
            /// empty intervals are left unchanged.
            pub fn dilate_by(&mut self, x: $scalar) -> &mut Self {
                if !x.is_nan() && !self.is_empty() {
                    self.a = self.a - x;
                    self.b = self.b + x;
                }
                self
            }

            pub fn dilated_by(&self, x: $scalar) -> Self {
                let mut i = *self;
                i.dilate_by(x);
                i
            }

            pub fn erode_by(&mut self, x: $scalar) -> &mut Self {
                self.dilate_by(-x)
            }

            pub fn eroded_by(&self, x: $scalar) -> Self {
                self.dilated_by(-x)
            }
        }

        impl PartialEq for $interval {
            fn eq(&self, other: &Self) -> bool {
                (self.a == other.a && self.b == other.b)
                    || (self.is_empty() && other.is_empty())
            }
        }

        impl Display for $interval {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                write!(f, "[{}, {}]", self.a, self.b)
            }
        }
    };
}

/// `Interval1d` is a closed interval of ℝ.
#[derive(Debug, Clone, Copy)]
pub struct Interval1d {
    a: f64,
    b: f64,
}

impl Default for Interval1d {
    fn default() -> Self {
        Self::empty()
    }
}

impl Interval1d {
    pub fn empty() -> Self {
        Interval1d { a: 1.0, b: 0.0 }
    }

    pub fn full() -> Self {
        Interval1d {
            a: f64::NEG_INFINITY,
            b: f64::INFINITY,
        }
    }

    /// `is_full` returns true if this interval is all of ℝ.
    pub fn is_full(&self) -> bool {
        self.a == f64::NEG_INFINITY && self.b == f64::INFINITY
    }
}

closed_interval_impl!(Interval1d, f64);

/// `AngleInterval` is a closed interval of arbitrary (unnormalized)
/// angles.
#[derive(Debug, Clone, Copy)]
pub struct AngleInterval {
    a: Angle,
    b: Angle,
}

impl Default for AngleInterval {
    fn default() -> Self {
        Self::empty()
    }
}

impl AngleInterval {
    pub fn empty() -> Self {
        AngleInterval {
            a: Angle::from_radians(1.0),
            b: Angle::from_radians(0.0),
        }
    }

    pub fn full() -> Self {
        AngleInterval {
            a: Angle::from_radians(f64::NEG_INFINITY),
            b: Angle::from_radians(f64::INFINITY),
        }
    }

    pub fn from_degrees(x: f64, y: f64) -> Self {
        AngleInterval {
            a: Angle::from_degrees(x),
            b: Angle::from_degrees(y),
        }
    }

    pub fn from_radians(x: f64, y: f64) -> Self {
        AngleInterval {
            a: Angle::from_radians(x),
            b: Angle::from_radians(y),
        }
    }
}

closed_interval_impl!(AngleInterval, Angle);

/// `NormalizedAngleInterval` is a closed interval of normalized angles,
/// i.e. an arc of the unit circle.
///
/// Unlike the linear intervals, this interval lives on circular
/// topology: when `b < a`, the interval wraps through the 0 ≡ 2π seam.
/// The full interval is [0, 2π]; the empty interval has NaN endpoints.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedAngleInterval {
    a: NormalizedAngle,
    b: NormalizedAngle,
}

impl Default for NormalizedAngleInterval {
    fn default() -> Self {
        Self::empty()
    }
}

impl NormalizedAngleInterval {
    pub fn empty() -> Self {
        NormalizedAngleInterval {
            a: NormalizedAngle::nan(),
            b: NormalizedAngle::nan(),
        }
    }

    pub fn full() -> Self {
        NormalizedAngleInterval {
            a: NormalizedAngle::from_radians_unchecked(0.0),
            b: NormalizedAngle::from_radians_unchecked(TWO_PI),
        }
    }

    /// Creates the interval [x, y]. The interval wraps when y < x.
    pub fn new(x: NormalizedAngle, y: NormalizedAngle) -> Self {
        if x.is_nan() || y.is_nan() {
            return Self::empty();
        }
        NormalizedAngleInterval { a: x, b: y }
    }

    pub fn point(x: NormalizedAngle) -> Self {
        Self::new(x, x)
    }

    /// Creates an interval from two unnormalized angles.
    ///
    /// NaN endpoints give the empty interval and `y − x ≥ 2π` gives the
    /// full interval. `x > y` is an error unless both angles are already
    /// normalized, in which case the interval wraps through the seam.
    pub fn from_angles(x: Angle, y: Angle) -> Result<Self, ValidationError> {
        if x.is_nan() || y.is_nan() {
            return Ok(Self::empty());
        }
        if x > y && !(x.is_normalized() && y.is_normalized()) {
            return Err(ValidationError::InvalidAngleInterval(
                x.as_radians(),
                y.as_radians(),
            ));
        }
        if (y - x).as_radians() >= TWO_PI {
            return Ok(Self::full());
        }
        Ok(NormalizedAngleInterval {
            a: NormalizedAngle::new(x),
            b: NormalizedAngle::new(y),
        })
    }

    pub fn from_radians(x: f64, y: f64) -> Result<Self, ValidationError> {
        Self::from_angles(Angle::from_radians(x), Angle::from_radians(y))
    }

    pub fn from_degrees(x: f64, y: f64) -> Result<Self, ValidationError> {
        Self::from_angles(Angle::from_degrees(x), Angle::from_degrees(y))
    }

    pub fn a(&self) -> NormalizedAngle {
        self.a
    }

    pub fn b(&self) -> NormalizedAngle {
        self.b
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_nan() || self.b.is_nan()
    }

    pub fn is_full(&self) -> bool {
        self.a.as_radians() == 0.0 && self.b.as_radians() == TWO_PI
    }

    /// `wraps` returns true if this interval crosses the 0 ≡ 2π seam.
    pub fn wraps(&self) -> bool {
        self.a > self.b
    }

    /// `size` is NaN for empty intervals and 2π for the full interval.
    pub fn size(&self) -> Angle {
        if self.wraps() {
            Angle::from_radians(TWO_PI) - (self.a - self.b)
        } else {
            self.b - self.a
        }
    }

    /// `center` is NaN for empty intervals.
    pub fn center(&self) -> NormalizedAngle {
        if self.is_empty() {
            return NormalizedAngle::nan();
        }
        NormalizedAngle::new(self.a.angle() + self.size() * 0.5)
    }

    pub fn contains(&self, x: NormalizedAngle) -> bool {
        if x.is_nan() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        if self.wraps() {
            x >= self.a || x <= self.b
        } else {
            self.a <= x && x <= self.b
        }
    }

    pub fn contains_interval(&self, x: &Self) -> bool {
        if x.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        match (self.wraps(), x.wraps()) {
            (true, true) => x.a >= self.a && x.b <= self.b,
            (true, false) => x.a >= self.a || x.b <= self.b,
            (false, true) => self.is_full(),
            (false, false) => self.a <= x.a && x.b <= self.b,
        }
    }

    pub fn intersects(&self, x: NormalizedAngle) -> bool {
        !x.is_nan() && !self.is_empty() && self.contains(x)
    }

    pub fn intersects_interval(&self, x: &Self) -> bool {
        if self.is_empty() || x.is_empty() {
            return false;
        }
        match (self.wraps(), x.wraps()) {
            (true, true) => true,
            (true, false) => x.a <= self.b || x.b >= self.a,
            (false, true) => self.a <= x.b || self.b >= x.a,
            (false, false) => self.a <= x.b && x.a <= self.b,
        }
    }

    pub fn is_disjoint_from(&self, x: NormalizedAngle) -> bool {
        !self.intersects(x)
    }

    pub fn is_disjoint_from_interval(&self, x: &Self) -> bool {
        !self.intersects_interval(x)
    }

    pub fn is_within(&self, x: NormalizedAngle) -> bool {
        self.is_empty() || (self.a == x && self.b == x)
    }

    pub fn is_within_interval(&self, x: &Self) -> bool {
        x.contains_interval(self)
    }

    pub fn relate(&self, x: NormalizedAngle) -> Relationship {
        self.relate_interval(&Self::point(x))
    }

    pub fn relate_interval(&self, x: &Self) -> Relationship {
        if self.is_empty() {
            if x.is_empty() {
                return CONTAINS | DISJOINT | WITHIN;
            }
            return DISJOINT | WITHIN;
        }
        if x.is_empty() {
            return CONTAINS | DISJOINT;
        }
        let mut r = crate::relationship::INTERSECTS;
        if self.contains_interval(x) {
            r |= CONTAINS;
        }
        if x.contains_interval(self) {
            r |= WITHIN;
        }
        if self.is_disjoint_from_interval(x) {
            r |= DISJOINT;
        }
        r
    }

    /// `clip_to` sets this interval to the smallest interval containing
    /// the intersection of itself and x.
    ///
    /// When the two intervals cross twice, the intersection consists of
    /// two arcs; the result is the wrapping interval that covers both.
    pub fn clip_to(&mut self, x: &Self) -> &mut Self {
        if self.is_empty() {
            return self;
        }
        if x.is_empty() {
            *self = Self::empty();
            return self;
        }
        match (self.wraps(), x.wraps()) {
            (true, true) => {
                // Both contain the seam, so the result does too. When
                // one interval's start lies inside the other's low arc,
                // the arcs cross twice and the hull keeps the earlier
                // start.
                let b = if x.b < self.b { x.b } else { self.b };
                let a = if self.a <= x.b {
                    self.a
                } else if x.a <= self.b {
                    x.a
                } else if x.a > self.a {
                    x.a
                } else {
                    self.a
                };
                *self = Self::new(a, b);
            }
            (true, false) => {
                let piece1 = x.a <= self.b;
                let piece2 = x.b >= self.a;
                *self = match (piece1, piece2) {
                    (true, true) => Self::new(
                        if x.a > self.a { x.a } else { self.a },
                        if x.b < self.b { x.b } else { self.b },
                    ),
                    (true, false) => {
                        Self::new(x.a, if x.b < self.b { x.b } else { self.b })
                    }
                    (false, true) => {
                        Self::new(if x.a > self.a { x.a } else { self.a }, x.b)
                    }
                    (false, false) => Self::empty(),
                };
            }
            (false, true) => {
                let piece1 = self.a <= x.b;
                let piece2 = self.b >= x.a;
                *self = match (piece1, piece2) {
                    (true, true) => Self::new(
                        if x.a > self.a { x.a } else { self.a },
                        if x.b < self.b { x.b } else { self.b },
                    ),
                    (true, false) => {
                        Self::new(self.a, if x.b < self.b { x.b } else { self.b })
                    }
                    (false, true) => {
                        Self::new(if x.a > self.a { x.a } else { self.a }, self.b)
                    }
                    (false, false) => Self::empty(),
                };
            }
            (false, false) => {
                if x.a > self.a {
                    self.a = x.a;
                }
                if x.b < self.b {
                    self.b = x.b;
                }
                if self.a > self.b {
                    *self = Self::empty();
                }
            }
        }
        self
    }

    pub fn clipped_to(&self, x: &Self) -> Self {
        let mut i = *self;
        i.clip_to(x);
        i
    }

    pub fn expand_to(&mut self, x: NormalizedAngle) -> &mut Self {
        if !x.is_nan() {
            self.expand_to_interval(&Self::point(x));
        }
        self
    }

    pub fn expanded_to(&self, x: NormalizedAngle) -> Self {
        let mut i = *self;
        i.expand_to(x);
        i
    }

    /// `expand_to_interval` sets this interval to the smaller of the two
    /// arcs containing the union of itself and x.
    ///
    /// When both candidate unions have the same size, the candidate that
    /// keeps this interval's lower endpoint and grows its upper endpoint
    /// is chosen. The result is minimal either way.
    pub fn expand_to_interval(&mut self, x: &Self) -> &mut Self {
        if self.is_empty() {
            *self = *x;
            return self;
        }
        if x.is_empty() {
            return self;
        }
        if self.is_full() || x.is_full() {
            *self = Self::full();
            return self;
        }
        match (self.wraps(), x.wraps()) {
            (true, true) => {
                let a = if x.a < self.a { x.a } else { self.a };
                let b = if x.b > self.b { x.b } else { self.b };
                *self = if a <= b { Self::full() } else { Self::new(a, b) };
            }
            (true, false) => {
                *self = Self::merge_wrap_with_arc(self, x);
            }
            (false, true) => {
                *self = Self::merge_wrap_with_arc(x, self);
            }
            (false, false) => {
                if self.intersects_interval(x)
                    || self.a == x.b
                    || self.b == x.a
                {
                    let a = if x.a < self.a { x.a } else { self.a };
                    let b = if x.b > self.b { x.b } else { self.b };
                    *self = Self::new(a, b);
                    return self;
                }
                // Disjoint arcs: pick the smaller of the two unions.
                let (first, second, self_first) = if self.a <= x.a {
                    (*self, *x, true)
                } else {
                    (*x, *self, false)
                };
                let direct = (second.b - first.a).as_radians();
                let wrapped = TWO_PI - (second.a - first.b).as_radians();
                let prefer_direct = if self_first {
                    direct <= wrapped
                } else {
                    direct < wrapped
                };
                *self = if prefer_direct {
                    Self::new(first.a, second.b)
                } else {
                    Self::new(second.a, first.b)
                };
            }
        }
        self
    }

    // Union of a wrapping interval w and a non-wrapping arc x.
    fn merge_wrap_with_arc(w: &Self, x: &Self) -> Self {
        if w.contains_interval(x) {
            return *w;
        }
        let touches_b = x.a <= w.b;
        let touches_a = x.b >= w.a;
        match (touches_b, touches_a) {
            // The arc plugs the gap entirely.
            (true, true) => Self::full(),
            (true, false) => Self::new(w.a, if x.b > w.b { x.b } else { w.b }),
            (false, true) => Self::new(if x.a < w.a { x.a } else { w.a }, w.b),
            (false, false) => {
                // The arc floats inside the gap: grow whichever end of
                // the wrapping interval costs less.
                let grow_b = (x.b - w.b).as_radians();
                let grow_a = (w.a - x.a).as_radians();
                if grow_b <= grow_a {
                    Self::new(w.a, x.b)
                } else {
                    Self::new(x.a, w.b)
                }
            }
        }
    }

    pub fn expanded_to_interval(&self, x: &Self) -> Self {
        let mut i = *self;
        i.expand_to_interval(x);
        i
    }

    /// For positive w, `dilate_by` grows each endpoint of this interval
    /// outward along the circle by w; for negative w it shrinks them
    /// inward, emptying the interval if the erosion exceeds half its
    /// size. NaN, zero, empty and full cases are no-ops.
    pub fn dilate_by(&mut self, w: Angle) -> &mut Self {
        if w.is_nan() || w.as_radians() == 0.0 || self.is_empty() || self.is_full() {
            return self;
        }
        let size = self.size().as_radians() + 2.0 * w.as_radians();
        if w.as_radians() > 0.0 && size >= TWO_PI {
            *self = Self::full();
            return self;
        }
        if w.as_radians() < 0.0 && size < 0.0 {
            *self = Self::empty();
            return self;
        }
        self.a = NormalizedAngle::new(self.a.angle() - w);
        self.b = NormalizedAngle::new(self.b.angle() + w);
        self
    }

    pub fn dilated_by(&self, w: Angle) -> Self {
        let mut i = *self;
        i.dilate_by(w);
        i
    }

    pub fn erode_by(&mut self, w: Angle) -> &mut Self {
        self.dilate_by(-w)
    }

    pub fn eroded_by(&self, w: Angle) -> Self {
        self.dilated_by(-w)
    }
}

impl PartialEq for NormalizedAngleInterval {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b)
            || (self.is_empty() && other.is_empty())
    }
}

impl Display for NormalizedAngleInterval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.a, self.b)
    }
}
