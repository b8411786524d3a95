use std::fmt::{self, Display, Formatter};

use crate::angle::{Angle, NormalizedAngle};
use crate::error::ValidationError;
use crate::vector::Vector3d;

const HALF_PI: f64 = 0.5 * std::f64::consts::PI;

/// `LonLat` is a longitude/latitude angle pair on the unit sphere.
///
/// Conversion from vectors follows the conventions x̂ → (0°, 0°),
/// ŷ → (90°, 0°), ẑ → (0°, +90°). If either coordinate is NaN, both are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LonLat {
    lon: NormalizedAngle,
    lat: Angle,
}

impl LonLat {
    pub fn from_degrees(lon: f64, lat: f64) -> Result<Self, ValidationError> {
        Self::new(NormalizedAngle::from_degrees(lon), Angle::from_degrees(lat))
    }

    pub fn from_radians(lon: f64, lat: f64) -> Result<Self, ValidationError> {
        Self::new(NormalizedAngle::from_radians(lon), Angle::from_radians(lat))
    }

    pub fn new(lon: NormalizedAngle, lat: Angle) -> Result<Self, ValidationError> {
        if lat.as_radians().abs() > HALF_PI {
            return Err(ValidationError::InvalidLatitude(lat.as_radians()));
        }
        let mut p = LonLat { lon, lat };
        p.enforce_invariants();
        Ok(p)
    }

    pub(crate) fn new_unchecked(lon: NormalizedAngle, lat: Angle) -> Self {
        let mut p = LonLat { lon, lat };
        p.enforce_invariants();
        p
    }

    pub fn from_vector(v: &Vector3d) -> Self {
        let mut p = LonLat {
            lon: Self::longitude_of(v),
            lat: Self::latitude_of(v),
        };
        p.enforce_invariants();
        p
    }

    /// `latitude_of` returns the latitude of the point on the unit sphere
    /// in the direction of v. The result is clamped to [−π/2, π/2].
    pub fn latitude_of(v: &Vector3d) -> Angle {
        let d2 = v.x * v.x + v.y * v.y;
        let mut lat = 0.0;
        if v.z != 0.0 {
            lat = v.z.atan2(d2.sqrt());
            if lat.abs() > HALF_PI {
                lat = HALF_PI.copysign(lat);
            }
        }
        Angle::from_radians(lat)
    }

    /// `longitude_of` returns the longitude of the point on the unit
    /// sphere in the direction of v.
    pub fn longitude_of(v: &Vector3d) -> NormalizedAngle {
        let d2 = v.x * v.x + v.y * v.y;
        let mut lon = 0.0;
        if d2 != 0.0 {
            lon = v.y.atan2(v.x);
            if lon < 0.0 {
                lon += crate::angle::TWO_PI;
            }
        }
        NormalizedAngle::from_radians_unchecked(lon)
    }

    pub fn lon(&self) -> NormalizedAngle {
        self.lon
    }

    pub fn lat(&self) -> Angle {
        self.lat
    }

    fn enforce_invariants(&mut self) {
        if self.lon.is_nan() {
            self.lat = Angle::nan();
        } else if self.lat.is_nan() {
            self.lon = NormalizedAngle::nan();
        }
    }
}

impl Display for LonLat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.lon, self.lat)
    }
}
