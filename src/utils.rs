//! Numerical error budget and small geometric helpers.
//!
//! Every bounding shape and relation test in this crate rounds outward
//! by one of the constants below, applied at the single point where the
//! bound is produced. The budget, per operator:
//!
//! | constant                          | covers                                           |
//! |-----------------------------------|--------------------------------------------------|
//! | `EPSILON`                         | one rounding of a double (2⁻⁵²)                  |
//! | `MAX_ASIN_ERROR`                  | worst-case angle error of `asin` (≳ 2⁻⁵²)        |
//! | `MAX_SQUARED_CHORD_LENGTH_ERROR`  | evaluation of (p − q)·(p − q) for unit p, q      |
//! | `MAX_BOUNDARY_ERROR`              | circle-boundary extremum c·cos θ ± d·sin θ       |

use crate::vector::{UnitVector3d, Vector3d};

/// One unit of double-precision roundoff, 2⁻⁵².
pub const EPSILON: f64 = 2.220446049250313e-16;

/// A little more than the maximum error in an angle computed through
/// `asin`.
pub const MAX_ASIN_ERROR: f64 = 3.0e-16;

/// A conservative bound on the absolute error of a squared chord length
/// between unit vectors; the quantity is at most 4, and its evaluation
/// performs a handful of roundings.
pub const MAX_SQUARED_CHORD_LENGTH_ERROR: f64 = 2.5e-15;

/// A little more than 5.5ε; bounds the error of the per-axis circle
/// boundary extremum cᵢ·cos θ ± √(1 − cᵢ²)·sin θ.
pub const MAX_BOUNDARY_ERROR: f64 = 6.2e-16;

/// `min_squared_chord_length` returns the minimum squared chord length
/// between v and points in the interior of the great circle segment
/// (a, b) with plane normal n, or 4 (the global maximum) when the
/// minimum over the segment is attained at an endpoint.
///
/// Endpoints are the caller's responsibility; relation tests classify
/// vertices separately before probing edge interiors.
pub fn min_squared_chord_length(
    v: &Vector3d,
    a: &UnitVector3d,
    b: &UnitVector3d,
    n: &Vector3d,
) -> f64 {
    // The point of the great circle closest to v is the projection of v
    // onto the circle's plane. It lies in the segment interior iff it is
    // on the correct side of the planes through n and each endpoint.
    let vxn = v.cross(n);
    if vxn.dot(a.as_vector()) > 0.0 && vxn.dot(b.as_vector()) < 0.0 {
        let s = n.squared_norm();
        let vn = v.dot(n);
        let d = (vn * vn / (s * v.squared_norm())).min(1.0);
        // sin of the angular distance to the plane is |v·n̂|/‖v‖, and the
        // squared chord to the circle is 2 − 2·cos of that distance.
        return 2.0 - 2.0 * (1.0 - d).sqrt();
    }
    4.0
}

/// `max_squared_chord_length` returns the maximum squared chord length
/// between v and points in the interior of the great circle segment
/// (a, b) with plane normal n, or 0 (the global minimum) when the
/// maximum over the segment is attained at an endpoint.
pub fn max_squared_chord_length(
    v: &Vector3d,
    a: &UnitVector3d,
    b: &UnitVector3d,
    n: &Vector3d,
) -> f64 {
    // The farthest point of the great circle is antipodal to the
    // closest one, so the sidedness tests flip.
    let vxn = v.cross(n);
    if vxn.dot(a.as_vector()) < 0.0 && vxn.dot(b.as_vector()) > 0.0 {
        let s = n.squared_norm();
        let vn = v.dot(n);
        let d = (vn * vn / (s * v.squared_norm())).min(1.0);
        return 2.0 + 2.0 * (1.0 - d).sqrt();
    }
    0.0
}
