use crate::exact::ExactInteger;
use crate::vector::{UnitVector3d, Vector3d};

// A product of three 53-bit mantissas occupies at most 159 bits.
const PRODUCT_LIMBS: usize = 6;

// The accumulator must absorb shifts across the full double exponent
// range; 512 limbs leaves a wide margin.
const ACCUMULATOR_LIMBS: usize = 512;

// An exact floating point value: integer mantissa times 2^exponent.
struct ExactFloat {
    mantissa: ExactInteger,
    exponent: i32,
}

// Decomposes a finite double into an integer mantissa and exponent,
// such that m × 2^e equals the input exactly.
fn frexp53(d: f64) -> (i64, i32) {
    if d == 0.0 {
        return (0, 0);
    }
    let bits = d.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & 0x000f_ffff_ffff_ffff;
    let (mantissa, exponent) = if biased == 0 {
        // Subnormal.
        (fraction, -1074)
    } else {
        (fraction | 0x0010_0000_0000_0000, biased - 1075)
    };
    let m = if d < 0.0 {
        -(mantissa as i64)
    } else {
        mantissa as i64
    };
    (m, exponent)
}

// Computes the product of three doubles exactly.
fn compute_product(d0: f64, d1: f64, d2: f64) -> ExactFloat {
    let (m0, e0) = frexp53(d0);
    let (m1, e1) = frexp53(d1);
    let (m2, e2) = frexp53(d2);
    let mut mantissa = ExactInteger::with_capacity(PRODUCT_LIMBS);
    let mut factor = ExactInteger::with_capacity(2);
    mantissa
        .set_to_i64(m0)
        .expect("product mantissa capacity fits a 53-bit factor");
    factor
        .set_to_i64(m1)
        .expect("factor capacity fits a 53-bit mantissa");
    mantissa
        .multiply(&factor)
        .expect("product mantissa capacity fits two 53-bit factors");
    factor
        .set_to_i64(m2)
        .expect("factor capacity fits a 53-bit mantissa");
    mantissa
        .multiply(&factor)
        .expect("product mantissa capacity fits three 53-bit factors");
    ExactFloat {
        mantissa,
        exponent: e0 + e1 + e2,
    }
}

/// `orientation_exact` computes the sign of det[a b c] using exact
/// arithmetic. It is quite slow relative to the floating point filter in
/// [`orientation`], which should be preferred when applicable.
pub fn orientation_exact(a: &Vector3d, b: &Vector3d, c: &Vector3d) -> i32 {
    let mut products = [
        compute_product(a.x, b.y, c.z),
        compute_product(a.x, b.z, c.y),
        compute_product(a.y, b.z, c.x),
        compute_product(a.y, b.x, c.z),
        compute_product(a.z, b.x, c.y),
        compute_product(a.z, b.y, c.x),
    ];
    products[1].mantissa.negate();
    products[3].mantissa.negate();
    products[5].mantissa.negate();
    // Accumulate in descending exponent order. At each step we have an
    // accumulated value A·2ʲ and a product P·2ᵏ with j ≥ k, and update
    // the accumulator to (A·2ʲ⁻ᵏ + P)·2ᵏ; the sorting guarantees the
    // shift count is non-negative.
    products.sort_by(|x, y| y.exponent.cmp(&x.exponent));
    let mut accumulator = ExactInteger::with_capacity(ACCUMULATOR_LIMBS);
    accumulator
        .assign(&products[0].mantissa)
        .expect("accumulator capacity exceeds product capacity");
    for i in 1..6 {
        let shift = (products[i - 1].exponent - products[i].exponent) as usize;
        accumulator
            .multiply_pow2(shift)
            .expect("accumulator capacity covers the double exponent range");
        accumulator
            .add(&products[i].mantissa)
            .expect("accumulator capacity covers the double exponent range");
    }
    accumulator.sign()
}

/// `orientation` computes and returns the orientations of three unit
/// vectors a, b and c. The return value is +1 if the vectors are in
/// counter-clockwise orientation when viewed from outside the unit
/// sphere, 0 if they are coplanar with the origin, and −1 if they are
/// in clockwise orientation.
pub fn orientation(a: &UnitVector3d, b: &UnitVector3d, c: &UnitVector3d) -> i32 {
    // This constant is a little more than 5ε, where ε = 2^-53. When
    // multiplied by the permanent of |M|, it gives an error bound on the
    // determinant of M, following a forward analysis in the style of:
    //
    //     Adaptive Precision Floating-Point Arithmetic and Fast Robust
    //     Geometric Predicates, Jonathan Richard Shewchuk, Discrete &
    //     Computational Geometry 18(3):305–363, October 1997.
    const RELATIVE_ERROR: f64 = 5.6e-16;
    // Since all three unit vectors are normalized, the permanent of |M|
    // is below 3 + c for a small multiple c of ε, giving this bound on
    // the absolute error in the determinant.
    const MAX_ABSOLUTE_ERROR: f64 = 1.7e-15;
    // A little more than 14 × 2^-1022; accounts for underflow, assuming
    // (conservatively) hardware without gradual underflow.
    const MIN_ABSOLUTE_ERROR: f64 = 4.0e-307;

    let bycz = b.y() * c.z();
    let bzcy = b.z() * c.y();
    let bzcx = b.z() * c.x();
    let bxcz = b.x() * c.z();
    let bxcy = b.x() * c.y();
    let bycx = b.y() * c.x();
    let determinant =
        a.x() * (bycz - bzcy) + a.y() * (bzcx - bxcz) + a.z() * (bxcy - bycx);
    if determinant > MAX_ABSOLUTE_ERROR {
        return 1;
    } else if determinant < -MAX_ABSOLUTE_ERROR {
        return -1;
    }
    // Try a tighter, input-dependent error bound before falling back to
    // exact arithmetic.
    let permanent = a.x().abs() * (bycz.abs() + bzcy.abs())
        + a.y().abs() * (bzcx.abs() + bxcz.abs())
        + a.z().abs() * (bxcy.abs() + bycx.abs());
    let max_error = RELATIVE_ERROR * permanent + MIN_ABSOLUTE_ERROR;
    if determinant > max_error {
        return 1;
    } else if determinant < -max_error {
        return -1;
    }
    // Avoid the slow path when any two inputs are identical or antipodal.
    if a == b || b == c || a == c || *a == -*b || *b == -*c || *a == -*c {
        return 0;
    }
    orientation_exact(a.as_vector(), b.as_vector(), c.as_vector())
}

// Calling orientation() with a first argument of ±x̂, ±ŷ or ±ẑ reduces
// the determinant to 2×2, with correspondingly tighter error bounds.
fn orientation_xyz(ab: f64, ba: f64) -> i32 {
    const RELATIVE_ERROR: f64 = 1.12e-16; // > 2^-53
    const MAX_ABSOLUTE_ERROR: f64 = 1.12e-16; // > 2^-53
    const MIN_ABSOLUTE_ERROR: f64 = 1.0e-307; // > 3 × 2^-1022

    let determinant = ab - ba;
    if determinant > MAX_ABSOLUTE_ERROR {
        return 1;
    } else if determinant < -MAX_ABSOLUTE_ERROR {
        return -1;
    }
    let permanent = ab.abs() + ba.abs();
    let max_error = RELATIVE_ERROR * permanent + MIN_ABSOLUTE_ERROR;
    if determinant > max_error {
        1
    } else if determinant < -max_error {
        -1
    } else {
        0
    }
}

/// `orientation_x` is equivalent to `orientation(x̂, b, c)`.
pub fn orientation_x(b: &UnitVector3d, c: &UnitVector3d) -> i32 {
    let o = orientation_xyz(b.y() * c.z(), b.z() * c.y());
    if o != 0 {
        o
    } else {
        orientation_exact(
            UnitVector3d::x_axis().as_vector(),
            b.as_vector(),
            c.as_vector(),
        )
    }
}

/// `orientation_y` is equivalent to `orientation(ŷ, b, c)`.
pub fn orientation_y(b: &UnitVector3d, c: &UnitVector3d) -> i32 {
    let o = orientation_xyz(b.z() * c.x(), b.x() * c.z());
    if o != 0 {
        o
    } else {
        orientation_exact(
            UnitVector3d::y_axis().as_vector(),
            b.as_vector(),
            c.as_vector(),
        )
    }
}

/// `orientation_z` is equivalent to `orientation(ẑ, b, c)`.
pub fn orientation_z(b: &UnitVector3d, c: &UnitVector3d) -> i32 {
    let o = orientation_xyz(b.x() * c.y(), b.y() * c.x());
    if o != 0 {
        o
    } else {
        orientation_exact(
            UnitVector3d::z_axis().as_vector(),
            b.as_vector(),
            c.as_vector(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frexp53_round_trips() {
        for d in [
            1.0,
            -1.0,
            0.5,
            3.0,
            1.0e-300,
            -2.5e17,
            f64::MIN_POSITIVE,
            5.0e-324,
        ] {
            let (m, e) = frexp53(d);
            assert_eq!(m as f64 * (e as f64).exp2(), d, "frexp53({d})");
        }
        assert_eq!(frexp53(0.0), (0, 0));
    }

    #[test]
    fn basis_orientations() {
        let x = UnitVector3d::x_axis();
        let y = UnitVector3d::y_axis();
        let z = UnitVector3d::z_axis();
        assert_eq!(orientation(&x, &y, &z), 1);
        assert_eq!(orientation(&y, &z, &x), 1);
        assert_eq!(orientation(&z, &x, &y), 1);
        assert_eq!(orientation(&x, &z, &y), -1);
        assert_eq!(orientation(&y, &x, &z), -1);
        assert_eq!(orientation(&z, &y, &x), -1);
    }

    #[test]
    fn degenerate_arguments_are_coplanar() {
        let x = UnitVector3d::x_axis();
        let y = UnitVector3d::y_axis();
        assert_eq!(orientation(&x, &x, &y), 0);
        assert_eq!(orientation(&x, &y, &y), 0);
        assert_eq!(orientation(&y, &x, &y), 0);
        assert_eq!(orientation(&x, &-x, &y), 0);
        assert_eq!(orientation(&x, &y, &-x), 0);
    }

    #[test]
    fn antisymmetry() {
        let a = UnitVector3d::new(1.0, 2.0, 3.0);
        let b = UnitVector3d::new(-1.0, 1.0, 0.5);
        let c = UnitVector3d::new(0.25, -2.0, 1.0);
        assert_eq!(orientation(&a, &b, &c), -orientation(&b, &a, &c));
        assert_eq!(orientation(&a, &b, &c), orientation(&b, &c, &a));
        assert_eq!(orientation(&a, &b, &c), -orientation(&a, &c, &b));
    }

    #[test]
    fn exact_fallback_decides_tiny_determinants() {
        // b and c straddle the plane through a and the origin by less
        // than the floating point filter can resolve.
        let a = UnitVector3d::z_axis();
        let b = UnitVector3d::new(1.0, 1.0e-17, 0.0);
        let c = UnitVector3d::new(1.0, -1.0e-17, 0.0);
        assert_eq!(orientation(&a, &b, &c), -1);
        assert_eq!(orientation(&a, &c, &b), 1);
    }

    #[test]
    fn exact_matches_filter_on_clear_cases() {
        let verts = [
            UnitVector3d::new(1.0, 0.5, -0.25),
            UnitVector3d::new(-0.5, 1.0, 0.125),
            UnitVector3d::new(0.3, -0.8, 0.9),
        ];
        let [a, b, c] = verts;
        assert_eq!(
            orientation(&a, &b, &c),
            orientation_exact(a.as_vector(), b.as_vector(), c.as_vector())
        );
    }

    #[test]
    fn basis_variants_agree_with_general_predicate() {
        let pairs = [
            (UnitVector3d::new(0.5, 1.0, 0.25), UnitVector3d::new(-1.0, 0.5, 2.0)),
            (UnitVector3d::new(0.1, -0.2, 0.3), UnitVector3d::new(0.4, 0.5, -0.6)),
        ];
        for (b, c) in pairs {
            assert_eq!(orientation_x(&b, &c), orientation(&UnitVector3d::x_axis(), &b, &c));
            assert_eq!(orientation_y(&b, &c), orientation(&UnitVector3d::y_axis(), &b, &c));
            assert_eq!(orientation_z(&b, &c), orientation(&UnitVector3d::z_axis(), &b, &c));
        }
    }
}
