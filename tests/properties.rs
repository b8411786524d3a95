//! Cross-cutting properties of the region kernel, the range-set
//! algebra and the pixelizations, exercised with randomized inputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sphix::{
    Angle, CONTAINS, Circle, ConvexPolygon, DISJOINT, HtmPixelization, LonLat, LonLatBox,
    Mq3cPixelization, NormalizedAngle, Pixelization, RangeSet, Region, UnitVector3d,
    UnionRegion, WITHIN, orientation,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5ee_d5)
}

fn random_unit_vector(rng: &mut StdRng) -> UnitVector3d {
    // Uniform on the sphere via the cylinder projection.
    let z: f64 = rng.gen_range(-1.0..1.0);
    let phi: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = (1.0 - z * z).sqrt();
    UnitVector3d::new(r * phi.cos(), r * phi.sin(), z)
}

fn random_region(rng: &mut StdRng) -> Region {
    match rng.gen_range(0..4) {
        0 => Region::Circle(Circle::new(
            random_unit_vector(rng),
            Angle::from_degrees(rng.gen_range(0.1..40.0)),
        )),
        1 => {
            let lon = rng.gen_range(0.0..360.0);
            let lat = rng.gen_range(-80.0..60.0);
            Region::Box(
                LonLatBox::from_degrees(
                    lon,
                    lat,
                    lon + rng.gen_range(1.0..60.0),
                    lat + rng.gen_range(1.0..20.0),
                )
                .expect("in-range box corners"),
            )
        }
        2 => {
            // A small polygon around a random center.
            let c = random_unit_vector(rng);
            let n = UnitVector3d::orthogonal_to(&c);
            let r = Angle::from_degrees(rng.gen_range(1.0..20.0));
            let points: Vec<UnitVector3d> = (0..5)
                .map(|k| {
                    let phi = Angle::from_radians(
                        std::f64::consts::TAU * (k as f64 + rng.gen_range(0.0..0.5)) / 5.0,
                    );
                    let axis = n.rotated_around(&c, phi);
                    c.rotated_around(&axis, r)
                })
                .collect();
            Region::Polygon(ConvexPolygon::new(&points).expect("hull of a small cap"))
        }
        _ => Region::Union(
            UnionRegion::new(vec![
                Region::Circle(Circle::new(
                    random_unit_vector(rng),
                    Angle::from_degrees(rng.gen_range(0.1..10.0)),
                )),
                Region::Circle(Circle::new(
                    random_unit_vector(rng),
                    Angle::from_degrees(rng.gen_range(0.1..10.0)),
                )),
            ])
            .expect("two operands"),
        ),
    }
}

#[test]
fn bounding_shapes_contain_member_points() {
    let mut rng = rng();
    for _ in 0..200 {
        let region = random_region(&mut rng);
        let bbox = region.bounding_box();
        let b3 = region.bounding_box3d();
        let bcircle = region.bounding_circle();
        for _ in 0..50 {
            let v = random_unit_vector(&mut rng);
            if region.contains(&v) {
                assert!(bbox.contains_point(&v));
                assert!(b3.contains(v.as_vector()));
                assert!(bcircle.contains(&v));
            }
        }
    }
}

#[test]
fn relate_bits_are_proofs() {
    let mut rng = rng();
    for _ in 0..150 {
        let a = random_region(&mut rng);
        let b = random_region(&mut rng);
        let rel = a.relate(&b);
        for _ in 0..60 {
            let v = random_unit_vector(&mut rng);
            if rel.contains(DISJOINT) {
                assert!(
                    !(a.contains(&v) && b.contains(&v)),
                    "disjoint regions share {v}"
                );
            }
            if rel.contains(CONTAINS) && b.contains(&v) {
                assert!(a.contains(&v), "{v} escapes a containing region");
            }
            if rel.contains(WITHIN) && a.contains(&v) {
                assert!(b.contains(&v), "{v} escapes an enclosing region");
            }
        }
    }
}

#[test]
fn codec_round_trip_preserves_membership() {
    let mut rng = rng();
    for _ in 0..100 {
        let region = random_region(&mut rng);
        let decoded = Region::decode(&region.encode()).expect("decodable");
        for _ in 0..50 {
            let v = random_unit_vector(&mut rng);
            assert_eq!(region.contains(&v), decoded.contains(&v));
        }
    }
}

#[test]
fn orientation_is_antisymmetric_and_cyclic() {
    let mut rng = rng();
    for _ in 0..500 {
        let a = random_unit_vector(&mut rng);
        let b = random_unit_vector(&mut rng);
        let c = random_unit_vector(&mut rng);
        let o = orientation(&a, &b, &c);
        assert_eq!(o, -orientation(&b, &a, &c));
        assert_eq!(o, orientation(&b, &c, &a));
        assert_eq!(o, orientation(&c, &a, &b));
        assert_eq!(orientation(&a, &a, &b), 0);
        assert_eq!(orientation(&a, &b, &b), 0);
        assert_eq!(orientation(&a, &b, &-a), 0);
    }
}

#[test]
fn pixelization_index_round_trip() {
    let mut rng = rng();
    let htm = HtmPixelization::new(11).expect("valid level");
    let mq3c = Mq3cPixelization::new(11).expect("valid level");
    for _ in 0..300 {
        let v = random_unit_vector(&mut rng);
        let i = htm.index(&v);
        assert!(htm.universe().contains(i));
        assert!(htm.pixel(i).expect("valid index").contains(&v));
        let i = mq3c.index(&v);
        assert!(mq3c.universe().contains(i));
        assert!(mq3c.pixel(i).expect("valid index").contains(&v));
    }
}

#[test]
fn pixelization_envelope_and_interior_are_conservative() {
    let mut rng = rng();
    let htm = HtmPixelization::new(7).expect("valid level");
    let mq3c = Mq3cPixelization::new(7).expect("valid level");
    for _ in 0..25 {
        let region = random_region(&mut rng);
        for ranges in [
            (htm.envelope(&region, 0), htm.interior(&region, 0), true),
            (mq3c.envelope(&region, 0), mq3c.interior(&region, 0), false),
        ] {
            let (envelope, interior, is_htm) = ranges;
            assert!(envelope.contains_set(&interior));
            // Any point of the region indexes into the envelope, and
            // any point indexing into the interior is in the region.
            for _ in 0..100 {
                let v = random_unit_vector(&mut rng);
                let i = if is_htm { htm.index(&v) } else { mq3c.index(&v) };
                if region.contains(&v) {
                    assert!(envelope.contains(i), "member point escapes the envelope");
                }
                if interior.contains(i) {
                    assert!(region.contains(&v), "interior pixel point outside region");
                }
            }
        }
    }
}

#[test]
fn envelope_budget_produces_supersets() {
    let mut rng = rng();
    let htm = HtmPixelization::new(9).expect("valid level");
    for _ in 0..20 {
        let region = random_region(&mut rng);
        let exact = htm.envelope(&region, 0);
        let mut previous = exact.clone();
        for max_ranges in [64, 16, 4, 1] {
            let coarse = htm.envelope(&region, max_ranges);
            assert!(coarse.len() <= max_ranges);
            assert!(coarse.contains_set(&exact));
            assert!(coarse.contains_set(&previous));
            previous = coarse;
        }
    }
}

#[test]
fn rangeset_algebra_on_random_sets() {
    let mut rng = rng();
    for _ in 0..100 {
        let mut a = RangeSet::new();
        let mut b = RangeSet::new();
        for _ in 0..rng.gen_range(0..12) {
            a.insert(rng.r#gen(), rng.r#gen());
        }
        for _ in 0..rng.gen_range(0..12) {
            b.insert(rng.r#gen(), rng.r#gen());
        }
        assert!(a.is_valid() && b.is_valid());
        let u = a.union(&b);
        let i = a.intersection(&b);
        let d = a.difference(&b);
        let x = a.symmetric_difference(&b);
        for s in [&u, &i, &d, &x] {
            assert!(s.is_valid());
        }
        assert_eq!(u.complemented(), a.complemented().intersection(&b.complemented()));
        assert_eq!(i.complemented(), a.complemented().union(&b.complemented()));
        assert_eq!(d, a.intersection(&b.complemented()));
        assert_eq!(x, d.union(&b.difference(&a)));
        assert!(u.contains_set(&a) && u.contains_set(&b));
        assert!(i.is_within(&a) && i.is_within(&b));
        assert_eq!(
            u.cardinality() + i.cardinality(),
            a.cardinality() + b.cardinality()
        );
        // Spot-check membership on random probes.
        for _ in 0..50 {
            let p: u64 = rng.r#gen();
            assert_eq!(u.contains(p), a.contains(p) || b.contains(p));
            assert_eq!(i.contains(p), a.contains(p) && b.contains(p));
            assert_eq!(d.contains(p), a.contains(p) && !b.contains(p));
            assert_eq!(x.contains(p), a.contains(p) != b.contains(p));
            assert_eq!(a.complemented().contains(p), !a.contains(p));
        }
        // Simplification only adds.
        let s = a.simplified(rng.gen_range(1..16));
        assert!(s.contains_set(&a));
    }
}

#[test]
fn interval_expansion_and_clipping_laws() {
    let mut rng = rng();
    for _ in 0..500 {
        let a = NormalizedAngle::from_radians(rng.gen_range(0.0..std::f64::consts::TAU));
        let b = NormalizedAngle::from_radians(rng.gen_range(0.0..std::f64::consts::TAU));
        let c = NormalizedAngle::from_radians(rng.gen_range(0.0..std::f64::consts::TAU));
        let d = NormalizedAngle::from_radians(rng.gen_range(0.0..std::f64::consts::TAU));
        let x = sphix::NormalizedAngleInterval::new(a, b);
        let y = sphix::NormalizedAngleInterval::new(c, d);
        let hull = x.expanded_to_interval(&y);
        assert!(hull.contains_interval(&x), "{x} ⊄ {x} ∪ {y} = {hull}");
        assert!(hull.contains_interval(&y), "{y} ⊄ {x} ∪ {y} = {hull}");
        let clipped = x.clipped_to(&y);
        assert!(clipped.is_within_interval(&x));
        // The clip covers the true intersection: any point in both
        // operands is in the result.
        for _ in 0..20 {
            let p = NormalizedAngle::from_radians(rng.gen_range(0.0..std::f64::consts::TAU));
            if x.contains(p) && y.contains(p) {
                assert!(clipped.contains(p));
            }
        }
    }
}

#[test]
fn box_dilation_covers_nearby_points() {
    let mut rng = rng();
    for _ in 0..100 {
        let lon = rng.gen_range(0.0..360.0);
        let lat = rng.gen_range(-60.0..40.0);
        let b = LonLatBox::from_degrees(lon, lat, lon + 20.0, lat + 15.0)
            .expect("in-range box corners");
        let r = Angle::from_degrees(rng.gen_range(0.5..5.0));
        let d = b.dilated_by(r);
        // Points at distance < r from a box corner are inside the
        // dilated box.
        let corner = UnitVector3d::from_lonlat(
            &LonLat::from_degrees(lon, lat).expect("valid corner"),
        );
        let n = UnitVector3d::orthogonal_to(&corner);
        for k in 0..8 {
            let phi = Angle::from_radians(std::f64::consts::TAU * (k as f64) / 8.0);
            let axis = n.rotated_around(&corner, phi);
            let p = corner.rotated_around(&axis, r * 0.99);
            assert!(d.contains_point(&p), "dilated box misses a nearby point");
        }
    }
}
