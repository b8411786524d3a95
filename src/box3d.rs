use std::fmt::{self, Display, Formatter};

use crate::interval::Interval1d;
use crate::relationship::{CONTAINS, DISJOINT, Relationship, WITHIN};
use crate::vector::Vector3d;

/// `Box3d` is an axis-aligned box in ℝ³, the Cartesian product of three
/// real intervals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Box3d {
    x: Interval1d,
    y: Interval1d,
    z: Interval1d,
}

impl Box3d {
    pub fn empty() -> Self {
        Box3d::default()
    }

    pub fn full() -> Self {
        Box3d::new(Interval1d::full(), Interval1d::full(), Interval1d::full())
    }

    /// `around_unit_sphere` returns the minimal box containing S².
    pub fn around_unit_sphere() -> Self {
        Box3d::new(
            Interval1d::new(-1.0, 1.0),
            Interval1d::new(-1.0, 1.0),
            Interval1d::new(-1.0, 1.0),
        )
    }

    pub fn new(x: Interval1d, y: Interval1d, z: Interval1d) -> Self {
        let mut b = Box3d { x, y, z };
        b.enforce_invariants();
        b
    }

    pub fn point(v: &Vector3d) -> Self {
        Box3d::new(
            Interval1d::point(v.x),
            Interval1d::point(v.y),
            Interval1d::point(v.z),
        )
    }

    /// Creates a box with center v and half-widths w, h and d.
    pub fn with_halfwidths(v: &Vector3d, w: f64, h: f64, d: f64) -> Self {
        Box3d::new(
            Interval1d::point(v.x).dilated_by(w),
            Interval1d::point(v.y).dilated_by(h),
            Interval1d::point(v.z).dilated_by(d),
        )
    }

    pub fn x(&self) -> &Interval1d {
        &self.x
    }

    pub fn y(&self) -> &Interval1d {
        &self.y
    }

    pub fn z(&self) -> &Interval1d {
        &self.z
    }

    pub fn axis(&self, i: usize) -> &Interval1d {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Box3d axis index out of range: {i}"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.x.is_full() && self.y.is_full() && self.z.is_full()
    }

    /// `center` is arbitrary for empty and full boxes.
    pub fn center(&self) -> Vector3d {
        Vector3d::new(self.x.center(), self.y.center(), self.z.center())
    }

    pub fn width(&self) -> f64 {
        self.x.size()
    }

    pub fn height(&self) -> f64 {
        self.y.size()
    }

    pub fn depth(&self) -> f64 {
        self.z.size()
    }

    pub fn contains(&self, v: &Vector3d) -> bool {
        self.x.contains(v.x) && self.y.contains(v.y) && self.z.contains(v.z)
    }

    pub fn contains_box(&self, b: &Box3d) -> bool {
        self.x.contains_interval(&b.x)
            && self.y.contains_interval(&b.y)
            && self.z.contains_interval(&b.z)
    }

    pub fn is_disjoint_from(&self, b: &Box3d) -> bool {
        !self.intersects(b)
    }

    pub fn intersects(&self, b: &Box3d) -> bool {
        self.x.intersects_interval(&b.x)
            && self.y.intersects_interval(&b.y)
            && self.z.intersects_interval(&b.z)
    }

    pub fn is_within(&self, b: &Box3d) -> bool {
        b.contains_box(self)
    }

    pub fn relate(&self, b: &Box3d) -> Relationship {
        let r1 = self.x.relate_interval(&b.x);
        let r2 = self.y.relate_interval(&b.y);
        let r3 = self.z.relate_interval(&b.z);
        // Any per-axis disjointness separates the boxes; the other
        // relationships must hold on every axis.
        ((r1 & r2 & r3) & (CONTAINS | WITHIN)) | ((r1 | r2 | r3) & DISJOINT)
    }

    pub fn clip_to(&mut self, b: &Box3d) -> &mut Self {
        self.x.clip_to(&b.x);
        self.y.clip_to(&b.y);
        self.z.clip_to(&b.z);
        self.enforce_invariants();
        self
    }

    pub fn clipped_to(&self, b: &Box3d) -> Box3d {
        let mut r = *self;
        r.clip_to(b);
        r
    }

    pub fn expand_to(&mut self, b: &Box3d) -> &mut Self {
        self.x.expand_to_interval(&b.x);
        self.y.expand_to_interval(&b.y);
        self.z.expand_to_interval(&b.z);
        self
    }

    pub fn expanded_to(&self, b: &Box3d) -> Box3d {
        let mut r = *self;
        r.expand_to(b);
        r
    }

    pub fn dilate_by(&mut self, r: f64) -> &mut Self {
        self.x.dilate_by(r);
        self.y.dilate_by(r);
        self.z.dilate_by(r);
        self.enforce_invariants();
        self
    }

    pub fn dilated_by(&self, r: f64) -> Box3d {
        let mut b = *self;
        b.dilate_by(r);
        b
    }

    pub fn erode_by(&mut self, r: f64) -> &mut Self {
        self.dilate_by(-r)
    }

    pub fn eroded_by(&self, r: f64) -> Box3d {
        self.dilated_by(-r)
    }

    fn enforce_invariants(&mut self) {
        // Either all three intervals are empty, or none is.
        if self.x.is_empty() || self.y.is_empty() || self.z.is_empty() {
            *self = Box3d {
                x: Interval1d::empty(),
                y: Interval1d::empty(),
                z: Interval1d::empty(),
            };
        }
    }
}

impl Display for Box3d {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_full_and_point() {
        assert!(Box3d::empty().is_empty());
        assert!(Box3d::full().is_full());
        let p = Vector3d::new(0.25, -0.5, 0.75);
        let b = Box3d::point(&p);
        assert!(b.contains(&p));
        assert_eq!(b.center(), p);
        assert_eq!(b.width(), 0.0);
        assert!(Box3d::around_unit_sphere().contains_box(&b));
    }

    #[test]
    fn relations_decompose_per_axis() {
        let b = Box3d::new(
            Interval1d::new(0.0, 1.0),
            Interval1d::new(0.0, 1.0),
            Interval1d::new(0.0, 1.0),
        );
        let inside = Box3d::with_halfwidths(&Vector3d::new(0.5, 0.5, 0.5), 0.1, 0.1, 0.1);
        assert_eq!(b.relate(&inside), CONTAINS);
        assert_eq!(inside.relate(&b), WITHIN);
        let off = Box3d::with_halfwidths(&Vector3d::new(3.0, 0.5, 0.5), 0.1, 0.1, 0.1);
        assert_eq!(b.relate(&off), DISJOINT);
        assert!(b.is_disjoint_from(&off));
        let overlap = Box3d::with_halfwidths(&Vector3d::new(1.0, 0.5, 0.5), 0.2, 0.2, 0.2);
        assert!(b.intersects(&overlap));
        assert!(b.relate(&overlap).is_empty());
    }

    #[test]
    fn clipping_and_expansion() {
        let a = Box3d::new(
            Interval1d::new(0.0, 2.0),
            Interval1d::new(0.0, 2.0),
            Interval1d::new(0.0, 2.0),
        );
        let b = Box3d::new(
            Interval1d::new(1.0, 3.0),
            Interval1d::new(1.0, 3.0),
            Interval1d::new(1.0, 3.0),
        );
        let c = a.clipped_to(&b);
        assert_eq!(c.x(), &Interval1d::new(1.0, 2.0));
        let d = a.expanded_to(&b);
        assert_eq!(d.x(), &Interval1d::new(0.0, 3.0));
        // Disjoint on one axis empties the whole clip.
        let far = Box3d::new(
            Interval1d::new(5.0, 6.0),
            Interval1d::new(0.0, 2.0),
            Interval1d::new(0.0, 2.0),
        );
        assert!(a.clipped_to(&far).is_empty());
    }

    #[test]
    fn dilation() {
        let b = Box3d::point(&Vector3d::new(0.0, 0.0, 0.0)).dilated_by(1.0);
        assert!(b.contains(&Vector3d::new(1.0, -1.0, 0.5)));
        assert!(b.eroded_by(2.0).is_empty());
    }
}
