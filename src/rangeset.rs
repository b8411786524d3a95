use std::fmt::{self, Display, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, Not, Sub};

const UNIVERSE_END: u128 = 1 << 64;

/// `RangeSet` is a set of unsigned 64-bit integers, stored as an ordered
/// sequence of disjoint, non-adjacent half-open ranges [begin, end).
///
/// An `end` of zero stands for 2⁶⁴, so the full set is the single range
/// [0, 0) and the empty set is the empty sequence. Range arguments are
/// interpreted circularly: `insert(a, b)` with `a > b` inserts
/// [a, 2⁶⁴) ∪ [0, b), and `insert(a, a)` inserts everything.
///
/// Every public operation leaves the representation canonical, so two
/// range sets compare equal exactly when they contain the same integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<(u64, u64)>,
}

fn end_of(e: u64) -> u128 {
    if e == 0 { UNIVERSE_END } else { e as u128 }
}

impl RangeSet {
    pub fn new() -> Self {
        RangeSet { ranges: Vec::new() }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn full() -> Self {
        RangeSet {
            ranges: vec![(0, 0)],
        }
    }

    /// Creates a set containing the single integer u.
    pub fn single(u: u64) -> Self {
        let mut s = Self::new();
        s.insert(u, u.wrapping_add(1));
        s
    }

    /// Creates a set containing [lo, hi), interpreted circularly.
    pub fn range(lo: u64, hi: u64) -> Self {
        let mut s = Self::new();
        s.insert(lo, hi);
        s
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ranges == [(0, 0)]
    }

    /// `len` returns the number of ranges in this set.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// `cardinality` returns the number of integers in this set.
    pub fn cardinality(&self) -> u128 {
        self.ranges
            .iter()
            .map(|&(b, e)| end_of(e) - b as u128)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.ranges.iter().copied()
    }

    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.ranges
    }

    /// `is_valid` checks the canonical-form invariants. It exists for
    /// tests; public operations always leave the set valid.
    pub fn is_valid(&self) -> bool {
        let mut prev_end: u128 = 0;
        for (i, &(b, e)) in self.ranges.iter().enumerate() {
            let b = b as u128;
            let e = end_of(e);
            if b >= e {
                return false;
            }
            if i > 0 && b <= prev_end {
                return false;
            }
            prev_end = e;
        }
        true
    }

    fn pieces(lo: u64, hi: u64) -> Vec<(u128, u128)> {
        if lo < hi {
            vec![(lo as u128, hi as u128)]
        } else if lo == hi {
            vec![(0, UNIVERSE_END)]
        } else if hi == 0 {
            vec![(lo as u128, UNIVERSE_END)]
        } else {
            vec![(0, hi as u128), (lo as u128, UNIVERSE_END)]
        }
    }

    fn to_wide(&self) -> Vec<(u128, u128)> {
        self.ranges
            .iter()
            .map(|&(b, e)| (b as u128, end_of(e)))
            .collect()
    }

    fn from_wide(wide: Vec<(u128, u128)>) -> Self {
        RangeSet {
            ranges: wide
                .into_iter()
                .map(|(b, e)| (b as u64, if e == UNIVERSE_END { 0 } else { e as u64 }))
                .collect(),
        }
    }

    // Merges a sorted list of possibly overlapping or adjacent ranges.
    fn coalesce(wide: &mut Vec<(u128, u128)>) {
        wide.sort_unstable();
        let mut out: Vec<(u128, u128)> = Vec::with_capacity(wide.len());
        for &(b, e) in wide.iter() {
            if b >= e {
                continue;
            }
            match out.last_mut() {
                Some(last) if b <= last.1 => last.1 = last.1.max(e),
                _ => out.push((b, e)),
            }
        }
        *wide = out;
    }

    /// `insert` adds [lo, hi) to this set, interpreted circularly.
    ///
    /// Inserting ranges in ascending order is amortized constant time;
    /// the pixelization tree walks depend on this.
    pub fn insert(&mut self, lo: u64, hi: u64) -> &mut Self {
        if lo < hi {
            let b = lo as u128;
            let e = hi as u128;
            match self.ranges.last_mut() {
                None => {
                    self.ranges.push((lo, hi));
                    return self;
                }
                Some(last) => {
                    let last_end = end_of(last.1);
                    if last_end == b {
                        last.1 = hi;
                        return self;
                    }
                    if last_end < b {
                        self.ranges.push((lo, hi));
                        return self;
                    }
                    if last.0 as u128 <= b && e <= last_end {
                        // Already covered.
                        return self;
                    }
                }
            }
        }
        let mut wide = self.to_wide();
        wide.extend(Self::pieces(lo, hi));
        Self::coalesce(&mut wide);
        *self = Self::from_wide(wide);
        self
    }

    /// `insert_single` adds the single integer u to this set.
    pub fn insert_single(&mut self, u: u64) -> &mut Self {
        self.insert(u, u.wrapping_add(1))
    }

    /// `erase` removes [lo, hi) from this set, interpreted circularly.
    pub fn erase(&mut self, lo: u64, hi: u64) -> &mut Self {
        let mut out: Vec<(u128, u128)> = Vec::with_capacity(self.ranges.len() + 1);
        let holes = Self::pieces(lo, hi);
        for (mut b, e) in self.to_wide() {
            for &(hb, he) in &holes {
                if he <= b || hb >= e {
                    continue;
                }
                if hb > b {
                    out.push((b, hb));
                }
                b = he;
                if b >= e {
                    break;
                }
            }
            if b < e {
                out.push((b, e));
            }
        }
        Self::coalesce(&mut out);
        *self = Self::from_wide(out);
        self
    }

    fn combine(&self, other: &RangeSet, keep: impl Fn(bool, bool) -> bool) -> RangeSet {
        let a = self.to_wide();
        let b = other.to_wide();
        let mut cuts: Vec<u128> = vec![0, UNIVERSE_END];
        for &(x, y) in a.iter().chain(b.iter()) {
            cuts.push(x);
            cuts.push(y);
        }
        cuts.sort_unstable();
        cuts.dedup();
        let covers = |wide: &[(u128, u128)], p: u128| {
            wide.iter().any(|&(x, y)| x <= p && p < y)
        };
        let mut out: Vec<(u128, u128)> = Vec::new();
        for w in cuts.windows(2) {
            let (p, q) = (w[0], w[1]);
            if keep(covers(&a, p), covers(&b, p)) {
                match out.last_mut() {
                    Some(last) if last.1 == p => last.1 = q,
                    _ => out.push((p, q)),
                }
            }
        }
        Self::from_wide(out)
    }

    pub fn union(&self, other: &RangeSet) -> RangeSet {
        self.combine(other, |x, y| x || y)
    }

    pub fn intersection(&self, other: &RangeSet) -> RangeSet {
        self.combine(other, |x, y| x && y)
    }

    pub fn difference(&self, other: &RangeSet) -> RangeSet {
        self.combine(other, |x, y| x && !y)
    }

    pub fn symmetric_difference(&self, other: &RangeSet) -> RangeSet {
        self.combine(other, |x, y| x != y)
    }

    /// `complement` replaces this set with its complement in [0, 2⁶⁴).
    pub fn complement(&mut self) -> &mut Self {
        let wide = self.to_wide();
        let mut out: Vec<(u128, u128)> = Vec::with_capacity(wide.len() + 1);
        let mut prev: u128 = 0;
        for (b, e) in wide {
            if b > prev {
                out.push((prev, b));
            }
            prev = e;
        }
        if prev < UNIVERSE_END {
            out.push((prev, UNIVERSE_END));
        }
        *self = Self::from_wide(out);
        self
    }

    pub fn complemented(&self) -> RangeSet {
        let mut s = self.clone();
        s.complement();
        s
    }

    pub fn contains(&self, u: u64) -> bool {
        let u = u as u128;
        self.ranges
            .iter()
            .any(|&(b, e)| b as u128 <= u && u < end_of(e))
    }

    /// `contains_range` returns true if every integer of [lo, hi),
    /// interpreted circularly, is in this set.
    pub fn contains_range(&self, lo: u64, hi: u64) -> bool {
        Self::pieces(lo, hi).into_iter().all(|(b, e)| {
            self.ranges
                .iter()
                .any(|&(x, y)| x as u128 <= b && e <= end_of(y))
        })
    }

    pub fn contains_set(&self, other: &RangeSet) -> bool {
        other.to_wide().into_iter().all(|(b, e)| {
            self.ranges
                .iter()
                .any(|&(x, y)| x as u128 <= b && e <= end_of(y))
        })
    }

    pub fn is_within(&self, other: &RangeSet) -> bool {
        other.contains_set(self)
    }

    /// `intersects_range` returns true if this set and [lo, hi),
    /// interpreted circularly, have an integer in common.
    pub fn intersects_range(&self, lo: u64, hi: u64) -> bool {
        Self::pieces(lo, hi).into_iter().any(|(b, e)| {
            self.ranges
                .iter()
                .any(|&(x, y)| (x as u128) < e && b < end_of(y))
        })
    }

    pub fn intersects(&self, other: &RangeSet) -> bool {
        let b = other.to_wide();
        self.to_wide()
            .into_iter()
            .any(|(x, y)| b.iter().any(|&(p, q)| x < q && p < y))
    }

    pub fn is_disjoint_from_range(&self, lo: u64, hi: u64) -> bool {
        !self.intersects_range(lo, hi)
    }

    pub fn is_disjoint_from(&self, other: &RangeSet) -> bool {
        !self.intersects(other)
    }

    /// `simplify` rounds each range begin down and each range end up to
    /// a multiple of 2ⁿ, then merges ranges that overlap or become
    /// adjacent. The result is a superset of the original.
    pub fn simplify(&mut self, n: u32) -> &mut Self {
        if n == 0 {
            return self;
        }
        if n >= 64 {
            if !self.is_empty() {
                *self = Self::full();
            }
            return self;
        }
        let mask = (1u128 << n) - 1;
        let mut wide: Vec<(u128, u128)> = self
            .to_wide()
            .into_iter()
            .map(|(b, e)| (b & !mask, ((e + mask) & !mask).min(UNIVERSE_END)))
            .collect();
        Self::coalesce(&mut wide);
        *self = Self::from_wide(wide);
        self
    }

    pub fn simplified(&self, n: u32) -> RangeSet {
        let mut s = self.clone();
        s.simplify(n);
        s
    }

    /// `scale` multiplies every range boundary by f, clamping to 2⁶⁴.
    pub fn scale(&mut self, f: u64) -> &mut Self {
        if f == 0 {
            self.ranges.clear();
            return self;
        }
        let f = f as u128;
        let wide: Vec<(u128, u128)> = self
            .to_wide()
            .into_iter()
            .map(|(b, e)| ((b * f).min(UNIVERSE_END), (e * f).min(UNIVERSE_END)))
            .filter(|&(b, e)| b < e)
            .collect();
        *self = Self::from_wide(wide);
        self
    }

    pub fn scaled(&self, f: u64) -> RangeSet {
        let mut s = self.clone();
        s.scale(f);
        s
    }
}

impl FromIterator<u64> for RangeSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut s = RangeSet::new();
        for u in iter {
            s.insert_single(u);
        }
        s
    }
}

impl From<&[(u64, u64)]> for RangeSet {
    fn from(ranges: &[(u64, u64)]) -> Self {
        let mut s = RangeSet::new();
        for &(lo, hi) in ranges {
            s.insert(lo, hi);
        }
        s
    }
}

impl<const N: usize> From<[(u64, u64); N]> for RangeSet {
    fn from(ranges: [(u64, u64); N]) -> Self {
        Self::from(&ranges[..])
    }
}

impl BitAnd for &RangeSet {
    type Output = RangeSet;

    fn bitand(self, rhs: &RangeSet) -> RangeSet {
        self.intersection(rhs)
    }
}

impl BitOr for &RangeSet {
    type Output = RangeSet;

    fn bitor(self, rhs: &RangeSet) -> RangeSet {
        self.union(rhs)
    }
}

impl Sub for &RangeSet {
    type Output = RangeSet;

    fn sub(self, rhs: &RangeSet) -> RangeSet {
        self.difference(rhs)
    }
}

impl BitXor for &RangeSet {
    type Output = RangeSet;

    fn bitxor(self, rhs: &RangeSet) -> RangeSet {
        self.symmetric_difference(rhs)
    }
}

impl Not for &RangeSet {
    type Output = RangeSet;

    fn not(self) -> RangeSet {
        self.complemented()
    }
}

impl Display for RangeSet {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{{\"RangeSet\": [")?;
        for (i, (b, e)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{b}, {e}]")?;
        }
        write!(f, "]}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_full() {
        let mut s = RangeSet::new();
        assert!(s.is_valid() && s.is_empty());
        assert_eq!(s.len(), 0);
        s.complement();
        assert!(s.is_valid() && s.is_full());
        assert_eq!(s.len(), 1);
        assert_eq!(s.cardinality(), 1u128 << 64);
        assert!(RangeSet::range(0, 0).is_full());
    }

    #[test]
    fn single_and_range_constructors() {
        let mut s0 = RangeSet::single(2);
        s0.insert_single(1);
        assert!(s0.is_valid() && !s0.is_empty());
        assert_eq!(s0.len(), 1);
        assert!(s0.contains(1) && s0.contains(2));
        assert_eq!(s0, RangeSet::range(1, 3));
    }

    #[test]
    fn iteration_yields_canonical_ranges() {
        let s = RangeSet::from([(0, 1), (2, 3), (4, 5), (6, 7)]);
        let mut u = 0;
        for (b, e) in s.iter() {
            assert_eq!(b, u);
            assert_eq!(e, u + 1);
            u += 2;
        }
        assert_eq!(u, 8);
    }

    #[test]
    fn size_and_cardinality() {
        let s: RangeSet = [0u64, 2, 4, 6, 8].into_iter().collect();
        assert_eq!(s.len(), 5);
        assert_eq!(s.cardinality(), 5);
        let s: RangeSet = [1u64, 2, 3, 4, 5].into_iter().collect();
        assert_eq!(s.len(), 1);
        assert_eq!(s.cardinality(), 5);
    }

    #[test]
    fn stream_output() {
        let s = RangeSet::from([(1, 2), (3, 7), (9, 0)]);
        assert_eq!(s.to_string(), "{\"RangeSet\": [[1, 2], [3, 7], [9, 0]]}");
    }

    #[test]
    fn insert_wrapping_and_overlapping() {
        let s = RangeSet::from([(3, 0), (0, 2)]);
        assert!(s.is_valid());
        assert_eq!(s, RangeSet::range(3, 2));
        assert_eq!(s, RangeSet::range(2, 3).complemented());
        let s = RangeSet::from([(0, 2), (4, 0), (2, 4)]);
        assert!(s.is_valid() && s.is_full());
        let s = RangeSet::from([(0, 2), (2, 0)]);
        assert!(s.is_valid() && s.is_full());
        let s = RangeSet::from([(3, 0), (0, 3)]);
        assert!(s.is_valid() && s.is_full());
        let s = RangeSet::from([(2, 3), (3, 4), (8, 9), (4, 8)]);
        assert!(s.is_valid());
        assert_eq!(s, RangeSet::range(2, 9));
        let s = RangeSet::from([(2, 3), (1, 2)]);
        assert_eq!(s, RangeSet::range(1, 3));
        let s = RangeSet::from([(1, 2), (3, 0), (2, 3)]);
        assert_eq!(s, RangeSet::range(1, 0));
        let s = RangeSet::from([(1, 3), (5, 7), (2, 6)]);
        assert_eq!(s, RangeSet::range(1, 7));
        let s = RangeSet::from([(2, 3), (5, 7), (1, 6), (0, 2)]);
        assert_eq!(s, RangeSet::range(0, 7));
        let s = RangeSet::from([(1, 3), (2, 0)]);
        assert_eq!(s, RangeSet::range(1, 0));
        let mut s: RangeSet = [1u64, 2, 3].into_iter().collect();
        s.insert(0, 0);
        assert!(s.is_valid() && s.is_full());
        let s = RangeSet::from([(2, 3), (4, 5), (0, 1)]);
        assert_eq!(s, RangeSet::from([(0, 1), (2, 3), (4, 5)]));
    }

    #[test]
    fn erase_punches_holes() {
        let mut s = RangeSet::full();
        s.erase(0, 0);
        assert!(s.is_valid() && s.is_empty());
        let mut s = RangeSet::full();
        s.erase(2, 3);
        assert_eq!(s, RangeSet::from([(0, 2), (3, 0)]));
        s.erase(1, 4);
        assert_eq!(s, RangeSet::from([(0, 1), (4, 0)]));
        let mut s = RangeSet::range(10, 20);
        s.erase(18, 12);
        assert_eq!(s, RangeSet::range(12, 18));
    }

    #[test]
    fn intersection_operation() {
        let empty = RangeSet::new();
        assert!(empty.intersection(&RangeSet::range(0, 1)).is_empty());
        assert!(RangeSet::range(1, 0).intersection(&empty).is_empty());
        let a = RangeSet::from([(0, 2), (4, 6), (8, 10)]);
        let b = RangeSet::from([(2, 4), (6, 8), (10, 12)]);
        assert!(a.intersection(&b).is_empty());
        let a = RangeSet::from([(0, 5), (6, 7), (8, 9)]);
        let b = RangeSet::from([(0, 1), (2, 3), (4, 5), (6, 10)]);
        let expected: RangeSet = [0u64, 2, 4, 6, 8].into_iter().collect();
        assert_eq!(&a & &b, expected);
        assert_eq!(&a & &a, a);
    }

    #[test]
    fn union_operation() {
        let full = RangeSet::full();
        assert!(full.union(&RangeSet::range(0, 1)).is_full());
        assert!(RangeSet::range(0, 1).union(&full).is_full());
        let a = RangeSet::from([(1, 3), (5, 7), (9, 11)]);
        let b = RangeSet::from([(0, 1), (3, 5), (7, 9)]);
        assert_eq!(&a | &b, RangeSet::range(0, 11));
        assert_eq!(&a | &a, a);
    }

    #[test]
    fn difference_operation() {
        let empty = RangeSet::new();
        let full = RangeSet::full();
        assert!(empty.difference(&RangeSet::single(3)).is_empty());
        assert!(RangeSet::single(3).difference(&full).is_empty());
        let a = RangeSet::from([(1, 3), (5, 7), (9, 12)]);
        let b = RangeSet::from([(2, 6), (10, 11)]);
        let expected: RangeSet = RangeSet::from([(1, 2), (6, 7), (9, 10), (11, 12)]);
        assert_eq!(&a - &b, expected);
        assert!(a.difference(&a).is_empty());
        assert_eq!(&full - &RangeSet::range(2, 4), RangeSet::range(4, 2));
    }

    #[test]
    fn symmetric_difference_operation() {
        let empty = RangeSet::new();
        let full = RangeSet::full();
        assert!(empty.symmetric_difference(&empty).is_empty());
        assert!(full.symmetric_difference(&full).is_empty());
        assert!(full.symmetric_difference(&empty).is_full());
        let a = RangeSet::from([(0, 3), (9, 0)]);
        let b = RangeSet::from([(0, 4), (8, 0)]);
        let s = a.symmetric_difference(&b);
        assert_eq!(s, RangeSet::from([(3, 4), (8, 9)]));
        assert_eq!(s, b.symmetric_difference(&a));
        let s = a.symmetric_difference(&RangeSet::range(4, 8));
        assert_eq!(s, RangeSet::from([(0, 3), (4, 8), (9, 0)]));
        let s = a.symmetric_difference(&RangeSet::range(2, 10));
        assert_eq!(s, RangeSet::from([(0, 2), (3, 9), (10, 0)]));
        let na = a.complemented();
        let nb = b.complemented();
        assert_eq!(&na ^ &nb, RangeSet::from([(3, 4), (8, 9)]));
        assert!((&na ^ &na).is_empty());
    }

    #[test]
    fn intersects_and_disjoint() {
        let empty = RangeSet::new();
        let full = RangeSet::full();
        assert!(!empty.intersects(&empty));
        assert!(!empty.intersects(&full));
        assert!(!empty.intersects_range(0, 0));
        assert!(full.intersects(&full));
        assert!(full.intersects_range(0, 0));
        assert!(full.intersects_range(3, 1));
        assert!(empty.is_disjoint_from(&empty));
        assert!(empty.is_disjoint_from(&full));
        assert!(RangeSet::single(1).intersects_range(0, 0));
        assert!(RangeSet::range(1, 4).intersects_range(2, 3));
        assert!(RangeSet::range(1, 4).intersects_range(3, 2));
        assert!(RangeSet::range(4, 1).intersects_range(3, 2));
        assert!(!RangeSet::single(1).intersects(&RangeSet::single(2)));
        assert!(!RangeSet::range(1, 2).intersects_range(3, 4));
        assert!(!RangeSet::range(4, 6).intersects_range(8, 2));
        assert!(RangeSet::range(4, 6).is_disjoint_from_range(8, 2));
        assert!(!RangeSet::range(8, 2).intersects_range(4, 6));
        let a = RangeSet::from([(0, 1), (5, 8), (9, 0)]);
        let b = RangeSet::from([(1, 5), (8, 9)]);
        assert!(!a.intersects(&b));
        assert!(a.is_disjoint_from(&b));
        assert!(a.intersects(&b.complemented()));
        assert!(a.complemented().intersects(&b));
    }

    #[test]
    fn containment() {
        let empty = RangeSet::new();
        let full = RangeSet::full();
        assert!(empty.contains_set(&empty));
        assert!(empty.is_within(&empty));
        assert!(!empty.contains_set(&full));
        assert!(empty.is_within(&full));
        assert!(full.contains(1));
        assert!(RangeSet::range(1, 4).contains_range(2, 3));
        assert!(!RangeSet::range(2, 3).contains_range(1, 4));
        assert!(RangeSet::range(2, 3).is_within(&RangeSet::range(1, 4)));
        assert!(!RangeSet::range(1, 4).contains_range(2, 5));
        assert!(RangeSet::range(4, 2).contains_range(5, 1));
        assert!(RangeSet::range(5, 1).is_within(&RangeSet::range(4, 2)));
        let a = RangeSet::from([(0, 1), (5, 8), (9, 0)]);
        let b = RangeSet::from([(1, 5), (8, 9)]);
        assert!(a.contains_set(&a));
        assert!(b.is_within(&b));
        assert!(!a.contains_set(&b));
        assert!(!b.contains_set(&a));
        assert!(a.contains_set(&b.complemented()));
        assert!(a.is_within(&b.complemented()));
        let a = RangeSet::from([(1, 3), (7, 9)]);
        let mut b = RangeSet::from([(0, 3), (6, 8)]);
        assert!(!a.contains_set(&b));
        assert!(!b.contains_set(&a));
        b.insert_single(8);
        assert!(a.is_within(&b));
        assert!(b.contains_set(&a));
    }

    #[test]
    fn simplify_rounds_outward() {
        assert!(RangeSet::new().simplify(1).is_empty());
        assert!(RangeSet::full().simplify(1).is_full());
        assert!(RangeSet::single(1).simplify(64).is_full());
        let a = RangeSet::from([(0, 1), (5, 8), (9, 0)]);
        let s = a.simplified(2);
        assert!(s.is_valid() && s.is_full());
        let b = RangeSet::from([(1, 3), (8, 10), (11, 12), (16, 0)]);
        let s = b.simplified(2);
        assert!(s.is_valid());
        assert_eq!(s, RangeSet::from([(0, 4), (8, 12), (16, 0)]));
        // Simplification never loses members.
        assert!(s.contains_set(&b));
    }

    #[test]
    fn scale_multiplies_boundaries() {
        let mut s = RangeSet::from([(0, 1), (5, 8), (9, 0)]);
        s.scale(10);
        assert!(s.is_valid());
        assert_eq!(s, RangeSet::from([(0, 10), (50, 80), (90, 0)]));
    }

    #[test]
    fn boolean_lattice_identities() {
        let a = RangeSet::from([(0, 10), (20, 30), (50, 0)]);
        let b = RangeSet::from([(5, 25), (40, 60)]);
        let u = &a | &b;
        let i = &a & &b;
        // De Morgan.
        assert_eq!(u.complemented(), &a.complemented() & &b.complemented());
        assert_eq!(i.complemented(), &a.complemented() | &b.complemented());
        // Difference and symmetric difference decompositions.
        assert_eq!(&a - &b, &a & &b.complemented());
        assert_eq!(&a ^ &b, &(&a - &b) | &(&b - &a));
        // Absorption.
        assert_eq!(&a & &u, a);
        assert_eq!(&a | &i, a);
        // Cardinality of a disjoint decomposition.
        assert_eq!(
            u.cardinality(),
            i.cardinality() + (&a ^ &b).cardinality()
        );
    }
}
