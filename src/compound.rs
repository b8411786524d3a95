use std::fmt::{self, Display, Formatter};

use crate::box3d::Box3d;
use crate::circle::Circle;
use crate::codec;
use crate::error::{DecodeError, ValidationError};
use crate::lonlat_box::LonLatBox;
use crate::region::Region;
use crate::relationship::{CONTAINS, DISJOINT, Relationship, TriState, WITHIN};
use crate::vector::UnitVector3d;

// Shared operand storage and plumbing for the two compound regions.
// Construction takes ownership of the operands; compounds never share
// children, so cloning one deep-copies its whole operand tree.
macro_rules! compound_region_impl {
    ($compound:ident, $variant:ident, $type_code:expr) => {
        impl $compound {
            pub const TYPE_CODE: u8 = $type_code;

            /// Creates a compound from the given operands, flattening
            /// any directly nested compound of the same kind. At least
            /// one operand is required.
            pub fn new(operands: Vec<Region>) -> Result<Self, ValidationError> {
                let mut flat = Vec::with_capacity(operands.len());
                for operand in operands {
                    match operand {
                        Region::$variant(inner) => flat.extend(inner.operands),
                        other => flat.push(other),
                    }
                }
                if flat.is_empty() {
                    return Err(ValidationError::EmptyOperandList);
                }
                Ok($compound { operands: flat })
            }

            pub fn operands(&self) -> &[Region] {
                &self.operands
            }

            pub fn encode(&self) -> Vec<u8> {
                codec::encode_operands(Self::TYPE_CODE, &self.operands)
            }

            pub fn decode(buffer: &[u8]) -> Result<Self, DecodeError> {
                if buffer.first() != Some(&Self::TYPE_CODE) {
                    return Err(DecodeError::UnknownTypeCode(
                        buffer.first().copied().unwrap_or(0),
                    ));
                }
                let operands = codec::decode_operands(&buffer[1..])?;
                $compound::new(operands)
                    .map_err(|_| DecodeError::InvalidField("operand list"))
            }
        }

        impl Display for $compound {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                write!(f, "{{\"{}\": [", stringify!($compound))?;
                for (i, operand) in self.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{operand}")?;
                }
                write!(f, "]}}")
            }
        }
    };
}

/// `UnionRegion` is a lazy point-set union of its operands: operations
/// delegate to the nested regions and combine their results.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionRegion {
    operands: Vec<Region>,
}

compound_region_impl!(UnionRegion, Union, b'u');

impl UnionRegion {
    pub fn is_empty(&self) -> bool {
        self.operands.iter().all(|o| o.is_empty())
    }

    pub fn contains(&self, v: &UnitVector3d) -> bool {
        self.operands.iter().any(|o| o.contains(v))
    }

    pub fn relate(&self, r: &Region) -> Relationship {
        let mut result = DISJOINT | WITHIN;
        // Once CONTAINS is set and DISJOINT and WITHIN are cleared,
        // nothing can change any more.
        for operand in &self.operands {
            let rel = operand.relate(r);
            // Every operand must be disjoint from r for the union to be
            // disjoint from it, and every operand must be within r for
            // the union to be within it.
            if !rel.contains(DISJOINT) {
                result = result & !DISJOINT;
            }
            if !rel.contains(WITHIN) {
                result = result & !WITHIN;
            }
            // Any operand containing r makes the union contain it. A
            // union can also cover r jointly without any single operand
            // containing it; that case is not detected.
            if rel.contains(CONTAINS) {
                result = result | CONTAINS;
            }
            if result == CONTAINS {
                break;
            }
        }
        result
    }

    pub fn overlaps(&self, r: &Region) -> TriState {
        // The union overlaps r exactly when some operand does.
        let mut result = TriState::False;
        for operand in &self.operands {
            result = result | operand.overlaps(r);
            if result.is_true() {
                break;
            }
        }
        result
    }

    pub fn bounding_box(&self) -> LonLatBox {
        let mut bounds = self.operands[0].bounding_box();
        for operand in &self.operands[1..] {
            bounds.expand_to_box(&operand.bounding_box());
        }
        bounds
    }

    pub fn bounding_box3d(&self) -> Box3d {
        let mut bounds = self.operands[0].bounding_box3d();
        for operand in &self.operands[1..] {
            bounds.expand_to(&operand.bounding_box3d());
        }
        bounds
    }

    pub fn bounding_circle(&self) -> Circle {
        let mut bounds = self.operands[0].bounding_circle();
        for operand in &self.operands[1..] {
            bounds.expand_to_circle(&operand.bounding_circle());
        }
        bounds
    }
}

/// `IntersectionRegion` is a lazy point-set intersection of its
/// operands: operations delegate to the nested regions and combine
/// their results.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionRegion {
    operands: Vec<Region>,
}

compound_region_impl!(IntersectionRegion, Intersection, b'i');

impl IntersectionRegion {
    /// `is_empty` returns true when the intersection is provably empty:
    /// some operand is empty, or two operands are provably disjoint.
    /// An empty intersection hidden from the pairwise relation tests is
    /// reported as non-empty.
    pub fn is_empty(&self) -> bool {
        if self.operands.iter().any(|o| o.is_empty()) {
            return true;
        }
        for (i, a) in self.operands.iter().enumerate() {
            for b in &self.operands[i + 1..] {
                if a.relate(b).contains(DISJOINT) {
                    return true;
                }
            }
        }
        false
    }

    pub fn contains(&self, v: &UnitVector3d) -> bool {
        self.operands.iter().all(|o| o.contains(v))
    }

    pub fn relate(&self, r: &Region) -> Relationship {
        let mut result = CONTAINS;
        let stop = DISJOINT | WITHIN;
        for operand in &self.operands {
            let rel = operand.relate(r);
            // Every operand must contain r for the intersection to
            // contain it.
            if !rel.contains(CONTAINS) {
                result = result & !CONTAINS;
            }
            // Any operand disjoint from r separates the intersection
            // from it, and any operand within r places the intersection
            // within it. Both folds can miss cases that hold jointly
            // without holding for a single operand.
            if rel.contains(DISJOINT) {
                result = result | DISJOINT;
            }
            if rel.contains(WITHIN) {
                result = result | WITHIN;
            }
            if result == stop {
                break;
            }
        }
        result
    }

    pub fn overlaps(&self, r: &Region) -> TriState {
        // An operand disjoint from r proves non-overlap; overlap itself
        // cannot be proven operand by operand.
        let rel = self.relate(r);
        if rel.contains(DISJOINT) {
            return TriState::False;
        }
        if self
            .operands
            .iter()
            .any(|o| o.overlaps(r).is_false())
        {
            return TriState::False;
        }
        if rel.contains(CONTAINS) || rel.contains(WITHIN) {
            // A non-empty side being enclosed proves overlap.
            if !self.is_empty() && !r.is_empty() {
                return TriState::True;
            }
        }
        TriState::Unknown
    }

    pub fn bounding_box(&self) -> LonLatBox {
        let mut bounds = self.operands[0].bounding_box();
        for operand in &self.operands[1..] {
            bounds.clip_to(&operand.bounding_box());
        }
        bounds
    }

    pub fn bounding_box3d(&self) -> Box3d {
        let mut bounds = self.operands[0].bounding_box3d();
        for operand in &self.operands[1..] {
            bounds.clip_to(&operand.bounding_box3d());
        }
        bounds
    }

    pub fn bounding_circle(&self) -> Circle {
        let mut bounds = self.operands[0].bounding_circle();
        for operand in &self.operands[1..] {
            bounds.clip_to(&operand.bounding_circle());
        }
        bounds
    }
}
