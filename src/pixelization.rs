mod finder;
mod htm;
mod mq3c;

pub use htm::HtmPixelization;
pub use mq3c::Mq3cPixelization;

use crate::error::ValidationError;
use crate::rangeset::RangeSet;
use crate::region::Region;
use crate::vector::UnitVector3d;

/// A `Pixelization` maps each point of the unit sphere to exactly one
/// pixel with a 64-bit integer index.
///
/// Given a table of points indexed by pixel, the indexes of pixels
/// intersecting a region r:
///
/// ```text
/// let pixels = pixelization.envelope(&r, 0);
/// ```
///
/// support range lookups that retrieve every point inside r along with
/// some points close to its boundary. Subtracting `interior(&r, 0)`
/// identifies the pixels whose points still need individual filtering.
pub trait Pixelization {
    /// `universe` returns the set of all pixel indexes at this
    /// pixelization's level.
    fn universe(&self) -> RangeSet;

    /// `pixel` returns a region that contains every unit vector v with
    /// `index(v) == i`. The region may also contain nearby points: a
    /// point on a shared pixel edge belongs to the regions of both
    /// pixels but is assigned to exactly one of them.
    fn pixel(&self, i: u64) -> Result<Region, ValidationError>;

    /// `index` computes the index of the pixel containing v.
    fn index(&self, v: &UnitVector3d) -> u64;

    /// `index_to_string` converts the given pixel index to a
    /// human-readable form.
    fn index_to_string(&self, i: u64) -> Result<String, ValidationError>;

    /// `envelope` returns a set of pixel indexes that contains every
    /// pixel intersecting r.
    ///
    /// With a non-zero `max_ranges`, the result is simplified until it
    /// consists of at most that many ranges, by adding pixels; it is
    /// always a superset of the intersecting pixels. Setting
    /// `max_ranges` below 4 can produce very coarse results regardless
    /// of region size.
    fn envelope(&self, r: &Region, max_ranges: usize) -> RangeSet;

    /// `interior` returns a set of pixel indexes wholly inside r.
    ///
    /// With a non-zero `max_ranges`, the result is simplified until it
    /// consists of at most that many ranges, by removing pixels; it is
    /// always a subset of the interior pixels.
    fn interior(&self, r: &Region, max_ranges: usize) -> RangeSet;
}
