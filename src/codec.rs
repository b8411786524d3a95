//! Little-endian byte encoding of primitives and regions.
//!
//! Encoded regions are self-describing: a one-byte type code is
//! followed by a fixed- or shape-determined sequence of little-endian
//! IEEE 754 doubles and u64 values. Compound regions nest their
//! operands, each preceded by its encoded length.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use num::ToPrimitive;
use num_enum::TryFromPrimitive;

use crate::circle::Circle;
use crate::compound::{IntersectionRegion, UnionRegion};
use crate::ellipse::Ellipse;
use crate::error::DecodeError;
use crate::lonlat_box::LonLatBox;
use crate::polygon::ConvexPolygon;
use crate::region::Region;
use crate::relationship::TriState;

pub(crate) const BOX_ENCODED_SIZE: usize = 33;
pub(crate) const CIRCLE_ENCODED_SIZE: usize = 41;
pub(crate) const ELLIPSE_ENCODED_SIZE: usize = 57;

/// The type code byte leading every encoded region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum RegionCode {
    Box = b'b',
    Circle = b'c',
    Ellipse = b'e',
    HealPixel = b'h',
    Intersection = b'i',
    Polygon = b'p',
    Union = b'u',
}

pub(crate) fn encode_f64(item: f64, buffer: &mut Vec<u8>) {
    buffer.extend_from_slice(&item.to_le_bytes());
}

pub(crate) fn decode_f64(buffer: &[u8]) -> f64 {
    f64::from_le_bytes(buffer[..8].try_into().unwrap())
}

pub(crate) fn encode_u64(item: u64, buffer: &mut Vec<u8>) {
    buffer.extend_from_slice(&item.to_le_bytes());
}

pub(crate) fn decode_u64(buffer: &[u8]) -> u64 {
    u64::from_le_bytes(buffer[..8].try_into().unwrap())
}

pub(crate) fn check_fixed_size(
    buffer: &[u8],
    type_code: u8,
    size: usize,
) -> Result<(), DecodeError> {
    if buffer.first() != Some(&type_code) {
        return Err(DecodeError::UnknownTypeCode(
            buffer.first().copied().unwrap_or(0),
        ));
    }
    if buffer.len() != size {
        return Err(DecodeError::LengthMismatch {
            expected: size,
            actual: buffer.len(),
        });
    }
    Ok(())
}

/// `decode_region` reconstructs a region from the byte string produced
/// by its `encode` method, dispatching on the leading type code.
pub fn decode_region(buffer: &[u8]) -> Result<Region, DecodeError> {
    let code = buffer.first().ok_or(DecodeError::EmptyInput)?;
    let code =
        RegionCode::try_from(*code).map_err(|_| DecodeError::UnknownTypeCode(*code))?;
    match code {
        RegionCode::Box => Ok(Region::Box(LonLatBox::decode(buffer)?)),
        RegionCode::Circle => Ok(Region::Circle(Circle::decode(buffer)?)),
        RegionCode::Ellipse => Ok(Region::Ellipse(Ellipse::decode(buffer)?)),
        RegionCode::Polygon => Ok(Region::Polygon(ConvexPolygon::decode(buffer)?)),
        RegionCode::Union => Ok(Region::Union(UnionRegion::decode(buffer)?)),
        RegionCode::Intersection => {
            Ok(Region::Intersection(IntersectionRegion::decode(buffer)?))
        }
        // HEALPix pixels participate in the format but have no concrete
        // implementation here.
        RegionCode::HealPixel => Err(DecodeError::UnsupportedTypeCode(b'h')),
    }
}

// Splits the payload of an encoded compound region into its
// length-prefixed operands.
pub(crate) fn decode_operands(mut buffer: &[u8]) -> Result<Vec<Region>, DecodeError> {
    let mut operands = Vec::new();
    while !buffer.is_empty() {
        if buffer.len() < 8 {
            return Err(DecodeError::Truncated);
        }
        let n = decode_u64(buffer)
            .to_usize()
            .ok_or(DecodeError::Truncated)?;
        buffer = &buffer[8..];
        if buffer.len() < n {
            return Err(DecodeError::Truncated);
        }
        operands.push(decode_region(&buffer[..n])?);
        buffer = &buffer[n..];
    }
    Ok(operands)
}

pub(crate) fn encode_operands(type_code: u8, operands: &[Region]) -> Vec<u8> {
    let mut buffer = vec![type_code];
    for operand in operands {
        let encoded = operand.encode();
        encode_u64(encoded.len() as u64, &mut buffer);
        buffer.extend_from_slice(&encoded);
    }
    buffer
}

fn decode_one_base64(s: &str) -> Result<Region, DecodeError> {
    let bytes = BASE64
        .decode(s)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    decode_region(&bytes)
}

/// `decode_base64` reconstructs a region from a base64 string. A
/// `:`-separated list of encoded regions decodes to their union.
pub fn decode_base64(s: &str) -> Result<Region, DecodeError> {
    if s.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    if !s.contains(':') {
        return decode_one_base64(s);
    }
    let operands = s
        .split(':')
        .map(decode_one_base64)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Region::Union(
        UnionRegion::new(operands).map_err(|_| DecodeError::EmptyInput)?,
    ))
}

/// `decode_overlaps_base64` evaluates an encoded overlap expression of
/// the form `A & B | C & D | …`, where each operand is a base64-encoded
/// region. Every `X & Y` group contributes the tri-state overlap test
/// of its two regions, and the groups are OR-ed together, stopping
/// early once the result is known to be true.
pub fn decode_overlaps_base64(s: &str) -> Result<TriState, DecodeError> {
    if s.is_empty() {
        // False is the natural result of an OR over zero terms.
        return Ok(TriState::False);
    }
    let mut result = TriState::False;
    for group in s.split('|') {
        let (lhs, rhs) = group
            .split_once('&')
            .ok_or(DecodeError::MalformedOverlapExpression)?;
        let a = decode_one_base64(lhs)?;
        let b = decode_one_base64(rhs)?;
        result = result | a.overlaps(&b);
        if result.is_true() {
            break;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_round_trip() {
        let mut buffer = Vec::new();
        encode_f64(-0.125, &mut buffer);
        encode_u64(0xdead_beef_0123_4567, &mut buffer);
        assert_eq!(buffer.len(), 16);
        assert_eq!(decode_f64(&buffer), -0.125);
        assert_eq!(decode_u64(&buffer[8..]), 0xdead_beef_0123_4567);
        // Little-endian layout.
        let mut buffer = Vec::new();
        encode_u64(1, &mut buffer);
        assert_eq!(buffer[0], 1);
        assert_eq!(buffer[7], 0);
    }

    #[test]
    fn type_codes() {
        assert_eq!(RegionCode::try_from(b'c'), Ok(RegionCode::Circle));
        assert_eq!(RegionCode::try_from(b'u'), Ok(RegionCode::Union));
        assert!(RegionCode::try_from(b'x').is_err());
    }

    #[test]
    fn unknown_and_unsupported_codes_are_rejected() {
        assert_eq!(decode_region(&[]), Err(DecodeError::EmptyInput));
        assert!(matches!(
            decode_region(&[b'z', 1, 2]),
            Err(DecodeError::UnknownTypeCode(b'z'))
        ));
        assert_eq!(
            decode_region(&[b'h']),
            Err(DecodeError::UnsupportedTypeCode(b'h'))
        );
    }

    #[test]
    fn base64_containers() {
        use crate::angle::Angle;
        use crate::vector::UnitVector3d;
        let c = Circle::new(UnitVector3d::x_axis(), Angle::from_radians(0.5));
        let b = LonLatBox::from_degrees(10.0, -10.0, 30.0, 10.0).unwrap();
        let cs = BASE64.encode(c.encode());
        let bs = BASE64.encode(b.encode());
        // A single region decodes directly.
        assert_eq!(decode_base64(&cs).unwrap(), Region::Circle(c));
        // A ':'-separated list forms a union.
        let u = decode_base64(&format!("{cs}:{bs}")).unwrap();
        match u {
            Region::Union(u) => assert_eq!(u.operands().len(), 2),
            other => panic!("expected a union, got {other:?}"),
        }
        assert!(decode_base64("").is_err());
        assert!(decode_base64("!!!").is_err());
    }

    #[test]
    fn overlap_expressions() {
        use crate::angle::Angle;
        use crate::vector::UnitVector3d;
        let a = BASE64.encode(
            Circle::new(UnitVector3d::x_axis(), Angle::from_degrees(5.0)).encode(),
        );
        let b = BASE64.encode(
            Circle::new(UnitVector3d::x_axis(), Angle::from_degrees(3.0)).encode(),
        );
        let far = BASE64.encode(
            Circle::new(-UnitVector3d::x_axis(), Angle::from_degrees(3.0)).encode(),
        );
        assert_eq!(
            decode_overlaps_base64(&format!("{a}&{b}")).unwrap(),
            TriState::True
        );
        assert_eq!(
            decode_overlaps_base64(&format!("{a}&{far}")).unwrap(),
            TriState::False
        );
        assert_eq!(
            decode_overlaps_base64(&format!("{a}&{far}|{a}&{b}")).unwrap(),
            TriState::True
        );
        assert_eq!(decode_overlaps_base64("").unwrap(), TriState::False);
        assert!(decode_overlaps_base64(&a).is_err());
    }
}
