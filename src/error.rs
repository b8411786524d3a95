use std::error::Error;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum SphixError {
    DecodeError(DecodeError),
    ValidationError(ValidationError),
    CapacityError(CapacityError),
}

impl Error for SphixError {}

impl From<DecodeError> for SphixError {
    fn from(e: DecodeError) -> Self {
        Self::DecodeError(e)
    }
}

impl From<ValidationError> for SphixError {
    fn from(e: ValidationError) -> Self {
        Self::ValidationError(e)
    }
}

impl From<CapacityError> for SphixError {
    fn from(e: CapacityError) -> Self {
        Self::CapacityError(e)
    }
}

impl Display for SphixError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::DecodeError(e) => write!(f, "{e}"),
            Self::ValidationError(e) => write!(f, "{e}"),
            Self::CapacityError(e) => write!(f, "{e}"),
        }
    }
}

/// Errors raised when a byte string or container expression cannot be
/// turned back into a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Truncated,
    UnknownTypeCode(u8),
    UnsupportedTypeCode(u8),
    LengthMismatch { expected: usize, actual: usize },
    InvalidField(&'static str),
    Base64(String),
    MalformedOverlapExpression,
    EmptyInput,
}

impl Error for DecodeError {}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "Encoded region is truncated"),
            Self::UnknownTypeCode(c) => {
                write!(f, "Unknown region type code: 0x{c:02x}")
            }
            Self::UnsupportedTypeCode(c) => {
                write!(f, "Region type code 0x{c:02x} is not supported")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Encoded region has wrong length: expected {expected}, got {actual}"
                )
            }
            Self::InvalidField(what) => {
                write!(f, "Encoded region has an invalid {what}")
            }
            Self::Base64(s) => write!(f, "Invalid base64 region string: {s}"),
            Self::MalformedOverlapExpression => {
                write!(f, "No '&' found in encoded overlap expression term")
            }
            Self::EmptyInput => write!(f, "Encoded region is empty"),
        }
    }
}

/// Errors raised when constructor arguments violate a documented domain
/// contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidSubdivisionLevel { level: i32, max: i32 },
    InvalidPixelIndex(u64),
    InvalidLatitude(f64),
    InvalidAngleInterval(f64, f64),
    InvalidEllipseAngles,
    NotEnoughPoints,
    AntipodalPoints,
    EmptyOperandList,
}

impl Error for ValidationError {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::InvalidSubdivisionLevel { level, max } => {
                write!(f, "Subdivision level {level} not in [0, {max}]")
            }
            Self::InvalidPixelIndex(i) => write!(f, "Invalid pixel index: {i}"),
            Self::InvalidLatitude(lat) => {
                write!(f, "Latitude angle {lat} rad not in [-pi/2, pi/2]")
            }
            Self::InvalidAngleInterval(a, b) => {
                write!(f, "[{a}, {b}] rad is not a valid normalized angle interval")
            }
            Self::InvalidEllipseAngles => {
                write!(f, "Invalid ellipse opening angles or orientation")
            }
            Self::NotEnoughPoints => {
                write!(
                    f,
                    "The convex hull of a point set containing less than \
                     3 distinct, non-coplanar points is not a convex polygon"
                )
            }
            Self::AntipodalPoints => {
                write!(
                    f,
                    "The convex hull of the given point set is the \
                     entire unit sphere"
                )
            }
            Self::EmptyOperandList => {
                write!(f, "Compound region requires a non-empty region list")
            }
        }
    }
}

/// Error raised when an exact-arithmetic result would need more limbs
/// than the backing store provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    pub required: usize,
    pub capacity: usize,
}

impl Error for CapacityError {}

impl Display for CapacityError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "ExactInteger capacity is too small: {} limbs required, {} available",
            self.required, self.capacity
        )
    }
}
