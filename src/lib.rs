#![cfg_attr(docsrs, feature(doc_cfg))]

//! Spherical-geometry primitives for indexing and querying regions on
//! the unit sphere, the mathematical model of the celestial sphere.
//!
//! The crate provides circles, longitude/latitude boxes, ellipses,
//! convex polygons and lazy unions/intersections of these, with exact
//! or conservative answers to the topological questions {disjoint,
//! intersects, contains, within}; conservative bounding shapes; two
//! hierarchical sky pixelizations (HTM and modified Q3C) producing
//! canonical sets of 64-bit index ranges; and a compact binary codec
//! for every region type.

mod angle;
mod box3d;
mod circle;
pub mod codec;
mod compound;
mod curve;
mod ellipse;
mod error;
mod exact;
mod interval;
mod lonlat;
mod lonlat_box;
mod orientation;
mod pixelization;
mod polygon;
mod rangeset;
mod region;
mod relationship;
mod utils;
mod vector;

pub use crate::{
    angle::{Angle, NormalizedAngle},
    box3d::Box3d,
    circle::Circle,
    compound::{IntersectionRegion, UnionRegion},
    curve::{
        hilbert_index, hilbert_index_inverse, hilbert_to_morton, log2_u32, log2_u64,
        morton_index, morton_index_inverse, morton_to_hilbert,
    },
    ellipse::Ellipse,
    error::{CapacityError, DecodeError, SphixError, ValidationError},
    exact::ExactInteger,
    interval::{AngleInterval, Interval1d, NormalizedAngleInterval},
    lonlat::LonLat,
    lonlat_box::LonLatBox,
    orientation::{orientation, orientation_exact, orientation_x, orientation_y, orientation_z},
    pixelization::{HtmPixelization, Mq3cPixelization, Pixelization},
    polygon::ConvexPolygon,
    rangeset::RangeSet,
    region::Region,
    relationship::{CONTAINS, DISJOINT, INTERSECTS, Relationship, TriState, WITHIN},
    utils::{EPSILON, MAX_ASIN_ERROR, MAX_SQUARED_CHORD_LENGTH_ERROR},
    vector::{Matrix3d, UnitVector3d, Vector3d},
};
