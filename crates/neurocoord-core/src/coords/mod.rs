//! Coordinate systems, coordinate maps and affine transforms.

pub mod affine;
pub mod map;
pub mod slices;
pub mod system;

pub use affine::AffineTransform;
pub use map::{compose, CoordinateMap, GeneralMap, PointFn};
pub use system::CoordinateSystem;
