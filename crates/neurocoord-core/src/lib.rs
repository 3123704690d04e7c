pub mod coords;
pub mod error;
pub mod evaluate;
pub mod image;
pub mod interpolation;
pub mod resample;

pub use coords::slices::{xslice, yslice, zslice};
pub use coords::{compose, AffineTransform, CoordinateMap, CoordinateSystem, GeneralMap, PointFn};
pub use error::{CoordError, Result};
pub use evaluate::{ArrayCoordMap, IndexRange};
pub use image::Image;
pub use interpolation::{
    BSplineInterpolator, Interpolator, LinearInterpolator, NearestNeighborInterpolator,
};
pub use resample::{resample, ResampleMapping, Resampler};
