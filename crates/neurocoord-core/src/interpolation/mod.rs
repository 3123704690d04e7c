//! Interpolation of array values at fractional index coordinates.
//!
//! `resample` depends on the [`Interpolator`] trait; the shipped
//! implementations cover orders 0 (nearest), 1 (multilinear) and 3
//! (cubic B-spline with prefiltering).

pub mod bspline;
pub mod linear;
pub mod nearest;
mod spline;
pub mod trait_;

pub use bspline::BSplineInterpolator;
pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;
pub use trait_::Interpolator;
