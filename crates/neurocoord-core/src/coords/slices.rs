//! Axis-aligned slice planes through 3D world space.
//!
//! Each constructor builds a 2D grid embedded in a 3D world coordinate
//! system: a plane at a fixed coordinate along the axis it names, spanning
//! bounded ranges along the other two axes. The result is an
//! [`ArrayCoordMap`] ready to hand to `resample`.

use nalgebra::DMatrix;

use crate::coords::affine::AffineTransform;
use crate::coords::system::CoordinateSystem;
use crate::error::{CoordError, Result};
use crate::evaluate::ArrayCoordMap;

/// Plane at fixed `x`, spanning `y_range` and `z_range` over `shape` pixels.
pub fn xslice(
    x: f64,
    y_range: (f64, f64),
    z_range: (f64, f64),
    world: &CoordinateSystem,
    shape: (usize, usize),
) -> Result<ArrayCoordMap> {
    plane(0, x, [y_range, z_range], world, shape)
}

/// Plane at fixed `y`, spanning `x_range` and `z_range` over `shape` pixels.
pub fn yslice(
    y: f64,
    x_range: (f64, f64),
    z_range: (f64, f64),
    world: &CoordinateSystem,
    shape: (usize, usize),
) -> Result<ArrayCoordMap> {
    plane(1, y, [x_range, z_range], world, shape)
}

/// Plane at fixed `z`, spanning `x_range` and `y_range` over `shape` pixels.
pub fn zslice(
    z: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
    world: &CoordinateSystem,
    shape: (usize, usize),
) -> Result<ArrayCoordMap> {
    plane(2, z, [x_range, y_range], world, shape)
}

/// Build the 2D-domain, 3D-codomain affine for an axis-aligned plane.
///
/// In-plane axes step `(max - min) / (len - 1)` from offset `min`, so the
/// first and last pixel land exactly on the range bounds; the fixed axis
/// carries step 0 and offset `fixed`.
fn plane(
    fixed_axis: usize,
    fixed: f64,
    ranges: [(f64, f64); 2],
    world: &CoordinateSystem,
    shape: (usize, usize),
) -> Result<ArrayCoordMap> {
    if world.ndim() != 3 {
        return Err(CoordError::shape(vec![3], vec![world.ndim()]));
    }
    let lens = [shape.0, shape.1];
    if lens[0] < 2 || lens[1] < 2 {
        return Err(CoordError::shape(vec![2, 2], lens.to_vec()));
    }

    let mut matrix = DMatrix::<f64>::zeros(4, 3);
    matrix[(3, 2)] = 1.0;
    let mut in_plane = 0;
    let mut domain_axes = Vec::with_capacity(2);
    for axis in 0..3 {
        if axis == fixed_axis {
            matrix[(axis, 2)] = fixed;
        } else {
            let (min, max) = ranges[in_plane];
            matrix[(axis, in_plane)] = (max - min) / (lens[in_plane] - 1) as f64;
            matrix[(axis, 2)] = min;
            domain_axes.push(format!("i_{}", world.axes()[axis]));
            in_plane += 1;
        }
    }

    let domain = CoordinateSystem::new("slice plane", domain_axes)?;
    let transform = AffineTransform::from_params(domain, world.clone(), matrix)?;
    ArrayCoordMap::from_shape(transform.into(), &[shape.0, shape.1])
}
