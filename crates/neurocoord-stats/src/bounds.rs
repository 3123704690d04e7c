//! World-space bounding boxes of grids and masks.

use ndarray::{Array2, ArrayD, Dimension};
use neurocoord_core::AffineTransform;

use crate::error::{Result, StatsError};

/// Map a batch of voxel coordinates to world coordinates.
pub fn coord_transform(points: &Array2<f64>, affine: &AffineTransform) -> Result<Array2<f64>> {
    Ok(affine.eval(points)?)
}

/// Per-world-axis `(min, max)` bounds of a grid of the given shape.
///
/// The box spans voxel 0 to voxel `len - 1` on each axis; all `2^ndim`
/// corners go through the affine so the bounds hold for any rotation.
pub fn get_bounds(shape: &[usize], affine: &AffineTransform) -> Result<Vec<(f64, f64)>> {
    if shape.len() != affine.domain().ndim() {
        return Err(StatsError::RankMismatch {
            expected: affine.domain().ndim(),
            actual: shape.len(),
        });
    }
    let box_: Vec<(f64, f64)> = shape
        .iter()
        .map(|&len| (0.0, len.saturating_sub(1) as f64))
        .collect();
    corner_bounds(&box_, affine)
}

/// Per-world-axis `(min, max)` bounds of the voxel bounding box of `mask`.
///
/// Fails with [`StatsError::EmptyMask`] when the mask has no `true` voxel.
pub fn get_mask_bounds(mask: &ArrayD<bool>, affine: &AffineTransform) -> Result<Vec<(f64, f64)>> {
    if mask.ndim() != affine.domain().ndim() {
        return Err(StatsError::RankMismatch {
            expected: affine.domain().ndim(),
            actual: mask.ndim(),
        });
    }
    let mut box_: Vec<(f64, f64)> = vec![(f64::INFINITY, f64::NEG_INFINITY); mask.ndim()];
    let mut any = false;
    for (idx, &m) in mask.indexed_iter() {
        if m {
            any = true;
            for (bounds, &i) in box_.iter_mut().zip(idx.slice()) {
                bounds.0 = bounds.0.min(i as f64);
                bounds.1 = bounds.1.max(i as f64);
            }
        }
    }
    if !any {
        return Err(StatsError::EmptyMask);
    }
    corner_bounds(&box_, affine)
}

/// Push every corner of a voxel-space box through the affine and take the
/// world-axis extrema.
fn corner_bounds(box_: &[(f64, f64)], affine: &AffineTransform) -> Result<Vec<(f64, f64)>> {
    let ndim = box_.len();
    let corners = 1usize << ndim;
    let mut points = Array2::<f64>::zeros((corners, ndim));
    for c in 0..corners {
        for axis in 0..ndim {
            points[[c, axis]] = if c >> axis & 1 == 0 {
                box_[axis].0
            } else {
                box_[axis].1
            };
        }
    }
    let world = affine.eval(&points)?;

    let n_out = affine.codomain().ndim();
    let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); n_out];
    for row in world.outer_iter() {
        for (b, &v) in bounds.iter_mut().zip(row.iter()) {
            b.0 = b.0.min(v);
            b.1 = b.1.max(v);
        }
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};
    use ndarray::IxDyn;
    use neurocoord_core::CoordinateSystem;

    fn affine(entries: &[f64]) -> AffineTransform {
        AffineTransform::from_params(
            CoordinateSystem::voxel(["i", "j", "k"]).unwrap(),
            CoordinateSystem::world(["x", "y", "z"]).unwrap(),
            DMatrix::from_diagonal(&DVector::from_row_slice(entries)),
        )
        .unwrap()
    }

    #[test]
    fn test_get_bounds_diagonal() {
        let bounds = get_bounds(&[11, 21, 31], &affine(&[2.0, 1.0, 0.5, 1.0])).unwrap();
        assert_eq!(bounds, vec![(0.0, 20.0), (0.0, 20.0), (0.0, 15.0)]);
    }

    #[test]
    fn test_get_bounds_negative_step() {
        let mut matrix = DMatrix::<f64>::identity(4, 4);
        matrix[(0, 0)] = -1.0;
        matrix[(0, 3)] = 10.0;
        let t = AffineTransform::from_params(
            CoordinateSystem::voxel(["i", "j", "k"]).unwrap(),
            CoordinateSystem::world(["x", "y", "z"]).unwrap(),
            matrix,
        )
        .unwrap();
        let bounds = get_bounds(&[11, 2, 2], &t).unwrap();
        assert_eq!(bounds[0], (0.0, 10.0));
    }

    #[test]
    fn test_get_mask_bounds() {
        let mut mask = ArrayD::from_elem(IxDyn(&[10, 10, 10]), false);
        mask[[2, 3, 4]] = true;
        mask[[5, 3, 8]] = true;
        let bounds = get_mask_bounds(&mask, &affine(&[2.0, 2.0, 2.0, 1.0])).unwrap();
        assert_eq!(bounds, vec![(4.0, 10.0), (6.0, 6.0), (8.0, 16.0)]);
    }

    #[test]
    fn test_get_mask_bounds_empty() {
        let mask = ArrayD::from_elem(IxDyn(&[4, 4, 4]), false);
        assert!(matches!(
            get_mask_bounds(&mask, &affine(&[1.0, 1.0, 1.0, 1.0])),
            Err(StatsError::EmptyMask)
        ));
    }

    #[test]
    fn test_coord_transform() {
        let points = Array2::from_shape_vec((1, 3), vec![1.0, 2.0, 3.0]).unwrap();
        let world = coord_transform(&points, &affine(&[2.0, 1.0, 0.5, 1.0])).unwrap();
        assert_eq!(world[[0, 0]], 2.0);
        assert_eq!(world[[0, 1]], 2.0);
        assert_eq!(world[[0, 2]], 1.5);
    }
}
