//! Multilinear interpolation for any number of axes.

use ndarray::{Array1, Array2, ArrayD};
use rayon::prelude::*;

use super::trait_::{check_rank, Interpolator};
use crate::error::Result;

/// Multilinear interpolator (order 1).
///
/// Each sample blends the `2^ndim` surrounding voxels; corners outside the
/// array contribute the fill value.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterpolator {
    fill_value: f64,
}

impl LinearInterpolator {
    /// Create a linear interpolator filling out-of-bounds with 0.
    pub fn new() -> Self {
        Self { fill_value: 0.0 }
    }

    /// Set the value contributed by out-of-bounds corners.
    pub fn with_fill_value(mut self, value: f64) -> Self {
        self.fill_value = value;
        self
    }

    fn sample(&self, data: &ArrayD<f64>, point: &[f64]) -> f64 {
        let ndim = point.len();
        let mut base = Vec::with_capacity(ndim);
        let mut frac = Vec::with_capacity(ndim);
        for &x in point {
            let floor = x.floor();
            base.push(floor as isize);
            frac.push(x - floor);
        }

        let mut acc = 0.0;
        let mut index = vec![0usize; ndim];
        'corners: for corner in 0..(1usize << ndim) {
            let mut weight = 1.0;
            for axis in 0..ndim {
                let hi = (corner >> axis) & 1 == 1;
                weight *= if hi { frac[axis] } else { 1.0 - frac[axis] };
                if weight == 0.0 {
                    continue 'corners;
                }
                let i = base[axis] + hi as isize;
                if i < 0 || i >= data.shape()[axis] as isize {
                    acc += weight_remainder(corner, axis, ndim, weight, &frac) * self.fill_value;
                    continue 'corners;
                }
                index[axis] = i as usize;
            }
            acc += weight * data[index.as_slice()];
        }
        acc
    }
}

/// Finish the weight product for a corner whose remaining axes have not
/// been folded in yet (out-of-bounds early exit).
fn weight_remainder(corner: usize, from_axis: usize, ndim: usize, mut weight: f64, frac: &[f64]) -> f64 {
    for axis in from_axis + 1..ndim {
        let hi = (corner >> axis) & 1 == 1;
        weight *= if hi { frac[axis] } else { 1.0 - frac[axis] };
    }
    weight
}

impl Default for LinearInterpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, data: &ArrayD<f64>, coords: &Array2<f64>) -> Result<Array1<f64>> {
        check_rank(data, coords)?;
        let ndim = data.ndim();
        let flat = coords.as_standard_layout();
        let points = flat.as_slice().expect("standard layout");
        let values: Vec<f64> = points
            .par_chunks(ndim)
            .map(|point| self.sample(data, point))
            .collect();
        Ok(Array1::from_vec(values))
    }
}
