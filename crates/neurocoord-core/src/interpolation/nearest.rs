//! Nearest-neighbor interpolation.

use ndarray::{Array1, Array2, ArrayD};
use rayon::prelude::*;

use super::trait_::{check_rank, Interpolator};
use crate::error::Result;

/// Nearest-neighbor interpolator (order 0).
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighborInterpolator {
    fill_value: f64,
}

impl NearestNeighborInterpolator {
    /// Create a nearest-neighbor interpolator filling out-of-bounds with 0.
    pub fn new() -> Self {
        Self { fill_value: 0.0 }
    }

    /// Set the value returned for out-of-bounds coordinates.
    pub fn with_fill_value(mut self, value: f64) -> Self {
        self.fill_value = value;
        self
    }

    fn sample(&self, data: &ArrayD<f64>, point: &[f64]) -> f64 {
        let mut index = Vec::with_capacity(point.len());
        for (&x, &len) in point.iter().zip(data.shape()) {
            let r = x.round();
            if len == 0 || r < 0.0 || r > (len - 1) as f64 {
                return self.fill_value;
            }
            index.push(r as usize);
        }
        data[index.as_slice()]
    }
}

impl Default for NearestNeighborInterpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolator for NearestNeighborInterpolator {
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

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn test_rounds_to_nearest_voxel() {
        let mut data = ArrayD::zeros(IxDyn(&[3, 3]));
        data[[1, 2]] = 7.0;
        let interp = NearestNeighborInterpolator::new();
        let coords = Array2::from_shape_vec((2, 2), vec![1.2, 1.8, 0.0, 0.0]).unwrap();
        let values = interp.interpolate(&data, &coords).unwrap();
        assert_eq!(values[0], 7.0);
        assert_eq!(values[1], 0.0);
    }

    #[test]
    fn test_out_of_bounds_fill() {
        let data = ArrayD::ones(IxDyn(&[3, 3]));
        let interp = NearestNeighborInterpolator::new().with_fill_value(-1.0);
        let coords = Array2::from_shape_vec((1, 2), vec![3.0, 0.0]).unwrap();
        let values = interp.interpolate(&data, &coords).unwrap();
        assert_eq!(values[0], -1.0);
    }
}
